//! # jv-viz
//!
//! Plot-friendly artifacts behind the three jobvac figures. Every artifact
//! serialises to flat JSON arrays and carries its own colours, labels and
//! markers, so renderers only lay it out.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod industry_grid;
pub mod markers;
pub mod results_bar;
pub mod weekly;

pub use industry_grid::IndustryGridArtifact;
pub use markers::{EventMarker, YEAR_STYLES, YearStyle, event_markers};
pub use results_bar::{BarSeries, EffectTable, Figure3Source, ResultsBarArtifact};
pub use weekly::{WeeklyChartArtifact, YearCurve};
