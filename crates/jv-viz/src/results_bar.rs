//! Figure 3: percentage-effect bars per industry and window.

use serde::{Deserialize, Serialize};

use jv_core::study::{INDUSTRIES, WHOLE_MARKET_LABEL, short_label};
use jv_core::{AnalysisWindow, Error, ModelScope, Response, Result};
use jv_inference::StudyResults;

/// Rows of the results chart: the whole market plus every industry.
pub const ROW_COUNT: usize = INDUSTRIES.len() + 1;

/// Fraction of a row taken by its group of bars.
pub const GROUP_WIDTH: f64 = 0.8;

/// Significance threshold behind the footnote stars.
pub const ALPHA: f64 = 0.05;

/// Footnotes explaining the label stars.
pub const FOOTNOTES: [&str; 2] = [
    "* - Overall and First wave effects not statistically significant",
    "** - Recovery phase effects not statistically significant",
];

/// Series styles in drawing order within a group (lowest bar first).
const SERIES: [(AnalysisWindow, &str); 3] = [
    (AnalysisWindow::Recovery, "#338F20"),
    (AnalysisWindow::FirstWave, "#1E88E5"),
    (AnalysisWindow::Overall, "#FFC107"),
];

/// Legend order as indices into `series`: Overall, First wave, Recovery.
const LEGEND_ORDER: [usize; 3] = [2, 1, 0];

const PUBLISHED_LABELS: [&str; ROW_COUNT] = [
    WHOLE_MARKET_LABEL,
    "Professional scientific & technical activities",
    "Education",
    "Human health & social work activities*",
    "Wholesale & retail trade",
    "Accommodation & food service activities",
    "Administrative & support service activities",
    "Financial & insurance activities",
    "Information & communication",
    "Transport & storage**",
    "Manufacturing",
    "Other service activities",
    "Construction**",
    "Arts, entertainment & recreation",
    "Real estate activities",
    "Water supply, sewerage, waste**",
    "Mining & quarrying",
    "Agriculture, Forestry and Fishing",
    "Electricity, gas, steam & air conditioning supply",
];

const PUBLISHED_OVERALL: [f64; ROW_COUNT] = [
    -29.17, -40.98, -32.22, -0.80, -40.77, -74.09, -41.97, -33.20, -32.91, -39.40, -42.27, -44.53,
    -40.73, -61.58, -40.79, -40.08, -73.07, -37.43, -42.99,
];

const PUBLISHED_FIRST_WAVE: [f64; ROW_COUNT] = [
    -39.34, -50.38, -37.55, -1.27, -50.69, -82.53, -53.93, -41.41, -42.87, -57.19, -54.12, -51.55,
    -56.40, -68.81, -52.53, -48.75, -73.43, -38.34, -53.76,
];

const PUBLISHED_RECOVERY: [f64; ROW_COUNT] = [
    -12.49, -17.08, -20.11, 16.14, -26.05, -57.63, -28.58, -17.01, -12.83, -9.30, -19.05, -19.03,
    -2.88, -50.96, -15.67, -7.30, -54.86, -17.50, -52.84,
];

/// Where the bar values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Figure3Source {
    /// Percentage effects as published with the study.
    #[default]
    Published,
    /// Percentage effects of the current model run.
    Computed,
}

impl Figure3Source {
    /// Parse a source name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "published" => Some(Self::Published),
            "computed" => Some(Self::Computed),
            _ => None,
        }
    }
}

/// Percentage effects in table order (whole market first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectTable {
    /// Row labels, stars included.
    pub labels: Vec<String>,
    /// Overall window effects.
    pub overall: Vec<f64>,
    /// First-wave effects.
    pub first_wave: Vec<f64>,
    /// Recovery-phase effects.
    pub recovery: Vec<f64>,
}

impl EffectTable {
    /// The published table.
    pub fn published() -> Self {
        Self {
            labels: PUBLISHED_LABELS.iter().map(|s| s.to_string()).collect(),
            overall: PUBLISHED_OVERALL.to_vec(),
            first_wave: PUBLISHED_FIRST_WAVE.to_vec(),
            recovery: PUBLISHED_RECOVERY.to_vec(),
        }
    }

    /// Effects `100·(exp(β)−1)` of the log-response fits in `results`.
    ///
    /// A row is starred `*` when neither the Overall nor the First-wave effect
    /// is significant, and `**` when the Recovery effect is not; a row with
    /// both gets `*/**`.
    pub fn from_study(results: &StudyResults) -> Result<Self> {
        let scopes = std::iter::once((ModelScope::WholeMarket, WHOLE_MARKET_LABEL)).chain(
            INDUSTRIES
                .iter()
                .map(|name| (ModelScope::Industry(name.to_string()), short_label(name))),
        );

        let mut table = Self {
            labels: Vec::with_capacity(ROW_COUNT),
            overall: Vec::with_capacity(ROW_COUNT),
            first_wave: Vec::with_capacity(ROW_COUNT),
            recovery: Vec::with_capacity(ROW_COUNT),
        };
        for (scope, label) in scopes {
            let fit = |w| results.get(&scope, w, Response::LogCount);
            let (o, f, r) = (
                fit(AnalysisWindow::Overall)?,
                fit(AnalysisWindow::FirstWave)?,
                fit(AnalysisWindow::Recovery)?,
            );
            let early_insignificant = !o.treatment()?.is_significant(ALPHA)
                && !f.treatment()?.is_significant(ALPHA);
            let recovery_insignificant = !r.treatment()?.is_significant(ALPHA);
            let stars = match (early_insignificant, recovery_insignificant) {
                (true, true) => "*/**",
                (true, false) => "*",
                (false, true) => "**",
                (false, false) => "",
            };
            table.labels.push(format!("{label}{stars}"));
            table.overall.push(o.percent_effect()?);
            table.first_wave.push(f.percent_effect()?);
            table.recovery.push(r.percent_effect()?);
        }
        Ok(table)
    }

    fn validate(&self, stage: &str) -> Result<()> {
        let lens =
            [self.labels.len(), self.overall.len(), self.first_wave.len(), self.recovery.len()];
        if lens.iter().any(|&n| n != ROW_COUNT) {
            return Err(Error::Validation(format!(
                "results table {stage}: expected {ROW_COUNT} labels and values per window, got \
                 labels={} overall={} first_wave={} recovery={}",
                lens[0], lens[1], lens[2], lens[3]
            )));
        }
        Ok(())
    }

    fn reversed(mut self) -> Self {
        self.labels.reverse();
        self.overall.reverse();
        self.first_wave.reverse();
        self.recovery.reverse();
        self
    }
}

/// One coloured bar series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// Legend label.
    pub label: String,
    /// Fill colour.
    pub color: String,
    /// One value per row, aligned with `labels`.
    pub values: Vec<f64>,
}

/// Figure 3: horizontal grouped bars of the percentage effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsBarArtifact {
    /// Data source.
    pub source: Figure3Source,
    /// Row labels, bottom row first (the whole market ends up on top).
    pub labels: Vec<String>,
    /// Series in drawing order within a group, lowest bar first.
    pub series: Vec<BarSeries>,
    /// Legend order as indices into `series`.
    pub legend_order: Vec<usize>,
    /// Fraction of a row covered by its bars.
    pub group_width: f64,
    /// Notes printed below the chart.
    pub footnotes: Vec<String>,
}

impl ResultsBarArtifact {
    /// Assemble the chart from a table in table order (whole market first).
    pub fn from_table(table: EffectTable, source: Figure3Source) -> Result<Self> {
        table.validate("before reversal")?;
        let table = table.reversed();
        table.validate("after reversal")?;

        let EffectTable { labels, overall, first_wave, recovery } = table;
        let series = SERIES
            .iter()
            .map(|&(window, color)| BarSeries {
                label: window.label().to_string(),
                color: color.to_string(),
                values: match window {
                    AnalysisWindow::Overall => overall.clone(),
                    AnalysisWindow::FirstWave => first_wave.clone(),
                    AnalysisWindow::Recovery => recovery.clone(),
                },
            })
            .collect();

        Ok(Self {
            source,
            labels,
            series,
            legend_order: LEGEND_ORDER.to_vec(),
            group_width: GROUP_WIDTH,
            footnotes: FOOTNOTES.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Chart of the published effects.
    pub fn published() -> Result<Self> {
        Self::from_table(EffectTable::published(), Figure3Source::Published)
    }

    /// Chart of the effects of a model run.
    pub fn computed(results: &StudyResults) -> Result<Self> {
        Self::from_table(EffectTable::from_study(results)?, Figure3Source::Computed)
    }

    /// Smallest and largest bar value.
    pub fn value_range(&self) -> (f64, f64) {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_rows_are_reversed() {
        let a = ResultsBarArtifact::published().unwrap();
        assert_eq!(a.labels.len(), ROW_COUNT);
        assert_eq!(a.labels[ROW_COUNT - 1], WHOLE_MARKET_LABEL);
        assert_eq!(a.labels[0], "Electricity, gas, steam & air conditioning supply");
        let overall = &a.series[2];
        assert_eq!(overall.label, "Overall");
        assert_eq!(overall.values[ROW_COUNT - 1], -29.17);
        assert_eq!(overall.values[0], -42.99);
        assert_eq!(a.series[0].label, "Recovery phase");
        assert_eq!(a.series[0].values[ROW_COUNT - 4], 16.14);
        assert!(a.series.iter().all(|s| s.values.len() == ROW_COUNT));
        let legend: Vec<&str> =
            a.legend_order.iter().map(|&i| a.series[i].label.as_str()).collect();
        assert_eq!(legend, ["Overall", "First wave", "Recovery phase"]);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let mut t = EffectTable::published();
        t.recovery.pop();
        let err = ResultsBarArtifact::from_table(t, Figure3Source::Published).unwrap_err();
        assert!(err.to_string().contains("recovery=18"), "{err}");
    }

    #[test]
    fn value_range_spans_published_values() {
        let (lo, hi) = ResultsBarArtifact::published().unwrap().value_range();
        assert_eq!(lo, -82.53);
        assert_eq!(hi, 16.14);
    }

    #[test]
    fn source_names() {
        assert_eq!(Figure3Source::parse("computed"), Some(Figure3Source::Computed));
        assert_eq!(Figure3Source::default(), Figure3Source::Published);
        assert_eq!(Figure3Source::parse("other"), None);
    }
}
