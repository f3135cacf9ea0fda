//! Figure 2: the 6×3 grid of industry panels.

use serde::{Deserialize, Serialize};

use jv_core::study::INDUSTRIES;
use jv_core::{IndustryRecord, Result};

use crate::weekly::WeeklyChartArtifact;

/// Grid shape of Figure 2.
pub const GRID_ROWS: usize = 6;
/// Grid columns of Figure 2.
pub const GRID_COLS: usize = 3;
/// Columns of the shared legend below the grid.
pub const LEGEND_COLUMNS: usize = 7;

/// Figure 2: one weekly panel per industry, filled row by row, with a single
/// legend below the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryGridArtifact {
    /// Panel rows.
    pub rows: usize,
    /// Panel columns.
    pub cols: usize,
    /// Columns of the shared legend.
    pub legend_columns: usize,
    /// Panels in row-major order.
    pub panels: Vec<WeeklyChartArtifact>,
}

impl IndustryGridArtifact {
    /// Build all eighteen panels in the fixed industry order.
    pub fn from_rows(rows: &[IndustryRecord]) -> Result<Self> {
        let panels = INDUSTRIES
            .iter()
            .map(|industry| WeeklyChartArtifact::industry(rows, industry))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("built {} industry panels", panels.len());
        Ok(Self { rows: GRID_ROWS, cols: GRID_COLS, legend_columns: LEGEND_COLUMNS, panels })
    }

    /// Panel at `(row, col)`.
    pub fn panel(&self, row: usize, col: usize) -> Option<&WeeklyChartArtifact> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.panels.get(row * self.cols + col)
    }
}
