use crate::layout::margins::PlotArea;

/// Figure-fraction placement of a subplot grid, as in a plotting library's
/// subplot parameters: edges are fractions of the figure measured from the
/// left / bottom, gaps are fractions of the mean cell size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubplotParams {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub wspace: f64,
    pub hspace: f64,
}

impl Default for SubplotParams {
    fn default() -> Self {
        Self { left: 0.125, right: 0.9, bottom: 0.11, top: 0.88, wspace: 0.2, hspace: 0.2 }
    }
}

/// `rows`×`cols` equally sized cells, row-major.
#[derive(Debug, Clone)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<PlotArea>,
}

impl GridLayout {
    pub fn new(fig_w: f64, fig_h: f64, rows: usize, cols: usize, p: SubplotParams) -> Self {
        let (rows_f, cols_f) = (rows.max(1) as f64, cols.max(1) as f64);
        let total_w = (p.right - p.left) * fig_w;
        let total_h = (p.top - p.bottom) * fig_h;
        let cell_w = total_w / (cols_f + p.wspace * (cols_f - 1.0));
        let cell_h = total_h / (rows_f + p.hspace * (rows_f - 1.0));
        let x0 = p.left * fig_w;
        let y0 = (1.0 - p.top) * fig_h;

        let mut cells = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                cells.push(PlotArea::manual(
                    x0 + c as f64 * cell_w * (1.0 + p.wspace),
                    y0 + r as f64 * cell_h * (1.0 + p.hspace),
                    cell_w,
                    cell_h,
                ));
            }
        }
        Self { rows, cols, cells }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&PlotArea> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// Bottom edge of the lowest row.
    pub fn bottom(&self) -> f64 {
        self.cells.iter().map(PlotArea::bottom).fold(0.0, f64::max)
    }
}
