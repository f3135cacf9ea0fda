pub mod industry_grid;
pub mod results_bar;
pub mod weekly;

mod axes_draw;
