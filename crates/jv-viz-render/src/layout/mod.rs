pub mod axes;
pub mod grid;
pub mod legend;
pub mod margins;
