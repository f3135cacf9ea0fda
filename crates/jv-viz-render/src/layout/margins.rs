use crate::canvas::Canvas;
use crate::layout::axes::Axis;
use crate::primitives::TextStyle;

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Space taken around a plot area by its ticks, labels and title.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decorations {
    pub left: f64,
    pub bottom: f64,
    pub top: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Manual placement.
    pub fn manual(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Shrink by the given insets, keeping a minimal drawable size.
    pub fn inset(&self, left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left: self.left + left,
            top: self.top + top,
            width: (self.width - left - right).max(50.0),
            height: (self.height - top - bottom).max(50.0),
        }
    }
}

/// Measure the decorations of an axes pair: y tick labels and rotated y
/// label on the left, x tick labels and x label below, optional title above.
pub fn decorations(
    canvas: &Canvas,
    x_axis: &Axis,
    y_axis: &Axis,
    tick_size: f64,
    label_size: f64,
    tick_length: f64,
    title_size: Option<f64>,
) -> Decorations {
    let tick_style = TextStyle::sized(tick_size);
    let pad = 0.35 * tick_size;

    let max_tick_w = y_axis
        .tick_labels
        .iter()
        .map(|l| canvas.measure_text(l, &tick_style).width)
        .fold(0.0_f64, f64::max);
    let mut left = tick_length + pad + max_tick_w;
    if !y_axis.label.is_empty() {
        left += pad + label_size * 1.2;
    }

    let mut bottom = tick_length + pad + tick_size * 1.2;
    if !x_axis.label.is_empty() {
        bottom += pad + label_size * 1.2;
    }

    let top = title_size.map_or(0.0, |s| s * 1.6);
    Decorations { left, bottom, top }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::axes::TickFormat;

    #[test]
    fn decorations_grow_with_labels() {
        let c = Canvas::new(100.0, 100.0);
        let x = Axis::auto_linear(0.0, 50.0, 0.05, 6, TickFormat::Plain);
        let y = Axis::auto_linear(0.0, 60_000.0, 0.05, 6, TickFormat::Plain);
        let bare = decorations(&c, &x, &y, 10.0, 10.0, 3.5, None);
        let labelled = decorations(
            &c,
            &x.clone().with_label("Weeks of the year"),
            &y.clone().with_label("Vacancies per week"),
            10.0,
            10.0,
            3.5,
            Some(16.0),
        );
        assert!(labelled.left > bare.left);
        assert!(labelled.bottom > bare.bottom);
        assert_eq!(bare.top, 0.0);
        assert!(labelled.top > 16.0);
    }

    #[test]
    fn inset_keeps_minimum_size() {
        let a = PlotArea::manual(0.0, 0.0, 100.0, 80.0);
        let b = a.inset(10.0, 5.0, 10.0, 5.0);
        assert_eq!(b, PlotArea::manual(10.0, 5.0, 80.0, 70.0));
        assert_eq!(a.inset(90.0, 0.0, 90.0, 0.0).width, 50.0);
        assert_eq!(b.right(), 90.0);
        assert_eq!(b.bottom(), 75.0);
    }
}
