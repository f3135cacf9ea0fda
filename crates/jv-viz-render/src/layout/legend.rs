use crate::canvas::Canvas;
use crate::color::Color;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub kind: LegendKind,
}

pub enum LegendKind {
    FilledRect,
    /// Line swatch of the given width.
    Line(f64),
}

/// Where a legend goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegendPlacement {
    /// Inside the plot area, in the corner that covers the fewest data points.
    InsideBest,
    /// Centred on `center_x` with its top edge at `top`.
    Below { center_x: f64, top: f64 },
}

/// Geometry shared by measuring and drawing.
struct Metrics {
    font_size: f64,
    row_h: f64,
    swatch_w: f64,
    gap: f64,
    padding: f64,
    col_gap: f64,
}

impl Metrics {
    fn new(font_size: f64) -> Self {
        Self {
            font_size,
            row_h: font_size * 1.4,
            swatch_w: font_size * 2.0,
            gap: font_size * 0.8,
            padding: font_size * 0.5,
            col_gap: font_size * 2.0,
        }
    }

    fn text_style(&self) -> TextStyle {
        TextStyle::sized(self.font_size).anchored(TextAnchor::Start, TextBaseline::Central)
    }
}

/// Column widths of a legend laid out in `columns` columns, row by row.
fn column_widths(
    canvas: &Canvas,
    entries: &[LegendEntry],
    columns: usize,
    m: &Metrics,
) -> Vec<f64> {
    let style = m.text_style();
    let mut widths = vec![0.0_f64; columns.min(entries.len())];
    for (i, e) in entries.iter().enumerate() {
        let w = m.swatch_w + m.gap + canvas.measure_text(&e.label, &style).width;
        widths[i % columns] = widths[i % columns].max(w);
    }
    widths
}

/// Width and height of the legend box.
pub fn legend_size(
    canvas: &Canvas,
    entries: &[LegendEntry],
    font_size: f64,
    columns: usize,
) -> (f64, f64) {
    if entries.is_empty() {
        return (0.0, 0.0);
    }
    let columns = columns.max(1);
    let m = Metrics::new(font_size);
    let widths = column_widths(canvas, entries, columns, &m);
    let rows = entries.len().div_ceil(columns);
    let w = 2.0 * m.padding
        + widths.iter().sum::<f64>()
        + m.col_gap * (widths.len().saturating_sub(1)) as f64;
    let h = 2.0 * m.padding + rows as f64 * m.row_h;
    (w, h)
}

/// Corner of `area` holding a `w`×`h` box that covers the fewest `points`.
/// Ties go to upper right, upper left, lower left, lower right in that order.
pub fn best_corner(area: &PlotArea, w: f64, h: f64, points: &[(f64, f64)]) -> (f64, f64) {
    let inset = 5.0;
    let corners = [
        (area.right() - w - inset, area.top + inset),
        (area.left + inset, area.top + inset),
        (area.left + inset, area.bottom() - h - inset),
        (area.right() - w - inset, area.bottom() - h - inset),
    ];
    let covered = |&(x, y): &(f64, f64)| {
        points.iter().filter(|&&(px, py)| px >= x && px <= x + w && py >= y && py <= y + h).count()
    };
    let mut best = corners[0];
    let mut best_count = covered(&best);
    for c in &corners[1..] {
        let n = covered(c);
        if n < best_count {
            best = *c;
            best_count = n;
        }
    }
    best
}

/// Draw a legend; entries fill rows left to right. `points` are the pixel
/// positions of plotted data, used by [`LegendPlacement::InsideBest`].
#[allow(clippy::too_many_arguments)]
pub fn draw_legend(
    canvas: &mut Canvas,
    area: &PlotArea,
    entries: &[LegendEntry],
    font_size: f64,
    columns: usize,
    placement: LegendPlacement,
    points: &[(f64, f64)],
) {
    if entries.is_empty() {
        return;
    }
    let columns = columns.max(1);
    let m = Metrics::new(font_size);
    let (legend_w, legend_h) = legend_size(canvas, entries, font_size, columns);
    let (lx, ly) = match placement {
        LegendPlacement::InsideBest => best_corner(area, legend_w, legend_h, points),
        LegendPlacement::Below { center_x, top } => (center_x - legend_w / 2.0, top),
    };

    let frame = Style {
        fill: Some(Color::WHITE.with_alpha(0.8)),
        stroke: Some(Color::rgb(0xcc, 0xcc, 0xcc)),
        stroke_width: 0.8,
    };
    canvas.rect(lx, ly, legend_w, legend_h, &frame);

    let widths = column_widths(canvas, entries, columns, &m);
    let text_style = m.text_style();
    for (i, entry) in entries.iter().enumerate() {
        let col = i % columns;
        let row = i / columns;
        let sx = lx + m.padding + widths[..col].iter().sum::<f64>() + m.col_gap * col as f64;
        let ey = ly + m.padding + row as f64 * m.row_h + m.row_h / 2.0;

        match entry.kind {
            LegendKind::FilledRect => {
                let sh = m.font_size * 0.7;
                canvas.rect(sx, ey - sh / 2.0, m.swatch_w, sh, &Style::filled(entry.color));
            }
            LegendKind::Line(width) => {
                canvas.line(sx, ey, sx + m.swatch_w, ey, &LineStyle::solid(entry.color, width));
            }
        }

        canvas.text(sx + m.swatch_w + m.gap, ey, &entry.label, &text_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<LegendEntry> {
        (0..n)
            .map(|i| LegendEntry {
                label: format!("entry {i}"),
                color: Color::BLACK,
                kind: LegendKind::Line(1.5),
            })
            .collect()
    }

    #[test]
    fn columns_shape_the_box() {
        let c = Canvas::new(500.0, 500.0);
        let (w1, h1) = legend_size(&c, &entries(7), 10.0, 1);
        let (w7, h7) = legend_size(&c, &entries(7), 10.0, 7);
        assert!(w7 > 5.0 * w1);
        assert!(h1 > 4.0 * h7);
        assert_eq!(legend_size(&c, &[], 10.0, 3), (0.0, 0.0));
    }

    #[test]
    fn best_corner_avoids_data() {
        let area = PlotArea::manual(0.0, 0.0, 100.0, 100.0);
        // Points crowd the upper half.
        let pts: Vec<(f64, f64)> = (0..100).map(|i| (i as f64, 10.0)).collect();
        let (x, y) = best_corner(&area, 30.0, 20.0, &pts);
        assert_eq!(x, 5.0);
        assert_eq!(y, 75.0);
        // Empty plot: upper right.
        assert_eq!(best_corner(&area, 30.0, 20.0, &[]), (65.0, 5.0));
    }

    #[test]
    fn below_legend_is_centered() {
        let mut c = Canvas::new(400.0, 400.0);
        let area = PlotArea::manual(0.0, 0.0, 400.0, 300.0);
        draw_legend(
            &mut c,
            &area,
            &entries(3),
            10.0,
            3,
            LegendPlacement::Below { center_x: 200.0, top: 320.0 },
            &[],
        );
        let svg = c.finish_svg();
        assert!(svg.contains("entry 0") && svg.contains("entry 2"));
        assert!(svg.contains(r#"y="320.00""#));
    }
}
