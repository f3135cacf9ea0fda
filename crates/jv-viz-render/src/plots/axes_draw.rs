use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::*;

/// Sizes used to decorate one axes pair.
#[derive(Debug, Clone, Copy)]
pub struct AxesStyle {
    pub tick_size: f64,
    pub label_size: f64,
    pub tick_length: f64,
    pub line_width: f64,
}

impl AxesStyle {
    pub fn from_config(config: &VizConfig) -> Self {
        Self {
            tick_size: config.font.tick_size,
            label_size: config.font.label_size,
            tick_length: config.axes.tick_length,
            line_width: config.axes.line_width,
        }
    }
}

/// Grid lines at the major ticks; draw before the data.
pub fn draw_grid(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    color: Color,
    width: f64,
) {
    let style = LineStyle::solid(color, width);
    for &val in &x_axis.tick_positions {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        canvas.line(px, area.top, px, area.bottom(), &style);
    }
    for &val in &y_axis.tick_positions {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        canvas.line(area.left, py, area.right(), py, &style);
    }
}

/// Draw a box frame with outward ticks on the bottom and left spines, tick
/// labels and axis labels.
pub fn draw_axes(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    style: &AxesStyle,
) {
    let frame_color = Color::BLACK;
    let frame_style = LineStyle::solid(frame_color, style.line_width);
    let tick_line = LineStyle::solid(frame_color, style.line_width);
    let tl = style.tick_length;
    let pad = 0.35 * style.tick_size;

    // Frame rectangle
    canvas.line(area.left, area.top, area.right(), area.top, &frame_style);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), &frame_style);
    canvas.line(area.left, area.top, area.left, area.bottom(), &frame_style);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), &frame_style);

    // --- X axis ticks ---
    let x_label_style = TextStyle::sized(style.tick_size)
        .anchored(TextAnchor::Middle, TextBaseline::Hanging);
    for (i, &val) in x_axis.tick_positions.iter().enumerate() {
        let px = x_axis.data_to_pixel(val, area.left, area.right());
        if px < area.left - 0.5 || px > area.right() + 0.5 {
            continue;
        }
        canvas.line(px, area.bottom(), px, area.bottom() + tl, &tick_line);
        if let Some(label) = x_axis.tick_labels.get(i) {
            canvas.text(px, area.bottom() + tl + pad, label, &x_label_style);
        }
    }

    // --- Y axis ticks ---
    let y_label_style =
        TextStyle::sized(style.tick_size).anchored(TextAnchor::End, TextBaseline::Central);
    let mut max_tick_w = 0.0_f64;
    for (i, &val) in y_axis.tick_positions.iter().enumerate() {
        let py = y_axis.data_to_pixel(val, area.bottom(), area.top);
        if py < area.top - 0.5 || py > area.bottom() + 0.5 {
            continue;
        }
        canvas.line(area.left, py, area.left - tl, py, &tick_line);
        if let Some(label) = y_axis.tick_labels.get(i) {
            max_tick_w = max_tick_w.max(canvas.measure_text(label, &y_label_style).width);
            canvas.text(area.left - tl - pad, py, label, &y_label_style);
        }
    }

    // --- Axis labels ---
    let label_style = TextStyle::sized(style.label_size);
    if !x_axis.label.is_empty() {
        let y = area.bottom() + tl + pad + style.tick_size * 1.2 + pad;
        canvas.text(
            area.left + area.width / 2.0,
            y,
            &x_axis.label,
            &label_style.clone().anchored(TextAnchor::Middle, TextBaseline::Hanging),
        );
    }
    if !y_axis.label.is_empty() {
        let x = area.left - tl - pad - max_tick_w - pad - style.label_size * 0.6;
        canvas.text_rotated(
            x,
            area.top + area.height / 2.0,
            &y_axis.label,
            &label_style.anchored(TextAnchor::Middle, TextBaseline::Central),
            -90.0,
        );
    }
}

/// Centred title above a plot area.
pub fn draw_title(canvas: &mut Canvas, area: &PlotArea, title: &str, size: f64) {
    let style = TextStyle::sized(size).anchored(TextAnchor::Middle, TextBaseline::Alphabetic);
    canvas.text(area.left + area.width / 2.0, area.top - 0.5 * size, title, &style);
}
