use jv_viz::weekly::WeeklyChartArtifact;

use crate::RenderError;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::{Axis, TickFormat};
use crate::layout::grid::{GridLayout, SubplotParams};
use crate::layout::legend::{LegendEntry, LegendKind, LegendPlacement, draw_legend};
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::{AxesStyle, draw_axes, draw_title};
use crate::primitives::LineStyle;

/// Figure 1: one weekly chart with its legend inside the plot.
pub fn render(artifact: &WeeklyChartArtifact, config: &VizConfig) -> crate::Result<String> {
    let size = config.figure1.figsize;
    let mut canvas = Canvas::new(size.width_pt(), size.height_pt());
    let grid = GridLayout::new(canvas.width, canvas.height, 1, 1, SubplotParams::default());
    let area = grid.cells[0];

    let (x_axis, y_axis) = panel_axes(artifact, config)?;
    let points = draw_panel(
        &mut canvas,
        &area,
        artifact,
        &x_axis,
        &y_axis,
        &AxesStyle::from_config(config),
        None,
    )?;
    draw_legend(
        &mut canvas,
        &area,
        &legend_entries(artifact)?,
        config.font.legend_size,
        1,
        LegendPlacement::InsideBest,
        &points,
    );
    Ok(canvas.finish_svg())
}

/// Axes of a weekly panel. The x range covers the curves and the event
/// markers, the y range the curves only.
pub(crate) fn panel_axes(
    artifact: &WeeklyChartArtifact,
    config: &VizConfig,
) -> crate::Result<(Axis, Axis)> {
    if artifact.curves.is_empty() {
        return Err(RenderError::Layout("weekly chart has no curves".into()));
    }
    for c in &artifact.curves {
        if c.x.len() != c.y.len() {
            return Err(RenderError::Layout(format!(
                "curve '{}' has {} x values but {} y values",
                c.label,
                c.x.len(),
                c.y.len()
            )));
        }
    }
    let (x_lo, x_hi) = bounds(
        artifact
            .curves
            .iter()
            .flat_map(|c| c.x.iter().copied())
            .chain(artifact.markers.iter().map(|m| m.week)),
    );
    let (y_lo, y_hi) = bounds(artifact.curves.iter().flat_map(|c| c.y.iter().copied()));

    let margin = config.axes.margin;
    let ticks = config.axes.target_ticks;
    let x = Axis::auto_linear(x_lo, x_hi, margin, ticks, TickFormat::Plain)
        .with_label(&artifact.x_label);
    let y = Axis::auto_linear(y_lo, y_hi, margin, ticks, TickFormat::Plain)
        .with_label(&artifact.y_label);
    Ok((x, y))
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Draw curves, event lines, frame and optional title into `area`.
/// Returns the pixel positions of the curve points.
pub(crate) fn draw_panel(
    canvas: &mut Canvas,
    area: &PlotArea,
    artifact: &WeeklyChartArtifact,
    x_axis: &Axis,
    y_axis: &Axis,
    style: &AxesStyle,
    title_size: Option<f64>,
) -> crate::Result<Vec<(f64, f64)>> {
    let mut all_points = Vec::new();
    canvas.push_clip(area.left, area.top, area.width, area.height);
    for curve in &artifact.curves {
        let points: Vec<(f64, f64)> = curve
            .x
            .iter()
            .zip(&curve.y)
            .map(|(&x, &y)| {
                (
                    x_axis.data_to_pixel(x, area.left, area.right()),
                    y_axis.data_to_pixel(y, area.bottom(), area.top),
                )
            })
            .collect();
        let color = Color::from_artifact(&curve.color)?;
        canvas.polyline(&points, &LineStyle::solid(color, curve.line_width));
        all_points.extend(points);
    }
    for marker in &artifact.markers {
        let px = x_axis.data_to_pixel(marker.week, area.left, area.right());
        let color = Color::from_artifact(&marker.color)?;
        canvas.line(px, area.top, px, area.bottom(), &LineStyle::solid(color, marker.line_width));
    }
    canvas.pop_clip();

    draw_axes(canvas, area, x_axis, y_axis, style);
    if let (Some(title), Some(size)) = (&artifact.title, title_size) {
        draw_title(canvas, area, title, size);
    }
    Ok(all_points)
}

/// Legend entries: the years, then the event markers.
pub(crate) fn legend_entries(artifact: &WeeklyChartArtifact) -> crate::Result<Vec<LegendEntry>> {
    artifact
        .legend_entries()
        .into_iter()
        .map(|(label, color, width)| {
            Ok(LegendEntry {
                label,
                color: Color::from_artifact(&color)?,
                kind: LegendKind::Line(width),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jv_viz::markers::event_markers;
    use jv_viz::weekly::YearCurve;

    fn artifact() -> WeeklyChartArtifact {
        let curve = |year: i32, color: &str, width: f64, level: f64| YearCurve {
            year,
            label: year.to_string(),
            color: color.into(),
            line_width: width,
            x: (0..30).map(|i| 2.0 + i as f64 * 49.0 / 29.0).collect(),
            y: (0..30).map(|i| level + 100.0 * (i as f64 / 5.0).sin()).collect(),
        };
        WeeklyChartArtifact {
            title: None,
            x_label: "Weeks of the year".into(),
            y_label: "Vacancies per week".into(),
            curves: vec![
                curve(2018, "#D0C9CC", 1.5, 50_000.0),
                curve(2019, "#8A8285", 1.5, 52_000.0),
                curve(2020, "#D81B60", 2.0, 30_000.0),
            ],
            markers: event_markers(),
        }
    }

    #[test]
    fn figure1_contains_curves_markers_and_labels() {
        let svg = render(&artifact(), &VizConfig::default()).unwrap();
        assert!(svg.contains(r#"width="864""#));
        assert_eq!(svg.matches("<polyline").count(), 3);
        assert!(svg.contains(r##"stroke="#d81b60" stroke-width="2.00""##));
        assert!(svg.contains(r##"stroke="#25d2ff""##));
        assert!(svg.contains("Weeks of the year"));
        assert!(svg.contains("Vacancies per week"));
        assert!(svg.contains("Second lockdown starts"));
        assert!(svg.contains("clip-path"));
    }

    #[test]
    fn axes_cover_markers_and_curves() {
        let (x, y) = panel_axes(&artifact(), &VizConfig::default()).unwrap();
        assert!(x.min < 2.0 && x.max > 51.0);
        assert!(y.min < 29_900.0 && y.max > 52_100.0);
        assert_eq!(x.label, "Weeks of the year");
    }

    #[test]
    fn bad_colour_or_shape_is_an_error() {
        let mut a = artifact();
        a.curves[0].color = "grey".into();
        assert!(matches!(render(&a, &VizConfig::default()), Err(RenderError::Color(_))));

        let mut b = artifact();
        b.curves[1].y.pop();
        assert!(matches!(render(&b, &VizConfig::default()), Err(RenderError::Layout(_))));

        let mut c = artifact();
        c.curves.clear();
        assert!(render(&c, &VizConfig::default()).is_err());
    }
}
