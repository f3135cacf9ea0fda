use jv_viz::results_bar::ResultsBarArtifact;

use crate::RenderError;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::{Axis, TickFormat};
use crate::layout::legend::{LegendEntry, LegendKind, LegendPlacement, draw_legend, legend_size};
use crate::layout::margins::{PlotArea, decorations};
use crate::plots::axes_draw::{AxesStyle, draw_axes, draw_grid};
use crate::primitives::*;

/// Figure 3: horizontal grouped bars, percentage x axis, legend and
/// footnotes below the plot.
pub fn render(artifact: &ResultsBarArtifact, config: &VizConfig) -> crate::Result<String> {
    let n_rows = artifact.labels.len();
    if n_rows == 0 || artifact.series.is_empty() {
        return Err(RenderError::Layout("results chart has no rows".into()));
    }
    for s in &artifact.series {
        if s.values.len() != n_rows {
            return Err(RenderError::Layout(format!(
                "series '{}' has {} values for {n_rows} rows",
                s.label,
                s.values.len()
            )));
        }
    }
    if let Some(&bad) = artifact.legend_order.iter().find(|&&i| i >= artifact.series.len()) {
        return Err(RenderError::Layout(format!("legend refers to missing series {bad}")));
    }

    let fig = &config.figure3;
    let mut canvas = Canvas::new(fig.figsize.width_pt(), fig.figsize.height_pt());

    // Bars start at zero, so zero is always in range.
    let (lo, hi) = artifact.value_range();
    let x_axis = Axis::auto_linear(
        lo.min(0.0),
        hi.max(0.0),
        config.axes.margin,
        config.axes.target_ticks,
        TickFormat::Percent,
    );
    let y_axis = Axis::categorical(&artifact.labels);

    let style = AxesStyle { tick_size: fig.tick_size, ..AxesStyle::from_config(config) };
    let deco = decorations(
        &canvas,
        &x_axis,
        &y_axis,
        style.tick_size,
        style.label_size,
        style.tick_length,
        None,
    );

    let entries = artifact
        .legend_order
        .iter()
        .map(|&i| {
            let s = &artifact.series[i];
            Ok(LegendEntry {
                label: s.label.clone(),
                color: Color::from_artifact(&s.color)?,
                kind: LegendKind::FilledRect,
            })
        })
        .collect::<crate::Result<Vec<_>>>()?;
    let (_, legend_h) = legend_size(&canvas, &entries, fig.legend_size, entries.len());
    let footnote_line = fig.footnote_size * 1.4;
    let gap = fig.legend_size * 0.5;
    let pad = fig.tick_size * 0.5;

    let area = PlotArea::manual(0.0, 0.0, canvas.width, canvas.height).inset(
        pad + deco.left,
        pad,
        pad,
        pad + deco.bottom + gap + legend_h + gap + footnote_line * artifact.footnotes.len() as f64,
    );

    if fig.grid {
        draw_grid(&mut canvas, &area, &x_axis, &y_axis, config.grid.color, config.grid.width);
    }

    // Series stack upwards within a row: the first series is the lowest bar.
    let bar_h = artifact.group_width / artifact.series.len() as f64;
    let zero = x_axis.data_to_pixel(0.0, area.left, area.right());
    for (j, series) in artifact.series.iter().enumerate() {
        let fill = Style::filled(Color::from_artifact(&series.color)?);
        for (row, &value) in series.values.iter().enumerate() {
            let centre = row as f64 - artifact.group_width / 2.0 + (j as f64 + 0.5) * bar_h;
            let top = y_axis.data_to_pixel(centre + bar_h / 2.0, area.bottom(), area.top);
            let bottom = y_axis.data_to_pixel(centre - bar_h / 2.0, area.bottom(), area.top);
            let end = x_axis.data_to_pixel(value, area.left, area.right());
            canvas.rect(zero.min(end), top, (end - zero).abs(), bottom - top, &fill);
        }
    }

    draw_axes(&mut canvas, &area, &x_axis, &y_axis, &style);

    let legend_top = area.bottom() + deco.bottom + gap;
    draw_legend(
        &mut canvas,
        &area,
        &entries,
        fig.legend_size,
        entries.len(),
        LegendPlacement::Below { center_x: area.left + area.width / 2.0, top: legend_top },
        &[],
    );

    let note_style =
        TextStyle::sized(fig.footnote_size).anchored(TextAnchor::Start, TextBaseline::Hanging);
    let mut y = legend_top + legend_h + gap;
    for note in &artifact.footnotes {
        canvas.text(canvas.width / 2.0, y, note, &note_style);
        y += footnote_line;
    }

    Ok(canvas.finish_svg())
}
