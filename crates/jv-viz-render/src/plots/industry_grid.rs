use jv_viz::industry_grid::IndustryGridArtifact;

use crate::RenderError;
use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::grid::{GridLayout, SubplotParams};
use crate::layout::legend::{LegendPlacement, draw_legend};
use crate::layout::margins::decorations;
use crate::plots::axes_draw::AxesStyle;
use crate::plots::weekly::{draw_panel, legend_entries, panel_axes};

/// Figure 2: the industry panels row by row, one shared legend below.
pub fn render(artifact: &IndustryGridArtifact, config: &VizConfig) -> crate::Result<String> {
    let cells = artifact.rows * artifact.cols;
    if artifact.panels.is_empty() || artifact.panels.len() > cells {
        return Err(RenderError::Layout(format!(
            "{} panels do not fit a {}x{} grid",
            artifact.panels.len(),
            artifact.rows,
            artifact.cols
        )));
    }

    let fig = &config.figure2;
    let mut canvas = Canvas::new(fig.figsize.width_pt(), fig.figsize.height_pt());
    let params = SubplotParams { wspace: fig.wspace, hspace: fig.hspace, ..Default::default() };
    let grid = GridLayout::new(canvas.width, canvas.height, artifact.rows, artifact.cols, params);
    let style = AxesStyle::from_config(config);

    let mut below = 0.0_f64;
    for (panel, area) in artifact.panels.iter().zip(&grid.cells) {
        let (x_axis, y_axis) = panel_axes(panel, config)?;
        draw_panel(&mut canvas, area, panel, &x_axis, &y_axis, &style, Some(fig.title_size))?;
        let deco = decorations(
            &canvas,
            &x_axis,
            &y_axis,
            style.tick_size,
            style.label_size,
            style.tick_length,
            None,
        );
        below = below.max(deco.bottom);
    }

    // The legend mirrors the handles of the last panel.
    if let Some(last) = artifact.panels.last() {
        let top = grid.bottom() + below + fig.legend_size * 0.5;
        let center_x = canvas.width / 2.0;
        draw_legend(
            &mut canvas,
            &grid.cells[0],
            &legend_entries(last)?,
            fig.legend_size,
            artifact.legend_columns,
            LegendPlacement::Below { center_x, top },
            &[],
        );
    }
    log::debug!("rendered {} industry panels", artifact.panels.len());
    Ok(canvas.finish_svg())
}
