//! # jv-viz-render
//!
//! Renders the jobvac plot artifacts to SVG with a small immediate-mode
//! canvas, then rasterises to PNG (`png` feature, default) or converts to
//! PDF (`pdf` feature).

pub mod canvas;
pub mod color;
pub mod config;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;

use config::VizConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown artifact kind: {0}")]
    UnknownKind(String),
    #[error("unsupported output format: {0}")]
    UnknownFormat(String),
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid colour '{0}' (expected #RRGGBB)")]
    Color(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
    #[cfg(feature = "pdf")]
    #[error("PDF conversion error: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Artifact kinds understood by [`render_svg`], in figure order.
pub const KINDS: [&str; 3] = ["figure1", "figure2", "figure3"];

/// Output file stem of a figure kind (`figure2` → `Figure2`).
pub fn file_stem(kind: &str) -> Result<&'static str> {
    match kind {
        "figure1" => Ok("Figure1"),
        "figure2" => Ok("Figure2"),
        "figure3" => Ok("Figure3"),
        other => Err(RenderError::UnknownKind(other.to_string())),
    }
}

/// Render an artifact JSON to SVG string.
pub fn render_svg(artifact_json: &str, kind: &str, config: &VizConfig) -> Result<String> {
    let svg = match kind {
        "figure1" => {
            let art: jv_viz::WeeklyChartArtifact = serde_json::from_str(artifact_json)?;
            plots::weekly::render(&art, config)?
        }
        "figure2" => {
            let art: jv_viz::IndustryGridArtifact = serde_json::from_str(artifact_json)?;
            plots::industry_grid::render(&art, config)?
        }
        "figure3" => {
            let art: jv_viz::ResultsBarArtifact = serde_json::from_str(artifact_json)?;
            plots::results_bar::render(&art, config)?
        }
        other => return Err(RenderError::UnknownKind(other.to_string())),
    };
    Ok(svg)
}

/// Encode a rendered SVG in `format` (`svg`, `png`, `pdf`).
#[cfg_attr(not(feature = "png"), allow(unused_variables))]
pub fn encode(svg: String, format: &str, config: &VizConfig) -> Result<Vec<u8>> {
    match format {
        "svg" => Ok(svg.into_bytes()),
        #[cfg(feature = "png")]
        "png" => output::png::svg_to_png(&svg, config.output.dpi),
        #[cfg(feature = "pdf")]
        "pdf" => output::pdf::svg_to_pdf(&svg),
        other => Err(RenderError::UnknownFormat(other.to_string())),
    }
}

/// Render an artifact JSON to bytes in the specified format.
pub fn render_to_bytes(
    artifact_json: &str,
    kind: &str,
    format: &str,
    config: &VizConfig,
) -> Result<Vec<u8>> {
    encode(render_svg(artifact_json, kind, config)?, format, config)
}

/// Render an artifact JSON to a file (format inferred from extension).
pub fn render_to_file(
    artifact_json: &str,
    kind: &str,
    path: &std::path::Path,
    config: &VizConfig,
) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("svg");
    let bytes = render_to_bytes(artifact_json, kind, ext, config)?;
    std::fs::write(path, bytes)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_and_format() {
        let config = VizConfig::default();
        assert!(matches!(render_svg("{}", "pulls", &config), Err(RenderError::UnknownKind(_))));
        assert!(matches!(
            encode("<svg/>".into(), "gif", &config),
            Err(RenderError::UnknownFormat(_))
        ));
        assert!(file_stem("figure4").is_err());
    }

    #[test]
    fn malformed_artifact_json() {
        let err = render_svg("{\"labels\": 3}", "figure3", &VizConfig::default()).unwrap_err();
        assert!(matches!(err, RenderError::Deserialize(_)));
    }

    #[test]
    fn stems_follow_kinds() {
        let stems: Vec<_> = KINDS.iter().map(|k| file_stem(k).unwrap()).collect();
        assert_eq!(stems, ["Figure1", "Figure2", "Figure3"]);
    }
}
