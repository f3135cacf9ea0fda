//! `jobvac figures`: render Figure 1, 2 and 3 to image files.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use jv_inference::{CovarianceType, StudyResults, run_models};
use jv_viz::{Figure3Source, IndustryGridArtifact, ResultsBarArtifact, WeeklyChartArtifact};
use jv_viz_render::config::{VizConfig, load_config};
use jv_viz_render::plots;

use crate::inputs::{self, Inputs};
use crate::{InputArgs, RenderArgs};

const FORMATS: [&str; 3] = ["png", "svg", "pdf"];

/// Validated figure options shared by `figures` and `all`.
pub(crate) struct FigureOptions {
    pub out_dir: PathBuf,
    pub format: String,
    pub config: VizConfig,
    pub source: Figure3Source,
    pub cov: CovarianceType,
}

impl FigureOptions {
    pub(crate) fn from_args(render: &RenderArgs, cov: &str) -> Result<Self> {
        let format = render.format.to_ascii_lowercase();
        if !FORMATS.contains(&format.as_str()) {
            anyhow::bail!("unknown format '{}' (expected png, svg or pdf)", render.format);
        }
        let config = match &render.config {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => VizConfig::default(),
        };
        Ok(Self {
            out_dir: render.out_dir.clone(),
            format,
            config,
            source: parse_source(&render.figure3_source)?,
            cov: crate::models::parse_cov(cov)?,
        })
    }
}

pub(crate) fn parse_source(name: &str) -> Result<Figure3Source> {
    Figure3Source::parse(name).ok_or_else(|| {
        anyhow::anyhow!("unknown figure 3 source '{name}' (expected published or computed)")
    })
}

/// Render the three figures into `out_dir`.
///
/// Computed Figure 3 reuses `results` when the models were already fitted.
pub(crate) fn cmd_figures(
    inputs: &Inputs,
    opts: &FigureOptions,
    results: Option<&StudyResults>,
) -> Result<()> {
    std::fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("failed to create {}", opts.out_dir.display()))?;

    let figure1 = WeeklyChartArtifact::totals(&inputs.totals)?;
    write_figure("figure1", plots::weekly::render(&figure1, &opts.config)?, opts)?;

    let figure2 = IndustryGridArtifact::from_rows(&inputs.industries)?;
    write_figure("figure2", plots::industry_grid::render(&figure2, &opts.config)?, opts)?;

    let figure3 = results_bar(inputs, opts.source, opts.cov, results)?;
    write_figure("figure3", plots::results_bar::render(&figure3, &opts.config)?, opts)?;
    Ok(())
}

fn results_bar(
    inputs: &Inputs,
    source: Figure3Source,
    cov: CovarianceType,
    results: Option<&StudyResults>,
) -> Result<ResultsBarArtifact> {
    let artifact = match (source, results) {
        (Figure3Source::Published, _) => ResultsBarArtifact::published()?,
        (Figure3Source::Computed, Some(results)) => ResultsBarArtifact::computed(results)?,
        (Figure3Source::Computed, None) => {
            let results = run_models(&inputs.totals, &inputs.industries, cov)?;
            ResultsBarArtifact::computed(&results)?
        }
    };
    Ok(artifact)
}

fn write_figure(kind: &str, svg: String, opts: &FigureOptions) -> Result<PathBuf> {
    let stem = jv_viz_render::file_stem(kind)?;
    let path = opts.out_dir.join(format!("{stem}.{}", opts.format));
    let bytes = jv_viz_render::encode(svg, &opts.format, &opts.config)
        .with_context(|| format!("failed to encode {stem} as {}", opts.format))?;
    write_bytes(&path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "figure written");
    Ok(path)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

/// Build a figure's plot artifact, loading only the tables it needs.
pub(crate) fn artifact_json(
    kind: &str,
    input: &InputArgs,
    source: Figure3Source,
    cov: CovarianceType,
) -> Result<serde_json::Value> {
    let value = match kind {
        "figure1" => {
            let totals = inputs::load_totals(&input.totals)?;
            serde_json::to_value(WeeklyChartArtifact::totals(&totals)?)?
        }
        "figure2" => {
            let industries = inputs::load_industries(&input.industries)?;
            serde_json::to_value(IndustryGridArtifact::from_rows(&industries)?)?
        }
        "figure3" => {
            let artifact = match source {
                Figure3Source::Published => ResultsBarArtifact::published()?,
                Figure3Source::Computed => {
                    let inputs = Inputs::load(input)?;
                    results_bar(&inputs, source, cov, None)?
                }
            };
            serde_json::to_value(artifact)?
        }
        other => anyhow::bail!("unknown artifact '{other}' (expected figure1, figure2 or figure3)"),
    };
    Ok(value)
}
