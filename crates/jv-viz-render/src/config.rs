use std::path::Path;

use serde::Deserialize;

use crate::color::Color;

/// Points per inch.
pub const PT_PER_INCH: f64 = 72.0;

/// Rendering configuration (YAML or programmatic). Defaults reproduce the
/// published figures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub figure1: Figure1Config,
    pub figure2: Figure2Config,
    pub figure3: Figure3Config,
    pub output: OutputConfig,
}

/// Figure size in inches, `[width, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FigSize(pub [f64; 2]);

impl FigSize {
    pub fn width_pt(self) -> f64 {
        self.0[0] * PT_PER_INCH
    }

    pub fn height_pt(self) -> f64 {
        self.0[1] * PT_PER_INCH
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub label_size: f64,
    pub tick_size: f64,
    pub legend_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { label_size: 10.0, tick_size: 10.0, legend_size: 10.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub line_width: f64,
    pub tick_length: f64,
    /// Fraction of the data range padded on each side of an autoscaled axis.
    pub margin: f64,
    pub target_ticks: usize,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self { line_width: 0.8, tick_length: 3.5, margin: 0.05, target_ticks: 8 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub color: Color,
    pub width: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { color: Color::rgb(0xb0, 0xb0, 0xb0), width: 0.8 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Figure1Config {
    pub figsize: FigSize,
}

impl Default for Figure1Config {
    fn default() -> Self {
        Self { figsize: FigSize([12.0, 8.0]) }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Figure2Config {
    pub figsize: FigSize,
    pub title_size: f64,
    pub legend_size: f64,
    /// Gap between panels as a fraction of the mean panel width / height.
    pub wspace: f64,
    pub hspace: f64,
}

impl Default for Figure2Config {
    fn default() -> Self {
        Self {
            figsize: FigSize([27.0, 36.0]),
            title_size: 16.0,
            legend_size: 20.0,
            wspace: 0.2,
            hspace: 0.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Figure3Config {
    pub figsize: FigSize,
    pub tick_size: f64,
    pub legend_size: f64,
    pub footnote_size: f64,
    pub grid: bool,
}

impl Default for Figure3Config {
    fn default() -> Self {
        Self {
            figsize: FigSize([20.0, 26.0]),
            tick_size: 22.0,
            legend_size: 24.0,
            footnote_size: 20.0,
            grid: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dpi: 100 }
    }
}

/// Resolve a VizConfig from an optional YAML string. Missing keys keep
/// their defaults.
pub fn resolve_config(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    match user_yaml {
        None => Ok(VizConfig::default()),
        Some(yaml) if yaml.trim().is_empty() => Ok(VizConfig::default()),
        Some(yaml) => {
            let config: VizConfig = serde_yaml_ng::from_str(yaml)
                .map_err(|e| crate::RenderError::Config(e.to_string()))?;
            config.validate()?;
            Ok(config)
        }
    }
}

/// Load a YAML config file.
pub fn load_config(path: &Path) -> crate::Result<VizConfig> {
    let yaml = std::fs::read_to_string(path)?;
    log::debug!("loaded render config from {}", path.display());
    resolve_config(Some(&yaml))
}

impl VizConfig {
    fn validate(&self) -> crate::Result<()> {
        let sizes = [
            ("figure1.figsize", self.figure1.figsize),
            ("figure2.figsize", self.figure2.figsize),
            ("figure3.figsize", self.figure3.figsize),
        ];
        for (key, size) in sizes {
            if !size.0.iter().all(|v| v.is_finite() && *v > 0.0) {
                return Err(crate::RenderError::Config(format!(
                    "{key} must be two positive numbers, got {:?}",
                    size.0
                )));
            }
        }
        if self.output.dpi == 0 {
            return Err(crate::RenderError::Config("output.dpi must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_figures() {
        let c = VizConfig::default();
        assert_eq!(c.figure1.figsize.width_pt(), 864.0);
        assert_eq!(c.figure1.figsize.height_pt(), 576.0);
        assert_eq!(c.figure2.figsize.0, [27.0, 36.0]);
        assert_eq!(c.figure3.figsize.0, [20.0, 26.0]);
        assert_eq!(c.figure3.tick_size, 22.0);
        assert_eq!(c.output.dpi, 100);
    }

    #[test]
    fn yaml_overrides_keep_other_defaults() {
        let c = resolve_config(Some(
            "figure1:\n  figsize: [6, 4]\noutput:\n  dpi: 200\ngrid:\n  color: '#336699'\n",
        ))
        .unwrap();
        assert_eq!(c.figure1.figsize.0, [6.0, 4.0]);
        assert_eq!(c.output.dpi, 200);
        assert_eq!(c.grid.color, Color::rgb(0x33, 0x66, 0x99));
        assert_eq!(c.figure2.title_size, 16.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(resolve_config(Some("figure3:\n  figsize: [0, 4]\n")).is_err());
        assert!(resolve_config(Some("output:\n  dpi: 0\n")).is_err());
        assert!(resolve_config(Some("grid:\n  color: nope\n")).is_err());
        assert!(resolve_config(Some("")).is_ok());
    }
}
