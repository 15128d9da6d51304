//! Dashboard configuration: layout, surface capacity and plot option objects.
//!
//! Only plot *configuration* is stored; plotted data never is.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dashboard::Dashboard;
use crate::error::{ConfigError, PlotError};
use crate::layout::LayoutMode;
use crate::options::PlotOptions;
use crate::surface::scene::DEFAULT_CAPACITY;
use crate::surface::Scene;

// ─────────────────────────────────────────────────────────────────────────────
// DashboardConfig
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Window title of the native app.
    pub title: String,
    pub layout: LayoutMode,
    /// Maximum number of live surface resources (regions, axes, series).
    pub surface_capacity: usize,
    /// Upper bound on points the surface keeps per appended series, on top
    /// of each line plot's own `n_visible_points` window.
    pub series_window: Option<usize>,
    /// Plot option objects, in plot order.
    pub plots: Vec<PlotOptions>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "livedash".to_string(),
            layout: LayoutMode::Dynamic,
            surface_capacity: DEFAULT_CAPACITY,
            series_window: None,
            plots: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Result<Format, ConfigError> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => Ok(Format::Json),
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

impl DashboardConfig {
    /// Load a config, choosing JSON or YAML by file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = format_of(path)?;
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = match format {
            Format::Json => Self::from_json(&text)?,
            Format::Yaml => Self::from_yaml(&text)?,
        };
        log::info!("loaded {} plot(s) from {}", config.plots.len(), path.display());
        Ok(config)
    }

    /// Save the config, choosing JSON or YAML by file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = match format_of(path)? {
            Format::Json => self.to_json()?,
            Format::Yaml => serde_yaml::to_string(self)?,
        };
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("saved {} plot(s) to {}", self.plots.len(), path.display());
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard <-> config
// ─────────────────────────────────────────────────────────────────────────────

impl Dashboard<Scene> {
    /// Build a dashboard on a fresh [`Scene`] with one plot per options entry.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, PlotError> {
        let mut scene = Scene::with_capacity(config.surface_capacity);
        if let Some(max_points) = config.series_window {
            scene = scene.with_series_window(max_points);
        }
        let mut dashboard = Dashboard::with_layout(scene, config.layout);
        for options in &config.plots {
            dashboard.add_plot_with_options(options.clone(), -1)?;
        }
        Ok(dashboard)
    }
}

impl<S: crate::surface::DrawingSurface + 'static> Dashboard<S> {
    /// Snapshot the current layout mode and plot option objects.
    ///
    /// `title`, `surface_capacity` and `series_window` keep their defaults; callers that
    /// loaded a config should carry those over themselves.
    pub fn to_config(&self) -> DashboardConfig {
        DashboardConfig {
            layout: self.layout_mode(),
            plots: self.plots().map(|(_, p)| p.options()).collect(),
            ..DashboardConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(format_of(Path::new("a.json")).ok(), Some(Format::Json));
        assert_eq!(format_of(Path::new("a.YML")).ok(), Some(Format::Yaml));
        assert_eq!(format_of(Path::new("a.yaml")).ok(), Some(Format::Yaml));
        assert!(matches!(
            format_of(Path::new("a.toml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(format_of(Path::new("noext")).is_err());
    }

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
    }
}
