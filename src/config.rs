use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "scatterfit.json";
/// Environment variable overriding [`DEFAULT_CONFIG_FILE`].
pub const CONFIG_ENV: &str = "SCATTERFIT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Which drag gesture the plot starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectionTool {
    /// Drag pans, scroll zooms.
    Pan,
    /// Drag spans a rectangle.
    #[default]
    Box,
    /// Drag traces a free-hand polygon.
    Lasso,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// File loaded by the "From file" button.
    pub primary_source: PathBuf,
    /// Skip one header row when reading delimited or spreadsheet files.
    pub has_header: bool,
    pub window_size: [f32; 2],
    pub point_radius: f32,
    pub selection_tool: SelectionTool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            primary_source: PathBuf::from("data.xlsx"),
            has_header: false,
            window_size: [900.0, 700.0],
            point_radius: 3.0,
            selection_tool: SelectionTool::Box,
        }
    }
}

impl Settings {
    /// Path of the settings file: `$SCATTERFIT_CONFIG`, else `./scatterfit.json`.
    pub fn path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Settings, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings for this run. Problems are logged and the defaults used.
    pub fn load_or_default() -> Settings {
        let path = Settings::path();
        match Settings::load_from(&path) {
            Ok(settings) => {
                log::debug!("settings: {settings:?}");
                settings
            }
            Err(e) => {
                log::error!("{e}; using default settings");
                Settings::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("scatterfit-config-{}-{name}", std::process::id()))
    }

    #[test]
    fn missing_file_gives_defaults() {
        let settings = Settings::load_from(&temp_path("does-not-exist.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn default_source_is_a_workbook() {
        let settings = Settings::default();
        assert_eq!(settings.primary_source, PathBuf::from("data.xlsx"));
        assert_eq!(settings.selection_tool, SelectionTool::Box);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = temp_path("partial.json");
        std::fs::write(&path, r#"{ "primary_source": "points.tsv", "selection_tool": "lasso" }"#).unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.primary_source, PathBuf::from("points.tsv"));
        assert_eq!(settings.selection_tool, SelectionTool::Lasso);
        assert!(!settings.has_header);
        assert_eq!(settings.point_radius, 3.0);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = temp_path("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(ConfigError::Parse { .. })));
    }
}
