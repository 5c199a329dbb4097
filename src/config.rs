//! Editor configuration.
//!
//! Settings are plain JSON so a host page can stash overrides in
//! localStorage, and the native tool can read them from the user's config
//! directory. Every field has a default, so partial files are fine.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_FIT_FRACTION, DEFAULT_HIT_TOLERANCE_PX, style,
};
use crate::error::{EditorError, Result};

/// Log level setting for the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// Convert to log crate's Level.
    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Current configuration file format version.
pub const CONFIG_VERSION: u32 = 1;

/// File name used under the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Key used for overrides in browser localStorage.
pub const CONFIG_STORAGE_KEY: &str = "roi_editor_config";

/// Editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Version of the configuration format
    pub version: u32,

    /// Base URL prepended to `/rectangles/{camera_id}`; empty for same origin
    pub api_base_url: String,

    /// Vertex grab radius in canvas pixels
    pub hit_tolerance_px: f64,

    /// Fraction of the window the canvas may fill
    pub fit_fraction: f64,

    /// Vertex marker radius in canvas pixels
    pub vertex_marker_radius: f64,

    /// Outline width in canvas pixels
    pub line_width: f64,

    /// CSS color for outlines
    pub stroke_color: String,

    /// CSS color for closed polygon fill
    pub fill_color: String,

    /// CSS color for vertex markers
    pub vertex_color: String,

    /// Log verbosity
    pub log_level: LogLevel,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            hit_tolerance_px: DEFAULT_HIT_TOLERANCE_PX,
            fit_fraction: DEFAULT_FIT_FRACTION,
            vertex_marker_radius: style::VERTEX_MARKER_RADIUS,
            line_width: style::LINE_WIDTH,
            stroke_color: style::STROKE_COLOR.to_string(),
            fill_color: style::FILL_COLOR.to_string(),
            vertex_color: style::VERTEX_COLOR.to_string(),
            log_level: LogLevel::default(),
        }
    }
}

impl EditorConfig {
    /// Parse from JSON and validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            log::warn!(
                "Config version {} is newer than supported version {}",
                config.version,
                CONFIG_VERSION
            );
        }
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break scaling or hit testing.
    pub fn validate(&self) -> Result<()> {
        if !(self.hit_tolerance_px.is_finite() && self.hit_tolerance_px > 0.0) {
            return Err(EditorError::InvalidConfig(format!(
                "hit_tolerance_px must be positive, got {}",
                self.hit_tolerance_px
            )));
        }
        if !(self.fit_fraction > 0.0 && self.fit_fraction <= 1.0) {
            return Err(EditorError::InvalidConfig(format!(
                "fit_fraction must be in (0, 1], got {}",
                self.fit_fraction
            )));
        }
        if !(self.line_width.is_finite() && self.line_width >= 0.0) {
            return Err(EditorError::InvalidConfig(format!(
                "line_width must be non-negative, got {}",
                self.line_width
            )));
        }
        Ok(())
    }

    /// Parse an optional override, falling back to defaults on any problem.
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("Ignoring invalid editor config: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Full URL of the region endpoint for a camera.
    pub fn region_url(&self, camera_id: &str) -> String {
        crate::persistence::region_url(&self.api_base_url, camera_id)
    }
}

/// Platform config file location: `<config_dir>/roi_editor/config.json`.
#[cfg(not(target_arch = "wasm32"))]
pub fn default_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|dir| dir.join("roi_editor").join(CONFIG_FILE_NAME))
}

/// Load the native config file if it exists, otherwise defaults.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_native_config() -> EditorConfig {
    let Some(path) = default_config_path() else {
        return EditorConfig::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => EditorConfig::from_json_or_default(Some(&json)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => EditorConfig::default(),
        Err(e) => {
            log::warn!("Failed to read config {:?}: {}", path, e);
            EditorConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = EditorConfig::from_json(r#"{"hit_tolerance_px": 8.0, "log_level": "debug"}"#)
            .unwrap();
        assert_eq!(config.hit_tolerance_px, 8.0);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.fit_fraction, DEFAULT_FIT_FRACTION);
        assert_eq!(config.stroke_color, style::STROKE_COLOR);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = EditorConfig::default();
        config.api_base_url = "http://localhost:15440".to_string();
        config.log_level = LogLevel::Trace;

        let json = config.to_json().unwrap();
        assert_eq!(EditorConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(EditorConfig::from_json(r#"{"hit_tolerance_px": 0}"#).is_err());
        assert!(EditorConfig::from_json(r#"{"fit_fraction": 1.5}"#).is_err());
        assert!(EditorConfig::from_json(r#"{"line_width": -1}"#).is_err());
    }

    #[test]
    fn test_invalid_override_falls_back() {
        let config = EditorConfig::from_json_or_default(Some("not json"));
        assert_eq!(config, EditorConfig::default());
        assert_eq!(EditorConfig::from_json_or_default(None), EditorConfig::default());
    }

    #[test]
    fn test_region_url() {
        let mut config = EditorConfig::default();
        assert_eq!(config.region_url("cam1"), "/rectangles/cam1");

        config.api_base_url = "http://localhost:15440/".to_string();
        assert_eq!(config.region_url("7"), "http://localhost:15440/rectangles/7");
    }

    #[test]
    fn test_log_level_names() {
        let level: LogLevel = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(level.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(level.to_level(), log::Level::Warn);
    }
}
