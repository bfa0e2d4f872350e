//! # Scene Engine Configuration
//!
//! Groups the settings of the frame loop and of scene traversal into one
//! serializable structure. Files can be TOML or RON (see [`Config`]).
//!
//! ```toml
//! [engine]
//! log_level = "info"
//! frame_step_ms = 16.0
//! diagnostic_capacity = 1024
//!
//! [traversal]
//! max_depth = 256
//! ```

use serde::{Serialize, Deserialize};
use std::str::FromStr;

pub use crate::config::{Config, ConfigError};

/// # Engine Settings
///
/// Frame loop and logging behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Fixed simulated frame step; `None` runs on the wall clock
    pub frame_step_ms: Option<f64>,
    /// Number of frames a headless run renders before exiting
    pub frame_limit: Option<u64>,
    /// Maximum number of diagnostics retained by the scene graph's log
    pub diagnostic_capacity: usize,
}

impl EngineSettings {
    /// Create engine settings with defaults
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            frame_step_ms: None,
            frame_limit: None,
            diagnostic_capacity: 1024,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Run on a fixed simulated step
    pub fn with_frame_step(mut self, step_ms: f64) -> Self {
        self.frame_step_ms = Some(step_ms);
        self
    }

    /// Stop after a number of frames
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        log::LevelFilter::from_str(&self.log_level)
            .map_err(|_| format!("Unknown log level: {}", self.log_level))?;

        if let Some(step) = self.frame_step_ms {
            if !(step.is_finite() && step > 0.0) {
                return Err(format!("Frame step must be a positive number of milliseconds, got {step}"));
            }
        }

        if self.diagnostic_capacity == 0 {
            return Err("Diagnostic capacity must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// # Traversal Configuration
///
/// Limits applied while walking the node graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Deepest node level that is displayed; deeper children are skipped with
    /// a warning (this also stops reference cycles)
    pub max_depth: usize,
}

impl TraversalConfig {
    /// Create traversal settings with defaults
    pub fn new() -> Self {
        Self { max_depth: 256 }
    }

    /// Set the depth limit
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("Traversal depth limit must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Scene Engine Configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneEngineConfig {
    /// Frame loop and logging
    pub engine: EngineSettings,
    /// Graph traversal
    pub traversal: TraversalConfig,
}

impl SceneEngineConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate().map_err(ConfigError::Invalid)?;
        self.traversal.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }
}

impl Config for SceneEngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("scene_engine_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SceneEngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let mut config = SceneEngineConfig::default();
        config.engine.log_level = "loud".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = SceneEngineConfig {
            traversal: TraversalConfig::new().with_max_depth(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SceneEngineConfig {
            engine: EngineSettings::new().with_frame_step(-4.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_file_round_trip() {
        let path = temp_path("config.toml");
        let config = SceneEngineConfig {
            engine: EngineSettings::new().with_log_level("debug").with_frame_step(20.0).with_frame_limit(90),
            traversal: TraversalConfig::new().with_max_depth(12),
        };
        config.save_to_file(&path).unwrap();
        let loaded = SceneEngineConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_file_round_trip() {
        let path = temp_path("config.ron");
        let config = SceneEngineConfig {
            traversal: TraversalConfig::new().with_max_depth(3),
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();
        let loaded = SceneEngineConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SceneEngineConfig = toml::from_str("[traversal]\nmax_depth = 8\n").unwrap();
        assert_eq!(config.traversal.max_depth, 8);
        assert_eq!(config.engine, EngineSettings::default());
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = SceneEngineConfig::load_from_file("settings.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let loaded = SceneEngineConfig::load_or_default(temp_path("absent.toml")).unwrap();
        assert_eq!(loaded, SceneEngineConfig::default());
    }
}
