//! # Core Engine Module
//!
//! Shared configuration used by the scene graph and by applications driving
//! the frame loop.

pub mod config;

pub use crate::foundation;

pub use config::{
    SceneEngineConfig,
    EngineSettings,
    TraversalConfig,
    Config,
    ConfigError,
};
