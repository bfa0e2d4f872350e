//! # Scene Engine
//!
//! Scene-graph traversal and keyframe animation for declaratively described
//! 3D scenes.
//!
//! ## Features
//!
//! - **Scene Graph**: Id-addressed nodes with inherited materials and textures
//! - **Keyframe Animation**: Piecewise-linear transform animation per node
//! - **Sprites**: Animated sprite sheets and glyph-sheet text leaves
//! - **Backend Agnostic**: Drawing goes through the [`render::RenderBackend`] trait
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! let mut scene = SceneGraph::new();
//! let stone = scene.add_material("stone", Material::new())?;
//! scene.set_root("world");
//! scene.add_node(
//!     GraphNode::new("world")
//!         .with_material(stone)
//!         .with_leaf(Primitive::unit_quad(MeshHandle(0))),
//! )?;
//!
//! let mut backend = RecordingBackend::new();
//! scene.update(0.0);
//! scene.display_scene(&mut backend)?;
//! assert_eq!(backend.drawn_meshes(), vec![MeshHandle(0)]);
//! # Ok::<(), SceneError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod render;
pub mod animation;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{Animation, KeyFrame, KeyFrameAnimation, Pose, SpriteAnimation, SpriteSheet},
        core::config::{Config, ConfigError, EngineSettings, SceneEngineConfig, TraversalConfig},
        foundation::{
            collections::{AnimationKey, MaterialKey, TextureKey},
            math::{Axis, Mat4, Mat4Ext, Vec3},
            time::FrameClock,
        },
        render::{Material, MeshHandle, RecordingBackend, RenderBackend, TexCoord, Texture, TransformStack},
        scene::{
            Diagnostics, DiagnosticLog, Drawable, GraphNode, Leaf, Primitive, PrimitiveKind, SceneError,
            SceneGraph, SpriteText, TextureRef, TransformOp,
        },
    };
}
