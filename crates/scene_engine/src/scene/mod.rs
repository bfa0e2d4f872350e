//! Scene graph and traversal
//!
//! A scene is a directed graph of [`GraphNode`]s addressed by string id.
//! Each frame the graph is walked depth-first from the root:
//!
//! ```text
//! SceneGraph::update(t)      advance keyframe and sprite animations
//!      ↓
//! SceneGraph::display_scene  compose transforms, resolve material/texture,
//!      ↓                     draw leaves, recurse into children
//! RenderBackend              matrix stack, material binding, draw calls
//! ```
//!
//! Nodes inherit the effective material and texture of their parent unless
//! they override them. Every child visit is bracketed by a transform
//! push/pop, so siblings never see each other's transforms.

mod diagnostics;
mod graph_node;
mod leaf;
mod scene_graph;
mod settings;

#[cfg(test)]
mod tests;

pub use diagnostics::{Diagnostic, DiagnosticLog, Diagnostics, LogDiagnostics, Severity};
pub use graph_node::{Appearance, GraphNode, TextureRef, TransformOp};
pub use leaf::{Drawable, Leaf, Primitive, PrimitiveKind, SpriteText, GLYPH_SHEET_SIZE};
pub use scene_graph::SceneGraph;
pub use settings::{CameraSettings, LightSettings, Projection, SceneSettings, MAX_LIGHTS};

use thiserror::Error;

/// Errors raised while building a scene
///
/// Traversal itself never fails; its problems go to [`Diagnostics`].
#[derive(Debug, Error)]
pub enum SceneError {
    /// Two nodes share an id
    #[error("Node {0} is already defined")]
    DuplicateNode(String),

    /// Two resources of the same kind share an id
    #[error("{kind} {id} is already defined")]
    DuplicateResource {
        /// Resource kind, e.g. "Material"
        kind: &'static str,
        /// Offending id
        id: String,
    },

    /// Reference to a material id that was never declared
    #[error("Material not defined: {0}")]
    UnknownMaterial(String),

    /// Reference to a texture id that was never declared
    #[error("Texture not defined: {0}")]
    UnknownTexture(String),

    /// Reference to a node id that was never declared
    #[error("Node not defined: {0}")]
    UnknownNode(String),

    /// The root id names no node
    #[error("Root node not defined: {0}")]
    MissingRoot(String),

    /// Amplification factors must be positive and finite
    #[error("Invalid texture amplification ({afs}, {aft}) in node {node}")]
    InvalidAmplification {
        /// Node the factors were set on
        node: String,
        /// Factor along s
        afs: f32,
        /// Factor along t
        aft: f32,
    },

    /// Sprite text needs one glyph quad per character
    #[error("Sprite text has {characters} characters but {glyphs} glyph quads")]
    GlyphCountMismatch {
        /// Characters in the text
        characters: usize,
        /// Glyph quads supplied
        glyphs: usize,
    },
}
