//! Material system for rendering
//!
//! Materials and textures are shared, read-only resources. Binding never
//! mutates them: the texture and wrap state for a draw travel alongside the
//! material in a [`MaterialBinding`].

use serde::{Serialize, Deserialize};

use crate::foundation::collections::{MaterialKey, TextureKey};

/// Phong-style material properties, each color as RGBA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Shininess exponent
    pub shininess: f32,

    /// Ambient reflectance
    pub ambient: [f32; 4],

    /// Diffuse reflectance
    pub diffuse: [f32; 4],

    /// Specular reflectance
    pub specular: [f32; 4],

    /// Emitted color
    pub emissive: [f32; 4],
}

impl Material {
    /// Create a new material with default properties
    pub fn new() -> Self {
        Self {
            shininess: 10.0,
            ambient: [0.2, 0.2, 0.2, 1.0],
            diffuse: [0.8, 0.8, 0.8, 1.0],
            specular: [0.0, 0.0, 0.0, 1.0],
            emissive: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Material assigned to a root node that declares none
    pub fn fallback() -> Self {
        Self {
            shininess: 0.0,
            ambient: [1.0, 1.0, 1.0, 1.0],
            diffuse: [0.6, 1.0, 1.0, 1.0],
            specular: [0.6, 1.0, 1.0, 1.0],
            emissive: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Set the shininess exponent
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Set the ambient color
    pub fn with_ambient(mut self, r: f32, g: f32, b: f32, a: f32) -> Self {
        self.ambient = [r, g, b, a];
        self
    }

    /// Set the diffuse color
    pub fn with_diffuse(mut self, r: f32, g: f32, b: f32, a: f32) -> Self {
        self.diffuse = [r, g, b, a];
        self
    }

    /// Set the specular color
    pub fn with_specular(mut self, r: f32, g: f32, b: f32, a: f32) -> Self {
        self.specular = [r, g, b, a];
        self
    }

    /// Set the emissive color
    pub fn with_emissive(mut self, r: f32, g: f32, b: f32, a: f32) -> Self {
        self.emissive = [r, g, b, a];
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

/// Texture resource as registered by the loader
///
/// Pixel data lives in the backend; the core only tracks identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Texture {
    /// Path the image was loaded from
    pub path: String,
}

impl Texture {
    /// Create a texture record
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Texture coordinate wrap behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WrapMode {
    /// Tile the texture
    #[default]
    Repeat,
    /// Clamp coordinates to the edge texel
    ClampToEdge,
    /// Tile, mirroring every other repetition
    MirroredRepeat,
}

/// Everything a backend needs to bind for the next draw
#[derive(Debug, Clone, Copy)]
pub struct MaterialBinding<'a> {
    /// Handle of the bound material
    pub material: MaterialKey,
    /// Properties of the bound material
    pub properties: &'a Material,
    /// Bound texture, `None` for untextured
    pub texture: Option<TextureKey>,
    /// Wrap mode along s
    pub wrap_s: WrapMode,
    /// Wrap mode along t
    pub wrap_t: WrapMode,
}
