//! Global scene settings
//!
//! Cameras, lights and illumination are parsed by the loader and consumed by
//! the renderer. The scene core only stores them.

use serde::{Serialize, Deserialize};

use crate::foundation::math::{Vec3, Vec4};

/// Most lights the backend can enable at once
pub const MAX_LIGHTS: usize = 8;

/// Camera projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in radians
        fov_y: f32,
        /// Near plane
        near: f32,
        /// Far plane
        far: f32,
    },
    /// Orthographic projection
    Ortho {
        /// Left plane
        left: f32,
        /// Right plane
        right: f32,
        /// Bottom plane
        bottom: f32,
        /// Top plane
        top: f32,
        /// Near plane
        near: f32,
        /// Far plane
        far: f32,
    },
}

/// Named view of the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Descriptor id
    pub id: String,
    /// Projection parameters
    pub projection: Projection,
    /// Eye position
    pub from: Vec3,
    /// Look-at target
    pub to: Vec3,
    /// Up vector
    pub up: Vec3,
}

/// Light source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSettings {
    /// Descriptor id
    pub id: String,
    /// Whether the light starts switched on
    pub enabled: bool,
    /// Homogeneous position; `w = 0` is a directional light
    pub position: Vec4,
    /// Ambient color RGBA
    pub ambient: [f32; 4],
    /// Diffuse color RGBA
    pub diffuse: [f32; 4],
    /// Specular color RGBA
    pub specular: [f32; 4],
}

/// Global illumination, views and lights of a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSettings {
    /// Length of the reference axis helper
    pub axis_length: f32,
    /// Global ambient light RGBA
    pub ambient: [f32; 4],
    /// Clear color RGBA
    pub background: [f32; 4],
    /// Declared cameras in document order
    pub cameras: Vec<CameraSettings>,
    /// Id of the camera to start with
    pub default_camera: Option<String>,
    /// Declared lights in document order
    pub lights: Vec<LightSettings>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            axis_length: 1.0,
            ambient: [0.0, 0.0, 0.0, 1.0],
            background: [0.0, 0.0, 0.0, 1.0],
            cameras: Vec::new(),
            default_camera: None,
            lights: Vec::new(),
        }
    }
}

impl SceneSettings {
    /// Camera by descriptor id
    pub fn camera(&self, id: &str) -> Option<&CameraSettings> {
        self.cameras.iter().find(|camera| camera.id == id)
    }

    /// Camera the renderer should start with: the declared default, else the
    /// first camera
    pub fn initial_camera(&self) -> Option<&CameraSettings> {
        self.default_camera
            .as_deref()
            .and_then(|id| self.camera(id))
            .or_else(|| self.cameras.first())
    }

    /// Lights the backend can actually enable, in declaration order
    pub fn active_lights(&self) -> impl Iterator<Item = &LightSettings> {
        self.lights.iter().take(MAX_LIGHTS)
    }
}
