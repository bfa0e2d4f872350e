//! Rendering pipeline interfaces
//!
//! The scene core never talks to a graphics API directly. Everything it needs
//! from the pipeline goes through two traits:
//!
//! - [`TransformStack`]: save/restore/compose discipline on the current
//!   model transform
//! - [`RenderBackend`]: bind a material, draw a mesh or sprite, upload
//!   texture coordinates
//!
//! [`MatrixStack`] is the reference transform stack that backends can embed,
//! and [`RecordingBackend`] is a headless backend that records every call.

mod matrix_stack;
mod material;
mod recording;

pub use matrix_stack::{MatrixStack, MatrixGuard};
pub use material::{Material, Texture, MaterialBinding, WrapMode};
pub use recording::{RecordingBackend, DrawCommand};

use crate::foundation::collections::TextureKey;
use crate::foundation::math::Mat4;

/// Opaque handle to geometry owned by the backend (tessellated elsewhere)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u64);

/// A single `(s, t)` texture coordinate in the layout uploaded to the GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TexCoord {
    /// Horizontal coordinate
    pub s: f32,
    /// Vertical coordinate
    pub t: f32,
}

impl TexCoord {
    /// Create a texture coordinate
    pub const fn new(s: f32, t: f32) -> Self {
        Self { s, t }
    }
}

bitflags::bitflags! {
    /// Fixed-function state a draw call needs beyond the bound material
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderState: u32 {
        /// Alpha blending (`SRC_ALPHA`, `ONE_MINUS_SRC_ALPHA`)
        const BLEND = 1 << 0;
        /// Depth testing still happens but the depth buffer is not written
        const NO_DEPTH_WRITE = 1 << 1;
    }
}

/// Draw request for one cell of a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    /// Sheet texture
    pub texture: TextureKey,
    /// Sheet layout as `(columns, rows)`
    pub grid: (u32, u32),
    /// Selected cell as `(column, row)`
    pub cell: (u32, u32),
    /// Quad the cell is mapped onto
    pub surface: MeshHandle,
    /// Extra pipeline state for the draw
    pub state: RenderState,
}

/// Save/restore/compose discipline on the current model transform
pub trait TransformStack {
    /// Save the current transform
    fn push_matrix(&mut self);

    /// Restore the most recently saved transform
    fn pop_matrix(&mut self);

    /// Post-multiply the current transform: `current = current * matrix`
    fn multiply_matrix(&mut self, matrix: &Mat4);

    /// The current transform
    fn current_matrix(&self) -> Mat4;
}

/// Pipeline capabilities consumed by scene traversal
pub trait RenderBackend: TransformStack {
    /// Bind a material together with its texture and wrap state
    fn apply_material(&mut self, binding: &MaterialBinding<'_>);

    /// Draw a mesh with the bound material and current transform
    fn draw_mesh(&mut self, mesh: MeshHandle);

    /// Replace the texture coordinate buffer of a mesh
    ///
    /// `coords` is a tightly packed array of [`TexCoord`].
    fn upload_tex_coords(&mut self, mesh: MeshHandle, coords: &[u8]);

    /// Draw one sprite sheet cell with the current transform
    fn draw_sprite(&mut self, sprite: &SpriteDraw);
}
