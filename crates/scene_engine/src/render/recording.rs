//! Headless backend that records every pipeline call
//!
//! Used by the demo application and by tests to observe exactly what a
//! traversal asked the pipeline to do, in order.

use crate::foundation::collections::{MaterialKey, TextureKey};
use crate::foundation::math::Mat4;
use super::{
    MaterialBinding, MatrixStack, MeshHandle, RenderBackend, SpriteDraw, TexCoord, TransformStack,
    WrapMode,
};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A material was bound
    ApplyMaterial {
        /// Bound material
        material: MaterialKey,
        /// Bound texture
        texture: Option<TextureKey>,
        /// Wrap modes `(s, t)`
        wrap: (WrapMode, WrapMode),
    },
    /// A mesh was drawn
    DrawMesh {
        /// Drawn mesh
        mesh: MeshHandle,
        /// Model transform at draw time
        transform: Mat4,
    },
    /// Texture coordinates of a mesh were replaced
    UploadTexCoords {
        /// Updated mesh
        mesh: MeshHandle,
        /// Uploaded coordinates
        coords: Vec<TexCoord>,
    },
    /// A sprite cell was drawn
    DrawSprite {
        /// Sprite request
        sprite: SpriteDraw,
        /// Model transform at draw time
        transform: Mat4,
    },
}

/// Backend that keeps a command log instead of issuing GPU work
#[derive(Debug, Default)]
pub struct RecordingBackend {
    stack: MatrixStack,
    commands: Vec<DrawCommand>,
}

impl RecordingBackend {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded commands in call order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Meshes drawn so far, in order
    pub fn drawn_meshes(&self) -> Vec<MeshHandle> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::DrawMesh { mesh, .. } => Some(*mesh),
                _ => None,
            })
            .collect()
    }

    /// Transform a mesh was last drawn with
    pub fn transform_of(&self, mesh: MeshHandle) -> Option<Mat4> {
        self.commands.iter().rev().find_map(|command| match command {
            DrawCommand::DrawMesh { mesh: drawn, transform } if *drawn == mesh => Some(*transform),
            _ => None,
        })
    }

    /// Material binding that was active when a mesh was last drawn
    pub fn binding_of(&self, mesh: MeshHandle) -> Option<(MaterialKey, Option<TextureKey>)> {
        let draw_index = self.commands.iter().rposition(|command| {
            matches!(command, DrawCommand::DrawMesh { mesh: drawn, .. } if *drawn == mesh)
        })?;
        self.commands[..draw_index].iter().rev().find_map(|command| match command {
            DrawCommand::ApplyMaterial { material, texture, .. } => Some((*material, *texture)),
            _ => None,
        })
    }

    /// Number of texture coordinate uploads recorded
    pub fn upload_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::UploadTexCoords { .. }))
            .count()
    }

    /// Number of sprite draws recorded
    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::DrawSprite { .. }))
            .count()
    }

    /// Current depth of the transform stack
    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Forget recorded commands; the transform stack is reset too
    pub fn clear(&mut self) {
        self.commands.clear();
        self.stack.reset();
    }
}

impl TransformStack for RecordingBackend {
    fn push_matrix(&mut self) {
        self.stack.push_matrix();
    }

    fn pop_matrix(&mut self) {
        self.stack.pop_matrix();
    }

    fn multiply_matrix(&mut self, matrix: &Mat4) {
        self.stack.multiply_matrix(matrix);
    }

    fn current_matrix(&self) -> Mat4 {
        self.stack.current_matrix()
    }
}

impl RenderBackend for RecordingBackend {
    fn apply_material(&mut self, binding: &MaterialBinding<'_>) {
        self.commands.push(DrawCommand::ApplyMaterial {
            material: binding.material,
            texture: binding.texture,
            wrap: (binding.wrap_s, binding.wrap_t),
        });
    }

    fn draw_mesh(&mut self, mesh: MeshHandle) {
        let transform = self.stack.current_matrix();
        self.commands.push(DrawCommand::DrawMesh { mesh, transform });
    }

    fn upload_tex_coords(&mut self, mesh: MeshHandle, coords: &[u8]) {
        let coords: Vec<TexCoord> = bytemuck::pod_collect_to_vec(coords);
        self.commands.push(DrawCommand::UploadTexCoords { mesh, coords });
    }

    fn draw_sprite(&mut self, sprite: &SpriteDraw) {
        let transform = self.stack.current_matrix();
        self.commands.push(DrawCommand::DrawSprite { sprite: *sprite, transform });
    }
}
