//! Drawable leaves attached to graph nodes
//!
//! Leaves form a closed set: tessellated primitives, sprite animations and
//! sprite text. All of them implement [`Drawable`] and are dispatched through
//! the [`Leaf`] enum.

use crate::animation::{SpriteAnimation, SpriteSheet};
use crate::foundation::collections::TextureKey;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::render::{MatrixGuard, MeshHandle, RenderBackend, TexCoord};
use super::SceneError;

/// Shared interface of every leaf type
pub trait Drawable {
    /// Draw with whatever material, texture and transform are bound
    fn display<B: RenderBackend + ?Sized>(&self, backend: &mut B);

    /// Divide the stored `(s, t)` coordinates by `(afs, aft)` and push them
    /// to the backend
    fn rescale_texture_coordinates<B: RenderBackend + ?Sized>(&mut self, afs: f32, aft: f32, backend: &mut B);
}

/// Geometric description of a primitive, as declared in the scene
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveKind {
    /// Axis-aligned rectangle in the XY plane
    Rectangle {
        /// First corner x
        x1: f32,
        /// First corner y
        y1: f32,
        /// Opposite corner x
        x2: f32,
        /// Opposite corner y
        y2: f32,
    },
    /// Triangle given by three vertices
    Triangle {
        /// Vertices
        vertices: [Vec3; 3],
    },
    /// Capped or open cylinder along Z
    Cylinder {
        /// Radius at z = 0
        bottom_radius: f32,
        /// Radius at z = height
        top_radius: f32,
        /// Length along Z
        height: f32,
        /// Radial subdivisions
        slices: u32,
        /// Subdivisions along Z
        stacks: u32,
    },
    /// Sphere centered on the origin
    Sphere {
        /// Radius
        radius: f32,
        /// Longitudinal subdivisions
        slices: u32,
        /// Latitudinal subdivisions
        stacks: u32,
    },
    /// Torus around Z
    Torus {
        /// Tube radius
        inner: f32,
        /// Ring radius
        outer: f32,
        /// Tube subdivisions
        slices: u32,
        /// Ring subdivisions
        loops: u32,
    },
    /// Unit NURBS plane in XZ
    Plane {
        /// Divisions along u
        parts_u: u32,
        /// Divisions along v
        parts_v: u32,
    },
    /// NURBS patch from control points
    Patch {
        /// Control points along u
        points_u: u32,
        /// Control points along v
        points_v: u32,
        /// Divisions along u
        parts_u: u32,
        /// Divisions along v
        parts_v: u32,
        /// Control points, u-major
        control_points: Vec<Vec3>,
    },
    /// Barrel built from two NURBS half-shells
    Barrel {
        /// Radius at both ends
        base: f32,
        /// Radius at mid height
        middle: f32,
        /// Length along Z
        height: f32,
        /// Radial subdivisions
        slices: u32,
        /// Subdivisions along Z
        stacks: u32,
    },
}

impl PrimitiveKind {
    /// Whether texture amplification rescales this primitive.
    ///
    /// NURBS surfaces carry their own parametric coordinates and ignore it.
    pub fn rescales_tex_coords(&self) -> bool {
        !matches!(self, Self::Plane { .. } | Self::Patch { .. } | Self::Barrel { .. })
    }
}

/// Tessellated primitive: backend mesh plus its texture coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    kind: PrimitiveKind,
    mesh: MeshHandle,
    tex_coords: Vec<TexCoord>,
}

impl Primitive {
    /// Wrap a mesh produced by the tessellator
    pub fn new(kind: PrimitiveKind, mesh: MeshHandle, tex_coords: Vec<TexCoord>) -> Self {
        Self { kind, mesh, tex_coords }
    }

    /// Unit quad `(0,0)-(1,1)` as used for sprite surfaces and glyphs
    pub fn unit_quad(mesh: MeshHandle) -> Self {
        Self::new(
            PrimitiveKind::Rectangle { x1: 0.0, y1: 0.0, x2: 1.0, y2: 1.0 },
            mesh,
            vec![
                TexCoord::new(0.0, 1.0),
                TexCoord::new(1.0, 1.0),
                TexCoord::new(0.0, 0.0),
                TexCoord::new(1.0, 0.0),
            ],
        )
    }

    /// Declared geometry
    pub fn kind(&self) -> &PrimitiveKind {
        &self.kind
    }

    /// Backend mesh
    pub fn mesh(&self) -> MeshHandle {
        self.mesh
    }

    /// Current texture coordinates
    pub fn tex_coords(&self) -> &[TexCoord] {
        &self.tex_coords
    }
}

impl Drawable for Primitive {
    fn display<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        backend.draw_mesh(self.mesh);
    }

    fn rescale_texture_coordinates<B: RenderBackend + ?Sized>(&mut self, afs: f32, aft: f32, backend: &mut B) {
        if !self.kind.rescales_tex_coords() {
            return;
        }
        for coord in &mut self.tex_coords {
            coord.s /= afs;
            coord.t /= aft;
        }
        backend.upload_tex_coords(self.mesh, bytemuck::cast_slice(&self.tex_coords));
    }
}

/// Columns and rows of the ASCII glyph sheet used by [`SpriteText`]
pub const GLYPH_SHEET_SIZE: u32 = 16;

/// Line of text drawn one glyph quad per character
#[derive(Debug, Clone)]
pub struct SpriteText {
    text: String,
    sheet: SpriteSheet,
    glyphs: Vec<Primitive>,
}

impl SpriteText {
    /// Create sprite text from a 16×16 glyph sheet texture and one quad per
    /// character
    pub fn new(text: impl Into<String>, glyph_texture: TextureKey, glyphs: Vec<Primitive>) -> Result<Self, SceneError> {
        let text = text.into();
        let characters = text.chars().count();
        if glyphs.len() != characters {
            return Err(SceneError::GlyphCountMismatch {
                characters,
                glyphs: glyphs.len(),
            });
        }
        Ok(Self {
            text,
            sheet: SpriteSheet::new(glyph_texture, GLYPH_SHEET_SIZE, GLYPH_SHEET_SIZE),
            glyphs,
        })
    }

    /// Displayed text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sheet cell of a character: its code point, clamped to the sheet
    pub fn glyph_cell(&self, character: char) -> u32 {
        u32::from(character).min(self.sheet.cell_count() - 1)
    }
}

impl Drawable for SpriteText {
    fn display<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        let mut scope = MatrixGuard::new(backend);
        let advance = Mat4::translation(Vec3::new(1.0, 0.0, 0.0));
        for (character, glyph) in self.text.chars().zip(&self.glyphs) {
            scope.draw_sprite(&self.sheet.draw_request(self.glyph_cell(character), glyph.mesh()));
            scope.multiply_matrix(&advance);
        }
    }

    fn rescale_texture_coordinates<B: RenderBackend + ?Sized>(&mut self, afs: f32, aft: f32, backend: &mut B) {
        for glyph in &mut self.glyphs {
            glyph.rescale_texture_coordinates(afs, aft, backend);
        }
    }
}

/// Any drawable attached to a node
#[derive(Debug, Clone)]
pub enum Leaf {
    /// Tessellated geometry
    Primitive(Primitive),
    /// Animated sprite sheet
    SpriteAnimation(SpriteAnimation),
    /// Text from a glyph sheet
    SpriteText(SpriteText),
}

impl Leaf {
    /// Advance time-driven leaves
    pub fn update(&mut self, time_ms: f64) {
        if let Self::SpriteAnimation(animation) = self {
            animation.update(time_ms);
        }
    }
}

impl Drawable for Leaf {
    fn display<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        match self {
            Self::Primitive(primitive) => primitive.display(backend),
            Self::SpriteAnimation(animation) => animation.display(backend),
            Self::SpriteText(text) => text.display(backend),
        }
    }

    fn rescale_texture_coordinates<B: RenderBackend + ?Sized>(&mut self, afs: f32, aft: f32, backend: &mut B) {
        match self {
            Self::Primitive(primitive) => primitive.rescale_texture_coordinates(afs, aft, backend),
            Self::SpriteAnimation(animation) => animation.rescale_texture_coordinates(afs, aft, backend),
            Self::SpriteText(text) => text.rescale_texture_coordinates(afs, aft, backend),
        }
    }
}

impl From<Primitive> for Leaf {
    fn from(primitive: Primitive) -> Self {
        Self::Primitive(primitive)
    }
}

impl From<SpriteAnimation> for Leaf {
    fn from(animation: SpriteAnimation) -> Self {
        Self::SpriteAnimation(animation)
    }
}

impl From<SpriteText> for Leaf {
    fn from(text: SpriteText) -> Self {
        Self::SpriteText(text)
    }
}
