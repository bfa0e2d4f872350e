//! Scene graph vertex
//!
//! A node owns its local transform, optional material and texture overrides,
//! its leaves, and references (by id) to child nodes owned by the graph.

use std::rc::Rc;

use crate::animation::{Animation, KeyFrameAnimation};
use crate::foundation::collections::{AnimationKey, MaterialKey, ResourceTable, TextureKey};
use crate::foundation::math::{Axis, Mat4, Mat4Ext, Vec3};
use crate::render::{Material, MaterialBinding, RenderBackend, WrapMode};
use super::{Diagnostics, Drawable, Leaf, SceneError};

/// How a node selects its texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureRef {
    /// Use the texture inherited from the parent
    #[default]
    Inherit,
    /// Draw untextured, whatever the parent uses
    Clear,
    /// Use this texture
    Texture(TextureKey),
}

impl TextureRef {
    /// Effective texture given the one inherited from the parent
    pub fn resolve(self, inherited: Option<TextureKey>) -> Option<TextureKey> {
        match self {
            Self::Inherit => inherited,
            Self::Clear => None,
            Self::Texture(texture) => Some(texture),
        }
    }

    /// Texture set explicitly by this reference
    pub fn texture(self) -> Option<TextureKey> {
        match self {
            Self::Texture(texture) => Some(texture),
            Self::Inherit | Self::Clear => None,
        }
    }
}

/// Material and texture in effect at a point of the traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    /// Effective material
    pub material: MaterialKey,
    /// Effective texture, `None` for untextured
    pub texture: Option<TextureKey>,
}

/// Elementary transformation as declared on a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    /// Translate by an offset
    Translate(Vec3),
    /// Rotate about a coordinate axis by an angle in radians
    Rotate(Axis, f32),
    /// Scale non-uniformly
    Scale(Vec3),
}

impl TransformOp {
    /// Matrix of this operation
    pub fn to_matrix(self) -> Mat4 {
        match self {
            Self::Translate(offset) => Mat4::translation(offset),
            Self::Rotate(axis, angle) => Mat4::rotation_about(axis, angle),
            Self::Scale(factors) => Mat4::scaling(factors),
        }
    }
}

/// One vertex of the scene graph
#[derive(Debug, Clone)]
pub struct GraphNode {
    id: String,
    transform: Mat4,
    material: Option<MaterialKey>,
    texture: TextureRef,
    amplification: (f32, f32),
    children: Vec<Rc<str>>,
    leaves: Vec<Leaf>,
    animation: Option<AnimationKey>,
    textures_amplified: bool,
}

impl GraphNode {
    /// Create a node with identity transform that inherits everything
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transform: Mat4::identity(),
            material: None,
            texture: TextureRef::Inherit,
            amplification: (1.0, 1.0),
            children: Vec::new(),
            leaves: Vec::new(),
            animation: None,
            textures_amplified: false,
        }
    }

    /// Unique id within the graph
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Local transform
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Compose a declared transformation onto the local transform.
    ///
    /// Operations apply in declaration order: each one post-multiplies the
    /// accumulated matrix.
    pub fn apply_transformation(&mut self, op: TransformOp) {
        self.transform = self.transform * op.to_matrix();
    }

    /// Builder form of [`Self::apply_transformation`]
    pub fn with_transformation(mut self, op: TransformOp) -> Self {
        self.apply_transformation(op);
        self
    }

    /// Material override, `None` inherits
    pub fn material(&self) -> Option<MaterialKey> {
        self.material
    }

    /// Set the material override
    pub fn set_material(&mut self, material: Option<MaterialKey>) {
        self.material = material;
    }

    /// Builder form of [`Self::set_material`]
    pub fn with_material(mut self, material: MaterialKey) -> Self {
        self.material = Some(material);
        self
    }

    /// Texture selection
    pub fn texture(&self) -> TextureRef {
        self.texture
    }

    /// Set the texture selection
    pub fn set_texture(&mut self, texture: TextureRef) {
        self.texture = texture;
    }

    /// Builder form of [`Self::set_texture`]
    pub fn with_texture(mut self, texture: TextureRef) -> Self {
        self.texture = texture;
        self
    }

    /// Texture amplification factors `(afs, aft)`
    pub fn tex_amplification(&self) -> (f32, f32) {
        self.amplification
    }

    /// Set texture amplification factors; both must be positive and finite
    pub fn set_tex_amplification(&mut self, afs: f32, aft: f32) -> Result<(), SceneError> {
        let valid = |factor: f32| factor.is_finite() && factor > 0.0;
        if !(valid(afs) && valid(aft)) {
            return Err(SceneError::InvalidAmplification {
                node: self.id.clone(),
                afs,
                aft,
            });
        }
        self.amplification = (afs, aft);
        Ok(())
    }

    /// Builder form of [`Self::set_tex_amplification`]
    pub fn with_tex_amplification(mut self, afs: f32, aft: f32) -> Result<Self, SceneError> {
        self.set_tex_amplification(afs, aft)?;
        Ok(self)
    }

    /// Ids of child nodes in declaration order
    pub fn children(&self) -> &[Rc<str>] {
        &self.children
    }

    /// Reference a child node by id
    pub fn add_child(&mut self, id: impl Into<Rc<str>>) {
        self.children.push(id.into());
    }

    /// Builder form of [`Self::add_child`]
    pub fn with_child(mut self, id: impl Into<Rc<str>>) -> Self {
        self.add_child(id);
        self
    }

    /// Leaves in declaration order
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Mutable access to the leaves
    pub fn leaves_mut(&mut self) -> &mut [Leaf] {
        &mut self.leaves
    }

    /// Attach a leaf
    pub fn add_leaf(&mut self, leaf: impl Into<Leaf>) {
        self.leaves.push(leaf.into());
    }

    /// Builder form of [`Self::add_leaf`]
    pub fn with_leaf(mut self, leaf: impl Into<Leaf>) -> Self {
        self.add_leaf(leaf);
        self
    }

    /// Animation driving this node
    pub fn animation(&self) -> Option<AnimationKey> {
        self.animation
    }

    /// Set the animation driving this node
    pub fn set_animation(&mut self, animation: Option<AnimationKey>) {
        self.animation = animation;
    }

    /// Whether the leaves' texture coordinates were already amplified
    pub fn textures_amplified(&self) -> bool {
        self.textures_amplified
    }

    /// Start a new amplification epoch, e.g. after leaf coordinates were
    /// regenerated
    pub fn reset_amplification(&mut self) {
        self.textures_amplified = false;
    }

    /// Material and texture in effect at this node
    pub fn resolve_appearance(&self, inherited: Appearance) -> Appearance {
        Appearance {
            material: self.material.unwrap_or(inherited.material),
            texture: self.texture.resolve(inherited.texture),
        }
    }

    /// Whether the node is displayed this frame: always without an
    /// animation, otherwise once the animation has started moving
    pub fn is_visible(&self, animations: &ResourceTable<AnimationKey, KeyFrameAnimation>) -> bool {
        self.animation
            .and_then(|key| animations.get(key))
            .map_or(true, KeyFrameAnimation::started_moving)
    }

    /// Compose this node's transforms and draw its own leaves.
    ///
    /// Returns the appearance children inherit. Children are walked by the
    /// owning graph.
    pub(crate) fn display_local<B: RenderBackend + ?Sized, D: Diagnostics + ?Sized>(
        &mut self,
        inherited: Appearance,
        materials: &ResourceTable<MaterialKey, Material>,
        animations: &ResourceTable<AnimationKey, KeyFrameAnimation>,
        diagnostics: &mut D,
        backend: &mut B,
    ) -> Appearance {
        backend.multiply_matrix(&self.transform);
        if let Some(animation) = self.animation.and_then(|key| animations.get(key)) {
            animation.apply(backend);
        }

        let appearance = self.resolve_appearance(inherited);
        let amplify = appearance.texture.is_some() && !self.textures_amplified;
        let (afs, aft) = self.amplification;
        let properties = materials.get(appearance.material);
        if properties.is_none() && !self.leaves.is_empty() {
            diagnostics.report_warning(&format!("Node {} resolved to an unregistered material", self.id));
        }

        for leaf in &mut self.leaves {
            if amplify {
                leaf.rescale_texture_coordinates(afs, aft, backend);
            }
            if let Some(properties) = properties {
                backend.apply_material(&MaterialBinding {
                    material: appearance.material,
                    properties,
                    texture: appearance.texture,
                    wrap_s: WrapMode::Repeat,
                    wrap_t: WrapMode::Repeat,
                });
            }
            leaf.display(backend);
        }
        if amplify {
            self.textures_amplified = true;
        }

        appearance
    }
}
