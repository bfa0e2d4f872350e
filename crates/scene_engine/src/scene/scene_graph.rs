//! Scene graph: node table, shared resources and per-frame traversal

use std::collections::HashMap;
use std::rc::Rc;

use crate::animation::{Animation, KeyFrameAnimation};
use crate::core::config::TraversalConfig;
use crate::foundation::collections::{AnimationKey, MaterialKey, ResourceTable, TextureKey};
use crate::render::{Material, MatrixGuard, RenderBackend, Texture};
use super::{Appearance, DiagnosticLog, Diagnostics, GraphNode, SceneError, SceneSettings, TextureRef};

/// Descriptor keyword for "no override" in material and texture references
pub const NULL_REF: &str = "null";

/// Descriptor keyword for an explicitly untextured node
pub const CLEAR_REF: &str = "clear";

/// Scene graph owning every node and the resources nodes refer to
///
/// Built once by a loader, then driven each frame with [`Self::update`]
/// followed by [`Self::display_scene`].
#[derive(Debug)]
pub struct SceneGraph<D: Diagnostics = DiagnosticLog> {
    nodes: HashMap<String, GraphNode>,
    root: Option<String>,
    materials: ResourceTable<MaterialKey, Material>,
    textures: ResourceTable<TextureKey, Texture>,
    animations: ResourceTable<AnimationKey, KeyFrameAnimation>,
    fallback_material: Option<MaterialKey>,
    settings: SceneSettings,
    config: TraversalConfig,
    diagnostics: D,
}

impl SceneGraph {
    /// Create an empty graph recording diagnostics in a [`DiagnosticLog`]
    pub fn new() -> Self {
        Self::with_config(TraversalConfig::default())
    }

    /// Create an empty graph with explicit traversal limits
    pub fn with_config(config: TraversalConfig) -> Self {
        Self::with_diagnostics(config, DiagnosticLog::new())
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Diagnostics> SceneGraph<D> {
    /// Create an empty graph reporting to a custom diagnostics sink
    pub fn with_diagnostics(config: TraversalConfig, diagnostics: D) -> Self {
        Self {
            nodes: HashMap::new(),
            root: None,
            materials: ResourceTable::new(),
            textures: ResourceTable::new(),
            animations: ResourceTable::new(),
            fallback_material: None,
            settings: SceneSettings::default(),
            config,
            diagnostics,
        }
    }

    /// Register a material under a descriptor id
    pub fn add_material(&mut self, id: impl Into<String>, material: Material) -> Result<MaterialKey, SceneError> {
        let id = id.into();
        let key = self
            .materials
            .try_insert(id.clone(), material)
            .ok_or_else(|| SceneError::DuplicateResource { kind: "Material", id: id.clone() })?;
        log::debug!("Registered material {id}");
        Ok(key)
    }

    /// Register a texture under a descriptor id
    pub fn add_texture(&mut self, id: impl Into<String>, texture: Texture) -> Result<TextureKey, SceneError> {
        let id = id.into();
        log::debug!("Registering texture {id} from {}", texture.path);
        self.textures
            .try_insert(id.clone(), texture)
            .ok_or(SceneError::DuplicateResource { kind: "Texture", id })
    }

    /// Register an animation under its own id
    pub fn add_animation(&mut self, animation: KeyFrameAnimation) -> Result<AnimationKey, SceneError> {
        let id = animation.id().to_string();
        if animation.keyframes().is_empty() {
            log::warn!("Animation {id} has no keyframes and will never start");
        }
        let key = self
            .animations
            .try_insert(id.clone(), animation)
            .ok_or_else(|| SceneError::DuplicateResource { kind: "Animation", id: id.clone() })?;
        log::debug!("Registered animation {id}");
        Ok(key)
    }

    /// Insert a node; ids are unique within the graph
    pub fn add_node(&mut self, node: GraphNode) -> Result<(), SceneError> {
        if self.nodes.contains_key(node.id()) {
            return Err(SceneError::DuplicateNode(node.id().to_string()));
        }
        log::debug!(
            "Registered node {} ({} leaves, {} children)",
            node.id(),
            node.leaves().len(),
            node.children().len()
        );
        self.nodes.insert(node.id().to_string(), node);
        Ok(())
    }

    /// Set the id traversal starts from
    pub fn set_root(&mut self, id: impl Into<String>) {
        self.root = Some(id.into());
    }

    /// Id traversal starts from
    pub fn root_id(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Resolve a material reference from a scene descriptor.
    ///
    /// `"null"` yields `None` (inherit), anything else must be a declared
    /// material.
    pub fn material_ref(&self, id: &str) -> Result<Option<MaterialKey>, SceneError> {
        if id == NULL_REF {
            return Ok(None);
        }
        self.materials
            .key_of(id)
            .map(Some)
            .ok_or_else(|| SceneError::UnknownMaterial(id.to_string()))
    }

    /// Resolve a texture reference from a scene descriptor.
    ///
    /// `"null"` inherits, `"clear"` removes the texture, anything else must be
    /// a declared texture.
    pub fn texture_ref(&self, id: &str) -> Result<TextureRef, SceneError> {
        match id {
            NULL_REF => Ok(TextureRef::Inherit),
            CLEAR_REF => Ok(TextureRef::Clear),
            _ => self
                .textures
                .key_of(id)
                .map(TextureRef::Texture)
                .ok_or_else(|| SceneError::UnknownTexture(id.to_string())),
        }
    }

    /// Attach an animation to a node by descriptor id.
    ///
    /// An unknown animation id leaves the node unanimated and is reported as
    /// a warning.
    pub fn assign_animation(&mut self, node_id: &str, animation_id: &str) -> Result<(), SceneError> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| SceneError::UnknownNode(node_id.to_string()))?;
        let key = self.animations.key_of(animation_id);
        if key.is_none() {
            self.diagnostics
                .report_warning(&format!("Invalid animation ID in node {node_id}: {animation_id}"));
        }
        node.set_animation(key);
        Ok(())
    }

    /// Node by id
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Mutable node by id
    pub fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        self.nodes.get_mut(id)
    }

    /// All nodes, in no particular order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Registered materials
    pub fn materials(&self) -> &ResourceTable<MaterialKey, Material> {
        &self.materials
    }

    /// Registered textures
    pub fn textures(&self) -> &ResourceTable<TextureKey, Texture> {
        &self.textures
    }

    /// Registered animations
    pub fn animations(&self) -> &ResourceTable<AnimationKey, KeyFrameAnimation> {
        &self.animations
    }

    /// Mutable access to registered animations, e.g. to reset them
    pub fn animations_mut(&mut self) -> &mut ResourceTable<AnimationKey, KeyFrameAnimation> {
        &mut self.animations
    }

    /// Material created for a root without one, once the first frame ran
    pub fn fallback_material(&self) -> Option<MaterialKey> {
        self.fallback_material
    }

    /// Global illumination, cameras and lights
    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    /// Mutable global settings
    pub fn settings_mut(&mut self) -> &mut SceneSettings {
        &mut self.settings
    }

    /// Traversal limits
    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    /// Diagnostics sink
    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Mutable diagnostics sink
    pub fn diagnostics_mut(&mut self) -> &mut D {
        &mut self.diagnostics
    }

    /// Start a new texture amplification epoch on every node
    pub fn reset_amplification(&mut self) {
        for node in self.nodes.values_mut() {
            node.reset_amplification();
        }
    }

    /// Advance every keyframe animation and every sprite animation leaf to
    /// the frame timestamp `time_ms`
    pub fn update(&mut self, time_ms: f64) {
        for animation in self.animations.values_mut() {
            animation.update(time_ms);
        }
        for node in self.nodes.values_mut() {
            for leaf in node.leaves_mut() {
                leaf.update(time_ms);
            }
        }
    }

    /// Draw one frame starting at the root.
    ///
    /// A root without a material gets the fallback material, permanently. A
    /// root texture of `clear` or `null` means untextured. The backend's
    /// transform is restored on return.
    pub fn display_scene<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> Result<(), SceneError> {
        let root_id = self.root.clone().ok_or_else(|| SceneError::MissingRoot(String::new()))?;
        let Some(root) = self.nodes.get(&root_id) else {
            return Err(SceneError::MissingRoot(root_id));
        };

        let material = match root.material() {
            Some(material) => material,
            None => self.assign_fallback_material(&root_id),
        };
        let inherited = Appearance { material, texture: None };

        let mut scope = MatrixGuard::new(backend);
        let visited = self.display_node(&root_id, inherited, 0, &mut *scope);
        log::trace!("Displayed {visited} nodes from {root_id}");
        Ok(())
    }

    fn assign_fallback_material(&mut self, root_id: &str) -> MaterialKey {
        let key = self.materials.insert_anonymous(Material::fallback());
        self.fallback_material = Some(key);
        if let Some(root) = self.nodes.get_mut(root_id) {
            root.set_material(Some(key));
        }
        log::debug!("Root {root_id} has no material, using the fallback material");
        key
    }

    fn display_node<B: RenderBackend + ?Sized>(
        &mut self,
        id: &str,
        inherited: Appearance,
        depth: usize,
        backend: &mut B,
    ) -> usize {
        let Some(node) = self.nodes.get_mut(id) else {
            return 0;
        };
        let appearance = node.display_local(inherited, &self.materials, &self.animations, &mut self.diagnostics, backend);
        let children: Vec<Rc<str>> = node.children().to_vec();

        let mut visited = 1;
        for child_id in &children {
            let Some(child) = self.nodes.get(&**child_id) else {
                self.diagnostics.report_warning(&format!("Node not defined: {child_id}"));
                continue;
            };
            if !child.is_visible(&self.animations) {
                continue;
            }
            if depth >= self.config.max_depth {
                self.diagnostics.report_warning(&format!(
                    "Node {child_id} skipped: traversal deeper than {} levels under {id}",
                    self.config.max_depth
                ));
                continue;
            }

            let mut scope = MatrixGuard::new(&mut *backend);
            visited += self.display_node(child_id, appearance, depth + 1, &mut *scope);
        }
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{KeyFrame, Pose};
    use crate::render::{MeshHandle, RecordingBackend};
    use crate::scene::Primitive;

    fn scene_with_root(root: GraphNode) -> SceneGraph {
        let mut scene = SceneGraph::new();
        scene.set_root(root.id().to_string());
        scene.add_node(root).unwrap();
        scene
    }

    #[test]
    fn test_material_ref_resolution() {
        let mut scene = SceneGraph::new();
        let wood = scene.add_material("wood", Material::new()).unwrap();

        assert_eq!(scene.material_ref("null").unwrap(), None);
        assert_eq!(scene.material_ref("wood").unwrap(), Some(wood));
        assert!(matches!(scene.material_ref("stone"), Err(SceneError::UnknownMaterial(id)) if id == "stone"));
    }

    #[test]
    fn test_texture_ref_resolution() {
        let mut scene = SceneGraph::new();
        let bricks = scene.add_texture("bricks", Texture::new("bricks.jpg")).unwrap();

        assert_eq!(scene.texture_ref("null").unwrap(), TextureRef::Inherit);
        assert_eq!(scene.texture_ref("clear").unwrap(), TextureRef::Clear);
        assert_eq!(scene.texture_ref("bricks").unwrap(), TextureRef::Texture(bricks));
        assert!(matches!(scene.texture_ref("grass"), Err(SceneError::UnknownTexture(_))));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut scene = SceneGraph::new();
        scene.add_node(GraphNode::new("table")).unwrap();
        assert!(matches!(scene.add_node(GraphNode::new("table")), Err(SceneError::DuplicateNode(_))));

        scene.add_material("wood", Material::new()).unwrap();
        assert!(matches!(
            scene.add_material("wood", Material::new()),
            Err(SceneError::DuplicateResource { kind: "Material", .. })
        ));
        assert!(matches!(
            scene.add_animation(KeyFrameAnimation::new("spin")).and_then(|_| scene.add_animation(KeyFrameAnimation::new("spin"))),
            Err(SceneError::DuplicateResource { kind: "Animation", .. })
        ));
    }

    #[test]
    fn test_unknown_animation_leaves_node_unanimated() {
        let mut scene = SceneGraph::new();
        scene.add_node(GraphNode::new("door")).unwrap();
        scene.assign_animation("door", "swing").unwrap();

        assert_eq!(scene.node("door").and_then(GraphNode::animation), None);
        assert_eq!(
            scene.diagnostics().warnings().collect::<Vec<_>>(),
            vec!["Invalid animation ID in node door: swing"]
        );
        assert!(matches!(scene.assign_animation("window", "swing"), Err(SceneError::UnknownNode(_))));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let mut backend = RecordingBackend::new();
        let mut scene = SceneGraph::new();
        assert!(matches!(scene.display_scene(&mut backend), Err(SceneError::MissingRoot(id)) if id.is_empty()));

        scene.set_root("world");
        assert!(matches!(scene.display_scene(&mut backend), Err(SceneError::MissingRoot(id)) if id == "world"));
    }

    #[test]
    fn test_fallback_material_created_once() {
        let mut scene = scene_with_root(GraphNode::new("world").with_leaf(Primitive::unit_quad(MeshHandle(1))));
        let mut backend = RecordingBackend::new();

        scene.display_scene(&mut backend).unwrap();
        let fallback = scene.fallback_material().unwrap();
        assert_eq!(scene.node("world").and_then(GraphNode::material), Some(fallback));
        assert_eq!(scene.materials().get(fallback), Some(&Material::fallback()));

        scene.display_scene(&mut backend).unwrap();
        assert_eq!(scene.materials().len(), 1);
        assert_eq!(backend.binding_of(MeshHandle(1)), Some((fallback, None)));
    }

    #[test]
    fn test_root_material_is_kept() {
        let mut scene = SceneGraph::new();
        let stone = scene.add_material("stone", Material::new()).unwrap();
        scene.set_root("world");
        scene.add_node(GraphNode::new("world").with_material(stone)).unwrap();

        scene.display_scene(&mut RecordingBackend::new()).unwrap();
        assert_eq!(scene.fallback_material(), None);
        assert_eq!(scene.node("world").and_then(GraphNode::material), Some(stone));
    }

    #[test]
    fn test_update_advances_animations() {
        let mut scene = SceneGraph::new();
        let key = scene
            .add_animation(
                KeyFrameAnimation::new("rise")
                    .with_key_frame(KeyFrame::from_seconds(0.0, Pose::default()))
                    .with_key_frame(KeyFrame::from_seconds(1.0, Pose::default())),
            )
            .unwrap();

        scene.update(100.0);
        scene.update(600.0);
        let animation = scene.animations().get(key).unwrap();
        assert_eq!(animation.start_time(), Some(100.0));
        assert!(animation.started_moving());
        assert!(animation.is_running());
    }
}
