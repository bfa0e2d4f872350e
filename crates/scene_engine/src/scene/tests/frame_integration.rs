//! Integration tests for frame traversal
//!
//! Scenes are built the way a loader would build them, then driven through
//! `update` and `display_scene` on a recording backend.

use crate::animation::{KeyFrame, KeyFrameAnimation, Pose};
use crate::core::config::TraversalConfig;
use crate::foundation::math::{Axis, Mat4, Mat4Ext, Vec3};
use crate::render::{Material, MeshHandle, RecordingBackend, TexCoord, Texture, TransformStack};
use crate::scene::{GraphNode, Primitive, PrimitiveKind, SceneGraph, TransformOp};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad(mesh: u64) -> Primitive {
        Primitive::new(
            PrimitiveKind::Rectangle { x1: 0.0, y1: 0.0, x2: 2.0, y2: 2.0 },
            MeshHandle(mesh),
            vec![TexCoord::new(0.0, 0.0), TexCoord::new(2.0, 2.0)],
        )
    }

    /// world(stone) -> table(wood texture) -> [legs(clear), top(null)]
    fn furniture_scene() -> SceneGraph {
        let mut scene = SceneGraph::new();
        scene.add_material("stone", Material::new().with_shininess(10.0)).unwrap();
        scene.add_material("metal", Material::new().with_shininess(80.0)).unwrap();
        scene.add_texture("wood", Texture::new("wood.jpg")).unwrap();

        let stone = scene.material_ref("stone").unwrap().unwrap();
        let metal = scene.material_ref("metal").unwrap();
        let wood = scene.texture_ref("wood").unwrap();
        let clear = scene.texture_ref("clear").unwrap();
        let inherit = scene.texture_ref("null").unwrap();

        scene.set_root("world");
        scene
            .add_node(GraphNode::new("world").with_material(stone).with_child("table"))
            .unwrap();
        scene
            .add_node(
                GraphNode::new("table")
                    .with_texture(wood)
                    .with_transformation(TransformOp::Translate(Vec3::new(0.0, 1.0, 0.0)))
                    .with_child("legs")
                    .with_child("top"),
            )
            .unwrap();
        let mut legs = GraphNode::new("legs")
            .with_texture(clear)
            .with_transformation(TransformOp::Scale(Vec3::new(0.2, 2.0, 0.2)))
            .with_leaf(quad(1));
        legs.set_material(metal);
        scene.add_node(legs).unwrap();
        scene
            .add_node(
                GraphNode::new("top")
                    .with_texture(inherit)
                    .with_transformation(TransformOp::Rotate(Axis::X, -std::f32::consts::FRAC_PI_2))
                    .with_leaf(quad(2))
                    .with_tex_amplification(2.0, 2.0)
                    .unwrap(),
            )
            .unwrap();
        scene
    }

    #[test]
    fn test_clear_and_inherited_textures() {
        let mut scene = furniture_scene();
        let mut backend = RecordingBackend::new();
        scene.display_scene(&mut backend).unwrap();

        let metal = scene.material_ref("metal").unwrap().unwrap();
        let stone = scene.material_ref("stone").unwrap().unwrap();
        let wood = scene.textures().key_of("wood");

        assert_eq!(backend.binding_of(MeshHandle(1)), Some((metal, None)));
        assert_eq!(backend.binding_of(MeshHandle(2)), Some((stone, wood)));
    }

    #[test]
    fn test_transforms_compose_down_the_path() {
        let mut scene = furniture_scene();
        let mut backend = RecordingBackend::new();
        scene.display_scene(&mut backend).unwrap();

        let table = Mat4::translation(Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(
            backend.transform_of(MeshHandle(1)).unwrap(),
            table * Mat4::scaling(Vec3::new(0.2, 2.0, 0.2)),
            epsilon = 1e-6
        );
        // Siblings do not see each other's transforms
        assert_relative_eq!(
            backend.transform_of(MeshHandle(2)).unwrap(),
            table * Mat4::rotation_x(-std::f32::consts::FRAC_PI_2),
            epsilon = 1e-6
        );
        assert_eq!(backend.stack_depth(), 0);
        assert_relative_eq!(backend.current_matrix(), Mat4::identity());
    }

    #[test]
    fn test_amplification_holds_across_frames() {
        let mut scene = furniture_scene();
        let mut backend = RecordingBackend::new();
        for _ in 0..4 {
            scene.display_scene(&mut backend).unwrap();
        }

        let top = scene.node("top").unwrap();
        let Some(crate::scene::Leaf::Primitive(primitive)) = top.leaves().first() else {
            panic!("top should hold a primitive");
        };
        assert_eq!(primitive.tex_coords()[1], TexCoord::new(1.0, 1.0));
        assert_eq!(backend.upload_count(), 1);

        // The untextured legs are never amplified
        assert!(!scene.node("legs").unwrap().textures_amplified());
    }

    #[test]
    fn test_missing_child_is_skipped_with_one_warning() {
        let mut scene = furniture_scene();
        scene.node_mut("table").unwrap().add_child("lamp");
        scene
            .add_node(GraphNode::new("chair").with_leaf(quad(3)))
            .unwrap();
        scene.node_mut("table").unwrap().add_child("chair");

        let mut backend = RecordingBackend::new();
        scene.display_scene(&mut backend).unwrap();

        let warnings: Vec<&str> = scene.diagnostics().warnings().collect();
        assert_eq!(warnings, vec!["Node not defined: lamp"]);

        // The sibling after the missing child still draws with the table's state
        let stone = scene.material_ref("stone").unwrap().unwrap();
        assert_eq!(backend.binding_of(MeshHandle(3)), Some((stone, scene.textures().key_of("wood"))));
        assert_relative_eq!(
            backend.transform_of(MeshHandle(3)).unwrap(),
            Mat4::translation(Vec3::new(0.0, 1.0, 0.0)),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_animated_subtree_hidden_until_started() {
        let mut scene = SceneGraph::new();
        let drop_in = KeyFrameAnimation::new("drop_in")
            .with_key_frame(KeyFrame::from_seconds(
                1.0,
                Pose::new(Vec3::new(0.0, 10.0, 0.0), Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0)),
            ))
            .with_key_frame(KeyFrame::from_seconds(2.0, Pose::default()));
        scene.add_animation(drop_in).unwrap();

        scene.set_root("world");
        scene.add_node(GraphNode::new("world").with_child("box")).unwrap();
        scene
            .add_node(GraphNode::new("box").with_child("lid").with_leaf(quad(1)))
            .unwrap();
        scene.add_node(GraphNode::new("lid").with_leaf(quad(2))).unwrap();
        scene.assign_animation("box", "drop_in").unwrap();

        let mut backend = RecordingBackend::new();
        scene.update(0.0);
        scene.display_scene(&mut backend).unwrap();
        assert!(backend.drawn_meshes().is_empty());

        backend.clear();
        scene.update(1000.0);
        scene.display_scene(&mut backend).unwrap();
        assert_eq!(backend.drawn_meshes(), vec![MeshHandle(1), MeshHandle(2)]);
        assert_relative_eq!(
            backend.transform_of(MeshHandle(2)).unwrap(),
            Mat4::translation(Vec3::new(0.0, 10.0, 0.0)),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_fallback_material_reaches_descendants() {
        let mut scene = SceneGraph::new();
        scene.set_root("world");
        scene.add_node(GraphNode::new("world").with_child("thing")).unwrap();
        scene.add_node(GraphNode::new("thing").with_leaf(quad(5))).unwrap();

        let mut backend = RecordingBackend::new();
        scene.display_scene(&mut backend).unwrap();
        scene.display_scene(&mut backend).unwrap();

        let fallback = scene.fallback_material().unwrap();
        assert_eq!(backend.binding_of(MeshHandle(5)), Some((fallback, None)));
        assert_eq!(scene.materials().len(), 1);
    }

    #[test]
    fn test_reference_cycle_stops_at_depth_limit() {
        let mut scene = SceneGraph::with_config(TraversalConfig::new().with_max_depth(3));
        scene.set_root("loop");
        scene
            .add_node(GraphNode::new("loop").with_child("loop").with_leaf(quad(1)))
            .unwrap();

        let mut backend = RecordingBackend::new();
        scene.display_scene(&mut backend).unwrap();

        assert_eq!(backend.drawn_meshes().len(), 4);
        assert_eq!(scene.diagnostics().warnings().count(), 1);
        assert_eq!(backend.stack_depth(), 0);
    }
}
