//! Scene engine demo application
//!
//! Builds a small room scene the way a scene loader would, then drives it
//! headless for a number of frames and logs what the traversal asked the
//! pipeline to do.
//!
//! Usage: `scene_demo [config.toml|config.ron]`

use scene_engine::animation::{KeyFrame, KeyFrameAnimation, Pose, SpriteAnimation, SpriteSheet};
use scene_engine::core::config::{Config, ConfigError, SceneEngineConfig};
use scene_engine::foundation::logging;
use scene_engine::foundation::math::{utils, Axis, Vec3, Vec4};
use scene_engine::foundation::time::FrameClock;
use scene_engine::render::{Material, MeshHandle, RecordingBackend, TexCoord, Texture};
use scene_engine::scene::{
    CameraSettings, DiagnosticLog, Diagnostics, GraphNode, LightSettings, Primitive, PrimitiveKind, Projection,
    SceneError, SceneGraph, SpriteText, TransformOp,
};
use thiserror::Error;

/// Frames to run when the configuration sets no limit
const DEFAULT_FRAMES: u64 = 300;

/// Step used when the configuration asks for the wall clock; the demo is
/// always headless
const DEFAULT_STEP_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Error)]
enum DemoError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("logger already initialized: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// Hands out mesh handles the way a tessellating loader would
struct MeshIds(u64);

impl MeshIds {
    fn next(&mut self) -> MeshHandle {
        self.0 += 1;
        MeshHandle(self.0)
    }
}

fn rectangle(meshes: &mut MeshIds, x2: f32, y2: f32) -> Primitive {
    Primitive::new(
        PrimitiveKind::Rectangle { x1: 0.0, y1: 0.0, x2, y2 },
        meshes.next(),
        vec![
            TexCoord::new(0.0, y2),
            TexCoord::new(x2, y2),
            TexCoord::new(0.0, 0.0),
            TexCoord::new(x2, 0.0),
        ],
    )
}

fn sphere(meshes: &mut MeshIds, radius: f32) -> Primitive {
    Primitive::new(
        PrimitiveKind::Sphere { radius, slices: 16, stacks: 16 },
        meshes.next(),
        vec![TexCoord::new(0.0, 0.0), TexCoord::new(1.0, 1.0)],
    )
}

fn build_scene(config: &SceneEngineConfig) -> Result<SceneGraph, DemoError> {
    let mut scene = SceneGraph::with_diagnostics(
        config.traversal.clone(),
        DiagnosticLog::with_capacity(config.engine.diagnostic_capacity),
    );
    let mut meshes = MeshIds(0);

    let settings = scene.settings_mut();
    settings.background = [0.1, 0.1, 0.15, 1.0];
    settings.ambient = [0.2, 0.2, 0.2, 1.0];
    settings.cameras.push(CameraSettings {
        id: "overview".to_string(),
        projection: Projection::Perspective { fov_y: utils::deg_to_rad(45.0), near: 0.1, far: 500.0 },
        from: Vec3::new(15.0, 15.0, 15.0),
        to: Vec3::zeros(),
        up: Vec3::y(),
    });
    settings.lights.push(LightSettings {
        id: "ceiling".to_string(),
        enabled: true,
        position: Vec4::new(5.0, 10.0, 5.0, 1.0),
        ambient: [0.0, 0.0, 0.0, 1.0],
        diffuse: [1.0, 1.0, 1.0, 1.0],
        specular: [1.0, 1.0, 1.0, 1.0],
    });

    scene.add_material("wood", Material::new().with_diffuse(0.6, 0.4, 0.2, 1.0).with_shininess(10.0))?;
    scene.add_material("rubber", Material::new().with_diffuse(0.8, 0.1, 0.1, 1.0).with_shininess(60.0))?;
    scene.add_texture("floor", Texture::new("textures/floor.png"))?;
    let explosion = scene.add_texture("explosion", Texture::new("textures/explosion.png"))?;
    let glyphs = scene.add_texture("glyphs", Texture::new("textures/text.png"))?;

    scene.add_animation(
        KeyFrameAnimation::new("bounce")
            .with_key_frame(KeyFrame::from_seconds(0.5, Pose::new(Vec3::new(0.0, 4.0, 0.0), Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))))
            .with_key_frame(KeyFrame::from_seconds(1.5, Pose::new(Vec3::new(0.0, 0.5, 0.0), Vec3::zeros(), Vec3::new(1.2, 0.8, 1.2))))
            .with_key_frame(KeyFrame::from_seconds(2.5, Pose::new(Vec3::new(3.0, 4.0, 0.0), Vec3::new(0.0, std::f32::consts::PI, 0.0), Vec3::new(1.0, 1.0, 1.0)))),
    )?;

    // The root deliberately has no material so the fallback is exercised
    scene.set_root("room");
    scene.add_node(
        GraphNode::new("room")
            .with_child("floor")
            .with_child("table")
            .with_child("ball")
            .with_child("fireplace")
            .with_child("sign")
            .with_child("lamp"),
    )?;

    let floor_texture = scene.texture_ref("floor")?;
    scene.add_node(
        GraphNode::new("floor")
            .with_texture(floor_texture)
            .with_transformation(TransformOp::Rotate(Axis::X, utils::deg_to_rad(-90.0)))
            .with_leaf(rectangle(&mut meshes, 10.0, 10.0))
            .with_tex_amplification(2.0, 2.0)?,
    )?;

    let untextured = scene.texture_ref("clear")?;
    let mut table = GraphNode::new("table")
        .with_transformation(TransformOp::Translate(Vec3::new(5.0, 0.0, 5.0)))
        .with_texture(untextured)
        .with_child("table_top");
    table.set_material(scene.material_ref("wood")?);
    for (index, (x, z)) in [(0.0, 0.0), (2.0, 0.0), (0.0, 1.0), (2.0, 1.0)].into_iter().enumerate() {
        let leg = format!("table_leg_{index}");
        table.add_child(leg.as_str());
        scene.add_node(
            GraphNode::new(leg)
                .with_transformation(TransformOp::Translate(Vec3::new(x, 0.0, z)))
                .with_transformation(TransformOp::Scale(Vec3::new(0.1, 1.0, 0.1)))
                .with_leaf(rectangle(&mut meshes, 1.0, 1.0)),
        )?;
    }
    scene.add_node(table)?;
    scene.add_node(
        GraphNode::new("table_top")
            .with_transformation(TransformOp::Translate(Vec3::new(0.0, 1.0, 0.0)))
            .with_transformation(TransformOp::Scale(Vec3::new(2.0, 0.1, 1.0)))
            .with_leaf(rectangle(&mut meshes, 1.0, 1.0)),
    )?;

    let mut ball = GraphNode::new("ball")
        .with_transformation(TransformOp::Translate(Vec3::new(2.0, 0.0, 2.0)))
        .with_leaf(sphere(&mut meshes, 0.5));
    ball.set_material(scene.material_ref("rubber")?);
    scene.add_node(ball)?;
    scene.assign_animation("ball", "bounce")?;

    scene.add_node(
        GraphNode::new("fireplace")
            .with_transformation(TransformOp::Translate(Vec3::new(0.0, 0.0, 8.0)))
            .with_leaf(SpriteAnimation::new(SpriteSheet::new(explosion, 4, 4), meshes.next(), 1.0, 0, 15)),
    )?;

    let text = "FIRE";
    let quads = text.chars().map(|_| Primitive::unit_quad(meshes.next())).collect();
    scene.add_node(
        GraphNode::new("sign")
            .with_transformation(TransformOp::Translate(Vec3::new(0.0, 3.0, 8.0)))
            .with_leaf(SpriteText::new(text, glyphs, quads)?),
    )?;

    // "lamp" is referenced by the room but never declared
    log::info!("Scene built with {} nodes", scene.node_count());
    Ok(scene)
}

fn run(config: &SceneEngineConfig) -> Result<(), DemoError> {
    let mut scene = build_scene(config)?;
    let mut backend = RecordingBackend::new();
    let mut clock = FrameClock::fixed_step(config.engine.frame_step_ms.unwrap_or(DEFAULT_STEP_MS));
    let frames = config.engine.frame_limit.unwrap_or(DEFAULT_FRAMES);

    if let Some(camera) = scene.settings().initial_camera() {
        log::info!("Viewing from camera {} at {:?}", camera.id, camera.from);
    }

    for _ in 0..frames {
        let now_ms = clock.tick();
        backend.clear();
        scene.update(now_ms);
        scene.display_scene(&mut backend)?;

        if clock.frame_count() % 60 == 1 {
            log::info!(
                "Frame {} at {:.0} ms: {} meshes, {} sprites, {} texture uploads",
                clock.frame_count(),
                now_ms,
                backend.drawn_meshes().len(),
                backend.sprite_count(),
                backend.upload_count()
            );
        }
    }

    let warnings = scene.diagnostics().warnings().count();
    scene
        .diagnostics_mut()
        .log(&format!("Ran {frames} frames, {warnings} traversal warnings"));
    Ok(())
}

fn main() -> Result<(), DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SceneEngineConfig::load_from_file(path)?,
        None => SceneEngineConfig::default(),
    };
    config.validate()?;
    logging::init_with_level(&config.engine.log_level)?;

    log::info!("Starting scene engine demo");
    match run(&config) {
        Ok(()) => {
            log::info!("Scene demo finished successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Scene demo failed: {e}");
            Err(e)
        }
    }
}
