//! Orbit demo application
//!
//! Builds a small scene (an orbit camera, a spinning hub with a child cube,
//! a WASD-driven player, and a scatter of crates)
//! and drives it headless for a fixed number of frames with scripted input.
//!
//! Usage: `orbit_demo [config.toml|config.ron] [--frames N]`

mod stand_ins;

use std::process::ExitCode;
use std::rc::Rc;

use rand::{rngs::StdRng, Rng, SeedableRng};
use scene_engine::foundation::{logging, time::Timer};
use scene_engine::prelude::*;

use stand_ins::{LogBackend, LogModel, LogShader, LogTexture};

const DEFAULT_FRAMES: u32 = 240;
const FIXED_STEP: f32 = 1.0 / 60.0;
const CRATE_COUNT: usize = 12;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("scene: {0}")]
    Ecs(#[from] EcsError),

    #[error("assets: {0}")]
    Asset(#[from] AssetError),

    #[error("usage: {0}")]
    Usage(String),
}

struct Options {
    config: EngineConfig,
    frames: u32,
}

impl Options {
    fn from_args(args: impl Iterator<Item = String>) -> Result<Self, DemoError> {
        let mut config = EngineConfig::default();
        let mut frames = DEFAULT_FRAMES;
        let mut args = args;

        while let Some(arg) = args.next() {
            if arg == "--frames" {
                let value = args
                    .next()
                    .ok_or_else(|| DemoError::Usage("--frames needs a value".into()))?;
                frames = value
                    .parse()
                    .map_err(|_| DemoError::Usage(format!("invalid frame count '{value}'")))?;
            } else {
                log::info!("Loading configuration from {}", arg);
                config = EngineConfig::load(&arg)?;
            }
        }

        config.validate()?;
        Ok(Self { config, frames })
    }
}

struct Scene {
    world: World,
    input: SharedInput,
    backend: Rc<LogBackend>,
    renderer: SystemId<RenderSystem>,
    hub: Entity,
    crates: Vec<Entity>,
}

fn load_assets(assets: &mut AssetManager) -> Result<(), DemoError> {
    assets
        .shaders
        .get_or_load("default", |name| Ok(Rc::new(LogShader::new(name)) as Rc<dyn ShaderProgram>))?;
    assets
        .models
        .get_or_load("cube", |name| Ok(Rc::new(LogModel::new(name, 12)) as Rc<dyn Model>))?;
    assets
        .models
        .get_or_load("player", |name| Ok(Rc::new(LogModel::new(name, 320)) as Rc<dyn Model>))?;
    let brick = assets
        .textures
        .get_or_load("brick", |name| Ok(Rc::new(LogTexture::new(name)) as Rc<dyn Texture>))?;

    assets.materials.insert("default", Rc::new(Material::new()));
    assets.materials.insert(
        "brick",
        Rc::new(Material::new().with_diffuse_map(brick).with_shininess(8.0)),
    );
    Ok(())
}

fn build_scene(config: &EngineConfig, assets: &mut AssetManager) -> Result<Scene, DemoError> {
    let mut world = World::from_config(config)?;
    let input = InputManager::shared();
    let backend = Rc::new(LogBackend::default());
    let shader = assets.shaders.get("default")?;

    // Controllers first so the renderer sees this frame's transforms
    world.register_system(CameraControllerSystem::new(input.clone()))?;
    world.register_system(OrbitCameraControllerSystem::new(input.clone()))?;
    let renderer = world.register_system(RenderSystem::new(shader, backend.clone()))?;

    let orbit_camera = world.create_entity()?;
    world.add_component(orbit_camera, TransformComponent::identity())?;
    world.add_component(orbit_camera, CameraComponent::from_config(&config.camera).with_main(true))?;
    world.add_component(orbit_camera, OrbitCameraControllerComponent::from_config(&config.orbit))?;

    let cube = assets.models.get("cube")?;
    let brick = assets.materials.get("brick")?;
    let default_material = assets.materials.get("default")?;

    let hub = world.create_entity()?;
    world.add_component(hub, TransformComponent::from_position(Vec3::new(0.0, 1.0, 0.0)))?;
    world.add_component(hub, MeshRendererComponent::new(cube.clone(), Some(brick.clone())))?;

    let moon = world.create_entity()?;
    world.add_component(
        moon,
        TransformComponent::from_position(Vec3::new(2.0, 0.0, 0.0)).with_uniform_scale(0.5),
    )?;
    world.add_component(moon, MeshRendererComponent::new(cube.clone(), None))?;
    world.set_parent(moon, Some(hub))?;

    let player = world.create_entity()?;
    world.add_component(player, TransformComponent::from_position(Vec3::new(0.0, 0.0, 3.0)))?;
    world.add_component(
        player,
        MeshRendererComponent::new(assets.models.get("player")?, Some(default_material)),
    )?;
    world.add_component(player, CameraControllerComponent::from_config(&config.controller))?;

    // A model that fails to load leaves the renderer without a payload
    let ghost_model = assets
        .models
        .get_or_load("ghost", |name| Err(AssetError::NotFound(name.to_string())))
        .ok();
    let ghost = world.create_entity()?;
    world.add_component(ghost, TransformComponent::from_position(Vec3::new(0.0, 5.0, 0.0)))?;
    world.add_component(
        ghost,
        MeshRendererComponent {
            model: ghost_model,
            ..Default::default()
        },
    )?;

    let mut rng = StdRng::seed_from_u64(7);
    let mut crates = Vec::with_capacity(CRATE_COUNT);
    for _ in 0..CRATE_COUNT {
        let entity = world.create_entity()?;
        world.add_component(entity, scatter_transform(&mut rng))?;
        world.add_component(entity, MeshRendererComponent::new(cube.clone(), Some(brick.clone())))?;
        crates.push(entity);
    }

    log::info!(
        "Scene built: {} entities, {} systems",
        world.living_count(),
        world.system_count()
    );

    Ok(Scene {
        world,
        input,
        backend,
        renderer,
        hub,
        crates,
    })
}

/// A crate standing upright somewhere on the ground plane, turned about +Y
fn scatter_transform(rng: &mut impl Rng) -> TransformComponent {
    let position = Vec3::new(rng.gen_range(-8.0..8.0), 0.0, rng.gen_range(-8.0..8.0));
    let heading = rng.gen_range(0.0..std::f32::consts::TAU);
    TransformComponent::from_position(position)
        .with_rotation(Quat::from_axis_angle(&Vec3::y_axis(), heading))
}

/// Scripted input: walk, drag the orbit, zoom, then resize the window
fn script_input(scene: &mut Scene, frame: u32) {
    let mut input = scene.input.borrow_mut();
    match frame {
        0 => input.handle_key_input(KeyCode::W, true),
        60 => {
            input.handle_key_input(KeyCode::W, false);
            input.handle_mouse_move(400.0, 300.0);
            input.handle_mouse_button(MouseButton::Left, true);
        }
        61..=119 => {
            let (x, y) = input.cursor_position();
            input.handle_mouse_move(x + 4.0, y - 1.0);
        }
        120 => {
            input.handle_mouse_button(MouseButton::Left, false);
            input.handle_scroll(3.0);
        }
        150 => {
            input.handle_resize(1920, 1080);
            drop(input);
            scene.backend.set_viewport(0, 0, 1920, 1080);
            scene.world.handle_resize(1920, 1080);
        }
        _ => {}
    }
}

fn run(options: Options) -> Result<(), DemoError> {
    let mut assets = AssetManager::new();
    load_assets(&mut assets)?;
    let mut scene = build_scene(&options.config, &mut assets)?;
    let mut timer = Timer::new();

    let spin = Quat::from_axis_angle(&Vec3::y_axis(), 0.5 * FIXED_STEP);

    for frame in 0..options.frames {
        script_input(&mut scene, frame);
        let delta_time = timer.tick_fixed(FIXED_STEP);

        scene
            .world
            .get_component_mut::<TransformComponent>(scene.hub)?
            .rotate(spin);

        // Retire a crate every half second
        if frame % 30 == 29 {
            if let Some(entity) = scene.crates.pop() {
                scene.world.destroy_entity(entity);
            }
        }

        scene.world.update_components(delta_time);
        scene.world.run_frame(delta_time);
        scene.input.borrow_mut().update();
    }

    let stats = scene
        .world
        .system(scene.renderer)
        .map(|system| system.stats().clone())
        .unwrap_or_default();
    log::info!(
        "Ran {} frames ({:.2}s simulated): {} rendered, {} skipped, {} draws, {} entities skipped, {} clears",
        timer.frame_count(),
        timer.total_time(),
        stats.frames_rendered,
        stats.frames_skipped,
        stats.entities_drawn,
        stats.entities_skipped,
        scene.backend.clears()
    );
    log::info!("{} entities alive at exit", scene.world.living_count());

    drop(scene);
    assets.release_unused();
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_with_default_filter("info") {
        eprintln!("Failed to initialise logging: {err}");
    }

    let result = Options::from_args(std::env::args().skip(1)).and_then(run);
    match result {
        Ok(()) => {
            log::info!("Orbit demo finished successfully");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Orbit demo failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
