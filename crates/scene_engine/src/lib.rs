//! # Scene Engine
//!
//! A minimal real-time 3D scene core built around an Entity-Component-System.
//!
//! ## Features
//!
//! - **ECS Core**: Fixed-capacity entity slab, per-type component arrays, and
//!   systems that keep an incrementally maintained list of matching entities
//! - **Transform Hierarchy**: Parent/child links with lazily cached world matrices
//! - **Cameras**: Perspective and orthographic projections with cached view/projection
//! - **Controllers**: WASD fly camera, orbit camera, and follow camera systems
//! - **Renderer Contracts**: Backend-agnostic shader, model, texture, and material seams
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), EcsError> {
//!     let mut world = World::new();
//!
//!     let camera = world.create_entity()?;
//!     world.add_component(camera, TransformComponent::from_position(Vec3::new(0.0, 2.0, 5.0)))?;
//!     world.add_component(camera, CameraComponent::default().with_main(true))?;
//!
//!     let cube = world.create_entity()?;
//!     world.add_component(cube, TransformComponent::identity())?;
//!
//!     world.run_frame(1.0 / 60.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod render;
pub mod input;
pub mod assets;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, AssetManager, ResourceCache},
        config::{Config, ConfigError, EngineConfig},
        ecs::{
            components::{
                CameraComponent, CameraControllerComponent, MeshRendererComponent,
                OrbitCameraControllerComponent, Projection, TransformComponent,
            },
            systems::{
                CameraControllerSystem, CameraFollowSystem, OrbitCameraControllerSystem,
                RenderStats, RenderSystem,
            },
            Component, ComponentMask, EcsError, EcsResult, Entity, EntityState, System, SystemId,
            World,
        },
        foundation::math::{Mat4, Mat4Ext, Quat, QuatExt, Vec3, Vec3Ext},
        input::{InputManager, KeyCode, MouseButton, SharedInput},
        render::{Material, Model, RenderBackend, ShaderProgram, Texture},
    };
}
