//! ECS Components module
//!
//! Contains the engine's built-in components

pub mod transform;
pub mod camera;
pub mod mesh_renderer;
pub mod camera_controller;
pub mod orbit_controller;

pub use transform::TransformComponent;
pub use camera::{CameraComponent, Projection};
pub use mesh_renderer::MeshRendererComponent;
pub use camera_controller::CameraControllerComponent;
pub use orbit_controller::OrbitCameraControllerComponent;
