//! ECS Systems module
//!
//! Register controllers before the render system: systems run in
//! registration order and the renderer reads the transforms they write.

pub mod camera_system;
pub mod rendering_system;
pub mod camera_controller_system;
pub mod orbit_controller_system;

pub use camera_system::CameraFollowSystem;
pub use rendering_system::{RenderStats, RenderSystem};
pub use camera_controller_system::CameraControllerSystem;
pub use orbit_controller_system::OrbitCameraControllerSystem;
