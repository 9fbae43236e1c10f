//! WASD fly controller component

use crate::config::ControllerConfig;
use crate::ecs::Component;
use crate::foundation::math::{Vec3, Vec3Ext};
use crate::input::{InputManager, KeyCode};

/// Planar movement driven by W/A/S/D
#[derive(Debug, Clone, PartialEq)]
pub struct CameraControllerComponent {
    /// Units per second
    pub move_speed: f32,
    move_direction: Vec3,
}

impl Component for CameraControllerComponent {}

impl Default for CameraControllerComponent {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl CameraControllerComponent {
    /// Create with a movement speed
    pub fn new(move_speed: f32) -> Self {
        Self {
            move_speed,
            move_direction: Vec3::zeros(),
        }
    }

    /// Create from configuration
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.move_speed)
    }

    /// Direction derived from the last `handle_input` call (unit or zero)
    pub fn move_direction(&self) -> Vec3 {
        self.move_direction
    }

    /// Sample the movement keys: W = -Z, S = +Z, A = -X, D = +X
    pub fn handle_input(&mut self, input: &InputManager) {
        let mut direction = Vec3::zeros();
        if input.is_key_pressed(KeyCode::W) {
            direction.z -= 1.0;
        }
        if input.is_key_pressed(KeyCode::S) {
            direction.z += 1.0;
        }
        if input.is_key_pressed(KeyCode::A) {
            direction.x -= 1.0;
        }
        if input.is_key_pressed(KeyCode::D) {
            direction.x += 1.0;
        }
        self.move_direction = direction.normalized_or_self();
    }

    /// Displacement for a frame of `delta_time` seconds
    pub fn movement(&self, delta_time: f32) -> Vec3 {
        self.move_direction * self.move_speed * delta_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_diagonal_movement_is_normalized() {
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::W, true);
        input.handle_key_input(KeyCode::D, true);

        let mut controller = CameraControllerComponent::default();
        controller.handle_input(&input);

        let expected = Vec3::new(1.0, 0.0, -1.0).normalize();
        assert_relative_eq!(controller.move_direction(), expected, epsilon = 1e-6);
        assert_relative_eq!(controller.movement(0.5), expected * 2.5, epsilon = 1e-6);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::A, true);
        input.handle_key_input(KeyCode::D, true);

        let mut controller = CameraControllerComponent::new(3.0);
        controller.handle_input(&input);
        assert_eq!(controller.movement(1.0), Vec3::zeros());
    }
}
