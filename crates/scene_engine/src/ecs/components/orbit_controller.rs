//! Orbit camera controller component
//!
//! Keeps the camera on a sphere around a focus point. Angles are in
//! degrees: the horizontal angle is measured around +Y from +Z, the
//! vertical angle above the horizon.

use crate::config::OrbitConfig;
use crate::ecs::Component;
use crate::foundation::math::{utils, Vec3};
use crate::input::{InputManager, KeyCode, MouseButton};

/// Damping applied to mouse drag before `rotation_speed`
const DRAG_DAMPING: f32 = 0.1;

/// Orbit camera controller state
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCameraControllerComponent {
    /// Horizontal angle in degrees, wrapped to [0, 360)
    pub horizontal_angle: f32,
    /// Vertical angle in degrees, clamped to ±`vertical_limit`
    pub vertical_angle: f32,
    /// Distance from the focus point
    pub distance: f32,
    /// Point the camera orbits and looks at
    pub focus_point: Vec3,
    /// Focus point panning speed (units per second)
    pub pan_speed: f32,
    /// Degrees per pixel of drag, before damping
    pub rotation_speed: f32,
    /// Distance per scroll step
    pub zoom_speed: f32,
    /// Closest zoom
    pub min_distance: f32,
    /// Farthest zoom
    pub max_distance: f32,
    /// Vertical clamp in degrees
    pub vertical_limit: f32,
    dragging: bool,
    last_cursor: (f64, f64),
}

impl Component for OrbitCameraControllerComponent {}

impl Default for OrbitCameraControllerComponent {
    fn default() -> Self {
        Self::from_config(&OrbitConfig::default())
    }
}

impl OrbitCameraControllerComponent {
    /// Create from configuration
    pub fn from_config(config: &OrbitConfig) -> Self {
        Self {
            horizontal_angle: utils::wrap_degrees(config.horizontal_angle),
            vertical_angle: utils::clamp(
                config.vertical_angle,
                -config.vertical_limit,
                config.vertical_limit,
            ),
            distance: utils::clamp(config.distance, config.min_distance, config.max_distance),
            focus_point: Vec3::zeros(),
            pan_speed: config.pan_speed,
            rotation_speed: config.rotation_speed,
            zoom_speed: config.zoom_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            vertical_limit: config.vertical_limit,
            dragging: false,
            last_cursor: (0.0, 0.0),
        }
    }

    /// Builder pattern: Set the focus point
    pub fn with_focus_point(mut self, focus_point: Vec3) -> Self {
        self.focus_point = focus_point;
        self
    }

    /// Builder pattern: Set angles (degrees) and distance
    pub fn with_orbit(mut self, horizontal_angle: f32, vertical_angle: f32, distance: f32) -> Self {
        self.horizontal_angle = utils::wrap_degrees(horizontal_angle);
        self.vertical_angle = utils::clamp(vertical_angle, -self.vertical_limit, self.vertical_limit);
        self.distance = utils::clamp(distance, self.min_distance, self.max_distance);
        self
    }

    /// Whether a left-button drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Rotate by a cursor delta in pixels
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        self.horizontal_angle = utils::wrap_degrees(
            self.horizontal_angle - delta_x * self.rotation_speed * DRAG_DAMPING,
        );
        self.vertical_angle = utils::clamp(
            self.vertical_angle - delta_y * self.rotation_speed * DRAG_DAMPING,
            -self.vertical_limit,
            self.vertical_limit,
        );
    }

    /// Move toward (positive) or away from (negative) the focus point
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = utils::clamp(
            self.distance - scroll * self.zoom_speed,
            self.min_distance,
            self.max_distance,
        );
    }

    /// Horizontal forward and right vectors for the current angle
    pub fn pan_axes(&self) -> (Vec3, Vec3) {
        let (sin_h, cos_h) = utils::deg_to_rad(self.horizontal_angle).sin_cos();
        let forward = Vec3::new(sin_h, 0.0, cos_h);
        let right = Vec3::new(cos_h, 0.0, -sin_h);
        (forward, right)
    }

    /// Translate the drag, scroll, and WASD state into orbit changes
    ///
    /// Pan keys add their axes unnormalised, so a diagonal pans faster
    /// than a single key.
    pub fn handle_input(&mut self, input: &InputManager, delta_time: f32) {
        let cursor = input.cursor_position();
        if input.is_mouse_button_pressed(MouseButton::Left) {
            if self.dragging {
                let delta_x = (cursor.0 - self.last_cursor.0) as f32;
                let delta_y = (cursor.1 - self.last_cursor.1) as f32;
                self.rotate(delta_x, delta_y);
            }
            self.dragging = true;
        } else {
            self.dragging = false;
        }
        self.last_cursor = cursor;

        let scroll = input.scroll_delta();
        if scroll != 0.0 {
            self.zoom(scroll);
        }

        let (forward, right) = self.pan_axes();
        let mut pan = Vec3::zeros();
        if input.is_key_pressed(KeyCode::W) {
            pan -= forward;
        }
        if input.is_key_pressed(KeyCode::S) {
            pan += forward;
        }
        if input.is_key_pressed(KeyCode::A) {
            pan -= right;
        }
        if input.is_key_pressed(KeyCode::D) {
            pan += right;
        }
        self.focus_point += pan * self.pan_speed * delta_time;
    }

    /// Camera position on the orbit sphere
    pub fn camera_position(&self) -> Vec3 {
        let (sin_h, cos_h) = utils::deg_to_rad(self.horizontal_angle).sin_cos();
        let (sin_v, cos_v) = utils::deg_to_rad(self.vertical_angle).sin_cos();
        self.focus_point
            + Vec3::new(cos_v * sin_h, sin_v, cos_v * cos_h) * self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_position() {
        let orbit = OrbitCameraControllerComponent::default();
        assert_relative_eq!(
            orbit.camera_position(),
            Vec3::new(0.0, 2.5, 4.330_127),
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_vertical_clamp_and_horizontal_wrap() {
        let mut orbit = OrbitCameraControllerComponent::default();
        orbit.rotate(0.0, -10_000.0);
        assert_eq!(orbit.vertical_angle, 89.0);
        orbit.rotate(0.0, 10_000.0);
        assert_eq!(orbit.vertical_angle, -89.0);

        orbit.rotate(200.0, 0.0);
        assert_relative_eq!(orbit.horizontal_angle, 350.0, epsilon = 1e-3);
        orbit.rotate(-400.0, 0.0);
        assert_relative_eq!(orbit.horizontal_angle, 10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut orbit = OrbitCameraControllerComponent::default();
        orbit.zoom(2.0);
        assert_relative_eq!(orbit.distance, 4.0);
        orbit.zoom(100.0);
        assert_eq!(orbit.distance, 1.0);
        orbit.zoom(-100.0);
        assert_eq!(orbit.distance, 20.0);
    }

    #[test]
    fn test_drag_starts_on_second_sample() {
        let mut input = InputManager::new();
        let mut orbit = OrbitCameraControllerComponent::default();

        input.handle_mouse_move(100.0, 100.0);
        input.handle_mouse_button(MouseButton::Left, true);
        orbit.handle_input(&input, 0.016);
        assert!(orbit.is_dragging());
        assert_eq!(orbit.horizontal_angle, 0.0);

        input.handle_mouse_move(80.0, 120.0);
        orbit.handle_input(&input, 0.016);
        // -20 px * 0.5 * 0.1 = -1 degree, negated
        assert_relative_eq!(orbit.horizontal_angle, 1.0, epsilon = 1e-4);
        assert_relative_eq!(orbit.vertical_angle, 29.0, epsilon = 1e-4);

        input.handle_mouse_button(MouseButton::Left, false);
        orbit.handle_input(&input, 0.016);
        assert!(!orbit.is_dragging());
    }

    #[test]
    fn test_pan_follows_horizontal_angle() {
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::D, true);

        let mut orbit = OrbitCameraControllerComponent::default().with_orbit(90.0, 30.0, 5.0);
        orbit.handle_input(&input, 1.0);
        // At 90 degrees the right axis is -Z
        assert_relative_eq!(orbit.focus_point, Vec3::new(0.0, 0.0, -2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_diagonal_pan_sums_axes() {
        let mut input = InputManager::new();
        input.handle_key_input(KeyCode::W, true);
        input.handle_key_input(KeyCode::D, true);
        let mut orbit = OrbitCameraControllerComponent::default();
        orbit.handle_input(&input, 1.0);
        // At 0 degrees forward is +Z and right is +X
        assert_relative_eq!(orbit.focus_point, Vec3::new(2.0, 0.0, -2.0), epsilon = 1e-5);
    }
}
