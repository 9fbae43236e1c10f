//! Camera component
//!
//! Projection parameters plus lazily rebuilt view and projection matrices.
//! The projection is rebuilt when a parameter changes; the view is rebuilt
//! when the owning entity's world matrix stamp or the target changes.

use crate::config::CameraConfig;
use crate::ecs::Component;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Projection kind and its kind-specific parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in degrees
        fov_degrees: f32,
    },
    /// Orthographic projection
    Orthographic {
        /// Vertical extent of the view volume
        size: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ViewCache {
    matrix: Mat4,
    transform_stamp: u64,
    target_revision: u64,
}

/// ECS Camera component
#[derive(Debug, Clone)]
pub struct CameraComponent {
    projection: Projection,
    aspect_ratio: f32,
    near: f32,
    far: f32,
    clear_color: Vec3,
    is_main: bool,
    target: Option<Vec3>,
    up: Vec3,
    target_revision: u64,
    projection_cache: Option<Mat4>,
    view_cache: Option<ViewCache>,
}

impl Component for CameraComponent {}

impl Default for CameraComponent {
    fn default() -> Self {
        Self::perspective(60.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl CameraComponent {
    /// Create a perspective camera (field of view in degrees)
    pub fn perspective(fov_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            projection: Projection::Perspective { fov_degrees },
            aspect_ratio,
            near,
            far,
            clear_color: Vec3::new(0.2, 0.3, 0.3),
            is_main: false,
            target: None,
            up: Vec3::y(),
            target_revision: 0,
            projection_cache: None,
            view_cache: None,
        }
    }

    /// Create an orthographic camera spanning `size` vertically
    pub fn orthographic(size: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            projection: Projection::Orthographic { size },
            ..Self::perspective(60.0, aspect_ratio, near, far)
        }
    }

    /// Create a camera from configured defaults
    pub fn from_config(config: &CameraConfig) -> Self {
        let camera = if config.orthographic {
            Self::orthographic(config.ortho_size, 16.0 / 9.0, config.near, config.far)
        } else {
            Self::perspective(config.fov_degrees, 16.0 / 9.0, config.near, config.far)
        };
        camera.with_clear_color(Vec3::from(config.clear_color))
    }

    /// Builder pattern: Set the main flag
    pub fn with_main(mut self, is_main: bool) -> Self {
        self.is_main = is_main;
        self
    }

    /// Builder pattern: Look at a fixed point
    pub fn with_target(mut self, target: Vec3) -> Self {
        self.set_target(Some(target));
        self
    }

    /// Builder pattern: Set the clear color
    pub fn with_clear_color(mut self, color: Vec3) -> Self {
        self.clear_color = color;
        self
    }

    /// Projection kind and parameter
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Near clipping plane
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Far clipping plane
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Color the frame is cleared to
    pub fn clear_color(&self) -> Vec3 {
        self.clear_color
    }

    /// Whether this camera is selected for rendering
    pub fn is_main(&self) -> bool {
        self.is_main
    }

    /// Point the camera looks at, if any
    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    /// Up vector used with a target
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Switch to perspective with the given field of view in degrees
    pub fn set_perspective(&mut self, fov_degrees: f32) {
        self.projection = Projection::Perspective { fov_degrees };
        self.projection_cache = None;
    }

    /// Switch to orthographic with the given vertical extent
    pub fn set_orthographic(&mut self, size: f32) {
        self.projection = Projection::Orthographic { size };
        self.projection_cache = None;
    }

    /// Update the aspect ratio; non-positive values are ignored
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            log::warn!("Ignoring invalid camera aspect ratio {}", aspect_ratio);
            return;
        }
        if (self.aspect_ratio - aspect_ratio).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect_ratio, aspect_ratio);
        }
        self.aspect_ratio = aspect_ratio;
        self.projection_cache = None;
    }

    /// Set the near and far clipping planes
    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        self.projection_cache = None;
    }

    /// Set the clear color
    pub fn set_clear_color(&mut self, color: Vec3) {
        self.clear_color = color;
    }

    /// Set the main flag
    pub fn set_main(&mut self, is_main: bool) {
        self.is_main = is_main;
    }

    /// Look at a fixed point, or follow the transform's orientation with `None`
    pub fn set_target(&mut self, target: Option<Vec3>) {
        if self.target != target {
            self.target = target;
            self.target_revision += 1;
        }
    }

    /// Set the up vector used with a target
    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
        self.target_revision += 1;
    }

    /// True when the next `projection_matrix` call rebuilds
    pub fn is_projection_dirty(&self) -> bool {
        self.projection_cache.is_none()
    }

    /// True when a view for this world-matrix stamp would be rebuilt
    pub fn is_view_dirty(&self, transform_stamp: u64) -> bool {
        self.view_cache.map_or(true, |cache| {
            cache.transform_stamp != transform_stamp || cache.target_revision != self.target_revision
        })
    }

    /// Projection matrix, rebuilt if a parameter changed
    pub fn projection_matrix(&mut self) -> Mat4 {
        if let Some(matrix) = self.projection_cache {
            return matrix;
        }
        let matrix = match self.projection {
            Projection::Perspective { fov_degrees } => Mat4::perspective(
                utils::deg_to_rad(fov_degrees),
                self.aspect_ratio,
                self.near,
                self.far,
            ),
            Projection::Orthographic { size } => {
                Mat4::orthographic(size, self.aspect_ratio, self.near, self.far)
            }
        };
        self.projection_cache = Some(matrix);
        matrix
    }

    /// View matrix for a camera whose world matrix is `world_matrix`
    ///
    /// With a target the view looks from the world position toward it;
    /// otherwise it is the inverse of the (rotation + translation) world matrix.
    pub fn view_matrix(&mut self, world_matrix: &Mat4, transform_stamp: u64) -> Mat4 {
        if let Some(cache) = self.view_cache {
            if !self.is_view_dirty(transform_stamp) {
                return cache.matrix;
            }
        }
        let matrix = match self.target {
            Some(target) => Mat4::look_at(world_matrix.translation_part(), target, self.up),
            None => world_matrix.rigid_inverse(),
        };
        self.view_cache = Some(ViewCache {
            matrix,
            transform_stamp,
            target_revision: self.target_revision,
        });
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let camera = CameraComponent::default();
        assert_eq!(camera.projection(), Projection::Perspective { fov_degrees: 60.0 });
        assert_relative_eq!(camera.aspect_ratio(), 16.0 / 9.0);
        assert_eq!(camera.near(), 0.1);
        assert_eq!(camera.far(), 1000.0);
        assert_eq!(camera.clear_color(), Vec3::new(0.2, 0.3, 0.3));
        assert!(!camera.is_main());
        assert_eq!(camera.target(), None);
    }

    #[test]
    fn test_projection_cache_tracks_parameters() {
        let mut camera = CameraComponent::default();
        assert!(camera.is_projection_dirty());
        let first = camera.projection_matrix();
        assert!(!camera.is_projection_dirty());

        camera.set_aspect_ratio(1.0);
        assert!(camera.is_projection_dirty());
        let second = camera.projection_matrix();
        assert!(first != second);
        assert_relative_eq!(second[(0, 0)], second[(1, 1)], epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_aspect_is_ignored() {
        let mut camera = CameraComponent::default();
        camera.projection_matrix();
        camera.set_aspect_ratio(0.0);
        camera.set_aspect_ratio(f32::NAN);
        assert_relative_eq!(camera.aspect_ratio(), 16.0 / 9.0);
        assert!(!camera.is_projection_dirty());
    }

    #[test]
    fn test_orthographic_projection() {
        let mut camera = CameraComponent::orthographic(10.0, 2.0, 1.0, 11.0);
        let matrix = camera.projection_matrix();
        assert_relative_eq!(matrix, Mat4::orthographic(10.0, 2.0, 1.0, 11.0));
        assert_eq!(matrix[(3, 3)], 1.0);
    }

    #[test]
    fn test_view_uses_target_or_inverse_world() {
        let world = Mat4::translation_matrix(Vec3::new(0.0, 2.0, 5.0));

        let mut free = CameraComponent::default();
        assert_relative_eq!(
            free.view_matrix(&world, 1),
            Mat4::translation_matrix(Vec3::new(0.0, -2.0, -5.0)),
            epsilon = 1e-6
        );

        let mut aimed = CameraComponent::default().with_target(Vec3::zeros());
        assert_relative_eq!(
            aimed.view_matrix(&world, 1),
            Mat4::look_at(Vec3::new(0.0, 2.0, 5.0), Vec3::zeros(), Vec3::y()),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_view_cache_keyed_on_stamp_and_target() {
        let mut camera = CameraComponent::default();
        let world = Mat4::identity();
        camera.view_matrix(&world, 4);
        assert!(!camera.is_view_dirty(4));
        assert!(camera.is_view_dirty(5));

        camera.set_target(Some(Vec3::new(0.0, 0.0, -1.0)));
        assert!(camera.is_view_dirty(4));
        camera.view_matrix(&world, 4);
        camera.set_target(Some(Vec3::new(0.0, 0.0, -1.0)));
        assert!(!camera.is_view_dirty(4));
    }

    #[test]
    fn test_from_config() {
        let mut config = CameraConfig::default();
        config.orthographic = true;
        config.ortho_size = 8.0;
        config.clear_color = [0.0, 0.0, 0.0];
        let camera = CameraComponent::from_config(&config);
        assert_eq!(camera.projection(), Projection::Orthographic { size: 8.0 });
        assert_eq!(camera.clear_color(), Vec3::zeros());
    }
}
