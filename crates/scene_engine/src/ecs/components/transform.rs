//! Transform component for the ECS system
//!
//! Position, rotation, and scale in the parent's space, plus the cached
//! world matrix. Every mutation goes through a setter that bumps the local
//! revision; the world resolves and stores the matrix on read (see
//! `World::world_matrix`).

use crate::ecs::Component;
use crate::foundation::math::{Mat4, Mat4Ext, Quat, QuatExt, Vec3, Vec3Ext};

#[derive(Debug, Clone, Copy, PartialEq)]
struct WorldMatrixCache {
    matrix: Mat4,
    revision: u64,
    parent_stamp: Option<u64>,
    stamp: u64,
}

/// ECS Transform component
///
/// Coordinates are Y-up right-handed; the default forward direction is -Z.
#[derive(Debug, Clone)]
pub struct TransformComponent {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    revision: u64,
    cache: Option<WorldMatrixCache>,
    recompute_count: u64,
}

impl Component for TransformComponent {}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            revision: 0,
            cache: None,
            recompute_count: 0,
        }
    }
}

impl TransformComponent {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create from position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create from position, rotation, and scale
    pub fn from_transform(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            ..Default::default()
        }
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    /// Builder pattern: Set rotation from quaternion
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Builder pattern: Set rotation from Euler angles in radians
    pub fn with_rotation_euler(mut self, pitch: f32, yaw: f32, roll: f32) -> Self {
        self.set_rotation(Quat::from_pitch_yaw_roll(pitch, yaw, roll));
        self
    }

    /// Builder pattern: Set scale (uniform)
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.set_scale(Vec3::new(scale, scale, scale));
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Local scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set the local position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.mark_dirty();
    }

    /// Set the local rotation
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.mark_dirty();
    }

    /// Set the local scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.mark_dirty();
    }

    /// Move by `offset` in parent space
    pub fn translate(&mut self, offset: Vec3) {
        self.set_position(self.position + offset);
    }

    /// Apply `rotation` on top of the current one (`rotation * current`)
    pub fn rotate(&mut self, rotation: Quat) {
        self.set_rotation(rotation * self.rotation);
    }

    /// Orient local -Z toward `target`
    ///
    /// Leaves the rotation unchanged when the target coincides with the
    /// position or `up` is parallel to the viewing direction.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let back = (self.position - target).normalized_or_self();
        let right = up.cross(&back).normalized_or_self();
        if back.magnitude_squared() == 0.0 || right.magnitude_squared() == 0.0 {
            log::debug!("Degenerate look_at toward {:?}, rotation unchanged", target);
            return;
        }
        let camera_up = back.cross(&right);

        let basis = Mat4::new(
            right.x, camera_up.x, back.x, 0.0,
            right.y, camera_up.y, back.y, 0.0,
            right.z, camera_up.z, back.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        self.set_rotation(Quat::from_mat4(&basis));
    }

    /// Direction local -Z points to in parent space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::new(0.0, 0.0, -1.0)
    }

    /// Local TRS matrix
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::trs(self.position, &self.rotation, self.scale)
    }

    /// Invalidate the cached world matrix
    pub fn mark_dirty(&mut self) {
        self.revision += 1;
    }

    /// True when the local values changed since the world matrix was cached
    ///
    /// Ancestor changes are not visible here; the world detects those when
    /// the matrix is read.
    pub fn is_dirty(&self) -> bool {
        self.cache.map_or(true, |cache| cache.revision != self.revision)
    }

    /// Number of times the world matrix has been recomputed
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Cached world matrix and its stamp, if still valid for `parent_stamp`
    pub(crate) fn cached_world(&self, parent_stamp: Option<u64>) -> Option<(Mat4, u64)> {
        self.cache
            .filter(|cache| cache.revision == self.revision && cache.parent_stamp == parent_stamp)
            .map(|cache| (cache.matrix, cache.stamp))
    }

    pub(crate) fn store_world(&mut self, matrix: Mat4, parent_stamp: Option<u64>, stamp: u64) {
        self.cache = Some(WorldMatrixCache {
            matrix,
            revision: self.revision,
            parent_stamp,
            stamp,
        });
        self.recompute_count += 1;
    }
}
