//! Math utilities and types
//!
//! Vector, quaternion, and matrix types are `nalgebra` aliases. `Matrix4`
//! stores its elements column-major, so element `(row, col)` lives at
//! `as_slice()[col * 4 + row]`, which is the layout uploaded to shaders.
//!
//! The extension traits spell out the scene-graph builders explicitly
//! (TRS composition, look-at, trace-based matrix to quaternion) so the
//! conventions used by transforms and cameras are pinned in one place.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit, UnitQuaternion,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type (column-major storage)
pub type Mat4 = Matrix4<f32>;

/// Unit quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Raw (possibly non-unit) quaternion
pub type RawQuat = Quaternion<f32>;

/// Extension trait for `Vec3`
pub trait Vec3Ext {
    /// Normalize, returning the vector unchanged when its magnitude is zero
    fn normalized_or_self(&self) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn normalized_or_self(&self) -> Vec3 {
        let magnitude = self.magnitude();
        if magnitude > 0.0 {
            *self / magnitude
        } else {
            *self
        }
    }
}

/// Extension trait for raw quaternions
pub trait QuaternionExt {
    /// Normalize, returning the quaternion unchanged when its magnitude is zero
    fn normalized_or_self(&self) -> RawQuat;
}

impl QuaternionExt for RawQuat {
    fn normalized_or_self(&self) -> RawQuat {
        let magnitude = self.norm();
        if magnitude > 0.0 {
            Quaternion::from_vector(self.coords / magnitude)
        } else {
            *self
        }
    }
}

/// Extension trait for `Quat` construction
pub trait QuatExt {
    /// Build a rotation from Euler angles in radians
    ///
    /// Roll rotates about X, pitch about Y, and yaw about Z; the three
    /// half-angle rotations are combined as `yaw * pitch * roll`.
    fn from_pitch_yaw_roll(pitch: f32, yaw: f32, roll: f32) -> Quat;

    /// Extract the rotation held in the upper 3x3 block of a matrix
    ///
    /// Uses the trace when it is positive; otherwise branches on the largest
    /// diagonal element so the square root never sees a tiny or negative value.
    fn from_mat4(matrix: &Mat4) -> Quat;
}

impl QuatExt for Quat {
    fn from_pitch_yaw_roll(pitch: f32, yaw: f32, roll: f32) -> Quat {
        let (sy, cy) = (yaw * 0.5).sin_cos();
        let (sp, cp) = (pitch * 0.5).sin_cos();
        let (sr, cr) = (roll * 0.5).sin_cos();

        let w = cy * cp * cr + sy * sp * sr;
        let x = cy * cp * sr - sy * sp * cr;
        let y = sy * cp * sr + cy * sp * cr;
        let z = sy * cp * cr - cy * sp * sr;

        Quat::new_normalize(Quaternion::new(w, x, y, z))
    }

    fn from_mat4(m: &Mat4) -> Quat {
        let trace = m[(0, 0)] + m[(1, 1)] + m[(2, 2)];

        let (w, x, y, z) = if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            (
                0.25 / s,
                (m[(2, 1)] - m[(1, 2)]) * s,
                (m[(0, 2)] - m[(2, 0)]) * s,
                (m[(1, 0)] - m[(0, 1)]) * s,
            )
        } else if m[(0, 0)] > m[(1, 1)] && m[(0, 0)] > m[(2, 2)] {
            let s = 2.0 * (1.0 + m[(0, 0)] - m[(1, 1)] - m[(2, 2)]).sqrt();
            (
                (m[(2, 1)] - m[(1, 2)]) / s,
                0.25 * s,
                (m[(0, 1)] + m[(1, 0)]) / s,
                (m[(0, 2)] + m[(2, 0)]) / s,
            )
        } else if m[(1, 1)] > m[(2, 2)] {
            let s = 2.0 * (1.0 + m[(1, 1)] - m[(0, 0)] - m[(2, 2)]).sqrt();
            (
                (m[(0, 2)] - m[(2, 0)]) / s,
                (m[(0, 1)] + m[(1, 0)]) / s,
                0.25 * s,
                (m[(1, 2)] + m[(2, 1)]) / s,
            )
        } else {
            let s = 2.0 * (1.0 + m[(2, 2)] - m[(0, 0)] - m[(1, 1)]).sqrt();
            (
                (m[(1, 0)] - m[(0, 1)]) / s,
                (m[(0, 2)] + m[(2, 0)]) / s,
                (m[(1, 2)] + m[(2, 1)]) / s,
                0.25 * s,
            )
        };

        Quat::new_normalize(Quaternion::new(w, x, y, z))
    }
}

/// Extension trait for Mat4 with the scene-graph builders
pub trait Mat4Ext {
    /// Create a translation matrix
    fn translation_matrix(translation: Vec3) -> Mat4;

    /// Create a (non-uniform) scale matrix
    fn scale_matrix(scale: Vec3) -> Mat4;

    /// Create a rotation matrix from a unit quaternion
    fn rotation_matrix(rotation: &Quat) -> Mat4;

    /// Compose `T * R * S`: applied to a column vector, scale happens first
    fn trs(translation: Vec3, rotation: &Quat, scale: Vec3) -> Mat4;

    /// Create a look-at view matrix transforming world points into camera space
    ///
    /// The camera looks down its local -Z axis; the basis vectors are packed
    /// as rows with translation `-axis · eye`.
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Create an OpenGL-style perspective projection (clip z in [-1, 1])
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create an OpenGL-style orthographic projection spanning `size` vertically
    fn orthographic(size: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Invert a rotation + translation matrix (transpose the rotation block)
    fn rigid_inverse(&self) -> Mat4;

    /// The translation column
    fn translation_part(&self) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn translation_matrix(translation: Vec3) -> Mat4 {
        let mut result = Mat4::identity();
        result[(0, 3)] = translation.x;
        result[(1, 3)] = translation.y;
        result[(2, 3)] = translation.z;
        result
    }

    fn scale_matrix(scale: Vec3) -> Mat4 {
        let mut result = Mat4::identity();
        result[(0, 0)] = scale.x;
        result[(1, 1)] = scale.y;
        result[(2, 2)] = scale.z;
        result
    }

    fn rotation_matrix(rotation: &Quat) -> Mat4 {
        let q = rotation.quaternion();
        let (x, y, z, w) = (q.i, q.j, q.k, q.w);

        let xx = x * x;
        let xy = x * y;
        let xz = x * z;
        let xw = x * w;
        let yy = y * y;
        let yz = y * z;
        let yw = y * w;
        let zz = z * z;
        let zw = z * w;

        let mut result = Mat4::identity();
        result[(0, 0)] = 1.0 - 2.0 * (yy + zz);
        result[(0, 1)] = 2.0 * (xy - zw);
        result[(0, 2)] = 2.0 * (xz + yw);

        result[(1, 0)] = 2.0 * (xy + zw);
        result[(1, 1)] = 1.0 - 2.0 * (xx + zz);
        result[(1, 2)] = 2.0 * (yz - xw);

        result[(2, 0)] = 2.0 * (xz - yw);
        result[(2, 1)] = 2.0 * (yz + xw);
        result[(2, 2)] = 1.0 - 2.0 * (xx + yy);
        result
    }

    fn trs(translation: Vec3, rotation: &Quat, scale: Vec3) -> Mat4 {
        Mat4::translation_matrix(translation)
            * Mat4::rotation_matrix(rotation)
            * Mat4::scale_matrix(scale)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (eye - target).normalized_or_self();
        let right = up.cross(&forward).normalized_or_self();
        let camera_up = forward.cross(&right);

        Mat4::new(
            right.x, right.y, right.z, -right.dot(&eye),
            camera_up.x, camera_up.y, camera_up.z, -camera_up.dot(&eye),
            forward.x, forward.y, forward.z, -forward.dot(&eye),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = -(far + near) / (far - near);
        result[(2, 3)] = -(2.0 * far * near) / (far - near);
        result[(3, 2)] = -1.0;
        result
    }

    fn orthographic(size: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let half_height = size * 0.5;
        let half_width = half_height * aspect;

        let mut result = Mat4::identity();
        result[(0, 0)] = 1.0 / half_width;
        result[(1, 1)] = 1.0 / half_height;
        result[(2, 2)] = -2.0 / (far - near);
        result[(2, 3)] = -(far + near) / (far - near);
        result
    }

    fn rigid_inverse(&self) -> Mat4 {
        let mut result = Mat4::identity();
        for row in 0..3 {
            for col in 0..3 {
                result[(row, col)] = self[(col, row)];
            }
        }

        let translation = self.translation_part();
        for row in 0..3 {
            result[(row, 3)] = -(result[(row, 0)] * translation.x
                + result[(row, 1)] * translation.y
                + result[(row, 2)] * translation.z);
        }
        result
    }

    fn translation_part(&self) -> Vec3 {
        Vec3::new(self[(0, 3)], self[(1, 3)], self[(2, 3)])
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Wrap an angle in degrees into [0, 360)
    pub fn wrap_degrees(degrees: f32) -> f32 {
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    }
}
