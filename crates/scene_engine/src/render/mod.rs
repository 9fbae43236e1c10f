//! # Rendering contracts
//!
//! The scene core does not talk to a graphics API. It drives these traits,
//! which a backend implements:
//!
//! - **ShaderProgram**: bind a program and set uniforms by name
//! - **Model**: submit its own draw calls given a bound shader
//! - **Texture**: bind to a texture unit
//! - **RenderBackend**: viewport and clear
//!
//! Handles are shared with `Rc`; the core is single-threaded.

pub mod material;

#[cfg(test)]
pub(crate) mod testing;

pub use material::Material;

use crate::foundation::math::{Mat4, Vec3};

/// Uniform names set by the core
pub mod uniforms {
    /// Object world matrix
    pub const MODEL: &str = "model";
    /// Camera view matrix
    pub const VIEW: &str = "view";
    /// Camera projection matrix
    pub const PROJECTION: &str = "projection";

    /// Material ambient factor
    pub const MATERIAL_AMBIENT: &str = "material.ambient";
    /// Material diffuse factor
    pub const MATERIAL_DIFFUSE: &str = "material.diffuse";
    /// Material specular factor
    pub const MATERIAL_SPECULAR: &str = "material.specular";
    /// Material shininess exponent
    pub const MATERIAL_SHININESS: &str = "material.shininess";

    /// Diffuse map sampler unit
    pub const MATERIAL_DIFFUSE_MAP: &str = "material.diffuseMap";
    /// Specular map sampler unit
    pub const MATERIAL_SPECULAR_MAP: &str = "material.specularMap";
    /// Normal map sampler unit
    pub const MATERIAL_NORMAL_MAP: &str = "material.normalMap";

    /// 1 when a diffuse map is bound
    pub const MATERIAL_HAS_DIFFUSE_MAP: &str = "material.hasDiffuseMap";
    /// 1 when a specular map is bound
    pub const MATERIAL_HAS_SPECULAR_MAP: &str = "material.hasSpecularMap";
    /// 1 when a normal map is bound
    pub const MATERIAL_HAS_NORMAL_MAP: &str = "material.hasNormalMap";
}

/// A compiled shader program
pub trait ShaderProgram {
    /// Bind for subsequent uniform and draw calls
    fn use_program(&self);

    /// Set a 4x4 matrix uniform (column-major)
    fn set_mat4(&self, name: &str, value: &Mat4);

    /// Set a vec3 uniform
    fn set_vec3(&self, name: &str, value: &Vec3);

    /// Set a float uniform
    fn set_float(&self, name: &str, value: f32);

    /// Set an int uniform
    fn set_int(&self, name: &str, value: i32);
}

/// Something that can draw itself with an already-bound shader
pub trait Model {
    /// Submit draw calls
    fn render(&self, shader: &dyn ShaderProgram);
}

/// A texture resident on the backend
pub trait Texture {
    /// Bind to a texture unit
    fn bind(&self, unit: u32);
}

/// Frame-level backend operations
pub trait RenderBackend {
    /// Set the viewport rectangle
    fn set_viewport(&self, x: i32, y: i32, width: u32, height: u32);

    /// Clear color and depth
    fn clear(&self, color: &Vec3);
}
