//! Material system for rendering
//!
//! Scalar lighting factors plus optional texture maps. Maps bind to fixed
//! units: diffuse 0, specular 1, normal 2.

use std::fmt;
use std::rc::Rc;

use super::{uniforms, ShaderProgram, Texture};

/// Texture unit of the diffuse map
pub const DIFFUSE_MAP_UNIT: u32 = 0;
/// Texture unit of the specular map
pub const SPECULAR_MAP_UNIT: u32 = 1;
/// Texture unit of the normal map
pub const NORMAL_MAP_UNIT: u32 = 2;

/// Material properties for 3D rendering
#[derive(Clone)]
pub struct Material {
    /// Ambient factor
    pub ambient: f32,
    /// Diffuse factor
    pub diffuse: f32,
    /// Specular factor
    pub specular: f32,
    /// Specular exponent
    pub shininess: f32,
    /// Diffuse (albedo) map
    pub diffuse_map: Option<Rc<dyn Texture>>,
    /// Specular map
    pub specular_map: Option<Rc<dyn Texture>>,
    /// Normal map
    pub normal_map: Option<Rc<dyn Texture>>,
}

impl Material {
    /// Create a new material with default properties
    pub fn new() -> Self {
        Self {
            ambient: 0.2,
            diffuse: 0.8,
            specular: 1.0,
            shininess: 32.0,
            diffuse_map: None,
            specular_map: None,
            normal_map: None,
        }
    }

    /// Set the scalar lighting factors
    pub fn with_factors(mut self, ambient: f32, diffuse: f32, specular: f32) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    /// Set the specular exponent
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess.max(0.0);
        self
    }

    /// Set the diffuse map
    pub fn with_diffuse_map(mut self, texture: Rc<dyn Texture>) -> Self {
        self.diffuse_map = Some(texture);
        self
    }

    /// Set the specular map
    pub fn with_specular_map(mut self, texture: Rc<dyn Texture>) -> Self {
        self.specular_map = Some(texture);
        self
    }

    /// Set the normal map
    pub fn with_normal_map(mut self, texture: Rc<dyn Texture>) -> Self {
        self.normal_map = Some(texture);
        self
    }

    /// Upload factors, bind maps, and set the `has*Map` flags
    pub fn apply(&self, shader: &dyn ShaderProgram) {
        shader.set_float(uniforms::MATERIAL_AMBIENT, self.ambient);
        shader.set_float(uniforms::MATERIAL_DIFFUSE, self.diffuse);
        shader.set_float(uniforms::MATERIAL_SPECULAR, self.specular);
        shader.set_float(uniforms::MATERIAL_SHININESS, self.shininess);

        let maps = [
            (&self.diffuse_map, DIFFUSE_MAP_UNIT, uniforms::MATERIAL_DIFFUSE_MAP, uniforms::MATERIAL_HAS_DIFFUSE_MAP),
            (&self.specular_map, SPECULAR_MAP_UNIT, uniforms::MATERIAL_SPECULAR_MAP, uniforms::MATERIAL_HAS_SPECULAR_MAP),
            (&self.normal_map, NORMAL_MAP_UNIT, uniforms::MATERIAL_NORMAL_MAP, uniforms::MATERIAL_HAS_NORMAL_MAP),
        ];
        for (map, unit, sampler, flag) in maps {
            match map {
                Some(texture) => {
                    texture.bind(unit);
                    shader.set_int(sampler, unit as i32);
                    shader.set_int(flag, 1);
                }
                None => shader.set_int(flag, 0),
            }
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Material")
            .field("ambient", &self.ambient)
            .field("diffuse", &self.diffuse)
            .field("specular", &self.specular)
            .field("shininess", &self.shininess)
            .field("diffuse_map", &self.diffuse_map.is_some())
            .field("specular_map", &self.specular_map.is_some())
            .field("normal_map", &self.normal_map.is_some())
            .finish()
    }
}
