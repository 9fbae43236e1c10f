//! Mesh renderer component
//!
//! Shared handles to the drawable payload and its material. Either handle
//! may be absent (a failed load, or a model drawn with whatever material
//! state the shader already holds).

use std::fmt;
use std::rc::Rc;

use crate::ecs::Component;
use crate::render::{Material, Model};

/// ECS mesh renderer component
#[derive(Clone)]
pub struct MeshRendererComponent {
    /// Drawable payload
    pub model: Option<Rc<dyn Model>>,
    /// Material applied before drawing
    pub material: Option<Rc<Material>>,
    /// Inactive renderers are skipped
    pub active: bool,
    /// Shadow casting hint for backends that support it
    pub cast_shadows: bool,
    /// Shadow receiving hint for backends that support it
    pub receive_shadows: bool,
}

impl Component for MeshRendererComponent {}

impl Default for MeshRendererComponent {
    fn default() -> Self {
        Self {
            model: None,
            material: None,
            active: true,
            cast_shadows: true,
            receive_shadows: true,
        }
    }
}

impl MeshRendererComponent {
    /// Create a renderer for `model` with an optional material
    pub fn new(model: Rc<dyn Model>, material: Option<Rc<Material>>) -> Self {
        Self {
            model: Some(model),
            material,
            ..Default::default()
        }
    }

    /// Builder pattern: Set the material
    pub fn with_material(mut self, material: Rc<Material>) -> Self {
        self.material = Some(material);
        self
    }

    /// Builder pattern: Set shadow flags
    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadows = cast;
        self.receive_shadows = receive;
        self
    }
}

impl fmt::Debug for MeshRendererComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshRendererComponent")
            .field("model", &self.model.as_ref().map(|_| "<model>"))
            .field("material", &self.material)
            .field("active", &self.active)
            .field("cast_shadows", &self.cast_shadows)
            .field("receive_shadows", &self.receive_shadows)
            .finish()
    }
}
