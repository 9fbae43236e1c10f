//! Logging stand-ins for the graphics collaborators
//!
//! The demo runs without a window or GPU; these implement the render
//! contracts by counting calls and tracing what a real backend would do.

use std::cell::Cell;

use scene_engine::foundation::math::{Mat4, Vec3};
use scene_engine::render::{Model, RenderBackend, ShaderProgram, Texture};

/// Shader that traces uniform uploads
#[derive(Debug)]
pub struct LogShader {
    name: String,
}

impl LogShader {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    fn record(&self, uniform: &str) {
        log::trace!("[{}] set {}", self.name, uniform);
    }
}

impl ShaderProgram for LogShader {
    fn use_program(&self) {
        log::trace!("use program {}", self.name);
    }

    fn set_mat4(&self, name: &str, _value: &Mat4) {
        self.record(name);
    }

    fn set_vec3(&self, name: &str, _value: &Vec3) {
        self.record(name);
    }

    fn set_float(&self, name: &str, _value: f32) {
        self.record(name);
    }

    fn set_int(&self, name: &str, _value: i32) {
        self.record(name);
    }
}

/// Model that pretends to draw a fixed number of triangles
#[derive(Debug)]
pub struct LogModel {
    name: String,
    triangles: u32,
}

impl LogModel {
    pub fn new(name: &str, triangles: u32) -> Self {
        Self {
            name: name.to_string(),
            triangles,
        }
    }
}

impl Model for LogModel {
    fn render(&self, _shader: &dyn ShaderProgram) {
        log::trace!("draw {} ({} triangles)", self.name, self.triangles);
    }
}

/// Texture that only logs its binds
#[derive(Debug)]
pub struct LogTexture {
    name: String,
}

impl LogTexture {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Texture for LogTexture {
    fn bind(&self, unit: u32) {
        log::trace!("bind texture {} to unit {}", self.name, unit);
    }
}

/// Backend that counts clears
#[derive(Debug, Default)]
pub struct LogBackend {
    clears: Cell<u64>,
}

impl LogBackend {
    pub fn clears(&self) -> u64 {
        self.clears.get()
    }
}

impl RenderBackend for LogBackend {
    fn set_viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        log::debug!("viewport {}x{} at ({}, {})", width, height, x, y);
    }

    fn clear(&self, color: &Vec3) {
        self.clears.set(self.clears.get() + 1);
        log::trace!("clear to ({:.2}, {:.2}, {:.2})", color.x, color.y, color.z);
    }
}
