//! Recording collaborators for tests
//!
//! Every fake appends to a shared `RenderLog`, so a test can assert on the
//! exact order of clears, uniform uploads, binds, and draws.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Model, RenderBackend, ShaderProgram, Texture};
use crate::foundation::math::{Mat4, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub enum Uniform {
    Mat4(Mat4),
    Vec3(Vec3),
    Float(f32),
    Int(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Viewport(i32, i32, u32, u32),
    Clear(Vec3),
    UseProgram,
    Uniform(String, Uniform),
    BindTexture(u32),
    Draw(String),
}

pub type RenderLog = Rc<RefCell<Vec<RenderEvent>>>;

pub fn new_log() -> RenderLog {
    Rc::new(RefCell::new(Vec::new()))
}

fn push(log: &RenderLog, event: RenderEvent) {
    log.borrow_mut().push(event);
}

/// Draws in order, each with the `model` uniform current at draw time
pub fn draws_with_model(log: &RenderLog) -> Vec<(String, Option<Mat4>)> {
    let mut current = None;
    let mut draws = Vec::new();
    for event in log.borrow().iter() {
        match event {
            RenderEvent::Uniform(name, Uniform::Mat4(matrix)) if name == "model" => {
                current = Some(*matrix);
            }
            RenderEvent::Draw(model) => draws.push((model.clone(), current)),
            _ => {}
        }
    }
    draws
}

#[derive(Debug, Default)]
pub struct RecordingShader {
    log: RenderLog,
}

impl RecordingShader {
    pub fn with_log(log: RenderLog) -> Self {
        Self { log }
    }

    pub fn uniforms(&self) -> Vec<(String, Uniform)> {
        self.log
            .borrow()
            .iter()
            .filter_map(|event| match event {
                RenderEvent::Uniform(name, value) => Some((name.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    fn last(&self, name: &str) -> Option<Uniform> {
        self.uniforms()
            .into_iter()
            .rev()
            .find(|(uniform, _)| uniform == name)
            .map(|(_, value)| value)
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        match self.last(name)? {
            Uniform::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.last(name)? {
            Uniform::Float(value) => Some(value),
            _ => None,
        }
    }

    pub fn mat4(&self, name: &str) -> Option<Mat4> {
        match self.last(name)? {
            Uniform::Mat4(value) => Some(value),
            _ => None,
        }
    }

    pub fn use_count(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|event| **event == RenderEvent::UseProgram)
            .count()
    }
}

impl ShaderProgram for RecordingShader {
    fn use_program(&self) {
        push(&self.log, RenderEvent::UseProgram);
    }

    fn set_mat4(&self, name: &str, value: &Mat4) {
        push(&self.log, RenderEvent::Uniform(name.to_string(), Uniform::Mat4(*value)));
    }

    fn set_vec3(&self, name: &str, value: &Vec3) {
        push(&self.log, RenderEvent::Uniform(name.to_string(), Uniform::Vec3(*value)));
    }

    fn set_float(&self, name: &str, value: f32) {
        push(&self.log, RenderEvent::Uniform(name.to_string(), Uniform::Float(value)));
    }

    fn set_int(&self, name: &str, value: i32) {
        push(&self.log, RenderEvent::Uniform(name.to_string(), Uniform::Int(value)));
    }
}

#[derive(Debug, Default)]
pub struct RecordingTexture {
    units: RefCell<Vec<u32>>,
    log: Option<RenderLog>,
}

impl RecordingTexture {
    pub fn with_log(log: RenderLog) -> Self {
        Self {
            units: RefCell::default(),
            log: Some(log),
        }
    }

    pub fn bound_units(&self) -> Vec<u32> {
        self.units.borrow().clone()
    }
}

impl Texture for RecordingTexture {
    fn bind(&self, unit: u32) {
        self.units.borrow_mut().push(unit);
        if let Some(log) = &self.log {
            push(log, RenderEvent::BindTexture(unit));
        }
    }
}

#[derive(Debug)]
pub struct RecordingModel {
    name: String,
    log: RenderLog,
}

impl RecordingModel {
    pub fn new(name: &str, log: RenderLog) -> Self {
        Self {
            name: name.to_string(),
            log,
        }
    }
}

impl Model for RecordingModel {
    fn render(&self, _shader: &dyn ShaderProgram) {
        push(&self.log, RenderEvent::Draw(self.name.clone()));
    }
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    log: RenderLog,
}

impl RecordingBackend {
    pub fn with_log(log: RenderLog) -> Self {
        Self { log }
    }
}

impl RenderBackend for RecordingBackend {
    fn set_viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        push(&self.log, RenderEvent::Viewport(x, y, width, height));
    }

    fn clear(&self, color: &Vec3) {
        push(&self.log, RenderEvent::Clear(*color));
    }
}
