//! # Rendering System
//!
//! Draws every entity with a transform and a mesh renderer from the point
//! of view of the main camera. Per frame: clear with the camera's clear
//! color, bind the shared shader, upload view and projection, then for each
//! entity upload its world matrix, apply its material, and let its model
//! submit the draw.

use std::rc::Rc;

use crate::ecs::components::{CameraComponent, MeshRendererComponent, TransformComponent};
use crate::ecs::{EcsResult, Entity, System, World};
use crate::foundation::math::{Mat4, Vec3};
use crate::render::{uniforms, RenderBackend, ShaderProgram};

/// Counters kept by the render system
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames drawn with a main camera
    pub frames_rendered: u64,
    /// Frames skipped for lack of a usable main camera
    pub frames_skipped: u64,
    /// Entities drawn
    pub entities_drawn: u64,
    /// Entities skipped (inactive, no model, or missing a component)
    pub entities_skipped: u64,
    /// Camera used for the last rendered frame
    pub last_camera: Option<Entity>,
}

/// Renders mesh entities through the shader and backend contracts
pub struct RenderSystem {
    shader: Rc<dyn ShaderProgram>,
    backend: Rc<dyn RenderBackend>,
    stats: RenderStats,
}

impl RenderSystem {
    /// Create a render system drawing with `shader` through `backend`
    pub fn new(shader: Rc<dyn ShaderProgram>, backend: Rc<dyn RenderBackend>) -> Self {
        Self {
            shader,
            backend,
            stats: RenderStats::default(),
        }
    }

    /// Counters since creation
    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    fn camera_state(world: &mut World, camera: Entity) -> EcsResult<(Mat4, Mat4, Vec3)> {
        let view = world.camera_view_matrix(camera)?;
        let projection = world.camera_projection_matrix(camera)?;
        let clear_color = world.get_component::<CameraComponent>(camera)?.clear_color();
        Ok((view, projection, clear_color))
    }

    fn draw_entity(&mut self, world: &mut World, entity: Entity) {
        let (model, material) = match world.get_component::<MeshRendererComponent>(entity) {
            Ok(renderer) if renderer.active => (renderer.model.clone(), renderer.material.clone()),
            Ok(_) => {
                self.stats.entities_skipped += 1;
                return;
            }
            Err(err) => {
                log::warn!("Skipping entity {}: {}", entity, err);
                self.stats.entities_skipped += 1;
                return;
            }
        };
        let Some(model) = model else {
            log::debug!("Entity {} has no model, skipping", entity);
            self.stats.entities_skipped += 1;
            return;
        };
        let world_matrix = match world.world_matrix(entity) {
            Ok(matrix) => matrix,
            Err(err) => {
                log::warn!("Skipping entity {}: {}", entity, err);
                self.stats.entities_skipped += 1;
                return;
            }
        };

        let shader = self.shader.as_ref();
        shader.set_mat4(uniforms::MODEL, &world_matrix);
        if let Some(material) = material {
            material.apply(shader);
        }
        model.render(shader);
        self.stats.entities_drawn += 1;
    }
}

impl System for RenderSystem {
    type Required = (TransformComponent, MeshRendererComponent);

    fn render(&mut self, world: &mut World, entities: &[Entity]) {
        let Some(camera) = world.find_main_camera() else {
            log::warn!("No main camera found, skipping render pass");
            self.stats.frames_skipped += 1;
            return;
        };
        let (view, projection, clear_color) = match Self::camera_state(world, camera) {
            Ok(state) => state,
            Err(err) => {
                log::warn!("Main camera {} unusable, skipping render pass: {}", camera, err);
                self.stats.frames_skipped += 1;
                return;
            }
        };

        self.backend.clear(&clear_color);
        self.shader.use_program();
        self.shader.set_mat4(uniforms::VIEW, &view);
        self.shader.set_mat4(uniforms::PROJECTION, &projection);

        for &entity in entities {
            self.draw_entity(world, entity);
        }

        self.stats.frames_rendered += 1;
        self.stats.last_camera = Some(camera);
        log::trace!("Rendered {} entities from camera {}", entities.len(), camera);
    }
}
