//! Follow camera system
//!
//! Places every camera a fixed offset away from a target entity and,
//! optionally, turns it to face the target.

use crate::config::FollowConfig;
use crate::ecs::components::{CameraComponent, TransformComponent};
use crate::ecs::{Entity, System, World};
use crate::foundation::math::{Mat4Ext, Vec3, Vec3Ext};

/// Largest forward-vector error accepted as already aimed
const AIM_TOLERANCE: f32 = 1e-4;

/// Keeps cameras at `target + offset`
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFollowSystem {
    target: Option<Entity>,
    /// World-space offset from the target
    pub offset: Vec3,
    /// Turn the camera toward the target after moving it
    pub look_at_target: bool,
}

impl Default for CameraFollowSystem {
    fn default() -> Self {
        Self {
            target: None,
            offset: Vec3::new(0.0, 2.0, -5.0),
            look_at_target: true,
        }
    }
}

impl CameraFollowSystem {
    /// Follow `target` with the default offset
    pub fn new(target: Option<Entity>) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    /// Create from configuration
    pub fn from_config(config: &FollowConfig) -> Self {
        Self {
            target: None,
            offset: Vec3::from(config.offset),
            look_at_target: config.look_at_target,
        }
    }

    /// Entity being followed
    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// Change (or clear) the entity being followed
    pub fn set_target(&mut self, target: Option<Entity>) {
        self.target = target;
    }
}

impl System for CameraFollowSystem {
    type Required = (TransformComponent, CameraComponent);

    fn update(&mut self, world: &mut World, entities: &[Entity], _delta_time: f32) {
        let Some(target) = self.target else {
            return;
        };
        let target_position = match world.world_matrix(target) {
            Ok(matrix) => matrix.translation_part(),
            Err(err) => {
                log::debug!("Follow target unavailable: {}", err);
                return;
            }
        };
        let desired = target_position + self.offset;

        for &entity in entities {
            if entity == target {
                continue;
            }
            let transform = match world.get_component_mut::<TransformComponent>(entity) {
                Ok(transform) => transform,
                Err(err) => {
                    log::warn!("Skipping camera {}: {}", entity, err);
                    continue;
                }
            };
            let moved = transform.position() != desired;
            if moved {
                transform.set_position(desired);
            }
            if self.look_at_target {
                let facing = (target_position - desired).normalized_or_self();
                if moved || (transform.forward() - facing).norm() > AIM_TOLERANCE {
                    transform.look_at(target_position, Vec3::y());
                }
            }
        }
    }
}
