//! WASD fly controller system

use crate::ecs::components::{CameraControllerComponent, TransformComponent};
use crate::ecs::{Entity, System, World};
use crate::foundation::math::Vec3;
use crate::input::SharedInput;

/// Moves controlled entities from the shared keyboard state
pub struct CameraControllerSystem {
    input: SharedInput,
}

impl CameraControllerSystem {
    /// Create a controller system reading `input`
    pub fn new(input: SharedInput) -> Self {
        Self { input }
    }
}

impl System for CameraControllerSystem {
    type Required = (CameraControllerComponent, TransformComponent);

    fn update(&mut self, world: &mut World, entities: &[Entity], delta_time: f32) {
        let input = self.input.borrow();

        for &entity in entities {
            let movement = match world.get_component_mut::<CameraControllerComponent>(entity) {
                Ok(controller) => {
                    controller.handle_input(&input);
                    controller.movement(delta_time)
                }
                Err(err) => {
                    log::warn!("Skipping controlled entity {}: {}", entity, err);
                    continue;
                }
            };
            if movement == Vec3::zeros() {
                continue;
            }
            match world.get_component_mut::<TransformComponent>(entity) {
                Ok(transform) => transform.translate(movement),
                Err(err) => log::warn!("Skipping controlled entity {}: {}", entity, err),
            }
        }
    }
}
