//! Orbit camera controller system
//!
//! Mouse drag orbits, the scroll wheel zooms, and WASD pans the focus point.
//! The entity's transform is placed on the orbit and turned toward the
//! focus point; a camera on the same entity gets the focus point as target.

use crate::ecs::components::{CameraComponent, OrbitCameraControllerComponent, TransformComponent};
use crate::ecs::{Entity, System, World};
use crate::foundation::math::Vec3;
use crate::input::SharedInput;

/// Applies orbit controls from the shared input state
pub struct OrbitCameraControllerSystem {
    input: SharedInput,
}

impl OrbitCameraControllerSystem {
    /// Create an orbit system reading `input`
    pub fn new(input: SharedInput) -> Self {
        Self { input }
    }
}

impl System for OrbitCameraControllerSystem {
    type Required = (OrbitCameraControllerComponent, TransformComponent);

    fn update(&mut self, world: &mut World, entities: &[Entity], delta_time: f32) {
        let input = self.input.borrow();

        for &entity in entities {
            let (position, focus_point) =
                match world.get_component_mut::<OrbitCameraControllerComponent>(entity) {
                    Ok(orbit) => {
                        orbit.handle_input(&input, delta_time);
                        (orbit.camera_position(), orbit.focus_point)
                    }
                    Err(err) => {
                        log::warn!("Skipping orbit entity {}: {}", entity, err);
                        continue;
                    }
                };

            match world.get_component_mut::<TransformComponent>(entity) {
                Ok(transform) => {
                    if transform.position() != position {
                        transform.set_position(position);
                        transform.look_at(focus_point, Vec3::y());
                    }
                }
                Err(err) => {
                    log::warn!("Skipping orbit entity {}: {}", entity, err);
                    continue;
                }
            }

            if let Ok(camera) = world.get_component_mut::<CameraComponent>(entity) {
                camera.set_target(Some(focus_point));
            }
        }
    }
}
