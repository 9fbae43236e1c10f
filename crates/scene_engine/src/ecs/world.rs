//! ECS World implementation
//!
//! The world owns every entity slot, every component array, and every
//! registered system. Systems are dispatched in registration order; each
//! one receives a snapshot of the entities matching its required mask.

use std::any::type_name;

use super::component::ComponentId;
use super::entity::{EntityAllocator, EntityState};
use super::storage::{ComponentArray, ErasedStorage};
use super::system::{AnySystem, SystemSlot};
use super::{Component, ComponentMask, ComponentSet, EcsError, EcsResult, Entity, System, SystemId};
use crate::config::{ConfigError, EngineConfig};
use crate::ecs::components::{CameraComponent, TransformComponent};
use crate::foundation::math::Mat4;

/// Default entity capacity
pub const DEFAULT_MAX_ENTITIES: usize = 10_000;

/// ECS World containing all entities, components, and systems
pub struct World {
    pub(crate) entities: EntityAllocator,
    storages: Vec<Option<Box<dyn ErasedStorage>>>,
    systems: Vec<SystemSlot>,
    next_stamp: u64,
}

impl World {
    /// Create a world with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTITIES)
    }

    /// Create a world with a fixed entity capacity
    pub fn with_capacity(capacity: usize) -> Self {
        log::debug!("Creating world with capacity for {} entities", capacity);
        Self {
            entities: EntityAllocator::new(capacity),
            storages: Vec::new(),
            systems: Vec::new(),
            next_stamp: 0,
        }
    }

    /// Create a world sized from validated configuration
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_capacity(config.max_entities))
    }

    // ---------------------------------------------------------------------
    // Entities
    // ---------------------------------------------------------------------

    /// Create a new entity from the free list
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        let entity = self.entities.allocate().ok_or(EcsError::CapacityExhausted {
            capacity: self.entities.capacity(),
        })?;
        log::trace!("Created entity {}", entity);

        // Systems with an empty requirement track every entity
        for system in &mut self.systems {
            system.refresh_interest(entity, ComponentMask::empty());
        }
        Ok(entity)
    }

    /// Flag an entity for reclamation on the next `refresh`
    ///
    /// Stale handles and entities already pending are ignored.
    pub fn destroy_entity(&mut self, entity: Entity) {
        if let Some(slot) = self.entities.get_mut(entity) {
            if slot.state == EntityState::Active {
                slot.state = EntityState::PendingDestroy;
                log::trace!("Entity {} pending destroy", entity);
            }
        }
    }

    /// Reclaim every entity pending destruction, returning how many were freed
    pub fn refresh(&mut self) -> usize {
        let pending: Vec<Entity> = self.entities.iter_state(EntityState::PendingDestroy).collect();
        for entity in &pending {
            self.reclaim(*entity);
        }
        if !pending.is_empty() {
            log::debug!("Reclaimed {} entities", pending.len());
        }
        pending.len()
    }

    fn reclaim(&mut self, entity: Entity) {
        for system in &mut self.systems {
            system.forget(entity);
        }

        let (parent, children) = match self.entities.get_mut(entity) {
            Some(slot) => (slot.parent.take(), std::mem::take(&mut slot.children)),
            None => return,
        };

        if let Some(parent) = parent {
            if let Some(parent_slot) = self.entities.get_mut(parent) {
                parent_slot.children.retain(|child| *child != entity);
            }
        }

        for child in children {
            if let Some(child_slot) = self.entities.get_mut(child) {
                child_slot.parent = None;
            }
            if let Ok(transform) = self.get_component_mut::<TransformComponent>(child) {
                transform.mark_dirty();
            }
        }

        for storage in self.storages.iter_mut().flatten() {
            storage.remove_entity(entity);
        }

        self.entities.release(entity);
        log::trace!("Reclaimed entity {}", entity);
    }

    /// True while the entity is active (not pending destruction or reclaimed)
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entity_state(entity) == Some(EntityState::Active)
    }

    /// State of the slot this handle refers to, `None` if the handle is stale
    pub fn entity_state(&self, entity: Entity) -> Option<EntityState> {
        self.entities.get(entity).map(|slot| slot.state)
    }

    /// Current handle for a raw identifier
    pub fn entity(&self, index: u32) -> Option<Entity> {
        self.entities.handle(index)
    }

    /// Iterate active entities in identifier order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter_state(EntityState::Active)
    }

    /// Number of slots not free (active or pending destruction)
    pub fn living_count(&self) -> usize {
        self.entities.living()
    }

    /// Fixed entity capacity
    pub fn capacity(&self) -> usize {
        self.entities.capacity()
    }

    /// Capability mask of an entity
    pub fn component_mask(&self, entity: Entity) -> EcsResult<ComponentMask> {
        self.entities
            .get(entity)
            .map(|slot| slot.mask)
            .ok_or(EcsError::StaleEntity(entity))
    }

    // ---------------------------------------------------------------------
    // Components
    // ---------------------------------------------------------------------

    fn array<T: Component>(&self, id: ComponentId) -> Option<&ComponentArray<T>> {
        self.storages
            .get(id.index())?
            .as_ref()?
            .as_any()
            .downcast_ref::<ComponentArray<T>>()
    }

    fn array_mut<T: Component>(&mut self, id: ComponentId) -> Option<&mut ComponentArray<T>> {
        self.storages
            .get_mut(id.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<ComponentArray<T>>()
    }

    fn array_or_insert<T: Component>(&mut self, id: ComponentId) -> &mut dyn ErasedStorage {
        if id.index() >= self.storages.len() {
            self.storages.resize_with(id.index() + 1, || None);
        }
        &mut **self.storages[id.index()]
            .get_or_insert_with(|| Box::new(ComponentArray::<T>::new()) as Box<dyn ErasedStorage>)
    }

    fn missing<T: Component>(entity: Entity) -> EcsError {
        EcsError::MissingComponent {
            entity,
            component: type_name::<T>(),
        }
    }

    /// Attach a component, run its `init` hook, and update system interest
    ///
    /// An existing component of the same type is replaced.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<&mut T> {
        let id = ComponentId::of::<T>()?;
        if !self.is_alive(entity) {
            return Err(EcsError::StaleEntity(entity));
        }

        let storage = self.array_or_insert::<T>(id);
        let array = storage
            .as_any_mut()
            .downcast_mut::<ComponentArray<T>>()
            .ok_or_else(|| Self::missing::<T>(entity))?;
        if array.insert(entity, component).is_some() {
            log::debug!("Replaced {} on entity {}", type_name::<T>(), entity);
        }
        if let Some(stored) = array.get_mut(entity) {
            stored.init(entity);
        }

        let mask = match self.entities.get_mut(entity) {
            Some(slot) => {
                slot.mask |= ComponentMask::single(id);
                slot.mask
            }
            None => return Err(EcsError::StaleEntity(entity)),
        };
        for system in &mut self.systems {
            system.refresh_interest(entity, mask);
        }

        self.array_mut::<T>(id)
            .and_then(|array| array.get_mut(entity))
            .ok_or_else(|| Self::missing::<T>(entity))
    }

    /// Borrow a component the entity's mask says it has
    pub fn get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        let slot = self.entities.get(entity).ok_or(EcsError::StaleEntity(entity))?;
        ComponentId::find::<T>()
            .filter(|id| slot.mask.satisfies(ComponentMask::single(*id)))
            .and_then(|id| self.array::<T>(id))
            .and_then(|array| array.get(entity))
            .ok_or_else(|| Self::missing::<T>(entity))
    }

    /// Mutably borrow a component the entity's mask says it has
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        let mask = self.component_mask(entity)?;
        let id = ComponentId::find::<T>()
            .filter(|id| mask.satisfies(ComponentMask::single(*id)))
            .ok_or_else(|| Self::missing::<T>(entity))?;
        self.array_mut::<T>(id)
            .and_then(|array| array.get_mut(entity))
            .ok_or_else(|| Self::missing::<T>(entity))
    }

    /// True when the entity is not reclaimed and carries a `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.get_component::<T>(entity).is_ok()
    }

    /// Detach a component, returning it if it was present
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> EcsResult<Option<T>> {
        let mask = self.component_mask(entity)?;
        let Some(id) = ComponentId::find::<T>() else {
            return Ok(None);
        };
        if !mask.satisfies(ComponentMask::single(id)) {
            return Ok(None);
        }

        let removed = self.array_mut::<T>(id).and_then(|array| array.remove(entity));
        let mask = mask - ComponentMask::single(id);
        if let Some(slot) = self.entities.get_mut(entity) {
            slot.mask = mask;
        }
        for system in &mut self.systems {
            system.refresh_interest(entity, mask);
        }
        Ok(removed)
    }

    /// Iterate every stored `T` with its owner, in identifier order
    pub fn query<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        ComponentId::find::<T>()
            .and_then(|id| self.array::<T>(id))
            .into_iter()
            .flat_map(|array| array.iter())
    }

    /// Run every component's `update` hook
    pub fn update_components(&mut self, delta_time: f32) {
        for storage in self.storages.iter_mut().flatten() {
            storage.update_all(delta_time);
        }
    }

    // ---------------------------------------------------------------------
    // Systems
    // ---------------------------------------------------------------------

    /// Register a system: bind its mask, call `init`, and backfill its entities
    pub fn register_system<S: System>(&mut self, mut system: S) -> EcsResult<SystemId<S>> {
        let mask = <S::Required as ComponentSet>::mask()?;
        system.init(self);

        let entities: Vec<Entity> = self
            .entities
            .iter_state(EntityState::Active)
            .filter(|entity| {
                self.entities
                    .get(*entity)
                    .is_some_and(|slot| slot.mask.satisfies(mask))
            })
            .collect();

        let name = system.name();
        log::debug!("Registered system {} matching {} existing entities", name, entities.len());

        self.systems.push(SystemSlot {
            name,
            mask,
            entities,
            active: true,
            behavior: Some(Box::new(system)),
        });
        Ok(SystemId::new(self.systems.len() - 1))
    }

    /// Borrow a registered system
    pub fn system<S: System>(&self, id: SystemId<S>) -> Option<&S> {
        self.systems
            .get(id.index())?
            .behavior
            .as_ref()?
            .as_any()
            .downcast_ref::<S>()
    }

    /// Mutably borrow a registered system
    pub fn system_mut<S: System>(&mut self, id: SystemId<S>) -> Option<&mut S> {
        self.systems
            .get_mut(id.index())?
            .behavior
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<S>()
    }

    /// Entities the system currently tracks
    pub fn system_entities<S: System>(&self, id: SystemId<S>) -> &[Entity] {
        self.systems
            .get(id.index())
            .map(|slot| slot.entities.as_slice())
            .unwrap_or(&[])
    }

    /// Enable or disable dispatch of a system
    pub fn set_system_active<S: System>(&mut self, id: SystemId<S>, active: bool) {
        if let Some(slot) = self.systems.get_mut(id.index()) {
            slot.active = active;
        }
    }

    /// Whether a system is dispatched each frame
    pub fn is_system_active<S: System>(&self, id: SystemId<S>) -> bool {
        self.systems.get(id.index()).is_some_and(|slot| slot.active)
    }

    /// Number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    fn dispatch(&mut self, mut run: impl FnMut(&mut dyn AnySystem, &mut World, &[Entity])) {
        for index in 0..self.systems.len() {
            let slot = &mut self.systems[index];
            if !slot.active {
                continue;
            }
            let Some(mut behavior) = slot.behavior.take() else {
                continue;
            };
            let entities = slot.entities.clone();

            run(behavior.as_mut(), self, &entities);

            self.systems[index].behavior = Some(behavior);
        }
    }

    /// Run `update` on every active system in registration order
    pub fn update(&mut self, delta_time: f32) {
        self.dispatch(|system, world, entities| system.update(world, entities, delta_time));
    }

    /// Run `render` on every active system in registration order
    pub fn render(&mut self) {
        self.dispatch(|system, world, entities| system.render(world, entities));
    }

    /// One frame: update, render, then reclaim destroyed entities
    pub fn run_frame(&mut self, delta_time: f32) {
        self.update(delta_time);
        self.render();
        self.refresh();
    }

    pub(crate) fn next_stamp(&mut self) -> u64 {
        self.next_stamp += 1;
        self.next_stamp
    }

    // ---------------------------------------------------------------------
    // Cameras
    // ---------------------------------------------------------------------

    /// Window resize notification: update every camera's aspect ratio
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        if height == 0 {
            log::debug!("Ignoring resize to zero height ({}x{})", width, height);
            return;
        }
        let aspect = width as f32 / height as f32;
        log::info!("Resize to {}x{} (aspect {:.3})", width, height, aspect);

        if let Some(id) = ComponentId::find::<CameraComponent>() {
            if let Some(cameras) = self.array_mut::<CameraComponent>(id) {
                for (_, camera) in cameras.iter_mut() {
                    camera.set_aspect_ratio(aspect);
                }
            }
        }
    }

    /// The active camera flagged main with the lowest identifier
    pub fn find_main_camera(&self) -> Option<Entity> {
        self.query::<CameraComponent>()
            .find(|(entity, camera)| camera.is_main() && self.is_alive(*entity))
            .map(|(entity, _)| entity)
    }

    /// View matrix of a camera entity, recomputed only when its transform,
    /// ancestors, or target changed
    pub fn camera_view_matrix(&mut self, entity: Entity) -> EcsResult<Mat4> {
        let (world_matrix, stamp) = self.resolve_world_matrix(entity)?;
        let camera = self.get_component_mut::<CameraComponent>(entity)?;
        Ok(camera.view_matrix(&world_matrix, stamp))
    }

    /// Projection matrix of a camera entity
    pub fn camera_projection_matrix(&mut self, entity: Entity) -> EcsResult<Mat4> {
        let camera = self.get_component_mut::<CameraComponent>(entity)?;
        Ok(camera.projection_matrix())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
