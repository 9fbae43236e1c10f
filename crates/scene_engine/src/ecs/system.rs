//! System trait and registration bookkeeping

use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;

use super::{ComponentMask, ComponentSet, Entity, World};

/// Behaviour unit run once per frame over the entities it is interested in
///
/// `Required` declares the components an entity must carry to appear in the
/// system's entity list. The list is maintained by the world as components
/// come and go, and handed to `update`/`render` as a snapshot.
pub trait System: 'static {
    /// Components every matching entity must have
    type Required: ComponentSet;

    /// Name used in logs
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// Called once when the system is registered
    fn init(&mut self, _world: &mut World) {}

    /// Per-frame simulation step
    fn update(&mut self, _world: &mut World, _entities: &[Entity], _delta_time: f32) {}

    /// Per-frame draw step, after every system has updated
    fn render(&mut self, _world: &mut World, _entities: &[Entity]) {}
}

/// Object-safe wrapper the world stores systems behind
pub(crate) trait AnySystem {
    fn update(&mut self, world: &mut World, entities: &[Entity], delta_time: f32);
    fn render(&mut self, world: &mut World, entities: &[Entity]);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: System> AnySystem for S {
    fn update(&mut self, world: &mut World, entities: &[Entity], delta_time: f32) {
        System::update(self, world, entities, delta_time);
    }

    fn render(&mut self, world: &mut World, entities: &[Entity]) {
        System::render(self, world, entities);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Registered system plus its materialised entity list
pub(crate) struct SystemSlot {
    pub name: &'static str,
    pub mask: ComponentMask,
    pub entities: Vec<Entity>,
    pub active: bool,
    /// `None` only while the system is being dispatched
    pub behavior: Option<Box<dyn AnySystem>>,
}

impl SystemSlot {
    /// Add or drop `entity` so membership matches `entity_mask`
    pub fn refresh_interest(&mut self, entity: Entity, entity_mask: ComponentMask) {
        let wanted = entity_mask.satisfies(self.mask);
        let position = self.entities.iter().position(|e| *e == entity);
        match (wanted, position) {
            (true, None) => {
                log::trace!("{} now tracks entity {}", self.name, entity);
                self.entities.push(entity);
            }
            (false, Some(index)) => {
                log::trace!("{} dropped entity {}", self.name, entity);
                self.entities.remove(index);
            }
            _ => {}
        }
    }

    pub fn forget(&mut self, entity: Entity) {
        self.entities.retain(|e| *e != entity);
    }
}

/// Typed handle to a registered system
pub struct SystemId<S> {
    index: usize,
    _marker: PhantomData<fn() -> S>,
}

impl<S> SystemId<S> {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Registration position (dispatch order)
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<S> Clone for SystemId<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for SystemId<S> {}

impl<S> PartialEq for SystemId<S> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<S> Eq for SystemId<S> {}

impl<S> fmt::Debug for SystemId<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SystemId<{}>({})", type_name::<S>(), self.index)
    }
}
