//! Per-type component arrays
//!
//! Each component type gets one array indexed by entity slot. A slot holds
//! the component together with the handle that owns it; `None` is the
//! deletion tombstone. Arrays grow on demand up to the highest slot used.

use std::any::Any;

use super::{Component, Entity};

#[derive(Debug)]
struct ComponentSlot<T> {
    owner: Entity,
    component: T,
}

/// Dense array of one component type, indexed by entity slot
#[derive(Debug)]
pub struct ComponentArray<T: Component> {
    slots: Vec<Option<ComponentSlot<T>>>,
    len: usize,
}

impl<T: Component> Default for ComponentArray<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }
}

impl<T: Component> ComponentArray<T> {
    /// Create an empty array
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `component` for `owner`, returning whatever occupied the slot
    pub fn insert(&mut self, owner: Entity, component: T) -> Option<T> {
        let index = owner.slot();
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        let previous = self.slots[index].replace(ComponentSlot { owner, component });
        if previous.is_none() {
            self.len += 1;
        }
        previous.map(|slot| slot.component)
    }

    /// Take the component out of `entity`'s slot
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.slots.get_mut(entity.slot())?;
        let removed = slot.take()?;
        self.len -= 1;
        Some(removed.component)
    }

    /// Component owned by exactly this handle
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slots
            .get(entity.slot())?
            .as_ref()
            .filter(|slot| slot.owner == entity)
            .map(|slot| &slot.component)
    }

    /// Mutable component owned by exactly this handle
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slots
            .get_mut(entity.slot())?
            .as_mut()
            .filter(|slot| slot.owner == entity)
            .map(|slot| &mut slot.component)
    }

    /// Iterate `(owner, component)` mutably in slot order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.slots
            .iter_mut()
            .flatten()
            .map(|slot| (slot.owner, &mut slot.component))
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated slot count (highest used slot + 1)
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Iterate `(owner, component)` in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.slots
            .iter()
            .flatten()
            .map(|slot| (slot.owner, &slot.component))
    }
}

/// Type-erased view of a `ComponentArray`, so the world can reclaim and
/// update slots without knowing the concrete type
pub(crate) trait ErasedStorage: Any {
    /// Drop the component in `entity`'s slot; true if one was present
    fn remove_entity(&mut self, entity: Entity) -> bool;

    fn update_all(&mut self, delta_time: f32);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStorage for ComponentArray<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn update_all(&mut self, delta_time: f32) {
        for slot in self.slots.iter_mut().flatten() {
            slot.component.update(delta_time);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(i32);
    impl Component for Health {
        fn update(&mut self, _delta_time: f32) {
            self.0 -= 1;
        }
    }

    #[test]
    fn test_array_grows_to_highest_slot() {
        let mut array = ComponentArray::new();
        assert!(array.insert(Entity::new(5, 0), Health(10)).is_none());
        assert_eq!(array.slot_count(), 6);
        assert_eq!(array.len(), 1);
        assert_eq!(array.get(Entity::new(5, 0)), Some(&Health(10)));
        assert!(array.get(Entity::new(2, 0)).is_none());
    }

    #[test]
    fn test_owner_generation_must_match() {
        let mut array = ComponentArray::new();
        array.insert(Entity::new(0, 1), Health(3));
        assert!(array.get(Entity::new(0, 0)).is_none());
        assert!(array.get_mut(Entity::new(0, 1)).is_some());
    }

    #[test]
    fn test_erased_remove_and_update() {
        let mut array = ComponentArray::new();
        array.insert(Entity::new(0, 0), Health(3));
        array.insert(Entity::new(1, 0), Health(5));

        let erased: &mut dyn ErasedStorage = &mut array;
        erased.update_all(0.016);
        assert!(erased.remove_entity(Entity::new(0, 0)));
        assert!(!erased.remove_entity(Entity::new(0, 0)));

        let values: Vec<_> = array.iter().map(|(e, h)| (e.index(), h.0)).collect();
        assert_eq!(values, vec![(1, 4)]);
        assert!(array.get(Entity::new(0, 0)).is_none());
    }
}
