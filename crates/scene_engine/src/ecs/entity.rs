//! Entity handles and slot bookkeeping

use std::collections::VecDeque;
use std::fmt;

use super::ComponentMask;

/// Entity identifier
///
/// A copyable handle into the world's entity slab. The generation is bumped
/// every time a slot is reclaimed, so a handle kept past `refresh` no longer
/// matches and is reported as stale instead of aliasing the slot's next owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index (the stable identifier while the entity lives)
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub(crate) fn slot(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Lifecycle state of an entity slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityState {
    /// Available for `create_entity`
    Free,
    /// Live and visible to systems
    Active,
    /// Destroyed, reclaimed on the next `refresh`
    PendingDestroy,
}

/// Per-slot record: state, capability mask, and hierarchy links
#[derive(Debug, Clone)]
pub(crate) struct EntitySlot {
    pub generation: u32,
    pub state: EntityState,
    pub mask: ComponentMask,
    pub parent: Option<Entity>,
    pub children: Vec<Entity>,
}

impl EntitySlot {
    fn new() -> Self {
        Self {
            generation: 0,
            state: EntityState::Free,
            mask: ComponentMask::empty(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Fixed-capacity entity slab with a FIFO free list
#[derive(Debug)]
pub(crate) struct EntityAllocator {
    slots: Vec<EntitySlot>,
    free: VecDeque<u32>,
    living: usize,
}

impl EntityAllocator {
    /// Capacity is capped at `u32::MAX` slots
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(u32::MAX as usize);
        Self {
            slots: (0..capacity).map(|_| EntitySlot::new()).collect(),
            free: (0..capacity as u32).collect(),
            living: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn living(&self) -> usize {
        self.living
    }

    /// Take the lowest queued identifier
    pub fn allocate(&mut self) -> Option<Entity> {
        let index = self.free.pop_front()?;
        let slot = &mut self.slots[index as usize];
        debug_assert_eq!(slot.state, EntityState::Free);
        slot.state = EntityState::Active;
        slot.mask = ComponentMask::empty();
        self.living += 1;
        Some(Entity::new(index, slot.generation))
    }

    /// Return a reclaimed slot to the back of the free queue
    pub fn release(&mut self, entity: Entity) {
        let slot = &mut self.slots[entity.slot()];
        slot.state = EntityState::Free;
        slot.mask = ComponentMask::empty();
        slot.parent = None;
        slot.children.clear();
        slot.generation = slot.generation.wrapping_add(1);
        self.living -= 1;
        self.free.push_back(entity.index);
    }

    /// Slot for a handle whose generation still matches
    pub fn get(&self, entity: Entity) -> Option<&EntitySlot> {
        self.slots
            .get(entity.slot())
            .filter(|slot| slot.generation == entity.generation && slot.state != EntityState::Free)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut EntitySlot> {
        self.slots
            .get_mut(entity.slot())
            .filter(|slot| slot.generation == entity.generation && slot.state != EntityState::Free)
    }

    /// Current handle for a raw index, if the slot is in use
    pub fn handle(&self, index: u32) -> Option<Entity> {
        self.slots
            .get(index as usize)
            .filter(|slot| slot.state != EntityState::Free)
            .map(|slot| Entity::new(index, slot.generation))
    }

    /// Handles in a given state, in identifier order
    pub fn iter_state(&self, state: EntityState) -> impl Iterator<Item = Entity> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(move |(_, slot)| slot.state == state)
            .map(|(index, slot)| Entity::new(index as u32, slot.generation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_lowest_first_and_reuse_last() {
        let mut allocator = EntityAllocator::new(3);
        let a = allocator.allocate().unwrap();
        let b = allocator.allocate().unwrap();
        assert_eq!((a.index(), b.index()), (0, 1));

        allocator.release(a);
        let c = allocator.allocate().unwrap();
        assert_eq!(c.index(), 2);
        let d = allocator.allocate().unwrap();
        assert_eq!(d.index(), 0);
        assert_eq!(d.generation(), 1);
        assert!(allocator.allocate().is_none());
        assert_eq!(allocator.living(), 3);
    }

    #[test]
    fn test_stale_handle_is_rejected() {
        let mut allocator = EntityAllocator::new(1);
        let a = allocator.allocate().unwrap();
        allocator.release(a);
        let b = allocator.allocate().unwrap();
        assert_eq!(a.index(), b.index());
        assert!(allocator.get(a).is_none());
        assert!(allocator.get(b).is_some());
        assert_eq!(allocator.handle(0), Some(b));
    }

    #[test]
    fn test_display() {
        assert_eq!(Entity::new(7, 2).to_string(), "7v2");
    }
}
