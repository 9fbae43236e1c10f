//! Component trait, type identifiers, and capability masks

use std::any::{type_name, Any, TypeId};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use bitflags::bitflags;

use super::{EcsError, EcsResult, Entity};

/// Maximum number of distinct component types (width of `ComponentMask`)
pub const MAX_COMPONENTS: usize = 32;

/// Trait implemented by every component type
///
/// Components are plain data owned by exactly one entity. The hooks default
/// to no-ops; `init` runs once when the component is attached and receives
/// the owning entity, `update` runs from `World::update_components`.
pub trait Component: Any {
    /// Called after the component is stored on `owner`
    fn init(&mut self, _owner: Entity) {}

    /// Per-frame hook
    fn update(&mut self, _delta_time: f32) {}
}

bitflags! {
    /// Capability mask: bit `i` is set iff component type `i` is attached
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ComponentMask: u32 {
        const _ = !0;
    }
}

impl ComponentMask {
    /// Mask with only the bit for `id` set
    pub fn single(id: ComponentId) -> Self {
        Self::from_bits_retain(1 << id.index())
    }

    /// True when every bit of `required` is also set here
    pub fn satisfies(&self, required: Self) -> bool {
        self.contains(required)
    }
}

/// Process-wide identifier of a component type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u8);

impl ComponentId {
    /// Position of this type's bit in a `ComponentMask`
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Identifier for `T`, assigned on first use and stable afterwards
    pub fn of<T: Component>() -> EcsResult<Self> {
        registry().register(TypeId::of::<T>(), type_name::<T>())
    }

    /// Identifier for `T` if the type has been seen before
    pub fn find<T: Component>() -> Option<Self> {
        registry().find(TypeId::of::<T>())
    }
}

/// Assigns identifiers to component types in first-seen order
#[derive(Debug, Default)]
pub(crate) struct ComponentRegistry {
    types: Vec<TypeId>,
}

impl ComponentRegistry {
    /// Identifier already assigned to `type_id`
    pub fn find(&self, type_id: TypeId) -> Option<ComponentId> {
        self.types
            .iter()
            .position(|id| *id == type_id)
            .map(|index| ComponentId(index as u8))
    }

    /// Existing identifier, or the next free one while fewer than
    /// `MAX_COMPONENTS` types are registered
    pub fn register(&mut self, type_id: TypeId, name: &'static str) -> EcsResult<ComponentId> {
        if let Some(id) = self.find(type_id) {
            return Ok(id);
        }
        if self.types.len() >= MAX_COMPONENTS {
            return Err(EcsError::ComponentTypeLimit {
                limit: MAX_COMPONENTS,
                component: name,
            });
        }

        self.types.push(type_id);
        let id = ComponentId((self.types.len() - 1) as u8);
        log::debug!("Registered component type {} as id {}", name, id.0);
        Ok(id)
    }
}

fn registry() -> MutexGuard<'static, ComponentRegistry> {
    static REGISTRY: OnceLock<Mutex<ComponentRegistry>> = OnceLock::new();
    REGISTRY
        .get_or_init(|| Mutex::new(ComponentRegistry::default()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// A set of component types, used to declare a system's requirements
///
/// Implemented for tuples of up to six components; `()` matches every entity.
pub trait ComponentSet: 'static {
    /// Combined capability mask of the set
    fn mask() -> EcsResult<ComponentMask>;
}

impl ComponentSet for () {
    fn mask() -> EcsResult<ComponentMask> {
        Ok(ComponentMask::empty())
    }
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            fn mask() -> EcsResult<ComponentMask> {
                let mut mask = ComponentMask::empty();
                $(mask |= ComponentMask::single(ComponentId::of::<$name>()?);)+
                Ok(mask)
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
