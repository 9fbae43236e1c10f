//! Entity-Component-System implementation
//!
//! - `World` owns a fixed-capacity entity slab, one array per component type,
//!   and the registered systems
//! - Entities are generation-checked handles; destruction is deferred to
//!   `World::refresh`
//! - Each system declares the components it needs and receives the matching
//!   entities, maintained incrementally as components come and go

pub mod world;
pub mod entity;
pub mod component;
pub mod storage;
pub mod system;
pub mod error;
mod hierarchy;
pub mod components;
pub mod systems;

#[cfg(test)]
mod tests;

pub use world::{World, DEFAULT_MAX_ENTITIES};
pub use entity::{Entity, EntityState};
pub use component::{Component, ComponentId, ComponentMask, ComponentSet, MAX_COMPONENTS};
pub use storage::ComponentArray;
pub use system::{System, SystemId};
pub use error::{EcsError, EcsResult};
