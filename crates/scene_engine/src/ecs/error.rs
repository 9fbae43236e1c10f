//! ECS error types

use super::Entity;

/// Result alias for fallible ECS operations
pub type EcsResult<T> = Result<T, EcsError>;

/// Errors raised by the world when a precondition is violated
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// Every entity slot is in use
    #[error("entity capacity exhausted ({capacity} slots)")]
    CapacityExhausted {
        /// Fixed capacity of the world
        capacity: usize,
    },

    /// The handle refers to a slot that was reclaimed or never created
    #[error("entity {0} is not alive")]
    StaleEntity(Entity),

    /// The entity's capability mask lacks the requested component
    #[error("entity {entity} has no {component}")]
    MissingComponent {
        /// Entity queried
        entity: Entity,
        /// Component type name
        component: &'static str,
    },

    /// More distinct component types than the capability mask can hold
    #[error("cannot register {component}: component type limit of {limit} reached")]
    ComponentTypeLimit {
        /// Maximum number of component types
        limit: usize,
        /// Component type name
        component: &'static str,
    },

    /// Parenting would make an entity its own ancestor
    #[error("parenting {child} under {parent} would create a cycle")]
    HierarchyCycle {
        /// Entity being re-parented
        child: Entity,
        /// Requested parent
        parent: Entity,
    },
}
