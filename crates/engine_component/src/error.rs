//! Storage-level error types.

use crate::entity::Entity;

/// Errors raised by a [`ComponentStorage`](crate::ComponentStorage).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The entity has no component of the requested type.
    #[error("{entity} has no `{component}` component")]
    NotFound {
        /// The entity that was looked up.
        entity: Entity,
        /// The component type name.
        component: &'static str,
    },

    /// A newer generation of the entity's index already holds the component.
    #[error("{entity} is stale: `{component}` at this index belongs to {current}")]
    Stale {
        /// The stale entity that was written through.
        entity: Entity,
        /// The entity currently holding the component.
        current: Entity,
        /// The component type name.
        component: &'static str,
    },
}
