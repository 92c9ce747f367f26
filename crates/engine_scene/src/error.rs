//! Scene-level error types.

use engine_component::{Entity, StorageError};

/// Errors returned by scene and game object accessors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The entity lacks the requested component, or a stale handle was
    /// written through.
    #[error(transparent)]
    NotFound(#[from] StorageError),

    /// The entity was destroyed, or never belonged to this scene.
    #[error("{0} is not alive in this scene")]
    DeadEntity(Entity),
}
