//! Game object handles.
//!
//! A [`GameObject`] is an [`Entity`] plus a weak back-reference to the
//! [`Scene`] that owns it. It carries no component data; every accessor
//! forwards to the scene's component manager. Any number of handles may view
//! the same entity, and dropping a handle never destroys anything.
//!
//! Using a handle whose scene has been dropped, or a default (empty) handle,
//! is a programming error and panics with a diagnostic.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use engine_component::{Component, Entity};

use crate::error::SceneError;
use crate::scene::{Scene, SharedScene};

/// A handle pairing an entity with its owning scene.
#[derive(Debug, Clone, Default)]
pub struct GameObject {
    entity: Entity,
    scene: Weak<RefCell<Scene>>,
}

impl GameObject {
    /// Bind a handle to an existing entity of `scene`.
    #[must_use]
    pub fn new(entity: Entity, scene: &SharedScene) -> Self {
        Self {
            entity,
            scene: scene.downgrade(),
        }
    }

    /// The entity this handle refers to.
    #[must_use]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Returns `true` if the owning scene is alive and still holds the entity.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.scene
            .upgrade()
            .is_some_and(|scene| scene.borrow().is_alive(self.entity))
    }

    /// Returns `true` if this handle points into `scene`.
    #[must_use]
    pub fn belongs_to(&self, scene: &SharedScene) -> bool {
        Weak::ptr_eq(&self.scene, &scene.downgrade())
    }

    fn scene(&self) -> Rc<RefCell<Scene>> {
        self.scene.upgrade().unwrap_or_else(|| {
            panic!(
                "invalid GameObject handle for {}: no owning scene (empty handle or scene dropped)",
                self.entity
            )
        })
    }

    /// Attach `value` as this entity's `T` component, overwriting any
    /// existing one.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DeadEntity`] if the entity was destroyed.
    ///
    /// # Panics
    ///
    /// Panics on an invalid handle or if the scene is currently borrowed.
    pub fn add_component<T: Component>(&self, value: T) -> Result<Option<T>, SceneError> {
        self.scene().borrow_mut().add(self.entity, value)
    }

    /// Attach a default-constructed `T` component.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DeadEntity`] if the entity was destroyed.
    pub fn add_default_component<T: Component + Default>(&self) -> Result<Option<T>, SceneError> {
        self.add_component(T::default())
    }

    /// A copy of this entity's `T` component.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotFound`] if the entity has no `T`, or
    /// [`SceneError::DeadEntity`] if it was destroyed.
    pub fn get_component<T: Component + Clone>(&self) -> Result<T, SceneError> {
        self.scene().borrow().get::<T>(self.entity).cloned()
    }

    /// Run `f` with mutable access to this entity's `T` component.
    ///
    /// The scene stays mutably borrowed while `f` runs, so `f` must not use
    /// other handles into the same scene.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotFound`] if the entity has no `T`, or
    /// [`SceneError::DeadEntity`] if it was destroyed.
    pub fn with_component<T: Component, R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, SceneError> {
        let scene = self.scene();
        let mut scene = scene.borrow_mut();
        scene.get_mut::<T>(self.entity).map(f)
    }

    /// Returns `true` if this entity has a `T` component.
    #[must_use]
    pub fn has_component<T: Component>(&self) -> bool {
        self.scene().borrow().has::<T>(self.entity)
    }

    /// Detach and return this entity's `T` component, if any.
    pub fn remove_component<T: Component>(&self) -> Option<T> {
        self.scene().borrow_mut().remove::<T>(self.entity)
    }

    /// Destroy the entity and all of its components.
    ///
    /// Returns `false` if it was already destroyed. Other handles to the same
    /// entity become invalid.
    pub fn destroy(&self) -> bool {
        self.scene().borrow_mut().despawn(self.entity)
    }
}

impl PartialEq for GameObject {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity && Weak::ptr_eq(&self.scene, &other.scene)
    }
}

impl Eq for GameObject {}
