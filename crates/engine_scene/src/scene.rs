//! Scene storage.
//!
//! A [`Scene`] owns the entities it allocated and every component storage for
//! them. No other type owns component memory. [`SharedScene`] is the
//! reference-counted form gameplay code holds so that [`GameObject`] handles
//! can point back at their scene.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use engine_component::{Component, Entity, EntityAllocator};

use crate::error::SceneError;
use crate::game_object::GameObject;
use crate::manager::ComponentManager;

/// Process-unique identifier of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u64);

impl SceneId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scene({})", self.0)
    }
}

/// One loaded world: entities plus their component storages.
///
/// Entity values are scene-scoped. An [`Entity`] allocated by one scene means
/// nothing to another.
#[derive(Debug)]
pub struct Scene {
    id: SceneId,
    allocator: EntityAllocator,
    components: ComponentManager,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SceneId::next(),
            allocator: EntityAllocator::new(),
            components: ComponentManager::new(),
        }
    }

    /// This scene's identifier.
    #[must_use]
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Allocate a new entity with no components.
    pub fn spawn(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        debug!(scene = %self.id, %entity, "entity spawned");
        entity
    }

    /// Destroy an entity, removing it from every component storage.
    ///
    /// Returns `false` if the entity was not alive.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.allocator.free(entity) {
            return false;
        }
        let removed = self.components.remove_entity(entity);
        debug!(scene = %self.id, %entity, removed, "entity despawned");
        true
    }

    /// Returns `true` if `entity` is alive in this scene.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.allocator.count()
    }

    /// Iterates over every live entity.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.allocator.iter()
    }

    /// The component manager. Does not check entity liveness.
    #[must_use]
    pub fn components(&self) -> &ComponentManager {
        &self.components
    }

    /// The mutable component manager. Does not check entity liveness.
    pub fn components_mut(&mut self) -> &mut ComponentManager {
        &mut self.components
    }

    fn ensure_alive(&self, entity: Entity) -> Result<(), SceneError> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(SceneError::DeadEntity(entity))
        }
    }

    /// Insert or overwrite the `T` component of a live entity.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DeadEntity`] if `entity` is not alive.
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> Result<Option<T>, SceneError> {
        self.ensure_alive(entity)?;
        Ok(self.components.add(entity, value)?)
    }

    /// Get the `T` component of a live entity.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DeadEntity`] or [`SceneError::NotFound`].
    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, SceneError> {
        self.ensure_alive(entity)?;
        Ok(self.components.get(entity)?)
    }

    /// Get the `T` component of a live entity mutably.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DeadEntity`] or [`SceneError::NotFound`].
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, SceneError> {
        self.ensure_alive(entity)?;
        Ok(self.components.get_mut(entity)?)
    }

    /// Remove the `T` component of `entity`. Absent components are a no-op.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.components.remove(entity)
    }

    /// Returns `true` if `entity` is alive and has a `T` component.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.is_alive(entity) && self.components.has::<T>(entity)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// A reference-counted scene that hands out [`GameObject`] handles.
///
/// Handles hold a weak reference; dropping the last `SharedScene` tears the
/// scene down and invalidates every handle.
#[derive(Debug, Clone, Default)]
pub struct SharedScene(Rc<RefCell<Scene>>);

impl SharedScene {
    /// Create a new, empty shared scene.
    #[must_use]
    pub fn new() -> Self {
        Self::from_scene(Scene::new())
    }

    /// Wrap an existing scene.
    #[must_use]
    pub fn from_scene(scene: Scene) -> Self {
        Self(Rc::new(RefCell::new(scene)))
    }

    /// The scene's identifier.
    #[must_use]
    pub fn id(&self) -> SceneId {
        self.0.borrow().id()
    }

    /// Allocate a new entity and return a handle bound to it.
    ///
    /// # Panics
    ///
    /// Panics if the scene is currently borrowed.
    pub fn create_entity(&self) -> GameObject {
        let entity = self.0.borrow_mut().spawn();
        GameObject::new(entity, self)
    }

    /// Destroy the entity behind `object` and all of its components.
    ///
    /// Returns `false` if it was already destroyed.
    ///
    /// # Panics
    ///
    /// Panics if `object` belongs to a different scene, or if the scene is
    /// currently borrowed.
    pub fn destroy_entity(&self, object: &GameObject) -> bool {
        assert!(
            object.belongs_to(self),
            "{} does not belong to {}",
            object.entity(),
            self.id()
        );
        self.0.borrow_mut().despawn(object.entity())
    }

    /// Immutably borrow the scene.
    ///
    /// # Panics
    ///
    /// Panics if the scene is mutably borrowed.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, Scene> {
        self.0.borrow()
    }

    /// Mutably borrow the scene.
    ///
    /// # Panics
    ///
    /// Panics if the scene is already borrowed.
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, Scene> {
        self.0.borrow_mut()
    }

    /// A weak reference to the scene, as held by [`GameObject`]s.
    #[must_use]
    pub fn downgrade(&self) -> Weak<RefCell<Scene>> {
        Rc::downgrade(&self.0)
    }
}
