//! Per-type component storage.
//!
//! A [`ComponentStorage<T>`] is a sparse set: component values live densely in
//! a `Vec<T>` for cache-friendly per-frame iteration, and a sparse index keyed
//! by [`Entity::index`] maps each entity to its dense row. Insert, lookup and
//! removal are O(1); removal swap-removes so the dense arrays never have gaps.
//!
//! Row order is not stable across removals.
//!
//! [`ErasedStorage`] is the object-safe face of a storage. A scene keeps one
//! boxed `ErasedStorage` per component type and recovers the concrete
//! `ComponentStorage<T>` by downcasting when a typed accessor is called.

use std::any::Any;

use crate::component::{Component, ComponentTypeId};
use crate::entity::Entity;
use crate::error::StorageError;

/// Dense storage for every live instance of one component type.
#[derive(Debug, Clone)]
pub struct ComponentStorage<T> {
    /// Component values. `dense[i]` belongs to `entities[i]`.
    dense: Vec<T>,
    /// Owning entity per dense row.
    entities: Vec<Entity>,
    /// Dense row per entity index, `None` when the index holds no component.
    sparse: Vec<Option<u32>>,
}

impl<T: Component> ComponentStorage<T> {
    /// Create a new, empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            entities: Vec::new(),
            sparse: Vec::new(),
        }
    }

    /// Create an empty storage with room for `capacity` components before
    /// reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dense: Vec::with_capacity(capacity),
            entities: Vec::with_capacity(capacity),
            sparse: Vec::with_capacity(capacity),
        }
    }

    /// Dense row of `entity`, if it holds a component here.
    ///
    /// The generation must match too: a recycled index never reaches the
    /// previous occupant's data.
    #[inline]
    fn row(&self, entity: Entity) -> Option<usize> {
        let row = (*self.sparse.get(entity.index() as usize)?)? as usize;
        (self.entities[row] == entity).then_some(row)
    }

    fn not_found(entity: Entity) -> StorageError {
        StorageError::NotFound {
            entity,
            component: T::type_name(),
        }
    }

    /// Insert the component for `entity`, overwriting any existing value.
    ///
    /// Returns the previous value when one was overwritten. An entry left
    /// behind by an older generation of the same index is evicted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Stale`] if a newer generation of the same index
    /// already holds a component; that entry is left untouched.
    pub fn add(&mut self, entity: Entity, value: T) -> Result<Option<T>, StorageError> {
        if let Some(row) = self.row(entity) {
            return Ok(Some(std::mem::replace(&mut self.dense[row], value)));
        }

        let slot = entity.index() as usize;
        if slot >= self.sparse.len() {
            self.sparse.resize(slot + 1, None);
        }
        if let Some(row) = self.sparse[slot] {
            let occupant = self.entities[row as usize];
            if occupant.generation() > entity.generation() {
                return Err(StorageError::Stale {
                    entity,
                    current: occupant,
                    component: T::type_name(),
                });
            }
            self.swap_remove_row(row as usize);
        }

        self.sparse[slot] = Some(self.dense.len() as u32);
        self.dense.push(value);
        self.entities.push(entity);
        Ok(None)
    }

    /// Get a shared reference to the component for `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if `entity` has no such component.
    pub fn get(&self, entity: Entity) -> Result<&T, StorageError> {
        match self.row(entity) {
            Some(row) => Ok(&self.dense[row]),
            None => Err(Self::not_found(entity)),
        }
    }

    /// Get a mutable reference to the component for `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if `entity` has no such component.
    pub fn get_mut(&mut self, entity: Entity) -> Result<&mut T, StorageError> {
        match self.row(entity) {
            Some(row) => Ok(&mut self.dense[row]),
            None => Err(Self::not_found(entity)),
        }
    }

    /// Remove and return the component for `entity`.
    ///
    /// Removing a component that is not present is a no-op.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let row = self.row(entity)?;
        Some(self.swap_remove_row(row))
    }

    /// Returns `true` if `entity` has a component in this storage.
    #[inline]
    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.row(entity).is_some()
    }

    /// Returns the number of stored components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if no components are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Dense slice of component values.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.dense
    }

    /// Entities owning each dense row, parallel to [`ComponentStorage::as_slice`].
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Iterates over `(entity, component)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    /// Iterates mutably over `(entity, component)` pairs in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }

    /// Remove every component.
    pub fn clear(&mut self) {
        self.dense.clear();
        self.entities.clear();
        self.sparse.clear();
    }

    fn swap_remove_row(&mut self, row: usize) -> T {
        let removed = self.entities.swap_remove(row);
        let value = self.dense.swap_remove(row);
        self.sparse[removed.index() as usize] = None;

        // The former last row now lives at `row`.
        if let Some(moved) = self.entities.get(row) {
            self.sparse[moved.index() as usize] = Some(row as u32);
        }
        value
    }
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased access to a [`ComponentStorage`].
///
/// Lets a scene clear or destroy entities across every storage without
/// knowing the concrete component types.
pub trait ErasedStorage: Any {
    /// The type identifier of the stored component.
    fn component_type(&self) -> ComponentTypeId;

    /// The human-readable name of the stored component.
    fn component_name(&self) -> &'static str;

    /// Returns `true` if `entity` has a component here.
    fn has(&self, entity: Entity) -> bool;

    /// Drop the component for `entity`, if any. Returns `true` if one was removed.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Number of stored components.
    fn len(&self) -> usize;

    /// Returns `true` if no components are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every component.
    fn clear(&mut self);

    /// Returns an immutable type-erased reference for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable type-erased reference for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStorage for ComponentStorage<T> {
    fn component_type(&self) -> ComponentTypeId {
        T::component_type_id()
    }

    fn component_name(&self) -> &'static str {
        T::type_name()
    }

    fn has(&self, entity: Entity) -> bool {
        ComponentStorage::has(self, entity)
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        ComponentStorage::len(self)
    }

    fn clear(&mut self) {
        ComponentStorage::clear(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
