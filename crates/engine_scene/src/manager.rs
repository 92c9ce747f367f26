//! The component manager — one type-erased storage per component type.

use std::collections::HashMap;

use engine_component::{
    Component, ComponentStorage, ComponentTypeId, Entity, ErasedStorage, StorageError,
};

/// Owns every [`ComponentStorage`] of a scene, keyed by [`ComponentTypeId`].
///
/// Storages are created lazily on the first [`ComponentManager::add`], or
/// eagerly with [`ComponentManager::register`]. The manager does not know which
/// entities are alive; [`Scene`](crate::Scene) layers that check on top.
#[derive(Default)]
pub struct ComponentManager {
    storages: HashMap<ComponentTypeId, Box<dyn ErasedStorage>>,
}

/// Recover the typed storage behind an erased one.
///
/// Two component types reporting the same `type_name` is a programming
/// error that would otherwise corrupt lookups, so it panics.
fn downcast<T: Component>(storage: &dyn ErasedStorage) -> &ComponentStorage<T> {
    storage
        .as_any()
        .downcast_ref()
        .unwrap_or_else(|| name_collision::<T>(storage.component_name()))
}

fn downcast_mut<T: Component>(storage: &mut dyn ErasedStorage) -> &mut ComponentStorage<T> {
    let existing = storage.component_name();
    storage
        .as_any_mut()
        .downcast_mut()
        .unwrap_or_else(|| name_collision::<T>(existing))
}

fn name_collision<T: Component>(existing: &str) -> ! {
    panic!(
        "component type name `{}` is claimed by two different types (storage holds `{existing}`)",
        T::type_name()
    )
}

impl ComponentManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a storage for `T` exists and return it.
    pub fn register<T: Component>(&mut self) -> &mut ComponentStorage<T> {
        let storage = self
            .storages
            .entry(T::component_type_id())
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()));
        downcast_mut(storage.as_mut())
    }

    /// Returns `true` if a storage for `T` exists.
    #[must_use]
    pub fn is_registered<T: Component>(&self) -> bool {
        self.storages.contains_key(&T::component_type_id())
    }

    /// The storage for `T`, if one has been created.
    #[must_use]
    pub fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.storages
            .get(&T::component_type_id())
            .map(|s| downcast(s.as_ref()))
    }

    /// The mutable storage for `T`, if one has been created.
    pub fn storage_mut<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.storages
            .get_mut(&T::component_type_id())
            .map(|s| downcast_mut(s.as_mut()))
    }

    /// Insert or overwrite the `T` component of `entity`.
    ///
    /// Returns the previous value when one was overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Stale`] if a newer generation of `entity`'s
    /// index holds a `T`.
    pub fn add<T: Component>(
        &mut self,
        entity: Entity,
        value: T,
    ) -> Result<Option<T>, StorageError> {
        self.register::<T>().add(entity, value)
    }

    /// Get the `T` component of `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if `entity` has no `T`.
    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, StorageError> {
        match self.storage::<T>() {
            Some(storage) => storage.get(entity),
            None => Err(StorageError::NotFound {
                entity,
                component: T::type_name(),
            }),
        }
    }

    /// Get the `T` component of `entity` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if `entity` has no `T`.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, StorageError> {
        match self.storage_mut::<T>() {
            Some(storage) => storage.get_mut(entity),
            None => Err(StorageError::NotFound {
                entity,
                component: T::type_name(),
            }),
        }
    }

    /// Remove the `T` component of `entity`. Absent components are a no-op.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storage_mut::<T>()?.remove(entity)
    }

    /// Returns `true` if `entity` has a `T` component.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.storage::<T>().is_some_and(|s| s.has(entity))
    }

    /// Remove every component of `entity`, across all storages.
    ///
    /// Returns the number of components removed.
    pub fn remove_entity(&mut self, entity: Entity) -> usize {
        self.storages
            .values_mut()
            .map(|s| usize::from(s.remove_entity(entity)))
            .sum()
    }

    /// Names of the components `entity` currently has.
    #[must_use]
    pub fn component_names(&self, entity: Entity) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .storages
            .values()
            .filter(|s| s.has(entity))
            .map(|s| s.component_name())
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of storages (registered component types).
    #[must_use]
    pub fn storage_count(&self) -> usize {
        self.storages.len()
    }

    /// Empty every storage, keeping the registrations.
    pub fn clear(&mut self) {
        for storage in self.storages.values_mut() {
            storage.clear();
        }
    }
}

impl std::fmt::Debug for ComponentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for storage in self.storages.values() {
            map.entry(&storage.component_name(), &storage.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Speed(f32);

    impl Component for Speed {
        fn type_name() -> &'static str {
            "Speed"
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Tag;

    impl Component for Tag {
        fn type_name() -> &'static str {
            "Tag"
        }
    }

    #[derive(Debug)]
    struct Impostor;

    impl Component for Impostor {
        fn type_name() -> &'static str {
            "Speed"
        }
    }

    #[test]
    fn test_add_creates_storage_lazily() {
        let mut manager = ComponentManager::new();
        assert!(!manager.is_registered::<Speed>());
        manager.add(Entity::new(0, 0), Speed(1.0)).unwrap();
        assert!(manager.is_registered::<Speed>());
        assert_eq!(manager.storage_count(), 1);
    }

    #[test]
    fn test_get_without_storage_is_not_found() {
        let manager = ComponentManager::new();
        let err = manager.get::<Speed>(Entity::new(0, 0)).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { component: "Speed", .. }));
    }

    #[test]
    fn test_remove_entity_clears_all_storages() {
        let mut manager = ComponentManager::new();
        let e = Entity::new(2, 0);
        manager.add(e, Speed(3.0)).unwrap();
        manager.add(e, Tag).unwrap();
        assert_eq!(manager.component_names(e), vec!["Speed", "Tag"]);

        assert_eq!(manager.remove_entity(e), 2);
        assert!(!manager.has::<Speed>(e));
        assert!(!manager.has::<Tag>(e));
        assert_eq!(manager.remove_entity(e), 0);
    }

    #[test]
    fn test_remove_without_storage_is_noop() {
        let mut manager = ComponentManager::new();
        assert_eq!(manager.remove::<Speed>(Entity::new(0, 0)), None);
        assert_eq!(manager.storage_count(), 0);
    }

    #[test]
    fn test_clear_keeps_registrations() {
        let mut manager = ComponentManager::new();
        manager.add(Entity::new(0, 0), Tag).unwrap();
        manager.clear();
        assert!(manager.is_registered::<Tag>());
        assert!(manager.storage::<Tag>().unwrap().is_empty());
    }

    #[test]
    #[should_panic(expected = "claimed by two different types")]
    fn test_type_name_collision_panics() {
        let mut manager = ComponentManager::new();
        manager.add(Entity::new(0, 0), Speed(1.0)).unwrap();
        manager.register::<Impostor>();
    }
}
