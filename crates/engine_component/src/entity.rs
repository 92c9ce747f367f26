//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a lightweight identifier with no inherent data. It pairs a
//! slot index with a generation counter so that a destroyed entity's index can
//! be recycled without stale handles silently aliasing the new occupant.

use serde::{Deserialize, Serialize};

/// A generational entity identifier.
///
/// Entities are pure identifiers — they carry no data of their own. Components
/// are attached to entities through a
/// [`ComponentStorage`](crate::ComponentStorage) to give them meaning.
///
/// Two entities are equal only if both the index and the generation match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// The null / invalid entity sentinel.
    pub const INVALID: Entity = Entity {
        index: u32::MAX,
        generation: u32::MAX,
    };

    /// Create an entity from its parts.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Rebuild an entity from the packed form produced by [`Entity::to_bits`].
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }

    /// Pack the entity into a single `u64` (generation in the upper half).
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }

    /// Returns the slot index of this entity.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation of this entity.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Returns `true` if this is not the [`Entity::INVALID`] sentinel.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !(self.index == u32::MAX && self.generation == u32::MAX)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::INVALID
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

/// Allocates entities for one scene.
///
/// Destroyed indices go onto a free list and are handed out again with a
/// bumped generation. The allocator is the single source of truth for which
/// entities are alive.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    /// Current generation per index.
    generations: Vec<u32>,
    /// Liveness per index.
    alive: Vec<bool>,
    /// Indices available for reuse, most recently freed last.
    free: Vec<u32>,
    /// Number of live entities.
    live: usize,
}

impl EntityAllocator {
    /// Creates a new, empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh entity, reusing a freed index when one is available.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX - 1` indices are in use at once.
    pub fn allocate(&mut self) -> Entity {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = index as usize;
            self.alive[slot] = true;
            return Entity::new(index, self.generations[slot]);
        }

        let index = u32::try_from(self.generations.len())
            .ok()
            .filter(|&i| i != u32::MAX)
            .expect("entity index space exhausted");
        self.generations.push(0);
        self.alive.push(true);
        Entity::new(index, 0)
    }

    /// Frees an entity. Its index becomes reusable under a new generation.
    ///
    /// An index whose generation reaches `u32::MAX` is retired instead of
    /// reused, so generations never wrap.
    ///
    /// Returns `false` if the entity was not alive (already freed, stale, or
    /// never allocated here).
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let slot = entity.index() as usize;
        self.alive[slot] = false;
        self.generations[slot] += 1;
        if self.generations[slot] < u32::MAX {
            self.free.push(entity.index());
        }
        self.live -= 1;
        true
    }

    /// Returns `true` if `entity` is currently alive in this allocator.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.index() as usize;
        self.alive.get(slot).copied().unwrap_or(false)
            && self.generations[slot] == entity.generation()
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.live
    }

    /// Iterates over every live entity in index order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .zip(self.generations.iter())
            .enumerate()
            .filter(|(_, (alive, _))| **alive)
            .map(|(index, (_, &generation))| Entity::new(index as u32, generation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_parts() {
        let e = Entity::new(42, 7);
        assert_eq!(e.index(), 42);
        assert_eq!(e.generation(), 7);
        assert!(e.is_valid());
    }

    #[test]
    fn test_entity_invalid() {
        assert!(!Entity::INVALID.is_valid());
        assert_eq!(Entity::default(), Entity::INVALID);
    }

    #[test]
    fn test_entity_bits() {
        let e = Entity::new(12345, 67890);
        assert_eq!(Entity::from_bits(e.to_bits()), e);
    }

    #[test]
    fn test_allocator_produces_unique_ids() {
        let mut alloc = EntityAllocator::new();
        let e1 = alloc.allocate();
        let e2 = alloc.allocate();
        let e3 = alloc.allocate();
        assert_ne!(e1, e2);
        assert_ne!(e2, e3);
        assert_eq!(alloc.count(), 3);
    }

    #[test]
    fn test_allocator_recycles_with_new_generation() {
        let mut alloc = EntityAllocator::new();
        let old = alloc.allocate();
        assert!(alloc.free(old));
        assert!(!alloc.is_alive(old));

        let new = alloc.allocate();
        assert_eq!(new.index(), old.index());
        assert_ne!(new.generation(), old.generation());
        assert!(alloc.is_alive(new));
        assert!(!alloc.is_alive(old));
    }

    #[test]
    fn test_exhausted_generation_retires_index() {
        let mut alloc = EntityAllocator::new();
        let first = alloc.allocate();
        alloc.generations[first.index() as usize] = u32::MAX - 1;
        let last = Entity::new(first.index(), u32::MAX - 1);

        assert!(alloc.free(last));
        assert!(!alloc.is_alive(last));

        let next = alloc.allocate();
        assert_ne!(next.index(), first.index());
        assert_eq!(next.generation(), 0);
        assert_eq!(alloc.count(), 1);
        assert_eq!(alloc.iter().collect::<Vec<_>>(), vec![next]);
    }

    #[test]
    fn test_double_free_is_rejected() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.allocate();
        assert!(alloc.free(e));
        assert!(!alloc.free(e));
        assert_eq!(alloc.count(), 0);
    }

    #[test]
    fn test_foreign_entity_is_not_alive() {
        let alloc = EntityAllocator::new();
        assert!(!alloc.is_alive(Entity::new(3, 0)));
        assert!(!alloc.is_alive(Entity::INVALID));
    }

    #[test]
    fn test_iter_skips_dead() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        let c = alloc.allocate();
        alloc.free(b);
        let live: Vec<_> = alloc.iter().collect();
        assert_eq!(live, vec![a, c]);
    }

    #[test]
    fn test_entity_serialization_roundtrip() {
        let entity = Entity::new(999, 2);
        let json = serde_json::to_string(&entity).unwrap();
        let restored: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(entity, restored);
    }
}
