//! # engine_component
//!
//! The "E" and "C" of the engine core — entity identity and per-type
//! component storage.
//!
//! This crate provides:
//!
//! - [`Entity`] — generational entity identifiers.
//! - [`EntityAllocator`] — hands out entities and recycles destroyed indices.
//! - [`Component`] trait — the contract all component data must satisfy.
//! - [`ComponentStorage`] — dense sparse-set storage for one component type.
//! - [`ErasedStorage`] — object-safe view of a storage whose type is unknown
//!   to the caller, used by scenes to despawn entities.

pub mod component;
pub mod entity;
pub mod error;
pub mod storage;

pub use component::{Component, ComponentTypeId};
pub use entity::{Entity, EntityAllocator};
pub use error::StorageError;
pub use storage::{ComponentStorage, ErasedStorage};
