//! # engine_component
//!
//! Identity primitives shared by every engine module and by the reflection
//! layer that describes them.
//!
//! This crate provides:
//!
//! - [`Entity`]: lightweight `u64` entity identifiers.
//! - [`EntityAllocator`]: monotonically increasing ID allocator.
//! - [`ComponentTypeId`]: stable component type identity derived from a name.
//! - [`StableHash`] / [`RuntimeHash`]: FNV-1a name hashes for persisted and
//!   in-process lookups.

pub mod component;
pub mod entity;
pub mod hash;

pub use component::ComponentTypeId;
pub use entity::{Entity, EntityAllocator};
pub use hash::{RuntimeHash, StableHash};
