//! Component type identity.
//!
//! [`ComponentTypeId`] is derived from the component's **string id** using
//! the FNV-1a 64-bit hash algorithm. The id is therefore stable across process
//! runs and can be stored in scene files, and any tool that knows the string
//! id can compute it without asking the registry.

use serde::{Deserialize, Serialize};

use crate::hash::{RuntimeHash, fnv1a64};

/// A unique identifier for a component type, derived from its string id
/// using the FNV-1a 64-bit hash algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    /// Compute the [`ComponentTypeId`] from a component's string id.
    ///
    /// # Algorithm (FNV-1a 64-bit)
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325          (offset basis)
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3  (prime)
    /// return hash
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        Self(fnv1a64(name.as_bytes()))
    }

    /// The in-process hash of a component string id, as used by
    /// `Registry::component_type_from_hash`.
    #[must_use]
    pub const fn runtime_hash(name: &str) -> RuntimeHash {
        RuntimeHash::of_str(name)
    }
}

impl std::fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ComponentType({:016x})", self.0)
    }
}
