//! FNV-1a name hashing.
//!
//! Two widths are used across the engine:
//!
//! - [`StableHash`] is 64-bit and is meant to be persisted (scene files,
//!   serialized property references). It must never change between runs.
//! - [`RuntimeHash`] is 32-bit and is only used for in-process lookup tables,
//!   e.g. resolving a component type from a hashed string id.
//!
//! Both are plain FNV-1a over UTF-8 bytes, so any language can reproduce them.

use serde::{Deserialize, Serialize};

const FNV64_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV64_PRIME: u64 = 0x0100_0000_01b3;

const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// Feed `bytes` into a running FNV-1a 64-bit state.
#[must_use]
pub const fn fnv1a64_continue(mut hash: u64, bytes: &[u8]) -> u64 {
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV64_PRIME);
        i += 1;
    }
    hash
}

/// FNV-1a 64-bit of `bytes`.
#[must_use]
pub const fn fnv1a64(bytes: &[u8]) -> u64 {
    fnv1a64_continue(FNV64_OFFSET_BASIS, bytes)
}

/// FNV-1a 32-bit of `bytes`.
#[must_use]
pub const fn fnv1a32(bytes: &[u8]) -> u32 {
    let mut hash = FNV32_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(FNV32_PRIME);
        i += 1;
    }
    hash
}

/// A 64-bit hash that is stable across process runs and platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StableHash(pub u64);

impl StableHash {
    /// Hash a single string.
    #[must_use]
    pub const fn of_str(value: &str) -> Self {
        Self(fnv1a64(value.as_bytes()))
    }

    /// Hash a sequence of string parts as if they were joined with `'.'`.
    ///
    /// `from_parts(&["light", "intensity"])` equals `of_str("light.intensity")`.
    /// Parts must not contain `'.'` themselves, or different splits collide.
    #[must_use]
    pub fn from_parts(parts: &[&str]) -> Self {
        let mut hash = FNV64_OFFSET_BASIS;
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                hash = fnv1a64_continue(hash, b".");
            }
            hash = fnv1a64_continue(hash, part.as_bytes());
        }
        Self(hash)
    }
}

impl std::fmt::Display for StableHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A 32-bit hash valid for the lifetime of one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuntimeHash(pub u32);

impl RuntimeHash {
    /// Hash a string.
    #[must_use]
    pub const fn of_str(value: &str) -> Self {
        Self(fnv1a32(value.as_bytes()))
    }
}
