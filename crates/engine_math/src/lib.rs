//! # engine_math
//!
//! Math types used by reflected properties. Re-exports [`glam`] for linear
//! algebra and defines the packed RGBA [`Color`].

pub mod color;

// Re-export glam types for convenience.
pub use glam::{DVec3, IVec3, Quat, Vec2, Vec3, Vec4};

pub use color::Color;
