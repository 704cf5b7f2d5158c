//! Packed 8-bit RGBA colour.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA colour.
///
/// The in-memory layout is `r, g, b, a`, which packs to a little-endian
/// `u32` as `0xAABBGGRR` (see [`Color::to_abgr`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    pub const RED: Self = Self::rgba(255, 0, 0, 255);
    pub const GREEN: Self = Self::rgba(0, 255, 0, 255);
    pub const BLUE: Self = Self::rgba(0, 0, 255, 255);

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack from `0xAABBGGRR`.
    #[must_use]
    pub const fn from_abgr(abgr: u32) -> Self {
        let [r, g, b, a] = abgr.to_le_bytes();
        Self { r, g, b, a }
    }

    /// Pack to `0xAABBGGRR`.
    #[must_use]
    pub const fn to_abgr(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    /// Convert from normalised floats, clamping each channel to `[0, 1]`.
    #[must_use]
    pub fn from_vec4(v: Vec4) -> Self {
        let c = v.clamp(Vec4::ZERO, Vec4::ONE) * 255.0;
        Self::rgba(
            c.x.round() as u8,
            c.y.round() as u8,
            c.z.round() as u8,
            c.w.round() as u8,
        )
    }

    /// Convert an opaque colour from normalised RGB floats.
    #[must_use]
    pub fn from_vec3(v: Vec3) -> Self {
        Self::from_vec4(v.extend(1.0))
    }

    #[must_use]
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(
            f32::from(self.r),
            f32::from(self.g),
            f32::from(self.b),
            f32::from(self.a),
        ) / 255.0
    }

    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        self.to_vec4().truncate()
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abgr_packing() {
        let c = Color::rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.to_abgr(), 0x4433_2211);
        assert_eq!(Color::from_abgr(0x4433_2211), c);
    }

    #[test]
    fn test_color_is_four_bytes() {
        assert_eq!(std::mem::size_of::<Color>(), 4);
    }

    #[test]
    fn test_vec_conversion() {
        assert_eq!(Color::from_vec3(Vec3::new(1.0, 0.0, 0.0)), Color::RED);
        assert_eq!(Color::WHITE.to_vec4(), Vec4::ONE);
        // Out of range channels clamp.
        assert_eq!(Color::from_vec4(Vec4::new(2.0, -1.0, 0.0, 1.0)), Color::RED);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let c = Color::rgba(1, 2, 3, 4);
        let json = serde_json::to_string(&c).unwrap();
        let restored: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(c, restored);
    }
}
