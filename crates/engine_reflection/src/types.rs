//! Runtime type descriptors.
//!
//! Every native type that can cross the reflection boundary maps to exactly one
//! [`TypeTag`]. The mapping lives in the [`Reflect`](crate::Reflect) impls in
//! `variant.rs`; this module holds the closed tag set and the descriptor built
//! from it.

use serde::{Deserialize, Serialize};

use crate::variant::Reflect;

/// The closed set of value kinds understood by the reflection layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Void,
    Pointer,
    Bool,
    I32,
    U32,
    F32,
    CString,
    Entity,
    Vec2,
    Vec3,
    Vec4,
    IVec3,
    DVec3,
    Color,
    Quat,
}

impl TypeTag {
    /// Every tag, in declaration order.
    pub const ALL: [TypeTag; 15] = [
        TypeTag::Void,
        TypeTag::Pointer,
        TypeTag::Bool,
        TypeTag::I32,
        TypeTag::U32,
        TypeTag::F32,
        TypeTag::CString,
        TypeTag::Entity,
        TypeTag::Vec2,
        TypeTag::Vec3,
        TypeTag::Vec4,
        TypeTag::IVec3,
        TypeTag::DVec3,
        TypeTag::Color,
        TypeTag::Quat,
    ];

    /// Lower-case name used in logs and exported schemas.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Void => "void",
            TypeTag::Pointer => "pointer",
            TypeTag::Bool => "bool",
            TypeTag::I32 => "i32",
            TypeTag::U32 => "u32",
            TypeTag::F32 => "f32",
            TypeTag::CString => "cstring",
            TypeTag::Entity => "entity",
            TypeTag::Vec2 => "vec2",
            TypeTag::Vec3 => "vec3",
            TypeTag::Vec4 => "vec4",
            TypeTag::IVec3 => "ivec3",
            TypeTag::DVec3 => "dvec3",
            TypeTag::Color => "color",
            TypeTag::Quat => "quat",
        }
    }

    /// Size in bytes of the little-endian payload written by
    /// [`Variant::to_le_bytes`](crate::Variant::to_le_bytes), or `None` for
    /// tags whose payload is not byte-copyable.
    #[must_use]
    pub const fn payload_size(self) -> Option<usize> {
        match self {
            TypeTag::Void => Some(0),
            TypeTag::Bool => Some(1),
            TypeTag::I32 | TypeTag::U32 | TypeTag::F32 | TypeTag::Color => Some(4),
            TypeTag::Pointer | TypeTag::Entity | TypeTag::Vec2 => Some(8),
            TypeTag::Vec3 | TypeTag::IVec3 => Some(12),
            TypeTag::Vec4 | TypeTag::Quat => Some(16),
            TypeTag::DVec3 => Some(24),
            TypeTag::CString => None,
        }
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Describes a function argument, return value or struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    pub tag: TypeTag,
    pub type_name: &'static str,
    pub is_const: bool,
    pub is_reference: bool,
    pub is_pointer: bool,
    /// `size_of` the native type; 0 for void.
    pub size: usize,
}

impl TypeDescriptor {
    /// Build the descriptor of a native type.
    #[must_use]
    pub fn of<T: Reflect>() -> Self {
        Self {
            tag: T::TAG,
            type_name: normalize_type_name::<T>(),
            is_const: false,
            is_reference: false,
            is_pointer: T::TAG == TypeTag::Pointer,
            size: std::mem::size_of::<T>(),
        }
    }

    #[must_use]
    pub fn as_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    #[must_use]
    pub fn as_reference(mut self) -> Self {
        self.is_reference = true;
        self
    }

    /// Returns `true` if `other` carries the same tag. Flags and names are not
    /// compared; two descriptors with equal tags exchange values losslessly.
    #[must_use]
    pub fn is_compatible(&self, other: &TypeDescriptor) -> bool {
        self.tag == other.tag
    }
}

/// Strip the module path from a Rust type name: `glam::f32::vec3::Vec3`
/// becomes `Vec3`, `()` becomes `void`.
fn normalize_type_name<T: 'static>() -> &'static str {
    let full = std::any::type_name::<T>();
    if full == "()" {
        return "void";
    }
    // Generic arguments keep their paths; only the outer path is stripped.
    let outer_end = full.find('<').unwrap_or(full.len());
    match full[..outer_end].rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

/// Opaque handle passed through [`TypeTag::Pointer`] arguments.
///
/// The reflection layer never dereferences it; its meaning is defined by the
/// module that hands it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ObjectHandle(pub u64);

/// A path to a resource (mesh, texture, material...). Travels as
/// [`TypeTag::CString`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResourcePath(pub String);

impl ResourcePath {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lower-cased file extension, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let file = self.0.rsplit(['/', '\\']).next()?;
        let (_, ext) = file.rsplit_once('.')?;
        Some(ext.to_ascii_lowercase())
    }
}

impl std::fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
