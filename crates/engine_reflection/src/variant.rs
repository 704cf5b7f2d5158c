//! The [`Variant`] value bridge.
//!
//! All conversions between native values and runtime values live here: the
//! [`Reflect`] impls map each native type to its [`TypeTag`], and
//! [`Variant::to_le_bytes`] / [`Variant::from_le_bytes`] define the byte
//! payload used by return buffers and struct slots.

use engine_component::Entity;
use engine_math::{Color, DVec3, IVec3, Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::types::{ObjectHandle, ResourcePath, TypeDescriptor, TypeTag};

/// A runtime value of exactly one [`TypeTag`].
///
/// A default-constructed variant is [`Variant::Void`], not an `I32` zero, so
/// "no value" stays distinguishable from a stored integer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Void,
    Pointer(ObjectHandle),
    Bool(bool),
    I32(i32),
    U32(u32),
    F32(f32),
    CString(String),
    Entity(Entity),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    IVec3(IVec3),
    DVec3(DVec3),
    Color(Color),
    Quat(Quat),
}

impl Variant {
    /// The tag of the value currently held.
    #[must_use]
    pub const fn tag(&self) -> TypeTag {
        match self {
            Variant::Void => TypeTag::Void,
            Variant::Pointer(_) => TypeTag::Pointer,
            Variant::Bool(_) => TypeTag::Bool,
            Variant::I32(_) => TypeTag::I32,
            Variant::U32(_) => TypeTag::U32,
            Variant::F32(_) => TypeTag::F32,
            Variant::CString(_) => TypeTag::CString,
            Variant::Entity(_) => TypeTag::Entity,
            Variant::Vec2(_) => TypeTag::Vec2,
            Variant::Vec3(_) => TypeTag::Vec3,
            Variant::Vec4(_) => TypeTag::Vec4,
            Variant::IVec3(_) => TypeTag::IVec3,
            Variant::DVec3(_) => TypeTag::DVec3,
            Variant::Color(_) => TypeTag::Color,
            Variant::Quat(_) => TypeTag::Quat,
        }
    }

    /// Replace the held value; payload and tag change together.
    pub fn set<T: Reflect>(&mut self, value: T) {
        *self = value.into_variant();
    }

    /// Read the held value as `T`, or `None` if the tag differs.
    #[must_use]
    pub fn get<T: Reflect>(&self) -> Option<T> {
        T::from_variant(self)
    }

    /// Encode the payload as little-endian bytes.
    ///
    /// Returns `None` for [`TypeTag::CString`], which has no fixed-size
    /// payload. The length of the result always equals
    /// [`TypeTag::payload_size`].
    #[must_use]
    pub fn to_le_bytes(&self) -> Option<Vec<u8>> {
        let mut out = Vec::with_capacity(self.tag().payload_size().unwrap_or(0));
        match self {
            Variant::Void => {}
            Variant::Pointer(h) => out.extend_from_slice(&h.0.to_le_bytes()),
            Variant::Bool(b) => out.push(u8::from(*b)),
            Variant::I32(v) => out.extend_from_slice(&v.to_le_bytes()),
            Variant::U32(v) => out.extend_from_slice(&v.to_le_bytes()),
            Variant::F32(v) => out.extend_from_slice(&v.to_le_bytes()),
            Variant::CString(_) => return None,
            Variant::Entity(e) => out.extend_from_slice(&e.id().to_le_bytes()),
            Variant::Vec2(v) => extend_f32(&mut out, &v.to_array()),
            Variant::Vec3(v) => extend_f32(&mut out, &v.to_array()),
            Variant::Vec4(v) => extend_f32(&mut out, &v.to_array()),
            Variant::IVec3(v) => {
                for c in v.to_array() {
                    out.extend_from_slice(&c.to_le_bytes());
                }
            }
            Variant::DVec3(v) => {
                for c in v.to_array() {
                    out.extend_from_slice(&c.to_le_bytes());
                }
            }
            Variant::Color(c) => out.extend_from_slice(&[c.r, c.g, c.b, c.a]),
            Variant::Quat(q) => extend_f32(&mut out, &q.to_array()),
        }
        Some(out)
    }

    /// Decode a payload written by [`Variant::to_le_bytes`].
    ///
    /// Returns `None` when `bytes` is not exactly the payload size of `tag`
    /// or when `tag` has no byte payload.
    #[must_use]
    pub fn from_le_bytes(tag: TypeTag, bytes: &[u8]) -> Option<Variant> {
        if tag.payload_size()? != bytes.len() {
            return None;
        }
        let value = match tag {
            TypeTag::Void => Variant::Void,
            TypeTag::Pointer => Variant::Pointer(ObjectHandle(u64::from_le_bytes(array(bytes)?))),
            TypeTag::Bool => Variant::Bool(bytes[0] != 0),
            TypeTag::I32 => Variant::I32(i32::from_le_bytes(array(bytes)?)),
            TypeTag::U32 => Variant::U32(u32::from_le_bytes(array(bytes)?)),
            TypeTag::F32 => Variant::F32(f32::from_le_bytes(array(bytes)?)),
            TypeTag::CString => return None,
            TypeTag::Entity => Variant::Entity(Entity(u64::from_le_bytes(array(bytes)?))),
            TypeTag::Vec2 => Variant::Vec2(Vec2::from_array(read_f32s(bytes)?)),
            TypeTag::Vec3 => Variant::Vec3(Vec3::from_array(read_f32s(bytes)?)),
            TypeTag::Vec4 => Variant::Vec4(Vec4::from_array(read_f32s(bytes)?)),
            TypeTag::IVec3 => {
                let mut c = [0i32; 3];
                for (dst, chunk) in c.iter_mut().zip(bytes.chunks_exact(4)) {
                    *dst = i32::from_le_bytes(array(chunk)?);
                }
                Variant::IVec3(IVec3::from_array(c))
            }
            TypeTag::DVec3 => {
                let mut c = [0.0f64; 3];
                for (dst, chunk) in c.iter_mut().zip(bytes.chunks_exact(8)) {
                    *dst = f64::from_le_bytes(array(chunk)?);
                }
                Variant::DVec3(DVec3::from_array(c))
            }
            TypeTag::Color => Variant::Color(Color::rgba(bytes[0], bytes[1], bytes[2], bytes[3])),
            TypeTag::Quat => Variant::Quat(Quat::from_array(read_f32s(bytes)?)),
        };
        Some(value)
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Void => f.write_str("void"),
            Variant::Pointer(h) => write!(f, "{:#x}", h.0),
            Variant::Bool(v) => write!(f, "{v}"),
            Variant::I32(v) => write!(f, "{v}"),
            Variant::U32(v) => write!(f, "{v}"),
            Variant::F32(v) => write!(f, "{v}"),
            Variant::CString(v) => write!(f, "{v:?}"),
            Variant::Entity(e) => write!(f, "{e}"),
            Variant::Vec2(v) => write!(f, "({}, {})", v.x, v.y),
            Variant::Vec3(v) => write!(f, "({}, {}, {})", v.x, v.y, v.z),
            Variant::Vec4(v) => write!(f, "({}, {}, {}, {})", v.x, v.y, v.z, v.w),
            Variant::IVec3(v) => write!(f, "({}, {}, {})", v.x, v.y, v.z),
            Variant::DVec3(v) => write!(f, "({}, {}, {})", v.x, v.y, v.z),
            Variant::Color(c) => write!(f, "#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a),
            Variant::Quat(q) => write!(f, "({}, {}, {}, {})", q.x, q.y, q.z, q.w),
        }
    }
}

fn extend_f32(out: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

fn array<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
    bytes.try_into().ok()
}

fn read_f32s<const N: usize>(bytes: &[u8]) -> Option<[f32; N]> {
    if bytes.len() != N * 4 {
        return None;
    }
    let mut out = [0.0f32; N];
    for (dst, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
        *dst = f32::from_le_bytes(array(chunk)?);
    }
    Some(out)
}

/// A native type that can travel through a [`Variant`].
///
/// Conversions are exact: `from_variant` only accepts a variant whose tag is
/// [`Reflect::TAG`].
pub trait Reflect: Sized + 'static {
    const TAG: TypeTag;

    fn into_variant(self) -> Variant;

    fn from_variant(variant: &Variant) -> Option<Self>;

    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }
}

macro_rules! impl_reflect_copy {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                const TAG: TypeTag = TypeTag::$tag;

                fn into_variant(self) -> Variant {
                    Variant::$tag(self)
                }

                fn from_variant(variant: &Variant) -> Option<Self> {
                    match variant {
                        Variant::$tag(v) => Some(*v),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Variant {
                fn from(value: $ty) -> Self {
                    Variant::$tag(value)
                }
            }
        )*
    };
}

impl_reflect_copy! {
    ObjectHandle => Pointer,
    bool => Bool,
    i32 => I32,
    u32 => U32,
    f32 => F32,
    Entity => Entity,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    IVec3 => IVec3,
    DVec3 => DVec3,
    Color => Color,
    Quat => Quat,
}

impl Reflect for () {
    const TAG: TypeTag = TypeTag::Void;

    fn into_variant(self) -> Variant {
        Variant::Void
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        matches!(variant, Variant::Void).then_some(())
    }
}

impl Reflect for String {
    const TAG: TypeTag = TypeTag::CString;

    fn into_variant(self) -> Variant {
        Variant::CString(self)
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        match variant {
            Variant::CString(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl Reflect for ResourcePath {
    const TAG: TypeTag = TypeTag::CString;

    fn into_variant(self) -> Variant {
        Variant::CString(self.0)
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        match variant {
            Variant::CString(s) => Some(ResourcePath(s.clone())),
            _ => None,
        }
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::CString(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::CString(value.to_owned())
    }
}

impl From<ResourcePath> for Variant {
    fn from(value: ResourcePath) -> Self {
        Variant::CString(value.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Variant> {
        vec![
            Variant::Void,
            Variant::Pointer(ObjectHandle(0xdead_beef)),
            Variant::Bool(true),
            Variant::I32(-7),
            Variant::U32(7),
            Variant::F32(1.5),
            Variant::CString("hello".into()),
            Variant::Entity(Entity(42)),
            Variant::Vec2(Vec2::new(1.0, 2.0)),
            Variant::Vec3(Vec3::new(1.0, 2.0, 3.0)),
            Variant::Vec4(Vec4::new(1.0, 2.0, 3.0, 4.0)),
            Variant::IVec3(IVec3::new(-1, 0, 70_000)),
            Variant::DVec3(DVec3::new(1.0, 2.0, 3.0)),
            Variant::Color(Color::rgba(1, 2, 3, 4)),
            Variant::Quat(Quat::from_rotation_z(0.5)),
        ]
    }

    #[test]
    fn test_every_tag_has_a_sample() {
        let tags: Vec<TypeTag> = samples().iter().map(Variant::tag).collect();
        assert_eq!(tags, TypeTag::ALL.to_vec());
    }

    #[test]
    fn test_default_is_void() {
        assert_eq!(Variant::default().tag(), TypeTag::Void);
    }

    #[test]
    fn test_set_updates_tag_and_payload() {
        let mut v = Variant::I32(3);
        v.set(Vec3::X);
        assert_eq!(v.tag(), TypeTag::Vec3);
        assert_eq!(v.get::<Vec3>(), Some(Vec3::X));
        assert_eq!(v.get::<i32>(), None);

        v.set(String::from("name"));
        assert_eq!(v.tag(), TypeTag::CString);
        assert_eq!(v.get::<String>().as_deref(), Some("name"));
    }

    #[test]
    fn test_conversion_is_exact() {
        assert_eq!(u32::from_variant(&Variant::I32(1)), None);
        assert_eq!(i32::from_variant(&Variant::I32(1)), Some(1));
        assert_eq!(
            ResourcePath::from_variant(&Variant::from("a.fbx")),
            Some(ResourcePath::new("a.fbx"))
        );
    }

    #[test]
    fn test_le_bytes_size_matches_tag() {
        for v in samples() {
            match v.to_le_bytes() {
                Some(bytes) => assert_eq!(Some(bytes.len()), v.tag().payload_size(), "{v:?}"),
                None => assert_eq!(v.tag(), TypeTag::CString),
            }
        }
    }

    #[test]
    fn test_le_bytes_decode_matches_encode() {
        for v in samples() {
            if let Some(bytes) = v.to_le_bytes() {
                assert_eq!(Variant::from_le_bytes(v.tag(), &bytes), Some(v.clone()));
            }
        }
    }

    #[test]
    fn test_from_le_bytes_rejects_wrong_length() {
        assert_eq!(Variant::from_le_bytes(TypeTag::F32, &[0, 0]), None);
        assert_eq!(Variant::from_le_bytes(TypeTag::CString, b"abc"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Variant::Vec2(Vec2::new(1.0, 2.5)).to_string(), "(1, 2.5)");
        assert_eq!(Variant::IVec3(IVec3::new(1, -2, 3)).to_string(), "(1, -2, 3)");
        assert_eq!(Variant::Color(Color::rgba(255, 0, 16, 255)).to_string(), "#ff0010ff");
        assert_eq!(Variant::CString("x".into()).to_string(), "\"x\"");
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&Variant::U32(9)).unwrap();
        assert_eq!(json, r#"{"type":"u32","value":9}"#);
        let restored: Variant = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, Variant::U32(9));
    }
}
