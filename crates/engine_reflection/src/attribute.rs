//! Property attributes: editing hints attached during registration.

use std::sync::Arc;

use engine_component::RuntimeHash;
use serde::{Deserialize, Serialize};

use crate::property::ComponentRef;

/// Discriminant of an [`Attribute`], used for lookups and schema export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Min,
    Clamp,
    Radians,
    Color,
    Resource,
    Enum,
    Multiline,
    StringEnum,
    NoUi,
}

/// Identifies a resource kind (`"model"`, `"texture"`...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceType {
    pub name: &'static str,
    pub hash: RuntimeHash,
}

impl ResourceType {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            hash: RuntimeHash::of_str(name),
        }
    }
}

/// Supplies the option names of an enum-valued property.
///
/// Sources receive the component being edited, so the option list may depend
/// on its current state (e.g. the layers defined by the module).
pub trait EnumSource: Send + Sync {
    fn count(&self, cmp: &ComponentRef<'_>) -> u32;
    fn name(&self, cmp: &ComponentRef<'_>, index: u32) -> Option<String>;
}

/// An [`EnumSource`] backed by a fixed list of names.
#[derive(Debug, Clone, Copy)]
pub struct StaticEnum(pub &'static [&'static str]);

impl EnumSource for StaticEnum {
    fn count(&self, _cmp: &ComponentRef<'_>) -> u32 {
        self.0.len() as u32
    }

    fn name(&self, _cmp: &ComponentRef<'_>, index: u32) -> Option<String> {
        self.0.get(index as usize).map(|s| (*s).to_owned())
    }
}

/// An editing hint attached to a property.
#[derive(Clone)]
pub enum Attribute {
    Min(f32),
    Clamp { min: f32, max: f32 },
    /// The value is stored in radians but shown in degrees.
    Radians,
    /// A `Vec3`/`Vec4` holding a colour.
    Color,
    Resource(ResourceType),
    /// An `i32` property whose values index into the source's names.
    Enum(Arc<dyn EnumSource>),
    Multiline,
    /// A string property restricted to the source's names.
    StringEnum(Arc<dyn EnumSource>),
    NoUi,
}

impl Attribute {
    #[must_use]
    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Min(_) => AttributeKind::Min,
            Attribute::Clamp { .. } => AttributeKind::Clamp,
            Attribute::Radians => AttributeKind::Radians,
            Attribute::Color => AttributeKind::Color,
            Attribute::Resource(_) => AttributeKind::Resource,
            Attribute::Enum(_) => AttributeKind::Enum,
            Attribute::Multiline => AttributeKind::Multiline,
            Attribute::StringEnum(_) => AttributeKind::StringEnum,
            Attribute::NoUi => AttributeKind::NoUi,
        }
    }

    /// Apply `Min`/`Clamp` limits to an edited value; other attributes leave
    /// it unchanged.
    #[must_use]
    pub fn limit(&self, value: f32) -> f32 {
        match self {
            Attribute::Min(min) => value.max(*min),
            Attribute::Clamp { min, max } => value.clamp(*min, *max),
            _ => value,
        }
    }
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribute::Min(min) => f.debug_tuple("Min").field(min).finish(),
            Attribute::Clamp { min, max } => f
                .debug_struct("Clamp")
                .field("min", min)
                .field("max", max)
                .finish(),
            Attribute::Resource(ty) => f.debug_tuple("Resource").field(&ty.name).finish(),
            other => write!(f, "{:?}", other.kind()),
        }
    }
}

/// Find the first attribute of `kind` in `attributes`.
#[must_use]
pub fn find(attributes: &[Attribute], kind: AttributeKind) -> Option<&Attribute> {
    attributes.iter().find(|a| a.kind() == kind)
}

#[cfg(test)]
mod tests {
    use engine_component::Entity;

    use super::*;

    #[test]
    fn test_find_returns_first_match() {
        let attrs = vec![Attribute::Min(0.0), Attribute::Radians, Attribute::Min(5.0)];
        assert!(matches!(find(&attrs, AttributeKind::Min), Some(Attribute::Min(v)) if *v == 0.0));
        assert!(find(&attrs, AttributeKind::Color).is_none());
    }

    #[test]
    fn test_limits() {
        assert_eq!(Attribute::Min(1.0).limit(-3.0), 1.0);
        assert_eq!(Attribute::Clamp { min: 0.0, max: 2.0 }.limit(5.0), 2.0);
        assert_eq!(Attribute::Radians.limit(5.0), 5.0);
    }

    #[test]
    fn test_static_enum_source() {
        let scene = ();
        let cmp = ComponentRef::new(&scene, Entity(1));
        let source = StaticEnum(&["point", "spot"]);
        assert_eq!(source.count(&cmp), 2);
        assert_eq!(source.name(&cmp, 1).as_deref(), Some("spot"));
        assert_eq!(source.name(&cmp, 2), None);
    }

    #[test]
    fn test_resource_type_hash() {
        const MODEL: ResourceType = ResourceType::new("model");
        assert_eq!(MODEL.hash, RuntimeHash::of_str("model"));
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", Attribute::NoUi), "NoUi");
        assert_eq!(format!("{:?}", Attribute::Min(1.0)), "Min(1.0)");
    }
}
