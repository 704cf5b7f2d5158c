//! Reflected plain structs.
//!
//! Modules can expose value types (settings blocks, parameter packs) as a
//! [`StructDesc`]: a named list of fields, each accessed through a pair of
//! field projection functions. Fields can be read and written either as
//! [`Variant`]s or as raw little-endian bytes.

use std::any::Any;
use std::marker::PhantomData;

use crate::error::ReflectionError;
use crate::property::{downcast_module, downcast_module_mut};
use crate::types::TypeDescriptor;
use crate::variant::{Reflect, Variant};

/// Type-erased access to one field of a reflected struct.
pub trait StructVarBase: Send + Sync {
    fn name(&self) -> &'static str;

    fn type_descriptor(&self) -> TypeDescriptor;

    /// # Errors
    ///
    /// Returns [`ReflectionError::ObjectTypeMismatch`] if `object` is not the
    /// struct this field belongs to.
    fn get_variant(&self, object: &dyn Any) -> Result<Variant, ReflectionError>;

    /// # Errors
    ///
    /// Returns [`ReflectionError::ObjectTypeMismatch`] for a foreign object
    /// and [`ReflectionError::ValueMismatch`] if `value` carries another tag.
    fn set_variant(&self, object: &mut dyn Any, value: &Variant) -> Result<(), ReflectionError>;

    /// Copy the field's bytes into `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::SlotSizeMismatch`] unless `slot` is exactly
    /// the field's size, and [`ReflectionError::NotByteCopyable`] for string
    /// fields.
    fn get(&self, object: &dyn Any, slot: &mut [u8]) -> Result<(), ReflectionError> {
        let desc = self.type_descriptor();
        if slot.len() != desc.size {
            return Err(ReflectionError::SlotSizeMismatch {
                field: self.name(),
                expected: desc.size,
                provided: slot.len(),
            });
        }
        let bytes = self
            .get_variant(object)?
            .to_le_bytes()
            .ok_or(ReflectionError::NotByteCopyable(self.name()))?;
        slot.copy_from_slice(&bytes);
        Ok(())
    }

    /// Overwrite the field from `slot`.
    ///
    /// # Errors
    ///
    /// Same as [`StructVarBase::get`]; the field is unchanged on error.
    fn set(&self, object: &mut dyn Any, slot: &[u8]) -> Result<(), ReflectionError> {
        let desc = self.type_descriptor();
        if slot.len() != desc.size {
            return Err(ReflectionError::SlotSizeMismatch {
                field: self.name(),
                expected: desc.size,
                provided: slot.len(),
            });
        }
        let value = Variant::from_le_bytes(desc.tag, slot)
            .ok_or(ReflectionError::NotByteCopyable(self.name()))?;
        self.set_variant(object, &value)
    }
}

impl std::fmt::Debug for dyn StructVarBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructVar")
            .field("name", &self.name())
            .field("type", &self.type_descriptor().tag)
            .finish()
    }
}

/// Field `T` of struct `C`.
pub struct StructVar<C, T> {
    name: &'static str,
    get: fn(&C) -> &T,
    get_mut: fn(&mut C) -> &mut T,
    _marker: PhantomData<fn() -> T>,
}

impl<C, T> StructVarBase for StructVar<C, T>
where
    C: 'static,
    T: Reflect + Clone,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn type_descriptor(&self) -> TypeDescriptor {
        T::type_descriptor()
    }

    fn get_variant(&self, object: &dyn Any) -> Result<Variant, ReflectionError> {
        let object = downcast_module::<C>(object)?;
        Ok((self.get)(object).clone().into_variant())
    }

    fn set_variant(&self, object: &mut dyn Any, value: &Variant) -> Result<(), ReflectionError> {
        let object = downcast_module_mut::<C>(object)?;
        let value = T::from_variant(value).ok_or(ReflectionError::ValueMismatch {
            expected: T::TAG,
            found: value.tag(),
        })?;
        *(self.get_mut)(object) = value;
        Ok(())
    }
}

/// Description of a reflected struct `C`, built field by field.
pub struct StructDesc<C> {
    name: &'static str,
    vars: Vec<Box<dyn StructVarBase>>,
    _marker: PhantomData<fn() -> C>,
}

impl<C: 'static> StructDesc<C> {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            vars: Vec::new(),
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn field<T: Reflect + Clone>(
        mut self,
        name: &'static str,
        get: fn(&C) -> &T,
        get_mut: fn(&mut C) -> &mut T,
    ) -> Self {
        self.vars.push(Box::new(StructVar {
            name,
            get,
            get_mut,
            _marker: PhantomData,
        }));
        self
    }
}

/// A registered struct with its concrete type erased.
pub struct StructType {
    name: &'static str,
    type_name: &'static str,
    size: usize,
    vars: Vec<Box<dyn StructVarBase>>,
}

impl StructType {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Full Rust type name of the described struct.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn vars(&self) -> &[Box<dyn StructVarBase>] {
        &self.vars
    }

    #[must_use]
    pub fn var(&self, name: &str) -> Option<&dyn StructVarBase> {
        self.vars.iter().find(|v| v.name() == name).map(|v| &**v)
    }
}

impl<C: 'static> From<StructDesc<C>> for StructType {
    fn from(desc: StructDesc<C>) -> Self {
        Self {
            name: desc.name,
            type_name: std::any::type_name::<C>(),
            size: std::mem::size_of::<C>(),
            vars: desc.vars,
        }
    }
}

impl std::fmt::Debug for StructType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructType")
            .field("name", &self.name)
            .field("vars", &self.vars)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use engine_math::Vec3;

    use super::*;
    use crate::types::TypeTag;

    #[derive(Debug, Default, Clone)]
    struct Fog {
        density: f32,
        color: Vec3,
        label: String,
    }

    fn fog_type() -> StructType {
        StructDesc::<Fog>::new("fog")
            .field("density", |f| &f.density, |f| &mut f.density)
            .field("color", |f| &f.color, |f| &mut f.color)
            .field("label", |f| &f.label, |f| &mut f.label)
            .into()
    }

    #[test]
    fn test_struct_type_layout() {
        let ty = fog_type();
        assert_eq!(ty.name(), "fog");
        assert_eq!(ty.size(), std::mem::size_of::<Fog>());
        let names: Vec<&str> = ty.vars().iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["density", "color", "label"]);
        assert_eq!(ty.var("color").map(|v| v.type_descriptor().tag), Some(TypeTag::Vec3));
    }

    #[test]
    fn test_variant_access() {
        let ty = fog_type();
        let mut fog = Fog::default();
        let label = ty.var("label").unwrap();
        label.set_variant(&mut fog, &Variant::from("night")).unwrap();
        assert_eq!(label.get_variant(&fog).unwrap(), Variant::CString("night".into()));
        assert!(matches!(
            label.set_variant(&mut fog, &Variant::F32(1.0)),
            Err(ReflectionError::ValueMismatch { .. })
        ));
    }

    #[test]
    fn test_byte_access_checks_slot_size() {
        let ty = fog_type();
        let mut fog = Fog::default();
        let density = ty.var("density").unwrap();

        density.set(&mut fog, &0.25f32.to_le_bytes()).unwrap();
        assert_eq!(fog.density, 0.25);

        let mut slot = [0u8; 4];
        density.get(&fog, &mut slot).unwrap();
        assert_eq!(f32::from_le_bytes(slot), 0.25);

        let mut short = [0u8; 2];
        assert!(matches!(
            density.get(&fog, &mut short),
            Err(ReflectionError::SlotSizeMismatch { field: "density", expected: 4, provided: 2 })
        ));
        assert!(density.set(&mut fog, &[1, 2, 3, 4, 5, 6, 7, 8]).is_err());
        assert_eq!(fog.density, 0.25);
    }

    #[test]
    fn test_string_field_has_no_byte_layout() {
        let ty = fog_type();
        let fog = Fog::default();
        let label = ty.var("label").unwrap();
        let mut slot = vec![0u8; std::mem::size_of::<String>()];
        assert!(matches!(
            label.get(&fog, &mut slot),
            Err(ReflectionError::NotByteCopyable("label"))
        ));
    }

    #[test]
    fn test_foreign_object_rejected() {
        let ty = fog_type();
        let other = 3u32;
        assert!(matches!(
            ty.var("density").unwrap().get_variant(&other),
            Err(ReflectionError::ObjectTypeMismatch { .. })
        ));
    }
}
