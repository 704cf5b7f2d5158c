//! Property descriptors.
//!
//! A property is a named accessor pair over one component's state. Getters and
//! setters receive the owning module object as `&dyn Any` / `&mut dyn Any`
//! together with the entity and, for array items, the item index. The typed
//! closures registered through the builder downcast the module object back to
//! its concrete type.
//!
//! Three shapes exist:
//!
//! - [`Property<T>`]: a single typed value.
//! - [`ArrayProperty`]: a variable-length list of items per entity, each item
//!   described by the array's child properties.
//! - [`BlobProperty`]: an opaque serialised sub-structure.

use std::any::Any;

use engine_component::{ComponentTypeId, Entity};
use engine_math::{IVec3, Vec2, Vec3, Vec4};
use serde::Serialize;

use crate::attribute::{self, Attribute, AttributeKind};
use crate::error::ReflectionError;
use crate::stream::{InputStream, OutputStream};
use crate::types::{ResourcePath, TypeTag};
use crate::variant::{Reflect, Variant};
use crate::visitor::PropertyVisitor;

/// Read access to one entity's component inside a module object.
#[derive(Clone, Copy)]
pub struct ComponentRef<'a> {
    pub module: &'a dyn Any,
    pub entity: Entity,
}

impl<'a> ComponentRef<'a> {
    #[must_use]
    pub fn new(module: &'a dyn Any, entity: Entity) -> Self {
        Self { module, entity }
    }
}

/// Write access to one entity's component inside a module object.
pub struct ComponentMut<'a> {
    pub module: &'a mut dyn Any,
    pub entity: Entity,
}

impl<'a> ComponentMut<'a> {
    #[must_use]
    pub fn new(module: &'a mut dyn Any, entity: Entity) -> Self {
        Self { module, entity }
    }

    #[must_use]
    pub fn to_ref(&self) -> ComponentRef<'_> {
        ComponentRef {
            module: &*self.module,
            entity: self.entity,
        }
    }
}

pub(crate) fn downcast_module<M: 'static>(module: &dyn Any) -> Result<&M, ReflectionError> {
    module
        .downcast_ref::<M>()
        .ok_or(ReflectionError::ObjectTypeMismatch {
            expected: std::any::type_name::<M>(),
        })
}

pub(crate) fn downcast_module_mut<M: 'static>(
    module: &mut dyn Any,
) -> Result<&mut M, ReflectionError> {
    module
        .downcast_mut::<M>()
        .ok_or(ReflectionError::ObjectTypeMismatch {
            expected: std::any::type_name::<M>(),
        })
}

/// Data shared by every property shape.
#[derive(Debug, Clone)]
pub struct PropertyMeta {
    pub name: &'static str,
    /// The component that owns this property.
    pub component: ComponentTypeId,
    pub attributes: Vec<Attribute>,
}

impl PropertyMeta {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            component: ComponentTypeId(0),
            attributes: Vec::new(),
        }
    }
}

/// The shape of a property, as exported in schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", content = "type", rename_all = "snake_case")]
pub enum PropertyKind {
    Value(TypeTag),
    Array,
    Blob,
}

/// Object-safe interface implemented by every property shape.
pub trait PropertyBase: Any + Send + Sync {
    fn meta(&self) -> &PropertyMeta;

    fn meta_mut(&mut self) -> &mut PropertyMeta;

    fn kind(&self) -> PropertyKind;

    /// Double dispatch into the visitor method for this property's concrete
    /// type.
    fn visit(&self, visitor: &mut dyn PropertyVisitor);

    fn is_readonly(&self) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_value(&self) -> Option<&dyn ValueProperty> {
        None
    }

    fn as_array(&self) -> Option<&ArrayProperty> {
        None
    }

    fn as_blob(&self) -> Option<&BlobProperty> {
        None
    }

    fn name(&self) -> &'static str {
        self.meta().name
    }

    fn component(&self) -> ComponentTypeId {
        self.meta().component
    }

    fn attributes(&self) -> &[Attribute] {
        &self.meta().attributes
    }

    fn attribute(&self, kind: AttributeKind) -> Option<&Attribute> {
        attribute::find(self.attributes(), kind)
    }
}

impl dyn PropertyBase {
    /// Downcast to a typed value property.
    #[must_use]
    pub fn downcast_ref<T: PropertyValue>(&self) -> Option<&Property<T>> {
        self.as_any().downcast_ref::<Property<T>>()
    }
}

impl std::fmt::Debug for dyn PropertyBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .field("readonly", &self.is_readonly())
            .finish()
    }
}

/// Variant-level access to a typed value property.
pub trait ValueProperty {
    fn tag(&self) -> TypeTag;

    /// # Errors
    ///
    /// Propagates getter failures (wrong module type, missing index).
    fn get_variant(&self, cmp: &ComponentRef<'_>, index: Option<u32>)
    -> Result<Variant, ReflectionError>;

    /// # Errors
    ///
    /// Returns [`ReflectionError::ValueMismatch`] if `value` carries another
    /// tag, [`ReflectionError::ReadOnly`] if there is no setter.
    fn set_variant(
        &self,
        cmp: &mut ComponentMut<'_>,
        index: Option<u32>,
        value: &Variant,
    ) -> Result<(), ReflectionError>;
}

/// A type that can back a [`Property<T>`]. Each implementation routes to its
/// own [`PropertyVisitor`] method.
pub trait PropertyValue: Reflect + Send + Sync {
    fn accept(prop: &Property<Self>, visitor: &mut dyn PropertyVisitor);
}

macro_rules! impl_property_value {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl PropertyValue for $ty {
                fn accept(prop: &Property<Self>, visitor: &mut dyn PropertyVisitor) {
                    visitor.$method(prop);
                }
            }
        )*
    };
}

impl_property_value! {
    f32 => visit_f32,
    i32 => visit_i32,
    u32 => visit_u32,
    Entity => visit_entity,
    Vec2 => visit_vec2,
    Vec3 => visit_vec3,
    Vec4 => visit_vec4,
    IVec3 => visit_ivec3,
    ResourcePath => visit_path,
    bool => visit_bool,
    String => visit_string,
}

pub type Getter<T> =
    Box<dyn Fn(&dyn Any, Entity, Option<u32>) -> Result<T, ReflectionError> + Send + Sync>;
pub type Setter<T> =
    Box<dyn Fn(&mut dyn Any, Entity, Option<u32>, T) -> Result<(), ReflectionError> + Send + Sync>;

/// A typed value property. Read-only when it has no setter.
pub struct Property<T> {
    meta: PropertyMeta,
    getter: Getter<T>,
    setter: Option<Setter<T>>,
}

impl<T: PropertyValue> Property<T> {
    #[must_use]
    pub fn new(name: &'static str, getter: Getter<T>, setter: Option<Setter<T>>) -> Self {
        Self {
            meta: PropertyMeta::new(name),
            getter,
            setter,
        }
    }

    /// Read the value for `cmp`. `index` selects the item of an enclosing
    /// array and is ignored by top-level properties.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::ObjectTypeMismatch`] if `cmp.module` is not
    /// the registered module type.
    pub fn get(&self, cmp: &ComponentRef<'_>, index: Option<u32>) -> Result<T, ReflectionError> {
        (self.getter)(cmp.module, cmp.entity, index)
    }

    /// Write the value for `cmp`.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::ReadOnly`] if the property has no setter.
    pub fn set(
        &self,
        cmp: &mut ComponentMut<'_>,
        index: Option<u32>,
        value: T,
    ) -> Result<(), ReflectionError> {
        let setter = self
            .setter
            .as_ref()
            .ok_or(ReflectionError::ReadOnly(self.meta.name))?;
        setter(&mut *cmp.module, cmp.entity, index, value)
    }
}

impl<T: PropertyValue> PropertyBase for Property<T> {
    fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut PropertyMeta {
        &mut self.meta
    }

    fn kind(&self) -> PropertyKind {
        PropertyKind::Value(T::TAG)
    }

    fn visit(&self, visitor: &mut dyn PropertyVisitor) {
        T::accept(self, visitor);
    }

    fn is_readonly(&self) -> bool {
        self.setter.is_none()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_value(&self) -> Option<&dyn ValueProperty> {
        Some(self)
    }
}

impl<T: PropertyValue> ValueProperty for Property<T> {
    fn tag(&self) -> TypeTag {
        T::TAG
    }

    fn get_variant(
        &self,
        cmp: &ComponentRef<'_>,
        index: Option<u32>,
    ) -> Result<Variant, ReflectionError> {
        Ok(self.get(cmp, index)?.into_variant())
    }

    fn set_variant(
        &self,
        cmp: &mut ComponentMut<'_>,
        index: Option<u32>,
        value: &Variant,
    ) -> Result<(), ReflectionError> {
        let typed = T::from_variant(value).ok_or(ReflectionError::ValueMismatch {
            expected: T::TAG,
            found: value.tag(),
        })?;
        self.set(cmp, index, typed)
    }
}

impl<T> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.meta.name)
            .field("type", &std::any::type_name::<T>())
            .field("readonly", &self.setter.is_none())
            .finish()
    }
}

pub type Counter = Box<dyn Fn(&dyn Any, Entity) -> Result<u32, ReflectionError> + Send + Sync>;
pub type Adder = Box<dyn Fn(&mut dyn Any, Entity, u32) -> Result<(), ReflectionError> + Send + Sync>;
pub type Remover = Adder;

/// A variable-length list of items per entity. Each item is described by the
/// child properties, which are read and written with the item index.
pub struct ArrayProperty {
    meta: PropertyMeta,
    children: Vec<Box<dyn PropertyBase>>,
    counter: Counter,
    adder: Adder,
    remover: Remover,
}

impl ArrayProperty {
    #[must_use]
    pub fn new(name: &'static str, counter: Counter, adder: Adder, remover: Remover) -> Self {
        Self {
            meta: PropertyMeta::new(name),
            children: Vec::new(),
            counter,
            adder,
            remover,
        }
    }

    /// Child properties in registration order.
    #[must_use]
    pub fn children(&self) -> &[Box<dyn PropertyBase>] {
        &self.children
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&dyn PropertyBase> {
        self.children
            .iter()
            .find(|c| c.name() == name)
            .map(|c| &**c)
    }

    pub(crate) fn push_child(&mut self, child: Box<dyn PropertyBase>) {
        self.children.push(child);
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Box<dyn PropertyBase>> {
        &mut self.children
    }

    /// Number of items `cmp` currently holds.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::ObjectTypeMismatch`] for a foreign module.
    pub fn count(&self, cmp: &ComponentRef<'_>) -> Result<u32, ReflectionError> {
        (self.counter)(cmp.module, cmp.entity)
    }

    /// Insert a new item at `index`, or append when `index` is `None`.
    /// Returns the index of the new item.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::IndexOutOfRange`] if `index` is past the end,
    /// [`ReflectionError::ArrayNotResized`] if the adder left the count
    /// unchanged.
    pub fn add_item(
        &self,
        cmp: &mut ComponentMut<'_>,
        index: Option<u32>,
    ) -> Result<u32, ReflectionError> {
        let count = self.count(&cmp.to_ref())?;
        let index = index.unwrap_or(count);
        if index > count {
            return Err(ReflectionError::IndexOutOfRange {
                property: self.meta.name,
                index,
                count,
            });
        }
        (self.adder)(&mut *cmp.module, cmp.entity, index)?;
        self.expect_count(cmp, count + 1)?;
        Ok(index)
    }

    /// Remove the item at `index`; later items shift down by one.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::IndexOutOfRange`] if there is no such item,
    /// [`ReflectionError::ArrayNotResized`] if the remover left the count
    /// unchanged.
    pub fn remove_item(&self, cmp: &mut ComponentMut<'_>, index: u32) -> Result<(), ReflectionError> {
        let count = self.count(&cmp.to_ref())?;
        if index >= count {
            return Err(ReflectionError::IndexOutOfRange {
                property: self.meta.name,
                index,
                count,
            });
        }
        (self.remover)(&mut *cmp.module, cmp.entity, index)?;
        self.expect_count(cmp, count - 1)
    }

    fn expect_count(&self, cmp: &ComponentMut<'_>, expected: u32) -> Result<(), ReflectionError> {
        let found = self.count(&cmp.to_ref())?;
        if found != expected {
            return Err(ReflectionError::ArrayNotResized {
                property: self.meta.name,
                expected,
                found,
            });
        }
        Ok(())
    }

    /// Visit every child property in registration order.
    pub fn visit_children(&self, visitor: &mut dyn PropertyVisitor) {
        for child in &self.children {
            child.visit(visitor);
        }
    }
}

impl PropertyBase for ArrayProperty {
    fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut PropertyMeta {
        &mut self.meta
    }

    fn kind(&self) -> PropertyKind {
        PropertyKind::Array
    }

    fn visit(&self, visitor: &mut dyn PropertyVisitor) {
        visitor.visit_array(self);
    }

    fn is_readonly(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_array(&self) -> Option<&ArrayProperty> {
        Some(self)
    }
}

impl std::fmt::Debug for ArrayProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayProperty")
            .field("name", &self.meta.name)
            .field("children", &self.children)
            .finish()
    }
}

pub type BlobGetter = Box<
    dyn Fn(&dyn Any, Entity, Option<u32>, &mut OutputStream) -> Result<(), ReflectionError>
        + Send
        + Sync,
>;
pub type BlobSetter = Box<
    dyn Fn(&mut dyn Any, Entity, Option<u32>, &mut InputStream<'_>) -> Result<(), ReflectionError>
        + Send
        + Sync,
>;

/// A property whose value is an opaque serialised byte stream.
pub struct BlobProperty {
    meta: PropertyMeta,
    getter: BlobGetter,
    setter: BlobSetter,
}

impl BlobProperty {
    #[must_use]
    pub fn new(name: &'static str, getter: BlobGetter, setter: BlobSetter) -> Self {
        Self {
            meta: PropertyMeta::new(name),
            getter,
            setter,
        }
    }

    /// Append the serialised value of `cmp` to `stream`.
    ///
    /// # Errors
    ///
    /// Propagates module type mismatches and encoding failures.
    pub fn get_value(
        &self,
        cmp: &ComponentRef<'_>,
        index: Option<u32>,
        stream: &mut OutputStream,
    ) -> Result<(), ReflectionError> {
        (self.getter)(cmp.module, cmp.entity, index, stream)
    }

    /// Replace the value of `cmp` with the next value read from `stream`.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::Stream`] on malformed or truncated input; the
    /// component keeps its previous value in that case.
    pub fn set_value(
        &self,
        cmp: &mut ComponentMut<'_>,
        index: Option<u32>,
        stream: &mut InputStream<'_>,
    ) -> Result<(), ReflectionError> {
        (self.setter)(&mut *cmp.module, cmp.entity, index, stream)
    }
}

impl PropertyBase for BlobProperty {
    fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut PropertyMeta {
        &mut self.meta
    }

    fn kind(&self) -> PropertyKind {
        PropertyKind::Blob
    }

    fn visit(&self, visitor: &mut dyn PropertyVisitor) {
        visitor.visit_blob(self);
    }

    fn is_readonly(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_blob(&self) -> Option<&BlobProperty> {
        Some(self)
    }
}

impl std::fmt::Debug for BlobProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobProperty")
            .field("name", &self.meta.name)
            .finish()
    }
}
