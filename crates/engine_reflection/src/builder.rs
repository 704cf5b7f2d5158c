//! Fluent registration of a module's components.
//!
//! ```ignore
//! let module = ModuleBuilder::new("physics")
//!     .cmp("rigid_body", "Rigid body", Physics::create_body, Physics::destroy_body)
//!         .icon("cube")
//!         .prop("mass", |p: &Physics, e| p.mass(e), |p: &mut Physics, e, v| p.set_mass(e, v))
//!             .min_attribute(0.0)
//!         .begin_array("contacts", Physics::contact_count, Physics::add_contact, Physics::remove_contact)
//!             .item_prop("point", |p: &Physics, e, i| p.contact(e, i), |p: &mut Physics, e, i, v| p.set_contact(e, i, v))
//!         .end_array()
//!     .finish()?;
//! ```
//!
//! Registration is ordered: attributes attach to the most recently declared
//! property, properties to the most recently declared component, and
//! functions declared before the first component belong to the module itself.
//! Misuse is recorded and reported once by [`ModuleBuilder::finish`].

use std::collections::HashSet;
use std::sync::Arc;

use engine_component::Entity;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::attribute::{Attribute, EnumSource, ResourceType};
use crate::component::{ComponentDesc, Lifecycle};
use crate::error::ReflectionError;
use crate::event::{DelegateList, Event};
use crate::function::{ArgList, Callable, NativeFunction};
use crate::module::ModuleDesc;
use crate::property::{
    ArrayProperty, BlobProperty, Getter, Property, PropertyBase, PropertyValue, Setter,
    downcast_module, downcast_module_mut,
};
use crate::structs::StructDesc;

/// Where the most recently declared property lives.
#[derive(Debug, Clone, Copy)]
enum LastProperty {
    Component(usize),
    OpenArray,
    ArrayItem(usize),
}

/// Builds a [`ModuleDesc`].
pub struct ModuleBuilder {
    module: ModuleDesc,
    array: Option<ArrayProperty>,
    last: Option<LastProperty>,
    error: Option<ReflectionError>,
}

impl ModuleBuilder {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            module: ModuleDesc::new(name),
            array: None,
            last: None,
            error: None,
        }
    }

    fn fail(&mut self, reason: &'static str) {
        if self.error.is_none() {
            debug!(module = self.module.name, reason, "registration error recorded");
            self.error = Some(ReflectionError::Builder {
                module: self.module.name,
                reason,
            });
        }
    }

    /// Start a new component. Following properties and functions belong to
    /// it.
    #[must_use]
    pub fn cmp<M: 'static>(
        mut self,
        name: &'static str,
        label: &'static str,
        create: impl Fn(&mut M, Entity) + Send + Sync + 'static,
        destroy: impl Fn(&mut M, Entity) + Send + Sync + 'static,
    ) -> Self {
        if self.array.is_some() {
            self.fail("component declared inside an open array");
            return self;
        }
        let creator: Lifecycle = Box::new(move |module, entity| {
            create(downcast_module_mut::<M>(module)?, entity);
            Ok(())
        });
        let destroyer: Lifecycle = Box::new(move |module, entity| {
            destroy(downcast_module_mut::<M>(module)?, entity);
            Ok(())
        });
        self.module
            .components
            .push(ComponentDesc::new(name, label, creator, destroyer));
        self.last = None;
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: &'static str) -> Self {
        match self.module.components.last_mut() {
            Some(cmp) => cmp.icon = Some(icon),
            None => self.fail("icon declared before any component"),
        }
        self
    }

    fn push_top_level(&mut self, mut prop: Box<dyn PropertyBase>) {
        if self.array.is_some() {
            self.fail("top-level property declared inside an open array");
            return;
        }
        let Some(cmp) = self.module.components.last_mut() else {
            self.fail("property declared before any component");
            return;
        };
        prop.meta_mut().component = cmp.component_type;
        cmp.props.push(prop);
        self.last = Some(LastProperty::Component(cmp.props.len() - 1));
    }

    fn push_item(&mut self, mut prop: Box<dyn PropertyBase>) {
        let Some(cmp) = self.module.components.last() else {
            self.fail("property declared before any component");
            return;
        };
        let component = cmp.component_type;
        let Some(array) = self.array.as_mut() else {
            self.fail("array item declared outside an array");
            return;
        };
        prop.meta_mut().component = component;
        array.push_child(prop);
        self.last = Some(LastProperty::ArrayItem(array.children().len() - 1));
    }

    /// A read-write value property.
    #[must_use]
    pub fn prop<M, T>(
        mut self,
        name: &'static str,
        get: impl Fn(&M, Entity) -> T + Send + Sync + 'static,
        set: impl Fn(&mut M, Entity, T) + Send + Sync + 'static,
    ) -> Self
    where
        M: 'static,
        T: PropertyValue,
    {
        let getter = value_getter(get);
        let setter: Setter<T> = Box::new(move |module, entity, _, value| {
            set(downcast_module_mut::<M>(module)?, entity, value);
            Ok(())
        });
        self.push_top_level(Box::new(Property::new(name, getter, Some(setter))));
        self
    }

    /// A value property without a setter.
    #[must_use]
    pub fn readonly_prop<M, T>(
        mut self,
        name: &'static str,
        get: impl Fn(&M, Entity) -> T + Send + Sync + 'static,
    ) -> Self
    where
        M: 'static,
        T: PropertyValue,
    {
        self.push_top_level(Box::new(Property::new(name, value_getter(get), None)));
        self
    }

    /// An `i32` property backed by a Rust enum, with an [`Attribute::Enum`]
    /// listing the option names.
    #[must_use]
    pub fn enum_prop<M, E>(
        mut self,
        name: &'static str,
        get: impl Fn(&M, Entity) -> E + Send + Sync + 'static,
        set: impl Fn(&mut M, Entity, E) + Send + Sync + 'static,
        source: impl EnumSource + 'static,
    ) -> Self
    where
        M: 'static,
        E: Into<i32> + TryFrom<i32> + 'static,
    {
        let getter: Getter<i32> = Box::new(move |module, entity, _| {
            Ok(get(downcast_module::<M>(module)?, entity).into())
        });
        let setter: Setter<i32> = Box::new(move |module, entity, _, value| {
            let value = E::try_from(value)
                .map_err(|_| ReflectionError::InvalidEnumValue { property: name, value })?;
            set(downcast_module_mut::<M>(module)?, entity, value);
            Ok(())
        });
        self.push_top_level(Box::new(Property::new(name, getter, Some(setter))));
        self.attribute(Attribute::Enum(Arc::new(source)))
    }

    /// A property serialised as an opaque MessagePack blob.
    ///
    /// The setter decodes the whole value before touching the module, so a
    /// malformed stream leaves the component unchanged.
    #[must_use]
    pub fn blob_prop<M, V>(
        mut self,
        name: &'static str,
        get: impl Fn(&M, Entity) -> V + Send + Sync + 'static,
        set: impl Fn(&mut M, Entity, V) + Send + Sync + 'static,
    ) -> Self
    where
        M: 'static,
        V: Serialize + DeserializeOwned + 'static,
    {
        let prop = BlobProperty::new(
            name,
            Box::new(move |module, entity, _, stream| {
                let value = get(downcast_module::<M>(module)?, entity);
                stream.write(&value)?;
                Ok(())
            }),
            Box::new(move |module, entity, _, stream| {
                let module = downcast_module_mut::<M>(module)?;
                let value = stream.read::<V>()?;
                set(module, entity, value);
                Ok(())
            }),
        );
        self.push_top_level(Box::new(prop));
        self
    }

    /// Open an array property. Declare its item properties with
    /// [`item_prop`](Self::item_prop) and close it with
    /// [`end_array`](Self::end_array).
    #[must_use]
    pub fn begin_array<M: 'static>(
        mut self,
        name: &'static str,
        count: impl Fn(&M, Entity) -> u32 + Send + Sync + 'static,
        add: impl Fn(&mut M, Entity, u32) + Send + Sync + 'static,
        remove: impl Fn(&mut M, Entity, u32) + Send + Sync + 'static,
    ) -> Self {
        if self.array.is_some() {
            self.fail("nested arrays are not supported");
            return self;
        }
        let Some(cmp) = self.module.components.last() else {
            self.fail("array declared before any component");
            return self;
        };
        let mut array = ArrayProperty::new(
            name,
            Box::new(move |module, entity| Ok(count(downcast_module::<M>(module)?, entity))),
            Box::new(move |module, entity, index| {
                add(downcast_module_mut::<M>(module)?, entity, index);
                Ok(())
            }),
            Box::new(move |module, entity, index| {
                remove(downcast_module_mut::<M>(module)?, entity, index);
                Ok(())
            }),
        );
        array.meta_mut().component = cmp.component_type;
        self.array = Some(array);
        self.last = Some(LastProperty::OpenArray);
        self
    }

    /// A read-write property of each item of the open array.
    #[must_use]
    pub fn item_prop<M, T>(
        mut self,
        name: &'static str,
        get: impl Fn(&M, Entity, u32) -> T + Send + Sync + 'static,
        set: impl Fn(&mut M, Entity, u32, T) + Send + Sync + 'static,
    ) -> Self
    where
        M: 'static,
        T: PropertyValue,
    {
        let getter = item_getter(name, get);
        let setter: Setter<T> = Box::new(move |module, entity, index, value| {
            let index = index.ok_or(ReflectionError::MissingIndex(name))?;
            set(downcast_module_mut::<M>(module)?, entity, index, value);
            Ok(())
        });
        self.push_item(Box::new(Property::new(name, getter, Some(setter))));
        self
    }

    #[must_use]
    pub fn readonly_item_prop<M, T>(
        mut self,
        name: &'static str,
        get: impl Fn(&M, Entity, u32) -> T + Send + Sync + 'static,
    ) -> Self
    where
        M: 'static,
        T: PropertyValue,
    {
        self.push_item(Box::new(Property::new(name, item_getter(name, get), None)));
        self
    }

    /// Close the open array and add it to the current component.
    #[must_use]
    pub fn end_array(mut self) -> Self {
        match self.array.take() {
            Some(array) => self.push_top_level(Box::new(array)),
            None => self.fail("end_array without begin_array"),
        }
        self
    }

    /// Attach `attribute` to the most recently declared property.
    #[must_use]
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        let target = match self.last {
            Some(LastProperty::Component(index)) => self
                .module
                .components
                .last_mut()
                .and_then(|cmp| cmp.props.get_mut(index))
                .map(|prop| prop.meta_mut()),
            Some(LastProperty::OpenArray) => self.array.as_mut().map(|array| array.meta_mut()),
            Some(LastProperty::ArrayItem(index)) => self
                .array
                .as_mut()
                .and_then(|array| array.children_mut().get_mut(index))
                .map(|prop| prop.meta_mut()),
            None => None,
        };
        match target {
            Some(meta) => meta.attributes.push(attribute),
            None => self.fail("attribute declared without a property"),
        }
        self
    }

    #[must_use]
    pub fn min_attribute(self, min: f32) -> Self {
        self.attribute(Attribute::Min(min))
    }

    #[must_use]
    pub fn clamp_attribute(self, min: f32, max: f32) -> Self {
        self.attribute(Attribute::Clamp { min, max })
    }

    #[must_use]
    pub fn radians_attribute(self) -> Self {
        self.attribute(Attribute::Radians)
    }

    #[must_use]
    pub fn color_attribute(self) -> Self {
        self.attribute(Attribute::Color)
    }

    #[must_use]
    pub fn resource_attribute(self, resource: ResourceType) -> Self {
        self.attribute(Attribute::Resource(resource))
    }

    #[must_use]
    pub fn no_ui_attribute(self) -> Self {
        self.attribute(Attribute::NoUi)
    }

    #[must_use]
    pub fn multiline_attribute(self) -> Self {
        self.attribute(Attribute::Multiline)
    }

    #[must_use]
    pub fn string_enum_attribute(self, source: impl EnumSource + 'static) -> Self {
        self.attribute(Attribute::StringEnum(Arc::new(source)))
    }

    /// Register a function. Before the first component it is a module
    /// function, afterwards it belongs to the current component.
    #[must_use]
    pub fn function<M, Args, F>(mut self, name: &'static str, f: F) -> Self
    where
        M: 'static,
        Args: ArgList,
        F: Callable<M, Args>,
    {
        if self.array.is_some() {
            self.fail("function declared inside an open array");
            return self;
        }
        let function = Arc::new(NativeFunction::new(name, f));
        match self.module.components.last_mut() {
            Some(cmp) => cmp.functions.push(function),
            None => self.module.functions.push(function),
        }
        self
    }

    /// Register a module event raised through the delegate list returned by
    /// `accessor`.
    #[must_use]
    pub fn event<M, Args>(
        mut self,
        name: &'static str,
        accessor: fn(&mut M) -> &mut DelegateList<Args>,
    ) -> Self
    where
        M: 'static,
        Args: ArgList + Clone,
    {
        self.module.events.push(Box::new(Event::new(name, accessor)));
        self
    }

    /// Register a reflected struct type.
    #[must_use]
    pub fn structure<C: 'static>(mut self, desc: StructDesc<C>) -> Self {
        self.module.structs.push(desc.into());
        self
    }

    /// Validate and return the module.
    ///
    /// # Errors
    ///
    /// Returns the first recorded [`ReflectionError::Builder`] error, a
    /// builder error for an unterminated array, or
    /// [`ReflectionError::DuplicateProperty`] if a component declares a
    /// property name twice (array items included).
    pub fn finish(mut self) -> Result<ModuleDesc, ReflectionError> {
        if self.array.is_some() {
            self.fail("array not terminated with end_array");
        }
        if let Some(err) = self.error {
            return Err(err);
        }
        for cmp in &self.module.components {
            // Property hashes join component and property names with '.'.
            if cmp.name.contains('.') {
                return Err(ReflectionError::Builder {
                    module: self.module.name,
                    reason: "component names may not contain '.'",
                });
            }
            let mut seen = HashSet::new();
            let names = cmp.props.iter().flat_map(|prop| {
                let children = prop.as_array().map(ArrayProperty::children).unwrap_or_default();
                std::iter::once(prop.name()).chain(children.iter().map(|c| c.name()))
            });
            for name in names {
                if name.contains('.') {
                    return Err(ReflectionError::Builder {
                        module: self.module.name,
                        reason: "property names may not contain '.'",
                    });
                }
                if !seen.insert(name) {
                    return Err(ReflectionError::DuplicateProperty {
                        component: cmp.name,
                        property: name,
                    });
                }
            }
        }
        Ok(self.module)
    }
}

impl std::fmt::Debug for ModuleBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleBuilder")
            .field("module", &self.module.name)
            .field("components", &self.module.components.len())
            .field("array_open", &self.array.is_some())
            .field("error", &self.error)
            .finish()
    }
}

fn value_getter<M, T>(get: impl Fn(&M, Entity) -> T + Send + Sync + 'static) -> Getter<T>
where
    M: 'static,
    T: PropertyValue,
{
    Box::new(move |module, entity, _| Ok(get(downcast_module::<M>(module)?, entity)))
}

fn item_getter<M, T>(
    name: &'static str,
    get: impl Fn(&M, Entity, u32) -> T + Send + Sync + 'static,
) -> Getter<T>
where
    M: 'static,
    T: PropertyValue,
{
    Box::new(move |module, entity, index| {
        let index = index.ok_or(ReflectionError::MissingIndex(name))?;
        Ok(get(downcast_module::<M>(module)?, entity, index))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use engine_math::Vec3;

    use super::*;
    use crate::attribute::{AttributeKind, StaticEnum};
    use crate::property::{ComponentMut, ComponentRef};
    use crate::stream::{InputStream, OutputStream};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Shape {
        Box,
        Sphere,
    }

    impl From<Shape> for i32 {
        fn from(shape: Shape) -> i32 {
            shape as i32
        }
    }

    impl TryFrom<i32> for Shape {
        type Error = ();

        fn try_from(value: i32) -> Result<Self, ()> {
            match value {
                0 => Ok(Shape::Box),
                1 => Ok(Shape::Sphere),
                _ => Err(()),
            }
        }
    }

    #[derive(Default)]
    struct Physics {
        mass: HashMap<Entity, f32>,
        shape: HashMap<Entity, Shape>,
        contacts: HashMap<Entity, Vec<Vec3>>,
        tags: HashMap<Entity, Vec<String>>,
        gravity: f32,
    }

    fn physics_module() -> Result<ModuleDesc, ReflectionError> {
        ModuleBuilder::new("physics")
            .function("set_gravity", |p: &mut Physics, g: f32| p.gravity = g)
            .cmp(
                "rigid_body",
                "Rigid body",
                |p: &mut Physics, e| {
                    p.mass.insert(e, 1.0);
                },
                |p: &mut Physics, e| {
                    p.mass.remove(&e);
                },
            )
            .icon("cube")
            .prop(
                "mass",
                |p: &Physics, e| p.mass.get(&e).copied().unwrap_or_default(),
                |p: &mut Physics, e, v| {
                    p.mass.insert(e, v);
                },
            )
            .min_attribute(0.0)
            .enum_prop(
                "shape",
                |p: &Physics, e| p.shape.get(&e).copied().unwrap_or(Shape::Box),
                |p: &mut Physics, e, v| {
                    p.shape.insert(e, v);
                },
                StaticEnum(&["box", "sphere"]),
            )
            .begin_array(
                "contacts",
                |p: &Physics, e| p.contacts.get(&e).map_or(0, |c| c.len() as u32),
                |p: &mut Physics, e, i| p.contacts.entry(e).or_default().insert(i as usize, Vec3::ZERO),
                |p: &mut Physics, e, i| {
                    p.contacts.entry(e).or_default().remove(i as usize);
                },
            )
            .no_ui_attribute()
            .item_prop(
                "point",
                |p: &Physics, e, i| p.contacts[&e][i as usize],
                |p: &mut Physics, e, i, v| {
                    if let Some(c) = p.contacts.get_mut(&e) {
                        c[i as usize] = v;
                    }
                },
            )
            .radians_attribute()
            .end_array()
            .blob_prop(
                "tags",
                |p: &Physics, e| p.tags.get(&e).cloned().unwrap_or_default(),
                |p: &mut Physics, e, v: Vec<String>| {
                    p.tags.insert(e, v);
                },
            )
            .function("mass_of", |p: &mut Physics, e: Entity| {
                p.mass.get(&e).copied().unwrap_or_default()
            })
            .finish()
    }

    #[test]
    fn test_module_structure() {
        let module = physics_module().unwrap();
        assert_eq!(module.name(), "physics");
        assert_eq!(module.functions().len(), 1);
        assert_eq!(module.functions()[0].name(), "set_gravity");

        let cmp = &module.components()[0];
        assert_eq!(cmp.name(), "rigid_body");
        assert_eq!(cmp.icon(), Some("cube"));
        let names: Vec<&str> = cmp.properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["mass", "shape", "contacts", "tags"]);
        assert!(cmp.function("mass_of").is_some());
        for prop in cmp.properties() {
            assert_eq!(prop.component(), cmp.component_type());
        }
    }

    #[test]
    fn test_attributes_attach_to_latest_property() {
        let module = physics_module().unwrap();
        let cmp = &module.components()[0];
        assert!(cmp.property("mass").unwrap().attribute(AttributeKind::Min).is_some());
        assert!(cmp.property("shape").unwrap().attribute(AttributeKind::Enum).is_some());
        assert!(cmp.property("contacts").unwrap().attribute(AttributeKind::NoUi).is_some());
        let point = cmp.property("point").unwrap();
        assert!(point.attribute(AttributeKind::Radians).is_some());
        assert!(point.attribute(AttributeKind::NoUi).is_none());
        assert_eq!(point.component(), cmp.component_type());
    }

    #[test]
    fn test_item_property_needs_index() {
        let module = physics_module().unwrap();
        let cmp = &module.components()[0];
        let mut physics = Physics::default();
        let e = Entity(1);
        let contacts = cmp.property("contacts").unwrap().as_array().unwrap();
        contacts.add_item(&mut ComponentMut::new(&mut physics, e), None).unwrap();

        let point = cmp.property("point").unwrap().downcast_ref::<Vec3>().unwrap();
        point
            .set(&mut ComponentMut::new(&mut physics, e), Some(0), Vec3::X)
            .unwrap();
        assert_eq!(point.get(&ComponentRef::new(&physics, e), Some(0)).unwrap(), Vec3::X);
        assert!(matches!(
            point.get(&ComponentRef::new(&physics, e), None),
            Err(ReflectionError::MissingIndex("point"))
        ));
    }

    #[test]
    fn test_enum_property_rejects_unknown_values() {
        let module = physics_module().unwrap();
        let shape = module.components()[0].property("shape").unwrap().downcast_ref::<i32>().unwrap();
        let mut physics = Physics::default();
        let mut cmp = ComponentMut::new(&mut physics, Entity(1));
        shape.set(&mut cmp, None, 1).unwrap();
        assert_eq!(shape.get(&cmp.to_ref(), None).unwrap(), 1);
        assert!(matches!(
            shape.set(&mut cmp, None, 9),
            Err(ReflectionError::InvalidEnumValue { property: "shape", value: 9 })
        ));
        assert_eq!(physics.shape[&Entity(1)], Shape::Sphere);
    }

    #[test]
    fn test_blob_property_keeps_value_on_malformed_stream() {
        let module = physics_module().unwrap();
        let tags = module.components()[0].property("tags").unwrap().as_blob().unwrap();
        let mut physics = Physics::default();
        let e = Entity(4);
        physics.tags.insert(e, vec!["static".into()]);

        let mut out = OutputStream::new();
        tags.get_value(&ComponentRef::new(&physics, e), None, &mut out).unwrap();
        let mut input = InputStream::new(out.as_bytes());
        tags.set_value(&mut ComponentMut::new(&mut physics, Entity(5)), None, &mut input)
            .unwrap();
        assert_eq!(physics.tags[&Entity(5)], vec!["static".to_string()]);

        let mut garbage = InputStream::new(&[0xc1]);
        let err = tags
            .set_value(&mut ComponentMut::new(&mut physics, e), None, &mut garbage)
            .unwrap_err();
        assert!(matches!(err, ReflectionError::Stream(_)));
        assert_eq!(physics.tags[&e], vec!["static".to_string()]);
    }

    #[test]
    fn test_create_and_destroy() {
        let module = physics_module().unwrap();
        let cmp = &module.components()[0];
        let mut physics = Physics::default();
        cmp.create(&mut physics, Entity(9)).unwrap();
        assert_eq!(physics.mass.get(&Entity(9)), Some(&1.0));
        cmp.destroy(&mut physics, Entity(9)).unwrap();
        assert!(physics.mass.is_empty());
    }

    fn noop(_: &mut Physics, _: Entity) {}

    #[test]
    fn test_misuse_is_reported_by_finish() {
        let err = ModuleBuilder::new("m")
            .prop("x", |_: &Physics, _| 0.0f32, |_: &mut Physics, _, _: f32| {})
            .finish()
            .unwrap_err();
        assert!(matches!(err, ReflectionError::Builder { reason, .. } if reason.contains("before any component")));

        let err = ModuleBuilder::new("m")
            .cmp("c", "C", noop, noop)
            .min_attribute(1.0)
            .finish()
            .unwrap_err();
        assert!(matches!(err, ReflectionError::Builder { .. }));

        let err = ModuleBuilder::new("m")
            .cmp("c", "C", noop, noop)
            .item_prop("i", |_: &Physics, _, _| 0u32, |_: &mut Physics, _, _, _: u32| {})
            .finish()
            .unwrap_err();
        assert!(matches!(err, ReflectionError::Builder { reason, .. } if reason.contains("outside an array")));

        let err = ModuleBuilder::new("m")
            .cmp("c", "C", noop, noop)
            .begin_array("a", |_: &Physics, _| 0, |_: &mut Physics, _, _| {}, |_: &mut Physics, _, _| {})
            .finish()
            .unwrap_err();
        assert!(matches!(err, ReflectionError::Builder { reason, .. } if reason.contains("not terminated")));
    }

    #[test]
    fn test_duplicate_property_names_rejected() {
        let err = ModuleBuilder::new("m")
            .cmp("c", "C", noop, noop)
            .readonly_prop("x", |_: &Physics, _| 0i32)
            .begin_array("a", |_: &Physics, _| 0, |_: &mut Physics, _, _| {}, |_: &mut Physics, _, _| {})
            .readonly_item_prop("x", |_: &Physics, _, _| 0i32)
            .end_array()
            .finish()
            .unwrap_err();
        assert!(matches!(
            err,
            ReflectionError::DuplicateProperty { component: "c", property: "x" }
        ));
    }

    #[test]
    fn test_dotted_names_rejected() {
        // ("a.b", "x") and ("a", "b.x") would share a property hash.
        assert_eq!(
            engine_component::StableHash::from_parts(&["a.b", "x"]),
            engine_component::StableHash::from_parts(&["a", "b.x"])
        );

        let err = ModuleBuilder::new("m")
            .cmp("a.b", "AB", noop, noop)
            .readonly_prop("x", |_: &Physics, _| 0i32)
            .finish()
            .unwrap_err();
        assert!(matches!(err, ReflectionError::Builder { reason, .. } if reason.contains("component names")));

        let err = ModuleBuilder::new("m")
            .cmp("a", "A", noop, noop)
            .readonly_prop("b.x", |_: &Physics, _| 0i32)
            .finish()
            .unwrap_err();
        assert!(matches!(err, ReflectionError::Builder { reason, .. } if reason.contains("property names")));

        let err = ModuleBuilder::new("m")
            .cmp("a", "A", noop, noop)
            .begin_array("items", |_: &Physics, _| 0, |_: &mut Physics, _, _| {}, |_: &mut Physics, _, _| {})
            .readonly_item_prop("b.x", |_: &Physics, _, _| 0i32)
            .end_array()
            .finish()
            .unwrap_err();
        assert!(matches!(err, ReflectionError::Builder { .. }));
    }
}
