//! Double-dispatch traversal of component properties.
//!
//! A consumer (inspector, serializer, scripting binder) implements
//! [`PropertyVisitor`] with one method per concrete property type and hands it
//! to [`ComponentDesc::visit`](crate::ComponentDesc::visit). Every method has
//! an empty default, so a visitor only overrides the types it cares about.
//! Arrays are not descended automatically; call
//! [`ArrayProperty::visit_children`] from `visit_array` to recurse.

use engine_component::Entity;
use engine_math::{IVec3, Vec2, Vec3, Vec4};

use crate::component::ComponentDesc;
use crate::property::{ArrayProperty, BlobProperty, Property, PropertyBase};
use crate::types::ResourcePath;

pub trait PropertyVisitor {
    fn visit_f32(&mut self, _prop: &Property<f32>) {}
    fn visit_i32(&mut self, _prop: &Property<i32>) {}
    fn visit_u32(&mut self, _prop: &Property<u32>) {}
    fn visit_entity(&mut self, _prop: &Property<Entity>) {}
    fn visit_vec2(&mut self, _prop: &Property<Vec2>) {}
    fn visit_vec3(&mut self, _prop: &Property<Vec3>) {}
    fn visit_vec4(&mut self, _prop: &Property<Vec4>) {}
    fn visit_ivec3(&mut self, _prop: &Property<IVec3>) {}
    fn visit_path(&mut self, _prop: &Property<ResourcePath>) {}
    fn visit_bool(&mut self, _prop: &Property<bool>) {}
    fn visit_string(&mut self, _prop: &Property<String>) {}
    fn visit_array(&mut self, _prop: &ArrayProperty) {}
    fn visit_blob(&mut self, _prop: &BlobProperty) {}
}

/// Adapts a closure to [`PropertyVisitor`], descending into arrays and
/// reporting the enclosing array of every property.
struct ParentTracking<'a, F> {
    f: &'a mut F,
    parent: Option<&'a ArrayProperty>,
}

impl<F> ParentTracking<'_, F>
where
    F: FnMut(&dyn PropertyBase, Option<&ArrayProperty>),
{
    fn emit(&mut self, prop: &dyn PropertyBase) {
        (self.f)(prop, self.parent);
    }
}

impl<F> PropertyVisitor for ParentTracking<'_, F>
where
    F: FnMut(&dyn PropertyBase, Option<&ArrayProperty>),
{
    fn visit_f32(&mut self, prop: &Property<f32>) {
        self.emit(prop);
    }
    fn visit_i32(&mut self, prop: &Property<i32>) {
        self.emit(prop);
    }
    fn visit_u32(&mut self, prop: &Property<u32>) {
        self.emit(prop);
    }
    fn visit_entity(&mut self, prop: &Property<Entity>) {
        self.emit(prop);
    }
    fn visit_vec2(&mut self, prop: &Property<Vec2>) {
        self.emit(prop);
    }
    fn visit_vec3(&mut self, prop: &Property<Vec3>) {
        self.emit(prop);
    }
    fn visit_vec4(&mut self, prop: &Property<Vec4>) {
        self.emit(prop);
    }
    fn visit_ivec3(&mut self, prop: &Property<IVec3>) {
        self.emit(prop);
    }
    fn visit_path(&mut self, prop: &Property<ResourcePath>) {
        self.emit(prop);
    }
    fn visit_bool(&mut self, prop: &Property<bool>) {
        self.emit(prop);
    }
    fn visit_string(&mut self, prop: &Property<String>) {
        self.emit(prop);
    }
    fn visit_blob(&mut self, prop: &BlobProperty) {
        self.emit(prop);
    }

    fn visit_array(&mut self, prop: &ArrayProperty) {
        self.emit(prop);
        let mut nested = ParentTracking {
            f: &mut *self.f,
            parent: Some(prop),
        };
        prop.visit_children(&mut nested);
    }
}

/// Call `f` for every property of `component`, depth first in registration
/// order. Array children are reported with their array as the second
/// argument; top-level properties get `None`.
pub fn for_each_property<F>(component: &ComponentDesc, mut f: F)
where
    F: FnMut(&dyn PropertyBase, Option<&ArrayProperty>),
{
    let mut visitor = ParentTracking {
        f: &mut f,
        parent: None,
    };
    component.visit(&mut visitor);
}
