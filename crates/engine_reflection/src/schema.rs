//! Serializable snapshot of a registry, for tooling that lives outside the
//! process (editors, script binding generators).

use engine_component::{ComponentTypeId, RuntimeHash, StableHash};
use serde::Serialize;

use crate::attribute::AttributeKind;
use crate::component::ComponentDesc;
use crate::event::EventBase;
use crate::function::FunctionBase;
use crate::module::ModuleDesc;
use crate::property::{PropertyBase, PropertyKind};
use crate::structs::StructType;
use crate::types::TypeDescriptor;

#[derive(Debug, Clone, Serialize)]
pub struct RegistrySchema {
    pub modules: Vec<ModuleSchema>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleSchema {
    pub name: &'static str,
    pub functions: Vec<FunctionSchema>,
    pub events: Vec<EventSchema>,
    pub components: Vec<ComponentSchema>,
    pub structs: Vec<StructSchema>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentSchema {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    pub component_type: ComponentTypeId,
    pub runtime_hash: RuntimeHash,
    pub properties: Vec<PropertySchema>,
    pub functions: Vec<FunctionSchema>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertySchema {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub readonly: bool,
    pub hash: StableHash,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PropertySchema>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionSchema {
    pub name: &'static str,
    pub args: Vec<TypeDescriptor>,
    pub returns: TypeDescriptor,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventSchema {
    pub name: &'static str,
    pub args: Vec<TypeDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructSchema {
    pub name: &'static str,
    pub size: usize,
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

impl ModuleSchema {
    pub(crate) fn of(module: &ModuleDesc) -> Self {
        Self {
            name: module.name(),
            functions: module.functions().iter().map(|f| FunctionSchema::of(&**f)).collect(),
            events: module.events().iter().map(|e| EventSchema::of(&**e)).collect(),
            components: module.components().iter().map(ComponentSchema::of).collect(),
            structs: module.structs().iter().map(StructSchema::of).collect(),
        }
    }
}

impl ComponentSchema {
    fn of(cmp: &ComponentDesc) -> Self {
        Self {
            name: cmp.name(),
            label: cmp.label(),
            icon: cmp.icon(),
            component_type: cmp.component_type(),
            runtime_hash: ComponentTypeId::runtime_hash(cmp.name()),
            properties: cmp
                .properties()
                .iter()
                .map(|p| PropertySchema::of(cmp.name(), &**p))
                .collect(),
            functions: cmp.functions().iter().map(|f| FunctionSchema::of(&**f)).collect(),
        }
    }
}

impl PropertySchema {
    fn of(component: &str, prop: &dyn PropertyBase) -> Self {
        let children = prop
            .as_array()
            .map(|array| {
                array
                    .children()
                    .iter()
                    .map(|c| PropertySchema::of(component, &**c))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            name: prop.name(),
            kind: prop.kind(),
            readonly: prop.is_readonly(),
            hash: StableHash::from_parts(&[component, prop.name()]),
            attributes: prop.attributes().iter().map(|a| a.kind()).collect(),
            children,
        }
    }
}

impl FunctionSchema {
    fn of(function: &dyn FunctionBase) -> Self {
        Self {
            name: function.name(),
            args: function.arg_types(),
            returns: function.return_type(),
        }
    }
}

impl EventSchema {
    fn of(event: &dyn EventBase) -> Self {
        Self {
            name: event.name(),
            args: event.arg_types(),
        }
    }
}

impl StructSchema {
    fn of(ty: &StructType) -> Self {
        Self {
            name: ty.name(),
            size: ty.size(),
            fields: ty
                .vars()
                .iter()
                .map(|v| FieldSchema {
                    name: v.name(),
                    ty: v.type_descriptor(),
                })
                .collect(),
        }
    }
}
