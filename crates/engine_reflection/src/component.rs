//! Component descriptors.

use std::any::Any;
use std::sync::Arc;

use engine_component::{ComponentTypeId, Entity};

use crate::error::ReflectionError;
use crate::function::FunctionBase;
use crate::property::PropertyBase;
use crate::visitor::PropertyVisitor;

/// Adds or removes the component for an entity inside its module object.
pub type Lifecycle = Box<dyn Fn(&mut dyn Any, Entity) -> Result<(), ReflectionError> + Send + Sync>;

/// A reflected component type: its identity, lifecycle callbacks and ordered
/// properties and functions.
pub struct ComponentDesc {
    pub(crate) name: &'static str,
    pub(crate) label: &'static str,
    pub(crate) icon: Option<&'static str>,
    pub(crate) component_type: ComponentTypeId,
    pub(crate) creator: Lifecycle,
    pub(crate) destroyer: Lifecycle,
    pub(crate) props: Vec<Box<dyn PropertyBase>>,
    pub(crate) functions: Vec<Arc<dyn FunctionBase>>,
}

impl ComponentDesc {
    pub(crate) fn new(
        name: &'static str,
        label: &'static str,
        creator: Lifecycle,
        destroyer: Lifecycle,
    ) -> Self {
        Self {
            name,
            label,
            icon: None,
            component_type: ComponentTypeId::from_name(name),
            creator,
            destroyer,
            props: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// The string id, e.g. `"point_light"`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable name shown by tooling.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn icon(&self) -> Option<&'static str> {
        self.icon
    }

    #[must_use]
    pub fn component_type(&self) -> ComponentTypeId {
        self.component_type
    }

    /// Top-level properties in registration order.
    #[must_use]
    pub fn properties(&self) -> &[Box<dyn PropertyBase>] {
        &self.props
    }

    #[must_use]
    pub fn functions(&self) -> &[Arc<dyn FunctionBase>] {
        &self.functions
    }

    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Arc<dyn FunctionBase>> {
        self.functions.iter().find(|f| f.name() == name)
    }

    /// Find a property by name. Top-level properties are searched first, then
    /// the children of each array.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&dyn PropertyBase> {
        if let Some(prop) = self.props.iter().find(|p| p.name() == name) {
            return Some(&**prop);
        }
        self.props
            .iter()
            .filter_map(|p| p.as_array())
            .find_map(|array| array.child(name))
    }

    /// Dispatch every top-level property into `visitor`.
    pub fn visit(&self, visitor: &mut dyn PropertyVisitor) {
        for prop in &self.props {
            prop.visit(visitor);
        }
    }

    /// Add this component to `entity` inside `module`.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::ObjectTypeMismatch`] for a foreign module.
    pub fn create(&self, module: &mut dyn Any, entity: Entity) -> Result<(), ReflectionError> {
        (self.creator)(module, entity)
    }

    /// Remove this component from `entity` inside `module`.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::ObjectTypeMismatch`] for a foreign module.
    pub fn destroy(&self, module: &mut dyn Any, entity: Entity) -> Result<(), ReflectionError> {
        (self.destroyer)(module, entity)
    }
}

impl std::fmt::Debug for ComponentDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentDesc")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("component_type", &self.component_type)
            .field("props", &self.props)
            .field("functions", &self.functions)
            .finish()
    }
}
