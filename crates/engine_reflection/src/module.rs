//! Module descriptors: the unit of registration.

use std::sync::Arc;

use crate::component::ComponentDesc;
use crate::event::EventBase;
use crate::function::FunctionBase;
use crate::structs::StructType;

/// A named group of components, free functions, events and struct types.
///
/// Built with [`ModuleBuilder`](crate::ModuleBuilder) and handed to
/// [`Registry::register_module`](crate::Registry::register_module).
#[derive(Debug)]
pub struct ModuleDesc {
    pub(crate) name: &'static str,
    pub(crate) functions: Vec<Arc<dyn FunctionBase>>,
    pub(crate) events: Vec<Box<dyn EventBase>>,
    pub(crate) components: Vec<ComponentDesc>,
    pub(crate) structs: Vec<StructType>,
}

impl ModuleDesc {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            functions: Vec::new(),
            events: Vec::new(),
            components: Vec::new(),
            structs: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn functions(&self) -> &[Arc<dyn FunctionBase>] {
        &self.functions
    }

    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Arc<dyn FunctionBase>> {
        self.functions.iter().find(|f| f.name() == name)
    }

    #[must_use]
    pub fn events(&self) -> &[Box<dyn EventBase>] {
        &self.events
    }

    #[must_use]
    pub fn event(&self, name: &str) -> Option<&dyn EventBase> {
        self.events.iter().find(|e| e.name() == name).map(|e| &**e)
    }

    #[must_use]
    pub fn components(&self) -> &[ComponentDesc] {
        &self.components
    }

    #[must_use]
    pub fn structs(&self) -> &[StructType] {
        &self.structs
    }

    #[must_use]
    pub fn structure(&self, name: &str) -> Option<&StructType> {
        self.structs.iter().find(|s| s.name() == name)
    }
}
