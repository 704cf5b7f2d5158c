//! The reflection registry.
//!
//! Modules are registered once at startup, in a documented order, into an
//! explicitly constructed [`Registry`]. After registration the registry is
//! only read: every lookup returns the same descriptor for the lifetime of
//! the registry, and it can be shared across threads.

use std::any::Any;
use std::collections::HashMap;

use engine_component::{ComponentTypeId, Entity, RuntimeHash, StableHash};
use tracing::{debug, info, warn};

use crate::component::ComponentDesc;
use crate::config::RegistryConfig;
use crate::error::ReflectionError;
use crate::event::EventBase;
use crate::function::{FunctionBase, ReturnCopy};
use crate::module::ModuleDesc;
use crate::property::{
    ArrayProperty, ComponentMut, ComponentRef, Property, PropertyBase, PropertyValue,
};
use crate::schema::{ModuleSchema, RegistrySchema};
use crate::structs::StructType;
use crate::variant::Variant;
use crate::visitor;

/// Position of a component inside `Registry::modules`.
#[derive(Debug, Clone, Copy)]
struct ComponentSlot {
    module: usize,
    component: usize,
}

/// Owns every registered module and the lookup indices over them.
#[derive(Default)]
pub struct Registry {
    config: RegistryConfig,
    modules: Vec<ModuleDesc>,
    module_names: HashMap<&'static str, usize>,
    components: HashMap<ComponentTypeId, ComponentSlot>,
    component_names: HashMap<&'static str, ComponentTypeId>,
    runtime_hashes: HashMap<RuntimeHash, ComponentTypeId>,
    property_hashes: HashMap<StableHash, (ComponentTypeId, &'static str)>,
}

impl Registry {
    /// Create an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Stable hash identifying `property` of `component` across runs.
    #[must_use]
    pub fn property_hash(component: &str, property: &str) -> StableHash {
        StableHash::from_parts(&[component, property])
    }

    /// Add a module and index its components and properties.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::DuplicateModule`] or
    /// [`ReflectionError::DuplicateComponent`] if a name is already taken;
    /// the registry is unchanged in that case.
    pub fn register_module(&mut self, module: ModuleDesc) -> Result<(), ReflectionError> {
        if self.module_names.contains_key(module.name) {
            return Err(ReflectionError::DuplicateModule(module.name));
        }
        let mut pending = Vec::with_capacity(module.components.len());
        for cmp in &module.components {
            if self.component_names.contains_key(cmp.name)
                || self.components.contains_key(&cmp.component_type)
                || pending.contains(&cmp.name)
            {
                return Err(ReflectionError::DuplicateComponent(cmp.name));
            }
            pending.push(cmp.name);
        }

        let module_index = self.modules.len();
        for (component_index, cmp) in module.components.iter().enumerate() {
            let ty = cmp.component_type;
            self.components.insert(
                ty,
                ComponentSlot {
                    module: module_index,
                    component: component_index,
                },
            );
            self.component_names.insert(cmp.name, ty);
            let runtime_hash = ComponentTypeId::runtime_hash(cmp.name);
            if let Some(previous) = self.runtime_hashes.insert(runtime_hash, ty) {
                warn!(component = cmp.name, %previous, "runtime hash collision, later component wins");
            }
            visitor::for_each_property(cmp, |prop, _| {
                let hash = Self::property_hash(cmp.name, prop.name());
                if let Some((_, previous)) = self.property_hashes.insert(hash, (ty, prop.name())) {
                    warn!(
                        component = cmp.name,
                        property = prop.name(),
                        previous,
                        "property hash collision, later property wins"
                    );
                }
            });
            debug!(
                module = module.name,
                component = cmp.name,
                component_type = %ty,
                properties = cmp.props.len(),
                "component registered"
            );
        }

        info!(
            module = module.name,
            components = module.components.len(),
            functions = module.functions.len(),
            events = module.events.len(),
            "module registered"
        );
        self.module_names.insert(module.name, module_index);
        self.modules.push(module);
        Ok(())
    }

    /// Modules in registration order.
    #[must_use]
    pub fn modules(&self) -> &[ModuleDesc] {
        &self.modules
    }

    #[must_use]
    pub fn module(&self, name: &str) -> Option<&ModuleDesc> {
        self.module_names.get(name).map(|&i| &self.modules[i])
    }

    #[must_use]
    pub fn component(&self, ty: ComponentTypeId) -> Option<&ComponentDesc> {
        self.components
            .get(&ty)
            .map(|slot| &self.modules[slot.module].components[slot.component])
    }

    #[must_use]
    pub fn component_by_name(&self, name: &str) -> Option<&ComponentDesc> {
        self.component_type(name).and_then(|ty| self.component(ty))
    }

    /// The module that registered `ty`.
    #[must_use]
    pub fn component_module(&self, ty: ComponentTypeId) -> Option<&ModuleDesc> {
        self.components.get(&ty).map(|slot| &self.modules[slot.module])
    }

    /// Every registered component, in registration order.
    pub fn components(&self) -> impl Iterator<Item = &ComponentDesc> {
        self.modules.iter().flat_map(|m| m.components.iter())
    }

    #[must_use]
    pub fn component_type_exists(&self, name: &str) -> bool {
        self.component_names.contains_key(name)
    }

    /// Resolve a registered component's type from its string id.
    #[must_use]
    pub fn component_type(&self, name: &str) -> Option<ComponentTypeId> {
        self.component_names.get(name).copied()
    }

    /// Resolve a registered component's type from the runtime hash of its
    /// string id.
    #[must_use]
    pub fn component_type_from_hash(&self, hash: RuntimeHash) -> Option<ComponentTypeId> {
        self.runtime_hashes.get(&hash).copied()
    }

    /// Find a property of `ty` by name, array items included.
    #[must_use]
    pub fn property(&self, ty: ComponentTypeId, name: &str) -> Option<&dyn PropertyBase> {
        self.component(ty)?.property(name)
    }

    #[must_use]
    pub fn property_from_hash(&self, hash: StableHash) -> Option<&dyn PropertyBase> {
        let &(ty, name) = self.property_hashes.get(&hash)?;
        self.property(ty, name)
    }

    /// Find a function. `owner` names a module (module functions) or a
    /// component (component functions); modules are searched first.
    #[must_use]
    pub fn function(&self, owner: &str, name: &str) -> Option<&dyn FunctionBase> {
        if let Some(f) = self.module(owner).and_then(|m| m.function(name)) {
            return Some(&**f);
        }
        self.component_by_name(owner)?.function(name).map(|f| &**f)
    }

    #[must_use]
    pub fn event(&self, module: &str, name: &str) -> Option<&dyn EventBase> {
        self.module(module)?.event(name)
    }

    /// Find a struct type by name in any module.
    #[must_use]
    pub fn structure(&self, name: &str) -> Option<&StructType> {
        self.modules.iter().find_map(|m| m.structure(name))
    }

    /// Call `f` for every property of `ty`, descending into arrays; see
    /// [`visitor::for_each_property`].
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::UnknownComponent`] if `ty` is not
    /// registered.
    pub fn for_each_property<F>(&self, ty: ComponentTypeId, f: F) -> Result<(), ReflectionError>
    where
        F: FnMut(&dyn PropertyBase, Option<&ArrayProperty>),
    {
        let cmp = self.component(ty).ok_or(ReflectionError::UnknownComponent(ty))?;
        visitor::for_each_property(cmp, f);
        Ok(())
    }

    fn typed_property<T: PropertyValue>(
        &self,
        ty: ComponentTypeId,
        name: &str,
    ) -> Result<&Property<T>, ReflectionError> {
        let cmp = self.component(ty).ok_or(ReflectionError::UnknownComponent(ty))?;
        let prop = cmp.property(name).ok_or_else(|| ReflectionError::UnknownProperty {
            component: cmp.name,
            property: name.to_owned(),
        })?;
        prop.downcast_ref::<T>().ok_or_else(|| {
            let found = prop.as_value().map_or(T::TAG, |v| v.tag());
            ReflectionError::ValueMismatch {
                expected: T::TAG,
                found,
            }
        })
    }

    /// Read a typed property value of `entity`'s component `ty` inside
    /// `module`.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::UnknownComponent`],
    /// [`ReflectionError::UnknownProperty`], or
    /// [`ReflectionError::ValueMismatch`] if the property is not a `T`.
    pub fn get_property_value<T: PropertyValue>(
        &self,
        module: &dyn Any,
        entity: Entity,
        ty: ComponentTypeId,
        name: &str,
        index: Option<u32>,
    ) -> Result<T, ReflectionError> {
        self.typed_property::<T>(ty, name)?
            .get(&ComponentRef::new(module, entity), index)
    }

    /// Write a typed property value. Errors as for
    /// [`get_property_value`](Self::get_property_value), plus
    /// [`ReflectionError::ReadOnly`].
    ///
    /// # Errors
    ///
    /// See above.
    pub fn set_property_value<T: PropertyValue>(
        &self,
        module: &mut dyn Any,
        entity: Entity,
        ty: ComponentTypeId,
        name: &str,
        index: Option<u32>,
        value: T,
    ) -> Result<(), ReflectionError> {
        self.typed_property::<T>(ty, name)?
            .set(&mut ComponentMut::new(module, entity), index, value)
    }

    /// Invoke `function` and copy its return value into `ret`, applying the
    /// configured return policy.
    ///
    /// # Errors
    ///
    /// Propagates invocation errors. With
    /// [`RegistryConfig::strict_returns`] a size mismatch becomes
    /// [`ReflectionError::ReturnSizeMismatch`].
    pub fn invoke(
        &self,
        function: &dyn FunctionBase,
        object: &mut dyn Any,
        ret: &mut [u8],
        args: &[Variant],
    ) -> Result<ReturnCopy, ReflectionError> {
        match function.invoke_into(object, ret, args)? {
            ReturnCopy::SizeMismatch { expected, provided } if self.config.strict_returns => {
                Err(ReflectionError::ReturnSizeMismatch { expected, provided })
            }
            copy => Ok(copy),
        }
    }

    /// Snapshot of every registered module for export.
    #[must_use]
    pub fn schema(&self) -> RegistrySchema {
        RegistrySchema {
            modules: self.modules.iter().map(ModuleSchema::of).collect(),
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("modules", &self.modules.iter().map(|m| m.name).collect::<Vec<_>>())
            .field("components", &self.components.len())
            .finish()
    }
}
