//! # engine_reflection
//!
//! Runtime reflection for engine modules. Modules describe their components
//! once at startup, and tooling (inspectors, serializers, script binders)
//! reads that description to enumerate properties, read and write values,
//! invoke functions and bind events without knowing the concrete types.
//!
//! ## Pieces
//!
//! - [`TypeTag`], [`TypeDescriptor`] and [`Variant`]: the runtime value
//!   bridge, with [`Reflect`] converting native values in and out.
//! - [`Property`], [`ArrayProperty`], [`BlobProperty`]: type-erased accessors
//!   over one component's state, decorated with [`Attribute`]s.
//! - [`PropertyVisitor`]: double dispatch over the concrete property types.
//! - [`FunctionBase`] / [`EventBase`]: callables and delegate lists driven by
//!   [`Variant`] arguments.
//! - [`ModuleBuilder`] and [`Registry`]: ordered registration followed by
//!   read-only lookup by name, type id, runtime hash or stable hash.
//!
//! ## Registration order
//!
//! ```ignore
//! let mut registry = Registry::with_config(RegistryConfig::from_env());
//! registry.register_module(core_module()?)?;
//! registry.register_module(physics_module()?)?;
//! // From here on the registry is only read, and may be shared.
//! ```

pub mod attribute;
pub mod builder;
pub mod component;
pub mod config;
pub mod error;
pub mod event;
pub mod function;
pub mod module;
pub mod property;
pub mod registry;
pub mod schema;
pub mod stream;
pub mod structs;
pub mod types;
pub mod variant;
pub mod visitor;

pub use attribute::{Attribute, AttributeKind, EnumSource, ResourceType, StaticEnum};
pub use builder::ModuleBuilder;
pub use component::ComponentDesc;
pub use config::RegistryConfig;
pub use error::ReflectionError;
pub use event::{DelegateList, Event, EventBase};
pub use function::{ArgList, Callable, FunctionBase, NativeFunction, ReturnCopy};
pub use module::ModuleDesc;
pub use property::{
    ArrayProperty, BlobProperty, ComponentMut, ComponentRef, Property, PropertyBase,
    PropertyKind, PropertyValue, ValueProperty,
};
pub use registry::Registry;
pub use schema::RegistrySchema;
pub use stream::{InputStream, OutputStream, StreamError};
pub use structs::{StructDesc, StructType, StructVarBase};
pub use types::{ObjectHandle, ResourcePath, TypeDescriptor, TypeTag};
pub use variant::{Reflect, Variant};
pub use visitor::{PropertyVisitor, for_each_property};
