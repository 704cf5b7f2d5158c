//! Reflection-layer error types.

use engine_component::ComponentTypeId;

use crate::stream::StreamError;
use crate::types::TypeTag;

/// Errors that can occur while registering, querying or invoking reflected
/// items.
#[derive(Debug, thiserror::Error)]
pub enum ReflectionError {
    /// A call received the wrong number of arguments.
    #[error("expected {expected} arguments, got {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// A call argument carried the wrong variant tag.
    #[error("argument {index}: expected {expected}, got {found}")]
    ArgumentMismatch {
        index: usize,
        expected: TypeTag,
        found: TypeTag,
    },

    /// A value written through a type-erased setter carried the wrong tag.
    #[error("value mismatch: expected {expected}, got {found}")]
    ValueMismatch { expected: TypeTag, found: TypeTag },

    /// The opaque module or object pointer was not of the registered type.
    #[error("object is not a `{expected}`")]
    ObjectTypeMismatch { expected: &'static str },

    /// A write was attempted on a property without a setter.
    #[error("property `{0}` is read-only")]
    ReadOnly(&'static str),

    /// An array child property was accessed without an item index.
    #[error("property `{0}` is an array item and needs an index")]
    MissingIndex(&'static str),

    /// An array item index was past the end of the array.
    #[error("array `{property}` has {count} items, index {index} is out of range")]
    IndexOutOfRange {
        property: &'static str,
        index: u32,
        count: u32,
    },

    /// An array adder or remover ran but the item count did not change by
    /// one, typically because the entity lacks the component.
    #[error("array `{property}` should have {expected} items after the edit, has {found}")]
    ArrayNotResized {
        property: &'static str,
        expected: u32,
        found: u32,
    },

    /// An enum property received a value outside its enumeration.
    #[error("property `{property}` has no enumerator {value}")]
    InvalidEnumValue { property: &'static str, value: i32 },

    /// An event and a function disagree on their argument lists.
    #[error("event `{event}` cannot bind function `{function}`: signature mismatch")]
    SignatureMismatch {
        event: &'static str,
        function: &'static str,
    },

    /// A return buffer did not match the callee's return size (strict mode).
    #[error("return buffer is {provided} bytes, callee returns {expected}")]
    ReturnSizeMismatch { expected: usize, provided: usize },

    /// A byte slot did not match the size of a struct field.
    #[error("field `{field}` is {expected} bytes, slot is {provided}")]
    SlotSizeMismatch {
        field: &'static str,
        expected: usize,
        provided: usize,
    },

    /// A string field was accessed through a byte slot.
    #[error("field `{0}` has no fixed byte layout")]
    NotByteCopyable(&'static str),

    /// No component with this type id is registered.
    #[error("unknown component type {0}")]
    UnknownComponent(ComponentTypeId),

    /// No property with this name exists on the component.
    #[error("component `{component}` has no property `{property}`")]
    UnknownProperty {
        component: &'static str,
        property: String,
    },

    /// A module name was registered twice.
    #[error("module `{0}` is already registered")]
    DuplicateModule(&'static str),

    /// A component string id was registered twice.
    #[error("component `{0}` is already registered")]
    DuplicateComponent(&'static str),

    /// A property name appears twice on one component.
    #[error("component `{component}` declares property `{property}` twice")]
    DuplicateProperty {
        component: &'static str,
        property: &'static str,
    },

    /// The registration builder was driven in an invalid order.
    #[error("invalid registration in module `{module}`: {reason}")]
    Builder {
        module: &'static str,
        reason: &'static str,
    },

    /// A blob stream could not be encoded or decoded.
    #[error(transparent)]
    Stream(#[from] StreamError),
}
