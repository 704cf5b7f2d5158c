//! Events: per-module delegate lists exposed through a type-erased
//! [`EventBase`].
//!
//! A module object owns a [`DelegateList<Args>`] for each event it raises.
//! The registered [`Event`] descriptor finds that list through a plain
//! accessor function, which lets tooling bind either a raw `&[Variant]`
//! callback or a registered [`FunctionBase`] on another object.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use tracing::warn;

use crate::error::ReflectionError;
use crate::function::{ArgList, FunctionBase};
use crate::property::downcast_module_mut;
use crate::types::TypeDescriptor;
use crate::variant::Variant;

type Delegate<Args> = Box<dyn FnMut(Args)>;

/// Ordered list of callbacks raised together.
pub struct DelegateList<Args> {
    delegates: Vec<Delegate<Args>>,
}

impl<Args> Default for DelegateList<Args> {
    fn default() -> Self {
        Self {
            delegates: Vec::new(),
        }
    }
}

impl<Args: Clone> DelegateList<Args> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, delegate: impl FnMut(Args) + 'static) {
        self.delegates.push(Box::new(delegate));
    }

    /// Call every bound delegate in bind order.
    pub fn invoke(&mut self, args: Args) {
        for delegate in &mut self.delegates {
            delegate(args.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl<Args> std::fmt::Debug for DelegateList<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegateList")
            .field("len", &self.delegates.len())
            .finish()
    }
}

/// Type-erased event descriptor.
pub trait EventBase: Send + Sync {
    fn name(&self) -> &'static str;

    fn arg_count(&self) -> usize;

    fn arg_type(&self, index: usize) -> Option<TypeDescriptor>;

    /// Bind a callback that receives the event arguments as variants.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::ObjectTypeMismatch`] if `object` is not the
    /// module type that owns the event.
    fn bind_callback(
        &self,
        object: &mut dyn Any,
        callback: Box<dyn FnMut(&[Variant])>,
    ) -> Result<(), ReflectionError>;

    /// Bind `function` on `target` so it runs whenever the event is raised.
    ///
    /// The function must take exactly the event's arguments, tag for tag.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::SignatureMismatch`] on an arity or tag
    /// mismatch; nothing is bound in that case.
    fn bind_function(
        &self,
        object: &mut dyn Any,
        target: Rc<RefCell<dyn Any>>,
        function: Arc<dyn FunctionBase>,
    ) -> Result<(), ReflectionError>;

    /// Raise the event from variant arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::ArityMismatch`] or
    /// [`ReflectionError::ArgumentMismatch`] if `args` do not match.
    fn raise(&self, object: &mut dyn Any, args: &[Variant]) -> Result<(), ReflectionError>;

    /// Number of delegates currently bound on `object`.
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::ObjectTypeMismatch`] for a foreign object.
    fn bound_count(&self, object: &mut dyn Any) -> Result<usize, ReflectionError>;

    fn arg_types(&self) -> Vec<TypeDescriptor> {
        (0..self.arg_count())
            .filter_map(|i| self.arg_type(i))
            .collect()
    }
}

impl std::fmt::Debug for dyn EventBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name())
            .field("args", &self.arg_types())
            .finish()
    }
}

/// An event raised by module type `M` with arguments `Args`.
pub struct Event<M, Args> {
    name: &'static str,
    accessor: fn(&mut M) -> &mut DelegateList<Args>,
}

impl<M, Args> Event<M, Args>
where
    M: 'static,
    Args: ArgList + Clone,
{
    #[must_use]
    pub fn new(name: &'static str, accessor: fn(&mut M) -> &mut DelegateList<Args>) -> Self {
        Self { name, accessor }
    }

    fn list<'a>(&self, object: &'a mut dyn Any) -> Result<&'a mut DelegateList<Args>, ReflectionError> {
        let module = downcast_module_mut::<M>(object)?;
        Ok((self.accessor)(module))
    }

    fn signature_matches(&self, function: &dyn FunctionBase) -> bool {
        let expected = Args::descriptors();
        function.arg_count() == expected.len()
            && expected
                .iter()
                .enumerate()
                .all(|(i, desc)| function.arg_type(i).is_some_and(|a| a.is_compatible(desc)))
    }
}

impl<M, Args> EventBase for Event<M, Args>
where
    M: 'static,
    Args: ArgList + Clone,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn arg_count(&self) -> usize {
        Args::COUNT
    }

    fn arg_type(&self, index: usize) -> Option<TypeDescriptor> {
        Args::descriptors().get(index).copied()
    }

    fn bind_callback(
        &self,
        object: &mut dyn Any,
        mut callback: Box<dyn FnMut(&[Variant])>,
    ) -> Result<(), ReflectionError> {
        self.list(object)?.bind(move |args: Args| {
            let variants = args.into_variants();
            callback(&variants);
        });
        Ok(())
    }

    fn bind_function(
        &self,
        object: &mut dyn Any,
        target: Rc<RefCell<dyn Any>>,
        function: Arc<dyn FunctionBase>,
    ) -> Result<(), ReflectionError> {
        if !self.signature_matches(function.as_ref()) {
            return Err(ReflectionError::SignatureMismatch {
                event: self.name,
                function: function.name(),
            });
        }
        let event = self.name;
        self.list(object)?.bind(move |args: Args| {
            let variants = args.into_variants();
            let Ok(mut target) = target.try_borrow_mut() else {
                warn!(event, function = function.name(), "target busy, delegate skipped");
                return;
            };
            if let Err(err) = function.invoke(&mut *target, &variants) {
                warn!(event, function = function.name(), %err, "delegate failed");
            }
        });
        Ok(())
    }

    fn raise(&self, object: &mut dyn Any, args: &[Variant]) -> Result<(), ReflectionError> {
        let list = self.list(object)?;
        let args = Args::from_variants(args)?;
        list.invoke(args);
        Ok(())
    }

    fn bound_count(&self, object: &mut dyn Any) -> Result<usize, ReflectionError> {
        Ok(self.list(object)?.len())
    }
}
