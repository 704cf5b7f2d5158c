//! Type-erased native functions.
//!
//! A [`NativeFunction`] wraps a Rust closure `Fn(&mut M, A0, A1, ...) -> R`
//! and exposes it through [`FunctionBase`], which tooling can call with
//! nothing but a module object and a slice of [`Variant`] arguments. The
//! argument list is described by [`ArgList`], implemented for tuples of up to
//! six [`Reflect`] types.

use std::any::Any;
use std::marker::PhantomData;

use tracing::debug;

use crate::error::ReflectionError;
use crate::property::downcast_module_mut;
use crate::types::{TypeDescriptor, TypeTag};
use crate::variant::{Reflect, Variant};

/// Outcome of copying a return value into a caller-provided byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCopy {
    /// The function returns nothing; the buffer is untouched.
    Void,
    /// The return value was written to the buffer.
    Copied,
    /// The buffer length differs from the return type's size; the value was
    /// dropped and the buffer is untouched.
    SizeMismatch { expected: usize, provided: usize },
    /// The return type has no fixed byte payload (strings); the buffer is
    /// untouched.
    NotByteCopyable,
}

/// A callable descriptor invoked through [`Variant`] arguments.
pub trait FunctionBase: Send + Sync {
    fn name(&self) -> &'static str;

    fn arg_count(&self) -> usize;

    /// Descriptor of argument `index`, or `None` past the end.
    fn arg_type(&self, index: usize) -> Option<TypeDescriptor>;

    fn return_type(&self) -> TypeDescriptor;

    /// Call the function on `object` and return its result as a [`Variant`].
    ///
    /// # Errors
    ///
    /// Returns [`ReflectionError::ObjectTypeMismatch`] if `object` is not the
    /// registered type, [`ReflectionError::ArityMismatch`] or
    /// [`ReflectionError::ArgumentMismatch`] if `args` do not match the
    /// signature. The native code does not run in any of these cases.
    fn invoke(&self, object: &mut dyn Any, args: &[Variant]) -> Result<Variant, ReflectionError>;

    /// Call the function and copy the return value into `ret` if, and only
    /// if, `ret.len()` equals the return type's size.
    ///
    /// # Errors
    ///
    /// Same as [`FunctionBase::invoke`]. A size mismatch is not an error; it
    /// is reported as [`ReturnCopy::SizeMismatch`].
    fn invoke_into(
        &self,
        object: &mut dyn Any,
        ret: &mut [u8],
        args: &[Variant],
    ) -> Result<ReturnCopy, ReflectionError> {
        let value = self.invoke(object, args)?;
        let return_type = self.return_type();
        if return_type.tag == TypeTag::Void {
            return Ok(ReturnCopy::Void);
        }
        if ret.len() != return_type.size {
            debug!(
                function = self.name(),
                expected = return_type.size,
                provided = ret.len(),
                "return value dropped: buffer size mismatch"
            );
            return Ok(ReturnCopy::SizeMismatch {
                expected: return_type.size,
                provided: ret.len(),
            });
        }
        match value.to_le_bytes() {
            Some(bytes) if bytes.len() == ret.len() => {
                ret.copy_from_slice(&bytes);
                Ok(ReturnCopy::Copied)
            }
            _ => Ok(ReturnCopy::NotByteCopyable),
        }
    }

    /// Descriptors of every argument, in order.
    fn arg_types(&self) -> Vec<TypeDescriptor> {
        (0..self.arg_count())
            .filter_map(|i| self.arg_type(i))
            .collect()
    }
}

impl std::fmt::Debug for dyn FunctionBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name())
            .field("args", &self.arg_types())
            .field("returns", &self.return_type().tag)
            .finish()
    }
}

/// A tuple of argument types that can be built from, and flattened into,
/// [`Variant`]s.
pub trait ArgList: Sized + 'static {
    const COUNT: usize;

    fn descriptors() -> Vec<TypeDescriptor>;

    /// # Errors
    ///
    /// Returns [`ReflectionError::ArityMismatch`] on a length mismatch and
    /// [`ReflectionError::ArgumentMismatch`] for the first argument with the
    /// wrong tag.
    fn from_variants(args: &[Variant]) -> Result<Self, ReflectionError>;

    fn into_variants(self) -> Vec<Variant>;
}

fn arg_at<T: Reflect>(args: &[Variant], index: usize) -> Result<T, ReflectionError> {
    let arg = &args[index];
    T::from_variant(arg).ok_or(ReflectionError::ArgumentMismatch {
        index,
        expected: T::TAG,
        found: arg.tag(),
    })
}

macro_rules! impl_arg_list {
    ($count:expr; $($arg:ident => $idx:tt),*) => {
        impl<$($arg: Reflect),*> ArgList for ($($arg,)*) {
            const COUNT: usize = $count;

            fn descriptors() -> Vec<TypeDescriptor> {
                vec![$($arg::type_descriptor()),*]
            }

            fn from_variants(args: &[Variant]) -> Result<Self, ReflectionError> {
                if args.len() != $count {
                    return Err(ReflectionError::ArityMismatch {
                        expected: $count,
                        found: args.len(),
                    });
                }
                Ok(($(arg_at::<$arg>(args, $idx)?,)*))
            }

            #[allow(non_snake_case)]
            fn into_variants(self) -> Vec<Variant> {
                let ($($arg,)*) = self;
                vec![$($arg.into_variant()),*]
            }
        }
    };
}

impl_arg_list!(0;);
impl_arg_list!(1; A0 => 0);
impl_arg_list!(2; A0 => 0, A1 => 1);
impl_arg_list!(3; A0 => 0, A1 => 1, A2 => 2);
impl_arg_list!(4; A0 => 0, A1 => 1, A2 => 2, A3 => 3);
impl_arg_list!(5; A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4);
impl_arg_list!(6; A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5);

/// A Rust callable taking a module object and the arguments in `Args`.
///
/// Implemented for every `Fn(&mut M, A0, ..., An) -> R` up to six arguments.
pub trait Callable<M, Args>: Send + Sync + 'static {
    type Output: Reflect;

    fn call(&self, object: &mut M, args: Args) -> Self::Output;
}

macro_rules! impl_callable {
    ($($arg:ident),*) => {
        impl<M, R, F, $($arg),*> Callable<M, ($($arg,)*)> for F
        where
            F: Fn(&mut M, $($arg),*) -> R + Send + Sync + 'static,
            R: Reflect,
            $($arg: Reflect,)*
        {
            type Output = R;

            #[allow(non_snake_case)]
            fn call(&self, object: &mut M, args: ($($arg,)*)) -> R {
                let ($($arg,)*) = args;
                (self)(object, $($arg),*)
            }
        }
    };
}

impl_callable!();
impl_callable!(A0);
impl_callable!(A0, A1);
impl_callable!(A0, A1, A2);
impl_callable!(A0, A1, A2, A3);
impl_callable!(A0, A1, A2, A3, A4);
impl_callable!(A0, A1, A2, A3, A4, A5);

/// A [`FunctionBase`] backed by a Rust closure over module type `M`.
pub struct NativeFunction<M, Args, F> {
    name: &'static str,
    f: F,
    _marker: PhantomData<fn(&mut M, Args)>,
}

impl<M, Args, F> NativeFunction<M, Args, F>
where
    M: 'static,
    Args: ArgList,
    F: Callable<M, Args>,
{
    #[must_use]
    pub fn new(name: &'static str, f: F) -> Self {
        Self {
            name,
            f,
            _marker: PhantomData,
        }
    }
}

impl<M, Args, F> FunctionBase for NativeFunction<M, Args, F>
where
    M: 'static,
    Args: ArgList,
    F: Callable<M, Args>,
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

    fn return_type(&self) -> TypeDescriptor {
        <F::Output as Reflect>::type_descriptor()
    }

    fn invoke(&self, object: &mut dyn Any, args: &[Variant]) -> Result<Variant, ReflectionError> {
        let object = downcast_module_mut::<M>(object)?;
        let args = Args::from_variants(args)?;
        Ok(self.f.call(object, args).into_variant())
    }
}

#[cfg(test)]
mod tests {
    use engine_component::Entity;
    use engine_math::{Quat, Vec3};

    use super::*;

    #[derive(Default)]
    struct Physics {
        gravity: Vec3,
        calls: u32,
    }

    fn set_gravity() -> NativeFunction<Physics, (f32, f32, f32), impl Callable<Physics, (f32, f32, f32)>> {
        NativeFunction::new("set_gravity", |p: &mut Physics, x: f32, y: f32, z: f32| {
            p.gravity = Vec3::new(x, y, z);
            p.calls += 1;
        })
    }

    fn scaled_gravity() -> NativeFunction<Physics, (f32,), impl Callable<Physics, (f32,)>> {
        NativeFunction::new("scaled_gravity", |p: &mut Physics, s: f32| p.gravity * s)
    }

    #[test]
    fn test_signature_description() {
        let f = set_gravity();
        assert_eq!(f.arg_count(), 3);
        assert_eq!(f.arg_type(0).map(|d| d.tag), Some(TypeTag::F32));
        assert_eq!(f.arg_type(3), None);
        assert_eq!(f.return_type().tag, TypeTag::Void);
        assert_eq!(scaled_gravity().return_type().tag, TypeTag::Vec3);
    }

    #[test]
    fn test_invoke_with_variants() {
        let mut physics = Physics::default();
        let f = set_gravity();
        let result = f
            .invoke(&mut physics, &[Variant::F32(0.0), Variant::F32(-9.8), Variant::F32(0.0)])
            .unwrap();
        assert_eq!(result, Variant::Void);
        assert_eq!(physics.gravity, Vec3::new(0.0, -9.8, 0.0));
    }

    #[test]
    fn test_invoke_rejects_bad_arguments_without_calling() {
        let mut physics = Physics::default();
        let f = set_gravity();

        let err = f.invoke(&mut physics, &[Variant::F32(0.0)]).unwrap_err();
        assert!(matches!(err, ReflectionError::ArityMismatch { expected: 3, found: 1 }));

        let err = f
            .invoke(&mut physics, &[Variant::F32(0.0), Variant::I32(1), Variant::F32(0.0)])
            .unwrap_err();
        assert!(matches!(
            err,
            ReflectionError::ArgumentMismatch {
                index: 1,
                expected: TypeTag::F32,
                found: TypeTag::I32
            }
        ));
        assert_eq!(physics.calls, 0);
    }

    #[test]
    fn test_invoke_rejects_foreign_object() {
        let mut other = 1u32;
        let err = scaled_gravity().invoke(&mut other, &[Variant::F32(1.0)]).unwrap_err();
        assert!(matches!(err, ReflectionError::ObjectTypeMismatch { .. }));
    }

    #[test]
    fn test_invoke_into_matching_buffer_copies() {
        let mut physics = Physics {
            gravity: Vec3::new(1.0, 2.0, 3.0),
            calls: 0,
        };
        let mut ret = [0u8; 12];
        let copy = scaled_gravity()
            .invoke_into(&mut physics, &mut ret, &[Variant::F32(2.0)])
            .unwrap();
        assert_eq!(copy, ReturnCopy::Copied);
        assert_eq!(
            Variant::from_le_bytes(TypeTag::Vec3, &ret),
            Some(Variant::Vec3(Vec3::new(2.0, 4.0, 6.0)))
        );
    }

    #[test]
    fn test_invoke_into_wrong_size_leaves_buffer_untouched() {
        let mut physics = Physics {
            gravity: Vec3::ONE,
            calls: 0,
        };
        let mut ret = [0xAAu8; 8];
        let copy = scaled_gravity()
            .invoke_into(&mut physics, &mut ret, &[Variant::F32(2.0)])
            .unwrap();
        assert_eq!(copy, ReturnCopy::SizeMismatch { expected: 12, provided: 8 });
        assert_eq!(ret, [0xAAu8; 8]);
    }

    #[test]
    fn test_invoke_into_void_and_strings() {
        let mut physics = Physics::default();
        let mut ret = [0u8; 4];
        let copy = set_gravity()
            .invoke_into(&mut physics, &mut ret, &[Variant::F32(0.0), Variant::F32(0.0), Variant::F32(0.0)])
            .unwrap();
        assert_eq!(copy, ReturnCopy::Void);

        let name = NativeFunction::new("name", |_: &mut Physics| String::from("physics"));
        let mut ret = vec![0u8; std::mem::size_of::<String>()];
        let copy = name.invoke_into(&mut physics, &mut ret, &[]).unwrap();
        assert_eq!(copy, ReturnCopy::NotByteCopyable);
        assert_eq!(name.invoke(&mut physics, &[]).unwrap(), Variant::CString("physics".into()));
    }

    #[test]
    fn test_mixed_argument_kinds() {
        let mut physics = Physics::default();
        let f = NativeFunction::new(
            "rotate_gravity",
            |p: &mut Physics, _target: Entity, q: Quat, flip: bool| {
                p.gravity = q * if flip { -Vec3::Y } else { Vec3::Y };
                p.gravity.y
            },
        );
        let y = f
            .invoke(
                &mut physics,
                &[
                    Variant::Entity(Entity(1)),
                    Variant::Quat(Quat::IDENTITY),
                    Variant::Bool(true),
                ],
            )
            .unwrap();
        assert_eq!(y, Variant::F32(-1.0));
        let tags: Vec<TypeTag> = f.arg_types().iter().map(|d| d.tag).collect();
        assert_eq!(tags, vec![TypeTag::Entity, TypeTag::Quat, TypeTag::Bool]);
    }
}
