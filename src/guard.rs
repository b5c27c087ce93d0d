//! Runtime argument type checks for methods taking dynamically typed arguments.
//!
//! A [`TypeGuard`] holds one [`Expected`] entry per positional parameter.
//! Before the guarded method runs, each positional argument is compared
//! against its entry:
//!
//! - absent arguments (`None`) always pass
//! - [`Expected::Receiver`] resolves, on every call, to the runtime type of
//!   the receiver
//! - when the number of positional arguments differs from the number of
//!   entries, nothing is checked at all
//!
//! Keyword arguments are neither counted nor checked.
//!
//! # Example
//!
//! ```rust
//! use lstar_tools::guard::Arguments;
//! use lstar_tools::type_check;
//!
//! struct Learner;
//!
//! let set_depth = type_check![i64, String].wrap(|args: &Arguments<'_>| {
//!     args.get::<i64>(0).copied().unwrap_or_default()
//! });
//!
//! let learner = Learner;
//! let name = String::from("depth");
//! let ok = Arguments::new(&learner).arg(&5i64).arg(&name);
//! assert_eq!(set_depth.call(&ok).unwrap(), 5);
//!
//! let bad = Arguments::new(&learner).arg(&5i64).arg(&7i64);
//! assert!(set_depth.call(&bad).is_err());
//! ```

use crate::error::{Error, Result};
use crate::registry::short_type_name;
use std::any::{type_name, Any, TypeId};
use std::fmt;

/// A value that can be passed through a [`TypeGuard`].
pub trait Argument: Any {
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> Argument for T {
    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn argument_type_id(arg: &dyn Argument) -> TypeId {
    Any::type_id(arg.as_any())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeSpec {
    id: TypeId,
    name: &'static str,
}

impl TypeSpec {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Runtime type of `arg`.
    pub fn of_argument(arg: &dyn Argument) -> Self {
        Self {
            id: argument_type_id(arg),
            name: Argument::type_name(arg),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full path of the type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn short_name(&self) -> String {
        short_type_name(self.name)
    }

    pub fn matches(&self, arg: &dyn Argument) -> bool {
        argument_type_id(arg) == self.id
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Type(TypeSpec),
    /// Whatever type the receiver has at call time
    Receiver,
}

impl Expected {
    pub fn of<T: Any>() -> Self {
        Self::Type(TypeSpec::of::<T>())
    }

    pub fn resolve(&self, receiver: &dyn Argument) -> TypeSpec {
        match self {
            Self::Type(spec) => *spec,
            Self::Receiver => TypeSpec::of_argument(receiver),
        }
    }
}

/// Arguments of one guarded call.
#[derive(Clone)]
pub struct Arguments<'a> {
    receiver: &'a dyn Argument,
    positional: Vec<Option<&'a dyn Argument>>,
    keywords: Vec<(&'a str, Option<&'a dyn Argument>)>,
}

impl<'a> Arguments<'a> {
    pub fn new(receiver: &'a dyn Argument) -> Self {
        Self {
            receiver,
            positional: Vec::new(),
            keywords: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, value: &'a dyn Argument) -> Self {
        self.positional.push(Some(value));
        self
    }

    /// Append an absent positional argument.
    #[must_use]
    pub fn none(mut self) -> Self {
        self.positional.push(None);
        self
    }

    #[must_use]
    pub fn opt<T: Any>(mut self, value: Option<&'a T>) -> Self {
        self.positional.push(value.map(|v| v as &dyn Argument));
        self
    }

    #[must_use]
    pub fn kwarg(mut self, name: &'a str, value: &'a dyn Argument) -> Self {
        self.keywords.push((name, Some(value)));
        self
    }

    pub fn receiver(&self) -> &'a dyn Argument {
        self.receiver
    }

    /// Receiver downcast to `T`.
    pub fn receiver_as<T: Any>(&self) -> Option<&'a T> {
        self.receiver.as_any().downcast_ref()
    }

    pub fn positional(&self) -> &[Option<&'a dyn Argument>] {
        &self.positional
    }

    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    /// Positional argument `index` downcast to `T`; `None` when absent,
    /// missing or of another type.
    pub fn get<T: Any>(&self, index: usize) -> Option<&'a T> {
        self.positional
            .get(index)
            .copied()
            .flatten()
            .and_then(|arg| arg.as_any().downcast_ref())
    }

    pub fn keyword<T: Any>(&self, name: &str) -> Option<&'a T> {
        self.keywords
            .iter()
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| *value)
            .and_then(|arg| arg.as_any().downcast_ref())
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }
}

impl fmt::Debug for Arguments<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |arg: &Option<&dyn Argument>| arg.map_or("None", |a| Argument::type_name(a));
        f.debug_struct("Arguments")
            .field("receiver", &Argument::type_name(self.receiver))
            .field(
                "positional",
                &self.positional.iter().map(names).collect::<Vec<_>>(),
            )
            .field(
                "keywords",
                &self
                    .keywords
                    .iter()
                    .map(|(key, value)| (*key, names(value)))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeGuard {
    expected: Vec<Expected>,
}

impl TypeGuard {
    pub fn new(expected: impl IntoIterator<Item = Expected>) -> Self {
        Self {
            expected: expected.into_iter().collect(),
        }
    }

    pub fn expected(&self) -> &[Expected] {
        &self.expected
    }

    /// Validate `args`. Returns `Ok(false)` when the argument count did not
    /// match and validation was skipped.
    pub fn check(&self, args: &Arguments<'_>) -> Result<bool> {
        if args.len() != self.expected.len() {
            log::trace!(
                "Skipping type check: {} positional arguments for {} expected types",
                args.len(),
                self.expected.len()
            );
            return Ok(false);
        }

        let resolved: Vec<TypeSpec> = self
            .expected
            .iter()
            .map(|expected| expected.resolve(args.receiver()))
            .collect();

        for (position, (arg, spec)) in args.positional().iter().zip(&resolved).enumerate() {
            let Some(arg) = arg else { continue };
            if !spec.matches(*arg) {
                return Err(Error::TypeMismatch {
                    expected: resolved.iter().map(TypeSpec::short_name).collect(),
                    received: short_type_name(Argument::type_name(*arg)),
                    position,
                });
            }
        }
        Ok(true)
    }

    pub fn wrap<F>(self, method: F) -> Guarded<F> {
        Guarded {
            guard: self,
            method,
        }
    }
}

/// A method behind a [`TypeGuard`].
#[derive(Clone)]
pub struct Guarded<F> {
    guard: TypeGuard,
    method: F,
}

impl<F> Guarded<F> {
    /// Check `args`, then run the method. The method's own return value,
    /// including any `Result`, is passed back untouched.
    pub fn call<R>(&self, args: &Arguments<'_>) -> Result<R>
    where
        F: Fn(&Arguments<'_>) -> R,
    {
        self.guard.check(args)?;
        Ok((self.method)(args))
    }

    pub fn guard(&self) -> &TypeGuard {
        &self.guard
    }

    pub fn into_inner(self) -> F {
        self.method
    }
}

impl<F> fmt::Debug for Guarded<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guarded").field("guard", &self.guard).finish()
    }
}

/// Build a [`TypeGuard`] from a list of types; `SELF` stands for the
/// receiver's runtime type.
///
/// ```rust
/// use lstar_tools::guard::Expected;
/// use lstar_tools::type_check;
///
/// let guard = type_check![u32, SELF, Vec<String>];
/// assert_eq!(guard.expected()[1], Expected::Receiver);
/// assert_eq!(guard.expected()[2], Expected::of::<Vec<String>>());
/// ```
#[macro_export]
macro_rules! type_check {
    (@acc [$($out:expr,)*]) => {
        $crate::guard::TypeGuard::new([$($out),*])
    };
    (@acc [$($out:expr,)*] SELF $(, $($rest:tt)*)?) => {
        $crate::type_check!(@acc [$($out,)* $crate::guard::Expected::Receiver,] $($($rest)*)?)
    };
    (@acc [$($out:expr,)*] $t:ty $(, $($rest:tt)*)?) => {
        $crate::type_check!(@acc [$($out,)* $crate::guard::Expected::of::<$t>(),] $($($rest)*)?)
    };
    ($($input:tt)*) => {
        $crate::type_check!(@acc [] $($input)*)
    };
}
