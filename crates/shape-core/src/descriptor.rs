//! Descriptor trait and the primitive descriptors

use serde_json::Value;

use crate::dynamic::AnyDescriptor;
use crate::error::{Outcome, ValidationError};
use crate::kind::Kind;

/// A validation rule together with the type it produces.
///
/// `validate` must be total and pure: every input yields an `Outcome`, and the
/// same input always yields the same one.
pub trait Descriptor {
    /// Type recovered when validation succeeds.
    type Output;

    fn kind(&self) -> Kind;

    fn validate(&self, input: &Value) -> Outcome<Self::Output>;

    /// Convert the validated value with `f`, e.g. to build a named struct from
    /// an object's field tuple.
    fn map<U, F>(self, f: F) -> Mapped<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Mapped { inner: self, f }
    }

    /// Erase the output type so descriptors can be stored side by side.
    fn erase(self) -> AnyDescriptor
    where
        Self: Sized + Send + Sync + 'static,
        Self::Output: Into<Value>,
    {
        AnyDescriptor::new(self)
    }
}

/// Output type declared by a descriptor.
pub type Infer<D> = <D as Descriptor>::Output;

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolDescriptor;

#[derive(Debug, Clone, Copy, Default)]
pub struct StringDescriptor;

#[derive(Debug, Clone, Copy, Default)]
pub struct NumberDescriptor;

pub fn boolean() -> BoolDescriptor {
    BoolDescriptor
}

pub fn string() -> StringDescriptor {
    StringDescriptor
}

/// Typed numbers are read as `f64`, so integers beyond 2^53 lose precision.
/// Erased number descriptors (see [`Descriptor::erase`]) return the input
/// number untouched.
pub fn number() -> NumberDescriptor {
    NumberDescriptor
}

impl Descriptor for BoolDescriptor {
    type Output = bool;

    fn kind(&self) -> Kind {
        Kind::Boolean
    }

    fn validate(&self, input: &Value) -> Outcome<bool> {
        input
            .as_bool()
            .ok_or(ValidationError::TypeMismatch(Kind::Boolean))
    }
}

impl Descriptor for StringDescriptor {
    type Output = String;

    fn kind(&self) -> Kind {
        Kind::String
    }

    fn validate(&self, input: &Value) -> Outcome<String> {
        input
            .as_str()
            .map(str::to_owned)
            .ok_or(ValidationError::TypeMismatch(Kind::String))
    }
}

impl Descriptor for NumberDescriptor {
    type Output = f64;

    fn kind(&self) -> Kind {
        Kind::Number
    }

    fn validate(&self, input: &Value) -> Outcome<f64> {
        // as_f64 is None for every non-number, so strings like "7" are rejected
        input
            .as_f64()
            .ok_or(ValidationError::TypeMismatch(Kind::Number))
    }

    fn erase(self) -> AnyDescriptor {
        AnyDescriptor::new(ExactNumber)
    }
}

/// Number check that hands back the input `Value` itself.
#[derive(Debug, Clone, Copy)]
struct ExactNumber;

impl Descriptor for ExactNumber {
    type Output = Value;

    fn kind(&self) -> Kind {
        Kind::Number
    }

    fn validate(&self, input: &Value) -> Outcome<Value> {
        if input.is_number() {
            Ok(input.clone())
        } else {
            Err(ValidationError::TypeMismatch(Kind::Number))
        }
    }
}

/// Descriptor returned by [`Descriptor::map`].
#[derive(Debug, Clone)]
pub struct Mapped<D, F> {
    inner: D,
    f: F,
}

impl<D, F, U> Descriptor for Mapped<D, F>
where
    D: Descriptor,
    F: Fn(D::Output) -> U,
{
    type Output = U;

    fn kind(&self) -> Kind {
        self.inner.kind()
    }

    fn validate(&self, input: &Value) -> Outcome<U> {
        self.inner.validate(input).map(&self.f)
    }
}
