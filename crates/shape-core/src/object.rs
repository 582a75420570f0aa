//! Object descriptors
//!
//! An object descriptor validates a JSON object against a [`Shape`]: an ordered
//! list of named field descriptors. Validation is closed-world and stops at
//! the first failure:
//!
//! 1. the input must be a JSON object (`Not an object`)
//! 2. shape fields are checked in declaration order, not input order; an absent
//!    field fails with `Missing key '<field>'` and a field descriptor's own
//!    failure is passed through unchanged
//! 3. input keys the shape does not declare fail with `Unknown key '<key>'`,
//!    naming the first such key in input order

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::descriptor::Descriptor;
use crate::error::{Outcome, ValidationError};
use crate::kind::Kind;

/// How an object decides whether a declared field was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// The key exists in the input, whatever its value.
    #[default]
    Defined,
    /// The key exists and its value is truthy. `false`, `0`, `""` and `null`
    /// count as missing, matching loosely-typed validators.
    Truthy,
}

impl Presence {
    pub(crate) fn lookup<'v>(&self, record: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
        let value = record.get(key)?;
        match self {
            Presence::Defined => Some(value),
            Presence::Truthy => is_truthy(value).then_some(value),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Defined => "defined",
            Presence::Truthy => "truthy",
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown presence policy: {0} (expected 'defined' or 'truthy')")]
pub struct ParsePresenceError(String);

impl FromStr for Presence {
    type Err = ParsePresenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "defined" => Ok(Presence::Defined),
            "truthy" => Ok(Presence::Truthy),
            _ => Err(ParsePresenceError(s.to_string())),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A named entry in a shape.
#[derive(Debug, Clone)]
pub struct Field<D> {
    name: String,
    descriptor: D,
}

pub fn field<D: Descriptor>(name: impl Into<String>, descriptor: D) -> Field<D> {
    Field {
        name: name.into(),
        descriptor,
    }
}

impl<D: Descriptor> Field<D> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &D {
        &self.descriptor
    }

    /// Look up and validate this field in `record`.
    pub(crate) fn extract(&self, record: &Map<String, Value>, presence: Presence) -> Outcome<D::Output> {
        let value = presence
            .lookup(record, &self.name)
            .ok_or_else(|| ValidationError::MissingKey(self.name.clone()))?;
        self.descriptor.validate(value)
    }
}

/// Ordered set of field descriptors.
///
/// Implemented for tuples of [`Field`] (typed, one output per field) and for
/// [`DynShape`](crate::DynShape) (built at runtime, output is a JSON map).
pub trait Shape {
    /// Record produced once every field validates.
    type Output;

    /// Declared field names, in declaration order.
    fn keys(&self) -> Vec<&str>;

    /// Validate declared fields in declaration order, stopping at the first failure.
    fn validate_fields(&self, record: &Map<String, Value>, presence: Presence) -> Outcome<Self::Output>;
}

// Tuple expressions evaluate left to right, so `?` stops at the first
// failing field in declaration order.
macro_rules! impl_shape_for_tuple {
    ($($D:ident . $idx:tt),+) => {
        impl<$($D: Descriptor),+> Shape for ($(Field<$D>,)+) {
            type Output = ($($D::Output,)+);

            fn keys(&self) -> Vec<&str> {
                vec![$(self.$idx.name()),+]
            }

            fn validate_fields(
                &self,
                record: &Map<String, Value>,
                presence: Presence,
            ) -> Outcome<Self::Output> {
                Ok(($(self.$idx.extract(record, presence)?,)+))
            }
        }
    };
}

impl_shape_for_tuple!(A.0);
impl_shape_for_tuple!(A.0, B.1);
impl_shape_for_tuple!(A.0, B.1, C.2);
impl_shape_for_tuple!(A.0, B.1, C.2, D.3);
impl_shape_for_tuple!(A.0, B.1, C.2, D.3, E.4);
impl_shape_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5);
impl_shape_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6);
impl_shape_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7);
impl_shape_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8);
impl_shape_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9);
impl_shape_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9, K.10);
impl_shape_for_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7, I.8, J.9, K.10, L.11);

/// Descriptor for a JSON object with a fixed set of fields.
#[derive(Debug, Clone)]
pub struct Object<S> {
    shape: S,
    presence: Presence,
}

pub fn object<S: Shape>(shape: S) -> Object<S> {
    Object {
        shape,
        presence: Presence::Defined,
    }
}

impl<S: Shape> Object<S> {
    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = presence;
        self
    }

    /// Treat falsy field values as missing. See [`Presence::Truthy`].
    pub fn truthy_presence(self) -> Self {
        self.with_presence(Presence::Truthy)
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn shape(&self) -> &S {
        &self.shape
    }

    fn check(&self, input: &Value) -> Outcome<S::Output> {
        let record = input.as_object().ok_or(ValidationError::NotAnObject)?;
        let data = self.shape.validate_fields(record, self.presence)?;

        // Whatever the shape did not consume is undeclared
        let declared = self.shape.keys();
        if let Some(unknown) = record.keys().find(|key| !declared.contains(&key.as_str())) {
            return Err(ValidationError::UnknownKey(unknown.clone()));
        }

        Ok(data)
    }
}

impl<S: Shape> Descriptor for Object<S> {
    type Output = S::Output;

    fn kind(&self) -> Kind {
        Kind::Object
    }

    fn validate(&self, input: &Value) -> Outcome<S::Output> {
        match self.check(input) {
            Ok(data) => Ok(data),
            Err(err) => {
                debug!(
                    error = %err,
                    input_kind = ?Kind::of(input),
                    presence = %self.presence,
                    "object validation failed"
                );
                Err(err)
            }
        }
    }
}
