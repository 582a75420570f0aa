//! Runtime-built descriptors
//!
//! Typed shapes need their fields known at compile time. Schemas loaded from
//! files are assembled from [`AnyDescriptor`]s instead, and validate into a
//! JSON map keyed by field name.

use serde_json::{Map, Value};
use std::fmt;

use crate::descriptor::Descriptor;
use crate::error::{Outcome, ValidationError};
use crate::kind::Kind;
use crate::object::{Presence, Shape};

/// A descriptor whose output has been converted to a JSON value.
pub struct AnyDescriptor {
    inner: Box<dyn Descriptor<Output = Value> + Send + Sync>,
}

struct Erased<D>(D);

impl<D> Descriptor for Erased<D>
where
    D: Descriptor,
    D::Output: Into<Value>,
{
    type Output = Value;

    fn kind(&self) -> Kind {
        self.0.kind()
    }

    fn validate(&self, input: &Value) -> Outcome<Value> {
        self.0.validate(input).map(Into::into)
    }
}

impl AnyDescriptor {
    pub fn new<D>(descriptor: D) -> Self
    where
        D: Descriptor + Send + Sync + 'static,
        D::Output: Into<Value>,
    {
        Self {
            inner: Box::new(Erased(descriptor)),
        }
    }
}

impl Descriptor for AnyDescriptor {
    type Output = Value;

    fn kind(&self) -> Kind {
        self.inner.kind()
    }

    fn validate(&self, input: &Value) -> Outcome<Value> {
        self.inner.validate(input)
    }

    fn erase(self) -> AnyDescriptor {
        self
    }
}

impl fmt::Debug for AnyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyDescriptor")
            .field("kind", &self.kind())
            .finish()
    }
}

/// Insertion-ordered shape of type-erased fields.
#[derive(Debug, Default)]
pub struct DynShape {
    fields: Vec<(String, AnyDescriptor)>,
}

impl DynShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Redeclaring a name replaces the earlier descriptor in place.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: AnyDescriptor) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = descriptor,
            None => self.fields.push((name, descriptor)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, descriptor: AnyDescriptor) -> Self {
        self.insert(name, descriptor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AnyDescriptor> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, descriptor)| descriptor)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnyDescriptor)> {
        self.fields.iter().map(|(name, d)| (name.as_str(), d))
    }
}

impl<N: Into<String>> FromIterator<(N, AnyDescriptor)> for DynShape {
    fn from_iter<I: IntoIterator<Item = (N, AnyDescriptor)>>(iter: I) -> Self {
        let mut shape = DynShape::new();
        for (name, descriptor) in iter {
            shape.insert(name, descriptor);
        }
        shape
    }
}

impl Shape for DynShape {
    type Output = Map<String, Value>;

    fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn validate_fields(&self, record: &Map<String, Value>, presence: Presence) -> Outcome<Self::Output> {
        let mut data = Map::new();
        for (name, descriptor) in &self.fields {
            let value = presence
                .lookup(record, name)
                .ok_or_else(|| ValidationError::MissingKey(name.clone()))?;
            data.insert(name.clone(), descriptor.validate(value)?);
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{boolean, number, object, string};
    use serde_json::json;

    fn message_shape() -> DynShape {
        DynShape::new()
            .with("yes", boolean().erase())
            .with("message", string().erase())
            .with("num", number().erase())
    }

    #[test]
    fn test_dynamic_object_matches_typed_rules() {
        let schema = object(message_shape());

        let data = schema
            .validate(&json!({"num": 7, "message": "ok", "yes": true}))
            .unwrap();
        // Output follows shape order, not input order
        assert_eq!(data.keys().collect::<Vec<_>>(), vec!["yes", "message", "num"]);
        assert_eq!(data["yes"], json!(true));
        // Erased numbers come back exactly as given
        assert_eq!(data["num"], json!(7));

        let cases = [
            (json!(null), "Not an object"),
            (json!({"num": 7, "yes": "true", "message": 7}), "Not a boolean"),
            (json!({"message": "ok"}), "Missing key 'yes'"),
            (json!({"yes": true, "message": "ok", "num": 7, "foo": 7}), "Unknown key 'foo'"),
        ];
        for (input, expected) in cases {
            assert_eq!(schema.validate(&input).unwrap_err().to_string(), expected);
        }
    }

    #[test]
    fn test_integers_survive_dynamic_validation() {
        let schema = object(DynShape::new().with("id", number().erase()));
        let input = json!({"id": 9007199254740993u64});
        assert_eq!(schema.validate(&input).unwrap()["id"], input["id"]);
    }

    #[test]
    fn test_redeclared_field_replaces_in_place() {
        let shape = message_shape().with("yes", string().erase());
        assert_eq!(shape.len(), 3);
        assert_eq!(shape.keys(), vec!["yes", "message", "num"]);
        assert_eq!(shape.get("yes").map(|d| d.kind()), Some(Kind::String));
    }

    #[test]
    fn test_nested_dynamic_objects() {
        let inner = object(DynShape::new().with("id", number().erase())).erase();
        let schema = object(DynShape::from_iter([("meta", inner), ("name", string().erase())]));

        let data = schema
            .validate(&json!({"meta": {"id": 3}, "name": "x"}))
            .unwrap();
        assert_eq!(data["meta"], json!({"id": 3}));

        // Inner failures surface without a path prefix
        let err = schema
            .validate(&json!({"meta": {"id": "3"}, "name": "x"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Not a number");

        let err = schema
            .validate(&json!({"meta": {"id": 3, "extra": true}, "name": "x"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown key 'extra'");
    }

    #[test]
    fn test_empty_shape_accepts_only_empty_object() {
        let schema = object(DynShape::new());
        assert!(schema.validate(&json!({})).unwrap().is_empty());
        assert_eq!(
            schema.validate(&json!({"a": 1})).unwrap_err().to_string(),
            "Unknown key 'a'"
        );
    }
}
