//! The response value tree assembled by the executor.
//!
//! Unlike a hand-rolled byte-buffer writer, `Value` is built up per field and
//! stitched into insertion-ordered [`Object`]s; the whole tree is handed to
//! `serde_json` exactly once at the end. Field order is preserved because
//! `Object` is backed by an `IndexMap`, the same technique `juniper` uses for
//! its own `Value`/`Object` pair.

use std::iter::FromIterator;

use indexmap::IndexMap;
use serde::Serialize;

/// A fully resolved, JSON-serializable response value.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// GraphQL `null`, or the result of a nullable field that failed.
    Null,
    /// A scalar leaf value, already in its final JSON representation.
    Scalar(serde_json::Value),
    /// A list of values.
    List(Vec<Value>),
    /// An ordered object built up from field resolutions.
    Object(Object),
}

impl Value {
    /// Shorthand for [`Value::Null`].
    pub fn null() -> Self {
        Value::Null
    }

    /// Wraps a scalar `serde_json::Value`.
    pub fn scalar(v: impl Into<serde_json::Value>) -> Self {
        Value::Scalar(v.into())
    }

    /// Wraps an enum's textual representation.
    pub fn enum_value(s: impl Into<String>) -> Self {
        Value::Scalar(serde_json::Value::String(s.into()))
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

/// An insertion-ordered `field name -> Value` map.
///
/// Adding a field whose key already holds an object merges the two objects
/// (needed for same-alias field merging), mirroring `juniper::Object`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Object {
    fields: IndexMap<String, Value>,
}

impl Object {
    /// Creates an object with room for `size` fields without reallocating.
    pub fn with_capacity(size: usize) -> Self {
        Object {
            fields: IndexMap::with_capacity(size),
        }
    }

    /// Inserts or merges a field.
    pub fn add_field(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match (self.fields.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                for (k, v) in incoming.fields {
                    existing.add_field(k, v);
                }
            }
            (_, value) => {
                self.fields.insert(key, value);
            }
        }
    }

    /// The number of fields currently stored.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the object has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut obj = Object {
            fields: IndexMap::with_capacity(iter.size_hint().0),
        };
        for (k, v) in iter {
            obj.add_field(k, v);
        }
        obj
    }
}
