//! Default values carried by connect schemas.

use std::collections::BTreeMap;

use serde_json::{Number, Value};

use super::StructId;

/// A value of a connect schema, as used for defaults.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectValue {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<ConnectValue>),
    /// Map with string keys.
    Map(BTreeMap<String, ConnectValue>),
    Struct(StructValue),
}

impl ConnectValue {
    /// Check if this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, ConnectValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConnectValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            ConnectValue::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ConnectValue]> {
        match self {
            ConnectValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Render the value as an Avro JSON default literal.
    ///
    /// Bytes become a string with one code point per byte, non-finite floats
    /// become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            ConnectValue::Null => Value::Null,
            ConnectValue::Boolean(b) => Value::Bool(*b),
            ConnectValue::Int32(i) => Value::from(*i),
            ConnectValue::Int64(i) => Value::from(*i),
            ConnectValue::Float32(f) => float_to_json(f64::from(*f)),
            ConnectValue::Float64(f) => float_to_json(*f),
            ConnectValue::String(s) => Value::String(s.clone()),
            ConnectValue::Bytes(bytes) => {
                Value::String(bytes.iter().map(|b| char::from(*b)).collect())
            }
            ConnectValue::Array(items) => {
                Value::Array(items.iter().map(ConnectValue::to_json).collect())
            }
            ConnectValue::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            ConnectValue::Struct(s) => Value::Object(
                s.fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn float_to_json(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

impl From<&str> for ConnectValue {
    fn from(s: &str) -> Self {
        ConnectValue::String(s.to_string())
    }
}

impl From<String> for ConnectValue {
    fn from(s: String) -> Self {
        ConnectValue::String(s)
    }
}

impl From<bool> for ConnectValue {
    fn from(b: bool) -> Self {
        ConnectValue::Boolean(b)
    }
}

impl From<i32> for ConnectValue {
    fn from(i: i32) -> Self {
        ConnectValue::Int32(i)
    }
}

impl From<i64> for ConnectValue {
    fn from(i: i64) -> Self {
        ConnectValue::Int64(i)
    }
}

impl From<StructValue> for ConnectValue {
    fn from(s: StructValue) -> Self {
        ConnectValue::Struct(s)
    }
}

/// An instance of a struct schema: field values in the struct's field order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    schema: StructId,
    fields: Vec<(String, ConnectValue)>,
}

impl StructValue {
    /// Create an empty instance of the struct `schema`.
    pub fn new(schema: StructId) -> Self {
        Self {
            schema,
            fields: Vec::new(),
        }
    }

    /// Set a field, replacing any previous value.
    pub fn put(mut self, name: impl Into<String>, value: impl Into<ConnectValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    /// The struct this value belongs to.
    pub fn schema(&self) -> StructId {
        self.schema
    }

    pub fn get(&self, name: &str) -> Option<&ConnectValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Field values in order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ConnectValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_struct_value_keeps_order_and_replaces() {
        let value = StructValue::new(StructId::new(0))
            .put("label", "default")
            .put("children", ConnectValue::Array(Vec::new()))
            .put("label", "other");

        let names: Vec<&str> = value.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["label", "children"]);
        assert_eq!(value.get("label").and_then(ConnectValue::as_str), Some("other"));
        assert_eq!(value.get("missing"), None);
    }

    #[test]
    fn test_to_json() {
        let value = ConnectValue::Struct(
            StructValue::new(StructId::new(0))
                .put("n", 7)
                .put("b", ConnectValue::Bytes(vec![0x00, 0xff]))
                .put("f", ConnectValue::Float32(f32::NAN)),
        );
        assert_eq!(
            value.to_json(),
            json!({"n": 7, "b": "\u{0000}\u{00ff}", "f": null})
        );
    }
}
