//! Default literal conversion.
//!
//! A field's JSON default is walked together with the field's translated
//! schema, producing a [`ConnectValue`] of the same shape.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::connect::{
    ConnectSchema, ConnectSchemaBuilder, ConnectValue, Schema, SchemaKind, SchemaType, StructId,
    StructSchema, StructValue,
};
use crate::error::{ConversionErrorKind, SchemaConversionError};

use super::FieldPath;

/// Anything that can look up struct bodies by id.
pub trait StructLookup {
    fn struct_schema(&self, id: StructId) -> &StructSchema;

    /// The declared default literal of field `index` of struct `id`, when it
    /// has not been converted into the field's schema yet.
    fn default_literal(&self, _id: StructId, _index: usize) -> Option<&Value> {
        None
    }
}

impl StructLookup for ConnectSchemaBuilder {
    fn struct_schema(&self, id: StructId) -> &StructSchema {
        ConnectSchemaBuilder::struct_schema(self, id)
    }
}

impl StructLookup for ConnectSchema {
    fn struct_schema(&self, id: StructId) -> &StructSchema {
        ConnectSchema::struct_schema(self, id)
    }
}

/// Convert the default literal of the field at `path` against its schema.
///
/// A struct literal may omit fields that have a default of their own or are
/// optional. Members the struct does not declare are ignored.
pub fn convert_default<L: StructLookup + ?Sized>(
    literal: &Value,
    schema: &Schema,
    structs: &L,
    path: &FieldPath,
) -> Result<ConnectValue, SchemaConversionError> {
    convert_value(literal, schema, structs, path, &mut Vec::new())
}

/// `filling` holds the fields whose declared default is being expanded, so a
/// default that needs itself is rejected instead of recursing forever.
fn convert_value<L: StructLookup + ?Sized>(
    literal: &Value,
    schema: &Schema,
    structs: &L,
    path: &FieldPath,
    filling: &mut Vec<(StructId, usize)>,
) -> Result<ConnectValue, SchemaConversionError> {
    if literal.is_null() && schema.is_optional() {
        return Ok(ConnectValue::Null);
    }

    let invalid = || {
        SchemaConversionError::new(
            path.clone(),
            ConversionErrorKind::InvalidDefault {
                expected: schema.schema_type(),
                literal: literal.to_string(),
            },
        )
    };

    match schema.kind() {
        SchemaKind::Primitive(schema_type) => {
            primitive_default(literal, *schema_type).ok_or_else(invalid)
        }
        SchemaKind::Array(item) => literal
            .as_array()
            .ok_or_else(invalid)?
            .iter()
            .map(|element| convert_value(element, item, structs, path, filling))
            .collect::<Result<Vec<_>, _>>()
            .map(ConnectValue::Array),
        SchemaKind::Map { value, .. } => literal
            .as_object()
            .ok_or_else(invalid)?
            .iter()
            .map(|(k, v)| {
                convert_value(v, value, structs, path, filling)
                    .map(|converted| (k.clone(), converted))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(ConnectValue::Map),
        SchemaKind::Struct(id) => {
            let members = literal.as_object().ok_or_else(invalid)?;
            let mut value = StructValue::new(*id);
            for field in structs.struct_schema(*id).fields() {
                let field_value = match members.get(field.name()) {
                    Some(member) => convert_value(member, field.schema(), structs, path, filling)?,
                    None => match field.schema().default_value() {
                        Some(default) => default.clone(),
                        None => match structs.default_literal(*id, field.index()) {
                            Some(declared) => {
                                let key = (*id, field.index());
                                if filling.contains(&key) {
                                    return Err(invalid());
                                }
                                filling.push(key);
                                let converted =
                                    convert_value(declared, field.schema(), structs, path, filling);
                                filling.pop();
                                converted.map_err(|_| invalid())?
                            }
                            None if field.schema().is_optional() => ConnectValue::Null,
                            None => return Err(invalid()),
                        },
                    },
                };
                value = value.put(field.name(), field_value);
            }
            Ok(ConnectValue::Struct(value))
        }
    }
}

fn primitive_default(literal: &Value, schema_type: SchemaType) -> Option<ConnectValue> {
    match schema_type {
        SchemaType::Int32 => literal
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .map(ConnectValue::Int32),
        SchemaType::Int64 => literal.as_i64().map(ConnectValue::Int64),
        SchemaType::Float32 => literal
            .as_f64()
            .map(|f| f as f32)
            .filter(|f| f.is_finite())
            .map(ConnectValue::Float32),
        SchemaType::Float64 => literal.as_f64().map(ConnectValue::Float64),
        SchemaType::Boolean => literal.as_bool().map(ConnectValue::Boolean),
        SchemaType::String => literal.as_str().map(ConnectValue::from),
        SchemaType::Bytes => literal.as_str().and_then(latin1_bytes).map(ConnectValue::Bytes),
        SchemaType::Array | SchemaType::Map | SchemaType::Struct => None,
    }
}

/// Avro encodes a bytes default as a string with one code point per byte.
fn latin1_bytes(s: &str) -> Option<Vec<u8>> {
    s.chars().map(|c| u8::try_from(c).ok()).collect()
}
