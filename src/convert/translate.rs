//! Avro to connect schema translation
//!
//! | Avro Type        | Connect Schema               |
//! |------------------|------------------------------|
//! | null             | unsupported (unions only)    |
//! | boolean          | BOOLEAN                      |
//! | int              | INT32                        |
//! | long             | INT64                        |
//! | float            | FLOAT32                      |
//! | double           | FLOAT64                      |
//! | bytes            | BYTES                        |
//! | string           | STRING                       |
//! | record           | STRUCT (shared per fullname) |
//! | array            | ARRAY                        |
//! | map              | MAP (STRING keys)            |
//! | `[T, "null"]`    | optional T                   |
//! | other unions     | unsupported                  |
//! | enum             | unsupported                  |
//! | fixed            | unsupported                  |

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, trace};

use crate::connect::{ConnectSchema, ConnectSchemaBuilder, Schema, StructId, StructSchema};
use crate::error::{ConversionErrorKind, SchemaConversionError};
use crate::schema::{AvroNode, AvroType, PrimitiveType, RecordNode};

use super::defaults::{convert_default, StructLookup};
use super::FieldPath;

/// Translates one Avro type tree into a [`ConnectSchema`].
///
/// Holds the named-type registry for a single translation: each record
/// fullname maps to the struct built for it. A record is registered before
/// its fields are translated, so a field that refers back to the record gets
/// the same struct.
///
/// Field defaults are converted once every struct is complete, so a default
/// for a field that refers back to its own record sees all of its fields.
#[derive(Debug, Default)]
pub struct SchemaTranslator {
    builder: ConnectSchemaBuilder,
    registry: HashMap<String, StructId>,
    pending: Vec<PendingDefault>,
}

/// A default literal waiting for its struct to be complete.
#[derive(Debug)]
struct PendingDefault {
    id: StructId,
    index: usize,
    literal: Value,
    path: FieldPath,
}

impl SchemaTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate `node` and finish the schema.
    pub fn translate_schema(mut self, node: &AvroNode) -> Result<ConnectSchema, SchemaConversionError> {
        let root = self.translate(node, &FieldPath::root())?;

        let defaults = self
            .pending
            .iter()
            .map(|pending| {
                let schema = self.builder.struct_schema(pending.id).fields()[pending.index].schema();
                convert_default(&pending.literal, schema, &self, &pending.path)
                    .map(|value| (pending.id, pending.index, value))
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (id, index, value) in defaults {
            self.builder.set_default(id, index, value);
        }

        debug!(
            structs = self.registry.len(),
            defaults = self.pending.len(),
            "Translated Avro schema"
        );
        Ok(self.builder.build(root))
    }

    /// Translate `node`, found at `path`, into a schema node.
    ///
    /// Field defaults met on the way are only recorded; [`Self::translate_schema`]
    /// converts them.
    pub fn translate(
        &mut self,
        node: &AvroNode,
        path: &FieldPath,
    ) -> Result<Schema, SchemaConversionError> {
        match node {
            AvroNode::Primitive(primitive) => primitive_schema(*primitive, path),
            AvroNode::Record(record) => self.translate_record(record, path),
            AvroNode::Enum(_) => Err(SchemaConversionError::unsupported_type(path, AvroType::Enum)),
            AvroNode::Fixed(_) => Err(SchemaConversionError::unsupported_type(path, AvroType::Fixed)),
            AvroNode::Array(items) => Ok(Schema::array(self.translate(items, path)?)),
            AvroNode::Map(values) => Ok(Schema::map(Schema::string(), self.translate(values, path)?)),
            AvroNode::Union(_) => self.translate_union(node, path),
            AvroNode::Named(fullname) => match self.registry.get(fullname) {
                Some(id) => {
                    trace!(name = %fullname, "Resolved named reference");
                    Ok(Schema::structure(*id))
                }
                None => Err(SchemaConversionError::new(
                    path.clone(),
                    ConversionErrorKind::UnresolvedReference(fullname.clone()),
                )),
            },
        }
    }

    fn translate_record(
        &mut self,
        record: &RecordNode,
        path: &FieldPath,
    ) -> Result<Schema, SchemaConversionError> {
        let fullname = record.fullname();
        if let Some(id) = self.registry.get(&fullname) {
            trace!(name = %fullname, "Record already registered");
            return Ok(Schema::structure(*id));
        }

        let id = self.builder.declare_struct(fullname.clone());
        if let Some(doc) = &record.doc {
            self.builder.set_doc(id, doc.clone());
        }
        debug!(name = %fullname, fields = record.fields.len(), "Registered struct");
        self.registry.insert(fullname, id);

        for field in &record.fields {
            let field_path = path.child(field.name.clone());
            let schema = self.translate(&field.schema, &field_path)?;
            let index = self.builder.add_field(id, field.name.clone(), schema);
            if let Some(literal) = &field.default {
                self.pending.push(PendingDefault {
                    id,
                    index,
                    literal: literal.clone(),
                    path: field_path,
                });
            }
        }

        Ok(Schema::structure(id))
    }

    /// Only `[T, "null"]` and `["null", T]` are accepted; they fold into an
    /// optional T.
    fn translate_union(
        &mut self,
        union: &AvroNode,
        path: &FieldPath,
    ) -> Result<Schema, SchemaConversionError> {
        let member = union
            .nullable_inner()
            .ok_or_else(|| SchemaConversionError::unsupported_union(path))?;

        match self.translate(member, path) {
            Ok(schema) => Ok(schema.optional()),
            Err(err) if err.path == *path => Err(union_member_error(member, err)),
            Err(err) => Err(err),
        }
    }
}

impl StructLookup for SchemaTranslator {
    fn struct_schema(&self, id: StructId) -> &StructSchema {
        self.builder.struct_schema(id)
    }

    fn default_literal(&self, id: StructId, index: usize) -> Option<&Value> {
        self.pending
            .iter()
            .find(|pending| pending.id == id && pending.index == index)
            .map(|pending| &pending.literal)
    }
}

fn primitive_schema(
    primitive: PrimitiveType,
    path: &FieldPath,
) -> Result<Schema, SchemaConversionError> {
    match primitive {
        PrimitiveType::Null => Err(SchemaConversionError::unsupported_type(path, AvroType::Null)),
        PrimitiveType::Boolean => Ok(Schema::boolean()),
        PrimitiveType::Int => Ok(Schema::int32()),
        PrimitiveType::Long => Ok(Schema::int64()),
        PrimitiveType::Float => Ok(Schema::float32()),
        PrimitiveType::Double => Ok(Schema::float64()),
        PrimitiveType::Bytes => Ok(Schema::bytes()),
        PrimitiveType::String => Ok(Schema::string()),
    }
}

/// Restate an unsupported-type failure of a union's non-null member.
///
/// A container member names itself and the innermost unsupported type it
/// holds; any other member names the unsupported type alone.
fn union_member_error(member: &AvroNode, err: SchemaConversionError) -> SchemaConversionError {
    let innermost = match err.kind {
        ConversionErrorKind::UnsupportedType(t) => t,
        ConversionErrorKind::UnsupportedUnionMember { member, nested } => nested.unwrap_or(member),
        _ => return err,
    };

    let kind = if member.is_container() {
        ConversionErrorKind::UnsupportedUnionMember {
            member: member.avro_type(),
            nested: Some(innermost),
        }
    } else {
        ConversionErrorKind::UnsupportedUnionMember {
            member: innermost,
            nested: None,
        }
    };
    SchemaConversionError::new(err.path, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect::{ConnectValue, SchemaKind, SchemaType, StructValue};
    use crate::schema::{EnumNode, FieldNode, FixedNode, Name};

    fn null() -> AvroNode {
        AvroNode::Primitive(PrimitiveType::Null)
    }

    fn string() -> AvroNode {
        AvroNode::Primitive(PrimitiveType::String)
    }

    fn record(name: &str, fields: Vec<FieldNode>) -> AvroNode {
        AvroNode::Record(RecordNode::new(Name::new(name), fields))
    }

    fn enum_node() -> AvroNode {
        AvroNode::Enum(EnumNode {
            name: Name::new("E"),
            symbols: vec!["ONE".to_string()],
        })
    }

    fn translate_field(field_type: AvroNode) -> Result<ConnectSchema, SchemaConversionError> {
        SchemaTranslator::new()
            .translate_schema(&record("R", vec![FieldNode::new("f", field_type)]))
    }

    fn kind_of(field_type: AvroNode) -> ConversionErrorKind {
        translate_field(field_type).unwrap_err().kind
    }

    #[test]
    fn test_primitives() {
        let cases = [
            (PrimitiveType::Boolean, SchemaType::Boolean),
            (PrimitiveType::Int, SchemaType::Int32),
            (PrimitiveType::Long, SchemaType::Int64),
            (PrimitiveType::Float, SchemaType::Float32),
            (PrimitiveType::Double, SchemaType::Float64),
            (PrimitiveType::Bytes, SchemaType::Bytes),
            (PrimitiveType::String, SchemaType::String),
        ];
        for (primitive, expected) in cases {
            let schema = translate_field(AvroNode::Primitive(primitive)).unwrap();
            let field = schema.field("f").unwrap();
            assert_eq!(field.schema().schema_type(), expected);
            assert!(!field.schema().is_optional());
        }
    }

    #[test]
    fn test_standalone_null_is_unsupported() {
        assert_eq!(kind_of(null()), ConversionErrorKind::UnsupportedType(AvroType::Null));

        let err = SchemaTranslator::new().translate_schema(&null()).unwrap_err();
        assert!(err.path.is_root());
    }

    #[test]
    fn test_map_has_string_keys() {
        let schema = translate_field(AvroNode::Map(Box::new(string()))).unwrap();
        let map = schema.field("f").unwrap().schema();
        assert_eq!(map.key_schema(), Some(&Schema::string()));
        assert_eq!(map.value_schema(), Some(&Schema::string()));
    }

    #[test]
    fn test_union_folds_to_optional() {
        for members in [vec![string(), null()], vec![null(), string()]] {
            let schema = translate_field(AvroNode::Union(members)).unwrap();
            assert_eq!(schema.field("f").unwrap().schema(), &Schema::string().optional());
        }
    }

    #[test]
    fn test_union_shapes_rejected() {
        for members in [
            vec![],
            vec![string()],
            vec![string(), AvroNode::Primitive(PrimitiveType::Int)],
            vec![string(), null(), AvroNode::Primitive(PrimitiveType::Int)],
        ] {
            assert_eq!(
                kind_of(AvroNode::Union(members)),
                ConversionErrorKind::UnsupportedUnion
            );
        }
    }

    #[test]
    fn test_union_member_errors() {
        assert_eq!(
            kind_of(AvroNode::Union(vec![null(), enum_node()])),
            ConversionErrorKind::UnsupportedUnionMember {
                member: AvroType::Enum,
                nested: None
            }
        );

        let fixed = AvroNode::Fixed(FixedNode {
            name: Name::new("F"),
            size: 16,
        });
        assert_eq!(
            kind_of(AvroNode::Union(vec![fixed, null()])),
            ConversionErrorKind::UnsupportedUnionMember {
                member: AvroType::Fixed,
                nested: None
            }
        );

        assert_eq!(
            kind_of(AvroNode::Union(vec![AvroNode::Map(Box::new(null())), null()])),
            ConversionErrorKind::UnsupportedUnionMember {
                member: AvroType::Map,
                nested: Some(AvroType::Null)
            }
        );
    }

    #[test]
    fn test_deeper_union_member_errors_keep_two_levels() {
        let inner = AvroNode::Array(Box::new(AvroNode::Map(Box::new(enum_node()))));
        assert_eq!(
            kind_of(AvroNode::Union(vec![inner, null()])),
            ConversionErrorKind::UnsupportedUnionMember {
                member: AvroType::Array,
                nested: Some(AvroType::Enum)
            }
        );

        let inner = AvroNode::Array(Box::new(AvroNode::Union(vec![enum_node(), null()])));
        assert_eq!(
            kind_of(AvroNode::Union(vec![null(), inner])),
            ConversionErrorKind::UnsupportedUnionMember {
                member: AvroType::Array,
                nested: Some(AvroType::Enum)
            }
        );
    }

    #[test]
    fn test_errors_inside_union_records_keep_their_path() {
        let inner = record("Inner", vec![FieldNode::new("e", enum_node())]);
        let err = translate_field(AvroNode::Union(vec![null(), inner])).unwrap_err();
        assert_eq!(err.path.to_string(), "f.e");
        assert_eq!(err.kind, ConversionErrorKind::UnsupportedType(AvroType::Enum));
    }

    #[test]
    fn test_self_reference_shares_struct() {
        let node = record(
            "Node",
            vec![
                FieldNode::new("label", string()),
                FieldNode::new(
                    "children",
                    AvroNode::Array(Box::new(AvroNode::Named("Node".to_string()))),
                ),
            ],
        );
        let schema = SchemaTranslator::new().translate_schema(&node).unwrap();

        assert_eq!(schema.structs().len(), 1);
        let root = schema.root().struct_id().unwrap();
        let children = schema.field("children").unwrap().schema();
        match children.kind() {
            SchemaKind::Array(item) => assert_eq!(item.struct_id(), Some(root)),
            other => panic!("Expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults_convert_after_struct_is_complete() {
        let node = record(
            "Node",
            vec![
                FieldNode::new(
                    "next",
                    AvroNode::Union(vec![null(), AvroNode::Named("Node".to_string())]),
                )
                .with_default(serde_json::json!({"next": null})),
                FieldNode::new("label", string()).with_default(serde_json::json!("x")),
            ],
        );
        let schema = SchemaTranslator::new().translate_schema(&node).unwrap();
        let root = schema.root().struct_id().unwrap();

        let expected = ConnectValue::Struct(
            StructValue::new(root)
                .put("next", ConnectValue::Null)
                .put("label", "x"),
        );
        assert_eq!(
            schema.field("next").unwrap().schema().default_value(),
            Some(&expected)
        );
    }

    #[test]
    fn test_unresolved_reference() {
        let kind = kind_of(AvroNode::Named("Missing".to_string()));
        assert_eq!(
            kind,
            ConversionErrorKind::UnresolvedReference("Missing".to_string())
        );
    }

    #[test]
    fn test_nested_path() {
        let inner = record("Inner", vec![FieldNode::new("inner", enum_node())]);
        let outer = record("Outer", vec![FieldNode::new("outer", inner)]);
        let err = SchemaTranslator::new().translate_schema(&outer).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field 'outer.inner' is invalid. Unsupported Avro schema type: 'ENUM'. \
             The connector will not validate the values. Use string instead."
        );
    }
}
