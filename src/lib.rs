//! Avro schema to connect schema conversion
//!
//! This library reads the JSON text of an Avro record schema and translates
//! it into a connect schema: structs, fields, primitives, arrays, maps and
//! optionality, with field defaults carried over as values.
//!
//! Recursive records become a single struct referenced wherever the record
//! recurs. Constructs without a safe mapping (enums, fixed types, general
//! unions, standalone `null`) are rejected with a message naming the field.
//!
//! # Example
//! ```
//! use avro_connect::from_json;
//!
//! let schema = from_json(
//!     r#"{"type": "record", "name": "Node", "namespace": "example",
//!         "fields": [
//!             {"name": "label", "type": "string"},
//!             {"name": "children", "type": {"type": "array", "items": "Node"}}
//!         ]}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(schema.name(), Some("example.Node"));
//! let children = schema.field("children").unwrap().schema();
//! assert_eq!(
//!     children.item_schema().and_then(|item| item.struct_id()),
//!     schema.root().struct_id()
//! );
//! ```

pub mod api;
pub mod connect;
pub mod convert;
pub mod error;
pub mod schema;

// Re-export main types
pub use api::{from_json, from_json_with_options, validate_json_schema, ConvertOptions};
pub use connect::{ConnectSchema, ConnectValue, Schema, SchemaType};
pub use convert::{FieldPath, SchemaTranslator};
pub use error::{ConversionErrorKind, Error, ParseError, SchemaConversionError};
pub use schema::{parse_schema, AvroNode, AvroType};
