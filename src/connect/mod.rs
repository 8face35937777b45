//! Connect schema model
//!
//! The structural schema that Avro schemas are translated into: structs,
//! fields, primitives, arrays and maps, each use carrying an optional flag and
//! a default value.

mod schema;
mod value;

pub use schema::{
    ConnectSchema, ConnectSchemaBuilder, Field, Schema, SchemaKind, SchemaType, StructId,
    StructSchema,
};
pub use value::{ConnectValue, StructValue};
