//! Avro to connect schema conversion
//!
//! This module walks a parsed Avro type tree and builds the equivalent
//! connect schema, converting field default literals along the way.

mod defaults;
mod path;
mod translate;

pub use defaults::{convert_default, StructLookup};
pub use path::FieldPath;
pub use translate::SchemaTranslator;
