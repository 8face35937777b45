//! Avro schema types and parsing.
//!
//! This module defines the parsed Avro type tree and the JSON parser that
//! builds it.

mod parser;
mod types;

pub use parser::{parse_schema, parse_schema_with_options, SchemaParser};
pub use types::*;
