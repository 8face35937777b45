//! Public API module.
//!
//! # Module Structure
//! - `convert`: `from_json`, `from_json_with_options` and `validate_json_schema`
//! - `options`: conversion options (`ConvertOptions`)

pub mod convert;
pub mod options;

pub use convert::{from_json, from_json_with_options, validate_json_schema};
pub use options::ConvertOptions;
