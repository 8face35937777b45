//! Schema conversion entry points.

use tracing::debug;

use crate::connect::ConnectSchema;
use crate::convert::SchemaTranslator;
use crate::error::Error;
use crate::schema::parse_schema_with_options;

use super::options::ConvertOptions;

/// Convert the JSON text of an Avro record schema into a connect schema.
///
/// Every named record becomes one struct, shared by every field that uses
/// it. Two-member unions with `null` become optional schemas. Enums, fixed
/// types, other unions and standalone `null` are rejected with a
/// [`crate::SchemaConversionError`] naming the offending field.
///
/// # Example
/// ```
/// use avro_connect::connect::ConnectValue;
/// use avro_connect::from_json;
///
/// let schema = from_json(
///     r#"{"type":"record","name":"K","fields":[{"name":"k","type":"string","default":"MISSING"}]}"#,
/// )
/// .unwrap();
///
/// assert_eq!(schema.name(), Some("K"));
/// let k = schema.field("k").unwrap().schema();
/// assert!(!k.is_optional());
/// assert_eq!(k.default_value(), Some(&ConnectValue::from("MISSING")));
/// ```
pub fn from_json(json: &str) -> Result<ConnectSchema, Error> {
    from_json_with_options(json, &ConvertOptions::default())
}

/// [`from_json`] with explicit options.
pub fn from_json_with_options(
    json: &str,
    options: &ConvertOptions,
) -> Result<ConnectSchema, Error> {
    let node = parse_schema_with_options(json, options)?;
    let schema = SchemaTranslator::new().translate_schema(&node)?;
    debug!(
        name = schema.name().unwrap_or_default(),
        fields = schema.fields().len(),
        "Converted Avro schema"
    );
    Ok(schema)
}

/// Check that the JSON text of an Avro schema converts, discarding the result.
pub fn validate_json_schema(json: &str) -> Result<(), Error> {
    from_json(json).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[test]
    fn test_validate_json_schema() {
        assert!(validate_json_schema(
            r#"{"type": "record", "name": "R", "fields": [{"name": "a", "type": "int"}]}"#
        )
        .is_ok());
        assert_eq!(
            validate_json_schema("[]"),
            Err(Error::Parse(ParseError::NotAnObject))
        );
    }

    #[test]
    fn test_options_reach_parser() {
        let json = r#"{"type": "record", "name": "R", "fields": [{"name": "a-b", "type": "int"}]}"#;
        assert!(from_json(json).is_ok());
        assert!(matches!(
            from_json_with_options(json, &ConvertOptions::new().with_strict_names(true)),
            Err(Error::Parse(ParseError::InvalidSchema(_)))
        ));
    }
}
