//! Error types for Avro schema conversion

use std::fmt;

use thiserror::Error;

use crate::connect::SchemaType;
use crate::convert::FieldPath;
use crate::schema::AvroType;

/// Errors raised while reading the JSON text of an Avro schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No schema text at all
    #[error("Parse error: schema text is empty")]
    Empty,
    /// The text is not well-formed JSON
    #[error("Parse error: invalid JSON: {0}")]
    InvalidJson(String),
    /// The JSON root is not an object
    #[error("Parse error: schema root must be a JSON object")]
    NotAnObject,
    /// The root object does not declare `"type": "record"`
    #[error("Parse error: schema root must be an Avro record")]
    NotARecord,
    /// The root record has no non-empty `fields` array
    #[error("Parse error: schema root must declare a non-empty 'fields' array")]
    MissingFields,
    /// A nested node does not have the shape of any Avro type
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
    /// Nesting exceeds the configured limit
    #[error("Invalid schema: nesting exceeds the maximum depth of {limit}")]
    TooDeep { limit: usize },
}

/// What went wrong while translating a recognized Avro construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionErrorKind {
    /// The type has no mapping onto a connect schema
    UnsupportedType(AvroType),
    /// A union that is not exactly `[T, "null"]` or `["null", T]`
    UnsupportedUnion,
    /// The non-null member of a nullable union is unsupported, possibly because
    /// of the type it contains
    UnsupportedUnionMember {
        member: AvroType,
        nested: Option<AvroType>,
    },
    /// A named reference that no record in the document declares
    UnresolvedReference(String),
    /// A default literal that does not fit the field's schema
    InvalidDefault {
        expected: SchemaType,
        literal: String,
    },
}

fn remediation(avro_type: AvroType) -> &'static str {
    match avro_type {
        AvroType::Enum => " The connector will not validate the values. Use string instead.",
        AvroType::Fixed => " The connector will not validate the length. Use bytes instead.",
        _ => "",
    }
}

impl fmt::Display for ConversionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionErrorKind::UnsupportedType(t) => write!(
                f,
                "Unsupported Avro schema type: '{}'.{}",
                t,
                remediation(*t)
            ),
            ConversionErrorKind::UnsupportedUnion => f.write_str(
                "Union Schemas are not supported, unless one value is null to represent an optional value.",
            ),
            ConversionErrorKind::UnsupportedUnionMember {
                member,
                nested: None,
            } => write!(
                f,
                "Union Schema contains an unsupported Avro schema type: '{}'.{}",
                member,
                remediation(*member)
            ),
            ConversionErrorKind::UnsupportedUnionMember {
                member,
                nested: Some(nested),
            } => write!(
                f,
                "Union Schema contains an unsupported Avro schema type: '{}', \
                 which contains an unsupported Avro schema type: '{}'.",
                member, nested
            ),
            ConversionErrorKind::UnresolvedReference(name) => {
                write!(f, "Unknown Avro schema type reference: '{}'.", name)
            }
            ConversionErrorKind::InvalidDefault { expected, literal } => write!(
                f,
                "Default value {} is not valid for schema type: '{}'.",
                literal, expected
            ),
        }
    }
}

fn subject(path: &FieldPath) -> String {
    if path.is_root() {
        "Schema is invalid.".to_string()
    } else {
        format!("Field '{}' is invalid.", path)
    }
}

/// A recognized Avro construct that cannot be expressed as a connect schema.
///
/// The message is derived only from `path` and `kind`, so callers may match on
/// the rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} {}", subject(.path), .kind)]
pub struct SchemaConversionError {
    /// Field names leading to the offending node
    pub path: FieldPath,
    /// The offending construct
    pub kind: ConversionErrorKind,
}

impl SchemaConversionError {
    /// Create a new error at `path`.
    pub fn new(path: FieldPath, kind: ConversionErrorKind) -> Self {
        Self { path, kind }
    }

    /// Unsupported standalone type at `path`.
    pub fn unsupported_type(path: &FieldPath, avro_type: AvroType) -> Self {
        Self::new(path.clone(), ConversionErrorKind::UnsupportedType(avro_type))
    }

    /// Union shape violation at `path`.
    pub fn unsupported_union(path: &FieldPath) -> Self {
        Self::new(path.clone(), ConversionErrorKind::UnsupportedUnion)
    }
}

/// Top-level error returned by [`crate::from_json`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The text is not a structurally valid Avro record schema
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The schema uses a construct without a connect mapping
    #[error(transparent)]
    Conversion(#[from] SchemaConversionError),
}

impl Error {
    /// The conversion error, if this is one.
    pub fn as_conversion(&self) -> Option<&SchemaConversionError> {
        match self {
            Error::Conversion(e) => Some(e),
            Error::Parse(_) => None,
        }
    }
}
