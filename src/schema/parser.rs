//! JSON schema parser for Avro schemas.
//!
//! Parses Avro schema JSON into the [`AvroNode`] tree. Only the shape of each
//! node is checked here; whether it can be translated is the translator's call.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::warn;

use crate::api::ConvertOptions;
use crate::error::ParseError;
use crate::schema::{AvroNode, EnumNode, FieldNode, FixedNode, Name, PrimitiveType, RecordNode};

/// Parse an Avro record schema from a JSON string.
///
/// # Example
/// ```
/// use avro_connect::schema::{parse_schema, AvroNode};
///
/// let schema = parse_schema(
///     r#"{"type": "record", "name": "K", "fields": [{"name": "k", "type": "string"}]}"#,
/// )
/// .unwrap();
/// assert!(matches!(schema, AvroNode::Record(_)));
/// ```
pub fn parse_schema(json: &str) -> Result<AvroNode, ParseError> {
    parse_schema_with_options(json, &ConvertOptions::default())
}

/// Parse an Avro record schema from a JSON string with validation options.
///
/// The root must be a JSON object declaring `"type": "record"` and a non-empty
/// `fields` array.
pub fn parse_schema_with_options(
    json: &str,
    options: &ConvertOptions,
) -> Result<AvroNode, ParseError> {
    if json.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let value: Value =
        serde_json::from_str(json).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    let root = value.as_object().ok_or(ParseError::NotAnObject)?;
    if root.get("type").and_then(Value::as_str) != Some("record") {
        return Err(ParseError::NotARecord);
    }
    match root.get("fields").and_then(Value::as_array) {
        Some(fields) if !fields.is_empty() => {}
        _ => return Err(ParseError::MissingFields),
    }

    let mut parser = SchemaParser::new()
        .with_strict(options.strict_names)
        .with_max_depth(options.max_depth);
    parser.parse(&value)
}

/// Schema parser with named type resolution context.
///
/// Tracks the namespace in scope and the fullnames declared so far, so that
/// references resolve the way Avro resolves them: against the enclosing
/// namespace first, then verbatim.
#[derive(Debug)]
pub struct SchemaParser {
    /// Fullnames of the records, enums and fixed types declared so far
    declared: HashSet<String>,
    /// Current namespace for resolving unqualified names
    current_namespace: Option<String>,
    /// Whether invalid names are errors rather than warnings
    strict_schema: bool,
    max_depth: usize,
    depth: usize,
}

impl Default for SchemaParser {
    fn default() -> Self {
        Self {
            declared: HashSet::new(),
            current_namespace: None,
            strict_schema: false,
            max_depth: ConvertOptions::DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }
}

impl SchemaParser {
    /// Create a new SchemaParser with default settings (permissive mode).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to use strict name validation.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict_schema = strict;
        self
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Fullnames declared so far.
    pub fn declared_names(&self) -> &HashSet<String> {
        &self.declared
    }

    /// Parse a JSON value into an AvroNode.
    pub fn parse(&mut self, value: &Value) -> Result<AvroNode, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let node = match value {
            Value::String(s) => Ok(self.parse_string_schema(s)),
            Value::Object(obj) => self.parse_object_schema(obj),
            Value::Array(arr) => self.parse_union_schema(arr),
            _ => Err(ParseError::InvalidSchema(format!(
                "Expected string, object, or array, found: {}",
                value
            ))),
        };
        self.depth -= 1;
        node
    }

    /// Parse a primitive type or named type reference from a string.
    fn parse_string_schema(&self, s: &str) -> AvroNode {
        match PrimitiveType::from_name(s) {
            Some(primitive) => AvroNode::Primitive(primitive),
            None => AvroNode::Named(self.resolve_reference(s)),
        }
    }

    /// Parse a complex type from a JSON object.
    fn parse_object_schema(&mut self, obj: &Map<String, Value>) -> Result<AvroNode, ParseError> {
        let type_str = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::InvalidSchema(format!("No type: {}", Value::from(obj.clone()))))?;

        // logicalType annotations are dropped; only the underlying primitive is kept
        if let Some(primitive) = PrimitiveType::from_name(type_str) {
            return Ok(AvroNode::Primitive(primitive));
        }

        match type_str {
            "record" => self.parse_record_schema(obj),
            "enum" => self.parse_enum_schema(obj),
            "array" => self.parse_array_schema(obj),
            "map" => self.parse_map_schema(obj),
            "fixed" => self.parse_fixed_schema(obj),
            other => Ok(AvroNode::Named(self.resolve_reference(other))),
        }
    }

    /// Parse a union schema from a JSON array.
    fn parse_union_schema(&mut self, arr: &[Value]) -> Result<AvroNode, ParseError> {
        let members = arr
            .iter()
            .map(|v| self.parse(v))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen_types = HashSet::new();
        for (i, member) in members.iter().enumerate() {
            if matches!(member, AvroNode::Union(_)) {
                return Err(ParseError::InvalidSchema(format!(
                    "Union contains nested union at position {} (unions cannot be nested)",
                    i
                )));
            }
            let type_key = type_key(member);
            if !seen_types.insert(type_key.clone()) {
                return Err(ParseError::InvalidSchema(format!(
                    "Union contains duplicate type '{}' at position {}",
                    type_key, i
                )));
            }
        }

        Ok(AvroNode::Union(members))
    }

    /// Parse a record schema.
    fn parse_record_schema(&mut self, obj: &Map<String, Value>) -> Result<AvroNode, ParseError> {
        let name = self.declare(obj, "Record")?;

        let fields_value = obj.get("fields").and_then(Value::as_array).ok_or_else(|| {
            ParseError::InvalidSchema(format!("Record '{}' missing 'fields' array", name))
        })?;

        // Nested types inherit this record's namespace
        let prev_namespace =
            std::mem::replace(&mut self.current_namespace, name.namespace.clone());
        let fields = fields_value
            .iter()
            .map(|f| self.parse_field_schema(f))
            .collect::<Result<Vec<_>, _>>();
        self.current_namespace = prev_namespace;
        let fields = fields?;

        let mut field_names = HashSet::new();
        for field in &fields {
            if !field_names.insert(field.name.as_str()) {
                return Err(ParseError::InvalidSchema(format!(
                    "Record '{}' has duplicate field '{}'",
                    name, field.name
                )));
            }
        }

        Ok(AvroNode::Record(RecordNode {
            name,
            fields,
            doc: obj.get("doc").and_then(Value::as_str).map(String::from),
        }))
    }

    /// Parse a field schema within a record.
    fn parse_field_schema(&mut self, value: &Value) -> Result<FieldNode, ParseError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ParseError::InvalidSchema("Field must be an object".to_string()))?;

        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::InvalidSchema("Field missing 'name'".to_string()))?
            .to_string();

        self.validate_name(&name, "Field")?;

        let type_value = obj.get("type").ok_or_else(|| {
            ParseError::InvalidSchema(format!("Field '{}' missing 'type'", name))
        })?;

        let schema = self.parse(type_value)?;

        Ok(FieldNode {
            name,
            schema,
            default: obj.get("default").cloned(),
            doc: obj.get("doc").and_then(Value::as_str).map(String::from),
        })
    }

    /// Parse an enum schema.
    fn parse_enum_schema(&mut self, obj: &Map<String, Value>) -> Result<AvroNode, ParseError> {
        let name = self.declare(obj, "Enum")?;

        let symbols = obj
            .get("symbols")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ParseError::InvalidSchema(format!("Enum '{}' missing 'symbols' array", name))
            })?
            .iter()
            .map(|v| {
                v.as_str().map(String::from).ok_or_else(|| {
                    ParseError::InvalidSchema(format!("Enum '{}' has a non-string symbol", name))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for symbol in &symbols {
            self.validate_name(symbol, "Enum symbol")?;
        }

        Ok(AvroNode::Enum(EnumNode { name, symbols }))
    }

    /// Parse an array schema.
    fn parse_array_schema(&mut self, obj: &Map<String, Value>) -> Result<AvroNode, ParseError> {
        let items = obj
            .get("items")
            .ok_or_else(|| ParseError::InvalidSchema("Array missing 'items' field".to_string()))?;

        Ok(AvroNode::Array(Box::new(self.parse(items)?)))
    }

    /// Parse a map schema.
    fn parse_map_schema(&mut self, obj: &Map<String, Value>) -> Result<AvroNode, ParseError> {
        let values = obj
            .get("values")
            .ok_or_else(|| ParseError::InvalidSchema("Map missing 'values' field".to_string()))?;

        Ok(AvroNode::Map(Box::new(self.parse(values)?)))
    }

    /// Parse a fixed schema.
    fn parse_fixed_schema(&mut self, obj: &Map<String, Value>) -> Result<AvroNode, ParseError> {
        let name = self.declare(obj, "Fixed")?;

        let size = obj.get("size").and_then(Value::as_u64).ok_or_else(|| {
            ParseError::InvalidSchema(format!("Fixed '{}' missing 'size' field", name))
        })? as usize;

        Ok(AvroNode::Fixed(FixedNode { name, size }))
    }

    /// Read and register the name of a record, enum or fixed type.
    ///
    /// Registration happens before the body is parsed so that the body may
    /// refer to the type itself.
    fn declare(&mut self, obj: &Map<String, Value>, context: &str) -> Result<Name, ParseError> {
        let raw = obj.get("name").and_then(Value::as_str).ok_or_else(|| {
            ParseError::InvalidSchema(format!("{} missing 'name' field", context))
        })?;

        for part in raw.split('.') {
            self.validate_name(part, context)?;
        }

        let namespace = obj.get("namespace").and_then(Value::as_str);
        let name = Name::resolve(raw, namespace, self.current_namespace.as_deref());

        let fullname = name.fullname();
        if !self.declared.insert(fullname.clone()) {
            return Err(ParseError::InvalidSchema(format!(
                "Can't redefine: {}",
                fullname
            )));
        }

        Ok(name)
    }

    /// Resolve a type reference to the fullname it denotes.
    ///
    /// An unqualified name is looked up in the current namespace first, then
    /// as written. Unknown names keep their qualified form and are reported by
    /// the translator.
    fn resolve_reference(&self, name: &str) -> String {
        let qualified = match &self.current_namespace {
            Some(ns) if !name.contains('.') => format!("{}.{}", ns, name),
            _ => name.to_string(),
        };
        if !self.declared.contains(&qualified) && self.declared.contains(name) {
            return name.to_string();
        }
        qualified
    }

    /// Validate that a name follows Avro naming rules.
    ///
    /// Avro names must:
    /// - Start with [A-Za-z_]
    /// - Contain only [A-Za-z0-9_]
    fn validate_name(&self, name: &str, context: &str) -> Result<(), ParseError> {
        let problem = match name.chars().next() {
            None => Some(format!("{} name cannot be empty", context)),
            Some(first) if !first.is_ascii_alphabetic() && first != '_' => Some(format!(
                "{} name '{}' must start with a letter or underscore",
                context, name
            )),
            Some(_) => name
                .chars()
                .find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_')
                .map(|ch| {
                    format!(
                        "{} name '{}' contains invalid character '{}' (only alphanumeric and underscore allowed)",
                        context, name, ch
                    )
                }),
        };

        match problem {
            Some(msg) if self.strict_schema => Err(ParseError::InvalidSchema(msg)),
            Some(msg) => {
                warn!("{}", msg);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// Get a unique key for a node (for duplicate detection in unions).
fn type_key(node: &AvroNode) -> String {
    match node {
        AvroNode::Primitive(p) => p.name().to_string(),
        AvroNode::Array(_) => "array".to_string(),
        AvroNode::Map(_) => "map".to_string(),
        AvroNode::Union(_) => "union".to_string(),
        AvroNode::Record(r) => r.fullname(),
        AvroNode::Enum(e) => e.name.fullname(),
        AvroNode::Fixed(f) => f.name.fullname(),
        AvroNode::Named(n) => n.clone(),
    }
}
