//! Avro schema types and representations.
//!
//! The tree produced by the parser. It only records the shape of the document;
//! whether a node can be translated is decided later by the translator.

use std::fmt;

use serde_json::Value;

/// An Avro primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Null type - no value.
    Null,
    /// Boolean type.
    Boolean,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit IEEE 754 floating-point.
    Float,
    /// 64-bit IEEE 754 floating-point.
    Double,
    /// Sequence of bytes.
    Bytes,
    /// Unicode string.
    String,
}

impl PrimitiveType {
    /// Look up a primitive by its Avro type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(PrimitiveType::Null),
            "boolean" => Some(PrimitiveType::Boolean),
            "int" => Some(PrimitiveType::Int),
            "long" => Some(PrimitiveType::Long),
            "float" => Some(PrimitiveType::Float),
            "double" => Some(PrimitiveType::Double),
            "bytes" => Some(PrimitiveType::Bytes),
            "string" => Some(PrimitiveType::String),
            _ => None,
        }
    }

    /// The Avro type name.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Null => "null",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Bytes => "bytes",
            PrimitiveType::String => "string",
        }
    }
}

/// The name of a record, enum or fixed type.
///
/// `namespace` is already the effective one: an explicit `namespace`
/// attribute, the prefix of a dotted name, or the namespace inherited from the
/// enclosing record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    /// The unqualified name.
    pub name: String,
    /// The effective namespace, if any.
    pub namespace: Option<String>,
}

impl Name {
    /// Create a name with no namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Resolve a declared name against its `namespace` attribute and the
    /// namespace in scope.
    ///
    /// A dotted name is already a fullname and the attribute is ignored.
    /// An empty namespace means the null namespace.
    pub fn resolve(name: &str, namespace: Option<&str>, enclosing: Option<&str>) -> Self {
        if let Some((ns, short)) = name.rsplit_once('.') {
            return Self {
                name: short.to_string(),
                namespace: Some(ns.to_string()),
            };
        }
        let namespace = match namespace {
            Some("") => None,
            Some(ns) => Some(ns.to_string()),
            None => enclosing.filter(|ns| !ns.is_empty()).map(String::from),
        };
        Self {
            name: name.to_string(),
            namespace,
        }
    }

    /// Get the fully qualified name.
    pub fn fullname(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}.{}", ns, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A node of the parsed Avro type tree.
#[derive(Debug, Clone, PartialEq)]
pub enum AvroNode {
    /// A primitive type.
    Primitive(PrimitiveType),
    /// Record type with named fields.
    Record(RecordNode),
    /// Enumeration type.
    Enum(EnumNode),
    /// Fixed-size byte array.
    Fixed(FixedNode),
    /// Array of items with a single schema.
    Array(Box<AvroNode>),
    /// Map with string keys and values of a single schema.
    Map(Box<AvroNode>),
    /// Union of schemas, in declared order.
    Union(Vec<AvroNode>),
    /// Reference to a previously declared named type, by fullname.
    Named(String),
}

/// A record declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordNode {
    pub name: Name,
    pub fields: Vec<FieldNode>,
    pub doc: Option<String>,
}

impl RecordNode {
    /// Create a new record with the given name and fields.
    pub fn new(name: Name, fields: Vec<FieldNode>) -> Self {
        Self {
            name,
            fields,
            doc: None,
        }
    }

    /// Get the fully qualified name.
    pub fn fullname(&self) -> String {
        self.name.fullname()
    }
}

/// A field within a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    /// The name of the field, verbatim (it may contain dots).
    pub name: String,
    /// The schema of the field's value.
    pub schema: AvroNode,
    /// The default literal, untouched.
    pub default: Option<Value>,
    pub doc: Option<String>,
}

impl FieldNode {
    /// Create a new field with the given name and schema.
    pub fn new(name: impl Into<String>, schema: AvroNode) -> Self {
        Self {
            name: name.into(),
            schema,
            default: None,
            doc: None,
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumNode {
    pub name: Name,
    pub symbols: Vec<String>,
}

/// A fixed declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedNode {
    pub name: Name,
    pub size: usize,
}

/// The type tag of a node, as it appears in conversion error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvroType {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Record,
    Enum,
    Fixed,
    Array,
    Map,
    Union,
}

impl fmt::Display for AvroType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            AvroType::Null => "NULL",
            AvroType::Boolean => "BOOLEAN",
            AvroType::Int => "INT",
            AvroType::Long => "LONG",
            AvroType::Float => "FLOAT",
            AvroType::Double => "DOUBLE",
            AvroType::Bytes => "BYTES",
            AvroType::String => "STRING",
            AvroType::Record => "RECORD",
            AvroType::Enum => "ENUM",
            AvroType::Fixed => "FIXED",
            AvroType::Array => "ARRAY",
            AvroType::Map => "MAP",
            AvroType::Union => "UNION",
        };
        f.write_str(tag)
    }
}

impl From<PrimitiveType> for AvroType {
    fn from(primitive: PrimitiveType) -> Self {
        match primitive {
            PrimitiveType::Null => AvroType::Null,
            PrimitiveType::Boolean => AvroType::Boolean,
            PrimitiveType::Int => AvroType::Int,
            PrimitiveType::Long => AvroType::Long,
            PrimitiveType::Float => AvroType::Float,
            PrimitiveType::Double => AvroType::Double,
            PrimitiveType::Bytes => AvroType::Bytes,
            PrimitiveType::String => AvroType::String,
        }
    }
}

impl AvroNode {
    /// The type tag of this node.
    ///
    /// References can only ever resolve to records, so they report `RECORD`.
    pub fn avro_type(&self) -> AvroType {
        match self {
            AvroNode::Primitive(p) => (*p).into(),
            AvroNode::Record(_) | AvroNode::Named(_) => AvroType::Record,
            AvroNode::Enum(_) => AvroType::Enum,
            AvroNode::Fixed(_) => AvroType::Fixed,
            AvroNode::Array(_) => AvroType::Array,
            AvroNode::Map(_) => AvroType::Map,
            AvroNode::Union(_) => AvroType::Union,
        }
    }

    /// Check if this node is the `null` primitive.
    pub fn is_null(&self) -> bool {
        matches!(self, AvroNode::Primitive(PrimitiveType::Null))
    }

    /// Check if this node is an array or a map.
    pub fn is_container(&self) -> bool {
        matches!(self, AvroNode::Array(_) | AvroNode::Map(_))
    }

    /// Get the fully qualified name of a named type or reference.
    pub fn fullname(&self) -> Option<String> {
        match self {
            AvroNode::Record(r) => Some(r.fullname()),
            AvroNode::Enum(e) => Some(e.name.fullname()),
            AvroNode::Fixed(f) => Some(f.name.fullname()),
            AvroNode::Named(n) => Some(n.clone()),
            _ => None,
        }
    }

    /// For a two-member union with exactly one `null`, get the other member.
    pub fn nullable_inner(&self) -> Option<&AvroNode> {
        match self {
            AvroNode::Union(members) if members.len() == 2 => {
                match (members[0].is_null(), members[1].is_null()) {
                    (true, false) => Some(&members[1]),
                    (false, true) => Some(&members[0]),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_with_namespace() {
        let name = Name::resolve("N", Some("ns"), None);
        assert_eq!(name.fullname(), "ns.N");
    }

    #[test]
    fn test_dotted_name_ignores_namespace() {
        let name = Name::resolve("a.b.N", Some("mustBeIgnored"), Some("outer"));
        assert_eq!(name.name, "N");
        assert_eq!(name.namespace.as_deref(), Some("a.b"));
        assert_eq!(name.fullname(), "a.b.N");
    }

    #[test]
    fn test_name_inherits_enclosing_namespace() {
        assert_eq!(
            Name::resolve("Foo", None, Some("org.apache.avro")).fullname(),
            "org.apache.avro.Foo"
        );
        assert_eq!(Name::resolve("Foo", None, None).fullname(), "Foo");
        assert_eq!(Name::resolve("Foo", Some(""), Some("outer")).fullname(), "Foo");
    }

    #[test]
    fn test_avro_type_tags() {
        assert_eq!(AvroType::Enum.to_string(), "ENUM");
        assert_eq!(AvroType::Fixed.to_string(), "FIXED");
        assert_eq!(
            AvroNode::Primitive(PrimitiveType::Null).avro_type().to_string(),
            "NULL"
        );
        assert_eq!(
            AvroNode::Map(Box::new(AvroNode::Primitive(PrimitiveType::Null))).avro_type(),
            AvroType::Map
        );
    }

    #[test]
    fn test_nullable_union() {
        let string = AvroNode::Primitive(PrimitiveType::String);
        let null = AvroNode::Primitive(PrimitiveType::Null);

        let union = AvroNode::Union(vec![null.clone(), string.clone()]);
        assert_eq!(union.nullable_inner(), Some(&string));

        let union = AvroNode::Union(vec![string.clone(), null.clone()]);
        assert_eq!(union.nullable_inner(), Some(&string));

        let union = AvroNode::Union(vec![string.clone(), string.clone()]);
        assert_eq!(union.nullable_inner(), None);

        let union = AvroNode::Union(vec![string, null.clone(), null]);
        assert_eq!(union.nullable_inner(), None);
    }

    #[test]
    fn test_primitive_names_round_trip() {
        for name in ["null", "boolean", "int", "long", "float", "double", "bytes", "string"] {
            assert_eq!(PrimitiveType::from_name(name).map(|p| p.name()), Some(name));
        }
        assert_eq!(PrimitiveType::from_name("record"), None);
    }
}
