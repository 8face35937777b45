//! Connect schema model.
//!
//! Named structs live in an arena owned by [`ConnectSchema`]. Every place a
//! struct is used holds its [`StructId`], so a recursive type is one arena
//! entry referenced from each point it recurs.

use std::collections::HashSet;
use std::fmt;

use super::value::ConnectValue;

/// Index of a struct in the arena of a [`ConnectSchema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructId(usize);

impl StructId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the struct in [`ConnectSchema::structs`].
    pub fn index(self) -> usize {
        self.0
    }
}

/// The type of a connect schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Int32,
    Int64,
    Float32,
    Float64,
    Boolean,
    String,
    Bytes,
    Array,
    Map,
    Struct,
}

impl SchemaType {
    /// Check if this is a primitive type.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, SchemaType::Array | SchemaType::Map | SchemaType::Struct)
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaType::Int32 => "INT32",
            SchemaType::Int64 => "INT64",
            SchemaType::Float32 => "FLOAT32",
            SchemaType::Float64 => "FLOAT64",
            SchemaType::Boolean => "BOOLEAN",
            SchemaType::String => "STRING",
            SchemaType::Bytes => "BYTES",
            SchemaType::Array => "ARRAY",
            SchemaType::Map => "MAP",
            SchemaType::Struct => "STRUCT",
        };
        f.write_str(name)
    }
}

/// Shape of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Primitive(SchemaType),
    Array(Box<Schema>),
    Map { key: Box<Schema>, value: Box<Schema> },
    Struct(StructId),
}

/// A schema node at one point of use: its shape plus the optional flag and
/// default value that apply there.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    kind: SchemaKind,
    optional: bool,
    default: Option<ConnectValue>,
}

impl Schema {
    fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            optional: false,
            default: None,
        }
    }

    fn primitive(schema_type: SchemaType) -> Self {
        Self::new(SchemaKind::Primitive(schema_type))
    }

    pub fn int32() -> Self {
        Self::primitive(SchemaType::Int32)
    }

    pub fn int64() -> Self {
        Self::primitive(SchemaType::Int64)
    }

    pub fn float32() -> Self {
        Self::primitive(SchemaType::Float32)
    }

    pub fn float64() -> Self {
        Self::primitive(SchemaType::Float64)
    }

    pub fn boolean() -> Self {
        Self::primitive(SchemaType::Boolean)
    }

    pub fn string() -> Self {
        Self::primitive(SchemaType::String)
    }

    pub fn bytes() -> Self {
        Self::primitive(SchemaType::Bytes)
    }

    /// An array of `item`.
    pub fn array(item: Schema) -> Self {
        Self::new(SchemaKind::Array(Box::new(item)))
    }

    /// A map from `key` to `value`.
    pub fn map(key: Schema, value: Schema) -> Self {
        Self::new(SchemaKind::Map {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    /// A use of the struct `id`.
    pub fn structure(id: StructId) -> Self {
        Self::new(SchemaKind::Struct(id))
    }

    /// Mark the schema optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, default: impl Into<ConnectValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    pub fn schema_type(&self) -> SchemaType {
        match &self.kind {
            SchemaKind::Primitive(t) => *t,
            SchemaKind::Array(_) => SchemaType::Array,
            SchemaKind::Map { .. } => SchemaType::Map,
            SchemaKind::Struct(_) => SchemaType::Struct,
        }
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn default_value(&self) -> Option<&ConnectValue> {
        self.default.as_ref()
    }

    /// The struct this node uses, if it is a struct.
    pub fn struct_id(&self) -> Option<StructId> {
        match self.kind {
            SchemaKind::Struct(id) => Some(id),
            _ => None,
        }
    }

    /// Item schema of an array.
    pub fn item_schema(&self) -> Option<&Schema> {
        match &self.kind {
            SchemaKind::Array(item) => Some(item),
            _ => None,
        }
    }

    /// Key schema of a map.
    pub fn key_schema(&self) -> Option<&Schema> {
        match &self.kind {
            SchemaKind::Map { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Value schema of a map.
    pub fn value_schema(&self) -> Option<&Schema> {
        match &self.kind {
            SchemaKind::Map { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// A field of a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    index: usize,
    schema: Schema,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of the field within its struct.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// The body of a named struct: its name, ordered fields and version.
#[derive(Debug, Clone, PartialEq)]
pub struct StructSchema {
    name: String,
    fields: Vec<Field>,
    version: Option<u32>,
    doc: Option<String>,
}

impl StructSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn version(&self) -> Option<u32> {
        self.version
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

/// Builds the struct arena of a [`ConnectSchema`].
///
/// A struct is declared before its fields are added, so a field may use the
/// struct it belongs to.
///
/// # Example
/// ```
/// use avro_connect::connect::{ConnectSchemaBuilder, Schema};
///
/// let mut builder = ConnectSchemaBuilder::new();
/// let node = builder.declare_struct("Node");
/// builder.add_field(node, "label", Schema::string());
/// builder.add_field(node, "children", Schema::array(Schema::structure(node)));
/// let schema = builder.build(Schema::structure(node));
///
/// assert_eq!(schema.name(), Some("Node"));
/// assert_eq!(schema.fields().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConnectSchemaBuilder {
    structs: Vec<StructSchema>,
}

impl ConnectSchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a struct with no fields yet.
    pub fn declare_struct(&mut self, name: impl Into<String>) -> StructId {
        let id = StructId::new(self.structs.len());
        self.structs.push(StructSchema {
            name: name.into(),
            fields: Vec::new(),
            version: None,
            doc: None,
        });
        id
    }

    /// Append a field to a declared struct and return its index.
    pub fn add_field(&mut self, id: StructId, name: impl Into<String>, schema: Schema) -> usize {
        let fields = &mut self.structs[id.0].fields;
        let index = fields.len();
        fields.push(Field {
            name: name.into(),
            index,
            schema,
        });
        index
    }

    /// Set the default of field `index` of struct `id`.
    pub fn set_default(&mut self, id: StructId, index: usize, default: ConnectValue) {
        self.structs[id.0].fields[index].schema.default = Some(default);
    }

    pub fn set_version(&mut self, id: StructId, version: u32) {
        self.structs[id.0].version = Some(version);
    }

    pub fn set_doc(&mut self, id: StructId, doc: impl Into<String>) {
        self.structs[id.0].doc = Some(doc.into());
    }

    /// A struct as declared so far.
    pub fn struct_schema(&self, id: StructId) -> &StructSchema {
        &self.structs[id.0]
    }

    /// Finish the schema with `root` as its top-level node.
    pub fn build(self, root: Schema) -> ConnectSchema {
        ConnectSchema {
            structs: self.structs,
            root,
        }
    }
}

/// A translated schema: a root node plus the structs it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectSchema {
    structs: Vec<StructSchema>,
    root: Schema,
}

impl ConnectSchema {
    pub fn root(&self) -> &Schema {
        &self.root
    }

    /// All structs, indexed by [`StructId::index`].
    pub fn structs(&self) -> &[StructSchema] {
        &self.structs
    }

    /// The body of struct `id`.
    pub fn struct_schema(&self, id: StructId) -> &StructSchema {
        &self.structs[id.0]
    }

    /// The struct a node uses, if it is a struct.
    pub fn resolve_struct(&self, schema: &Schema) -> Option<&StructSchema> {
        schema.struct_id().map(|id| self.struct_schema(id))
    }

    /// The root struct, if the root is a struct.
    pub fn root_struct(&self) -> Option<&StructSchema> {
        self.resolve_struct(&self.root)
    }

    /// Name of the root struct.
    pub fn name(&self) -> Option<&str> {
        self.root_struct().map(StructSchema::name)
    }

    /// Fields of the root struct; empty if the root is not a struct.
    pub fn fields(&self) -> &[Field] {
        self.root_struct().map(StructSchema::fields).unwrap_or(&[])
    }

    /// Look up a field of the root struct.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.root_struct().and_then(|s| s.field(name))
    }

    /// Version of the root struct.
    pub fn version(&self) -> Option<u32> {
        self.root_struct().and_then(StructSchema::version)
    }

    /// Attach a version to the root struct, as a schema registry would.
    pub fn with_version(mut self, version: u32) -> Self {
        if let Some(id) = self.root.struct_id() {
            self.structs[id.0].version = Some(version);
        }
        self
    }

    /// Compare two schemas by shape.
    ///
    /// Struct ids are not compared directly, since two equal schemas may number
    /// their structs differently. Instead struct bodies are compared, and a
    /// pair of structs already under comparison is taken as equal, which closes
    /// recursive types.
    pub fn structurally_eq(&self, other: &ConnectSchema) -> bool {
        let mut pairs = HashSet::new();
        schemas_eq(self, &self.root, other, &other.root, &mut pairs)
    }
}

fn schemas_eq(
    left: &ConnectSchema,
    a: &Schema,
    right: &ConnectSchema,
    b: &Schema,
    pairs: &mut HashSet<(StructId, StructId)>,
) -> bool {
    if a.optional != b.optional {
        return false;
    }
    let defaults_eq = match (&a.default, &b.default) {
        (None, None) => true,
        (Some(x), Some(y)) => values_eq(left, x, right, y),
        _ => false,
    };
    if !defaults_eq {
        return false;
    }

    match (&a.kind, &b.kind) {
        (SchemaKind::Primitive(x), SchemaKind::Primitive(y)) => x == y,
        (SchemaKind::Array(x), SchemaKind::Array(y)) => schemas_eq(left, x, right, y, pairs),
        (
            SchemaKind::Map { key: ka, value: va },
            SchemaKind::Map { key: kb, value: vb },
        ) => schemas_eq(left, ka, right, kb, pairs) && schemas_eq(left, va, right, vb, pairs),
        (SchemaKind::Struct(x), SchemaKind::Struct(y)) => {
            if !pairs.insert((*x, *y)) {
                return true;
            }
            let (sa, sb) = (left.struct_schema(*x), right.struct_schema(*y));
            sa.name == sb.name
                && sa.version == sb.version
                && sa.fields.len() == sb.fields.len()
                && sa.fields.iter().zip(&sb.fields).all(|(fa, fb)| {
                    fa.name == fb.name && schemas_eq(left, &fa.schema, right, &fb.schema, pairs)
                })
        }
        _ => false,
    }
}

fn values_eq(left: &ConnectSchema, a: &ConnectValue, right: &ConnectSchema, b: &ConnectValue) -> bool {
    match (a, b) {
        (ConnectValue::Array(x), ConnectValue::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(p, q)| values_eq(left, p, right, q))
        }
        (ConnectValue::Map(x), ConnectValue::Map(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y)
                    .all(|((kp, p), (kq, q))| kp == kq && values_eq(left, p, right, q))
        }
        (ConnectValue::Struct(x), ConnectValue::Struct(y)) => {
            left.struct_schema(x.schema()).name == right.struct_schema(y.schema()).name
                && x.len() == y.len()
                && x.fields()
                    .zip(y.fields())
                    .all(|((np, p), (nq, q))| np == nq && values_eq(left, p, right, q))
        }
        _ => a == b,
    }
}
