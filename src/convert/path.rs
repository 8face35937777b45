//! Field paths used in conversion error messages.

use std::fmt;

/// The field names leading from the root record to a node, rendered dotted.
///
/// Only record fields add a segment; arrays, maps and unions report the
/// enclosing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// The empty path of the root schema.
    pub fn root() -> Self {
        Self::default()
    }

    /// This path extended by one field name.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}
