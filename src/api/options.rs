//! Conversion options.
//!
//! `ConvertOptions` controls how strictly the Avro schema text is read before
//! it is translated.

/// Options for [`crate::from_json_with_options`].
///
/// # Example
/// ```
/// use avro_connect::ConvertOptions;
///
/// let opts = ConvertOptions {
///     strict_names: true,
///     ..Default::default()
/// };
/// assert_eq!(opts.max_depth, ConvertOptions::DEFAULT_MAX_DEPTH);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Reject names that break the Avro naming rules (default: false).
    ///
    /// When false, such names are accepted and a warning is logged. Dotted
    /// field names such as `fullDocument.documentKey` rely on this.
    pub strict_names: bool,

    /// Maximum nesting depth of type definitions (default: 128).
    ///
    /// Parsing and translation recurse once per level, so this bounds their
    /// stack use.
    pub max_depth: usize,
}

impl ConvertOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    /// Create a new `ConvertOptions` with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether invalid names are errors.
    pub fn with_strict_names(mut self, strict_names: bool) -> Self {
        self.strict_names = strict_names;
        self
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            strict_names: false,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
