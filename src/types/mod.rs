//! # Type Resolution
//!
//! Maps field type identifiers to PHPDoc type expressions.
//!
//! The mapping is a [`TypeTable`]: a plain map from short type tag to a
//! [`TypeMapping`], which is either a fixed expression or a resolver function
//! that looks at the field's (context-applied) configuration. New field kinds
//! are added with [`TypeTable::register`]; the dispatch in
//! [`TypeTable::resolve`] never changes.
//!
//! ```rust
//! use pagestubs::schema::SchemaField;
//! use pagestubs::types::TypeTable;
//!
//! let table = TypeTable::default();
//! let photos = SchemaField::new("photos", "image").with_config("outputFormat", "array");
//! assert_eq!(table.resolve(&photos), "Pageimages");
//! assert_eq!(table.resolve(&SchemaField::new("w", "customWidget")), "mixed");
//! ```

mod resolvers;

#[cfg(test)]
mod tests;

pub use resolvers::{combo_class_name, DerefMode, OutputFormat};

use std::collections::HashMap;
use std::fmt;

use crate::schema::{normalize_type_id, SchemaField};

/// Fallback for unknown field types.
pub const MIXED: &str = "mixed";

/// Type tag of combo fields, the only kind that needs an auxiliary stub.
pub const COMBO_TAG: &str = "combo";

/// Resolver signature for configuration-dependent types.
pub type ResolveFn = fn(&SchemaField, &ResolveOptions) -> String;

/// Settings some resolvers consult.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Point fieldset-page fields at `Repeater<Name>Page` custom classes
    pub custom_page_class_compatible: bool,
    /// Prefix for generated class names when custom page classes are off
    pub class_prefix: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            custom_page_class_compatible: true,
            class_prefix: String::new(),
        }
    }
}

/// One entry of the type table.
#[derive(Clone)]
pub enum TypeMapping {
    /// Expression independent of configuration
    Fixed(String),
    /// Expression computed from the field
    Resolver(ResolveFn),
}

impl fmt::Debug for TypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeMapping::Fixed(expr) => f.debug_tuple("Fixed").field(expr).finish(),
            TypeMapping::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

const FIXED: &[(&str, &str)] = &[
    ("cache", "array"),
    ("checkbox", "int"),
    ("comments", "CommentArray"),
    ("datetime", "int|string"),
    ("decimal", "string"),
    ("email", "string"),
    ("float", "float"),
    ("integer", "int"),
    ("module", "string"),
    ("options", "SelectableOptionArray"),
    ("pageTable", "PageArray"),
    ("pageTitle", "string"),
    ("pageTitleLanguage", "string"),
    ("password", "Password"),
    ("selector", "string"),
    ("table", "TableRows"),
    ("text", "string"),
    ("textLanguage", "string"),
    ("textarea", "string"),
    ("textareaLanguage", "string"),
    ("toggle", "int"),
    ("url", "string"),
];

/// Field type tag → type expression table.
#[derive(Debug, Clone)]
pub struct TypeTable {
    entries: HashMap<String, TypeMapping>,
    options: ResolveOptions,
}

impl TypeTable {
    /// An empty table; everything resolves to [`MIXED`].
    pub fn empty(options: ResolveOptions) -> Self {
        TypeTable {
            entries: HashMap::new(),
            options,
        }
    }

    /// The built-in mappings for the core field types.
    pub fn with_defaults(options: ResolveOptions) -> Self {
        let mut table = TypeTable::empty(options);
        for (tag, expr) in FIXED {
            table.register(tag, TypeMapping::Fixed((*expr).to_string()));
        }
        table.register("file", TypeMapping::Resolver(resolvers::file_type));
        table.register("image", TypeMapping::Resolver(resolvers::image_type));
        table.register("page", TypeMapping::Resolver(resolvers::page_type));
        table.register(
            "fieldsetPage",
            TypeMapping::Resolver(resolvers::fieldset_page_type),
        );
        table.register("repeater", TypeMapping::Resolver(resolvers::repeater_type));
        table.register(
            "repeaterMatrix",
            TypeMapping::Resolver(resolvers::repeater_matrix_type),
        );
        table.register(COMBO_TAG, TypeMapping::Resolver(resolvers::combo_type));
        table
    }

    /// Add or replace a mapping. The identifier is normalised first.
    pub fn register(&mut self, type_id: &str, mapping: TypeMapping) -> Option<TypeMapping> {
        self.entries.insert(normalize_type_id(type_id), mapping)
    }

    pub fn get(&self, type_id: &str) -> Option<&TypeMapping> {
        self.entries.get(&normalize_type_id(type_id))
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve a field using its own type identifier.
    pub fn resolve(&self, field: &SchemaField) -> String {
        self.resolve_type(&field.type_id, field)
    }

    /// Resolve `type_id` for `field`; unknown identifiers give [`MIXED`].
    pub fn resolve_type(&self, type_id: &str, field: &SchemaField) -> String {
        match self.get(type_id) {
            Some(TypeMapping::Fixed(expr)) => expr.clone(),
            Some(TypeMapping::Resolver(resolve)) => resolve(field, &self.options),
            None => MIXED.to_string(),
        }
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        TypeTable::with_defaults(ResolveOptions::default())
    }
}
