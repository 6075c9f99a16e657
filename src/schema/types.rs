use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::naming::REPEATER_PREFIX;

/// Type-specific field settings (`outputFormat`, `maxFiles`, `derefAsPage`, ...).
pub type FieldConfig = BTreeMap<String, Value>;

/// Prefix the host platform puts on fieldtype class names.
pub const FIELDTYPE_PREFIX: &str = "Fieldtype";

/// Normalise a field type identifier to its short tag.
///
/// `FieldtypeRepeaterMatrix` and `repeaterMatrix` both become `repeaterMatrix`.
pub fn normalize_type_id(type_id: &str) -> String {
    let tag = type_id.strip_prefix(FIELDTYPE_PREFIX).unwrap_or(type_id);
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// A field definition as the schema store knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Field identifier, used as the `$name` of the property
    pub name: String,
    /// Field type identifier (`text`, `image`, `FieldtypePage`, ...)
    #[serde(rename = "type")]
    pub type_id: String,
    /// Display label
    #[serde(default)]
    pub label: String,
    /// Type-specific configuration
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: FieldConfig,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, type_id: impl Into<String>) -> Self {
        SchemaField {
            name: name.into(),
            type_id: type_id.into(),
            label: String::new(),
            config: FieldConfig::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Short type tag, see [`normalize_type_id`].
    pub fn type_tag(&self) -> String {
        normalize_type_id(&self.type_id)
    }

    pub fn config_value(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    pub fn config_i64(&self, key: &str) -> Option<i64> {
        match self.config.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Apply a per-template context on top of this field.
    ///
    /// Context config keys replace the field's own keys one by one; a context
    /// label replaces the label.
    pub fn in_context(&self, context: Option<&FieldContext>) -> SchemaField {
        let mut field = self.clone();
        if let Some(ctx) = context {
            if let Some(label) = &ctx.label {
                field.label = label.clone();
            }
            for (key, value) in &ctx.config {
                field.config.insert(key.clone(), value.clone());
            }
        }
        field
    }
}

/// Per-template override of a field's label and configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: FieldConfig,
}

/// A template as written in the schema document: fields are referenced by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDef {
    pub name: String,
    #[serde(default)]
    pub label: String,
    /// Explicit base class for the generated stub
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_class: Option<String>,
    /// Field group the template uses; defaults to the template name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fieldgroup: Option<String>,
    /// Ordered field names
    #[serde(default)]
    pub fields: Vec<String>,
    /// Per-field overrides keyed by field name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub contexts: BTreeMap<String, FieldContext>,
}

impl TemplateDef {
    pub fn fieldgroup_name(&self) -> &str {
        self.fieldgroup.as_deref().unwrap_or(&self.name)
    }
}

/// Resolved, immutable snapshot of a template handed to the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaTemplate {
    pub name: String,
    pub label: String,
    pub page_class: Option<String>,
    pub fieldgroup: String,
    pub fields: Vec<SchemaField>,
    pub contexts: BTreeMap<String, FieldContext>,
}

impl SchemaTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        SchemaTemplate {
            fieldgroup: name.clone(),
            name,
            label: String::new(),
            page_class: None,
            fields: Vec::new(),
            contexts: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_page_class(mut self, page_class: impl Into<String>) -> Self {
        self.page_class = Some(page_class.into());
        self
    }

    pub fn with_field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_context(mut self, field: impl Into<String>, context: FieldContext) -> Self {
        self.contexts.insert(field.into(), context);
        self
    }

    /// `repeater_*` templates back repeater items.
    pub fn is_repeater(&self) -> bool {
        self.name.starts_with(REPEATER_PREFIX)
    }

    /// The field as seen from this template, context applied.
    pub fn field_in_context(&self, field: &SchemaField) -> SchemaField {
        field.in_context(self.contexts.get(&field.name))
    }

    /// The base class override, ignoring blank values.
    pub fn page_class_override(&self) -> Option<&str> {
        self.page_class
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Whole schema document: the stand-in for the platform's schema store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub fields: Vec<SchemaField>,
    #[serde(default)]
    pub templates: Vec<TemplateDef>,
}

impl SchemaDocument {
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn template_def(&self, name: &str) -> Option<&TemplateDef> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Template names in document order.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.name.as_str())
    }

    /// Resolve a template snapshot with its field definitions attached.
    pub fn template(&self, name: &str) -> Result<SchemaTemplate, SchemaError> {
        let def = self
            .template_def(name)
            .ok_or_else(|| SchemaError::UnknownTemplate(name.to_string()))?;
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(def.fields.len());
        for field_name in &def.fields {
            if !seen.insert(field_name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    template: def.name.clone(),
                    field: field_name.clone(),
                });
            }
            let field = self
                .field(field_name)
                .ok_or_else(|| SchemaError::UnknownField {
                    template: def.name.clone(),
                    field: field_name.clone(),
                })?;
            fields.push(field.clone());
        }
        Ok(SchemaTemplate {
            name: def.name.clone(),
            label: def.label.clone(),
            page_class: def.page_class.clone(),
            fieldgroup: def.fieldgroup_name().to_string(),
            fields,
            contexts: def.contexts.clone(),
        })
    }

    /// Templates whose field list includes `field`.
    pub fn templates_using_field(&self, field: &str) -> Vec<&str> {
        self.templates
            .iter()
            .filter(|t| t.fields.iter().any(|f| f == field))
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Templates attached to the field group `fieldgroup`.
    pub fn templates_in_fieldgroup(&self, fieldgroup: &str) -> Vec<&str> {
        self.templates
            .iter()
            .filter(|t| t.fieldgroup_name() == fieldgroup)
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Reject duplicate definitions and dangling field references.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut names = HashSet::new();
        for field in &self.fields {
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateDefinition {
                    kind: "field",
                    name: field.name.clone(),
                });
            }
        }
        let mut names = HashSet::new();
        for template in &self.templates {
            if !names.insert(template.name.as_str()) {
                return Err(SchemaError::DuplicateDefinition {
                    kind: "template",
                    name: template.name.clone(),
                });
            }
            self.template(&template.name)?;
        }
        Ok(())
    }
}

/// Schema document inconsistencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No template with this name
    UnknownTemplate(String),
    /// A template references a field that is not defined
    UnknownField { template: String, field: String },
    /// A template lists the same field twice
    DuplicateField { template: String, field: String },
    /// Two fields or two templates share a name
    DuplicateDefinition { kind: &'static str, name: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::UnknownTemplate(name) => write!(f, "unknown template '{name}'"),
            SchemaError::UnknownField { template, field } => {
                write!(f, "template '{template}' references unknown field '{field}'")
            }
            SchemaError::DuplicateField { template, field } => {
                write!(f, "template '{template}' lists field '{field}' more than once")
            }
            SchemaError::DuplicateDefinition { kind, name } => {
                write!(f, "{kind} '{name}' is defined more than once")
            }
        }
    }
}

impl std::error::Error for SchemaError {}
