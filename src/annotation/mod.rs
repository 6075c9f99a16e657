//! # Annotation Builder
//!
//! Turns a [`SchemaTemplate`] into the text payload of the annotation block:
//!
//! ```text
//!  *
//!  * Template: event (Event)
//!  * @property string $title Title
//!  * @property Pageimages $photos Photos
//!  *
//! ```
//!
//! Field order is the template's order. Fields whose type is skipped
//! (fieldset open/close markers and similar) contribute nothing. While
//! iterating, the builder notices the repeater-matrix marker field and any
//! combo fields, whose value classes need their own stub files.


use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::schema::{normalize_type_id, SchemaField, SchemaTemplate};
use crate::types::{combo_class_name, TypeTable, COMBO_TAG};

/// Field only repeater-matrix item templates carry.
pub const MATRIX_SENTINEL_FIELD: &str = "repeater_matrix_type";

/// One `@property` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyLine {
    pub ty: String,
    pub name: String,
    pub label: String,
}

impl fmt::Display for PropertyLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@property {} ${}", self.ty, self.name)?;
        let label = docblock_text(&self.label);
        if !label.is_empty() {
            write!(f, " {label}")?;
        }
        Ok(())
    }
}

/// Free text made safe for a single docblock line: line breaks collapse to
/// one space and `*/` cannot close the comment.
pub fn docblock_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace("*/", "*\\/")
}

/// Value-class stub a combo field needs next to the page class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryStub {
    /// `ComboValue_<field>`
    pub class_name: String,
    pub properties: Vec<PropertyLine>,
}

/// Result of [`AnnotationBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Block payload, without the begin/end markers
    pub text: String,
    /// The template carries [`MATRIX_SENTINEL_FIELD`]
    pub is_matrix: bool,
    /// Stubs for combo value classes, in field order
    pub auxiliary: Vec<AuxiliaryStub>,
}

#[derive(Debug, Deserialize)]
struct ComboSubfield {
    name: String,
    #[serde(rename = "type", default)]
    type_id: String,
    #[serde(default)]
    label: String,
}

/// Builds annotation text from templates.
#[derive(Debug, Clone)]
pub struct AnnotationBuilder<'a> {
    table: &'a TypeTable,
    skip_fieldtypes: BTreeSet<String>,
}

impl<'a> AnnotationBuilder<'a> {
    /// `skip_fieldtypes` may use short tags or `Fieldtype*` names.
    pub fn new<I, S>(table: &'a TypeTable, skip_fieldtypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        AnnotationBuilder {
            table,
            skip_fieldtypes: skip_fieldtypes
                .into_iter()
                .map(|s| normalize_type_id(s.as_ref()))
                .collect(),
        }
    }

    pub fn skips(&self, field: &SchemaField) -> bool {
        self.skip_fieldtypes.contains(&field.type_tag())
    }

    pub fn build(&self, template: &SchemaTemplate) -> Annotation {
        let mut header = format!("Template: {}", template.name);
        let label = docblock_text(&template.label);
        if !label.is_empty() {
            header.push_str(&format!(" ({label})"));
        }

        let mut lines = vec![" *".to_string(), format!(" * {header}")];
        let mut is_matrix = false;
        let mut auxiliary = Vec::new();

        for field in &template.fields {
            if self.skips(field) {
                continue;
            }
            if field.name == MATRIX_SENTINEL_FIELD {
                is_matrix = true;
            }
            let effective = template.field_in_context(field);
            if effective.type_tag() == COMBO_TAG {
                auxiliary.push(self.combo_stub(&effective));
            }
            let line = PropertyLine {
                ty: self.table.resolve(&effective),
                name: field.name.clone(),
                label: effective.label,
            };
            lines.push(format!(" * {line}"));
        }
        lines.push(" *".to_string());

        Annotation {
            text: lines.join("\n"),
            is_matrix,
            auxiliary,
        }
    }

    fn combo_stub(&self, field: &SchemaField) -> AuxiliaryStub {
        let subfields: Vec<ComboSubfield> = field
            .config_value("subfields")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();
        let properties = subfields
            .into_iter()
            .filter(|sub| normalize_type_id(&sub.type_id) != COMBO_TAG)
            .map(|sub| {
                let sub_field = SchemaField::new(sub.name, sub.type_id).with_label(sub.label);
                PropertyLine {
                    ty: self.table.resolve(&sub_field),
                    name: sub_field.name,
                    label: sub_field.label,
                }
            })
            .collect();
        AuxiliaryStub {
            class_name: combo_class_name(&field.name),
            properties,
        }
    }
}
