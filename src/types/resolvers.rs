//! Configuration-dependent resolvers.

use serde_json::Value;

use super::ResolveOptions;
use crate::naming::container_item_class;
use crate::schema::SchemaField;

/// How a file/image field formats its value.
///
/// Accepts the names or the host's numeric constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Auto,
    Array,
    Single,
    String,
}

impl OutputFormat {
    pub fn from_config(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => match n.as_i64() {
                Some(1) => OutputFormat::Array,
                Some(2) => OutputFormat::Single,
                Some(30) => OutputFormat::String,
                _ => OutputFormat::Auto,
            },
            Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "array" => OutputFormat::Array,
                "single" => OutputFormat::Single,
                "string" => OutputFormat::String,
                _ => OutputFormat::Auto,
            },
            _ => OutputFormat::Auto,
        }
    }
}

/// How a page reference field dereferences its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerefMode {
    PageArray,
    PageOrFalse,
    PageOrNullPage,
}

impl DerefMode {
    pub fn from_config(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => match n.as_i64() {
                Some(1) => DerefMode::PageOrFalse,
                Some(2) => DerefMode::PageOrNullPage,
                _ => DerefMode::PageArray,
            },
            Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "pageorfalse" | "single_or_false" => DerefMode::PageOrFalse,
                "pageornullpage" | "single_or_null" => DerefMode::PageOrNullPage,
                _ => DerefMode::PageArray,
            },
            _ => DerefMode::PageArray,
        }
    }
}

fn media_type(field: &SchemaField, single: &str, many: &str) -> String {
    match OutputFormat::from_config(field.config_value("outputFormat")) {
        OutputFormat::Array => many.to_string(),
        OutputFormat::Single => format!("{single}|null"),
        OutputFormat::String => "string".to_string(),
        OutputFormat::Auto => {
            if field.config_i64("maxFiles") == Some(1) {
                format!("{single}|null")
            } else {
                many.to_string()
            }
        }
    }
}

pub(super) fn file_type(field: &SchemaField, _: &ResolveOptions) -> String {
    media_type(field, "Pagefile", "Pagefiles")
}

pub(super) fn image_type(field: &SchemaField, _: &ResolveOptions) -> String {
    media_type(field, "Pageimage", "Pageimages")
}

pub(super) fn page_type(field: &SchemaField, _: &ResolveOptions) -> String {
    match DerefMode::from_config(field.config_value("derefAsPage")) {
        DerefMode::PageOrFalse => "Page|false".to_string(),
        DerefMode::PageOrNullPage => "Page|NullPage".to_string(),
        DerefMode::PageArray => "PageArray".to_string(),
    }
}

pub(super) fn fieldset_page_type(field: &SchemaField, options: &ResolveOptions) -> String {
    if options.custom_page_class_compatible {
        format!("FieldsetPage|{}", container_item_class(&field.name))
    } else {
        format!("FieldsetPage|{}repeater_{}", options.class_prefix, field.name)
    }
}

pub(super) fn repeater_type(field: &SchemaField, _: &ResolveOptions) -> String {
    format!("RepeaterPageArray|{}[]", container_item_class(&field.name))
}

pub(super) fn repeater_matrix_type(field: &SchemaField, _: &ResolveOptions) -> String {
    format!("RepeaterMatrixPageArray|{}[]", container_item_class(&field.name))
}

pub(super) fn combo_type(field: &SchemaField, _: &ResolveOptions) -> String {
    combo_class_name(&field.name)
}

/// Class name of the value object a combo field yields.
pub fn combo_class_name(field_name: &str) -> String {
    format!("ComboValue_{field_name}")
}
