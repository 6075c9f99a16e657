#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use serde_json::json;

const SCHEMA: &str = r#"
fields:
  - { name: title, type: FieldtypePageTitle, label: Title }
  - { name: body, type: textarea, label: Body }
  - { name: photos, type: image, label: Photos, config: { outputFormat: array, maxFiles: 0 } }
templates:
  - name: event
    label: Event
    fields: [title, photos]
    contexts:
      photos:
        label: Gallery
        config: { maxFiles: 1 }
  - name: news
    fieldgroup: event
    fields: [title, body]
"#;

#[test]
fn test_parse_yaml_schema() {
    let doc = parse_schema(SCHEMA, true).unwrap();
    assert_eq!(doc.fields.len(), 3);
    assert_eq!(doc.template_names().collect::<Vec<_>>(), vec!["event", "news"]);
}

#[test]
fn test_template_snapshot_keeps_field_order() {
    let doc = parse_schema(SCHEMA, true).unwrap();
    let event = doc.template("event").unwrap();
    assert_eq!(event.label, "Event");
    assert_eq!(event.fieldgroup, "event");
    let names: Vec<_> = event.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["title", "photos"]);
}

#[test]
fn test_field_in_context_merges_config() {
    let doc = parse_schema(SCHEMA, true).unwrap();
    let event = doc.template("event").unwrap();
    let photos = event.field_in_context(&event.fields[1]);
    assert_eq!(photos.label, "Gallery");
    assert_eq!(photos.config_i64("maxFiles"), Some(1));
    assert_eq!(photos.config_value("outputFormat"), Some(&json!("array")));
    // untouched field keeps its own settings
    let title = event.field_in_context(&event.fields[0]);
    assert_eq!(title.label, "Title");
}

#[test]
fn test_type_tag_normalization() {
    assert_eq!(normalize_type_id("FieldtypePageTitle"), "pageTitle");
    assert_eq!(normalize_type_id("FieldtypeRepeaterMatrix"), "repeaterMatrix");
    assert_eq!(normalize_type_id("image"), "image");
    assert_eq!(normalize_type_id("Fieldtype"), "");
}

#[test]
fn test_templates_lookup_by_field_and_fieldgroup() {
    let doc = parse_schema(SCHEMA, true).unwrap();
    assert_eq!(doc.templates_using_field("title"), vec!["event", "news"]);
    assert_eq!(doc.templates_using_field("body"), vec!["news"]);
    assert_eq!(doc.templates_in_fieldgroup("event"), vec!["event", "news"]);
    assert!(doc.templates_in_fieldgroup("news").is_empty());
}

#[test]
fn test_unknown_field_reference_rejected() {
    let err = parse_schema(
        r#"{"fields": [], "templates": [{"name": "home", "fields": ["missing"]}]}"#,
        false,
    )
    .unwrap_err();
    let schema_err = err.downcast_ref::<SchemaError>().unwrap();
    assert_eq!(
        schema_err,
        &SchemaError::UnknownField {
            template: "home".to_string(),
            field: "missing".to_string()
        }
    );
}

#[test]
fn test_duplicate_field_in_template_rejected() {
    let err = parse_schema(
        r#"{"fields": [{"name": "a", "type": "text"}],
            "templates": [{"name": "home", "fields": ["a", "a"]}]}"#,
        false,
    )
    .unwrap_err();
    assert!(err.to_string().contains("more than once"));
}

#[test]
fn test_duplicate_definitions_rejected() {
    let mut doc = SchemaDocument::default();
    doc.fields.push(SchemaField::new("a", "text"));
    doc.fields.push(SchemaField::new("a", "integer"));
    assert_eq!(
        doc.validate(),
        Err(SchemaError::DuplicateDefinition {
            kind: "field",
            name: "a".to_string()
        })
    );
}

#[test]
fn test_unknown_template() {
    let doc = SchemaDocument::default();
    assert_eq!(
        doc.template("nope"),
        Err(SchemaError::UnknownTemplate("nope".to_string()))
    );
}

#[test]
fn test_page_class_override_ignores_blank() {
    let t = SchemaTemplate::new("home").with_page_class("  ");
    assert_eq!(t.page_class_override(), None);
    let t = SchemaTemplate::new("home").with_page_class("HomeBase");
    assert_eq!(t.page_class_override(), Some("HomeBase"));
}
