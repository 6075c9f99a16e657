#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use serde_json::json;

fn image(config: &[(&str, serde_json::Value)]) -> SchemaField {
    config
        .iter()
        .fold(SchemaField::new("photos", "image"), |f, (k, v)| {
            f.with_config(*k, v.clone())
        })
}

#[test]
fn test_fixed_mappings() {
    let table = TypeTable::default();
    let cases = [
        ("checkbox", "int"),
        ("float", "float"),
        ("datetime", "int|string"),
        ("text", "string"),
        ("FieldtypeText", "string"),
        ("FieldtypeOptions", "SelectableOptionArray"),
        ("table", "TableRows"),
        ("password", "Password"),
    ];
    for (type_id, expected) in cases {
        let field = SchemaField::new("f", type_id);
        assert_eq!(table.resolve(&field), expected, "type {type_id}");
    }
}

#[test]
fn test_unknown_type_is_mixed() {
    let table = TypeTable::default();
    assert_eq!(table.resolve(&SchemaField::new("w", "customWidget")), MIXED);
    assert_eq!(table.resolve(&SchemaField::new("w", "")), MIXED);
}

#[test]
fn test_image_output_formats() {
    let table = TypeTable::default();
    assert_eq!(table.resolve(&image(&[("outputFormat", json!("array"))])), "Pageimages");
    assert_eq!(
        table.resolve(&image(&[("outputFormat", json!("single"))])),
        "Pageimage|null"
    );
    assert_eq!(table.resolve(&image(&[("outputFormat", json!("string"))])), "string");
    assert_eq!(
        table.resolve(&image(&[("outputFormat", json!("auto")), ("maxFiles", json!(1))])),
        "Pageimage|null"
    );
    assert_eq!(
        table.resolve(&image(&[("outputFormat", json!("auto")), ("maxFiles", json!(3))])),
        "Pageimages"
    );
    // unlimited when maxFiles is absent
    assert_eq!(table.resolve(&image(&[])), "Pageimages");
}

#[test]
fn test_file_output_formats_numeric() {
    let table = TypeTable::default();
    let file = |fmt: i64, max: i64| {
        SchemaField::new("docs", "FieldtypeFile")
            .with_config("outputFormat", fmt)
            .with_config("maxFiles", max)
    };
    assert_eq!(table.resolve(&file(1, 1)), "Pagefiles");
    assert_eq!(table.resolve(&file(2, 0)), "Pagefile|null");
    assert_eq!(table.resolve(&file(30, 0)), "string");
    assert_eq!(table.resolve(&file(0, 1)), "Pagefile|null");
    assert_eq!(table.resolve(&file(0, 5)), "Pagefiles");
}

#[test]
fn test_max_files_as_string() {
    let table = TypeTable::default();
    let field = image(&[("maxFiles", json!("1"))]);
    assert_eq!(table.resolve(&field), "Pageimage|null");
}

#[test]
fn test_page_deref_modes() {
    let table = TypeTable::default();
    let page = |mode: serde_json::Value| {
        SchemaField::new("related", "page").with_config("derefAsPage", mode)
    };
    assert_eq!(table.resolve(&page(json!("pageArray"))), "PageArray");
    assert_eq!(table.resolve(&page(json!(0))), "PageArray");
    assert_eq!(table.resolve(&page(json!(1))), "Page|false");
    assert_eq!(table.resolve(&page(json!("pageOrNullPage"))), "Page|NullPage");
    assert_eq!(table.resolve(&SchemaField::new("related", "page")), "PageArray");
}

#[test]
fn test_container_fields() {
    let table = TypeTable::default();
    assert_eq!(
        table.resolve(&SchemaField::new("contact_block", "repeater")),
        "RepeaterPageArray|RepeaterContactBlockPage[]"
    );
    assert_eq!(
        table.resolve(&SchemaField::new("content_blocks", "FieldtypeRepeaterMatrix")),
        "RepeaterMatrixPageArray|RepeaterContentBlocksPage[]"
    );
    assert_eq!(
        table.resolve(&SchemaField::new("seo", "fieldsetPage")),
        "FieldsetPage|RepeaterSeoPage"
    );
}

#[test]
fn test_fieldset_page_without_custom_classes() {
    let table = TypeTable::with_defaults(ResolveOptions {
        custom_page_class_compatible: false,
        class_prefix: "Tpl".to_string(),
    });
    assert_eq!(
        table.resolve(&SchemaField::new("seo", "fieldsetPage")),
        "FieldsetPage|Tplrepeater_seo"
    );
}

#[test]
fn test_combo_reference_type() {
    let table = TypeTable::default();
    assert_eq!(
        table.resolve(&SchemaField::new("address", "combo")),
        "ComboValue_address"
    );
}

#[test]
fn test_register_extends_table() {
    let mut table = TypeTable::default();
    assert!(table
        .register("FieldtypeMapMarker", TypeMapping::Fixed("MapMarker".to_string()))
        .is_none());
    assert_eq!(table.resolve(&SchemaField::new("map", "mapMarker")), "MapMarker");

    fn upper(field: &SchemaField, _: &ResolveOptions) -> String {
        field.name.to_uppercase()
    }
    let previous = table.register("text", TypeMapping::Resolver(upper));
    assert!(matches!(previous, Some(TypeMapping::Fixed(_))));
    assert_eq!(table.resolve(&SchemaField::new("headline", "text")), "HEADLINE");
}

#[test]
fn test_empty_table() {
    let table = TypeTable::empty(ResolveOptions::default());
    assert!(table.get("text").is_none());
    assert_eq!(table.resolve(&SchemaField::new("t", "text")), MIXED);
}

#[test]
fn test_output_format_parsing() {
    assert_eq!(OutputFormat::from_config(None), OutputFormat::Auto);
    assert_eq!(OutputFormat::from_config(Some(&json!("ARRAY"))), OutputFormat::Array);
    assert_eq!(OutputFormat::from_config(Some(&json!(true))), OutputFormat::Auto);
    assert_eq!(DerefMode::from_config(Some(&json!(7))), DerefMode::PageArray);
}
