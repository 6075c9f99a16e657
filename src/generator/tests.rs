#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::config::GeneratorConfig;
use crate::schema::{SchemaDocument, SchemaField, SchemaTemplate};
use crate::store::{FileState, FileStore};
use serde_json::json;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// In-memory store with scripted timestamps and failures.
#[derive(Default)]
struct MemoryStore {
    files: RefCell<HashMap<PathBuf, String>>,
    created: RefCell<HashMap<PathBuf, SystemTime>>,
    unreadable: RefCell<HashSet<PathBuf>>,
    writes: RefCell<Vec<PathBuf>>,
}

impl MemoryStore {
    fn put(&self, class_name: &str, content: &str, created: SystemTime) {
        let path = self.path_for(class_name);
        self.files.borrow_mut().insert(path.clone(), content.to_string());
        self.created.borrow_mut().insert(path, created);
    }

    fn get(&self, class_name: &str) -> Option<String> {
        self.files.borrow().get(&self.path_for(class_name)).cloned()
    }

    fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl FileStore for MemoryStore {
    fn path_for(&self, class_name: &str) -> PathBuf {
        PathBuf::from("classes").join(format!("{class_name}.php"))
    }

    fn read(&self, path: &Path) -> io::Result<FileState> {
        if self.unreadable.borrow().contains(path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }
        Ok(match self.files.borrow().get(path) {
            None => FileState::Absent,
            Some(c) if c.trim().is_empty() => FileState::Empty,
            Some(c) => FileState::Content(c.clone()),
        })
    }

    fn write(&self, path: &Path, content: &str) -> anyhow::Result<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());
        self.created
            .borrow_mut()
            .entry(path.to_path_buf())
            .or_insert_with(SystemTime::now);
        self.writes.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn created(&self, path: &Path) -> Option<SystemTime> {
        self.created.borrow().get(path).copied()
    }
}

fn generator() -> Generator<MemoryStore> {
    Generator::new(GeneratorConfig::default(), MemoryStore::default()).unwrap()
}

fn event_template() -> SchemaTemplate {
    SchemaTemplate::new("event")
        .with_label("Event")
        .with_field(SchemaField::new("title", "text").with_label("Title"))
        .with_field(
            SchemaField::new("photos", "image")
                .with_label("Photos")
                .with_config("outputFormat", "array"),
        )
}

const EVENT_STUB: &str = "<?php\n\nnamespace ProcessWire;\n\n\
/** @PageClassAnnotations\n\
\x20*\n\
\x20* Template: event (Event)\n\
\x20* @property string $title Title\n\
\x20* @property Pageimages $photos Photos\n\
\x20*\n\
\x20* @PageClassAnnotations */\n\
class EventPage extends Page {}\n";

#[test]
fn test_creates_event_stub() {
    let stubs = generator();
    let outcome = stubs.generate(&event_template()).unwrap();
    assert_eq!(
        outcome,
        TemplateOutcome::Created(PathBuf::from("classes/EventPage.php"))
    );
    assert_eq!(stubs.store().get("EventPage").unwrap(), EVENT_STUB);
}

#[test]
fn test_resave_is_byte_stable() {
    let stubs = generator();
    stubs.generate(&event_template()).unwrap();
    let first = stubs.store().get("EventPage").unwrap();
    let outcome = stubs.generate(&event_template()).unwrap();
    assert!(matches!(outcome, TemplateOutcome::Unchanged(_)));
    assert_eq!(stubs.store().get("EventPage").unwrap(), first);
    assert_eq!(stubs.store().write_count(), 1);
}

#[test]
fn test_user_code_preserved_on_update() {
    let stubs = generator();
    stubs.store().put(
        "EventPage",
        "<?php namespace ProcessWire;\n\nclass EventPage extends Page {\n    public function when(): string { return 'soon'; }\n}\n",
        SystemTime::UNIX_EPOCH,
    );
    let outcome = stubs.generate(&event_template()).unwrap();
    assert!(matches!(outcome, TemplateOutcome::Updated(_)));
    let content = stubs.store().get("EventPage").unwrap();
    assert!(content.starts_with("<?php namespace ProcessWire;\n\n/** @PageClassAnnotations\n"));
    assert!(content.contains("public function when(): string { return 'soon'; }"));

    // a field change touches only the block
    let changed = event_template().with_field(SchemaField::new("venue", "text"));
    stubs.generate(&changed).unwrap();
    let after = stubs.store().get("EventPage").unwrap();
    assert!(after.contains(" * @property string $venue\n"));
    assert!(after.contains("public function when(): string { return 'soon'; }"));
    assert_eq!(after.matches("/** @PageClassAnnotations").count(), 1);
}

#[test]
fn test_empty_file_is_resynthesized() {
    let stubs = generator();
    stubs.store().put("EventPage", "\n", SystemTime::UNIX_EPOCH);
    let outcome = stubs.generate(&event_template()).unwrap();
    assert!(matches!(outcome, TemplateOutcome::Created(_)));
    assert_eq!(stubs.store().get("EventPage").unwrap(), EVENT_STUB);
}

#[test]
fn test_repeater_naming_and_base() {
    let stubs = generator();
    let template = SchemaTemplate::new("repeater_contactBlock")
        .with_field(SchemaField::new("email", "email").with_label("E-Mail"));
    stubs.generate(&template).unwrap();
    let content = stubs.store().get("ContactBlockRepeaterPage").unwrap();
    assert!(content.contains("class ContactBlockRepeaterPage extends RepeaterPage {}"));
    assert!(content.contains(" * @property string $email E-Mail\n"));
}

#[test]
fn test_matrix_template_created_with_matrix_base() {
    let stubs = generator();
    let template = SchemaTemplate::new("repeater_blocks")
        .with_field(SchemaField::new("repeater_matrix_type", "integer"))
        .with_field(SchemaField::new("body", "textarea"));
    stubs.generate(&template).unwrap();
    let content = stubs.store().get("BlocksRepeaterMatrixPage").unwrap();
    assert!(content.contains("class BlocksRepeaterMatrixPage extends RepeaterMatrixPage {}"));
    assert!(stubs.store().get("BlocksRepeaterPage").is_none());
}

#[test]
fn test_fresh_matrix_stub_gets_base_corrected() {
    let stubs = generator();
    stubs.store().put(
        "BlocksRepeaterMatrixPage",
        "<?php\n\nclass BlocksRepeaterMatrixPage extends RepeaterPage {}\n",
        SystemTime::now(),
    );
    let template = SchemaTemplate::new("repeater_blocks")
        .with_field(SchemaField::new("repeater_matrix_type", "integer"));
    stubs.generate(&template).unwrap();
    let content = stubs.store().get("BlocksRepeaterMatrixPage").unwrap();
    assert!(content.contains("extends RepeaterMatrixPage {}"));
}

#[test]
fn test_old_matrix_stub_base_left_alone() {
    let stubs = generator();
    stubs.store().put(
        "BlocksRepeaterMatrixPage",
        "<?php\n\nclass BlocksRepeaterMatrixPage extends RepeaterPage {}\n",
        SystemTime::now() - Duration::from_secs(3600),
    );
    let template = SchemaTemplate::new("repeater_blocks")
        .with_field(SchemaField::new("repeater_matrix_type", "integer"));
    stubs.generate(&template).unwrap();
    let content = stubs.store().get("BlocksRepeaterMatrixPage").unwrap();
    assert!(content.contains("extends RepeaterPage {}"));
}

#[test]
fn test_unreadable_stub_is_skipped() {
    let stubs = generator();
    stubs.store()
        .unreadable
        .borrow_mut()
        .insert(stubs.store().path_for("EventPage"));
    let outcome = stubs.generate(&event_template()).unwrap();
    assert!(matches!(
        outcome,
        TemplateOutcome::Skipped(SkipReason::ReadFailed(_))
    ));
    assert_eq!(stubs.store().write_count(), 0);
}

#[test]
fn test_stub_without_declaration_is_left_alone() {
    let stubs = generator();
    stubs.store()
        .put("EventPage", "<?php\n// hand written\n", SystemTime::UNIX_EPOCH);
    let outcome = stubs.generate(&event_template()).unwrap();
    assert_eq!(outcome, TemplateOutcome::Skipped(SkipReason::NoDeclaration));
    assert_eq!(stubs.store().get("EventPage").unwrap(), "<?php\n// hand written\n");
}

#[test]
fn test_empty_class_name_is_skipped() {
    let stubs = generator();
    let outcome = stubs.generate(&SchemaTemplate::new("___")).unwrap();
    assert_eq!(outcome, TemplateOutcome::Skipped(SkipReason::EmptyClassName));
    assert_eq!(stubs.store().write_count(), 0);
}

#[test]
fn test_skip_listed_template() {
    let stubs = generator();
    let outcome = stubs.generate(&SchemaTemplate::new("admin")).unwrap();
    assert_eq!(outcome, TemplateOutcome::Skipped(SkipReason::SkipListed));
    assert!(stubs.store().get("AdminPage").is_none());
}

#[test]
fn test_combo_value_stub_written_once() {
    let stubs = generator();
    let template = SchemaTemplate::new("store").with_field(
        SchemaField::new("address", "combo")
            .with_label("Address")
            .with_config("subfields", json!([{"name": "city", "type": "text"}])),
    );
    stubs.generate(&template).unwrap();
    let combo = stubs.store().get("ComboValue_address").unwrap();
    assert!(combo.contains(" * @property string $city\n"));
    assert!(combo.contains("class ComboValue_address extends ComboValue {}"));
    let page = stubs.store().get("StorePage").unwrap();
    assert!(page.contains(" * @property ComboValue_address $address Address\n"));

    let writes = stubs.store().write_count();
    stubs.generate(&template).unwrap();
    assert_eq!(stubs.store().write_count(), writes);
}

#[test]
fn test_preview_writes_nothing() {
    let stubs = generator();
    let preview = stubs.preview(&event_template()).unwrap();
    assert!(matches!(preview.outcome, TemplateOutcome::Created(_)));
    assert_eq!(preview.stub.unwrap().content, EVENT_STUB);
    assert!(preview.auxiliary.is_empty());
    assert_eq!(stubs.store().write_count(), 0);
}

#[test]
fn test_custom_tag_and_strict_types() {
    let config = GeneratorConfig {
        annotation_tag: "@Generated".to_string(),
        strict_types: true,
        namespace: None,
        ..GeneratorConfig::default()
    };
    let stubs = Generator::new(config, MemoryStore::default()).unwrap();
    stubs.generate(&SchemaTemplate::new("home")).unwrap();
    assert_eq!(
        stubs.store().get("HomePage").unwrap(),
        "<?php declare(strict_types=1);\n\n/** @Generated\n *\n * Template: home\n *\n * @Generated */\nclass HomePage extends Page {}\n"
    );
}

#[test]
fn test_generate_all_continues_after_failures() {
    let schema: SchemaDocument = serde_yaml::from_str(
        r#"
fields:
  - { name: title, type: text, label: Title }
templates:
  - { name: home, fields: [title] }
  - { name: admin, fields: [title] }
  - { name: broken, fields: [title] }
  - { name: about, fields: [title] }
"#,
    )
    .unwrap();
    let stubs = generator();
    stubs.store()
        .unreadable
        .borrow_mut()
        .insert(stubs.store().path_for("BrokenPage"));

    let report = stubs.generate_all(&schema);
    assert_eq!(report.len(), 4);
    assert_eq!(report.created(), 2);
    assert_eq!(report.skipped(), 2);
    assert!(!report.has_failures());
    assert_eq!(
        report.outcome("admin"),
        Some(&TemplateOutcome::Skipped(SkipReason::SkipListed))
    );
    assert_eq!(
        report.to_string(),
        "2 created, 0 updated, 0 unchanged, 2 skipped, 0 failed"
    );
}

#[test]
fn test_generate_named_reports_unknown_templates() {
    let schema = SchemaDocument::default();
    let stubs = generator();
    let report = stubs.generate_named(&schema, ["ghost"]);
    assert!(report.has_failures());
    assert_eq!(report.failures(), vec![("ghost", "unknown template 'ghost'")]);
}
