#![allow(dead_code)]

pub mod temp_files {
    use std::path::{Path, PathBuf};

    /// A scratch directory holding a schema document, removed on drop.
    pub struct Workspace {
        pub dir: tempfile::TempDir,
    }

    impl Workspace {
        pub fn new() -> Self {
            Workspace {
                dir: tempfile::tempdir().unwrap(),
            }
        }

        pub fn path(&self) -> &Path {
            self.dir.path()
        }

        /// Write `schema.<ext>` and return its path
        pub fn write_schema(&self, content: &str, ext: &str) -> PathBuf {
            let path = self.path().join(format!("schema.{ext}"));
            std::fs::write(&path, content).unwrap();
            path
        }

        pub fn write_config(&self, content: &str) -> PathBuf {
            let path = self.path().join("pagestubs.toml");
            std::fs::write(&path, content).unwrap();
            path
        }

        pub fn classes_dir(&self) -> PathBuf {
            self.path().join("classes")
        }

        pub fn class_file(&self, class_name: &str) -> PathBuf {
            self.classes_dir().join(format!("{class_name}.php"))
        }

        pub fn read_class(&self, class_name: &str) -> String {
            std::fs::read_to_string(self.class_file(class_name)).unwrap()
        }
    }
}

pub mod fixtures {
    pub const SCHEMA_YAML: &str = r#"
fields:
  - { name: title, type: FieldtypePageTitle, label: Title }
  - { name: photos, type: FieldtypeImage, label: Photos, config: { outputFormat: array } }
  - { name: starts, type: FieldtypeDatetime, label: Starts }
  - { name: tab, type: FieldtypeFieldsetTabOpen, label: Details }
  - { name: tab_END, type: FieldtypeFieldsetClose }
  - { name: speaker, type: FieldtypePage, label: Speaker, config: { derefAsPage: 2 } }
  - { name: repeater_matrix_type, type: FieldtypeInteger }
  - { name: body, type: FieldtypeTextarea, label: Body }
  - { name: items, type: FieldtypeRepeater, label: Items }
  - { name: address, type: FieldtypeCombo, label: Address, config: { subfields: [ { name: city, type: text, label: City } ] } }
templates:
  - name: event
    label: Event
    fields: [title, photos, starts, tab, speaker, tab_END]
    contexts:
      starts: { label: Start date }
  - { name: repeater_blocks, fields: [repeater_matrix_type, body] }
  - { name: repeater_items, fields: [title] }
  - { name: venue, fields: [title, address, items] }
  - { name: admin, fields: [title] }
"#;
}
