//! # Schema Events
//!
//! Schema changes arrive as [`SchemaEvent`]s: saving a field, a template, a
//! field's per-template context, or a whole field group. Each event maps to
//! the set of templates whose stubs may now be stale, and those templates
//! are regenerated.
//!
//! | event                  | affected templates                                |
//! |------------------------|---------------------------------------------------|
//! | `FieldSaved`           | templates using the field (none if its type is skipped) |
//! | `TemplateSaved`        | the template itself                               |
//! | `FieldContextSaved`    | templates of the field group                      |
//! | `FieldgroupSaved`      | templates of the field group                      |
//!
//! Skip-listed templates are never affected. Templates are de-duplicated
//! across a batch of events, keeping first-seen order.
//!
//! Events come either from the command line (`pagestubs event ...`) or from
//! [`watch_schema`], which diffs successive snapshots of the schema document.

mod watch;

pub use watch::*;

use std::collections::HashSet;
use std::fmt;

use crate::config::GeneratorConfig;
use crate::generator::{GenerationReport, Generator};
use crate::schema::{normalize_type_id, SchemaDocument};
use crate::store::FileStore;

/// A schema change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaEvent {
    FieldSaved { field: String },
    TemplateSaved { template: String },
    FieldContextSaved { field: String, fieldgroup: String },
    FieldgroupSaved { fieldgroup: String },
}

impl fmt::Display for SchemaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaEvent::FieldSaved { field } => write!(f, "field '{field}' saved"),
            SchemaEvent::TemplateSaved { template } => write!(f, "template '{template}' saved"),
            SchemaEvent::FieldContextSaved { field, fieldgroup } => write!(
                f,
                "context of field '{field}' in field group '{fieldgroup}' saved"
            ),
            SchemaEvent::FieldgroupSaved { fieldgroup } => {
                write!(f, "field group '{fieldgroup}' saved")
            }
        }
    }
}

/// Templates one event touches, before de-duplication and skip filtering.
fn candidates<'s>(
    schema: &'s SchemaDocument,
    config: &GeneratorConfig,
    event: &'s SchemaEvent,
) -> Vec<&'s str> {
    match event {
        SchemaEvent::FieldSaved { field } => {
            let skipped = schema.field(field).is_some_and(|f| {
                let tag = f.type_tag();
                config
                    .skip_fieldtypes
                    .iter()
                    .any(|t| normalize_type_id(t) == tag)
            });
            if skipped {
                Vec::new()
            } else {
                schema.templates_using_field(field)
            }
        }
        SchemaEvent::TemplateSaved { template } => vec![template.as_str()],
        SchemaEvent::FieldContextSaved { fieldgroup, .. }
        | SchemaEvent::FieldgroupSaved { fieldgroup } => {
            schema.templates_in_fieldgroup(fieldgroup)
        }
    }
}

/// Templates to regenerate for a batch of events.
pub fn affected_templates<'s, I>(
    schema: &'s SchemaDocument,
    config: &GeneratorConfig,
    events: I,
) -> Vec<&'s str>
where
    I: IntoIterator<Item = &'s SchemaEvent>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for event in events {
        for name in candidates(schema, config, event) {
            if !config.skips_template(name) && seen.insert(name) {
                out.push(name);
            }
        }
    }
    out
}

/// Regenerate every template a batch of events affects.
pub fn handle_events<'s, S, I>(
    generator: &Generator<S>,
    schema: &'s SchemaDocument,
    events: I,
) -> GenerationReport
where
    S: FileStore,
    I: IntoIterator<Item = &'s SchemaEvent>,
{
    let events: Vec<&SchemaEvent> = events.into_iter().collect();
    for event in &events {
        tracing::debug!(event = %event, "schema event");
    }
    let names = affected_templates(schema, generator.config(), events);
    generator.generate_named(schema, names)
}

pub fn handle_event<S: FileStore>(
    generator: &Generator<S>,
    schema: &SchemaDocument,
    event: &SchemaEvent,
) -> GenerationReport {
    handle_events(generator, schema, std::iter::once(event))
}

/// Events that turn `old` into `new`.
///
/// New or changed fields give `FieldSaved`. New templates and templates whose
/// label, base class, field group or field list changed give
/// `TemplateSaved`; a template where only per-field contexts changed gives
/// one `FieldContextSaved` per changed field instead. Removals produce
/// nothing.
pub fn diff_snapshots(old: &SchemaDocument, new: &SchemaDocument) -> Vec<SchemaEvent> {
    let mut events = Vec::new();

    for field in &new.fields {
        if old.field(&field.name) != Some(field) {
            events.push(SchemaEvent::FieldSaved {
                field: field.name.clone(),
            });
        }
    }

    for def in &new.templates {
        let Some(previous) = old.template_def(&def.name) else {
            events.push(SchemaEvent::TemplateSaved {
                template: def.name.clone(),
            });
            continue;
        };
        if previous == def {
            continue;
        }
        let same_shape = previous.label == def.label
            && previous.page_class == def.page_class
            && previous.fieldgroup == def.fieldgroup
            && previous.fields == def.fields;
        if !same_shape {
            events.push(SchemaEvent::TemplateSaved {
                template: def.name.clone(),
            });
            continue;
        }
        let mut keys: Vec<&String> = previous.contexts.keys().chain(def.contexts.keys()).collect();
        keys.sort();
        keys.dedup();
        for key in keys {
            if previous.contexts.get(key) != def.contexts.get(key) {
                events.push(SchemaEvent::FieldContextSaved {
                    field: key.clone(),
                    fieldgroup: def.fieldgroup_name().to_string(),
                });
            }
        }
    }

    events
}
