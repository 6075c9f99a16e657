//! # Schema Module
//!
//! Read-only view of the content schema: fields, templates and the
//! per-template field contexts.
//!
//! The schema lives in a YAML or JSON document:
//!
//! ```yaml
//! fields:
//!   - { name: title, type: text, label: Title }
//!   - { name: photos, type: image, label: Photos, config: { outputFormat: array } }
//! templates:
//!   - name: event
//!     label: Event
//!     fields: [title, photos]
//!     contexts:
//!       title: { label: Event name }
//! ```
//!
//! [`SchemaDocument::template`] resolves a [`SchemaTemplate`] snapshot, which is
//! what the generator consumes.

mod load;
mod types;

#[cfg(test)]
mod tests;

pub use load::*;
pub use types::*;
