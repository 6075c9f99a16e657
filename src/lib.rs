//! # pagestubs
//!
//! **pagestubs** keeps PHP page-class stub files in step with a content
//! schema. Each template gets a class file whose docblock lists one
//! `@property` line per field, with a PHPDoc type derived from the field's
//! type and configuration. The block is delimited by marker comments and is
//! the only part of a file the generator ever rewrites, so hand-written code
//! in the class survives every regeneration.
//!
//! ## Architecture
//!
//! - **[`schema`]** - Schema document model (fields, templates, contexts) and loading
//! - **[`types`]** - Field type → PHPDoc type table with configuration-aware resolvers
//! - **[`annotation`]** - Builds the annotation text for a template
//! - **[`stub`]** - Renders new stub files with Askama templates
//! - **[`patch`]** - Inserts or replaces the annotation block in existing content
//! - **[`generator`]** - Runs the pipeline for one template or a whole schema
//! - **[`events`]** - Maps schema events to affected templates; watches the schema
//! - **[`store`]** - File access used by the generator
//! - **[`config`]** - `pagestubs.toml` loading
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `pagestubs` command line
//!
//! ## Quick Start
//!
//! ```rust
//! use pagestubs::annotation::AnnotationBuilder;
//! use pagestubs::patch::AnnotationPatcher;
//! use pagestubs::schema::{SchemaField, SchemaTemplate};
//! use pagestubs::types::TypeTable;
//!
//! let template = SchemaTemplate::new("event")
//!     .with_label("Event")
//!     .with_field(SchemaField::new("title", "text").with_label("Title"));
//!
//! let table = TypeTable::default();
//! let annotation = AnnotationBuilder::new(&table, ["fieldsetOpen"]).build(&template);
//!
//! let stub = "<?php\n\nclass EventPage extends Page {}\n";
//! let patched = AnnotationPatcher::default().patch(stub, &annotation.text);
//! assert!(patched.content.contains(" * @property string $title Title\n"));
//! ```

pub mod annotation;
pub mod cli;
pub mod config;
pub mod events;
pub mod generator;
pub mod logging;
pub mod naming;
pub mod patch;
pub mod schema;
pub mod store;
pub mod stub;
pub mod types;

pub use config::GeneratorConfig;
pub use generator::{GenerationReport, Generator, TemplateOutcome};
pub use schema::{load_schema, SchemaDocument, SchemaField, SchemaTemplate};
