//! # CLI Module
//!
//! Command-line front end of the stub generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Regenerate stubs for every template, or only the named ones:
//!
//! ```bash
//! pagestubs generate --schema schema.yaml
//! pagestubs generate --schema schema.yaml -t event -t home --dry-run
//! ```
//!
//! ### `event`
//!
//! Apply one schema event, regenerating the templates it affects:
//!
//! ```bash
//! pagestubs event --schema schema.yaml field-saved title
//! pagestubs event --schema schema.yaml field-context-saved title --fieldgroup event
//! ```
//!
//! ### `watch`
//!
//! Generate everything once, then regenerate affected templates each time
//! the schema document is saved:
//!
//! ```bash
//! pagestubs watch --schema schema.yaml
//! ```
//!
//! ### `preview`
//!
//! Print the stub one template would get, without writing it:
//!
//! ```bash
//! pagestubs preview --schema schema.yaml --template event
//! ```
//!
//! Every command accepts `--config <FILE>` (default: `pagestubs.toml` next
//! to the schema) and `--output <DIR>` (overrides `output_dir`).

mod commands;


pub use commands::{run, run_cli, Cli, Commands, CommonArgs, EventKind};
