//! # Generator Module
//!
//! Ties the pieces together for one template at a time:
//!
//! ```text
//! SchemaTemplate → AnnotationBuilder → (StubSynthesizer) → AnnotationPatcher → FileStore
//! ```
//!
//! 1. The annotation is built first, which also tells whether the template is
//!    a repeater-matrix item and which combo value classes it needs.
//! 2. Combo value stubs are rendered and written wholesale.
//! 3. The page-class stub is read. A missing or blank file is synthesized
//!    from scratch; an existing file is kept as-is except for the block.
//! 4. A repeater-matrix stub created within the last few seconds that still
//!    extends `RepeaterPage` is moved to `RepeaterMatrixPage`.
//! 5. The block is patched in and the file written only if its bytes changed.
//!
//! Failures stay local to the template. [`Generator::generate_all`] keeps
//! going and returns a [`GenerationReport`] with one entry per template.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pagestubs::config::GeneratorConfig;
//! use pagestubs::generator::Generator;
//! use pagestubs::schema::load_schema;
//! use pagestubs::store::FsStore;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let schema = load_schema(Path::new("schema.yaml"))?;
//! let config = GeneratorConfig::default();
//! let store = FsStore::new(&config.output_dir, &config.extension);
//! let generator = Generator::new(config, store)?;
//! let report = generator.generate_all(&schema);
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

mod generate;
mod report;
#[cfg(test)]
mod tests;

pub use generate::*;
pub use report::*;
