//! Generator configuration
//!
//! Settings come from a `pagestubs.toml` file that sits next to the schema
//! document, or from an explicit `--config` path. Every key is optional:
//!
//! ```toml
//! output_dir = "site/classes"
//! strict_types = true
//! namespace = "ProcessWire"
//! skip_templates = ["admin", "user"]
//!
//! [extra_types]
//! FieldtypeMapMarker = "MapMarker"
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::patch::{AnnotationPatcher, DEFAULT_TAG};
use crate::stub::StubSynthesizer;
use crate::types::{ResolveOptions, TypeMapping, TypeTable};

/// File name looked up next to the schema document.
pub const CONFIG_FILE_NAME: &str = "pagestubs.toml";

/// Everything the generator can be told.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory stubs are written to
    pub output_dir: PathBuf,
    /// Stub file extension, without the dot
    pub extension: String,
    /// Field types that never produce a `@property` line
    pub skip_fieldtypes: Vec<String>,
    /// Templates that never get a stub
    pub skip_templates: Vec<String>,
    /// Emit `declare(strict_types=1);` in new stubs
    pub strict_types: bool,
    /// Namespace of new stubs; `None` writes no namespace line
    pub namespace: Option<String>,
    /// Class-name fragments whose classes live outside the namespace
    pub no_namespace_markers: Vec<String>,
    pub custom_page_class_compatible: bool,
    pub class_prefix: String,
    /// How new a stub must be for the matrix base-class correction
    pub matrix_fix_window_secs: u64,
    /// Marker tag of the annotation block
    pub annotation_tag: String,
    /// Additional fixed mappings, type identifier → type expression
    pub extra_types: BTreeMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output_dir: PathBuf::from("site/classes"),
            extension: "php".to_string(),
            skip_fieldtypes: [
                "FieldtypeFieldsetOpen",
                "FieldtypeFieldsetTabOpen",
                "FieldtypeFieldsetGroup",
                "FieldtypeFieldsetClose",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            skip_templates: ["admin", "form-builder", "language", "permission", "role"]
                .into_iter()
                .map(String::from)
                .collect(),
            strict_types: false,
            namespace: Some("ProcessWire".to_string()),
            no_namespace_markers: vec!["Rockpagebuilder".to_string()],
            custom_page_class_compatible: true,
            class_prefix: String::new(),
            matrix_fix_window_secs: 3,
            annotation_tag: DEFAULT_TAG.to_string(),
            extra_types: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    pub fn skips_template(&self, name: &str) -> bool {
        self.skip_templates.iter().any(|t| t == name)
    }

    pub fn matrix_fix_window(&self) -> Duration {
        Duration::from_secs(self.matrix_fix_window_secs)
    }

    /// Default type table plus `extra_types`.
    pub fn type_table(&self) -> TypeTable {
        let mut table = TypeTable::with_defaults(ResolveOptions {
            custom_page_class_compatible: self.custom_page_class_compatible,
            class_prefix: self.class_prefix.clone(),
        });
        for (type_id, expr) in &self.extra_types {
            table.register(type_id, TypeMapping::Fixed(expr.clone()));
        }
        table
    }

    /// # Errors
    ///
    /// Returns an error for a blank or unusable `annotation_tag`.
    pub fn patcher(&self) -> anyhow::Result<AnnotationPatcher> {
        let tag = self.annotation_tag.trim();
        if tag.is_empty() {
            anyhow::bail!("annotation_tag must not be empty");
        }
        AnnotationPatcher::new(tag)
            .with_context(|| format!("Invalid annotation_tag '{tag}'"))
    }

    pub fn synthesizer(&self) -> StubSynthesizer {
        StubSynthesizer::new(
            self.strict_types,
            self.namespace.clone(),
            self.no_namespace_markers.clone(),
        )
    }
}

/// Load a configuration file.
///
/// Returns `Ok(None)` if the file does not exist, `Err` if it exists but
/// cannot be read or parsed.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

    let config: GeneratorConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

    Ok(Some(config))
}

/// `pagestubs.toml` in the schema document's directory, if present.
pub fn auto_detect_config_path(schema_path: &Path) -> Option<PathBuf> {
    let config_path = schema_path.parent()?.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Resolve the config path
///
/// Priority:
/// 1. Explicitly provided path (via CLI)
/// 2. Auto-detected alongside the schema document
/// 3. None (defaults)
pub fn resolve_config_path(explicit_path: Option<&Path>, schema_path: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    auto_detect_config_path(schema_path)
}

/// Resolve, load, or fall back to [`GeneratorConfig::default`].
///
/// An explicit path that does not exist is an error; a missing auto-detected
/// file is not.
pub fn load_or_default(
    explicit_path: Option<&Path>,
    schema_path: &Path,
) -> anyhow::Result<GeneratorConfig> {
    if let Some(path) = explicit_path {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    }
    match resolve_config_path(explicit_path, schema_path) {
        Some(path) => {
            let config = load_config(&path)?.unwrap_or_default();
            tracing::debug!(path = %path.display(), "loaded generator config");
            Ok(config)
        }
        None => Ok(GeneratorConfig::default()),
    }
}
