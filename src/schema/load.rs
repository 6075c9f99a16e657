use anyhow::Context;
use std::path::Path;

use super::types::SchemaDocument;

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

/// Load and validate a schema document (YAML or JSON, by extension).
pub fn load_schema(path: &Path) -> anyhow::Result<SchemaDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema document: {}", path.display()))?;
    parse_schema(&content, is_yaml(path))
        .with_context(|| format!("Invalid schema document: {}", path.display()))
}

/// Parse and validate schema text.
pub fn parse_schema(content: &str, yaml: bool) -> anyhow::Result<SchemaDocument> {
    let doc: SchemaDocument = if yaml {
        serde_yaml::from_str(content)?
    } else {
        serde_json::from_str(content)?
    };
    doc.validate()?;
    Ok(doc)
}
