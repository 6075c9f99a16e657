//! # Stub Synthesizer
//!
//! Renders the initial content of a page-class stub, and the full content of
//! combo value-class stubs, from Askama templates in `templates/`.
//!
//! A fresh page-class stub is just a declaration; the annotation block is
//! added afterwards by the patcher:
//!
//! ```text
//! <?php
//!
//! namespace ProcessWire;
//!
//! class EventPage extends Page {}
//! ```


use askama::Template;

use crate::annotation::AuxiliaryStub;
use crate::naming::StubVariant;
use crate::schema::SchemaTemplate;

/// Base class for plain templates.
pub const DEFAULT_BASE_CLASS: &str = "Page";
/// Base class for repeater item templates.
pub const REPEATER_BASE_CLASS: &str = "RepeaterPage";
/// Base class for repeater-matrix item templates.
pub const MATRIX_BASE_CLASS: &str = "RepeaterMatrixPage";

/// Template data for a new page-class stub.
#[derive(Template)]
#[template(path = "page_class.php.txt", escape = "none")]
pub struct PageClassTemplate<'a> {
    pub strict_types: bool,
    pub has_namespace: bool,
    pub namespace: &'a str,
    pub class_name: &'a str,
    pub base_class: &'a str,
}

/// Template data for a combo value-class stub.
#[derive(Template)]
#[template(path = "combo_value.php.txt", escape = "none")]
pub struct ComboValueTemplate<'a> {
    pub strict_types: bool,
    pub has_namespace: bool,
    pub namespace: &'a str,
    pub class_name: &'a str,
    pub field_name: &'a str,
    pub properties: Vec<String>,
}

/// Produces the content of newly created stub files.
#[derive(Debug, Clone)]
pub struct StubSynthesizer {
    strict_types: bool,
    namespace: Option<String>,
    no_namespace_markers: Vec<String>,
}

impl StubSynthesizer {
    pub fn new(
        strict_types: bool,
        namespace: Option<String>,
        no_namespace_markers: Vec<String>,
    ) -> Self {
        StubSynthesizer {
            strict_types,
            namespace: namespace.filter(|ns| !ns.trim().is_empty()),
            no_namespace_markers,
        }
    }

    /// Namespace for `class_name`, unless the class belongs to a family that
    /// lives outside it.
    pub fn namespace_for(&self, class_name: &str) -> Option<&str> {
        if self
            .no_namespace_markers
            .iter()
            .any(|marker| !marker.is_empty() && class_name.contains(marker.as_str()))
        {
            return None;
        }
        self.namespace.as_deref()
    }

    /// Base class: explicit template override, then repeater flavour, then `Page`.
    pub fn base_class<'t>(&self, template: &'t SchemaTemplate, variant: StubVariant) -> &'t str {
        if let Some(page_class) = template.page_class_override() {
            return page_class;
        }
        match variant {
            StubVariant::Page => DEFAULT_BASE_CLASS,
            StubVariant::Repeater => REPEATER_BASE_CLASS,
            StubVariant::RepeaterMatrix => MATRIX_BASE_CLASS,
        }
    }

    /// Initial stub content, or `None` for an empty class name.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn create(
        &self,
        class_name: &str,
        template: &SchemaTemplate,
        variant: StubVariant,
    ) -> anyhow::Result<Option<String>> {
        if class_name.trim().is_empty() {
            return Ok(None);
        }
        let namespace = self.namespace_for(class_name);
        let rendered = PageClassTemplate {
            strict_types: self.strict_types,
            has_namespace: namespace.is_some(),
            namespace: namespace.unwrap_or_default(),
            class_name,
            base_class: self.base_class(template, variant),
        }
        .render()?;
        Ok(Some(with_trailing_newline(rendered)))
    }

    /// Full content of a combo value-class stub. Rewritten on every run.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn combo_value(&self, stub: &AuxiliaryStub) -> anyhow::Result<String> {
        let namespace = self.namespace_for(&stub.class_name);
        let field_name = stub
            .class_name
            .strip_prefix("ComboValue_")
            .unwrap_or(&stub.class_name);
        let rendered = ComboValueTemplate {
            strict_types: self.strict_types,
            has_namespace: namespace.is_some(),
            namespace: namespace.unwrap_or_default(),
            class_name: &stub.class_name,
            field_name,
            properties: stub.properties.iter().map(|p| p.to_string()).collect(),
        }
        .render()?;
        Ok(with_trailing_newline(rendered))
    }
}

fn with_trailing_newline(mut s: String) -> String {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    s
}
