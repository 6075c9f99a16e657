//! Class-name derivation shared by the annotation builder, the stub
//! synthesizer and the container-field type resolvers.
//!
//! The host platform names page classes after templates:
//!
//! | template                 | class                             |
//! |--------------------------|-----------------------------------|
//! | `blogPost`               | `BlogPostPage`                    |
//! | `basic_page`             | `BasicPagePage`                   |
//! | `repeater_contactBlock`  | `ContactBlockRepeaterPage`        |
//! | `repeater_blocks` + matrix marker | `BlocksRepeaterMatrixPage` |

/// Template-name prefix marking the repeater variant.
pub const REPEATER_PREFIX: &str = "repeater_";

/// Suffix for ordinary page classes.
pub const PAGE_SUFFIX: &str = "Page";
/// Suffix for repeater item classes.
pub const REPEATER_SUFFIX: &str = "RepeaterPage";
/// Suffix for repeater-matrix item classes.
pub const MATRIX_SUFFIX: &str = "RepeaterMatrixPage";

/// Which flavour of page class a template produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubVariant {
    /// Plain template
    Page,
    /// `repeater_*` template without the matrix marker field
    Repeater,
    /// `repeater_*` template carrying the matrix marker field
    RepeaterMatrix,
}

impl StubVariant {
    /// Pick the variant from the template name and the matrix flag found
    /// while scanning its fields.
    pub fn detect(template_name: &str, is_matrix: bool) -> Self {
        if !template_name.starts_with(REPEATER_PREFIX) {
            StubVariant::Page
        } else if is_matrix {
            StubVariant::RepeaterMatrix
        } else {
            StubVariant::Repeater
        }
    }

    /// Class-name suffix for this variant.
    pub fn suffix(self) -> &'static str {
        match self {
            StubVariant::Page => PAGE_SUFFIX,
            StubVariant::Repeater => REPEATER_SUFFIX,
            StubVariant::RepeaterMatrix => MATRIX_SUFFIX,
        }
    }
}

/// Convert an identifier to lowerCamelCase.
///
/// Any run of characters that are not ASCII alphanumerics separates words.
/// Existing inner capitals are kept, so `contactBlock` stays `contactBlock`.
///
/// ```rust
/// use pagestubs::naming::to_camel_case;
/// assert_eq!(to_camel_case("contact_block"), "contactBlock");
/// assert_eq!(to_camel_case("hero-image"), "heroImage");
/// ```
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if out.is_empty() {
            out.push_str(&lcfirst(word));
        } else {
            out.push_str(&ucfirst(word));
        }
    }
    out
}

/// Upper-case the first character.
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn lcfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// `ucfirst(to_camel_case(s))`.
pub fn to_pascal_case(s: &str) -> String {
    ucfirst(&to_camel_case(s))
}

/// Class name for a template, before the matrix marker is known.
///
/// Returns an empty string when the name has no usable characters; callers
/// treat that as "do not create a file".
pub fn class_name(template_name: &str) -> String {
    class_name_for(template_name, StubVariant::detect(template_name, false))
}

/// Class name for a template once its variant is known.
pub fn class_name_for(template_name: &str, variant: StubVariant) -> String {
    let base = template_name
        .strip_prefix(REPEATER_PREFIX)
        .unwrap_or(template_name);
    let stem = to_pascal_case(base);
    if stem.is_empty() {
        return String::new();
    }
    stem + variant.suffix()
}

/// `Repeater<Name>Page`, the item class a container field points at.
pub fn container_item_class(field_name: &str) -> String {
    format!("Repeater{}{}", to_pascal_case(field_name), PAGE_SUFFIX)
}
