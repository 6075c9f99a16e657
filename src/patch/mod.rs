//! # Annotation Patcher
//!
//! Inserts or replaces the generated annotation block inside a stub file
//! while leaving every other byte alone.
//!
//! A block looks like this (the tag is configurable):
//!
//! ```text
//! /** @PageClassAnnotations
//!  *
//!  * Template: event (Event)
//!  * @property string $title Title
//!  *
//!  * @PageClassAnnotations */
//! class EventPage extends Page {}
//! ```
//!
//! ## Algorithm
//!
//! 1. If a block exists, the first one is replaced. Its continuation lines
//!    take the indentation of the line the block starts on. Blocks written
//!    with [`LEGACY_TAG`] count as existing blocks and are rewritten with the
//!    configured tag.
//! 2. Otherwise the block is inserted right before the first declaration line
//!    (`class`, optionally preceded by `abstract`/`final`/`readonly`; also
//!    `interface`, `trait`, `enum`), indented like that line. Lines inside
//!    `/* ... */` comments are not declarations.
//! 3. Without a declaration line the content is returned unchanged.
//!
//! Both branches produce text that branch 1 maps onto itself, so patching is
//! idempotent: `patch(patch(c, a), a) == patch(c, a)`.


use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Default marker tag.
pub const DEFAULT_TAG: &str = "@PageClassAnnotations";

/// Marker tag of older stub files, usually placed right after the namespace.
pub const LEGACY_TAG: &str = "@AutoPageClassAnnotations";

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^([ \t]*)(?:(?:abstract|final|readonly)[ \t]+)*(?:class|interface|trait|enum)[ \t]+[A-Za-z_][A-Za-z0-9_]*",
    )
    .expect("declaration pattern is valid")
});

/// What [`AnnotationPatcher::patch`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// An existing block was rewritten
    Replaced,
    /// A new block was added before the declaration line
    Inserted,
    /// No block and no declaration line: content returned as-is
    NoDeclaration,
}

/// Patched content plus what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub content: String,
    pub outcome: PatchOutcome,
}

/// Finds and rewrites annotation blocks delimited by one tag.
#[derive(Debug, Clone)]
pub struct AnnotationPatcher {
    tag: String,
    block: Regex,
}

impl AnnotationPatcher {
    /// Patcher for `tag` (e.g. `@PageClassAnnotations`).
    ///
    /// # Errors
    ///
    /// Returns an error if the tag produces an oversized pattern.
    pub fn new(tag: &str) -> Result<Self, regex::Error> {
        Ok(AnnotationPatcher {
            tag: tag.to_string(),
            block: block_pattern(tag)?,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Wrap annotation text in the begin/end markers.
    ///
    /// `indent` is put in front of every line except the first, which starts
    /// wherever the caller places it.
    pub fn wrap(&self, annotation: &str, indent: &str) -> String {
        let mut out = format!("/** {}", self.tag);
        for line in annotation.lines() {
            out.push('\n');
            out.push_str(indent);
            out.push_str(line);
        }
        out.push('\n');
        out.push_str(indent);
        out.push_str(&format!(" * {} */", self.tag));
        out
    }

    /// Whether `content` already carries a block.
    pub fn has_block(&self, content: &str) -> bool {
        self.block.is_match(content)
    }

    /// Insert or replace the block. See the module docs.
    pub fn patch(&self, content: &str, annotation: &str) -> Patched {
        if let Some(m) = self.block.find(content) {
            let indent = leading_indent(content, m.start());
            let mut out = String::with_capacity(content.len() + annotation.len());
            out.push_str(&content[..m.start()]);
            out.push_str(&self.wrap(annotation, indent));
            out.push_str(&content[m.end()..]);
            return Patched {
                content: out,
                outcome: PatchOutcome::Replaced,
            };
        }

        let comments = comment_spans(content);
        let declaration = DECLARATION.captures_iter(content).find(|caps| {
            caps.get(0)
                .is_some_and(|m| !comments.iter().any(|c| c.contains(&m.start())))
        });
        if let Some(caps) = declaration {
            let (line_start, indent) = match caps.get(1) {
                Some(g) => (g.start(), g.as_str()),
                None => (caps.get(0).map_or(0, |m| m.start()), ""),
            };
            let block = self.wrap(annotation, indent);
            let mut out = String::with_capacity(content.len() + block.len() + indent.len() + 1);
            out.push_str(&content[..line_start]);
            out.push_str(indent);
            out.push_str(&block);
            out.push('\n');
            out.push_str(&content[line_start..]);
            return Patched {
                content: out,
                outcome: PatchOutcome::Inserted,
            };
        }

        Patched {
            content: content.to_string(),
            outcome: PatchOutcome::NoDeclaration,
        }
    }
}

impl Default for AnnotationPatcher {
    fn default() -> Self {
        AnnotationPatcher {
            tag: DEFAULT_TAG.to_string(),
            block: DEFAULT_BLOCK.clone(),
        }
    }
}

static DEFAULT_BLOCK: Lazy<Regex> =
    Lazy::new(|| block_pattern(DEFAULT_TAG).expect("default block pattern is valid"));

/// Matches a block delimited by `tag` or by [`LEGACY_TAG`].
fn block_pattern(tag: &str) -> Result<Regex, regex::Error> {
    let delimited = |t: &str| {
        let escaped = regex::escape(t);
        format!(r"/\*\* {escaped}.*?\* {escaped} \*/")
    };
    let mut pattern = format!("(?s){}", delimited(tag));
    if tag != LEGACY_TAG {
        pattern.push('|');
        pattern.push_str(&delimited(LEGACY_TAG));
    }
    Regex::new(&pattern)
}

/// Byte ranges of `/* ... */` comments. Line comments and quoted strings are
/// stepped over so a `/*` inside them opens nothing. An unterminated comment
/// runs to the end of the content.
fn comment_spans(content: &str) -> Vec<Range<usize>> {
    let bytes = content.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = content[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |off| i + 2 + off + 2);
                spans.push(i..end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = line_end(content, i),
            b'#' if bytes.get(i + 1) != Some(&b'[') => i = line_end(content, i),
            quote @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    spans
}

fn line_end(content: &str, from: usize) -> usize {
    content[from..].find('\n').map_or(content.len(), |off| from + off)
}

/// Whitespace between the start of the line containing `pos` and `pos`, or
/// nothing when non-blank text precedes `pos` on that line.
fn leading_indent(content: &str, pos: usize) -> &str {
    let line_start = content[..pos].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &content[line_start..pos];
    if prefix.chars().all(|c| c == ' ' || c == '\t') {
        prefix
    } else {
        ""
    }
}
