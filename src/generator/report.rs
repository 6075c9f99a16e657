use std::fmt;
use std::path::PathBuf;

/// Why a template produced no write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Template name yields no class name
    EmptyClassName,
    /// The existing stub could not be read
    ReadFailed(String),
    /// The existing stub has no block and no class declaration
    NoDeclaration,
    /// Template is in `skip_templates`
    SkipListed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyClassName => write!(f, "empty class name"),
            SkipReason::ReadFailed(err) => write!(f, "read failed: {err}"),
            SkipReason::NoDeclaration => write!(f, "no class declaration in stub"),
            SkipReason::SkipListed => write!(f, "template is skip-listed"),
        }
    }
}

/// What happened to one template's page-class stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOutcome {
    /// A new stub was written
    Created(PathBuf),
    /// An existing stub was rewritten
    Updated(PathBuf),
    /// The stub already had the right content
    Unchanged(PathBuf),
    Skipped(SkipReason),
}

impl TemplateOutcome {
    /// Stub path, unless the template was skipped.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            TemplateOutcome::Created(p)
            | TemplateOutcome::Updated(p)
            | TemplateOutcome::Unchanged(p) => Some(p),
            TemplateOutcome::Skipped(_) => None,
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(
            self,
            TemplateOutcome::Created(_) | TemplateOutcome::Updated(_)
        )
    }
}

impl fmt::Display for TemplateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateOutcome::Created(p) => write!(f, "created {}", p.display()),
            TemplateOutcome::Updated(p) => write!(f, "updated {}", p.display()),
            TemplateOutcome::Unchanged(p) => write!(f, "unchanged {}", p.display()),
            TemplateOutcome::Skipped(reason) => write!(f, "skipped ({reason})"),
        }
    }
}

/// One template's entry in a [`GenerationReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateReport {
    pub template: String,
    /// The outcome, or the error message of a failed run
    pub result: Result<TemplateOutcome, String>,
}

/// Per-template results of a batch run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub entries: Vec<TemplateReport>,
}

impl GenerationReport {
    pub fn push(&mut self, template: impl Into<String>, result: Result<TemplateOutcome, String>) {
        self.entries.push(TemplateReport {
            template: template.into(),
            result,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Outcome recorded for `template`, if it ran without error.
    pub fn outcome(&self, template: &str) -> Option<&TemplateOutcome> {
        self.entries
            .iter()
            .find(|e| e.template == template)
            .and_then(|e| e.result.as_ref().ok())
    }

    fn count(&self, pred: impl Fn(&TemplateOutcome) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|e| e.result.as_ref().is_ok_and(&pred))
            .count()
    }

    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, TemplateOutcome::Created(_)))
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, TemplateOutcome::Updated(_)))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, TemplateOutcome::Unchanged(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TemplateOutcome::Skipped(_)))
    }

    /// `(template, error)` for every failed template.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .filter_map(|e| match &e.result {
                Err(err) => Some((e.template.as_str(), err.as_str())),
                Ok(_) => None,
            })
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|e| e.result.is_err())
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} unchanged, {} skipped, {} failed",
            self.created(),
            self.updated(),
            self.unchanged(),
            self.skipped(),
            self.failures().len()
        )
    }
}
