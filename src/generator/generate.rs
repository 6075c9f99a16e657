use anyhow::Context;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

use crate::annotation::{Annotation, AnnotationBuilder};
use crate::config::GeneratorConfig;
use crate::naming::{class_name_for, StubVariant};
use crate::patch::{AnnotationPatcher, PatchOutcome};
use crate::schema::{SchemaDocument, SchemaTemplate};
use crate::store::{FileState, FileStore};
use crate::stub::StubSynthesizer;
use crate::types::TypeTable;

use super::report::{GenerationReport, SkipReason, TemplateOutcome};

const REPEATER_EXTENDS: &str = " extends RepeaterPage ";
const MATRIX_EXTENDS: &str = " extends RepeaterMatrixPage ";

/// A file and the content it should hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubFile {
    pub path: PathBuf,
    pub content: String,
}

/// What [`Generator::generate`] would do, without doing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub outcome: TemplateOutcome,
    /// Page-class stub after patching; `None` when skipped
    pub stub: Option<StubFile>,
    /// Combo value-class stubs
    pub auxiliary: Vec<StubFile>,
}

struct Plan {
    auxiliary: Vec<StubFile>,
    main: Result<MainPlan, SkipReason>,
}

struct MainPlan {
    file: StubFile,
    existed: bool,
    changed: bool,
}

/// Generates and maintains page-class stubs for schema templates.
pub struct Generator<S: FileStore> {
    config: GeneratorConfig,
    table: TypeTable,
    patcher: AnnotationPatcher,
    synthesizer: StubSynthesizer,
    store: S,
}

impl<S: FileStore> Generator<S> {
    /// # Errors
    ///
    /// Returns an error if the configured annotation tag is unusable.
    pub fn new(config: GeneratorConfig, store: S) -> anyhow::Result<Self> {
        Ok(Generator {
            table: config.type_table(),
            patcher: config.patcher()?,
            synthesizer: config.synthesizer(),
            config,
            store,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Bring one template's stub (and its combo value stubs) up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails. Unreadable stubs and
    /// unusable names are reported as [`TemplateOutcome::Skipped`] instead.
    pub fn generate(&self, template: &SchemaTemplate) -> anyhow::Result<TemplateOutcome> {
        let plan = self.plan(template)?;

        for aux in &plan.auxiliary {
            self.write_auxiliary(aux)?;
        }

        let main = match plan.main {
            Ok(main) => main,
            Err(reason) => {
                match &reason {
                    SkipReason::ReadFailed(err) => {
                        warn!(template = %template.name, error = %err, "skipping template: stub unreadable")
                    }
                    other => debug!(template = %template.name, reason = %other, "skipping template"),
                }
                return Ok(TemplateOutcome::Skipped(reason));
            }
        };

        if !main.changed {
            debug!(template = %template.name, path = %main.file.path.display(), "stub up to date");
            return Ok(TemplateOutcome::Unchanged(main.file.path));
        }

        self.store
            .write(&main.file.path, &main.file.content)
            .with_context(|| format!("Failed to write stub for template '{}'", template.name))?;

        if main.existed {
            info!(template = %template.name, path = %main.file.path.display(), "updated stub");
            Ok(TemplateOutcome::Updated(main.file.path))
        } else {
            info!(template = %template.name, path = %main.file.path.display(), "created stub");
            Ok(TemplateOutcome::Created(main.file.path))
        }
    }

    /// Compute what [`generate`](Self::generate) would write. Nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn preview(&self, template: &SchemaTemplate) -> anyhow::Result<Preview> {
        let plan = self.plan(template)?;
        let (outcome, stub) = match plan.main {
            Err(reason) => (TemplateOutcome::Skipped(reason), None),
            Ok(main) => {
                let path = main.file.path.clone();
                let outcome = match (main.existed, main.changed) {
                    (_, false) => TemplateOutcome::Unchanged(path),
                    (true, true) => TemplateOutcome::Updated(path),
                    (false, true) => TemplateOutcome::Created(path),
                };
                (outcome, Some(main.file))
            }
        };
        Ok(Preview {
            outcome,
            stub,
            auxiliary: plan.auxiliary,
        })
    }

    /// Run every template of the schema, in document order.
    pub fn generate_all(&self, schema: &SchemaDocument) -> GenerationReport {
        self.generate_named(schema, schema.template_names())
    }

    /// Run the named templates. Unknown names are recorded as failures; the
    /// batch always continues.
    pub fn generate_named<'n, I>(&self, schema: &SchemaDocument, names: I) -> GenerationReport
    where
        I: IntoIterator<Item = &'n str>,
    {
        let mut report = GenerationReport::default();
        for name in names {
            let result = schema
                .template(name)
                .map_err(anyhow::Error::from)
                .and_then(|template| self.generate(&template));
            if let Err(err) = &result {
                warn!(template = %name, error = %format!("{err:#}"), "template failed");
            }
            report.push(name, result.map_err(|err| format!("{err:#}")));
        }
        report
    }

    fn plan(&self, template: &SchemaTemplate) -> anyhow::Result<Plan> {
        if self.config.skips_template(&template.name) {
            return Ok(Plan {
                auxiliary: Vec::new(),
                main: Err(SkipReason::SkipListed),
            });
        }

        let builder = AnnotationBuilder::new(&self.table, &self.config.skip_fieldtypes);
        let annotation = builder.build(template);
        let auxiliary = self.auxiliary_files(&annotation)?;

        let variant = StubVariant::detect(&template.name, annotation.is_matrix);
        let class_name = class_name_for(&template.name, variant);
        if class_name.is_empty() {
            return Ok(Plan {
                auxiliary,
                main: Err(SkipReason::EmptyClassName),
            });
        }
        let path = self.store.path_for(&class_name);

        let state = match self.store.read(&path) {
            Ok(state) => state,
            Err(err) => {
                return Ok(Plan {
                    auxiliary,
                    main: Err(SkipReason::ReadFailed(err.to_string())),
                })
            }
        };

        let (original, base) = match state {
            FileState::Absent | FileState::Empty => {
                match self.synthesizer.create(&class_name, template, variant)? {
                    Some(content) => (None, content),
                    None => {
                        return Ok(Plan {
                            auxiliary,
                            main: Err(SkipReason::EmptyClassName),
                        })
                    }
                }
            }
            FileState::Content(content) => {
                let base = if annotation.is_matrix && self.is_fresh(&path) {
                    content.replace(REPEATER_EXTENDS, MATRIX_EXTENDS)
                } else {
                    content.clone()
                };
                (Some(content), base)
            }
        };

        let patched = self.patcher.patch(&base, &annotation.text);
        if patched.outcome == PatchOutcome::NoDeclaration {
            debug!(template = %template.name, path = %path.display(), "no class declaration, leaving stub alone");
            return Ok(Plan {
                auxiliary,
                main: Err(SkipReason::NoDeclaration),
            });
        }

        let changed = original.as_deref() != Some(patched.content.as_str());
        Ok(Plan {
            auxiliary,
            main: Ok(MainPlan {
                file: StubFile {
                    path,
                    content: patched.content,
                },
                existed: original.is_some(),
                changed,
            }),
        })
    }

    fn auxiliary_files(&self, annotation: &Annotation) -> anyhow::Result<Vec<StubFile>> {
        annotation
            .auxiliary
            .iter()
            .map(|stub| {
                Ok(StubFile {
                    path: self.store.path_for(&stub.class_name),
                    content: self.synthesizer.combo_value(stub)?,
                })
            })
            .collect()
    }

    fn write_auxiliary(&self, file: &StubFile) -> anyhow::Result<()> {
        if let Ok(FileState::Content(existing)) = self.store.read(&file.path) {
            if existing == file.content {
                debug!(path = %file.path.display(), "combo value stub up to date");
                return Ok(());
            }
        }
        self.store.write(&file.path, &file.content)?;
        info!(path = %file.path.display(), "wrote combo value stub");
        Ok(())
    }

    /// Whether the stub was created within the matrix correction window.
    fn is_fresh(&self, path: &std::path::Path) -> bool {
        let Some(created) = self.store.created(path) else {
            return false;
        };
        let age = SystemTime::now()
            .duration_since(created)
            .unwrap_or(Duration::ZERO);
        age <= self.config.matrix_fix_window()
    }
}
