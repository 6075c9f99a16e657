use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::mpsc;

use crate::config::load_or_default;
use crate::events::{handle_event, handle_events, watch_schema, SchemaEvent};
use crate::generator::{GenerationReport, Generator, TemplateOutcome};
use crate::schema::{load_schema, SchemaDocument};
use crate::store::FsStore;

/// Command-line interface for pagestubs
///
/// Keeps PHP page-class stubs and their `@property` annotation blocks in
/// sync with a content schema.
#[derive(Parser)]
#[command(name = "pagestubs")]
#[command(about = "Generate annotated page-class stubs from a content schema", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Options every command takes.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to the schema document (YAML or JSON)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Path to the generator config (pagestubs.toml)
    /// If not provided, will auto-detect alongside the schema document
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory stubs are written to (overrides `output_dir`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate or refresh stubs
    Generate {
        #[command(flatten)]
        common: CommonArgs,

        /// Only these templates (repeatable); default is every template
        #[arg(short = 't', long = "template")]
        templates: Vec<String>,

        /// Show what would change without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Apply a single schema event
    Event {
        #[command(flatten)]
        common: CommonArgs,

        /// What was saved
        #[arg(value_enum)]
        kind: EventKind,

        /// Name of the saved field, template or field group
        name: String,

        /// Field group of a field-context-saved event
        #[arg(long)]
        fieldgroup: Option<String>,
    },
    /// Regenerate affected stubs whenever the schema document changes
    Watch {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Print the stub a template would get
    Preview {
        #[command(flatten)]
        common: CommonArgs,

        /// Template name
        #[arg(short, long)]
        template: String,
    },
}

/// Event kinds accepted by `pagestubs event`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EventKind {
    /// A field definition was saved
    FieldSaved,
    /// A template was saved
    TemplateSaved,
    /// A field's per-template context was saved (needs --fieldgroup)
    FieldContextSaved,
    /// A field group was saved
    FieldgroupSaved,
}

impl EventKind {
    /// # Errors
    ///
    /// Returns an error for a context event without a field group.
    pub fn to_event(self, name: &str, fieldgroup: Option<&str>) -> anyhow::Result<SchemaEvent> {
        Ok(match self {
            EventKind::FieldSaved => SchemaEvent::FieldSaved {
                field: name.to_string(),
            },
            EventKind::TemplateSaved => SchemaEvent::TemplateSaved {
                template: name.to_string(),
            },
            EventKind::FieldContextSaved => SchemaEvent::FieldContextSaved {
                field: name.to_string(),
                fieldgroup: fieldgroup
                    .context("field-context-saved requires --fieldgroup")?
                    .to_string(),
            },
            EventKind::FieldgroupSaved => SchemaEvent::FieldgroupSaved {
                fieldgroup: name.to_string(),
            },
        })
    }
}

/// Parse the process arguments and run.
pub fn run_cli() -> anyhow::Result<()> {
    run(Cli::parse())
}

/// Run a parsed command line.
///
/// # Errors
///
/// Returns an error if the schema or config cannot be loaded, or if any
/// template failed.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            common,
            templates,
            dry_run,
        } => {
            let (schema, generator) = setup(&common)?;
            if dry_run {
                let names: Vec<&str> = if templates.is_empty() {
                    schema.template_names().collect()
                } else {
                    templates.iter().map(String::as_str).collect()
                };
                let mut failed = 0;
                for name in names {
                    let preview = schema
                        .template(name)
                        .map_err(anyhow::Error::from)
                        .and_then(|template| generator.preview(&template));
                    match preview {
                        Ok(preview) => {
                            for aux in &preview.auxiliary {
                                println!("🔍 {name}: would write {}", aux.path.display());
                            }
                            println!("🔍 {name}: would be {}", preview.outcome);
                        }
                        Err(err) => {
                            failed += 1;
                            println!("❌ {name}: {err:#}");
                        }
                    }
                }
                if failed > 0 {
                    anyhow::bail!("{failed} template(s) failed");
                }
                return Ok(());
            }
            let report = if templates.is_empty() {
                generator.generate_all(&schema)
            } else {
                generator.generate_named(&schema, templates.iter().map(String::as_str))
            };
            finish(&report)
        }
        Commands::Event {
            common,
            kind,
            name,
            fieldgroup,
        } => {
            let event = kind.to_event(&name, fieldgroup.as_deref())?;
            let (schema, generator) = setup(&common)?;
            println!("📣 {event}");
            let report = handle_event(&generator, &schema, &event);
            finish(&report)
        }
        Commands::Watch { common } => {
            let (schema, generator) = setup(&common)?;
            print_report(&generator.generate_all(&schema));

            let (tx, rx) = mpsc::channel::<(SchemaDocument, Vec<SchemaEvent>)>();
            let _watcher = watch_schema(&common.schema, schema, move |next, events| {
                if tx.send((next, events)).is_err() {
                    tracing::warn!("generator loop has stopped, dropping schema change");
                }
            })
            .with_context(|| format!("Failed to watch {}", common.schema.display()))?;
            println!("👀 Watching {}", common.schema.display());

            for (next, events) in rx {
                for event in &events {
                    println!("📣 {event}");
                }
                print_report(&handle_events(&generator, &next, &events));
            }
            Ok(())
        }
        Commands::Preview { common, template } => {
            let (schema, generator) = setup(&common)?;
            let template = schema.template(&template)?;
            let preview = generator.preview(&template)?;
            match preview.stub {
                Some(stub) => {
                    eprintln!("// {}", stub.path.display());
                    print!("{}", stub.content);
                }
                None => eprintln!("{}", preview.outcome),
            }
            Ok(())
        }
    }
}

fn setup(common: &CommonArgs) -> anyhow::Result<(SchemaDocument, Generator<FsStore>)> {
    let mut config = load_or_default(common.config.as_deref(), &common.schema)?;
    if let Some(output) = &common.output {
        config.output_dir = output.clone();
    }
    let schema = load_schema(&common.schema)?;
    let store = FsStore::new(&config.output_dir, &config.extension);
    let generator = Generator::new(config, store)?;
    Ok((schema, generator))
}

fn print_report(report: &GenerationReport) {
    for entry in &report.entries {
        match &entry.result {
            Ok(outcome @ (TemplateOutcome::Created(_) | TemplateOutcome::Updated(_))) => {
                println!("✅ {}: {outcome}", entry.template)
            }
            Ok(outcome @ TemplateOutcome::Unchanged(_)) => {
                println!("ℹ️  {}: {outcome}", entry.template)
            }
            Ok(outcome @ TemplateOutcome::Skipped(_)) => {
                println!("⚠️  {}: {outcome}", entry.template)
            }
            Err(err) => println!("❌ {}: {err}", entry.template),
        }
    }
    println!("{report}");
}

fn finish(report: &GenerationReport) -> anyhow::Result<()> {
    print_report(report);
    if report.has_failures() {
        anyhow::bail!("{} template(s) failed", report.failures().len());
    }
    Ok(())
}
