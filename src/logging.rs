//! Logging initialization
//!
//! Structured logging with `tracing`. Output goes to stderr so that
//! `preview` can print stub content on stdout, or to a log file when
//! `PAGESTUBS_LOG_FILE` is set.
//!
//! | variable                          | default   |
//! |-----------------------------------|-----------|
//! | `PAGESTUBS_LOG_LEVEL`             | `info`    |
//! | `PAGESTUBS_LOG_FORMAT`            | `compact` |
//! | `PAGESTUBS_LOG_FILE`              | unset     |
//! | `PAGESTUBS_LOG_TARGET_FILTER`     | unset     |
//! | `PAGESTUBS_LOG_INCLUDE_LOCATION`  | `false`   |
//! | `PAGESTUBS_LOG_PROFILE`           | unset     |
//!
//! With `PAGESTUBS_LOG_PROFILE=dev` the defaults become `debug`, `pretty`
//! and file:line locations.
//! `RUST_LOG`, when set, takes precedence over `PAGESTUBS_LOG_LEVEL`.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for machines, pretty or compact for people
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    /// Log format: json/pretty/compact
    pub format: LogFormat,
    /// Append to this file instead of stderr
    pub log_file: Option<PathBuf>,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Compact,
            log_file: None,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from a variable lookup. `PAGESTUBS_LOG_PROFILE=dev` starts from
    /// [`LogConfig::default_dev`]; individual variables still override it.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = match lookup("PAGESTUBS_LOG_PROFILE").as_deref() {
            Some(profile) if profile.eq_ignore_ascii_case("dev") => Self::default_dev(),
            _ => Self::default(),
        };
        Self {
            log_level: lookup("PAGESTUBS_LOG_LEVEL").unwrap_or(base.log_level),
            format: lookup("PAGESTUBS_LOG_FORMAT")
                .map_or(base.format, |s| LogFormat::parse(&s)),
            log_file: lookup("PAGESTUBS_LOG_FILE")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .or(base.log_file),
            target_filter: lookup("PAGESTUBS_LOG_TARGET_FILTER").or(base.target_filter),
            include_location: lookup("PAGESTUBS_LOG_INCLUDE_LOCATION")
                .and_then(|s| s.parse().ok())
                .unwrap_or(base.include_location),
        }
    }

    /// Verbose configuration for local debugging
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            log_file: None,
            target_filter: None,
            include_location: true,
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Install the global subscriber.
///
/// With a log file, output goes through a non-blocking writer; keep the
/// returned guard alive until exit so buffered lines are flushed.
///
/// # Errors
///
/// Fails if the log file's directory cannot be created or a global
/// subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    if let Some(target_filter) = &config.target_filter {
        for filter in target_filter.split(',') {
            let filter = filter.trim();
            if !filter.is_empty() {
                if let Ok(directive) = filter.parse() {
                    env_filter = env_filter.add_directive(directive);
                } else {
                    eprintln!("Warning: Invalid log filter directive: {}", filter);
                }
            }
        }
    }

    let (writer, guard, ansi) = match &config.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(&dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), None, true),
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_ansi(ansi)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_ansi(ansi)
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}
