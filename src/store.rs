//! File access for generated stubs.
//!
//! The generator never touches the filesystem directly; it goes through a
//! [`FileStore`], so tests can swap in a store with scripted failures.

use anyhow::Context;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// What reading a stub path found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileState {
    /// No file at the path
    Absent,
    /// File exists but holds nothing (or only whitespace)
    Empty,
    /// Existing content
    Content(String),
}

/// Storage for page-class stub files.
pub trait FileStore {
    /// Where the stub for `class_name` lives.
    fn path_for(&self, class_name: &str) -> PathBuf;

    /// Read a stub. A missing file is [`FileState::Absent`], not an error.
    fn read(&self, path: &Path) -> io::Result<FileState>;

    /// Write a stub, creating parent directories as needed.
    fn write(&self, path: &Path, content: &str) -> anyhow::Result<()>;

    /// Creation time, falling back to modification time where the platform
    /// does not record creation. `None` when neither is available.
    fn created(&self, path: &Path) -> Option<SystemTime>;
}

/// [`FileStore`] over a directory on disk.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
    extension: String,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        FsStore {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileStore for FsStore {
    fn path_for(&self, class_name: &str) -> PathBuf {
        self.root.join(format!("{class_name}.{}", self.extension))
    }

    fn read(&self, path: &Path) -> io::Result<FileState> {
        match std::fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => Ok(FileState::Empty),
            Ok(content) => Ok(FileState::Content(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(FileState::Absent),
            Err(err) => Err(err),
        }
    }

    fn write(&self, path: &Path, content: &str) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write stub: {}", path.display()))
    }

    fn created(&self, path: &Path) -> Option<SystemTime> {
        let meta = std::fs::metadata(path).ok()?;
        meta.created().or_else(|_| meta.modified()).ok()
    }
}
