use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::schema::{load_schema, SchemaDocument};

use super::{diff_snapshots, SchemaEvent};

/// Watch a schema document and report what changed on every save.
///
/// `initial` is the snapshot changes are diffed against. On each modify or
/// create event the document is reloaded; a document that fails to load or
/// validate is logged and ignored, and the previous snapshot stays current.
/// Every document that loads becomes the new snapshot, even when it yields
/// no events.
/// `on_change` receives the new snapshot and the events derived from it,
/// and is not called when nothing changed.
///
/// The watcher stops when the returned handle is dropped.
pub fn watch_schema<P, F>(
    schema_path: P,
    initial: SchemaDocument,
    mut on_change: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(SchemaDocument, Vec<SchemaEvent>) + Send + 'static,
{
    let path: PathBuf = schema_path.as_ref().to_path_buf();
    let watch_path = path.clone();
    let mut current = initial;

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                let next = match load_schema(&watch_path) {
                    Ok(next) => next,
                    Err(err) => {
                        warn!(path = %watch_path.display(), error = %format!("{err:#}"), "schema reload failed, keeping previous snapshot");
                        return;
                    }
                };
                let events = diff_snapshots(&current, &next);
                current = next;
                if events.is_empty() {
                    return;
                }
                info!(events = events.len(), "schema changed");
                on_change(current.clone(), events);
            }
            Err(e) => warn!(error = ?e, "watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
