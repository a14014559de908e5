use super::{ChangeReceiver, FileWatcher};
use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tokio::sync::mpsc;

/// A [FileWatcher] backed by the platform's native mechanism (inotify on Linux).
pub struct NotifyFileWatcher {
    watcher: RecommendedWatcher,
}

impl NotifyFileWatcher {
    pub fn new() -> Result<(NotifyFileWatcher, ChangeReceiver)> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_change(&event.kind) => {
                    for path in event.paths {
                        // Receiver gone means the controller is shutting down
                        let _ = sender.send(path);
                    }
                }
                Ok(_) => {}
                Err(e) => log::warn!("File watcher error: {}", e),
            },
            Config::default(),
        )
        .context("Failed to create file watcher")?;
        Ok((NotifyFileWatcher { watcher }, receiver))
    }
}

fn is_change(kind: &EventKind) -> bool {
    !matches!(kind, EventKind::Access(_))
}

impl FileWatcher for NotifyFileWatcher {
    fn watch(&mut self, path: &Path) -> Result<()> {
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", path.display()))
    }

    fn rewatch(&mut self, path: &Path) -> Result<()> {
        // Fails when the registration already died with a replaced file
        let _ = self.watcher.unwatch(path);
        self.watch(path)
    }
}
