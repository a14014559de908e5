use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Paths of changed files, as delivered by a [FileWatcher].
pub type ChangeReceiver = mpsc::UnboundedReceiver<PathBuf>;

/// Registers files for change notification.
///
/// Notifications are not returned by the watcher itself, they arrive on the
/// [ChangeReceiver] handed out when the watcher is created.
pub trait FileWatcher: Send + 'static {
    /// Start watching a single file.
    fn watch(&mut self, path: &Path) -> Result<()>;

    /// Watch a file again after a notification for it.
    ///
    /// Files are often replaced instead of rewritten in place (a new file is
    /// written and renamed over the old one). The old registration dies with
    /// the old file, so every notification has to be followed by this.
    fn rewatch(&mut self, path: &Path) -> Result<()>;
}
