use super::{ChangeReceiver, FileWatcher};
use anyhow::{anyhow, Result};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tokio::sync::mpsc;

/// Registration calls seen by a [MockFileWatcher]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCall {
    Watch(PathBuf),
    Rewatch(PathBuf),
}

/// A mock [FileWatcher]. Notifications are produced on demand with
/// [MockFileWatcher::notify_change] instead of by the filesystem.
#[derive(Debug, Clone)]
pub struct MockFileWatcher {
    calls: Arc<Mutex<Vec<WatchCall>>>,
    should_fail: Arc<Mutex<bool>>,
    sender: mpsc::UnboundedSender<PathBuf>,
}

impl MockFileWatcher {
    pub fn new() -> (MockFileWatcher, ChangeReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            MockFileWatcher {
                calls: Arc::new(Mutex::new(vec![])),
                should_fail: Arc::new(Mutex::new(false)),
                sender,
            },
            receiver,
        )
    }

    /// Set whether (re)registrations should fail. Failing calls are still recorded.
    pub fn set_failure_mode(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    pub fn notify_change(&self, path: impl Into<PathBuf>) {
        self.sender
            .send(path.into())
            .expect("Nobody is listening for changes");
    }

    pub fn calls(&self) -> Vec<WatchCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: WatchCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if *self.should_fail.lock().unwrap() {
            Err(anyhow!("Mock FileWatcher is failing"))
        } else {
            Ok(())
        }
    }
}

impl FileWatcher for MockFileWatcher {
    fn watch(&mut self, path: &Path) -> Result<()> {
        self.record(WatchCall::Watch(path.to_owned()))
    }

    fn rewatch(&mut self, path: &Path) -> Result<()> {
        self.record(WatchCall::Rewatch(path.to_owned()))
    }
}
