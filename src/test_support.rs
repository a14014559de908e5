//! Fake device class trees for tests

use crate::device::{DeviceClass, DeviceKey, CURRENT_ATTRIBUTE, MAX_ATTRIBUTE};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// A temporary directory laid out like `/sys/class`.
pub struct FakeClassRoot {
    dir: TempDir,
}

impl FakeClassRoot {
    pub fn new() -> FakeClassRoot {
        FakeClassRoot::with_dir(tempfile::tempdir())
    }

    /// Create the tree inside `parent`. A relative `parent` gives a relative
    /// [FakeClassRoot::path].
    pub fn new_in(parent: impl AsRef<Path>) -> FakeClassRoot {
        FakeClassRoot::with_dir(tempfile::tempdir_in(parent))
    }

    fn with_dir(dir: std::io::Result<TempDir>) -> FakeClassRoot {
        let dir = dir.expect("Couldn't create temporary directory");
        for class in DeviceClass::ALL {
            fs::create_dir(dir.path().join(class.as_str())).unwrap();
        }
        FakeClassRoot { dir }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_owned()
    }

    /// Create a device directory with both attributes.
    pub fn add_device(&self, class: DeviceClass, id: &str, current: &str, max: &str) -> PathBuf {
        let device_dir = self.device_dir(class, id);
        fs::create_dir_all(&device_dir).unwrap();
        fs::write(device_dir.join(MAX_ATTRIBUTE), max).unwrap();
        let current_path = device_dir.join(CURRENT_ATTRIBUTE);
        fs::write(&current_path, current).unwrap();
        current_path
    }

    pub fn device_dir(&self, class: DeviceClass, id: &str) -> PathBuf {
        self.dir.path().join(class.as_str()).join(id)
    }

    /// Simulate another program writing to the current-value attribute.
    pub fn write_current(&self, key: &DeviceKey, contents: &str) {
        fs::write(self.device_dir(key.class, &key.id).join(CURRENT_ATTRIBUTE), contents).unwrap();
    }

    pub fn read_current(&self, key: &DeviceKey) -> String {
        fs::read_to_string(self.device_dir(key.class, &key.id).join(CURRENT_ATTRIBUTE)).unwrap()
    }
}
