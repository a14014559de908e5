//! Discovery of devices under the kernel's device class directories

use super::{
    DeviceClass, DeviceEntry, DeviceError, DeviceKey, CURRENT_ATTRIBUTE, MAX_ATTRIBUTE,
};
use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
};
use tokio::{fs, io::AsyncReadExt};

/// The table of every known device, keyed by class and id.
///
/// Devices are discovered once; appearing or disappearing hardware is not
/// picked up afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
    entries: BTreeMap<DeviceKey, DeviceEntry>,
}

impl Catalog {
    /// Discover the devices of every class under `root` (normally `/sys/class`).
    pub async fn discover_all(root: impl Into<PathBuf>) -> Catalog {
        let mut catalog = Catalog::from_entries(root, vec![]);
        for class in DeviceClass::ALL {
            match discover(&catalog.root, class).await {
                Ok(found) => {
                    log::info!("Found {} {} device(s)", found.len(), class);
                    catalog
                        .entries
                        .extend(found.into_values().map(|e| (e.key().clone(), e)));
                }
                Err(e) => log::info!("No {} devices available: {:#}", class, e),
            }
        }
        if catalog.is_empty() {
            log::warn!("No brightness devices under {}", catalog.root.display());
        }
        catalog
    }

    /// Build a catalog from already known entries. A relative `root` is taken
    /// relative to the working directory.
    pub fn from_entries(
        root: impl Into<PathBuf>,
        entries: impl IntoIterator<Item = DeviceEntry>,
    ) -> Catalog {
        Catalog {
            root: absolute(root.into()),
            entries: entries
                .into_iter()
                .map(|e| (e.key().clone(), e))
                .collect(),
        }
    }

    /// The entry of a device, if it was discovered
    pub fn get(&self, key: &DeviceKey) -> Option<&DeviceEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &DeviceKey) -> Option<&mut DeviceEntry> {
        self.entries.get_mut(key)
    }

    /// Every entry, ordered by class then id
    pub fn entries(&self) -> impl Iterator<Item = &DeviceEntry> {
        self.entries.values()
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut DeviceEntry> {
        self.entries.values_mut()
    }

    /// Entries of one class, ordered by id
    pub fn of_class(&self, class: DeviceClass) -> impl Iterator<Item = &DeviceEntry> {
        self.entries.values().filter(move |e| e.key().class == class)
    }

    /// The first device of a class (lowest id). On machines with several
    /// devices of one class, which one is "primary" is a convention only.
    pub fn primary(&self, class: DeviceClass) -> Option<&DeviceEntry> {
        self.of_class(class).next()
    }

    /// Number of discovered devices of all classes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Map a path of the form `<root>/<class>/<id>/brightness` back to the
    /// device it belongs to. The device doesn't have to be known.
    pub fn resolve_path(&self, path: &Path) -> Result<DeviceKey, DeviceError> {
        let unexpected = || DeviceError::UnexpectedPath(path.display().to_string());
        let relative = path.strip_prefix(&self.root).map_err(|_| unexpected())?;
        let parts = relative
            .components()
            .map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(unexpected)?;
        match parts.as_slice() {
            [class, id, attribute] if *attribute == CURRENT_ATTRIBUTE => DeviceClass::ALL
                .into_iter()
                .find(|c| c.as_str() == *class)
                .map(|class| DeviceKey::new(class, *id))
                .ok_or_else(unexpected),
            _ => Err(unexpected()),
        }
    }
}

// Watchers report absolute paths, which have to match the root for resolve_path
fn absolute(root: PathBuf) -> PathBuf {
    if root.is_absolute() {
        return root;
    }
    match std::env::current_dir() {
        Ok(dir) => dir.join(root),
        Err(e) => {
            log::warn!("Couldn't resolve {}: {}", root.display(), e);
            root
        }
    }
}

/// Location of the current-value attribute of a device
pub fn attribute_path(root: &Path, key: &DeviceKey) -> PathBuf {
    root.join(key.class.as_str())
        .join(&key.id)
        .join(CURRENT_ATTRIBUTE)
}

/// Read every device of `class` under `root`, keyed by directory name.
///
/// Directories missing either attribute are not devices and are skipped.
pub async fn discover(root: &Path, class: DeviceClass) -> Result<BTreeMap<String, DeviceEntry>> {
    let class_dir = root.join(class.as_str());
    let mut dir = fs::read_dir(&class_dir)
        .await
        .with_context(|| format!("Couldn't list {}", class_dir.display()))?;
    let mut devices = BTreeMap::new();
    while let Some(dir_entry) = dir.next_entry().await? {
        // Class directories contain symlinks to the real device directories
        let is_dir = fs::metadata(dir_entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        let id = match dir_entry.file_name().into_string() {
            Ok(id) if is_dir => id,
            _ => continue,
        };
        let device_dir = dir_entry.path();
        let current_path = device_dir.join(CURRENT_ATTRIBUTE);
        let (current, max) = match (
            read_value(&current_path).await,
            read_value(device_dir.join(MAX_ATTRIBUTE)).await,
        ) {
            (Ok(current), Ok(max)) => (current, max),
            _ => {
                log::debug!("Skipping {}, not a brightness device", device_dir.display());
                continue;
            }
        };
        log::debug!("Discovered {}/{} at {}/{}", class, id, current, max);
        devices.insert(
            id.clone(),
            DeviceEntry::new(DeviceKey::new(class, id), current, max, current_path),
        );
    }
    Ok(devices)
}

/// Read an attribute file. Fails only when the file can't be read, content
/// which isn't a number counts as 0.
pub async fn read_value(path: impl AsRef<Path>) -> Result<u32> {
    let mut f = fs::File::open(path.as_ref()).await?;
    let mut contents = String::new();
    f.read_to_string(&mut contents).await?;
    Ok(parse_value(&contents))
}

/// Attribute file content as a number, 0 when it isn't one
pub fn parse_value(contents: &str) -> u32 {
    contents.trim().parse().unwrap_or(0)
}
