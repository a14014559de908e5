use super::DeviceClass;
use crate::control::coordination::WriteCoordination;
use std::{fmt, path::PathBuf};

/// Identifies a device: its class and its directory name within the class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceKey {
    pub class: DeviceClass,
    pub id: String,
}

impl DeviceKey {
    pub fn new(class: DeviceClass, id: impl Into<String>) -> DeviceKey {
        DeviceKey {
            class,
            id: id.into(),
        }
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.class, self.id)
    }
}

/// The mirror of a single device.
///
/// `current` never exceeds `max`. `max` is read once at discovery, the
/// hardware doesn't change its range at runtime.
#[derive(Debug, Clone)]
pub struct DeviceEntry {
    key: DeviceKey,
    current: u32,
    max: u32,
    path: PathBuf,
    pub(crate) coordination: WriteCoordination,
}

impl DeviceEntry {
    /// An entry with no write in progress. `current` is limited to `max`.
    pub fn new(key: DeviceKey, current: u32, max: u32, path: PathBuf) -> DeviceEntry {
        DeviceEntry {
            key,
            current: current.min(max),
            max,
            path,
            coordination: WriteCoordination::Idle,
        }
    }

    pub fn key(&self) -> &DeviceKey {
        &self.key
    }

    /// Last requested or observed value
    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Location of the current-value attribute, used for writes and watches.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// `current` as a fraction of `max`, 0 for devices with a zero range
    pub fn normalized(&self) -> f64 {
        normalize(self.current, self.max)
    }

    /// Store a newly known value, limited to the device's range.
    ///
    /// Returns whether the stored value changed.
    pub fn set_current(&mut self, value: u32) -> bool {
        let value = self.clamp(value);
        let changed = value != self.current;
        self.current = value;
        changed
    }

    /// The closest value the device can take
    pub fn clamp(&self, value: u32) -> u32 {
        value.min(self.max)
    }

    pub fn snapshot(&self) -> DeviceSnapshot {
        DeviceSnapshot {
            key: self.key.clone(),
            current: self.current,
            max: self.max,
        }
    }
}

/// A detached copy of an entry's externally visible state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSnapshot {
    pub key: DeviceKey,
    pub current: u32,
    pub max: u32,
}

impl DeviceSnapshot {
    pub fn normalized(&self) -> f64 {
        normalize(self.current, self.max)
    }

    /// `current` as a percentage of `max`
    pub fn percent(&self) -> f64 {
        self.normalized() * 100.0
    }
}

fn normalize(current: u32, max: u32) -> f64 {
    if max == 0 {
        0.0
    } else {
        current as f64 / max as f64
    }
}
