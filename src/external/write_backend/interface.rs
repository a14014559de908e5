use crate::device::DeviceClass;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::str::FromStr;

/// Performs the final write of a brightness value to a device.
///
/// Implementations only write; retries and spacing of writes are the
/// caller's business.
#[async_trait]
pub trait WriteBackend: Send + Sync + 'static {
    async fn write(&self, class: DeviceClass, id: &str, value: u32) -> Result<()>;
}

/// Which [WriteBackend] the daemon uses, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Write the attribute files directly. Needs write permission on them.
    Sysfs,
    /// Ask logind to write on behalf of the current session.
    Logind,
}

impl Default for BackendKind {
    fn default() -> Self {
        BackendKind::Sysfs
    }
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sysfs" => Ok(BackendKind::Sysfs),
            "logind" => Ok(BackendKind::Logind),
            other => Err(anyhow::anyhow!(
                "unknown backend {:?}, expected \"sysfs\" or \"logind\"",
                other
            )),
        }
    }
}
