use super::WriteBackend;
use crate::device::{catalog::attribute_path, DeviceClass, DeviceKey};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

/// A [WriteBackend] writing straight into `<root>/<class>/<id>/brightness`.
#[derive(Debug, Clone)]
pub struct SysfsWriteBackend {
    root: PathBuf,
}

impl SysfsWriteBackend {
    pub fn new(root: impl Into<PathBuf>) -> SysfsWriteBackend {
        SysfsWriteBackend { root: root.into() }
    }
}

#[async_trait]
impl WriteBackend for SysfsWriteBackend {
    async fn write(&self, class: DeviceClass, id: &str, value: u32) -> Result<()> {
        let path = attribute_path(&self.root, &DeviceKey::new(class, id));
        let mut f = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .await
            .with_context(|| format!("Couldn't open {} for writing", path.display()))?;
        f.write_all(value.to_string().as_bytes())
            .await
            .with_context(|| format!("Couldn't write to {}", path.display()))?;
        f.flush().await?;
        Ok(())
    }
}
