use super::WriteBackend;
use crate::device::DeviceClass;
use anyhow::Result;
use async_trait::async_trait;
use logind_zbus::session::SessionProxy;
use zbus;

/// logind's alias for the session of the calling process
const OWN_SESSION_PATH: &str = "/org/freedesktop/login1/session/auto";

/// A [WriteBackend] which has logind perform the write through the session's
/// SetBrightness method, so that no write access to the device files is needed.
#[derive(Debug, Clone)]
pub struct LogindWriteBackend {
    proxy: SessionProxy<'static>,
}

impl LogindWriteBackend {
    /// Create a backend acting on behalf of this process' session.
    pub async fn new(connection: zbus::Connection) -> Result<LogindWriteBackend> {
        let proxy = SessionProxy::builder(&connection)
            .path(OWN_SESSION_PATH)?
            .build()
            .await?;
        Ok(LogindWriteBackend { proxy })
    }
}

#[async_trait]
impl WriteBackend for LogindWriteBackend {
    async fn write(&self, class: DeviceClass, id: &str, value: u32) -> Result<()> {
        Ok(self
            .proxy
            .set_brightness(class.as_str(), id, value)
            .await?)
    }
}
