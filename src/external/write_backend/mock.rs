use super::WriteBackend;
use crate::device::{DeviceClass, DeviceKey};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// A write observed by [MockWriteBackend]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    pub key: DeviceKey,
    pub value: u32,
    pub at: Instant,
}

/// A mock [WriteBackend], usable when testing the code which writes.
///
/// Clones share the record of writes.
#[derive(Debug, Clone, Default)]
pub struct MockWriteBackend {
    writes: Arc<Mutex<Vec<RecordedWrite>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockWriteBackend {
    pub fn new() -> MockWriteBackend {
        MockWriteBackend::default()
    }

    /// Set whether writes should fail. Failed writes are not recorded.
    pub fn set_failure_mode(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().unwrap().clone()
    }

    /// Written values only, in order
    pub fn values(&self) -> Vec<u32> {
        self.writes().into_iter().map(|w| w.value).collect()
    }
}

#[async_trait]
impl WriteBackend for MockWriteBackend {
    async fn write(&self, class: DeviceClass, id: &str, value: u32) -> Result<()> {
        if *self.should_fail.lock().unwrap() {
            return Err(anyhow::anyhow!("Mock WriteBackend is failing"));
        }
        self.writes.lock().unwrap().push(RecordedWrite {
            key: DeviceKey::new(class, id),
            value,
            at: Instant::now(),
        });
        Ok(())
    }
}
