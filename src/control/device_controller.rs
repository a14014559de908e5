//! The actor owning every device entry.
//!
//! Requests, file change notifications and deferred flushes are all handled
//! by one task, so the per-device state machines never run concurrently.

use super::coordination::WriteDecision;
use crate::{
    actor::{ActorPort, ActorReceiver},
    device::{catalog, Catalog, DeviceClass, DeviceError, DeviceKey, DeviceSnapshot},
    external::{
        file_watcher::{ChangeReceiver, FileWatcher},
        write_backend::WriteBackend,
    },
};
use anyhow::Result;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::{
    select,
    sync::broadcast,
    time::{self, Instant},
};

/// How many unread change notifications a slow subscriber may lag behind
const UPDATE_BACKLOG: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Every device of a class, ordered by id
    List(DeviceClass),
    Get(DeviceKey),
    /// The first device of a class
    Primary(DeviceClass),
    /// Request a new value for a device. Answered with the value accepted
    /// after limiting it to the device's range.
    Set(DeviceKey, u32),
    GetUpdateDelay,
    /// Change the minimal spacing of writes. In-flight cooldowns keep their
    /// original deadline.
    SetUpdateDelay(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceResponse {
    Devices(Vec<DeviceSnapshot>),
    Device(Option<DeviceSnapshot>),
    Accepted(u32),
    UpdateDelay(Duration),
    Done,
}

pub type DevicePort = ActorPort<DeviceCommand, DeviceResponse, anyhow::Error>;
type DeviceReceiver = ActorReceiver<DeviceCommand, DeviceResponse, anyhow::Error>;

pub struct DeviceController<B: WriteBackend, W: FileWatcher> {
    catalog: Catalog,
    backend: B,
    watcher: W,
    changes: ChangeReceiver,
    update_delay: Duration,
    updates: broadcast::Sender<DeviceSnapshot>,
}

impl<B: WriteBackend, W: FileWatcher> DeviceController<B, W> {
    pub fn new(
        catalog: Catalog,
        backend: B,
        watcher: W,
        changes: ChangeReceiver,
        update_delay: Duration,
    ) -> DeviceController<B, W> {
        let (updates, _) = broadcast::channel(UPDATE_BACKLOG);
        DeviceController {
            catalog,
            backend,
            watcher,
            changes,
            update_delay,
            updates,
        }
    }

    /// Get notified whenever a device gets a value requested, or its value
    /// changes because somebody else wrote to it.
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceSnapshot> {
        self.updates.subscribe()
    }

    /// Start watching the devices and handling requests.
    ///
    /// The controller stops once every clone of the returned port is dropped.
    /// Values still waiting for their write are written before that.
    pub fn spawn(mut self) -> DevicePort {
        let (port, receiver) = ActorPort::make();
        self.watch_devices();
        tokio::spawn(async move {
            self.main_loop(receiver).await;
        });
        port
    }

    fn watch_devices(&mut self) {
        let paths: Vec<PathBuf> = self.catalog.entries().map(|e| e.path().clone()).collect();
        for path in paths {
            if let Err(e) = self.watcher.watch(&path) {
                log::warn!("External changes of {} will go unnoticed: {:#}", path.display(), e);
            }
        }
    }

    // Takes the receiver by value: it has to be dropped only after teardown
    // has finished, since that is what await_shutdown waits for.
    async fn main_loop(mut self, mut receiver: DeviceReceiver) {
        log::info!(
            "Device controller started with {} device(s)",
            self.catalog.len()
        );
        loop {
            let deadline = self.next_flush_deadline();
            select! {
                biased;
                _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.flush_due().await;
                }
                Some(path) = self.changes.recv() => {
                    self.handle_change(path).await;
                }
                request = receiver.recv() => match request {
                    Some(request) => {
                        let response = self.handle_command(request.payload.clone()).await;
                        if let Err(e) = &response {
                            log::error!("Device command failed: {:#}", e);
                        }
                        if request.respond(response).is_err() {
                            log::warn!("Requester went away before getting a response");
                        }
                    }
                    None => break,
                },
            }
        }
        self.tear_down().await;
        drop(receiver);
    }

    async fn tear_down(&mut self) {
        log::debug!("Device controller tearing down");
        while let Some(deadline) = self.next_flush_deadline() {
            time::sleep_until(deadline).await;
            self.flush_due().await;
        }
        log::debug!("Device controller stopped");
    }

    async fn handle_command(&mut self, command: DeviceCommand) -> Result<DeviceResponse> {
        match command {
            DeviceCommand::List(class) => Ok(DeviceResponse::Devices(
                self.catalog.of_class(class).map(|e| e.snapshot()).collect(),
            )),
            DeviceCommand::Get(key) => Ok(DeviceResponse::Device(
                self.catalog.get(&key).map(|e| e.snapshot()),
            )),
            DeviceCommand::Primary(class) => Ok(DeviceResponse::Device(
                self.catalog.primary(class).map(|e| e.snapshot()),
            )),
            DeviceCommand::Set(key, value) => {
                Ok(DeviceResponse::Accepted(self.request(key, value).await?))
            }
            DeviceCommand::GetUpdateDelay => Ok(DeviceResponse::UpdateDelay(self.update_delay)),
            DeviceCommand::SetUpdateDelay(delay) => {
                log::info!("Update delay changed to {:?}", delay);
                self.update_delay = delay;
                Ok(DeviceResponse::Done)
            }
        }
    }

    async fn request(&mut self, key: DeviceKey, value: u32) -> Result<u32, DeviceError> {
        let now = Instant::now();
        let entry = self
            .catalog
            .get_mut(&key)
            .ok_or_else(|| DeviceError::UnknownDevice(key.clone()))?;
        let accepted = entry.clamp(value);
        if accepted != value {
            log::warn!("{}: {} exceeds the maximum, using {}", key, value, accepted);
        }
        let decision = entry.request_write(accepted, now, self.update_delay);
        let snapshot = entry.snapshot();
        self.publish(snapshot);
        if let WriteDecision::Immediate(value) = decision {
            self.write(&key, value).await;
        }
        Ok(accepted)
    }

    /// Reconcile an entry with what its attribute file says now.
    async fn handle_change(&mut self, path: PathBuf) {
        match catalog::read_value(&path).await {
            Ok(value) => self.observe(&path, value),
            Err(e) => log::debug!("Couldn't read changed {}: {}", path.display(), e),
        }
        if let Err(e) = self.watcher.rewatch(&path) {
            log::warn!("Couldn't resume watching {}: {:#}", path.display(), e);
        }
    }

    fn observe(&mut self, path: &Path, value: u32) {
        let key = match self.catalog.resolve_path(path) {
            Ok(key) => key,
            Err(e) => {
                log::warn!("Ignoring change notification: {}", e);
                return;
            }
        };
        let entry = match self.catalog.get_mut(&key) {
            Some(entry) => entry,
            None => {
                log::warn!("Ignoring change of unknown device {}", key);
                return;
            }
        };
        // Our own writes come back through here too, which is harmless
        if entry.set_current(value) {
            log::info!("{} changed to {}/{}", key, entry.current(), entry.max());
            let snapshot = entry.snapshot();
            self.publish(snapshot);
        }
    }

    async fn flush_due(&mut self) {
        let now = Instant::now();
        let delay = self.update_delay;
        let due: Vec<(DeviceKey, u32)> = self
            .catalog
            .entries_mut()
            .filter_map(|e| {
                let flushed = e.take_due_flush(now, delay).map(|v| (e.key().clone(), v));
                e.coordination.settle(now);
                flushed
            })
            .collect();
        for (key, value) in due {
            log::debug!("{}: flushing deferred value {}", key, value);
            self.write(&key, value).await;
        }
    }

    fn next_flush_deadline(&self) -> Option<Instant> {
        self.catalog.entries().filter_map(|e| e.flush_deadline()).min()
    }

    /// Failures are only logged: the cached value stays as requested and the
    /// next request simply tries again.
    async fn write(&mut self, key: &DeviceKey, value: u32) {
        if let Err(e) = self.backend.write(key.class, &key.id, value).await {
            log::warn!("Writing {} to {} failed: {:#}", value, key, e);
        }
    }

    fn publish(&self, snapshot: DeviceSnapshot) {
        // Having no subscribers is fine
        let _ = self.updates.send(snapshot);
    }
}
