
use crate::{
    control::device_controller::{DeviceController, DevicePort},
    device::Catalog,
    external::{file_watcher::mock::MockFileWatcher, write_backend::mock::MockWriteBackend},
    test_support::FakeClassRoot,
};
use std::time::Duration;

/// A controller over the devices in `root`, with mocked writes and watches
async fn spawn_mocked(
    root: &FakeClassRoot,
    update_delay: Duration,
) -> (DevicePort, MockWriteBackend, MockFileWatcher) {
    let backend = MockWriteBackend::new();
    let (watcher, changes) = MockFileWatcher::new();
    let controller = DeviceController::new(
        Catalog::discover_all(root.path()).await,
        backend.clone(),
        watcher.clone(),
        changes,
        update_delay,
    );
    (controller.spawn(), backend, watcher)
}
