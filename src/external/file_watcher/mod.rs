/// Change notifications for device attribute files
pub mod interface;
#[cfg(test)]
pub mod mock;
pub mod notify_watcher;

pub use interface::*;
