//! Provides abstractions over the system components the devices are reached through

pub mod file_watcher;
pub mod write_backend;
