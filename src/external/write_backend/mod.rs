/// Durable writes of device brightness
pub mod interface;
pub mod logind;
#[cfg(test)]
pub mod mock;
pub mod sysfs;

pub use interface::*;
