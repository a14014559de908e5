//! In-memory mirror of the kernel's brightness-capable devices

pub mod catalog;
pub mod class;
pub mod entry;

pub use catalog::Catalog;
pub use class::DeviceClass;
pub use entry::{DeviceEntry, DeviceKey, DeviceSnapshot};

use thiserror::Error;

/// Name of the attribute holding a device's current brightness
pub const CURRENT_ATTRIBUTE: &str = "brightness";

/// Name of the attribute holding a device's maximal brightness
pub const MAX_ATTRIBUTE: &str = "max_brightness";

/// Default parent directory of the device class directories
pub const DEFAULT_CLASS_ROOT: &str = "/sys/class";

/// Misuse of the device layer. Failing hardware is not reported this way,
/// it is only logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeviceError {
    /// The key matches no discovered device
    #[error("no such device: {0}")]
    UnknownDevice(DeviceKey),

    /// A class name other than `backlight` or `leds`
    #[error("unknown device class {0:?}, expected \"backlight\" or \"leds\"")]
    UnknownClass(String),

    /// A path outside `<root>/<class>/<id>/brightness`
    #[error("{0} is not a device brightness attribute")]
    UnexpectedPath(String),

    /// Neither a raw value nor a percentage
    #[error("invalid brightness level {0:?}, expected a number or a percentage like 40%")]
    InvalidLevel(String),
}

#[cfg(test)]
mod test;
