use super::DeviceError;
use std::{fmt, str::FromStr};

/// Category of a brightness-capable device, named after its kernel device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceClass {
    /// Display backlights, `/sys/class/backlight`
    Backlight,
    /// Keyboard, indicator and other LEDs, `/sys/class/leds`
    Led,
}

impl DeviceClass {
    /// Every class, in discovery order
    pub const ALL: [DeviceClass; 2] = [DeviceClass::Backlight, DeviceClass::Led];

    /// Directory name of the class under the class root. Also the subsystem
    /// name logind expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Backlight => "backlight",
            DeviceClass::Led => "leds",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceClass {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlight" => Ok(DeviceClass::Backlight),
            "leds" | "led" => Ok(DeviceClass::Led),
            other => Err(DeviceError::UnknownClass(other.to_owned())),
        }
    }
}
