//! Convenience access to the primary backlight and LED.
//!
//! "Primary" is simply the first device of a class by id. Machines with more
//! than one device of a class only get the first one controlled here.

use super::device_controller::{DeviceCommand, DevicePort, DeviceResponse};
use crate::device::{DeviceClass, DeviceError, DeviceKey, DeviceSnapshot};
use anyhow::{anyhow, Result};
use std::{fmt, str::FromStr};

/// A brightness level as written by a user: `40` is a raw value, `40%` a
/// percentage of the device's maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Level {
    Absolute(u32),
    Percent(f64),
}

impl FromStr for Level {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DeviceError::InvalidLevel(s.to_owned());
        let s = s.trim();
        match s.strip_suffix('%') {
            Some(percent) => {
                let percent: f64 = percent.trim().parse().map_err(|_| invalid())?;
                if percent.is_finite() {
                    Ok(Level::Percent(percent))
                } else {
                    Err(invalid())
                }
            }
            None => s.parse().map(Level::Absolute).map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Absolute(value) => write!(f, "{}", value),
            Level::Percent(percent) => write!(f, "{}%", percent),
        }
    }
}

/// Raw value closest to `fraction` of `max`, with `fraction` limited to 0..1
pub fn raw_from_normalized(fraction: f64, max: u32) -> u32 {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    (fraction * max as f64).round() as u32
}

/// Reads and writes the primary device of each class through the device
/// controller. An empty class is not an error: reads give 0 and writes are
/// skipped, both with a warning.
#[derive(Clone)]
pub struct BrightnessFacade {
    port: DevicePort,
}

impl BrightnessFacade {
    pub fn new(port: DevicePort) -> BrightnessFacade {
        BrightnessFacade { port }
    }

    pub async fn primary(&self, class: DeviceClass) -> Result<Option<DeviceSnapshot>> {
        match self.port.request(DeviceCommand::Primary(class)).await? {
            DeviceResponse::Device(device) => Ok(device),
            other => Err(anyhow!("Unexpected response {:?}", other)),
        }
    }

    pub async fn absolute(&self, class: DeviceClass) -> Result<u32> {
        Ok(self.read(class).await?.map_or(0, |d| d.current))
    }

    pub async fn max(&self, class: DeviceClass) -> Result<u32> {
        Ok(self.read(class).await?.map_or(0, |d| d.max))
    }

    /// Current value as a fraction of the maximum, 0..1
    pub async fn normalized(&self, class: DeviceClass) -> Result<f64> {
        Ok(self.read(class).await?.map_or(0.0, |d| d.normalized()))
    }

    pub async fn percent(&self, class: DeviceClass) -> Result<f64> {
        Ok(self.normalized(class).await? * 100.0)
    }

    pub async fn set_absolute(&self, class: DeviceClass, value: u32) -> Result<()> {
        if let Some(device) = self.target(class).await? {
            self.set(device.key, value).await?;
        }
        Ok(())
    }

    pub async fn set_normalized(&self, class: DeviceClass, fraction: f64) -> Result<()> {
        if let Some(device) = self.target(class).await? {
            self.set(device.key, raw_from_normalized(fraction, device.max))
                .await?;
        }
        Ok(())
    }

    pub async fn set_percent(&self, class: DeviceClass, percent: f64) -> Result<()> {
        self.set_normalized(class, percent / 100.0).await
    }

    pub async fn set_level(&self, class: DeviceClass, level: Level) -> Result<()> {
        match level {
            Level::Absolute(value) => self.set_absolute(class, value).await,
            Level::Percent(percent) => self.set_percent(class, percent).await,
        }
    }

    /// Stop using the controller and wait until it has written everything
    /// still pending. Other clones of the facade or the port keep it alive.
    pub async fn shutdown(self) {
        self.port.await_shutdown().await
    }

    async fn read(&self, class: DeviceClass) -> Result<Option<DeviceSnapshot>> {
        let device = self.primary(class).await?;
        if device.is_none() {
            log::warn!("Failed to read {} brightness. No devices found", class);
        }
        Ok(device)
    }

    async fn target(&self, class: DeviceClass) -> Result<Option<DeviceSnapshot>> {
        let device = self.primary(class).await?;
        if device.is_none() {
            log::warn!("Failed to set {} brightness. No devices found", class);
        }
        Ok(device)
    }

    async fn set(&self, key: DeviceKey, value: u32) -> Result<u32> {
        match self.port.request(DeviceCommand::Set(key, value)).await? {
            DeviceResponse::Accepted(accepted) => Ok(accepted),
            other => Err(anyhow!("Unexpected response {:?}", other)),
        }
    }
}
