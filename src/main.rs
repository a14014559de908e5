#![warn(missing_docs)]

//! Keeps backlight and LED brightness in sync with the kernel's device files

mod actor;
mod config;
mod control;
mod device;
mod external;
#[cfg(test)]
mod test_support;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use config::Config;
use control::{
    device_controller::{DeviceCommand, DeviceController, DevicePort, DeviceResponse},
    facade::{BrightnessFacade, Level},
};
use device::{Catalog, DeviceClass, DeviceSnapshot};
use external::{
    file_watcher::notify_watcher::NotifyFileWatcher,
    write_backend::{logind::LogindWriteBackend, sysfs::SysfsWriteBackend, BackendKind, WriteBackend},
};
use flexi_logger::Logger;
use std::path::PathBuf;
use tokio::sync::broadcast;

/// Brightness daemon for backlights and LEDs
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// TOML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Directory containing the backlight and leds class directories
    #[clap(long)]
    class_root: Option<PathBuf>,
    /// How writes are performed: sysfs or logind
    #[clap(long)]
    backend: Option<BackendKind>,
    /// Minimal spacing of writes to one device, in milliseconds
    #[clap(long)]
    update_delay: Option<u64>,
    /// Log level used when RUST_LOG is not set
    #[clap(long)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every discovered device
    List,
    /// Print the brightness of the primary device of a class
    Get {
        #[clap(long, default_value = "backlight")]
        class: DeviceClass,
        /// Print a percentage instead of the raw value
        #[clap(long)]
        percent: bool,
    },
    /// Set the brightness of the primary device of a class
    Set {
        #[clap(long, default_value = "backlight")]
        class: DeviceClass,
        /// A raw value like 120, or a percentage like 40%
        level: Level,
    },
    /// Print every brightness change until interrupted
    Monitor,
}

impl Args {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(class_root) = &self.class_root {
            config.class_root = class_root.clone();
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(update_delay) = self.update_delay {
            config.update_delay_ms = update_delay;
        }
        if let Some(log_level) = &self.log_level {
            config.log_level = log_level.clone();
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.config()?;
    let _logger = Logger::try_with_env_or_str(&config.log_level)?.start()?;
    log_panics::init();

    match config.backend {
        BackendKind::Sysfs => {
            let backend = SysfsWriteBackend::new(&config.class_root);
            run(&config, args.command, backend).await
        }
        BackendKind::Logind => {
            let connection = zbus::Connection::system().await?;
            let backend = LogindWriteBackend::new(connection).await?;
            run(&config, args.command, backend).await
        }
    }
}

async fn run<B: WriteBackend>(config: &Config, command: Command, backend: B) -> Result<()> {
    let catalog = Catalog::discover_all(&config.class_root).await;
    let (watcher, changes) = NotifyFileWatcher::new()?;
    let controller =
        DeviceController::new(catalog, backend, watcher, changes, config.update_delay());
    let updates = controller.subscribe();
    let port = controller.spawn();

    match command {
        Command::List => {
            list(&port).await?;
            port.await_shutdown().await;
        }
        Command::Get { class, percent } => {
            let facade = BrightnessFacade::new(port);
            if percent {
                println!("{:.0}%", facade.percent(class).await?);
            } else {
                println!("{}", facade.absolute(class).await?);
            }
            facade.shutdown().await;
        }
        Command::Set { class, level } => {
            let facade = BrightnessFacade::new(port);
            facade.set_level(class, level).await?;
            log::info!("{} brightness set to {}", class, level);
            // Returns once a deferred write has been done too
            facade.shutdown().await;
        }
        Command::Monitor => {
            monitor(updates).await?;
            port.await_shutdown().await;
        }
    }
    Ok(())
}

async fn list(port: &DevicePort) -> Result<()> {
    for class in DeviceClass::ALL {
        match port.request(DeviceCommand::List(class)).await? {
            DeviceResponse::Devices(devices) => devices.iter().for_each(print_device),
            other => return Err(anyhow!("Unexpected response {:?}", other)),
        }
    }
    Ok(())
}

async fn monitor(mut updates: broadcast::Receiver<DeviceSnapshot>) -> Result<()> {
    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(device) => print_device(&device),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    log::warn!("Missed {} brightness changes", missed)
                }
                Err(broadcast::error::RecvError::Closed) => return Ok(()),
            },
            signal = tokio::signal::ctrl_c() => return Ok(signal?),
        }
    }
}

fn print_device(device: &DeviceSnapshot) {
    println!(
        "{}\t{}/{}\t{:.0}%",
        device.key,
        device.current,
        device.max,
        device.percent()
    );
}
