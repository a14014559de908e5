//! Control-layer actors and the write coordination they rely on

pub mod coordination;
pub mod device_controller;
pub mod facade;

#[cfg(test)]
mod test;
