//! Instrument-cluster firmware library.
//!
//! Exposes the control loop and its ports for integration testing. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod layout;
pub mod pins;
pub mod toggle;

pub mod adapters;
pub mod drivers;
pub mod sensors;
