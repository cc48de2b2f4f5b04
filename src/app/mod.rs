//! Application core: the control loop and its ports.
//!
//! The loop sequences the converter, pulse counter and fuel timer, applies
//! the fuel and temperature policies, and renders the display.  All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], so the whole loop runs on the host against fakes.

pub mod events;
pub mod ports;
pub mod service;
pub mod state;
