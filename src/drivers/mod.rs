//! Peripheral drivers and one-shot hardware initialisation.

pub mod fuel_timer;
pub mod hw_init;
pub mod lcd;
