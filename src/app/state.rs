//! Loop-owned cluster state.
//!
//! Every field is a plain scalar reset at power-up.  Only the control loop
//! writes here; the toggle flag lives in [`crate::toggle`].

use crate::config::ClusterConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterState {
    /// Last converter reading (valid after the first conversion).
    pub raw_sample: u8,
    /// Sensor voltage derived from `raw_sample`.
    pub millivolts: u16,
    /// Engine temperature (Celsius).
    pub temperature_c: u16,
    /// Simulated fuel level (0-100%). Never increases.
    pub fuel_percent: u8,
    /// Last pulse-counter snapshot.  Not fed into `speed`.
    pub pulse_count: u16,
    /// Displayed speed metric.
    pub speed: u32,
    /// Low-fuel warning rendered on the last iteration.
    pub low_fuel: bool,
    /// Over-temperature indicator level after the last iteration.
    pub over_temperature: bool,
    /// Pulse counter halted because fuel ran out.
    pub vehicle_stopped: bool,
}

impl ClusterState {
    /// Power-up state for `config`.
    pub fn initial(config: &ClusterConfig) -> Self {
        Self {
            raw_sample: 0,
            millivolts: 0,
            temperature_c: 0,
            fuel_percent: config.initial_fuel_percent,
            pulse_count: 0,
            speed: config.seed_speed(),
            low_fuel: false,
            over_temperature: false,
            vehicle_stopped: false,
        }
    }
}
