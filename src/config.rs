//! Cluster configuration parameters
//!
//! Every tunable constant of the instrument cluster lives here as a named
//! field.  The configuration is compiled in; there is no runtime loading
//! path.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Power-up level of the system-on flag (`false` = STOPPED).
pub const INITIAL_SYSTEM_ON: bool = false;

/// Core cluster configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    // --- Timing ---
    /// Settling wait after latching a converter sample (milliseconds)
    pub adc_settle_ms: u32,
    /// Delay at the end of every loop iteration (milliseconds)
    pub refresh_delay_ms: u32,
    /// Poll interval of the supervisor while the system is off (milliseconds)
    pub idle_poll_ms: u32,

    // --- Fuel timer ---
    /// 16-bit value loaded into the timer register pair on each arm
    pub fuel_timer_preset: u16,
    /// Duration of one timer count (microseconds)
    pub timer_tick_us: u32,

    // --- Fuel ---
    /// Fuel level at power-up (0-100%)
    pub initial_fuel_percent: u8,
    /// Fuel consumed per timer overflow (%)
    pub fuel_step_percent: u8,
    /// Below this the timer is no longer armed and the vehicle stops (%)
    pub low_fuel_threshold_percent: u8,
    /// At or below this the low-fuel warning is shown (%)
    pub low_fuel_warning_percent: u8,

    // --- Temperature ---
    /// Indicator asserted strictly above this temperature (Celsius)
    pub over_temperature_c: u16,
    /// Converter resolution (millivolts per count)
    pub millivolts_per_count: u16,
    /// Sensor slope (millivolts per degree Celsius)
    pub millivolts_per_degree: u16,

    // --- Speed ---
    /// Placeholder increment added to the speed every iteration
    pub speed_step: u32,
    /// Pulse count used to seed the speed at power-up
    pub seed_pulse_count: u32,
    /// Wheel circumference (metres)
    pub wheel_circumference_m: f32,
    /// Sensor pulses per wheel revolution
    pub pulses_per_revolution: u32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            // Timing
            adc_settle_ms: 250,
            refresh_delay_ms: 100,
            idle_poll_ms: 50,

            // Fuel timer: 12 MHz crystal, 12 clocks per machine cycle
            fuel_timer_preset: 0xFE17,
            timer_tick_us: 1,

            // Fuel
            initial_fuel_percent: 100,
            fuel_step_percent: 10,
            low_fuel_threshold_percent: 10,
            low_fuel_warning_percent: 20,

            // Temperature (LM35: 10 mV/C, ADC0804 at 2.56 V span)
            over_temperature_c: 40,
            millivolts_per_count: 10,
            millivolts_per_degree: 10,

            // Speed
            speed_step: 5,
            seed_pulse_count: 50,
            wheel_circumference_m: 1.884,
            pulses_per_revolution: 20,
        }
    }
}

impl ClusterConfig {
    /// Reject values that leave the control loop ill-defined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_fuel_percent > 100 {
            return Err(ConfigError::ValidationFailed(
                "initial_fuel_percent must be 0-100",
            ));
        }
        if self.fuel_step_percent == 0 {
            return Err(ConfigError::ValidationFailed(
                "fuel_step_percent must be non-zero",
            ));
        }
        if self.low_fuel_warning_percent < self.low_fuel_threshold_percent {
            return Err(ConfigError::ValidationFailed(
                "low_fuel_warning_percent below low_fuel_threshold_percent",
            ));
        }
        if self.millivolts_per_degree == 0 {
            return Err(ConfigError::ValidationFailed(
                "millivolts_per_degree must be non-zero",
            ));
        }
        if self.pulses_per_revolution == 0 {
            return Err(ConfigError::ValidationFailed(
                "pulses_per_revolution must be non-zero",
            ));
        }
        if !(self.wheel_circumference_m.is_finite() && self.wheel_circumference_m > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "wheel_circumference_m must be positive",
            ));
        }
        if self.timer_tick_us == 0 {
            return Err(ConfigError::ValidationFailed(
                "timer_tick_us must be non-zero",
            ));
        }
        if self.fuel_timer_period_us().is_none() {
            return Err(ConfigError::ValidationFailed(
                "fuel timer period overflows u32",
            ));
        }
        Ok(())
    }

    /// Speed shown at power-up (km/h), computed once from the seed pulse count.
    ///
    /// `pulses / pulses_per_rev` revolutions of `circumference` metres,
    /// scaled from metres per second to km/h and truncated.
    pub fn seed_speed(&self) -> u32 {
        let metres = self.seed_pulse_count as f32 * self.wheel_circumference_m;
        (metres * 3600.0 / (1000.0 * self.pulses_per_revolution as f32)) as u32
    }

    /// Wall-clock period of one fuel-timer overflow (microseconds).
    pub fn fuel_timer_period_us(&self) -> Option<u32> {
        crate::drivers::fuel_timer::overflow_period_us(self.fuel_timer_preset, self.timer_tick_us)
    }
}
