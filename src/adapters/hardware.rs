//! Hardware adapter: bridges board peripherals to the register ports.
//!
//! This is the only module in the system that touches actual hardware.
//! The converter strobes and indicator LED are plain GPIOs, the pulse
//! counter is a PCNT unit and the fuel timer is a one-shot `esp_timer`.
//! On non-espidf targets the same calls land on the host board model in
//! [`hw_init`].

use crate::app::ports::{ConverterLines, CounterRegisters, IndicatorPort, TimerRegisters};
use crate::drivers::fuel_timer::overflow_period_us;
use crate::drivers::hw_init;
use crate::pins;

/// Concrete adapter that puts the board behind the register-level ports.
pub struct ClusterHardware {
    timer_tick_us: u32,
    timer_load: u16,
}

impl ClusterHardware {
    /// Call after [`hw_init::init_peripherals`] has succeeded.
    pub fn new(timer_tick_us: u32) -> Self {
        Self {
            timer_tick_us,
            timer_load: 0,
        }
    }
}

// ── ConverterLines implementation ─────────────────────────────

impl ConverterLines for ClusterHardware {
    fn set_write(&mut self, high: bool) {
        hw_init::gpio_write(pins::ADC_WR_GPIO, high);
    }

    fn set_read(&mut self, high: bool) {
        hw_init::gpio_write(pins::ADC_RD_GPIO, high);
    }

    fn conversion_busy(&mut self) -> bool {
        hw_init::gpio_read(pins::ADC_INTR_GPIO)
    }

    fn read_data_bus(&mut self) -> u8 {
        pins::ADC_DATA_GPIOS
            .iter()
            .enumerate()
            .fold(0u8, |acc, (bit, &pin)| acc | (u8::from(hw_init::gpio_read(pin)) << bit))
    }
}

// ── CounterRegisters implementation ───────────────────────────

impl CounterRegisters for ClusterHardware {
    fn configure_external_count(&mut self) {
        hw_init::pcnt_clear();
    }

    fn set_running(&mut self, run: bool) {
        hw_init::pcnt_set_running(run);
    }

    fn read_high(&mut self) -> u8 {
        hw_init::pcnt_count().to_be_bytes()[0]
    }

    fn read_low(&mut self) -> u8 {
        hw_init::pcnt_count().to_be_bytes()[1]
    }
}

// ── TimerRegisters implementation ─────────────────────────────

impl TimerRegisters for ClusterHardware {
    fn configure_interval_mode(&mut self) {
        // esp_timer has a single one-shot mode.
    }

    fn load(&mut self, high: u8, low: u8) {
        self.timer_load = u16::from_be_bytes([high, low]);
    }

    fn set_running(&mut self, run: bool) {
        if run {
            let period = overflow_period_us(self.timer_load, self.timer_tick_us);
            hw_init::fuel_timer_start(period.unwrap_or(u32::MAX));
        } else {
            hw_init::fuel_timer_stop();
        }
    }

    fn overflowed(&mut self) -> bool {
        hw_init::fuel_timer_overflowed()
    }

    fn clear_overflow(&mut self) {
        hw_init::fuel_timer_clear_overflow();
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl IndicatorPort for ClusterHardware {
    fn set_over_temperature(&mut self, on: bool) {
        hw_init::gpio_write(pins::OVER_TEMP_LED_GPIO, on);
    }
}
