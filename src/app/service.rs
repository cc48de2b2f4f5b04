//! Application service: the hexagonal core.
//!
//! [`ClusterService`] owns the loop state, the converter protocol, the
//! pulse counter and the fuel timer.  All I/O flows through port traits
//! injected at call sites, making the entire loop testable with mock
//! adapters.
//!
//! ```text
//!  PeripheralPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                     │     ClusterService      │
//!     DisplayPort ◀── │ ADC · fuel · speed · T  │
//!                     └────────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use log::info;

use crate::config::ClusterConfig;
use crate::drivers::fuel_timer::FuelTimer;
use crate::error::ConfigError;
use crate::layout;
use crate::sensors::analog::AnalogReader;
use crate::sensors::pulse_counter::PulseCounter;
use crate::toggle::SystemToggle;

use super::events::{ClusterEvent, TelemetrySnapshot};
use super::ports::{DisplayPort, EventSink, PeripheralPort};
use super::state::ClusterState;

// ───────────────────────────────────────────────────────────────
// ClusterService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct ClusterService {
    config: ClusterConfig,
    state: ClusterState,
    adc: AnalogReader,
    counter: PulseCounter,
    fuel_timer: FuelTimer,
    iterations: u64,
}

impl ClusterService {
    /// Validate `config` and seed the power-up state.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: ClusterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: ClusterState::initial(&config),
            adc: AnalogReader::new(config.adc_settle_ms),
            counter: PulseCounter::new(),
            fuel_timer: FuelTimer::new(config.fuel_timer_preset),
            iterations: 0,
            config,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// One-time peripheral setup: indicator off, display reset, pulse
    /// counter started.
    pub fn start(
        &mut self,
        hw: &mut impl PeripheralPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        hw.set_over_temperature(false);
        display.init();
        self.counter.configure(hw);
        sink.emit(&ClusterEvent::Started {
            speed_seed: self.state.speed,
            fuel_percent: self.state.fuel_percent,
        });
        info!(
            "ClusterService started (speed seed {}, fuel {}%, fuel timer {} us)",
            self.state.speed,
            self.state.fuel_percent,
            self.config.fuel_timer_period_us().unwrap_or_default()
        );
    }

    /// Run iterations while `toggle` reads on.  The flag is sampled once
    /// per iteration boundary.  Returns the number of iterations run.
    pub fn run_while_on(
        &mut self,
        toggle: &SystemToggle,
        hw: &mut impl PeripheralPort,
        display: &mut impl DisplayPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> u64 {
        let mut ran = 0;
        while toggle.is_on() {
            self.iterate(hw, display, delay, sink);
            ran += 1;
        }
        sink.emit(&ClusterEvent::Halted { iterations: ran });
        ran
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// One full pass: sample → speed → fuel → temperature → policy →
    /// render → refresh delay.
    pub fn iterate(
        &mut self,
        hw: &mut impl PeripheralPort,
        display: &mut impl DisplayPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) {
        self.iterations += 1;
        let cfg = &self.config;
        let threshold = cfg.low_fuel_threshold_percent;

        // 1-2. Sensors
        self.state.raw_sample = self.adc.convert(hw, delay);
        self.state.pulse_count = self.counter.read(hw);

        // 3. Placeholder speed step
        self.state.speed = self.state.speed.wrapping_add(cfg.speed_step);

        // 4-5. Fuel
        if self.state.fuel_percent >= threshold {
            self.fuel_timer.arm(hw);
        }
        if self.fuel_timer.check_and_consume(hw) && self.state.fuel_percent >= threshold {
            self.state.fuel_percent = self.state.fuel_percent.saturating_sub(cfg.fuel_step_percent);
            sink.emit(&ClusterEvent::FuelConsumed {
                remaining: self.state.fuel_percent,
            });
        }

        // 6. Temperature
        self.state.millivolts = u16::from(self.state.raw_sample).saturating_mul(cfg.millivolts_per_count);
        self.state.temperature_c = self.state.millivolts / cfg.millivolts_per_degree;

        // 7. Threshold policy
        let fuel = self.state.fuel_percent;
        let low_fuel = fuel <= cfg.low_fuel_warning_percent;
        if low_fuel && !self.state.low_fuel {
            sink.emit(&ClusterEvent::LowFuel { fuel_percent: fuel });
        }
        self.state.low_fuel = low_fuel;

        if fuel < threshold {
            self.state.speed = 0;
            if self.counter.stop(hw) {
                self.state.vehicle_stopped = true;
                sink.emit(&ClusterEvent::VehicleStopped);
            }
        }

        let temperature_c = self.state.temperature_c;
        let over_temperature = temperature_c > cfg.over_temperature_c;
        hw.set_over_temperature(over_temperature);
        match (self.state.over_temperature, over_temperature) {
            (false, true) => sink.emit(&ClusterEvent::OverTemperature { temperature_c }),
            (true, false) => sink.emit(&ClusterEvent::TemperatureNormal { temperature_c }),
            _ => {}
        }
        self.state.over_temperature = over_temperature;

        // 8. Render
        self.render(display);
        sink.emit(&ClusterEvent::Telemetry(self.telemetry()));

        // 9. Refresh pacing
        delay.delay_ms(self.config.refresh_delay_ms);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current state.
    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            iteration: self.iterations,
            raw_sample: self.state.raw_sample,
            temperature_c: self.state.temperature_c,
            fuel_percent: self.state.fuel_percent,
            pulse_count: self.state.pulse_count,
            speed: self.state.speed,
            low_fuel: self.state.low_fuel,
            over_temperature: self.state.over_temperature,
        }
    }

    pub fn state(&self) -> &ClusterState {
        &self.state
    }

    /// Total iterations executed since construction.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn render(&self, display: &mut impl DisplayPort) {
        use layout::*;

        let s = &self.state;
        if s.low_fuel {
            display.write_text(LOW_FUEL.row, LOW_FUEL.col, LOW_FUEL_TEXT);
        }
        display.write_text(TITLE.row, TITLE.col, TITLE_TEXT);

        display.write_text(SPEED_LABEL.row, SPEED_LABEL.col, "s");
        display.write_text(SPEED_SEPARATOR.row, SPEED_SEPARATOR.col, ":");
        display.write_number(SPEED_VALUE.row, SPEED_VALUE.col, s.speed, NUMBER_WIDTH);

        display.write_text(FUEL_LABEL.row, FUEL_LABEL.col, "F");
        display.write_text(FUEL_SEPARATOR.row, FUEL_SEPARATOR.col, ":");
        display.write_number(FUEL_VALUE.row, FUEL_VALUE.col, u32::from(s.fuel_percent), NUMBER_WIDTH);
        display.write_text(FUEL_UNIT.row, FUEL_UNIT.col, "%");

        display.write_text(TEMP_LABEL.row, TEMP_LABEL.col, "T");
        display.write_text(TEMP_SEPARATOR.row, TEMP_SEPARATOR.col, ":");
        display.write_number(TEMP_VALUE.row, TEMP_VALUE.col, u32::from(s.temperature_c), NUMBER_WIDTH);
        display.write_text(TEMP_UNIT.row, TEMP_UNIT.col, "c");
    }
}
