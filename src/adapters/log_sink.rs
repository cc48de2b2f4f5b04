//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured cluster events to the
//! ESP-IDF logger (UART / USB-CDC in production).

use log::{debug, info, warn};

use crate::app::events::ClusterEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ClusterEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ClusterEvent) {
        match event {
            ClusterEvent::Telemetry(t) => {
                debug!(
                    "TELEM | #{} | adc={} T={}\u{00b0}C | fuel={}% | pulses={} speed={} | \
                     low_fuel={} over_temp={}",
                    t.iteration,
                    t.raw_sample,
                    t.temperature_c,
                    t.fuel_percent,
                    t.pulse_count,
                    t.speed,
                    t.low_fuel,
                    t.over_temperature,
                );
            }
            ClusterEvent::Started { speed_seed, fuel_percent } => {
                info!("START | speed_seed={} fuel={}%", speed_seed, fuel_percent);
            }
            ClusterEvent::FuelConsumed { remaining } => {
                info!("FUEL | consumed, remaining={}%", remaining);
            }
            ClusterEvent::LowFuel { fuel_percent } => {
                warn!("FUEL | low, {}%", fuel_percent);
            }
            ClusterEvent::VehicleStopped => {
                warn!("FUEL | exhausted, vehicle stopped");
            }
            ClusterEvent::OverTemperature { temperature_c } => {
                warn!("TEMP | over limit, {}\u{00b0}C", temperature_c);
            }
            ClusterEvent::TemperatureNormal { temperature_c } => {
                info!("TEMP | normal, {}\u{00b0}C", temperature_c);
            }
            ClusterEvent::Halted { iterations } => {
                info!("HALT | system off after {} iterations", iterations);
            }
        }
    }
}
