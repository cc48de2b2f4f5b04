//! Outbound application events.
//!
//! The [`ClusterService`](super::service::ClusterService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.

/// Structured events emitted by the control loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClusterEvent {
    /// Peripherals initialised, loop ready (carries the seeded values).
    Started { speed_seed: u32, fuel_percent: u8 },

    /// The fuel timer overflowed and one fuel step was consumed.
    FuelConsumed { remaining: u8 },

    /// Fuel entered the low-fuel warning band.
    LowFuel { fuel_percent: u8 },

    /// Fuel fell below the threshold; speed forced to zero, counter halted.
    VehicleStopped,

    /// Over-temperature indicator asserted.
    OverTemperature { temperature_c: u16 },

    /// Over-temperature indicator cleared.
    TemperatureNormal { temperature_c: u16 },

    /// Per-iteration snapshot.
    Telemetry(TelemetrySnapshot),

    /// The system-on flag read off at an iteration boundary.
    Halted { iterations: u64 },
}

/// A point-in-time view of the cluster suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub iteration: u64,
    pub raw_sample: u8,
    pub temperature_c: u16,
    pub fuel_percent: u8,
    pub pulse_count: u16,
    pub speed: u32,
    pub low_fuel: bool,
    pub over_temperature: bool,
}
