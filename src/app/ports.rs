//! Port traits: the hexagonal boundary between the control loop and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ClusterService (domain)
//! ```
//!
//! The register-level ports mirror what the board actually exposes: strobe
//! lines and a data bus for the converter, byte-wide register pairs for the
//! pulse counter and fuel timer.  The protocol on top of them lives in the
//! sensor and driver modules, so a test double only has to model registers.
//!
//! Blocking waits are not a port of their own; callers take an
//! [`embedded_hal::delay::DelayNs`].

use super::events::ClusterEvent;

// ───────────────────────────────────────────────────────────────
// Converter lines (ADC0804 strobes + data bus)
// ───────────────────────────────────────────────────────────────

/// Control and data lines of the external analog-to-digital converter.
pub trait ConverterLines {
    /// Drive the WR (start-conversion) strobe.
    fn set_write(&mut self, high: bool);

    /// Drive the RD (output-enable) strobe.
    fn set_read(&mut self, high: bool);

    /// `true` while the converter's INTR line is still high (conversion
    /// in progress).
    fn conversion_busy(&mut self) -> bool;

    /// Sample the 8-bit data bus.
    fn read_data_bus(&mut self) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Pulse counter register pair
// ───────────────────────────────────────────────────────────────

/// 16-bit hardware counter clocked by the speed-sensor input.
pub trait CounterRegisters {
    /// Select free-running external-pulse counting.
    fn configure_external_count(&mut self);

    /// Start or halt counting.
    fn set_running(&mut self, run: bool);

    /// High byte of the live count.
    fn read_high(&mut self) -> u8;

    /// Low byte of the live count.
    fn read_low(&mut self) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Fuel timer register pair
// ───────────────────────────────────────────────────────────────

/// 16-bit up-counting timer with an overflow flag.
pub trait TimerRegisters {
    /// Select 16-bit interval-timer mode.
    fn configure_interval_mode(&mut self);

    /// Load the counting register pair.
    fn load(&mut self, high: u8, low: u8);

    /// Start or halt the timer.
    fn set_running(&mut self, run: bool);

    /// Overflow flag: set by hardware when the count wraps past 0xFFFF.
    fn overflowed(&mut self) -> bool;

    /// Clear the overflow flag.
    fn clear_overflow(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Indicator outputs
// ───────────────────────────────────────────────────────────────

pub trait IndicatorPort {
    /// Drive the over-temperature warning LED.
    fn set_over_temperature(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Combined peripheral port
// ───────────────────────────────────────────────────────────────

/// Everything the control loop touches on the board, as one argument.
///
/// Counter and timer share method names, so call sites that need both
/// name the trait explicitly (`CounterRegisters::set_running(hw, ..)`).
pub trait PeripheralPort: ConverterLines + CounterRegisters + TimerRegisters + IndicatorPort {}

impl<T> PeripheralPort for T where T: ConverterLines + CounterRegisters + TimerRegisters + IndicatorPort {}

// ───────────────────────────────────────────────────────────────
// Display port (external collaborator)
// ───────────────────────────────────────────────────────────────

/// 2x16 character display.  Rows and columns are 1-based; anything
/// outside the visible area is clipped by the implementation.
pub trait DisplayPort {
    /// Reset the controller and clear the screen.
    fn init(&mut self);

    /// Write `text` starting at (`row`, `col`).
    fn write_text(&mut self, row: u8, col: u8, text: &str);

    /// Write `value` in decimal, zero-padded to at least `min_width` digits.
    fn write_number(&mut self, row: u8, col: u8, value: u32, min_width: u8);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`ClusterEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &ClusterEvent);
}
