//! Fuel-consumption timer.
//!
//! A 16-bit up-counting timer is loaded with a preset so that it
//! overflows after `0x1_0000 - preset` ticks.  The overflow flag is the
//! "one time unit elapsed" signal the control loop turns into a fuel step.
//!
//! The loop re-arms the timer on every iteration while fuel remains, which
//! reloads the preset whether or not the previous period completed.  The
//! effective burn rate therefore depends on loop pacing, not wall-clock
//! time.

use crate::app::ports::TimerRegisters;

/// Ticks until a timer loaded with `preset` overflows, times the tick
/// length.  `None` when the product does not fit a `u32`.
pub const fn overflow_period_us(preset: u16, tick_us: u32) -> Option<u32> {
    (0x1_0000 - preset as u32).checked_mul(tick_us)
}

pub struct FuelTimer {
    preset: u16,
}

impl FuelTimer {
    pub fn new(preset: u16) -> Self {
        Self { preset }
    }

    /// Load the preset and start counting.  Re-arming a running timer
    /// restarts its period.
    pub fn arm(&mut self, regs: &mut impl TimerRegisters) {
        let [high, low] = self.preset.to_be_bytes();
        regs.configure_interval_mode();
        regs.load(high, low);
        regs.set_running(true);
    }

    /// If the overflow flag is set, clear it, stop the timer and report
    /// `true`.  The timer is not restarted here.
    pub fn check_and_consume(&mut self, regs: &mut impl TimerRegisters) -> bool {
        if !regs.overflowed() {
            return false;
        }
        regs.clear_overflow();
        regs.set_running(false);
        true
    }
}
