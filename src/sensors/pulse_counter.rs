//! Speed-sensor pulse counter.
//!
//! The counter is configured and started once at boot and then runs
//! free.  Reads take the high byte then the low byte while the register
//! keeps counting, so a snapshot can be off by one count.

use log::{info, warn};

use crate::app::ports::CounterRegisters;

#[derive(Debug, Default)]
pub struct PulseCounter {
    configured: bool,
    running: bool,
}

impl PulseCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select external-pulse mode and start counting.  Only the first call
    /// reaches the hardware.
    pub fn configure(&mut self, regs: &mut impl CounterRegisters) {
        if self.configured {
            warn!("pulse_counter: already configured, ignoring");
            return;
        }
        regs.configure_external_count();
        regs.set_running(true);
        self.configured = true;
        self.running = true;
        info!("pulse_counter: free-running external count started");
    }

    /// Non-atomic snapshot of the 16-bit count.
    pub fn read(&self, regs: &mut impl CounterRegisters) -> u16 {
        let high = regs.read_high();
        let low = regs.read_low();
        u16::from_be_bytes([high, low])
    }

    /// Halt the counter.  Returns `true` on the running -> stopped edge.
    pub fn stop(&mut self, regs: &mut impl CounterRegisters) -> bool {
        regs.set_running(false);
        core::mem::replace(&mut self.running, false)
    }
}
