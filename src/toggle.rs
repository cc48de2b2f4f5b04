//! System on/off toggle driven by an edge-triggered interrupt.
//!
//! ## Hardware
//!
//! Active-low switch with pull-up on [`TOGGLE_GPIO`](crate::pins::TOGGLE_GPIO).
//! Every falling edge flips the flag; there is no debouncing.
//!
//! ## Ownership
//!
//! The ISR is the only writer.  The control loop reads the flag once per
//! iteration boundary, so a toggle that lands mid-iteration takes effect at
//! the next boundary.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::INITIAL_SYSTEM_ON;

/// Process-wide system toggle, written only by [`toggle_isr_handler`].
pub static SYSTEM_TOGGLE: SystemToggle = SystemToggle::new(INITIAL_SYSTEM_ON);

/// Two-state RUNNING / STOPPED flag.
#[derive(Debug)]
pub struct SystemToggle {
    on: AtomicBool,
}

impl SystemToggle {
    pub const fn new(initially_on: bool) -> Self {
        Self {
            on: AtomicBool::new(initially_on),
        }
    }

    /// Flip RUNNING <-> STOPPED.  Lock-free, safe from interrupt context.
    pub fn toggle(&self) {
        self.on.fetch_xor(true, Ordering::AcqRel);
    }

    /// Whether the control loop should run its next iteration.
    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::Acquire)
    }
}

/// ISR handler: register this on the toggle GPIO falling edge.
pub fn toggle_isr_handler() {
    SYSTEM_TOGGLE.toggle();
}
