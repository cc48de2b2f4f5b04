//! Sensor subsystem: the converter protocol and the speed pulse counter.
//!
//! Both drivers are stateless with respect to hardware: they sequence
//! register-level port calls and leave ownership of the peripherals to
//! the adapter passed in.

pub mod analog;
pub mod pulse_counter;
