//! Control algorithms — pure logic, no hardware.
//!
//! [`pid`] holds the closed-loop controller, [`autotune`] the relay-feedback
//! gain calibration, and [`dewpoint`] the setpoint math. Everything here is
//! hardware-free and runs identically on host and target.

pub mod autotune;
pub mod dewpoint;
pub mod pid;
