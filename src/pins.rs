//! GPIO / peripheral pin assignments for the DewGuard main board.
//!
//! Single source of truth for the wiring in `main.rs`; change a pin here
//! and update the matching peripheral handle there.

// ---------------------------------------------------------------------------
// Ambient sensor (DHT22 / AM2302, single-wire pulse protocol)
// ---------------------------------------------------------------------------

/// Bidirectional data line for the ambient temperature/humidity sensor.
/// External 4.7 kΩ pull-up; the firmware drives it low to request a sample
/// and then times the sensor's reply pulses.
pub const AMBIENT_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Heater output (N-channel MOSFET low-side switch)
// ---------------------------------------------------------------------------

/// LEDC PWM channel driving the dew-strap MOSFET gate.
pub const HEATER_PWM_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Buttons
// ---------------------------------------------------------------------------

/// BOOT button, active LOW. Held during power-up it requests an autotune
/// calibration run.
pub const BOOT_BUTTON_GPIO: i32 = 0;
