//! Dew point estimation (Magnus formula).
//!
//! The heater setpoint is the dew point plus a configured safety margin:
//! optics held above the dew point cannot fog. Coefficients are the
//! Sonntag/Magnus constants valid for -45 °C to +60 °C, far wider than any
//! observing session.

const MAGNUS_B: f32 = 17.62;
const MAGNUS_C: f32 = 243.12;

/// Dew point in °C from ambient temperature (°C) and relative humidity (%).
///
/// Humidity is clamped to a small positive floor so a bogus 0 % reading
/// degrades to a very low dew point instead of a NaN setpoint.
pub fn dew_point_c(temperature_c: f32, humidity_rh: f32) -> f32 {
    let rh = (humidity_rh / 100.0).clamp(0.001, 1.0);
    let gamma = rh.ln() + (MAGNUS_B * temperature_c) / (MAGNUS_C + temperature_c);
    MAGNUS_C * gamma / (MAGNUS_B - gamma)
}
