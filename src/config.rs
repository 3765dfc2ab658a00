//! System configuration parameters
//!
//! All tunable parameters for the DewGuard controller. Values can be
//! overridden through the [`ConfigPort`](crate::app::ports::ConfigPort)
//! at boot; tuned PID gains are deliberately *not* persisted across power
//! cycles — every boot starts from the configured defaults.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Setpoint ---
    /// Margin (°C) the optics are kept above the computed dew point.
    pub setpoint_offset_c: f32,

    // --- PID gains (defaults; replaced in-memory by autotune) ---
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Lower bound of the controller output (heater duty %).
    pub output_min: f32,
    /// Upper bound of the controller output (heater duty %).
    pub output_max: f32,

    // --- Ambient sensor timing ---
    /// Warm-up period after power-on before readings are trusted (ms).
    pub sensor_warmup_ms: u32,
    /// Minimum interval between decode cycles (ms). The DHT22 cannot be
    /// polled faster than every 2 s.
    pub sensor_refresh_ms: u32,

    // --- Autotune ---
    /// Relay step applied above/below the output baseline during autotune.
    pub autotune_output_step: f32,
    /// Hysteresis band around the starting input that triggers relay flips.
    pub autotune_noise_band: f32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_interval_ms: u32,
    /// Telemetry report interval (control ticks)
    pub telemetry_interval_ticks: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Setpoint: 5 °C above dew point keeps typical optics dry
            // without wasting battery.
            setpoint_offset_c: 5.0,

            // Conservative gains for a small dew strap; autotune refines.
            kp: 15.0,
            ki: 0.3,
            kd: 2.0,
            output_min: 0.0,
            output_max: 100.0,

            // Sensor timing (DHT22 datasheet minimums)
            sensor_warmup_ms: 2_000,
            sensor_refresh_ms: 2_000,

            // Autotune relay parameters
            autotune_output_step: 30.0,
            autotune_noise_band: 1.0,

            // Timing
            control_interval_ms: 1_000, // 1 Hz
            telemetry_interval_ticks: 60,
        }
    }
}

impl SystemConfig {
    /// Basic sanity validation. Invalid configs are rejected, not clamped,
    /// so a corrupt store cannot silently disable the heater limits.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.output_min > self.output_max {
            return Err("output_min above output_max");
        }
        if !(0.0..=50.0).contains(&self.setpoint_offset_c) {
            return Err("setpoint offset out of range");
        }
        if self.autotune_output_step <= 0.0 {
            return Err("autotune output step must be positive");
        }
        if self.autotune_noise_band < 0.0 {
            return Err("autotune noise band must be non-negative");
        }
        if self.control_interval_ms == 0 || self.sensor_refresh_ms == 0 {
            return Err("intervals must be non-zero");
        }
        if self.telemetry_interval_ticks == 0 {
            return Err("telemetry interval must be non-zero");
        }
        Ok(())
    }
}
