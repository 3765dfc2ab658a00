//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ HeaterService (domain)
//! ```
//!
//! Driven adapters (the sensor data line, the heater output, event sinks,
//! config storage) implement these traits. The
//! [`HeaterService`](super::service::HeaterService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::config::SystemConfig;

// ───────────────────────────────────────────────────────────────
// Pulse line port (driven adapter: hardware → sensor decoder)
// ───────────────────────────────────────────────────────────────

/// Logic level of the single-wire sensor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// The one hardware capability the sensor decoder needs: drive the shared
/// data line and time the sensor's reply pulses.
///
/// All durations are microseconds. Implementations busy-wait, so a single
/// call is bounded by its `timeout_us` argument — low hundreds of
/// microseconds in practice.
pub trait PulseLine {
    /// Issue the start condition: drive the line low for ≥1 ms, release it,
    /// and switch into receive mode.
    fn start_signal(&mut self);

    /// Measure the duration of the next pulse at `level`.
    ///
    /// Returns `None` if no such pulse begins within `timeout_us`.
    fn pulse_in(&mut self, level: Level, timeout_us: u32) -> Option<u32>;
}

// ───────────────────────────────────────────────────────────────
// Heater port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain commands the dew-strap heater through this.
pub trait HeaterPort {
    /// Apply a duty cycle in percent (clamped to 0–100 by implementations).
    fn set_duty(&mut self, percent: f32);

    /// Unconditionally de-energise the heater.
    fn off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, display,
/// etc.). Exact formatting lives entirely on the adapter side.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate with [`SystemConfig::validate`] before
/// persisting — a corrupt or hostile store must not be able to invert the
/// heater output limits or zero the control interval.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&mut self, config: &SystemConfig) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The stored blob could not be decoded.
    Corrupt,
    /// The values failed range validation.
    ValidationFailed(&'static str),
    /// The backing store is unavailable.
    StoreUnavailable,
}
