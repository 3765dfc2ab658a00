//! Outbound application events.
//!
//! The [`HeaterService`](super::service::HeaterService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — log to serial, update a display, etc.

use crate::control::autotune::Gains;
use crate::error::SensorError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// An ambient sensor decode cycle failed. The previous good sample is
    /// still in use; this is informational, not fatal.
    SensorFault(SensorError),

    /// An autotune session has started and now owns the controller output.
    AutotuneStarted,

    /// Periodic in-session status (every 15 s while tuning).
    AutotuneStatus {
        elapsed_secs: u32,
        input: f32,
        output: f32,
        peaks: u16,
    },

    /// Autotune converged; the reported gains have been applied.
    AutotuneConverged(Gains),

    /// Autotune hit its deadline; output restored, gains unchanged.
    AutotuneTimedOut,

    /// The controller service has started.
    Started,
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub ambient_c: f32,
    pub humidity_rh: f32,
    pub dew_point_c: f32,
    pub setpoint_c: f32,
    pub heater_duty: f32,
    pub sample_valid: bool,
    pub tuning: bool,
}
