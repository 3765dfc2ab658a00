//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production). A future display or serial
//! protocol adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | T={:.1}\u{00b0}C RH={:.1}% | dew={:.1}\u{00b0}C set={:.1}\u{00b0}C | \
                     duty={:.1}% | sample={} tuning={}",
                    t.ambient_c,
                    t.humidity_rh,
                    t.dew_point_c,
                    t.setpoint_c,
                    t.heater_duty,
                    if t.sample_valid { "OK" } else { "STALE" },
                    t.tuning,
                );
            }
            AppEvent::SensorFault(e) => {
                warn!("SENSOR | {e}");
            }
            AppEvent::AutotuneStarted => {
                info!("TUNE | session started");
            }
            AppEvent::AutotuneStatus {
                elapsed_secs,
                input,
                output,
                peaks,
            } => {
                info!(
                    "TUNE | t+{}s input={:.1} output={:.1} peaks={}",
                    elapsed_secs, input, output, peaks
                );
            }
            AppEvent::AutotuneConverged(g) => {
                info!("TUNE | converged Kp={:.2} Ki={:.2} Kd={:.2}", g.kp, g.ki, g.kd);
            }
            AppEvent::AutotuneTimedOut => {
                warn!("TUNE | timed out, gains unchanged");
            }
            AppEvent::Started => {
                info!("START | heater service up");
            }
        }
    }
}
