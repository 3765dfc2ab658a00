//! Heater service — the hexagonal core.
//!
//! [`HeaterService`] owns the PID controller and the optional autotune
//! session, and orchestrates one control cycle per scheduler tick. All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  PulseLine ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                │      HeaterService      │
//! HeaterPort ◀── │  DHT22 · PID · Autotune │
//!                └────────────────────────┘
//! ```
//!
//! While an autotune session is active it owns the controller output
//! exclusively: normal PID ticks are suppressed through the controller's
//! `tuning` flag, and the service routes each tick into the session's step
//! function instead.

use log::{info, warn};

use crate::config::SystemConfig;
use crate::control::autotune::{AutotuneSession, StepOutcome};
use crate::control::dewpoint::dew_point_c;
use crate::control::pid::PidController;
use crate::sensors::Dht22;

use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, HeaterPort, PulseLine};

// ───────────────────────────────────────────────────────────────
// HeaterService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct HeaterService {
    config: SystemConfig,
    pid: PidController,
    session: Option<AutotuneSession>,
    /// Sensor readings are untrusted until this deadline passes.
    warmup_until_ms: u64,
    next_refresh_ms: u64,
    tick_count: u64,
    last_dew_point_c: f32,
}

impl HeaterService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the control loop — call [`start`](Self::start).
    pub fn new(config: SystemConfig) -> Self {
        let mut pid = PidController::new(config.kp, config.ki, config.kd);
        pid.set_limits(config.output_min, config.output_max);
        Self {
            config,
            pid,
            session: None,
            warmup_until_ms: 0,
            next_refresh_ms: 0,
            tick_count: 0,
            last_dew_point_c: 0.0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Arm the controller and start the sensor warm-up window.
    pub fn start(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        self.warmup_until_ms = now_ms + u64::from(self.config.sensor_warmup_ms);
        self.pid.start();
        sink.emit(&AppEvent::Started);
        info!("heater service started, sensor warm-up {} ms", self.config.sensor_warmup_ms);
    }

    /// Stop controlling and de-energise the heater.
    pub fn stop(&mut self, heater: &mut impl HeaterPort) {
        self.pid.stop();
        heater.off();
        info!("heater service stopped");
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: refresh sensor → control → actuate.
    pub fn tick<L: PulseLine>(
        &mut self,
        now_ms: u64,
        dht: &mut Dht22<L>,
        heater: &mut impl HeaterPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Refresh the ambient sample on its own cadence. A failed decode
        //    keeps the previous good sample in play.
        if now_ms >= self.warmup_until_ms && now_ms >= self.next_refresh_ms {
            self.next_refresh_ms = now_ms + u64::from(self.config.sensor_refresh_ms);
            match dht.refresh() {
                Ok(sample) if sample.valid => {
                    self.last_dew_point_c =
                        dew_point_c(sample.temperature_c, sample.humidity_rh);
                    self.pid.set_input(sample.temperature_c);
                    self.pid
                        .set_setpoint(self.last_dew_point_c + self.config.setpoint_offset_c);
                }
                // Decoded but failed the readiness rule — not trustworthy.
                Ok(_) => {}
                Err(e) => {
                    warn!("ambient sensor: {e}");
                    sink.emit(&AppEvent::SensorFault(e));
                }
            }
        }

        // 2. Control: an active autotune session owns the output; otherwise
        //    run the normal PID interval.
        if let Some(session) = self.session.as_mut() {
            match session.step(now_ms, &mut self.pid, sink) {
                StepOutcome::Running => {}
                StepOutcome::Converged(gains) => {
                    self.pid.tune(gains.kp, gains.ki, gains.kd);
                    info!(
                        "autotune converged: Kp={:.2} Ki={:.2} Kd={:.2}",
                        gains.kp, gains.ki, gains.kd
                    );
                    sink.emit(&AppEvent::AutotuneConverged(gains));
                    self.session = None;
                }
                StepOutcome::TimedOut => {
                    warn!("autotune timed out, gains unchanged");
                    sink.emit(&AppEvent::AutotuneTimedOut);
                    self.session = None;
                }
            }
        } else {
            self.pid.tick(now_ms);
        }

        // 3. Actuate. During a session this forwards the relay output, which
        //    is what actually excites the process.
        heater.set_duty(self.pid.output());

        // 4. Telemetry
        if self.tick_count % u64::from(self.config.telemetry_interval_ticks) == 0 {
            let sample = dht.last_sample();
            sink.emit(&AppEvent::Telemetry(TelemetryData {
                ambient_c: sample.temperature_c,
                humidity_rh: sample.humidity_rh,
                dew_point_c: self.last_dew_point_c,
                setpoint_c: self.pid.setpoint(),
                heater_duty: self.pid.output(),
                sample_valid: sample.valid,
                tuning: self.pid.is_tuning(),
            }));
        }
    }

    // ── Autotune lifecycle ────────────────────────────────────

    /// Begin a relay-feedback tuning session. No-op if one is active.
    pub fn begin_autotune(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        if self.session.is_some() {
            return;
        }
        info!("autotune session starting");
        self.session = Some(AutotuneSession::begin(
            self.config.autotune_output_step,
            self.config.autotune_noise_band,
            now_ms,
            &mut self.pid,
        ));
        sink.emit(&AppEvent::AutotuneStarted);
    }

    pub fn autotune_active(&self) -> bool {
        self.session.is_some()
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn pid(&self) -> &PidController {
        &self.pid
    }

    pub fn pid_mut(&mut self) -> &mut PidController {
        &mut self.pid
    }

    pub fn dew_point_c(&self) -> f32 {
        self.last_dew_point_c
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }
}
