//! Relay-feedback PID autotuning.
//!
//! Forces a two-level ("relay") oscillation of the heater output around the
//! operating point and watches the resulting oscillation of the measured
//! input. Once the amplitude of successive oscillation peaks stabilises,
//! the ultimate gain and period give Ziegler–Nichols-style gains:
//!
//! ```text
//!   Ku = 4 * (2*step) / ((max - min) * π)
//!   Tu = period between the two most recent maxima
//!   Kp = 0.6 Ku      Ki = 1.2 Ku / Tu      Kd = 0.075 Ku Tu
//! ```
//!
//! The session is a step function: the scheduler calls
//! [`AutotuneSession::step`] once per control tick, and the session owns the
//! controller output for its whole lifetime (the controller's `tuning` flag
//! suppresses normal PID ticks). The only exit paths are convergence and the
//! 15-minute deadline; both restore the pre-session output exactly.

use core::f32::consts::PI;

use heapless::Deque;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::pid::PidController;

/// Relay sampling interval.
const SAMPLE_INTERVAL_MS: u64 = 50;
/// Hard deadline for the whole session.
const SESSION_TIMEOUT_MS: u64 = 15 * 60 * 1000;
/// In-session status report cadence.
const STATUS_INTERVAL_MS: u64 = 15_000;

/// Lookback window for peak identification. At the 50 ms sampling interval
/// this spans 10 s, so oscillations must be slower than that to register.
const LOOKBACK_CAPACITY: usize = 200;
/// Bounded peak history. Convergence only ever inspects the three most
/// recent peaks, so the oldest entry is evicted when the history fills.
const PEAK_CAPACITY: usize = 10;

/// Gains produced by a converged session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

/// Result of one session step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Session still active; call again next tick.
    Running,
    /// Oscillation stabilised; output restored, gains computed.
    Converged(Gains),
    /// Deadline passed without convergence; output restored, no gains.
    TimedOut,
}

/// Which kind of extreme the detector is currently tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    None,
    High,
    Low,
}

/// One relay-feedback tuning session.
///
/// Created by [`begin`](Self::begin), which also raises the controller's
/// `tuning` flag; consumed when [`step`](Self::step) reports a terminal
/// outcome. Nothing but the final [`Gains`] escapes the session.
pub struct AutotuneSession {
    output_step: f32,
    noise_band: f32,

    output_baseline: f32,
    setpoint_at_start: f32,

    lookback: Deque<f32, LOOKBACK_CAPACITY>,
    maxima: Deque<f32, PEAK_CAPACITY>,
    polarity: Polarity,
    /// Number of completed high→low polarity switches.
    peak_count: u16,

    observed_min: f32,
    observed_max: f32,

    /// Timestamp of the most recent maximum sample.
    last_max_at_ms: u64,
    /// Timestamp of the final maximum sample of the previous high episode.
    prev_max_at_ms: u64,

    started_ms: u64,
    deadline_ms: u64,
    next_sample_ms: u64,
    next_status_ms: u64,
}

impl AutotuneSession {
    /// Start a session: capture the output baseline and the current input as
    /// the oscillation centre, and take ownership of the controller output.
    pub fn begin(output_step: f32, noise_band: f32, now_ms: u64, pid: &mut PidController) -> Self {
        pid.set_tuning(true);
        let input = pid.input();
        Self {
            output_step,
            noise_band,
            output_baseline: pid.output(),
            setpoint_at_start: input,
            lookback: Deque::new(),
            maxima: Deque::new(),
            polarity: Polarity::None,
            peak_count: 0,
            observed_min: input,
            observed_max: input,
            last_max_at_ms: 0,
            prev_max_at_ms: 0,
            started_ms: now_ms,
            deadline_ms: now_ms + SESSION_TIMEOUT_MS,
            // Both zero: the first step samples and reports immediately.
            next_sample_ms: 0,
            next_status_ms: 0,
        }
    }

    /// Advance the session by one scheduler tick.
    ///
    /// Internally rate-limited to the 50 ms sampling interval, so calling
    /// faster than that is harmless. On a terminal outcome the controller's
    /// output is restored to the pre-session baseline and its `tuning` flag
    /// cleared; the caller applies the gains (if any) and drops the session.
    pub fn step(
        &mut self,
        now_ms: u64,
        pid: &mut PidController,
        sink: &mut impl EventSink,
    ) -> StepOutcome {
        if now_ms >= self.next_status_ms {
            self.next_status_ms = now_ms + STATUS_INTERVAL_MS;
            sink.emit(&AppEvent::AutotuneStatus {
                elapsed_secs: ((now_ms - self.started_ms) / 1000) as u32,
                input: pid.input(),
                output: pid.output(),
                peaks: self.peak_count,
            });
        }

        if now_ms > self.deadline_ms {
            self.finish(pid);
            return StepOutcome::TimedOut;
        }

        if now_ms < self.next_sample_ms {
            return StepOutcome::Running;
        }
        self.next_sample_ms = now_ms + SAMPLE_INTERVAL_MS;

        let ref_val = pid.input();

        if ref_val > self.observed_max {
            self.observed_max = ref_val;
        }
        if ref_val < self.observed_min {
            self.observed_min = ref_val;
        }

        // Relay rule: push the output against the input's excursion to force
        // a sustained oscillation around the starting point.
        if ref_val > self.setpoint_at_start + self.noise_band {
            pid.set_output(self.output_baseline - self.output_step);
        } else if ref_val < self.setpoint_at_start - self.noise_band {
            pid.set_output(self.output_baseline + self.output_step);
        }

        // A sample is an extreme only relative to the whole lookback window.
        let is_max = self.lookback.iter().all(|v| ref_val > *v);
        let is_min = self.lookback.iter().all(|v| ref_val < *v);
        if self.lookback.is_full() {
            self.lookback.pop_back();
        }
        let _ = self.lookback.push_front(ref_val);

        let mut just_changed = false;

        if is_max {
            match self.polarity {
                // Still climbing inside a high episode: the forming maximum
                // tracks the newest (largest) sample.
                Polarity::High => {
                    if let Some(forming) = self.maxima.back_mut() {
                        *forming = ref_val;
                    }
                }
                Polarity::Low | Polarity::None => {
                    if self.polarity == Polarity::Low {
                        just_changed = true;
                        self.prev_max_at_ms = self.last_max_at_ms;
                    }
                    self.polarity = Polarity::High;
                    if self.maxima.is_full() {
                        self.maxima.pop_front();
                    }
                    let _ = self.maxima.push_back(ref_val);
                }
            }
            self.last_max_at_ms = now_ms;
        } else if is_min {
            match self.polarity {
                Polarity::High => {
                    self.polarity = Polarity::Low;
                    self.peak_count += 1;
                    just_changed = true;
                }
                Polarity::None => self.polarity = Polarity::Low,
                Polarity::Low => {}
            }
        }

        if just_changed && self.peak_count > 2 {
            // A low→high switch leaves a freshly pushed, still-forming
            // maximum at the back of the history; skip it.
            let forming_max = self.polarity == Polarity::High;
            if let Some(gains) = self.try_converge(forming_max, pid) {
                return StepOutcome::Converged(gains);
            }
        }

        StepOutcome::Running
    }

    /// Amplitude-stabilisation test over the three most recent completed
    /// maxima. Returns the computed gains when the oscillation has settled.
    fn try_converge(&mut self, forming_max: bool, pid: &mut PidController) -> Option<Gains> {
        let completed = self.maxima.len() - usize::from(forming_max);
        if completed < 3 {
            return None;
        }

        let mut last3 = [0.0f32; 3];
        let base = completed - 3;
        for (i, v) in self.maxima.iter().enumerate() {
            if (base..completed).contains(&i) {
                last3[i - base] = *v;
            }
        }

        let avg_separation =
            ((last3[2] - last3[1]).abs() + (last3[1] - last3[0]).abs()) / 2.0;
        let amplitude = self.observed_max - self.observed_min;
        if avg_separation >= 0.05 * amplitude {
            return None;
        }

        self.finish(pid);

        let ku = 4.0 * (2.0 * self.output_step) / (amplitude * PI);
        let tu = (self.last_max_at_ms - self.prev_max_at_ms) as f32 / 1000.0;
        Some(Gains {
            kp: 0.6 * ku,
            ki: 1.2 * ku / tu,
            kd: 0.075 * ku * tu,
        })
    }

    /// Restore the pre-session output exactly and hand the controller back.
    fn finish(&self, pid: &mut PidController) {
        pid.set_output(self.output_baseline);
        pid.set_tuning(false);
    }

    pub fn peak_count(&self) -> u16 {
        self.peak_count
    }

    pub fn output_baseline(&self) -> f32 {
        self.output_baseline
    }
}
