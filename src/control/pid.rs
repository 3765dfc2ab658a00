//! Closed-loop PID controller for the dew-strap heater.
//!
//! Derivative is computed on the measured input rather than on the error, so
//! an abrupt setpoint change (a dew-point jump after a sensor refresh) does
//! not kick the output. The integral accumulator is clamped to the output
//! limits (anti-windup), which keeps recovery smooth after long saturation —
//! e.g. a cold snap that pins the heater at 100 %.
//!
//! Invariant: after any mutation, `output` and the integral accumulator both
//! lie within `[output_min, output_max]`.

/// PID controller state. One instance per heater channel.
#[derive(Debug, Clone)]
pub struct PidController {
    kp: f32,
    ki: f32,
    kd: f32,

    setpoint: f32,
    input: f32,
    output: f32,

    /// Integral accumulator. Carries `Ki` inside (the gain is applied at
    /// accumulation time) so re-tuning mid-run keeps the curve smooth.
    i_acc: f32,
    last_input: f32,
    last_tick_ms: u64,

    output_min: f32,
    output_max: f32,

    running: bool,
    tuning: bool,
}

impl PidController {
    pub fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self {
            kp,
            ki,
            kd,
            setpoint: 0.0,
            input: 0.0,
            output: 0.0,
            i_acc: 0.0,
            last_input: 0.0,
            last_tick_ms: 0,
            output_min: 0.0,
            output_max: 100.0,
            running: false,
            tuning: false,
        }
    }

    // ── Per-interval computation ──────────────────────────────

    /// Run one control interval.
    ///
    /// No-op while stopped or while an autotune session owns the output.
    /// Also a no-op when `now` has not advanced past the previous tick, so
    /// an irregular scheduler can never cause a divide-by-zero derivative.
    pub fn tick(&mut self, now_ms: u64) {
        if !self.running || self.tuning {
            return;
        }
        if now_ms <= self.last_tick_ms {
            return;
        }
        let dt = (now_ms - self.last_tick_ms) as f32 / 1000.0;

        let error = self.setpoint - self.input;
        // Derivative on measurement, not on error — no setpoint kick.
        let d_input = self.input - self.last_input;

        self.i_acc += self.ki * error * dt;
        self.i_acc = self.i_acc.clamp(self.output_min, self.output_max);

        let u = self.kp * error + self.i_acc - self.kd * (d_input / dt);
        self.output = u.clamp(self.output_min, self.output_max);

        self.last_input = self.input;
        self.last_tick_ms = now_ms;
    }

    // ── Direct output control (autotune only) ─────────────────

    /// Clamp and assign the output directly. Used by the autotuner while it
    /// owns the loop, and to restore the baseline on session exit.
    pub fn set_output(&mut self, value: f32) {
        self.output = value.clamp(self.output_min, self.output_max);
    }

    // ── Configuration ─────────────────────────────────────────

    /// Set the output bounds. Silently rejected when `min > max`; the
    /// previous limits stay in force. Accepted bounds re-clamp the current
    /// output and integral accumulator immediately, so the output invariant
    /// holds without waiting for the next tick.
    pub fn set_limits(&mut self, min: f32, max: f32) {
        if min > max {
            return;
        }
        self.output_min = min;
        self.output_max = max;
        self.output = self.output.clamp(min, max);
        self.i_acc = self.i_acc.clamp(min, max);
    }

    /// Assign the three gains. Negative values are legitimate and invert
    /// the control polarity (output decreases as error grows).
    pub fn tune(&mut self, kp: f32, ki: f32, kd: f32) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
    }

    /// Re-seed the controller for a bumpless restart: the integral
    /// accumulator takes the current output (clamped) so resuming control
    /// does not step the heater.
    ///
    /// `last_input` is zeroed, so the first tick after a reset produces a
    /// one-time derivative term proportional to the current input. Callers
    /// that care should tick once and discard, or reset while stopped.
    pub fn reset(&mut self) {
        self.i_acc = self.output.clamp(self.output_min, self.output_max);
        self.last_input = 0.0;
    }

    // ── Lifecycle & accessors ─────────────────────────────────

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn set_tuning(&mut self, tuning: bool) {
        self.tuning = tuning;
    }

    pub fn set_input(&mut self, input: f32) {
        self.input = input;
    }

    pub fn set_setpoint(&mut self, setpoint: f32) {
        self.setpoint = setpoint;
    }

    pub fn input(&self) -> f32 {
        self.input
    }

    pub fn setpoint(&self) -> f32 {
        self.setpoint
    }

    pub fn output(&self) -> f32 {
        self.output
    }

    pub fn gains(&self) -> (f32, f32, f32) {
        (self.kp, self.ki, self.kd)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_tuning(&self) -> bool {
        self.tuning
    }
}
