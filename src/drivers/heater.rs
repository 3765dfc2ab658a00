//! Dew-strap heater driver (low-side MOSFET, PWM dimmed).
//!
//! Maps the controller output (0–100 %) onto any [`SetDutyCycle`] PWM
//! channel. On target that is the LEDC peripheral; host tests pass a mock
//! channel. This driver is a dumb actuator — all control policy lives in
//! the PID loop above it.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::HeaterPort;

/// Heater output stage over a PWM channel.
pub struct HeaterDriver<P: SetDutyCycle> {
    pwm: P,
    duty_percent: f32,
}

impl<P: SetDutyCycle> HeaterDriver<P> {
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            duty_percent: 0.0,
        }
    }

    /// Last commanded duty in percent.
    pub fn duty(&self) -> f32 {
        self.duty_percent
    }

    fn apply(&mut self, percent: f32) {
        let percent = percent.clamp(0.0, 100.0);
        // Per-mille resolution keeps the 0.1 % steps the controller emits.
        let num = (percent * 10.0) as u16;
        if let Err(_e) = self.pwm.set_duty_cycle_fraction(num, 1000) {
            // A failed PWM write leaves the previous duty active; retried
            // next control tick.
            warn!("heater: PWM write failed, duty {percent:.1}% not applied");
            return;
        }
        self.duty_percent = percent;
    }
}

impl<P: SetDutyCycle> HeaterPort for HeaterDriver<P> {
    fn set_duty(&mut self, percent: f32) {
        self.apply(percent);
    }

    fn off(&mut self) {
        self.apply(0.0);
    }
}
