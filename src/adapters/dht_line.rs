//! ESP32 pulse-line adapter for the DHT22 data pin.
//!
//! Implements [`PulseLine`] over an open-drain GPIO with busy-wait edge
//! timing against the ESP high-resolution timer. Interrupts stay enabled —
//! the per-edge timeouts are short enough that occasional jitter just shows
//! up as a failed checksum and a retried sample.

use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{AnyIOPin, InputOutput, PinDriver, Pull};

use crate::app::ports::{Level, PulseLine};

fn now_us() -> u64 {
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
}

/// Open-drain driver for the shared sensor data line.
pub struct EspPulseLine<'d> {
    pin: PinDriver<'d, AnyIOPin, InputOutput>,
}

impl<'d> EspPulseLine<'d> {
    pub fn new(pin: AnyIOPin) -> anyhow::Result<Self> {
        let mut pin = PinDriver::input_output_od(pin)?;
        pin.set_pull(Pull::Up)?;
        pin.set_high()?;
        Ok(Self { pin })
    }
}

impl PulseLine for EspPulseLine<'_> {
    fn start_signal(&mut self) {
        // Hold the line low ≥1 ms, then release and let the pull-up raise
        // it; the sensor answers with its acknowledgement pulse.
        let _ = self.pin.set_low();
        Ets::delay_us(1100);
        let _ = self.pin.set_high();
    }

    fn pulse_in(&mut self, level: Level, timeout_us: u32) -> Option<u32> {
        let want_high = matches!(level, Level::High);
        let deadline = now_us() + u64::from(timeout_us);

        // Wait for the pulse to begin.
        while self.pin.is_high() != want_high {
            if now_us() > deadline {
                return None;
            }
        }
        let begin = now_us();

        // Time until it ends.
        while self.pin.is_high() == want_high {
            if now_us() > deadline {
                return None;
            }
        }
        Some((now_us() - begin) as u32)
    }
}
