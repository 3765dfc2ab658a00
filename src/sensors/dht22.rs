//! DHT22 / AM2302 ambient sensor decoder.
//!
//! The sensor answers a start condition with 40 data bits, each encoded in
//! the duration of a high pulse: long (~70 µs) for `1`, short (~26 µs) for
//! `0`. Bits 0–15 are humidity ×10, bits 16–31 temperature ×10 (bit 15 is a
//! sign flag, not two's complement), bits 32–39 a checksum byte.
//!
//! All timing goes through the [`PulseLine`] port, so the decode path is
//! fully exercised on the host with synthetic pulse sequences.
//!
//! A failed decode — missing acknowledgement or checksum mismatch — never
//! touches the cached sample; consumers keep working from the last good
//! reading and treat a stale sample as a legitimate steady state.

use crate::app::ports::{Level, PulseLine};
use crate::error::SensorError;

/// No acknowledgement low pulse within this window means the sensor is
/// absent or still busy.
const ACK_TIMEOUT_US: u32 = 115;
/// Per-bit timeout while waiting for a data pulse. A missing pulse reads as
/// a zero bit and is caught by the checksum.
const BIT_TIMEOUT_US: u32 = 200;
/// High pulses longer than this are ones.
const BIT_ONE_THRESHOLD_US: u32 = 30;

const FRAME_BITS: u32 = 40;

/// One validated ambient reading, exposed by value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSample {
    /// Ambient temperature, 0.1 °C resolution.
    pub temperature_c: f32,
    /// Relative humidity, 0.1 %RH resolution.
    pub humidity_rh: f32,
    /// Conservative readiness: false until a decode succeeded with both raw
    /// fields non-zero. An all-zero field passes the checksum trivially, so
    /// it is treated as a misread even when the checksum matches.
    pub valid: bool,
}

/// Decoder for the single-wire pulse protocol. Owns the line exclusively;
/// one decode cycle per [`refresh`](Self::refresh) call.
pub struct Dht22<L: PulseLine> {
    line: L,
    sample: SensorSample,
}

impl<L: PulseLine> Dht22<L> {
    pub fn new(line: L) -> Self {
        Self {
            line,
            sample: SensorSample::default(),
        }
    }

    /// Run one decode cycle.
    ///
    /// Bounded-blocking: busy-waits on edge timings with hard per-edge
    /// timeouts, worst case a few hundred microseconds per bit. On success
    /// the cached sample is overwritten and returned; on failure the cache
    /// is left untouched.
    pub fn refresh(&mut self) -> Result<SensorSample, SensorError> {
        self.line.start_signal();

        if self.line.pulse_in(Level::Low, ACK_TIMEOUT_US).is_none() {
            return Err(SensorError::Timeout);
        }

        let mut d: u16 = 0;
        let mut h: u16 = 0;
        let mut t: u16 = 0;

        for i in 0..FRAME_BITS {
            d <<= 1;
            let width = self.line.pulse_in(Level::High, BIT_TIMEOUT_US).unwrap_or(0);
            if width > BIT_ONE_THRESHOLD_US {
                d |= 1;
            }
            match i {
                15 => h = d,
                31 => {
                    t = d;
                    d = 0;
                }
                _ => {}
            }
        }

        // d now holds the 8 checksum bits: low byte of the payload byte sum.
        let sum = (h as u8)
            .wrapping_add((h >> 8) as u8)
            .wrapping_add(t as u8)
            .wrapping_add((t >> 8) as u8);
        if sum != d as u8 {
            return Err(SensorError::Checksum);
        }

        let temperature_c = if t & 0x8000 != 0 {
            -(f32::from(t & 0x7FFF)) * 0.1
        } else {
            f32::from(t) * 0.1
        };
        let humidity_rh = f32::from(h) * 0.1;

        // Readiness rule: both raw fields must be non-zero. 0x8000 is a
        // "negative zero" temperature and counts as zero here.
        let valid = h != 0 && t != 0 && t != 0x8000;

        self.sample = SensorSample {
            temperature_c,
            humidity_rh,
            valid,
        };
        Ok(self.sample)
    }

    /// The most recent successfully decoded sample. Persists across failed
    /// refresh attempts.
    pub fn last_sample(&self) -> SensorSample {
        self.sample
    }

    pub fn line_mut(&mut self) -> &mut L {
        &mut self.line
    }
}
