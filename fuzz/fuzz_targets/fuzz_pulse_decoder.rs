//! Fuzz target: `Dht22::refresh`
//!
//! Replays arbitrary pulse-width sequences (including short reads, absurd
//! widths, and missing acknowledgements) through the decoder and asserts
//! that it never panics and that every accepted sample is numerically sane.
//!
//! cargo fuzz run fuzz_pulse_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;

use dewguard::app::ports::{Level, PulseLine};
use dewguard::sensors::Dht22;

/// Pulse source driven directly by fuzzer bytes. The first byte decides
/// whether the line acknowledges at all; the rest become pulse widths.
struct FuzzLine<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl PulseLine for FuzzLine<'_> {
    fn start_signal(&mut self) {}

    fn pulse_in(&mut self, level: Level, _timeout_us: u32) -> Option<u32> {
        match level {
            Level::Low => {
                if self.data.first().copied().unwrap_or(0) & 1 == 0 {
                    return None;
                }
                Some(80)
            }
            Level::High => {
                let byte = self.data.get(self.cursor).copied()?;
                self.cursor += 1;
                // Spread the byte over a wide width range so both bit
                // polarities and the timeout path get exercised.
                Some(u32::from(byte) * 7)
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut dht = Dht22::new(FuzzLine { data, cursor: 1 });

    if let Ok(sample) = dht.refresh() {
        // Raw fields are 16-bit tenths, so the physical ranges are bounded.
        assert!(sample.humidity_rh.is_finite());
        assert!(sample.temperature_c.is_finite());
        assert!((0.0..=6553.5).contains(&sample.humidity_rh));
        assert!((-3276.7..=6553.5).contains(&sample.temperature_c));
        assert_eq!(sample, dht.last_sample());
    }

    // A second cycle over the remaining bytes must also not panic.
    let _ = dht.refresh();
});
