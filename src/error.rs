//! Error types for the DewGuard firmware.
//!
//! Every failure in this firmware is local and recoverable, so there is no
//! crate-wide error enum: the sensor decoder reports its own failure modes,
//! config storage has [`ConfigError`](crate::app::ports::ConfigError), and
//! `main()` wraps peripheral bring-up in `anyhow`. All variants are `Copy`
//! so they pass through the event sink without allocation.

use core::fmt;

/// Failure modes of one DHT22 decode cycle.
///
/// All sensor failures are non-fatal: the decoder keeps its last good cached
/// sample and callers treat "no fresh sample" as a legitimate steady state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No acknowledgement edge within the bounded start window.
    Timeout,
    /// Transmitted checksum byte does not match the payload sum.
    Checksum,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "no acknowledgement from sensor"),
            Self::Checksum => write!(f, "checksum mismatch"),
        }
    }
}
