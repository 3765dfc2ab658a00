//! Sensor subsystem.
//!
//! The only input device on the board is the DHT22 ambient sensor; its
//! decoder lives in [`dht22`] and speaks to hardware exclusively through the
//! [`PulseLine`](crate::app::ports::PulseLine) port, so the bit-level
//! protocol is testable with synthetic timing sequences.

pub mod dht22;

pub use dht22::{Dht22, SensorSample};
