//! Platform adapters — the outer ring of the hexagon.
//!
//! Host-side tests use mock implementations of the same ports; only
//! [`time`] and [`log_sink`] have host fallbacks built in.

pub mod log_sink;
pub mod time;

#[cfg(target_os = "espidf")]
pub mod dht_line;
#[cfg(target_os = "espidf")]
pub mod nvs;
