//! DewGuard firmware library.
//!
//! Dew-prevention heater controller for astronomical optics: reads ambient
//! temperature/humidity from a DHT22-class sensor, keeps the optics a
//! configurable margin above the dew point with a PID loop, and can
//! self-calibrate its gains by relay-feedback autotuning.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod sensors;

pub mod error;
pub mod pins;

// Platform adapters; the ESP-IDF implementations inside are cfg-guarded.
pub mod adapters;
