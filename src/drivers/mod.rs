//! Actuator drivers.

pub mod heater;

pub use heater::HeaterDriver;
