//! Application layer — ports, events and the orchestrating service.

pub mod events;
pub mod ports;
pub mod service;
