//! Application boundary: port traits and outbound events.

pub mod events;
pub mod ports;
