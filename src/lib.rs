//! FloodWatch station library.
//!
//! Exposes the station core (sampling, classification, fan-out) and its
//! consumer tasks for integration testing. ESP-IDF-specific code is guarded
//! by the `espidf` feature within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod fanout;
pub mod pins;
pub mod sensors;
pub mod station;
