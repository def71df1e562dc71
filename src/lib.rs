//! Inverter starter firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection.  All ESP-IDF-specific code is guarded by
//! `#[cfg(feature = "espidf")]` within each module, so the domain core
//! builds and tests on the host.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod events;
pub mod modes;
pub mod power;
pub mod runtime_limit;
pub mod tool;
pub mod ui;

pub mod error;
pub mod pins;

// Adapters and drivers compile everywhere; the hardware-touching halves
// are feature-gated inside.
pub mod adapters;
pub mod drivers;

#[cfg(test)]
mod testutil;
