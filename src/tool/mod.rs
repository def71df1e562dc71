//! CF10B bench tool — secondary application variant.
//!
//! Drives a profile-selected GPIO pair for compressor bring-up on the
//! bench: a square-wave or steady output plus an interlock input, with a
//! serial set-speed frame builder for CF10B-protocol drop-in boards.

pub mod cf10b;
pub mod engine;
pub mod profile;
pub mod service;
