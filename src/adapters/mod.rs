//! Port adapters — concrete implementations of the `app::ports` traits.

pub mod dialog;
pub mod display_log;
pub mod hardware;
pub mod log_sink;
pub mod store;
pub mod time;
