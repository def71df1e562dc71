//! System configuration parameters.
//!
//! All tunable parameters for the starter application.  The reference units
//! shipped with two slightly different screen layouts and default screens;
//! those product variants are expressed here as configuration rather than
//! baked into the navigation code.

use serde::{Deserialize, Serialize};

/// Which screen the application boots into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartScreen {
    /// Inverter-type selection first (full product).
    SelectInverter,
    /// Straight to the safe menu (single-inverter variant).
    Menu,
    /// Wiring help first (early field units).
    Help,
}

/// Which application the unit boots into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppVariant {
    /// Menu-driven inverter starter.
    Starter,
    /// CF10B bench tool (profile-driven GPIO engine).
    Cf10bTool,
}

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Product variant ---
    /// Application the unit runs.
    pub variant: AppVariant,
    /// Screen shown at boot.
    pub start_screen: StartScreen,
    /// Whether per-mode runtime limits are enforced at boot.
    pub limit_runtime: bool,

    // --- Drive safety ---
    /// Pause after stopping the PWM generator before the pin is
    /// reconfigured (milliseconds).
    pub settle_delay_ms: u32,

    // --- Timing ---
    /// Input queue poll timeout (milliseconds).
    pub poll_timeout_ms: u32,
    /// CF10B tool engine tick cadence (milliseconds).
    pub engine_tick_interval_ms: u32,
    /// How long the "long press back to exit" hint stays up (milliseconds).
    pub hint_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            variant: AppVariant::Starter,
            start_screen: StartScreen::SelectInverter,
            limit_runtime: true,

            settle_delay_ms: 1,

            poll_timeout_ms: 100,
            engine_tick_interval_ms: 20,
            hint_timeout_ms: 1500,
        }
    }
}
