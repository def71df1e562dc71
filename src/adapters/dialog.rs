//! Confirmation dialog adapter.
//!
//! The board has no modal UI yet, so confirmations are logged together
//! with a policy answer.  Production policy is `assume_yes = false`:
//! anything that needs explicit consent stays off until the on-panel
//! dialog renderer lands.

use log::info;

use crate::app::ports::DialogPort;

pub struct LogDialog {
    assume_yes: bool,
}

impl LogDialog {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl DialogPort for LogDialog {
    fn confirm(&mut self, header: &str, body: &str) -> bool {
        info!(
            "confirm: {header} ({body}) -> {}",
            if self.assume_yes { "accepted" } else { "declined" }
        );
        self.assume_yes
    }
}
