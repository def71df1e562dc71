//! Console display adapter.
//!
//! Renders [`ScreenModel`] frames as text over the logger — good enough
//! for bench bring-up and host simulation.  The production OLED adapter
//! implements the same [`DisplayPort`] trait against the panel driver.

use log::info;

use crate::app::ports::DisplayPort;
use crate::ui::ScreenModel;

/// Adapter that prints each frame to the serial console.  Identical
/// consecutive frames are suppressed.
pub struct LogDisplay {
    last: Option<ScreenModel>,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self { last: None }
    }
}

impl Default for LogDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for LogDisplay {
    fn present(&mut self, model: &ScreenModel) {
        if self.last.as_ref() == Some(model) {
            return;
        }
        if !model.title.is_empty() {
            match model.countdown_secs {
                Some(secs) => info!("== {} [{secs}s] ==", model.title),
                None => info!("== {} ==", model.title),
            }
        }
        for row in &model.rows {
            let marker = if row.selected { '>' } else { ' ' };
            let check = if row.checked { " *" } else { "" };
            match &row.value {
                Some(v) => info!("{marker} {:<16} {v}{check}", row.text),
                None => info!("{marker} {}{check}", row.text),
            }
        }
        if let Some(hint) = model.hint {
            info!("   ({hint})");
        }
        self.last = Some(model.clone());
    }
}
