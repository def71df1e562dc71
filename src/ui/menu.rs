//! List navigation: wrap-around cursor over a 4-row viewport.

use crate::modes;

/// Rows visible at once on the 64-pixel panel.
pub const VISIBLE_ROWS: usize = 4;

/// One row of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRow {
    /// Operating mode by table index (powered menu only).
    Mode(usize),
    PowerOn,
    PowerOff,
    Settings,
    Help,
}

/// Menu contents for the current power state.  Unpowered the mode rows are
/// hidden so a stray OK cannot start the compressor.
pub fn menu_rows(powered: bool) -> heapless::Vec<MenuRow, 8> {
    let mut rows = heapless::Vec::new();
    if powered {
        for idx in 0..modes::mode_count() {
            let _ = rows.push(MenuRow::Mode(idx));
        }
        let _ = rows.push(MenuRow::PowerOff);
    } else {
        let _ = rows.push(MenuRow::PowerOn);
    }
    let _ = rows.push(MenuRow::Settings);
    let _ = rows.push(MenuRow::Help);
    rows
}

/// Cursor plus scroll window over a list of `total` rows.
///
/// Wraps at both ends; the window follows the cursor so the selected row is
/// always visible and never leaves `first_visible..first_visible+VISIBLE_ROWS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListCursor {
    cursor: usize,
    first_visible: usize,
}

impl ListCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn first_visible(&self) -> usize {
        self.first_visible
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.first_visible = 0;
    }

    /// Keep the cursor valid after the row set shrinks (e.g. power-off).
    pub fn clamp(&mut self, total: usize) {
        if total == 0 {
            self.reset();
            return;
        }
        if self.cursor >= total {
            self.cursor = total - 1;
        }
        self.first_visible = self.first_visible.min(total.saturating_sub(VISIBLE_ROWS));
        self.follow();
    }

    pub fn up(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        if self.cursor == 0 {
            self.cursor = total - 1;
            self.first_visible = total.saturating_sub(VISIBLE_ROWS);
        } else {
            self.cursor -= 1;
            self.follow();
        }
    }

    pub fn down(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        if self.cursor + 1 >= total {
            self.cursor = 0;
            self.first_visible = 0;
        } else {
            self.cursor += 1;
            self.follow();
        }
    }

    /// Place the cursor at `idx` directly (skip-over navigation) and bring
    /// the window along.
    pub fn jump_to(&mut self, idx: usize) {
        self.cursor = idx;
        self.follow();
    }

    fn follow(&mut self) {
        if self.cursor < self.first_visible {
            self.first_visible = self.cursor;
        } else if self.cursor >= self.first_visible + VISIBLE_ROWS {
            self.first_visible = self.cursor + 1 - VISIBLE_ROWS;
        }
    }
}
