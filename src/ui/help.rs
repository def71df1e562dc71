//! Help screen scrolling.
//!
//! The help text is a static list of short lines per inverter family; the
//! screen shows a window of [`HELP_VISIBLE_LINES`] of them with a clamped
//! (non-wrapping) scroll offset.

/// Lines that fit under the 10-pixel top margin at 9 pixels per line.
pub const HELP_VISIBLE_LINES: usize = 6;

/// Largest valid top-line offset for `total` help lines.
pub fn max_top_line(total: usize) -> usize {
    total.saturating_sub(HELP_VISIBLE_LINES)
}

/// Scroll one line towards the top.  Clamped, never wraps.
pub fn scroll_up(top_line: usize) -> usize {
    top_line.saturating_sub(1)
}

/// Scroll one line towards the bottom.  Clamped, never wraps.
pub fn scroll_down(top_line: usize, total: usize) -> usize {
    (top_line + 1).min(max_top_line(total))
}
