//! Scrollbar thumb geometry for the right screen edge.
//!
//! The rail is drawn as a dotted line over a fixed pixel track; the thumb is
//! a short solid bar whose offset maps the scroll position linearly onto the
//! track.  Endpoints are pinned: position 0 sits at the very top, the last
//! position at the very bottom, and everything between is monotonic.

/// Track bounds in panel pixels.
pub const TRACK_Y0: u32 = 2;
pub const TRACK_Y1: u32 = 62;

/// Thumb height in pixels.
pub const THUMB_H: u32 = 4;

/// Dotted rail pitch.
pub const RAIL_DOT_STEP: u32 = 3;

/// Thumb top edge for scroll position `pos` out of `total` positions.
///
/// `None` when the content fits (no scrollbar drawn).
pub fn thumb_y(total: u32, pos: u32) -> Option<u32> {
    if total <= 1 {
        return None;
    }
    let span = TRACK_Y1 - TRACK_Y0 - THUMB_H;
    let pos = pos.min(total - 1);
    Some(TRACK_Y0 + pos * span / (total - 1))
}
