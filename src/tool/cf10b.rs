//! CF10B set-speed frame codec.
//!
//! Wire format, 5 bytes:
//!
//! ```text
//! [0xA5] [0xC3] [rpm LSB] [rpm MSB] [checksum]
//! ```
//!
//! The checksum makes the whole frame sum to zero modulo 256.  Target RPM
//! is clamped to the controller's supported range before encoding.

/// Frame length in bytes.
pub const FRAME_LEN: usize = 5;

/// Frame header bytes.
pub const HDR0: u8 = 0xA5;
pub const HDR1: u8 = 0xC3;

/// Highest RPM the CF10B controller accepts.
pub const RPM_MAX: u16 = 4500;

/// Drive-frequency to RPM conversion factor (two-pole motor pairs).
pub const RPM_PER_HZ: u32 = 30;

/// Checksum over the first four bytes: two's complement of their sum.
pub fn checksum(head: &[u8; FRAME_LEN - 1]) -> u8 {
    let sum: u32 = head.iter().map(|&b| u32::from(b)).sum();
    (0x100 - (sum & 0xFF)) as u8
}

/// Build a set-speed frame for `rpm`, clamping to [`RPM_MAX`].
pub fn build_set_speed(rpm: u16) -> [u8; FRAME_LEN] {
    let rpm = rpm.min(RPM_MAX);
    let head = [HDR0, HDR1, (rpm & 0xFF) as u8, (rpm >> 8) as u8];
    [head[0], head[1], head[2], head[3], checksum(&head)]
}

/// Validate a received frame: header bytes plus zero-sum checksum.
pub fn verify(frame: &[u8; FRAME_LEN]) -> bool {
    let sum: u32 = frame.iter().map(|&b| u32::from(b)).sum();
    frame[0] == HDR0 && frame[1] == HDR1 && sum % 0x100 == 0
}

/// RPM equivalent of a drive frequency.
pub fn rpm_for_freq(freq_hz: u32) -> u16 {
    (freq_hz * RPM_PER_HZ).min(u32::from(RPM_MAX)) as u16
}
