//! Test support utilities - only compiled in test builds.

use core::sync::atomic::AtomicU8;
use std::vec::Vec;

use crate::circ::CircBuffer;

/// Standard status region built from initial byte values.
pub fn status_region<const N: usize>(bytes: [u8; N]) -> [AtomicU8; N] {
    bytes.map(AtomicU8::new)
}

/// Reads and commits everything a fresh session delivers, status included.
pub fn drain(buf: &mut CircBuffer<'_>) -> Vec<u8> {
    let n = buf.total_len();
    buf.start_read();
    let out: Vec<u8> = (0..n).filter_map(|_| buf.get_byte()).collect();
    buf.stop_read(out.len());
    out
}
