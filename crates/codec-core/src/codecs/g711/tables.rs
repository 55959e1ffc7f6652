//! G.711 decode lookup tables
//!
//! 256-entry tables (512 bytes each) built once from the reference
//! expansion, giving O(1) per-sample decoding.

use std::sync::LazyLock;

use super::reference::{alaw_expand, ulaw_expand};

static MULAW_DECODE_TABLE: LazyLock<[i16; 256]> = LazyLock::new(|| {
    let mut table = [0i16; 256];
    for (code, slot) in table.iter_mut().enumerate() {
        *slot = ulaw_expand(code as u8);
    }
    table
});

static ALAW_DECODE_TABLE: LazyLock<[i16; 256]> = LazyLock::new(|| {
    let mut table = [0i16; 256];
    for (code, slot) in table.iter_mut().enumerate() {
        *slot = alaw_expand(code as u8);
    }
    table
});

/// μ-law to linear via lookup table
#[inline]
pub fn mulaw_expand_table(encoded: u8) -> i16 {
    MULAW_DECODE_TABLE[encoded as usize]
}

/// A-law to linear via lookup table
#[inline]
pub fn alaw_expand_table(encoded: u8) -> i16 {
    ALAW_DECODE_TABLE[encoded as usize]
}
