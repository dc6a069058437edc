//! Low-level bit manipulation utilities for words.
//!
//! Bits are addressed LSB-first: bit 0 is the least significant bit of the word,
//! which is how QA band documentation numbers them.

/// Mask with the low `width` bits set. `width` of 64 or more yields all ones.
pub fn low_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Extracts `width` bits of `word` starting at bit `offset`, shifted down to bit 0.
///
/// Everything above the range is cleared by shifting it out and back in and
/// subtracting it from the word; what remains is shifted right by `offset`.
pub fn isolate(word: u64, offset: u32, width: u32) -> u64 {
    let shift = offset.saturating_add(width);
    let rest = if shift >= 64 {
        0
    } else {
        (word >> shift) << shift
    };
    let below = word - rest;

    if offset >= 64 { 0 } else { below >> offset }
}

/// Scatters the low bits of `counter` into the set bit positions of `positions`,
/// lowest first. Bits of `counter` beyond the number of positions are dropped.
pub fn deposit(mut counter: u64, mut positions: u64) -> u64 {
    let mut out = 0u64;

    while positions != 0 && counter != 0 {
        let lowest = positions & positions.wrapping_neg();
        if counter & 1 == 1 {
            out |= lowest;
        }
        counter >>= 1;
        positions &= positions - 1;
    }

    out
}
