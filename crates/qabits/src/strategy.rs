//! How the matching-values family enumerates the words that carry a category.
//!
//! - **Scan** walks the whole domain `[0, 2^total_bits)` and keeps every word whose
//!   field bits equal the category's pattern. Cost is `2^total_bits` whatever the field.
//! - **Analytic** fixes the field bits and enumerates only the combinations of the
//!   other `total_bits - width` bits. Same result, `2^width` times fewer steps.
//! - **Auto** scans up to [AUTO_SCAN_MAX_BITS] and switches to analytic above.

use std::collections::BTreeSet;

use crate::{bits, compiled::CategoryInfo};

/// Widest word [Enumeration::Auto] still scans.
pub const AUTO_SCAN_MAX_BITS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Enumeration {
    #[default]
    Auto,
    Scan,
    Analytic,
}

impl Enumeration {
    /// The concrete strategy used for a word of `total_bits`.
    pub fn resolve(self, total_bits: u32) -> Enumeration {
        match self {
            Enumeration::Auto if total_bits <= AUTO_SCAN_MAX_BITS => Enumeration::Scan,
            Enumeration::Auto => Enumeration::Analytic,
            other => other,
        }
    }

    /// Every word of `total_bits` whose bits at the category's field equal its pattern.
    pub fn matching(self, info: &CategoryInfo, total_bits: u32) -> BTreeSet<u64> {
        let resolved = self.resolve(total_bits);
        log::trace!(
            "enumerating {:?} over {} bits with {:?}",
            info.name,
            total_bits,
            resolved
        );

        match resolved {
            Enumeration::Analytic => analytic(info, total_bits),
            _ => scan(info, total_bits),
        }
    }
}

fn scan(info: &CategoryInfo, total_bits: u32) -> BTreeSet<u64> {
    domain(total_bits).filter(|word| info.matches(*word)).collect()
}

fn analytic(info: &CategoryInfo, total_bits: u32) -> BTreeSet<u64> {
    let fixed = info.encode();
    let free = bits::low_mask(total_bits) & !info.field_mask();
    let combinations = 1u64 << free.count_ones();

    (0..combinations)
        .map(|counter| fixed | bits::deposit(counter, free))
        .collect()
}

/// All words of `total_bits`, ascending.
pub fn domain(total_bits: u32) -> std::ops::Range<u64> {
    0..(1u64 << total_bits)
}
