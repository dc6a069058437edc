//! Layout: compiled set of bit-fields describing how a word encodes categories.

use std::collections::{HashMap, HashSet};

use crate::{
    compiled::{CategoryInfo, CompiledField},
    errors::ConfigurationError,
    field::LayoutSpec,
    range::BitRange,
};

/// Widest word a layout may describe.
pub const MAX_TOTAL_BITS: u32 = 32;

/// An immutable, validated layout. Use [BitFieldLayout::compile] to build one from a [LayoutSpec].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitFieldLayout {
    total_bits: u32,
    /// Compiled fields in declaration order.
    pub fields: Vec<CompiledField>,
}

impl BitFieldLayout {
    /// Parses and validates `spec`.
    ///
    /// When `total_bits` is `None` the word is as wide as the highest declared bit
    /// plus one. Fails on malformed keys, overlapping ranges, duplicate or empty
    /// category names, values that do not fit their field or are mapped twice
    /// within it, and word widths that are too small for the ranges or larger
    /// than [MAX_TOTAL_BITS].
    pub fn compile(spec: &LayoutSpec, total_bits: Option<u32>) -> Result<Self, ConfigurationError> {
        if spec.is_empty() {
            return Err(ConfigurationError::EmptyLayout);
        }

        let ranges = spec
            .fields
            .iter()
            .map(|field| field.key.parse())
            .collect::<Result<Vec<BitRange>, _>>()?;

        let required = ranges
            .iter()
            .map(|range| range.end.saturating_add(1))
            .max()
            .unwrap_or(0);
        let total_bits = match total_bits {
            Some(given) if given > MAX_TOTAL_BITS => {
                return Err(ConfigurationError::TotalBitsTooLarge {
                    given,
                    max: MAX_TOTAL_BITS,
                });
            }
            Some(given) if given < required => {
                return Err(ConfigurationError::TotalBitsTooSmall { given, required });
            }
            Some(given) => given,
            None if required > MAX_TOTAL_BITS => {
                return Err(ConfigurationError::TotalBitsTooLarge {
                    given: required,
                    max: MAX_TOTAL_BITS,
                });
            }
            None => required,
        };

        let mut used = 0u64;
        for range in &ranges {
            let shared = used & range.mask();
            if shared != 0 {
                return Err(ConfigurationError::OverlappingBits {
                    bit: shared.trailing_zeros(),
                });
            }
            used |= range.mask();
        }

        let mut seen = HashSet::new();
        for field in &spec.fields {
            for (_, name) in &field.categories {
                if name.is_empty() {
                    return Err(ConfigurationError::EmptyCategoryName {
                        field: field.key.to_string(),
                    });
                }
                if !seen.insert(name.as_str()) {
                    return Err(ConfigurationError::DuplicateCategory(name.clone()));
                }
            }
        }

        let mut fields = Vec::with_capacity(ranges.len());
        for (field, range) in spec.fields.iter().zip(ranges) {
            let width = range.width();
            let mut categories = Vec::with_capacity(field.categories.len());
            let mut values = HashSet::new();

            for (value, name) in &field.categories {
                if *value >> width != 0 {
                    return Err(ConfigurationError::ValueExceedsField {
                        category: name.clone(),
                        value: *value,
                        width,
                    });
                }
                if !values.insert(*value) {
                    return Err(ConfigurationError::DuplicateValue {
                        field: field.key.to_string(),
                        value: *value,
                    });
                }

                categories.push(CategoryInfo {
                    name: name.clone(),
                    offset: range.start,
                    width,
                    encoded: *value,
                });
            }

            fields.push(CompiledField { range, categories });
        }

        Ok(BitFieldLayout { total_bits, fields })
    }

    pub fn total_bits(&self) -> u32 {
        self.total_bits
    }

    /// Size of the word domain, `2^total_bits`.
    pub fn max_value(&self) -> u64 {
        1u64 << self.total_bits
    }

    /// All categories, field by field, each field in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = &CategoryInfo> {
        self.fields.iter().flat_map(|field| field.categories.iter())
    }

    /// Flat category name to position table, used by the codec for O(1) lookup.
    pub(crate) fn index(&self) -> HashMap<String, usize> {
        self.categories()
            .enumerate()
            .map(|(i, info)| (info.name.clone(), i))
            .collect()
    }
}
