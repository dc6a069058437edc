//! Error types for layout compilation, category lookup and decoding.

use thiserror::Error;

/// Errors produced when compiling a [crate::field::LayoutSpec] into a [crate::layout::BitFieldLayout].
///
/// Always fatal: no codec is created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Key is neither a bit index nor an inclusive `"start-end"` range.
    #[error("bit range keys must look like \"bit\" or \"start-end\", e.g. \"0-1\" (found {0:?})")]
    InvalidRangeKey(String),
    /// A bit index is claimed by more than one field.
    #[error("bit {bit} is used by more than one field; ranges must not overlap")]
    OverlappingBits { bit: u32 },
    /// Category names must be unique across the whole layout.
    #[error("category {0:?} is declared twice; categories must be unique")]
    DuplicateCategory(String),
    /// A field maps the same raw value to more than one category.
    #[error("value {value} is mapped twice in field {field}; each value names one category")]
    DuplicateValue { field: String, value: u64 },
    /// Category names cannot be empty.
    #[error("category names must not be empty (field {field})")]
    EmptyCategoryName { field: String },
    /// Raw value cannot be represented in the field's width.
    #[error("value {value} of category {category:?} does not fit in {width} bit(s)")]
    ValueExceedsField {
        category: String,
        value: u64,
        width: u32,
    },
    /// Layout declares no fields at all.
    #[error("layout must declare at least one bit range")]
    EmptyLayout,
    /// Explicit word width cannot hold the declared ranges.
    #[error("total bits {given} is too small, the layout needs at least {required}")]
    TotalBitsTooSmall { given: u32, required: u32 },
    /// Word width is zero or larger than [crate::layout::MAX_TOTAL_BITS].
    #[error("total bits must be between 1 and {max} (found {given})")]
    TotalBitsTooLarge { given: u32, max: u32 },
}

/// A category was named that the layout does not register.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category {0:?}")]
pub struct UnknownCategoryError(pub String);

/// A preset name that [crate::presets::Preset] does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown preset {0:?}")]
pub struct UnknownPresetError(pub String);

/// Errors produced when decoding a word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Word does not fit in `total_bits`.
    #[error("value {value} is outside the codec domain [0, {max_value})")]
    ValueOutOfRange { value: u64, max_value: u64 },
    /// Same as [DecodeError::ValueOutOfRange], for an element of a band.
    #[error("element {index} of band {band:?} has value {value} outside [0, {max_value})")]
    ElementOutOfRange {
        band: String,
        index: usize,
        value: u64,
        max_value: u64,
    },
}

/// Any error the crate can return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategoryError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    UnknownPreset(#[from] UnknownPresetError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
