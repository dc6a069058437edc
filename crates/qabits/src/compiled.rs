use crate::{bits, range::BitRange};

/// Precomputed position and pattern of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    pub name: String,
    /// Lowest bit of the category's field.
    pub offset: u32,
    /// Width of the category's field in bits.
    pub width: u32,
    /// Raw value the field holds for this category, before shifting.
    pub encoded: u64,
}

impl CategoryInfo {
    /// Smallest word carrying this category: the pattern in place, all other bits zero.
    pub fn encode(&self) -> u64 {
        self.encoded << self.offset
    }

    /// Raw value of this category's field within `word`.
    pub fn extract(&self, word: u64) -> u64 {
        bits::isolate(word, self.offset, self.width)
    }

    pub fn matches(&self, word: u64) -> bool {
        self.extract(word) == self.encoded
    }

    /// Mask of the field bits within the word.
    pub fn field_mask(&self) -> u64 {
        bits::low_mask(self.width) << self.offset
    }
}

/// A field whose key has been parsed and whose categories have been positioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledField {
    pub range: BitRange,
    /// Categories in declaration order.
    pub categories: Vec<CategoryInfo>,
}

impl CompiledField {
    /// Category the field's bits in `word` stand for, if any.
    pub fn decode(&self, word: u64) -> Option<&CategoryInfo> {
        self.categories.iter().find(|info| info.matches(word))
    }
}
