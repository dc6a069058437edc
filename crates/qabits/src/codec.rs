//! [BitFieldCodec]: encode categories into words, decode words into categories,
//! and enumerate the words that satisfy combinations of categories.

use std::collections::{BTreeSet, HashMap};

use crate::{
    compiled::CategoryInfo,
    errors::{ConfigurationError, DecodeError, UnknownCategoryError},
    field::LayoutSpec,
    layout::BitFieldLayout,
    strategy::{self, AUTO_SCAN_MAX_BITS, Enumeration},
};

/// Codec over a fixed [BitFieldLayout].
///
/// Immutable once built: every operation is a pure function of the layout and
/// its input, so a codec can be shared between threads freely.
///
/// ```
/// use qabits::{BitFieldCodec, LayoutSpec};
///
/// let spec = LayoutSpec::new()
///     .field("0-1", [(0, "clear"), (1, "cloud"), (2, "mix")])
///     .field("2-2", [(1, "shadow")])
///     .field("8-9", [(1, "small_cirrus"), (2, "average_cirrus"), (3, "high_cirrus")]);
/// let codec = BitFieldCodec::new(spec, Some(16)).unwrap();
///
/// assert_eq!(codec.encode("average_cirrus").unwrap(), 512);
/// assert_eq!(codec.decode(204).unwrap(), vec!["clear", "shadow"]);
/// assert!(!codec.matches(204, "cloud").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct BitFieldCodec {
    layout: BitFieldLayout,
    /// Categories flattened in field-then-declaration order.
    infos: Vec<CategoryInfo>,
    index: HashMap<String, usize>,
    enumeration: Enumeration,
}

impl BitFieldCodec {
    /// Compiles `spec` and builds the category lookup table.
    pub fn new(spec: LayoutSpec, total_bits: Option<u32>) -> Result<Self, ConfigurationError> {
        let layout = BitFieldLayout::compile(&spec, total_bits)?;
        Ok(Self::from_layout(layout))
    }

    pub fn from_layout(layout: BitFieldLayout) -> Self {
        let infos: Vec<CategoryInfo> = layout.categories().cloned().collect();
        let index = layout.index();

        log::debug!(
            "built bit-field codec: {} fields, {} categories, {} bits",
            layout.fields.len(),
            infos.len(),
            layout.total_bits()
        );

        BitFieldCodec {
            layout,
            infos,
            index,
            enumeration: Enumeration::default(),
        }
    }

    /// Selects how the matching-values family enumerates words.
    pub fn with_enumeration(mut self, enumeration: Enumeration) -> Self {
        if enumeration == Enumeration::Scan && self.total_bits() > AUTO_SCAN_MAX_BITS {
            log::warn!(
                "forcing a full scan over {} bits; matching calls walk {} words",
                self.total_bits(),
                self.max_value()
            );
        }
        self.enumeration = enumeration;
        self
    }

    pub fn enumeration(&self) -> Enumeration {
        self.enumeration
    }

    pub fn layout(&self) -> &BitFieldLayout {
        &self.layout
    }

    pub fn total_bits(&self) -> u32 {
        self.layout.total_bits()
    }

    /// Size of the word domain, `2^total_bits`. Valid words are below it.
    pub fn max_value(&self) -> u64 {
        self.layout.max_value()
    }

    /// Category names in field-then-declaration order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.infos.iter().map(|info| info.name.as_str())
    }

    pub fn info(&self, category: &str) -> Option<&CategoryInfo> {
        self.index.get(category).map(|&i| &self.infos[i])
    }

    fn lookup(&self, category: &str) -> Result<&CategoryInfo, UnknownCategoryError> {
        self.info(category)
            .ok_or_else(|| UnknownCategoryError(category.to_string()))
    }

    /// The smallest word carrying `category`: its pattern in place, every other bit zero.
    pub fn encode(&self, category: &str) -> Result<u64, UnknownCategoryError> {
        Ok(self.lookup(category)?.encode())
    }

    /// Every word in the domain whose bits decode as including `category`.
    pub fn matching_values(&self, category: &str) -> Result<BTreeSet<u64>, UnknownCategoryError> {
        self.matching_values_with(category, self.enumeration)
    }

    /// [BitFieldCodec::matching_values] with a one-off enumeration strategy.
    pub fn matching_values_with(
        &self,
        category: &str,
        enumeration: Enumeration,
    ) -> Result<BTreeSet<u64>, UnknownCategoryError> {
        let info = self.lookup(category)?;
        Ok(enumeration.matching(info, self.total_bits()))
    }

    /// Words carrying every one of `categories` at once.
    ///
    /// Two categories of the same field never share a word, so their
    /// intersection is empty. No categories yields the whole domain, which is
    /// materialized: `2^total_bits` entries, about 4 billion at 32 bits. Test a
    /// single word with [BitFieldCodec::matches] instead when the domain is wide.
    pub fn matching_values_all(&self, categories: &[&str]) -> Result<BTreeSet<u64>, UnknownCategoryError> {
        let Some((first, rest)) = categories.split_first() else {
            return Ok(strategy::domain(self.total_bits()).collect());
        };

        let mut result = self.matching_values(first)?;
        for category in rest {
            let values = self.matching_values(category)?;
            result.retain(|value| values.contains(value));
        }

        Ok(result)
    }

    /// Words carrying at least one of `categories`. No categories yields nothing.
    pub fn matching_values_any(&self, categories: &[&str]) -> Result<BTreeSet<u64>, UnknownCategoryError> {
        let mut result = BTreeSet::new();
        for category in categories {
            result.extend(self.matching_values(category)?);
        }

        Ok(result)
    }

    /// Words of the domain carrying none of `categories`.
    ///
    /// Always walks the whole domain and usually keeps most of it, so the set
    /// grows with `2^total_bits` whatever the strategy. For wide words prefer
    /// [BitFieldCodec::matching_values_any] and test membership against it.
    pub fn non_matching_values(&self, categories: &[&str]) -> Result<BTreeSet<u64>, UnknownCategoryError> {
        let matching = self.matching_values_any(categories)?;

        Ok(strategy::domain(self.total_bits())
            .filter(|value| !matching.contains(value))
            .collect())
    }

    /// Categories carried by `value`, field by field in declaration order.
    ///
    /// Each field contributes at most one category; fields whose bits hold an
    /// unmapped value contribute none. Values outside `[0, max_value)` are rejected.
    pub fn decode(&self, value: u64) -> Result<Vec<&str>, DecodeError> {
        self.check_range(value)?;

        Ok(self
            .layout
            .fields
            .iter()
            .filter_map(|field| field.decode(value))
            .map(|info| info.name.as_str())
            .collect())
    }

    /// Whether `value` decodes as including `category`.
    ///
    /// A category the layout does not register is never carried, so it yields
    /// `false`; only values outside the domain are an error.
    pub fn matches(&self, value: u64, category: &str) -> Result<bool, DecodeError> {
        self.check_range(value)?;

        Ok(self.info(category).is_some_and(|info| info.matches(value)))
    }

    pub(crate) fn check_range(&self, value: u64) -> Result<(), DecodeError> {
        if value >= self.max_value() {
            return Err(DecodeError::ValueOutOfRange {
                value,
                max_value: self.max_value(),
            });
        }

        Ok(())
    }
}

impl TryFrom<LayoutSpec> for BitFieldCodec {
    type Error = ConfigurationError;

    fn try_from(spec: LayoutSpec) -> Result<Self, Self::Error> {
        BitFieldCodec::new(spec, None)
    }
}
