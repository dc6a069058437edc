//! Declarations of bit-fields used to build a [crate::layout::BitFieldLayout].

use crate::range::RangeKey;

/// One declared bit range and the categories its raw values stand for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Bits the field occupies, as written in the declaration.
    pub key: RangeKey,
    /// Raw (unshifted) value to category name, in declaration order.
    /// Values without an entry decode to nothing.
    pub categories: Vec<(u64, String)>,
}

impl FieldSpec {
    pub fn new<K, I, S>(key: K, categories: I) -> Self
    where
        K: Into<RangeKey>,
        I: IntoIterator<Item = (u64, S)>,
        S: Into<String>,
    {
        FieldSpec {
            key: key.into(),
            categories: categories
                .into_iter()
                .map(|(value, name)| (value, name.into()))
                .collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::FieldDef> for FieldSpec {
    fn from(value: crate::serde::FieldDef) -> Self {
        FieldSpec {
            key: RangeKey::Span(value.key),
            categories: value.categories,
        }
    }
}

/// Ordered list of field declarations, e.g. one QA band's documentation table.
///
/// ```
/// use qabits::field::LayoutSpec;
///
/// let spec = LayoutSpec::new()
///     .field("0-1", [(0, "clear"), (1, "cloud"), (2, "mix")])
///     .field(2u32, [(1, "shadow")]);
/// assert_eq!(spec.fields.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutSpec {
    pub fields: Vec<FieldSpec>,
}

impl LayoutSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field; declaration order is kept.
    pub fn field<K, I, S>(mut self, key: K, categories: I) -> Self
    where
        K: Into<RangeKey>,
        I: IntoIterator<Item = (u64, S)>,
        S: Into<String>,
    {
        self.fields.push(FieldSpec::new(key, categories));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldSpec> for LayoutSpec {
    fn from_iter<T: IntoIterator<Item = FieldSpec>>(iter: T) -> Self {
        LayoutSpec {
            fields: iter.into_iter().collect(),
        }
    }
}
