//! Bit ranges and the keys they are declared with.

use std::{fmt, str::FromStr};

use crate::{bits, errors::ConfigurationError};

/// An inclusive, contiguous range of bit indices, `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitRange {
    pub start: u32,
    pub end: u32,
}

impl BitRange {
    /// Range covering `start..=end`. Fails if `start > end`.
    pub fn new(start: u32, end: u32) -> Result<Self, ConfigurationError> {
        if start > end {
            return Err(ConfigurationError::InvalidRangeKey(format!("{start}-{end}")));
        }

        Ok(BitRange { start, end })
    }

    /// Range of a single bit.
    pub fn bit(index: u32) -> Self {
        BitRange {
            start: index,
            end: index,
        }
    }

    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Mask of the range positioned within the word.
    pub fn mask(&self) -> u64 {
        bits::low_mask(self.width())
            .checked_shl(self.start)
            .unwrap_or(0)
    }
}

impl fmt::Display for BitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for BitRange {
    type Err = ConfigurationError;

    /// Parses `"n"` or `"start-end"` (surrounding whitespace allowed).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigurationError::InvalidRangeKey(s.to_string());
        let parse_index = |part: &str| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u32>().map_err(|_| invalid())
        };

        let trimmed = s.trim();
        match trimmed.split_once('-') {
            None => Ok(BitRange::bit(parse_index(trimmed)?)),
            Some((start, end)) => {
                BitRange::new(parse_index(start)?, parse_index(end)?).map_err(|_| invalid())
            }
        }
    }
}

/// How a field's bits are named in a layout declaration: a single bit index,
/// or a string in QA documentation style (`"2"`, `"8-9"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RangeKey {
    Bit(u32),
    Span(String),
}

impl RangeKey {
    pub fn parse(&self) -> Result<BitRange, ConfigurationError> {
        match self {
            RangeKey::Bit(index) => Ok(BitRange::bit(*index)),
            RangeKey::Span(text) => text.parse(),
        }
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeKey::Bit(index) => write!(f, "{index}"),
            RangeKey::Span(text) => f.write_str(text),
        }
    }
}

impl From<u32> for RangeKey {
    fn from(value: u32) -> Self {
        RangeKey::Bit(value)
    }
}

impl From<&str> for RangeKey {
    fn from(value: &str) -> Self {
        RangeKey::Span(value.to_string())
    }
}

impl From<String> for RangeKey {
    fn from(value: String) -> Self {
        RangeKey::Span(value)
    }
}

impl From<BitRange> for RangeKey {
    fn from(value: BitRange) -> Self {
        RangeKey::Span(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_bit() {
        assert_eq!("2".parse::<BitRange>().unwrap(), BitRange::bit(2));
        assert_eq!(" 15 ".parse::<BitRange>().unwrap(), BitRange::bit(15));
    }

    #[test]
    fn test_parse_span() {
        let range: BitRange = "8-9".parse().unwrap();
        assert_eq!(range, BitRange { start: 8, end: 9 });
        assert_eq!(range.width(), 2);
        assert_eq!(range.mask(), 0b11_0000_0000);
        assert_eq!("2-2".parse::<BitRange>().unwrap(), BitRange::bit(2));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for key in ["", "-", "a", "1-", "-1", "1-2-3", "+1", "1 - 2", "3-1", "1.5"] {
            assert_eq!(
                key.parse::<BitRange>().unwrap_err(),
                ConfigurationError::InvalidRangeKey(key.to_string()),
                "key {key:?}"
            );
        }
    }

    #[test]
    fn test_range_key() {
        assert_eq!(RangeKey::from(4).parse().unwrap(), BitRange::bit(4));
        assert_eq!(
            RangeKey::from("0-1").parse().unwrap(),
            BitRange { start: 0, end: 1 }
        );
        assert!(RangeKey::from("x").parse().is_err());
    }

    #[test]
    fn test_bit_range_new() {
        assert!(BitRange::new(3, 1).is_err());
        assert_eq!(BitRange::new(1, 3).unwrap().mask(), 0b1110);
        assert_eq!(BitRange::new(31, 31).unwrap().mask(), 1 << 31);
    }
}
