//! Per-element application of a codec over bands of QA words.
//!
//! A [Band] is a flat array of integer words, one per pixel (or any other element).
//! [apply_per_element] turns it into one boolean mask per category, which is the
//! shape raster engines expect when a QA band is split into flag layers.

use crate::{
    codec::BitFieldCodec,
    compiled::CategoryInfo,
    errors::{DecodeError, UnknownCategoryError},
};

/// How element-wise work is spread over threads.
///
/// `Parallel` needs the `parallel` feature; without it the work runs sequentially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    #[default]
    Sequential,
    Parallel,
}

/// A named integer band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Band {
    pub name: String,
    pub values: Vec<u64>,
}

impl Band {
    pub fn new(name: impl Into<String>, values: Vec<u64>) -> Self {
        Band {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One boolean mask per category, in the codec's category order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBands {
    /// Name of the band the masks were decoded from.
    pub source: String,
    pub masks: Vec<(String, Vec<bool>)>,
}

impl DecodedBands {
    pub fn get(&self, category: &str) -> Option<&[bool]> {
        self.masks
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, mask)| mask.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.masks.iter().map(|(name, _)| name.as_str())
    }
}

/// Decodes every element of `band`: mask `c` is true at `i` exactly when
/// `codec.decode(band.values[i])` contains `c`.
///
/// Fails on the first element outside the codec domain.
pub fn apply_per_element(codec: &BitFieldCodec, band: &Band) -> Result<DecodedBands, DecodeError> {
    apply_per_element_with(codec, band, ProcessingMode::default())
}

pub fn apply_per_element_with(
    codec: &BitFieldCodec,
    band: &Band,
    mode: ProcessingMode,
) -> Result<DecodedBands, DecodeError> {
    if let Some((index, &value)) = band
        .values
        .iter()
        .enumerate()
        .find(|(_, value)| **value >= codec.max_value())
    {
        return Err(DecodeError::ElementOutOfRange {
            band: band.name.clone(),
            index,
            value,
            max_value: codec.max_value(),
        });
    }

    log::trace!(
        "decoding band {:?}: {} elements into {} masks",
        band.name,
        band.len(),
        codec.categories().count()
    );

    let masks = codec
        .layout()
        .categories()
        .map(|info| {
            let mask = map_values(mode, &band.values, |value| info.matches(value));
            (info.name.clone(), mask)
        })
        .collect();

    Ok(DecodedBands {
        source: band.name.clone(),
        masks,
    })
}

/// Band holding `category`'s encoded word wherever `mask` is set, `None` elsewhere.
pub fn encode_band(
    codec: &BitFieldCodec,
    category: &str,
    mask: &[bool],
) -> Result<Vec<Option<u64>>, UnknownCategoryError> {
    let encoded = codec.encode(category)?;
    Ok(mask.iter().map(|&keep| keep.then_some(encoded)).collect())
}

/// True where the element carries at least one of `categories`.
///
/// Elements outside the codec domain never match.
pub fn mask_any(
    codec: &BitFieldCodec,
    band: &Band,
    categories: &[&str],
) -> Result<Vec<bool>, UnknownCategoryError> {
    mask_any_with(codec, band, categories, ProcessingMode::default())
}

pub fn mask_any_with(
    codec: &BitFieldCodec,
    band: &Band,
    categories: &[&str],
    mode: ProcessingMode,
) -> Result<Vec<bool>, UnknownCategoryError> {
    let infos = lookup_all(codec, categories)?;
    let max_value = codec.max_value();

    Ok(map_values(mode, &band.values, |value| {
        value < max_value && infos.iter().any(|info| info.matches(value))
    }))
}

/// True where the element carries every one of `categories`.
///
/// Elements outside the codec domain never match.
pub fn mask_all(
    codec: &BitFieldCodec,
    band: &Band,
    categories: &[&str],
) -> Result<Vec<bool>, UnknownCategoryError> {
    mask_all_with(codec, band, categories, ProcessingMode::default())
}

pub fn mask_all_with(
    codec: &BitFieldCodec,
    band: &Band,
    categories: &[&str],
    mode: ProcessingMode,
) -> Result<Vec<bool>, UnknownCategoryError> {
    let infos = lookup_all(codec, categories)?;
    let max_value = codec.max_value();

    Ok(map_values(mode, &band.values, |value| {
        value < max_value && infos.iter().all(|info| info.matches(value))
    }))
}

fn lookup_all<'a>(
    codec: &'a BitFieldCodec,
    categories: &[&str],
) -> Result<Vec<&'a CategoryInfo>, UnknownCategoryError> {
    categories
        .iter()
        .map(|category| {
            codec
                .info(category)
                .ok_or_else(|| UnknownCategoryError(category.to_string()))
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn map_values<T, F>(mode: ProcessingMode, values: &[u64], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(u64) -> T + Sync + Send,
{
    use rayon::prelude::*;

    match mode {
        ProcessingMode::Sequential => values.iter().map(|&value| f(value)).collect(),
        ProcessingMode::Parallel => values.par_iter().map(|&value| f(value)).collect(),
    }
}

#[cfg(not(feature = "parallel"))]
fn map_values<T, F>(_mode: ProcessingMode, values: &[u64], f: F) -> Vec<T>
where
    F: Fn(u64) -> T,
{
    values.iter().map(|&value| f(value)).collect()
}
