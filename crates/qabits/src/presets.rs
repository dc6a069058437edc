//! Layouts of the QA bands of common remote-sensing products.

use std::{fmt, str::FromStr};

use crate::{
    codec::BitFieldCodec,
    errors::{ConfigurationError, UnknownPresetError},
    field::LayoutSpec,
};

type Table = &'static [(&'static str, &'static [(u64, &'static str)])];

const MODIS09GA_STATE_1KM: Table = &[
    ("0-1", &[(0, "clear"), (1, "cloud"), (2, "mix")]),
    ("2", &[(1, "shadow")]),
    ("8-9", &[(1, "small_cirrus"), (2, "average_cirrus"), (3, "high_cirrus")]),
    ("13", &[(1, "adjacent")]),
    ("15", &[(1, "snow")]),
];

const MODIS13Q1_DETAILED_QA: Table = &[
    ("0-1", &[(0, "good_qa")]),
    ("2-5", &[(0, "highest_qa")]),
    ("8", &[(1, "adjacent")]),
    ("10", &[(1, "cloud")]),
    ("14", &[(1, "snow")]),
    ("15", &[(1, "shadow")]),
];

const LANDSAT_CLOUD_QA: Table = &[
    ("0", &[(1, "ddv")]),
    ("1", &[(1, "cloud")]),
    ("2", &[(1, "shadow")]),
    ("3", &[(1, "adjacent")]),
    ("4", &[(1, "snow")]),
    ("5", &[(1, "water")]),
];

const LANDSAT_PIXEL_QA: Table = &[
    ("1", &[(1, "clear")]),
    ("2", &[(1, "water")]),
    ("3", &[(1, "shadow")]),
    ("4", &[(1, "snow")]),
    ("5", &[(1, "cloud")]),
    ("6-7", &[(3, "high_confidence_cloud")]),
];

const LANDSAT8_PIXEL_QA: Table = &[
    ("1", &[(1, "clear")]),
    ("2", &[(1, "water")]),
    ("3", &[(1, "shadow")]),
    ("4", &[(1, "snow")]),
    ("5", &[(1, "cloud")]),
    ("6-7", &[(3, "high_confidence_cloud")]),
    ("8-9", &[(3, "cirrus")]),
    ("10", &[(1, "occlusion")]),
];

const LANDSAT_BQA: Table = &[
    ("4", &[(1, "cloud")]),
    ("5-6", &[(3, "high_confidence_cloud")]),
    ("7-8", &[(3, "shadow")]),
    ("9-10", &[(3, "snow")]),
];

const LANDSAT8_BQA: Table = &[
    ("4", &[(1, "cloud")]),
    ("5-6", &[(3, "high_confidence_cloud")]),
    ("7-8", &[(3, "shadow")]),
    ("9-10", &[(3, "snow")]),
    ("11-12", &[(3, "cirrus")]),
];

const LANDSAT8_C2_QA_PIXEL: Table = &[
    ("0", &[(0, "image"), (1, "fill")]),
    ("1", &[(1, "cloud_dilation")]),
    ("2", &[(1, "cirrus")]),
    ("3", &[(1, "cloud")]),
    ("4", &[(1, "shadow")]),
    ("5", &[(1, "snow")]),
    ("6", &[(1, "clear")]),
    ("7", &[(1, "water")]),
    ("8-9", &[(3, "high_confidence_cloud")]),
    ("10-11", &[(3, "high_confidence_shadow")]),
    ("12-13", &[(3, "high_confidence_snow")]),
    ("14-15", &[(3, "high_confidence_cirrus")]),
];

const SENTINEL2_QA60: Table = &[("10", &[(1, "cloud")]), ("11", &[(1, "cirrus")])];

/// A known QA band layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// MOD09GA / MYD09GA `state_1km`.
    Modis09gaState1km,
    /// MOD13Q1 / MYD13Q1 `DetailedQA`.
    Modis13q1DetailedQa,
    /// Landsat 4-7 surface reflectance `sr_cloud_qa`.
    LandsatCloudQa,
    /// Landsat 4-7 surface reflectance `pixel_qa`.
    LandsatPixelQa,
    /// Landsat 8 surface reflectance `pixel_qa`.
    Landsat8PixelQa,
    /// Landsat 4-7 TOA `BQA`.
    LandsatBqa,
    /// Landsat 8 TOA `BQA`.
    Landsat8Bqa,
    /// Landsat 8 collection 2 `QA_PIXEL`.
    Landsat8C2QaPixel,
    /// Sentinel-2 `QA60`.
    Sentinel2Qa60,
}

impl Preset {
    pub const ALL: [Preset; 9] = [
        Preset::Modis09gaState1km,
        Preset::Modis13q1DetailedQa,
        Preset::LandsatCloudQa,
        Preset::LandsatPixelQa,
        Preset::Landsat8PixelQa,
        Preset::LandsatBqa,
        Preset::Landsat8Bqa,
        Preset::Landsat8C2QaPixel,
        Preset::Sentinel2Qa60,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Modis09gaState1km => "modis09ga_state_1km",
            Preset::Modis13q1DetailedQa => "modis13q1_detailed_qa",
            Preset::LandsatCloudQa => "landsat_cloud_qa",
            Preset::LandsatPixelQa => "landsat_pixel_qa",
            Preset::Landsat8PixelQa => "landsat8_pixel_qa",
            Preset::LandsatBqa => "landsat_bqa",
            Preset::Landsat8Bqa => "landsat8_bqa",
            Preset::Landsat8C2QaPixel => "landsat8_c2_qa_pixel",
            Preset::Sentinel2Qa60 => "sentinel2_qa60",
        }
    }

    /// Name of the QA band in the product.
    pub fn band(&self) -> &'static str {
        match self {
            Preset::Modis09gaState1km => "state_1km",
            Preset::Modis13q1DetailedQa => "DetailedQA",
            Preset::LandsatCloudQa => "sr_cloud_qa",
            Preset::LandsatPixelQa | Preset::Landsat8PixelQa => "pixel_qa",
            Preset::LandsatBqa | Preset::Landsat8Bqa => "BQA",
            Preset::Landsat8C2QaPixel => "QA_PIXEL",
            Preset::Sentinel2Qa60 => "QA60",
        }
    }

    pub fn total_bits(&self) -> u32 {
        match self {
            Preset::LandsatCloudQa => 8,
            _ => 16,
        }
    }

    fn table(&self) -> Table {
        match self {
            Preset::Modis09gaState1km => MODIS09GA_STATE_1KM,
            Preset::Modis13q1DetailedQa => MODIS13Q1_DETAILED_QA,
            Preset::LandsatCloudQa => LANDSAT_CLOUD_QA,
            Preset::LandsatPixelQa => LANDSAT_PIXEL_QA,
            Preset::Landsat8PixelQa => LANDSAT8_PIXEL_QA,
            Preset::LandsatBqa => LANDSAT_BQA,
            Preset::Landsat8Bqa => LANDSAT8_BQA,
            Preset::Landsat8C2QaPixel => LANDSAT8_C2_QA_PIXEL,
            Preset::Sentinel2Qa60 => SENTINEL2_QA60,
        }
    }

    pub fn layout(&self) -> LayoutSpec {
        self.table()
            .iter()
            .fold(LayoutSpec::new(), |spec, (key, categories)| {
                spec.field(*key, categories.iter().copied())
            })
    }

    pub fn codec(&self) -> Result<BitFieldCodec, ConfigurationError> {
        BitFieldCodec::new(self.layout(), Some(self.total_bits()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = UnknownPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPresetError(s.to_string()))
    }
}
