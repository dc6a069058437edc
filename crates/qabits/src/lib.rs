//! # qabits
//!
//! A codec for packed categorical bit-fields, such as the quality-assurance
//! bitmasks that remote-sensing products store one integer per pixel.
//!
//! Declare which bit ranges of a word hold which categories, then encode
//! categories into words, decode words into categories, or enumerate every word
//! that satisfies a combination of categories (AND / OR / NOT).
//!
//! ## Example
//!
//! ```
//! use qabits::{BitFieldCodec, LayoutSpec};
//!
//! let spec = LayoutSpec::new()
//!     .field("0-1", [(0, "clear"), (1, "cloud"), (2, "mix")])
//!     .field("2-2", [(1, "shadow")])
//!     .field("8-9", [(1, "small_cirrus"), (2, "average_cirrus"), (3, "high_cirrus")]);
//! let codec = BitFieldCodec::new(spec, Some(16)).unwrap();
//!
//! assert_eq!(codec.decode(204).unwrap(), vec!["clear", "shadow"]);
//! assert_eq!(codec.encode("shadow").unwrap(), 4);
//! assert!(codec.matching_values("cloud").unwrap().contains(&0b101));
//! ```
//!
//! Known product layouts are available in [presets], and [raster] applies a
//! codec element-wise over whole bands.

pub mod bits;
pub mod codec;
pub mod compiled;
pub mod errors;
pub mod field;
pub mod layout;
pub mod presets;
pub mod range;
pub mod raster;
#[cfg(feature = "serde")]
pub mod serde;
pub mod strategy;

pub use codec::BitFieldCodec;
pub use errors::{ConfigurationError, DecodeError, Error, Result, UnknownCategoryError};
pub use field::{FieldSpec, LayoutSpec};
pub use layout::BitFieldLayout;
pub use presets::Preset;
pub use range::{BitRange, RangeKey};
pub use strategy::Enumeration;
