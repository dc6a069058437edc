//! JSON-deserializable layout description.
//!
//! The shape follows the way QA band tables are documented: an object whose keys
//! are bit ranges (`"2"`, `"8-9"`) and whose values map raw field values to
//! category names.
//!
//! ```json
//! {
//!   "total_bits": 16,
//!   "layout": {
//!     "0-1": { "0": "clear", "1": "cloud", "2": "mix" },
//!     "2":   { "1": "shadow" }
//!   }
//! }
//! ```
//!
//! Field order matters for decoding, so maps are read in document order rather
//! than collected into a sorted or hashed map.

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, Visitor},
    ser::SerializeMap,
};

use crate::{
    codec::BitFieldCodec, errors::ConfigurationError, field::LayoutSpec, strategy::Enumeration,
};

/// Top-level codec definition: a layout plus optional word width and strategy.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CodecDef {
    /// Word width; derived from the highest declared bit when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_bits: Option<u32>,
    pub layout: LayoutDef,
    #[serde(default)]
    pub enumeration: Enumeration,
}

/// Ordered bit-range declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutDef {
    pub fields: Vec<FieldDef>,
}

/// One declared bit range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Range key as written, e.g. `"8-9"`.
    pub key: String,
    /// Raw value to category name, in document order.
    pub categories: Vec<(u64, String)>,
}

impl From<LayoutDef> for LayoutSpec {
    fn from(value: LayoutDef) -> Self {
        value.fields.into_iter().map(Into::into).collect()
    }
}

impl From<&LayoutSpec> for LayoutDef {
    fn from(value: &LayoutSpec) -> Self {
        LayoutDef {
            fields: value
                .fields
                .iter()
                .map(|field| FieldDef {
                    key: field.key.to_string(),
                    categories: field.categories.clone(),
                })
                .collect(),
        }
    }
}

impl TryFrom<CodecDef> for BitFieldCodec {
    type Error = ConfigurationError;

    fn try_from(value: CodecDef) -> Result<Self, Self::Error> {
        let codec = BitFieldCodec::new(value.layout.into(), value.total_bits)?;
        Ok(codec.with_enumeration(value.enumeration))
    }
}

impl<'de> Deserialize<'de> for LayoutDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LayoutVisitor;

        impl<'de> Visitor<'de> for LayoutVisitor {
            type Value = LayoutDef;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from bit range keys to category maps")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, categories)) = map.next_entry::<String, Categories>()? {
                    fields.push(FieldDef {
                        key,
                        categories: categories.0,
                    });
                }

                Ok(LayoutDef { fields })
            }
        }

        deserializer.deserialize_map(LayoutVisitor)
    }
}

impl Serialize for LayoutDef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.key, &CategoriesRef(&field.categories))?;
        }
        map.end()
    }
}

/// Category map of one field, read in document order.
struct Categories(Vec<(u64, String)>);

impl<'de> Deserialize<'de> for Categories {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CategoriesVisitor;

        impl<'de> Visitor<'de> for CategoriesVisitor {
            type Value = Categories;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from non-negative integers to category names")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut categories = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((value, name)) = map.next_entry::<String, String>()? {
                    let parsed = value.trim().parse::<u64>().map_err(|_| {
                        <A::Error as de::Error>::invalid_value(
                            de::Unexpected::Str(&value),
                            &"a non-negative integer",
                        )
                    })?;
                    categories.push((parsed, name));
                }

                Ok(Categories(categories))
            }
        }

        deserializer.deserialize_map(CategoriesVisitor)
    }
}

struct CategoriesRef<'a>(&'a [(u64, String)]);

impl Serialize for CategoriesRef<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (value, name) in self.0 {
            map.serialize_entry(&value.to_string(), name)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::Preset;

    const STATE_1KM: &str = r#"{
        "total_bits": 16,
        "layout": {
            "8-9": { "1": "small_cirrus", "2": "average_cirrus", "3": "high_cirrus" },
            "0-1": { "0": "clear", "1": "cloud", "2": "mix" },
            "2":   { "1": "shadow" }
        }
    }"#;

    #[test]
    fn test_deserialize_keeps_document_order() {
        let def: CodecDef = serde_json::from_str(STATE_1KM).unwrap();
        assert_eq!(def.total_bits, Some(16));
        assert_eq!(def.enumeration, Enumeration::Auto);

        let keys: Vec<&str> = def.layout.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["8-9", "0-1", "2"]);

        let codec = BitFieldCodec::try_from(def).unwrap();
        assert_eq!(codec.decode(0x1CC).unwrap(), vec!["small_cirrus", "clear", "shadow"]);
    }

    #[test]
    fn test_deserialize_enumeration() {
        let def: CodecDef = serde_json::from_str(
            r#"{ "layout": { "0": { "1": "flag" } }, "enumeration": "analytic" }"#,
        )
        .unwrap();
        let codec = BitFieldCodec::try_from(def).unwrap();
        assert_eq!(codec.enumeration(), Enumeration::Analytic);
        assert_eq!(codec.total_bits(), 1);
    }

    #[test]
    fn test_deserialize_rejects_bad_value_key() {
        let result = serde_json::from_str::<LayoutDef>(r#"{ "0-1": { "one": "cloud" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_layout_reports_configuration_error() {
        let def: CodecDef =
            serde_json::from_str(r#"{ "layout": { "0-1": { "0": "a" }, "1": { "1": "b" } } }"#)
                .unwrap();
        assert_eq!(
            BitFieldCodec::try_from(def).unwrap_err(),
            ConfigurationError::OverlappingBits { bit: 1 }
        );
    }

    #[test]
    fn test_value_spelled_twice_is_rejected() {
        for json in [
            r#"{ "layout": { "0-1": { "1": "a", "01": "b" } } }"#,
            r#"{ "layout": { "0-1": { "1": "a", "1": "b" } } }"#,
        ] {
            let def: CodecDef = serde_json::from_str(json).unwrap();
            assert_eq!(
                BitFieldCodec::try_from(def).unwrap_err(),
                ConfigurationError::DuplicateValue {
                    field: "0-1".to_string(),
                    value: 1
                },
                "{json}"
            );
        }
    }

    #[test]
    fn test_serialize_preset() {
        let def = LayoutDef::from(&Preset::Sentinel2Qa60.layout());
        let json = serde_json::to_string(&def).unwrap();
        assert_eq!(json, r#"{"10":{"1":"cloud"},"11":{"1":"cirrus"}}"#);

        let back: LayoutDef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, def);
    }
}
