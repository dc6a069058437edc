use std::collections::BTreeSet;

use qabits::{
    BitFieldCodec,
    serde::{CodecDef, LayoutDef},
};
use serde::{Serialize, Serializer, ser::SerializeMap};
use wasm_bindgen::JsValue;

/// Builds a codec from a bare layout object, e.g. `{"0-1": {"0": "clear"}}`.
pub fn codec_from_layout_json(layout_json: &str, total_bits: Option<u32>) -> Result<BitFieldCodec, String> {
    let layout: LayoutDef = serde_json::from_str(layout_json).map_err(|e| e.to_string())?;
    BitFieldCodec::new(layout.into(), total_bits).map_err(|e| e.to_string())
}

/// Builds a codec from a full definition with `layout`, `total_bits` and `enumeration`.
pub fn codec_from_definition_json(json: &str) -> Result<BitFieldCodec, String> {
    let def: CodecDef = serde_json::from_str(json).map_err(|e| e.to_string())?;
    BitFieldCodec::try_from(def).map_err(|e| e.to_string())
}

/// Words as JS numbers. Layouts are at most 32 bits wide, so every word fits.
pub fn words_to_js(words: BTreeSet<u64>) -> Vec<u32> {
    words.into_iter().map(|word| word as u32).collect()
}

/// Category masks serialized as one map entry per category, in codec order.
pub struct OrderedMasks<'a>(pub &'a [(String, Vec<bool>)]);

impl Serialize for OrderedMasks<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, mask) in self.0 {
            map.serialize_entry(category, mask)?;
        }
        map.end()
    }
}

pub fn error_to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Serializes to a plain JS value; maps become objects rather than `Map`s.
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

pub fn from_js_categories(value: JsValue) -> Result<Vec<String>, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_from_layout_json() {
        let codec = codec_from_layout_json(
            r#"{ "0-1": { "0": "clear", "1": "cloud" }, "2": { "1": "shadow" } }"#,
            Some(8),
        )
        .unwrap();
        assert_eq!(codec.total_bits(), 8);
        assert_eq!(codec.decode(204).unwrap(), vec!["clear", "shadow"]);
    }

    #[test]
    fn test_codec_errors_are_messages() {
        let err = codec_from_layout_json(r#"{ "0-1": { "0": "a" }, "1": { "1": "b" } }"#, None)
            .unwrap_err();
        assert_eq!(err, "bit 1 is used by more than one field; ranges must not overlap");
        assert!(codec_from_layout_json("not json", None).is_err());
    }

    #[test]
    fn test_codec_from_definition_json() {
        let codec = codec_from_definition_json(
            r#"{ "total_bits": 12, "layout": { "10": { "1": "cloud" } } }"#,
        )
        .unwrap();
        assert_eq!(words_to_js(codec.matching_values("cloud").unwrap()).len(), 2048);
    }

    #[test]
    fn test_words_to_js() {
        assert_eq!(words_to_js(BTreeSet::from([5, 1, 4])), vec![1, 4, 5]);
    }

    #[test]
    fn test_masks_keep_category_order() {
        let codec = codec_from_layout_json(
            r#"{ "0": { "1": "water" }, "1-2": { "1": "cloud", "2": "aerosol" } }"#,
            None,
        )
        .unwrap();
        let band = qabits::raster::Band::new("qa", vec![0, 1, 2, 4]);
        let decoded = qabits::raster::apply_per_element(&codec, &band).unwrap();

        let json = serde_json::to_string(&OrderedMasks(&decoded.masks)).unwrap();
        assert_eq!(
            json,
            r#"{"water":[false,true,false,false],"cloud":[false,false,true,false],"aerosol":[false,false,false,true]}"#
        );
    }
}
