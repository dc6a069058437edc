//! WASM bindings for the `qabits` bit-field codec.
//!
//! The layout is passed as JSON in the shape described in `qabits::serde`:
//!
//! ```text
//! // const layout = JSON.stringify({
//! //   "0-1": { "0": "clear", "1": "cloud", "2": "mix" },
//! //   "2":   { "1": "shadow" }
//! // });
//! //
//! // const codec = new WasmCodec(layout, 16);
//! // codec.decode(204);            // ["clear", "shadow"]
//! // codec.matchingValues("cloud"); // Uint32Array [1, 5, 9, ...]
//! // codec.applyPerElement(qaBand); // { clear: [...], cloud: [...], ... } in layout order
//! ```
//!
//! Errors are converted to `JsValue` strings holding the error message.

mod convert;

use qabits::{BitFieldCodec, Preset, raster};
use wasm_bindgen::prelude::*;

/// Compiled codec usable from JavaScript. Words are 32-bit unsigned numbers.
#[wasm_bindgen]
pub struct WasmCodec {
    codec: BitFieldCodec,
}

#[wasm_bindgen]
impl WasmCodec {
    /// Compiles a layout object; `total_bits` defaults to the highest declared bit plus one.
    #[wasm_bindgen(constructor)]
    pub fn new(layout_json: &str, total_bits: Option<u32>) -> Result<WasmCodec, JsValue> {
        let codec = convert::codec_from_layout_json(layout_json, total_bits)
            .map_err(|e| JsValue::from_str(&e))?;
        Ok(WasmCodec { codec })
    }

    /// Compiles a full definition: `{ "total_bits"?, "layout", "enumeration"? }`.
    #[wasm_bindgen(js_name = fromDefinition)]
    pub fn from_definition(json: &str) -> Result<WasmCodec, JsValue> {
        let codec = convert::codec_from_definition_json(json).map_err(|e| JsValue::from_str(&e))?;
        Ok(WasmCodec { codec })
    }

    /// Codec for a built-in product layout, e.g. `"sentinel2_qa60"`.
    #[wasm_bindgen(js_name = fromPreset)]
    pub fn from_preset(name: &str) -> Result<WasmCodec, JsValue> {
        let preset: Preset = name.parse().map_err(convert::error_to_js)?;
        let codec = preset.codec().map_err(convert::error_to_js)?;
        Ok(WasmCodec { codec })
    }

    pub fn categories(&self) -> Result<JsValue, JsValue> {
        let names: Vec<&str> = self.codec.categories().collect();
        convert::to_js(&names)
    }

    #[wasm_bindgen(js_name = totalBits)]
    pub fn total_bits(&self) -> u32 {
        self.codec.total_bits()
    }

    pub fn encode(&self, category: &str) -> Result<u32, JsValue> {
        let word = self.codec.encode(category).map_err(convert::error_to_js)?;
        Ok(word as u32)
    }

    pub fn decode(&self, value: u32) -> Result<JsValue, JsValue> {
        let categories = self
            .codec
            .decode(u64::from(value))
            .map_err(convert::error_to_js)?;
        convert::to_js(&categories)
    }

    /// `false` for categories the layout does not register; errors only on out-of-range words.
    pub fn matches(&self, value: u32, category: &str) -> Result<bool, JsValue> {
        self.codec
            .matches(u64::from(value), category)
            .map_err(convert::error_to_js)
    }

    #[wasm_bindgen(js_name = matchingValues)]
    pub fn matching_values(&self, category: &str) -> Result<Vec<u32>, JsValue> {
        let words = self
            .codec
            .matching_values(category)
            .map_err(convert::error_to_js)?;
        Ok(convert::words_to_js(words))
    }

    /// `categories` is an array of category names.
    #[wasm_bindgen(js_name = matchingValuesAll)]
    pub fn matching_values_all(&self, categories: JsValue) -> Result<Vec<u32>, JsValue> {
        let names = convert::from_js_categories(categories)?;
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let words = self
            .codec
            .matching_values_all(&names)
            .map_err(convert::error_to_js)?;
        Ok(convert::words_to_js(words))
    }

    #[wasm_bindgen(js_name = matchingValuesAny)]
    pub fn matching_values_any(&self, categories: JsValue) -> Result<Vec<u32>, JsValue> {
        let names = convert::from_js_categories(categories)?;
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let words = self
            .codec
            .matching_values_any(&names)
            .map_err(convert::error_to_js)?;
        Ok(convert::words_to_js(words))
    }

    #[wasm_bindgen(js_name = nonMatchingValues)]
    pub fn non_matching_values(&self, categories: JsValue) -> Result<Vec<u32>, JsValue> {
        let names = convert::from_js_categories(categories)?;
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let words = self
            .codec
            .non_matching_values(&names)
            .map_err(convert::error_to_js)?;
        Ok(convert::words_to_js(words))
    }

    /// Splits a QA band into one boolean array per category.
    #[wasm_bindgen(js_name = applyPerElement)]
    pub fn apply_per_element(&self, values: &[u32]) -> Result<JsValue, JsValue> {
        let band = raster::Band::new("qa", values.iter().map(|&v| u64::from(v)).collect());
        let decoded = raster::apply_per_element(&self.codec, &band).map_err(convert::error_to_js)?;
        convert::to_js(&convert::OrderedMasks(&decoded.masks))
    }
}
