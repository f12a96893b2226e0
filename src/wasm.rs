//! WASM bindings for browser-based editors.
//!
//! Documents cross the boundary as JSON in the generation service's shape
//! (`title`, `subtitle`, `metadata`, `content`, `visuals`); images travel
//! base64-encoded inside it.

use wasm_bindgen::prelude::*;

use crate::model::{AssetId, Document};
use crate::render::{FontChoice, render_export, render_preview};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn parse_document(json: &str) -> Result<Document, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render the export fragment.
///
/// `font` is a preset family name or CSS value; anything else is used
/// verbatim as a custom font stack.
#[wasm_bindgen]
pub fn render_export_html(document_json: &str, font: &str) -> Result<String, JsValue> {
    let doc = parse_document(document_json)?;
    let font: FontChoice = font.parse().unwrap_or_default();
    Ok(render_export(&doc, &font))
}

/// Render the preview tree as JSON.
#[wasm_bindgen]
pub fn render_preview_json(document_json: &str) -> Result<String, JsValue> {
    let doc = parse_document(document_json)?;
    serde_json::to_string(&render_preview(&doc)).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Replace one asset's image and return the updated document JSON.
///
/// Unknown ids return the document unchanged.
#[wasm_bindgen]
pub fn replace_document_image(document_json: &str, asset_id: &str, image: &[u8]) -> Result<String, JsValue> {
    let doc = parse_document(document_json)?;
    let updated = doc.replace_image(&AssetId::new(asset_id), image.to_vec());
    serde_json::to_string(&updated).map_err(|e| JsValue::from_str(&e.to_string()))
}
