//! Document model.
//!
//! A [`Document`] is the unit produced by one generation call: title,
//! subtitle, byline metadata, an editable markdown-like body, and the
//! [`VisualRegistry`] holding every image slot the body can reference.
//!
//! Documents are immutable values. Editing the body or swapping an image
//! produces a new `Document`; assets live behind `Arc`, so the assets a
//! mutation does not touch are shared between the old and new value.

mod registry;

use std::fmt;

pub use registry::VisualRegistry;

/// Id of the asset rendered above the body.
pub const HEADER_ASSET_ID: &str = "header";

/// Prefix of numbered in-body asset ids (`image_1`, `image_2`, ...).
pub const IMAGE_ASSET_PREFIX: &str = "image_";

/// Stable identifier of a visual asset.
///
/// Either `"header"` or `"image_<N>"` where `N` matches a `[[IMAGE_N]]`
/// placeholder in the body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AssetId(String);

impl AssetId {
    /// Wrap an id string as produced by the generation service.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The header asset id.
    pub fn header() -> Self {
        Self(HEADER_ASSET_ID.to_string())
    }

    /// The id referenced by the placeholder with index `n`.
    pub fn numbered(n: u64) -> Self {
        Self(format!("{IMAGE_ASSET_PREFIX}{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_header(&self) -> bool {
        self.0 == HEADER_ASSET_ID
    }

    /// Placeholder index for numbered ids, `None` for the header or
    /// anything not of the form `image_<N>`.
    pub fn index(&self) -> Option<u64> {
        let digits = self.0.strip_prefix(IMAGE_ASSET_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An image slot: optional bytes plus the caption and prompt that describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VisualAsset {
    pub id: AssetId,
    /// Raw image bytes; `None` while generation for this slot is pending.
    #[cfg_attr(feature = "serde", serde(default, with = "base64_bytes"))]
    pub image_data: Option<Vec<u8>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub caption: String,
    /// Instruction that produced the image; reused on regenerate.
    #[cfg_attr(feature = "serde", serde(default))]
    pub prompt: String,
}

impl VisualAsset {
    /// Create an asset with no image yet.
    pub fn pending(id: impl Into<AssetId>, caption: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image_data: None,
            caption: caption.into(),
            prompt: prompt.into(),
        }
    }

    /// Set the image bytes.
    pub fn with_image(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.image_data = Some(data.into());
        self
    }

    /// The image bytes, if generation has completed.
    pub fn image(&self) -> Option<&[u8]> {
        self.image_data.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.image_data.is_none()
    }
}

/// A generated post: header fields, editable body, and its visual assets.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub subtitle: Option<String>,
    /// Free-form byline / date line.
    #[cfg_attr(feature = "serde", serde(default))]
    pub metadata: String,
    /// Markdown-like body with placeholder tokens.
    #[cfg_attr(feature = "serde", serde(rename = "content", default))]
    pub body: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visuals: VisualRegistry,
}

impl Document {
    /// Create a document with a title and body and no visuals.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    /// Set the subtitle.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the byline metadata.
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }

    /// Set the visual assets.
    pub fn with_visuals(mut self, visuals: impl Into<VisualRegistry>) -> Self {
        self.visuals = visuals.into();
        self
    }

    /// A copy of this document with a new body. Visuals are shared.
    pub fn with_body(&self, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..self.clone()
        }
    }

    /// A copy of this document with one asset's image replaced.
    ///
    /// Every other field and asset is carried over unchanged. Unknown ids
    /// leave the document as it was.
    pub fn replace_image(&self, id: &AssetId, data: impl Into<Vec<u8>>) -> Self {
        Self {
            visuals: self.visuals.replace_image(id, data),
            ..self.clone()
        }
    }

    /// Look up an asset by id.
    pub fn find_visual(&self, id: &AssetId) -> Option<&VisualAsset> {
        self.visuals.find(id)
    }

    /// The asset rendered above the body, if the document has one.
    pub fn header_asset(&self) -> Option<&VisualAsset> {
        self.visuals.header_asset()
    }
}

/// Serde adapter storing optional image bytes as a base64 string.
#[cfg(feature = "serde")]
mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match data {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        match encoded.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => {
                // Accept full data URIs as well as bare base64
                let payload = text.split_once(";base64,").map_or(text, |(_, rest)| rest);
                STANDARD
                    .decode(payload)
                    .map(Some)
                    .map_err(serde::de::Error::custom)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_constructors() {
        assert_eq!(AssetId::header().as_str(), "header");
        assert_eq!(AssetId::numbered(7).as_str(), "image_7");
        assert!(AssetId::header().is_header());
        assert!(!AssetId::numbered(1).is_header());
    }

    #[test]
    fn test_asset_id_index() {
        assert_eq!(AssetId::numbered(12).index(), Some(12));
        assert_eq!(AssetId::header().index(), None);
        assert_eq!(AssetId::new("image_").index(), None);
        assert_eq!(AssetId::new("image_x").index(), None);
        assert_eq!(AssetId::new("photo_3").index(), None);
    }

    #[test]
    fn test_document_builder() {
        let doc = Document::new("Title", "Body")
            .with_subtitle("Sub")
            .with_metadata("By Someone")
            .with_visuals(vec![VisualAsset::pending("header", "Cap", "Prompt")]);

        assert_eq!(doc.title, "Title");
        assert_eq!(doc.subtitle.as_deref(), Some("Sub"));
        assert_eq!(doc.metadata, "By Someone");
        assert!(doc.header_asset().is_some());
    }

    #[test]
    fn test_with_body_keeps_visuals() {
        let doc = Document::new("T", "old").with_visuals(vec![
            VisualAsset::pending("image_1", "c", "p").with_image(vec![1, 2, 3]),
        ]);
        let edited = doc.with_body("new");

        assert_eq!(edited.body, "new");
        assert_eq!(doc.body, "old");
        assert_eq!(edited.visuals, doc.visuals);
    }

    #[test]
    fn test_replace_image_leaves_body() {
        let doc = Document::new("T", "[[IMAGE_1]]")
            .with_visuals(vec![VisualAsset::pending("image_1", "c", "p")]);
        let updated = doc.replace_image(&AssetId::numbered(1), vec![9]);

        assert_eq!(updated.body, doc.body);
        assert_eq!(updated.find_visual(&AssetId::numbered(1)).unwrap().image(), Some(&[9u8][..]));
        assert!(doc.find_visual(&AssetId::numbered(1)).unwrap().is_pending());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_document_json_shape() {
        let json = r#"{
            "title": "Cats",
            "subtitle": "All about cats",
            "metadata": "March 2024",
            "content": "[[IMAGE_1]]",
            "visuals": [
                {"id": "image_1", "imageData": "AQID", "caption": "Cat", "prompt": "a cat"},
                {"id": "image_2", "caption": "Dog", "prompt": "a dog"}
            ]
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();

        assert_eq!(doc.body, "[[IMAGE_1]]");
        assert_eq!(doc.visuals.len(), 2);
        assert_eq!(
            doc.find_visual(&AssetId::numbered(1)).unwrap().image(),
            Some(&[1u8, 2, 3][..])
        );
        assert!(doc.find_visual(&AssetId::numbered(2)).unwrap().is_pending());

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["content"], "[[IMAGE_1]]");
        assert_eq!(back["visuals"][0]["imageData"], "AQID");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_image_data_accepts_data_uri() {
        let json = r#"{"id": "header", "imageData": "data:image/png;base64,AQID"}"#;
        let asset: VisualAsset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.image(), Some(&[1u8, 2, 3][..]));
    }
}
