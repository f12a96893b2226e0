//! Ordered registry of a document's visual assets.

use std::sync::Arc;

use super::{AssetId, VisualAsset};

/// The ordered, fixed-membership collection of a document's image slots.
///
/// Membership and order are set once when the document is generated.
/// The only mutation is [`replace_image`](Self::replace_image), which
/// returns a new registry sharing every untouched asset with the old one.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<VisualAsset>", into = "Vec<VisualAsset>")
)]
pub struct VisualRegistry {
    assets: Vec<Arc<VisualAsset>>,
}

impl VisualRegistry {
    pub fn new(assets: Vec<VisualAsset>) -> Self {
        Self {
            assets: assets.into_iter().map(Arc::new).collect(),
        }
    }

    /// Look up an asset by id. The first asset wins if ids repeat.
    pub fn find(&self, id: &AssetId) -> Option<&VisualAsset> {
        self.assets.iter().map(Arc::as_ref).find(|a| &a.id == id)
    }

    /// Return a registry where `id`'s image bytes are `data`.
    ///
    /// Caption, prompt, ordering, and every other asset are preserved.
    /// An unknown id is a no-op.
    pub fn replace_image(&self, id: &AssetId, data: impl Into<Vec<u8>>) -> Self {
        let Some(pos) = self.assets.iter().position(|a| &a.id == id) else {
            return self.clone();
        };

        let mut assets = self.assets.clone();
        let updated = VisualAsset {
            image_data: Some(data.into()),
            ..VisualAsset::clone(&assets[pos])
        };
        assets[pos] = Arc::new(updated);
        Self { assets }
    }

    /// The asset rendered above the body, found by id rather than position.
    pub fn header_asset(&self) -> Option<&VisualAsset> {
        self.find(&AssetId::header())
    }

    /// Numbered in-body assets, in registry order.
    pub fn body_assets(&self) -> impl Iterator<Item = &VisualAsset> {
        self.iter().filter(|a| !a.id.is_header())
    }

    /// Ids of assets still waiting for image bytes.
    pub fn pending(&self) -> Vec<&AssetId> {
        self.iter().filter(|a| a.is_pending()).map(|a| &a.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisualAsset> {
        self.assets.iter().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Whether `other` holds the very same allocation for asset `id`.
    #[cfg(test)]
    pub(crate) fn shares_asset(&self, other: &Self, id: &AssetId) -> bool {
        let mine = self.assets.iter().find(|a| &a.id == id);
        let theirs = other.assets.iter().find(|a| &a.id == id);
        matches!((mine, theirs), (Some(a), Some(b)) if Arc::ptr_eq(a, b))
    }
}

impl From<Vec<VisualAsset>> for VisualRegistry {
    fn from(assets: Vec<VisualAsset>) -> Self {
        Self::new(assets)
    }
}

impl From<VisualRegistry> for Vec<VisualAsset> {
    fn from(registry: VisualRegistry) -> Self {
        registry
            .assets
            .into_iter()
            .map(|a| Arc::try_unwrap(a).unwrap_or_else(|shared| VisualAsset::clone(&shared)))
            .collect()
    }
}

impl FromIterator<VisualAsset> for VisualRegistry {
    fn from_iter<I: IntoIterator<Item = VisualAsset>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
