//! Interactive preview tree.
//!
//! The preview is a structured tree rather than markup: a host UI walks
//! the nodes and draws them however it likes. Image nodes carry their
//! display state and the actions the editor offers on them, which the
//! host wires to [`crate::studio::Studio::regenerate_image`] and
//! [`crate::studio::Studio::replace_image`].
//!
//! Caption and prompt-note tags that follow no image are dropped here;
//! the export keeps them as note paragraphs.

use std::collections::HashSet;

use crate::markup::{Block, ImageRef, Inline, parse};
use crate::model::{AssetId, Document, VisualAsset, VisualRegistry};
use crate::util::data_uri;

use super::style::FontChoice;

/// Root of a rendered preview.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PreviewTree {
    /// Family applied to body text: the first entry of the font stack.
    pub font_family: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub metadata: String,
    /// Header image, if the document has a header asset.
    pub header: Option<PreviewImage>,
    pub nodes: Vec<PreviewNode>,
}

impl PreviewTree {
    /// All image nodes in document order, header first, slides included.
    pub fn images(&self) -> Vec<&PreviewImage> {
        let mut images: Vec<&PreviewImage> = self.header.iter().collect();
        for node in &self.nodes {
            match node {
                PreviewNode::Image(image) => images.push(image),
                PreviewNode::Carousel { slides } => images.extend(slides),
                _ => {}
            }
        }
        images
    }

    /// Number of image nodes still waiting for their bytes.
    pub fn pending_count(&self) -> usize {
        self.images().iter().filter(|i| i.state == ImageState::Pending).count()
    }
}

/// One preview block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum PreviewNode {
    Heading { level: u8, content: Vec<Inline> },
    Paragraph { content: Vec<Inline> },
    List { items: Vec<Vec<Inline>> },
    Image(PreviewImage),
    Carousel { slides: Vec<PreviewImage> },
}

/// Display state of an image node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", rename_all = "snake_case"))]
pub enum ImageState {
    /// Bytes are present; `src` is a data URI.
    Ready { src: String },
    /// Generation has not produced bytes yet.
    Pending,
}

/// Action available on an image node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ImageAction {
    /// Re-run generation with the asset's stored prompt.
    Regenerate,
    /// Swap in user-uploaded bytes.
    Replace,
}

/// An image node with its metadata and controls.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PreviewImage {
    pub asset_id: AssetId,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub state: ImageState,
    /// Caption override if one followed the placeholder, else the asset's.
    pub caption: String,
    pub prompt_note: Option<String>,
    /// Instruction that produced the image.
    pub prompt: String,
    /// Regeneration is in flight for this asset.
    pub busy: bool,
    pub actions: Vec<ImageAction>,
}

/// Options for preview rendering.
#[derive(Debug, Clone, Default)]
pub struct PreviewOptions {
    pub font: FontChoice,
    /// Assets whose regeneration is in flight.
    pub regenerating: HashSet<AssetId>,
}

impl PreviewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, font: FontChoice) -> Self {
        self.font = font;
        self
    }

    pub fn with_regenerating(mut self, ids: impl IntoIterator<Item = AssetId>) -> Self {
        self.regenerating.extend(ids);
        self
    }
}

/// Render the preview tree with default options.
///
/// # Example
///
/// ```
/// use remix::{Document, render_preview};
/// use remix::model::VisualAsset;
/// use remix::render::{ImageState, PreviewNode};
///
/// let doc = Document::new("T", "[[IMAGE_1]]")
///     .with_visuals(vec![VisualAsset::pending("image_1", "Cat", "a cat")]);
/// let tree = render_preview(&doc);
///
/// let PreviewNode::Image(image) = &tree.nodes[0] else { panic!() };
/// assert_eq!(image.state, ImageState::Pending);
/// assert_eq!(image.caption, "Cat");
/// ```
pub fn render_preview(doc: &Document) -> PreviewTree {
    render_preview_with(doc, &PreviewOptions::default())
}

/// Render the preview tree.
pub fn render_preview_with(doc: &Document, options: &PreviewOptions) -> PreviewTree {
    let ctx = PreviewContext {
        visuals: &doc.visuals,
        options,
    };

    let mut nodes = Vec::new();
    for block in parse(&doc.body) {
        ctx.block(block, &mut nodes);
    }

    PreviewTree {
        font_family: options.font.preview_family().to_string(),
        title: doc.title.clone(),
        subtitle: doc.subtitle.clone(),
        metadata: doc.metadata.clone(),
        header: doc.header_asset().map(|asset| ctx.image(asset, None, None)),
        nodes,
    }
}

struct PreviewContext<'a> {
    visuals: &'a VisualRegistry,
    options: &'a PreviewOptions,
}

impl PreviewContext<'_> {
    fn block(&self, block: Block, nodes: &mut Vec<PreviewNode>) {
        let node = match block {
            Block::Heading { level, content } => PreviewNode::Heading { level, content },
            Block::Paragraph(content) => PreviewNode::Paragraph { content },
            Block::List(items) => PreviewNode::List { items },
            Block::Image(image) => match self.image_ref(image) {
                Some(image) => PreviewNode::Image(image),
                None => return,
            },
            Block::Carousel(slides) => {
                let slides: Vec<PreviewImage> = slides.into_iter().filter_map(|s| self.image_ref(s)).collect();
                if slides.is_empty() {
                    return;
                }
                PreviewNode::Carousel { slides }
            }
            Block::Note(..) => return,
        };
        nodes.push(node);
    }

    /// Missing assets produce no node; assets without bytes produce a
    /// pending one.
    fn image_ref(&self, image: ImageRef) -> Option<PreviewImage> {
        let asset = self.visuals.find(image.asset_id.as_ref()?)?;
        Some(self.image(asset, image.caption, image.prompt_note))
    }

    fn image(&self, asset: &VisualAsset, caption: Option<String>, prompt_note: Option<String>) -> PreviewImage {
        let state = match asset.image() {
            Some(data) => ImageState::Ready { src: data_uri(data) },
            None => ImageState::Pending,
        };
        PreviewImage {
            asset_id: asset.id.clone(),
            state,
            caption: caption.unwrap_or_else(|| asset.caption.clone()),
            prompt_note,
            prompt: asset.prompt.clone(),
            busy: self.options.regenerating.contains(&asset.id),
            actions: vec![ImageAction::Regenerate, ImageAction::Replace],
        }
    }
}
