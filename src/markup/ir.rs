//! Intermediate block list shared by both renderers.
//!
//! The scanner in [`super::parse`] turns a body into a flat list of
//! [`Block`]s. The HTML emitter and the preview emitter each walk that
//! list, so they cannot disagree on what a placeholder means.

use crate::model::AssetId;

/// Inline content of headings, paragraphs, and list items.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "children", rename_all = "snake_case"))]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    /// One of the accent spans the generation service emits.
    Accent(Accent, Vec<Inline>),
    /// Line break inside a paragraph.
    SoftBreak,
}

/// Accent span kinds recognized inside body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Accent {
    /// `<span class="highlight-link">`: link-styled emphasis.
    HighlightLink,
    /// `<span class="blue">`
    Blue,
    /// `<u>`
    Underline,
}

impl Accent {
    pub(crate) const ALL: [Accent; 3] = [Accent::HighlightLink, Accent::Blue, Accent::Underline];

    pub fn open_tag(self) -> &'static str {
        match self {
            Accent::HighlightLink => "<span class=\"highlight-link\">",
            Accent::Blue => "<span class=\"blue\">",
            Accent::Underline => "<u>",
        }
    }

    pub fn close_tag(self) -> &'static str {
        match self {
            Accent::HighlightLink | Accent::Blue => "</span>",
            Accent::Underline => "</u>",
        }
    }
}

/// One occurrence of an image placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Referenced asset; `None` when the index does not map to an id.
    pub asset_id: Option<AssetId>,
    /// Byte offset of the placeholder in the body.
    pub offset: usize,
    /// Caption tag that followed the placeholder.
    pub caption: Option<String>,
    /// Prompt-note tag that followed the placeholder.
    pub prompt_note: Option<String>,
}

impl ImageRef {
    pub fn new(asset_id: Option<AssetId>, offset: usize) -> Self {
        Self {
            asset_id,
            offset,
            caption: None,
            prompt_note: None,
        }
    }
}

/// Kind of a caption-like tag that did not follow an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NoteKind {
    Caption,
    PromptNote,
}

/// A block of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Section heading, level 2 or 3.
    Heading { level: u8, content: Vec<Inline> },
    Paragraph(Vec<Inline>),
    /// Consecutive `- ` items.
    List(Vec<Vec<Inline>>),
    /// A standalone image placeholder.
    Image(ImageRef),
    /// Image placeholders of one carousel region, in order.
    Carousel(Vec<ImageRef>),
    /// A caption or prompt-note tag with no image before it.
    Note(NoteKind, String),
}

/// Concatenate the plain text of inline content.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    collect_text(inlines, &mut out);
    out
}

fn collect_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::Strong(children) | Inline::Emphasis(children) | Inline::Accent(_, children) => {
                collect_text(children, out)
            }
            Inline::SoftBreak => out.push(' '),
        }
    }
}
