//! HTML emitter for body markup.
//!
//! Walks the block list produced by [`crate::markup::parse`] and writes
//! the publishable fragment: headings, paragraphs, lists, figures, and
//! carousel containers. Images are inlined as data URIs, so the output
//! references no external files.
//!
//! # Example
//!
//! ```
//! use remix::model::{VisualAsset, VisualRegistry};
//! use remix::render::transform;
//!
//! let visuals = VisualRegistry::new(vec![
//!     VisualAsset::pending("image_1", "A cat", "a cat").with_image(vec![0x89, b'P', b'N', b'G']),
//! ]);
//! let html = transform("Hello **world**\n\n[[IMAGE_1]]", &visuals);
//!
//! assert!(html.contains("<strong>world</strong>"));
//! assert!(html.contains("<figcaption>A cat</figcaption>"));
//! ```

use std::fmt::Write;

use crate::markup::{Block, ImageRef, Inline, NoteKind, parse, strip_tokens};
use crate::model::{AssetId, VisualAsset, VisualRegistry};
use crate::util::data_uri;

/// Result of emitting a body.
#[derive(Debug, Clone, Default)]
pub struct BodyMarkup {
    /// The HTML fragment.
    pub html: String,
    /// Asset ids rendered as `<img>`, in order of appearance.
    pub assets: Vec<AssetId>,
    /// Number of carousel containers emitted.
    pub carousels: usize,
}

/// Convert a body to its HTML fragment.
///
/// Total over all inputs: unknown or pending assets are omitted and
/// malformed markers fall back to text.
pub fn transform(body: &str, visuals: &VisualRegistry) -> String {
    synthesize_body(body, visuals, 0).html
}

/// Emit a body starting at the given indent level.
pub fn synthesize_body(body: &str, visuals: &VisualRegistry, indent_level: usize) -> BodyMarkup {
    let mut ctx = HtmlContext::new(visuals, indent_level);
    for block in parse(body) {
        ctx.block(&block);
    }
    ctx.finish()
}

/// Context for the emit walk.
pub(crate) struct HtmlContext<'a> {
    out: String,
    assets: Vec<AssetId>,
    carousels: usize,
    visuals: &'a VisualRegistry,
    indent_level: usize,
}

impl<'a> HtmlContext<'a> {
    pub(crate) fn new(visuals: &'a VisualRegistry, indent_level: usize) -> Self {
        Self {
            out: String::new(),
            assets: Vec::new(),
            carousels: 0,
            visuals,
            indent_level,
        }
    }

    pub(crate) fn finish(self) -> BodyMarkup {
        BodyMarkup {
            html: self.out,
            assets: self.assets,
            carousels: self.carousels,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.indent_level {
            self.out.push_str("  ");
        }
    }

    /// Write one indented line.
    fn line(&mut self, text: &str) {
        self.indent();
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Heading { level, content } => {
                let tag = if *level >= 3 { "h3" } else { "h2" };
                self.indent();
                write!(self.out, "<{tag}>").unwrap();
                self.inlines(content);
                writeln!(self.out, "</{tag}>").unwrap();
            }
            Block::Paragraph(content) => {
                self.indent();
                self.out.push_str("<p>");
                self.inlines(content);
                self.out.push_str("</p>\n");
            }
            Block::List(items) => {
                self.line("<ul>");
                self.indent_level += 1;
                for item in items {
                    self.indent();
                    self.out.push_str("<li>");
                    self.inlines(item);
                    self.out.push_str("</li>\n");
                }
                self.indent_level -= 1;
                self.line("</ul>");
            }
            Block::Image(image) => {
                self.image_ref(image);
            }
            Block::Carousel(slides) => self.carousel(slides),
            Block::Note(kind, text) => {
                let class = match kind {
                    NoteKind::Caption => "caption-note",
                    NoteKind::PromptNote => "prompt-note",
                };
                self.indent();
                writeln!(self.out, "<p class=\"{class}\">{}</p>", escape_html(text)).unwrap();
            }
        }
    }

    fn inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            match inline {
                Inline::Text(text) => self.out.push_str(&escape_html(text)),
                Inline::Strong(children) => {
                    self.out.push_str("<strong>");
                    self.inlines(children);
                    self.out.push_str("</strong>");
                }
                Inline::Emphasis(children) => {
                    self.out.push_str("<em>");
                    self.inlines(children);
                    self.out.push_str("</em>");
                }
                Inline::Accent(accent, children) => {
                    self.out.push_str(accent.open_tag());
                    self.inlines(children);
                    self.out.push_str(accent.close_tag());
                }
                Inline::SoftBreak => self.out.push('\n'),
            }
        }
    }

    /// Resolve a placeholder to its asset, if it has image bytes.
    fn resolve(&self, image: &ImageRef) -> Option<&'a VisualAsset> {
        let visuals = self.visuals;
        let asset = visuals.find(image.asset_id.as_ref()?)?;
        asset.image().is_some().then_some(asset)
    }

    /// Emit a standalone figure. Returns false when nothing was written.
    fn image_ref(&mut self, image: &ImageRef) -> bool {
        let Some(asset) = self.resolve(image) else {
            return false;
        };
        self.figure(asset, image.caption.as_deref());
        if let Some(note) = &image.prompt_note {
            self.indent();
            writeln!(self.out, "<p class=\"prompt-note\">{}</p>", escape_html(note)).unwrap();
        }
        true
    }

    /// Emit `<figure>` for an asset with bytes. The caption override, when
    /// present, replaces the asset's own caption.
    pub(crate) fn figure(&mut self, asset: &VisualAsset, caption_override: Option<&str>) {
        let Some(data) = asset.image() else {
            return;
        };
        let alt = strip_tokens(&asset.caption);
        let caption = match caption_override {
            Some(text) => strip_tokens(text),
            None => alt.clone(),
        };

        self.line("<figure>");
        self.indent_level += 1;
        self.indent();
        writeln!(
            self.out,
            "<img src=\"{}\" alt=\"{}\" />",
            data_uri(data),
            escape_html(&alt)
        )
        .unwrap();
        if !caption.is_empty() {
            self.indent();
            writeln!(self.out, "<figcaption>{}</figcaption>", escape_html(&caption)).unwrap();
        }
        self.indent_level -= 1;
        self.line("</figure>");
        self.assets.push(asset.id.clone());
    }

    /// Emit a carousel container. Slides without a renderable image are
    /// skipped; a carousel with no slides left is not emitted at all.
    fn carousel(&mut self, slides: &[ImageRef]) {
        let renderable: Vec<&ImageRef> = slides.iter().filter(|s| self.resolve(s).is_some()).collect();
        if renderable.is_empty() {
            return;
        }

        self.line("<div class=\"image-carousel\">");
        self.indent_level += 1;
        self.line("<div class=\"carousel-track\">");
        self.indent_level += 1;
        for slide in renderable {
            self.line("<div class=\"carousel-slide\">");
            self.indent_level += 1;
            self.image_ref(slide);
            self.indent_level -= 1;
            self.line("</div>");
        }
        self.indent_level -= 1;
        self.line("</div>");
        self.line("<div class=\"carousel-dots\"></div>");
        self.indent_level -= 1;
        self.line("</div>");
        self.carousels += 1;
    }
}

/// Escape special HTML characters.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
