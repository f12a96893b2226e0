//! Export serializer: a self-contained HTML fragment for CMS pasting.
//!
//! The fragment is a leading comment, a `<style>` block, and one
//! `<article class="blog-content">` holding the title, subtitle, byline,
//! header figure, and body. When the body produced a carousel the
//! navigation script is appended inside the article.

use std::fmt::Write as _;
use std::io;

use crate::markup::strip_tokens;
use crate::model::Document;

use super::html::{HtmlContext, escape_html, synthesize_body};
use super::style::{FontChoice, stylesheet};

/// Client-side navigation for carousel containers: prev/next buttons and
/// one dot per slide, with the index wrapping modulo the slide count.
pub const CAROUSEL_SCRIPT: &str = r#"<script>
document.querySelectorAll('.image-carousel').forEach((carousel) => {
  const track = carousel.querySelector('.carousel-track');
  const slides = carousel.querySelectorAll('.carousel-slide');
  const dotsContainer = carousel.querySelector('.carousel-dots');
  let currentSlide = 0;

  slides.forEach((_, idx) => {
    const dot = document.createElement('button');
    dot.className = 'carousel-dot' + (idx === 0 ? ' active' : '');
    dot.onclick = () => goToSlide(idx);
    dotsContainer.appendChild(dot);
  });

  const prevBtn = document.createElement('button');
  prevBtn.className = 'carousel-nav prev';
  prevBtn.innerHTML = '&lsaquo;';
  prevBtn.onclick = () => goToSlide(currentSlide - 1);

  const nextBtn = document.createElement('button');
  nextBtn.className = 'carousel-nav next';
  nextBtn.innerHTML = '&rsaquo;';
  nextBtn.onclick = () => goToSlide(currentSlide + 1);

  carousel.appendChild(prevBtn);
  carousel.appendChild(nextBtn);

  function goToSlide(idx) {
    currentSlide = (idx + slides.length) % slides.length;
    track.style.transform = 'translateX(-' + (currentSlide * 100) + '%)';
    dotsContainer.querySelectorAll('.carousel-dot').forEach((d, i) => {
      d.className = 'carousel-dot' + (i === currentSlide ? ' active' : '');
    });
  }
});
</script>
"#;

/// Configuration for HTML export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Font stack applied to the article body.
    pub font: FontChoice,
    /// Emit the external font `@import` at the top of the stylesheet.
    pub include_font_import: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            font: FontChoice::default(),
            include_font_import: true,
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, font: FontChoice) -> Self {
        self.font = font;
        self
    }

    pub fn with_font_import(mut self, include: bool) -> Self {
        self.include_font_import = include;
        self
    }
}

/// Exporter for the publishable HTML fragment.
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter {
    config: ExportConfig,
}

impl HtmlExporter {
    /// Create an HtmlExporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an HtmlExporter with the specified configuration.
    pub fn with_config(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render a document to its HTML fragment.
    ///
    /// Rendering is pure: the same document and configuration always
    /// produce byte-identical output.
    pub fn render(&self, doc: &Document) -> String {
        let mut html = String::new();
        let title = strip_tokens(&doc.title);

        writeln!(html, "<!-- Blog Post: {} -->", comment_safe(&title)).unwrap();
        html.push_str(&stylesheet(&self.config.font, self.config.include_font_import));
        html.push('\n');

        html.push_str("<article class=\"blog-content\">\n");
        writeln!(html, "  <h1>{}</h1>", escape_html(&title)).unwrap();
        let subtitle = doc.subtitle.as_deref().map(strip_tokens);
        if let Some(subtitle) = subtitle.filter(|s| !s.trim().is_empty()) {
            writeln!(html, "  <p class=\"blog-subtitle\">{}</p>", escape_html(&subtitle)).unwrap();
        }
        let metadata = strip_tokens(&doc.metadata);
        writeln!(html, "  <div class=\"blog-meta\">{}</div>", escape_html(&metadata)).unwrap();

        if let Some(header) = doc.header_asset() {
            let mut ctx = HtmlContext::new(&doc.visuals, 1);
            ctx.figure(header, None);
            html.push_str(&ctx.finish().html);
        }

        let body = synthesize_body(&doc.body, &doc.visuals, 1);
        html.push_str(&body.html);

        if body.carousels > 0 {
            html.push_str(CAROUSEL_SCRIPT);
        }

        html.push_str("</article>\n");
        html
    }

    /// Write the rendered fragment to `writer`.
    pub fn export<W: io::Write>(&self, doc: &Document, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.render(doc).as_bytes())
    }
}

/// Render a document with the given font and default settings.
///
/// # Example
///
/// ```
/// use remix::{Document, render_export};
/// use remix::render::FontChoice;
///
/// let doc = Document::new("Cats", "## Why\nThey purr.");
/// let html = render_export(&doc, &FontChoice::Inter);
///
/// assert!(html.starts_with("<!-- Blog Post: Cats -->"));
/// assert!(html.contains("font-family: Inter, sans-serif;"));
/// assert!(html.contains("<h2>Why</h2>"));
/// ```
pub fn render_export(doc: &Document, font: &FontChoice) -> String {
    HtmlExporter::with_config(ExportConfig::new().with_font(font.clone())).render(doc)
}

/// Keep the title from closing the leading comment early.
fn comment_safe(title: &str) -> String {
    let mut out = title.to_string();
    while out.contains("--") {
        out = out.replace("--", "- -");
    }
    if out.ends_with('-') {
        out.push(' ');
    }
    out
}
