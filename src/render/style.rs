//! Font choices and the export stylesheet.

use std::fmt::Write;
use std::str::FromStr;

/// Font stack used by the generated post.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontChoice {
    #[default]
    Merriweather,
    Inter,
    Roboto,
    OpenSans,
    PlayfairDisplay,
    JetBrainsMono,
    /// A user-supplied CSS font-family value, substituted verbatim.
    Custom(String),
}

impl FontChoice {
    /// The preset fonts, in menu order.
    pub const PRESETS: [FontChoice; 6] = [
        FontChoice::Merriweather,
        FontChoice::Inter,
        FontChoice::Roboto,
        FontChoice::OpenSans,
        FontChoice::PlayfairDisplay,
        FontChoice::JetBrainsMono,
    ];

    /// CSS `font-family` value. An empty custom value yields `""`; the
    /// stylesheet substitutes its own fallback for that case.
    pub fn css_value(&self) -> &str {
        match self {
            FontChoice::Merriweather => "Merriweather, serif",
            FontChoice::Inter => "Inter, sans-serif",
            FontChoice::Roboto => "Roboto, sans-serif",
            FontChoice::OpenSans => "Open Sans, sans-serif",
            FontChoice::PlayfairDisplay => "Playfair Display, serif",
            FontChoice::JetBrainsMono => "JetBrains Mono, monospace",
            FontChoice::Custom(value) => value,
        }
    }

    /// Human-readable menu label.
    pub fn label(&self) -> &str {
        match self {
            FontChoice::Merriweather => "Merriweather (Serif)",
            FontChoice::Inter => "Inter (Sans)",
            FontChoice::Roboto => "Roboto (Sans)",
            FontChoice::OpenSans => "Open Sans (Sans)",
            FontChoice::PlayfairDisplay => "Playfair Display (Serif)",
            FontChoice::JetBrainsMono => "JetBrains Mono (Mono)",
            FontChoice::Custom(_) => "Custom",
        }
    }

    /// First family of the stack, as applied by the preview.
    pub fn preview_family(&self) -> &str {
        let value = self.css_value();
        value.split(',').next().unwrap_or(value).trim()
    }
}

impl FromStr for FontChoice {
    type Err = std::convert::Infallible;

    /// Parse a preset by its CSS value or family name; anything else is
    /// taken as a custom font-family value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let preset = Self::PRESETS.into_iter().find(|font| {
            font.css_value().eq_ignore_ascii_case(trimmed) || font.preview_family().eq_ignore_ascii_case(trimmed)
        });
        Ok(preset.unwrap_or_else(|| FontChoice::Custom(s.to_string())))
    }
}

/// External font import placed at the top of the export stylesheet.
pub const FONT_IMPORT: &str = "@import url('https://fonts.googleapis.com/css2?family=Merriweather:ital,wght@0,300;0,400;0,700;1,400&family=Inter:wght@400;600;800&family=Playfair+Display:wght@400;700&family=Open+Sans:wght@400;600&family=Roboto:wght@400;700&display=swap');";

const BASE_RULES: &str = r#"  /* Base Typography */
  .blog-content { font-family: {FONT}; line-height: 1.8; color: #334155; max-width: 800px; margin: 0 auto; }
  .blog-content h1, .blog-content h2, .blog-content h3 { font-family: 'Inter', sans-serif; color: #0f172a; }
  .blog-content h1 { font-size: 2.5rem; font-weight: 800; line-height: 1.2; margin-bottom: 0.5em; }
  .blog-content h2 { font-size: 1.75rem; font-weight: 700; margin-top: 2.5em; margin-bottom: 1em; color: #1e293b; }
  .blog-content h3 { font-size: 1.4rem; font-weight: 600; margin-top: 2em; margin-bottom: 0.75em; color: #1e293b; }
  .blog-content p { margin-bottom: 1.5em; font-size: 1.1rem; }

  /* Metadata & Subtitle */
  .blog-meta { font-family: 'Inter', sans-serif; font-size: 0.9rem; font-weight: 600; color: #64748b; text-transform: uppercase; margin-bottom: 2em; letter-spacing: 0.05em; }
  .blog-subtitle { font-size: 1.25rem; color: #475569; margin-bottom: 1.5em; font-style: italic; line-height: 1.6; }

  /* Accent spans */
  .highlight-link { color: #2563eb; font-weight: 500; text-decoration: none; cursor: pointer; }
  .highlight-link:hover { text-decoration: underline; }
  .blue { color: #2563eb; font-weight: 500; }

  /* Images & Figures */
  .blog-content figure { margin: 2em 0; }
  .blog-content img { width: 100%; height: auto; border-radius: 12px; box-shadow: 0 4px 6px -1px rgba(0, 0, 0, 0.1); }
  .blog-content figcaption { text-align: center; font-size: 0.9rem; color: #64748b; margin-top: 1em; line-height: 1.5; }
  .blog-content .prompt-note { text-align: center; font-size: 0.85rem; color: #94a3b8; font-style: italic; margin-top: 0.5em; }
  .blog-content .caption-note { text-align: center; font-size: 0.9rem; color: #64748b; }

  /* Image Carousel */
  .image-carousel { position: relative; margin: 2em 0; overflow: hidden; border-radius: 12px; background: #f8fafc; }
  .carousel-track { display: flex; transition: transform 0.3s ease-in-out; }
  .carousel-slide { min-width: 100%; box-sizing: border-box; padding: 1em; }
  .carousel-slide img { width: 100%; border-radius: 8px; }
  .carousel-slide figcaption { padding: 0.5em 0; }
  .carousel-nav { position: absolute; top: 50%; transform: translateY(-50%); background: rgba(255,255,255,0.9); border: none; width: 40px; height: 40px; border-radius: 50%; cursor: pointer; font-size: 1.2em; box-shadow: 0 2px 8px rgba(0,0,0,0.15); z-index: 10; }
  .carousel-nav:hover { background: white; }
  .carousel-nav.prev { left: 10px; }
  .carousel-nav.next { right: 10px; }
  .carousel-dots { display: flex; justify-content: center; gap: 8px; padding: 1em 0; }
  .carousel-dot { width: 8px; height: 8px; border-radius: 50%; background: #cbd5e1; cursor: pointer; border: none; }
  .carousel-dot.active { background: #3b82f6; }

  /* Lists */
  .blog-content ul { margin: 1em 0 1.5em 1.5em; }
  .blog-content li { margin-bottom: 0.5em; font-size: 1.1rem; }
"#;

/// Build the `<style>` block for an export.
pub fn stylesheet(font: &FontChoice, include_font_import: bool) -> String {
    let family = match font.css_value().trim() {
        "" => "sans-serif",
        _ => font.css_value(),
    };

    let mut css = String::with_capacity(BASE_RULES.len() + FONT_IMPORT.len() + 32);
    css.push_str("<style>\n");
    if include_font_import {
        writeln!(css, "  {FONT_IMPORT}\n").unwrap();
    }
    css.push_str(&BASE_RULES.replacen("{FONT}", family, 1));
    css.push_str("</style>\n");
    css
}
