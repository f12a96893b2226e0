//! Renderers for a [`Document`](crate::model::Document).
//!
//! Two outputs share one parse of the body:
//!
//! - [`render_export`]: a self-contained HTML fragment with inline styles,
//!   data-URI images, and the carousel script when needed
//! - [`render_preview`]: a structured tree for an interactive editor
//!
//! Both are pure functions of the document and their options.

mod export;
mod html;
mod preview;
mod style;

pub use export::{CAROUSEL_SCRIPT, ExportConfig, HtmlExporter, render_export};
pub use html::{BodyMarkup, escape_html, synthesize_body, transform};
pub use preview::{
    ImageAction, ImageState, PreviewImage, PreviewNode, PreviewOptions, PreviewTree, render_preview,
    render_preview_with,
};
pub use style::{FONT_IMPORT, FontChoice, stylesheet};
