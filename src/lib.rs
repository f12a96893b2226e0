//! # remix
//!
//! Content assembly and templating for generated, illustrated blog posts.
//!
//! ## Features
//!
//! - Placeholder vocabulary for images, carousels, captions, and prompt notes
//! - Immutable [`Document`] model with structurally shared image slots
//! - Export to a self-contained HTML fragment with inline styles
//! - Structured preview tree for interactive editors
//! - Editing session and storyboard driving an async generation backend
//!
//! ## Quick Start
//!
//! ```
//! use remix::{AssetId, Document, VisualAsset, render_export, render_preview};
//! use remix::render::FontChoice;
//!
//! let doc = Document::new("Cats", "## Why cats\nThey **purr**.\n\n[[IMAGE_1]]")
//!     .with_metadata("March 2024")
//!     .with_visuals(vec![VisualAsset::pending("image_1", "A cat", "a sleeping cat")]);
//!
//! // Pending images render as loading nodes in the preview...
//! assert_eq!(render_preview(&doc).pending_count(), 1);
//!
//! // ...and are left out of the export until bytes arrive
//! let doc = doc.replace_image(&AssetId::numbered(1), vec![0x89, b'P', b'N', b'G']);
//! let html = render_export(&doc, &FontChoice::Merriweather);
//! assert!(html.contains("<figcaption>A cat</figcaption>"));
//! ```
//!
//! ## Editing Sessions
//!
//! [`Studio`] wraps a [`ContentGenerator`](generate::ContentGenerator) and
//! keeps the current document, notices, and in-flight regenerations:
//!
//! ```
//! use remix::Studio;
//! use remix::generate::{GeneratedPost, MockGenerator};
//!
//! let studio = Studio::new(MockGenerator::new(GeneratedPost::default()));
//! assert!(studio.document().is_none());
//! ```

pub mod error;
pub mod generate;
pub mod markup;
pub mod model;
pub mod render;
pub mod storyboard;
pub mod studio;
pub mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use model::{AssetId, Document, VisualAsset, VisualRegistry};
pub use render::{render_export, render_preview};
pub use storyboard::Storyboard;
pub use studio::Studio;
