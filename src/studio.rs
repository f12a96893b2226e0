//! Editing session around one generated document.
//!
//! A [`Studio`] owns the current [`Document`] and the UI-facing state
//! around it: the selected font and visual style, which assets are being
//! regenerated, the dismissable notice, and whether the post has been
//! published. Every method takes `&self`, so a host can run several
//! regenerations at once from a shared handle.
//!
//! State sits behind a short-lived lock that is never held across a
//! collaborator call. Each mutation swaps in a new document derived from
//! whatever document is current when the result arrives, so concurrent
//! regenerations of different assets and body edits do not overwrite one
//! another. A counter bumped by every successful `generate` lets late
//! regeneration results for a replaced document be dropped.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::generate::{ContentGenerator, GenerationRequest, VisualStyle};
use crate::model::{AssetId, Document};
use crate::render::{ExportConfig, FontChoice, HtmlExporter, PreviewOptions, PreviewTree, render_preview_with};

/// Notice shown when generation fails without a message of its own.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to remix blog post.";

/// A user-visible message the host shows until it is dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// What happened to a regeneration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenerateOutcome {
    /// The new image replaced the asset's bytes.
    Applied,
    /// A regeneration for the same asset was already running.
    AlreadyRunning,
    /// The document was replaced while the request ran; the result was dropped.
    Discarded,
    /// No document is loaded or it has no asset with that id.
    NotFound,
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub font: FontChoice,
    pub style: VisualStyle,
    /// Emit the external font import in exports.
    pub include_font_import: bool,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            font: FontChoice::default(),
            style: VisualStyle::default(),
            include_font_import: true,
        }
    }
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, font: FontChoice) -> Self {
        self.font = font;
        self
    }

    pub fn with_style(mut self, style: VisualStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_font_import(mut self, include: bool) -> Self {
        self.include_font_import = include;
        self
    }
}

struct SessionState {
    document: Option<Document>,
    /// Bumped each time `generate` installs a new document.
    epoch: u64,
    regenerating: HashSet<AssetId>,
    notice: Option<Notice>,
    font: FontChoice,
    style: VisualStyle,
    include_font_import: bool,
    generating: bool,
    published: bool,
}

/// Editing session driving a [`ContentGenerator`].
pub struct Studio<G> {
    generator: G,
    state: Mutex<SessionState>,
}

impl<G: ContentGenerator> Studio<G> {
    /// Create a session with default configuration and no document.
    pub fn new(generator: G) -> Self {
        Self::with_config(generator, StudioConfig::default())
    }

    pub fn with_config(generator: G, config: StudioConfig) -> Self {
        Self {
            generator,
            state: Mutex::new(SessionState {
                document: None,
                epoch: 0,
                regenerating: HashSet::new(),
                notice: None,
                font: config.font,
                style: config.style,
                include_font_import: config.include_font_import,
                generating: false,
                published: false,
            }),
        }
    }

    /// Start the session from an existing document.
    pub fn with_document(self, document: Document) -> Self {
        self.lock().document = Some(document);
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Generation
    // ------------------------------------------------------------------

    /// Generate a new document.
    ///
    /// On success the whole document is replaced. On failure the notice is
    /// set and the previous document stays current.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<()> {
        if let Err(err) = request.validate() {
            self.lock().notice = Some(Notice::new(err.to_string()));
            return Err(err);
        }

        {
            let mut state = self.lock();
            state.notice = None;
            state.generating = true;
        }
        info!(
            source = request.source.kind(),
            length = ?request.length,
            images = request.image_count,
            "generating post"
        );

        let outcome = self.generator.generate(request).await;

        let mut state = self.lock();
        state.generating = false;
        match outcome {
            Ok(post) => {
                let document = Document::from(post);
                info!(title = %document.title, visuals = document.visuals.len(), "post generated");
                state.document = Some(document);
                state.epoch += 1;
                state.regenerating.clear();
                state.published = false;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "post generation failed");
                let message = err.to_string();
                let message = if message.trim().is_empty() {
                    DEFAULT_FAILURE_MESSAGE.to_string()
                } else {
                    message
                };
                state.notice = Some(Notice::new(message));
                Err(err)
            }
        }
    }

    /// Regenerate one asset's image from its stored prompt.
    ///
    /// Only that asset's bytes change. A failure sets the notice and
    /// leaves the image as it was.
    pub async fn regenerate_image(&self, id: &AssetId) -> Result<RegenerateOutcome> {
        let (asset, style, epoch) = {
            let mut state = self.lock();
            let Some(asset) = state.document.as_ref().and_then(|d| d.find_visual(id)).cloned() else {
                return Ok(RegenerateOutcome::NotFound);
            };
            if !state.regenerating.insert(id.clone()) {
                debug!(asset = %id, "regeneration already running");
                return Ok(RegenerateOutcome::AlreadyRunning);
            }
            (asset, state.style.as_str().to_string(), state.epoch)
        };
        debug!(asset = %id, style = %style, "regenerating image");

        let outcome = self.generator.regenerate_image(&asset, &style).await;

        let mut state = self.lock();
        if state.epoch != epoch {
            debug!(asset = %id, "discarding result for a replaced document");
            return Ok(RegenerateOutcome::Discarded);
        }
        state.regenerating.remove(id);

        let result = match outcome {
            Ok(bytes) if bytes.is_empty() => Err(Error::EmptyImage(id.to_string())),
            Ok(bytes) => {
                if let Some(document) = state.document.as_ref() {
                    state.document = Some(document.replace_image(id, bytes));
                }
                return Ok(RegenerateOutcome::Applied);
            }
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            warn!(asset = %id, error = %err, "image regeneration failed");
            state.notice = Some(Notice::new(format!("Failed to regenerate {id}: {err}")));
        }
        result
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Replace the body text. Returns false when no document is loaded.
    pub fn edit_body(&self, body: impl Into<String>) -> bool {
        let mut state = self.lock();
        match state.document.as_ref() {
            Some(document) => {
                state.document = Some(document.with_body(body));
                true
            }
            None => false,
        }
    }

    /// Swap in user-supplied bytes for one asset. Returns false when the
    /// asset does not exist.
    pub fn replace_image(&self, id: &AssetId, bytes: impl Into<Vec<u8>>) -> bool {
        let mut state = self.lock();
        let Some(document) = state.document.as_ref() else {
            return false;
        };
        if document.find_visual(id).is_none() {
            return false;
        }
        state.document = Some(document.replace_image(id, bytes));
        true
    }

    pub fn set_font(&self, font: FontChoice) {
        self.lock().font = font;
    }

    pub fn font(&self) -> FontChoice {
        self.lock().font.clone()
    }

    pub fn set_style(&self, style: VisualStyle) {
        self.lock().style = style;
    }

    pub fn style(&self) -> VisualStyle {
        self.lock().style.clone()
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Snapshot of the current document.
    pub fn document(&self) -> Option<Document> {
        self.lock().document.clone()
    }

    /// Preview of the current document with live busy flags.
    pub fn preview(&self) -> Option<PreviewTree> {
        let state = self.lock();
        let document = state.document.as_ref()?;
        let options = PreviewOptions::new()
            .with_font(state.font.clone())
            .with_regenerating(state.regenerating.iter().cloned());
        Some(render_preview_with(document, &options))
    }

    /// Export markup for the current document.
    pub fn export(&self) -> Option<String> {
        let state = self.lock();
        let document = state.document.as_ref()?;
        let config = ExportConfig::new()
            .with_font(state.font.clone())
            .with_font_import(state.include_font_import);
        Some(HtmlExporter::with_config(config).render(document))
    }

    pub fn is_generating(&self) -> bool {
        self.lock().generating
    }

    pub fn is_regenerating(&self, id: &AssetId) -> bool {
        self.lock().regenerating.contains(id)
    }

    pub fn notice(&self) -> Option<Notice> {
        self.lock().notice.clone()
    }

    pub fn dismiss_notice(&self) {
        self.lock().notice = None;
    }

    // ------------------------------------------------------------------
    // Publishing
    // ------------------------------------------------------------------

    /// Hand the current document, edits included, to the host.
    pub fn publish(&self) -> Option<Document> {
        let mut state = self.lock();
        let document = state.document.clone()?;
        state.published = true;
        info!(title = %document.title, "post published");
        Some(document)
    }

    pub fn is_published(&self) -> bool {
        self.lock().published
    }
}
