//! Script storyboard: one generated still per script segment.
//!
//! A [`Storyboard`] holds an ordered list of [`Scene`]s plus the settings
//! shared by every request (global script context, style, optional style
//! reference image, and text-overlay mode). Scenes are generated one at a
//! time through a [`SceneGenerator`].
//!
//! [`Storyboard::generate_all`] submits requests strictly in sequence,
//! awaiting each before starting the next. Taking `&mut self` rules out
//! a second concurrent bulk run on the same board.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::Result;

/// Scene style presets.
pub const SCENE_STYLES: [&str; 7] = [
    "Cinematic Realistic",
    "Dark Thriller / Mystery",
    "Bright & Cheerful Vlog",
    "Futuristic Sci-Fi",
    "Hand-Drawn Animation",
    "Minimalist Vector",
    "Vintage Film",
];

/// Text-overlay presets.
pub const TEXT_OVERLAYS: [&str; 4] = [
    "No Text (Clean)",
    "Cinematic Label",
    "Bold Title Overlay",
    "Subtle Context Text",
];

/// Generation state of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SceneStatus {
    #[default]
    Idle,
    Generating,
    Complete,
    Error,
}

/// One script segment and its image.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scene {
    pub id: String,
    pub text: String,
    pub image_data: Option<Vec<u8>>,
    pub status: SceneStatus,
}

impl Scene {
    fn new(id: String) -> Self {
        Self {
            id,
            text: String::new(),
            image_data: None,
            status: SceneStatus::Idle,
        }
    }

    /// Whether a bulk run should pick this scene up.
    pub fn is_bulk_target(&self) -> bool {
        !self.text.trim().is_empty() && matches!(self.status, SceneStatus::Idle | SceneStatus::Error)
    }
}

/// Everything the generator receives for one scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneRequest {
    pub text: String,
    /// Full script, for character and setting consistency.
    pub context: String,
    pub style: String,
    /// Image whose look the result should follow.
    pub style_reference: Option<Vec<u8>>,
    pub text_overlay: String,
}

/// Produces one still per scene.
#[async_trait]
pub trait SceneGenerator: Send + Sync {
    /// Generate an image for the scene. `Ok(None)` means the collaborator
    /// answered without an image.
    async fn generate_scene(&self, request: &SceneRequest) -> Result<Option<Vec<u8>>>;
}

/// Outcome of a bulk run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    /// Scene ids that received an image, in request order.
    pub completed: Vec<String>,
    /// Scene ids that ended in the error state, in request order.
    pub failed: Vec<String>,
}

impl BulkReport {
    /// Total requests issued.
    pub fn attempted(&self) -> usize {
        self.completed.len() + self.failed.len()
    }
}

/// Ordered scenes and shared generation settings.
#[derive(Debug, Clone)]
pub struct Storyboard {
    scenes: Vec<Scene>,
    next_id: u64,
    pub context: String,
    pub style: String,
    pub style_reference: Option<Vec<u8>>,
    pub text_overlay: String,
}

impl Default for Storyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Storyboard {
    /// A board with a single empty scene.
    pub fn new() -> Self {
        Self {
            scenes: vec![Scene::new("1".to_string())],
            next_id: 2,
            context: String::new(),
            style: SCENE_STYLES[0].to_string(),
            style_reference: None,
            text_overlay: TEXT_OVERLAYS[0].to_string(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_style_reference(mut self, image: impl Into<Vec<u8>>) -> Self {
        self.style_reference = Some(image.into());
        self
    }

    pub fn with_text_overlay(mut self, overlay: impl Into<String>) -> Self {
        self.text_overlay = overlay.into();
        self
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Append an empty scene and return its id.
    pub fn add_scene(&mut self) -> String {
        let id = self.next_id.to_string();
        self.next_id += 1;
        self.scenes.push(Scene::new(id.clone()));
        id
    }

    /// Remove a scene. The last remaining scene is never removed.
    pub fn remove_scene(&mut self, id: &str) -> bool {
        if self.scenes.len() <= 1 {
            return false;
        }
        let before = self.scenes.len();
        self.scenes.retain(|s| s.id != id);
        self.scenes.len() != before
    }

    pub fn update_text(&mut self, id: &str, text: impl Into<String>) -> bool {
        match self.scenes.iter_mut().find(|s| s.id == id) {
            Some(scene) => {
                scene.text = text.into();
                true
            }
            None => false,
        }
    }

    fn request_for(&self, scene: &Scene) -> SceneRequest {
        SceneRequest {
            text: scene.text.clone(),
            context: self.context.clone(),
            style: self.style.clone(),
            style_reference: self.style_reference.clone(),
            text_overlay: self.text_overlay.clone(),
        }
    }

    /// Generate one scene's image.
    ///
    /// Scenes with blank text are skipped and `None` is returned. Otherwise
    /// the scene passes through `Generating` and ends `Complete` or `Error`,
    /// and its final status is returned.
    pub async fn generate_scene<G>(&mut self, generator: &G, id: &str) -> Option<SceneStatus>
    where
        G: SceneGenerator + ?Sized,
    {
        let index = self.scenes.iter().position(|s| s.id == id)?;
        if self.scenes[index].text.trim().is_empty() {
            return None;
        }

        let request = self.request_for(&self.scenes[index]);
        self.scenes[index].status = SceneStatus::Generating;
        debug!(scene = id, "generating scene");

        let outcome = generator.generate_scene(&request).await;

        let scene = &mut self.scenes[index];
        match outcome {
            Ok(Some(data)) if !data.is_empty() => {
                scene.image_data = Some(data);
                scene.status = SceneStatus::Complete;
            }
            Ok(_) => {
                warn!(scene = id, "collaborator returned no image");
                scene.status = SceneStatus::Error;
            }
            Err(err) => {
                warn!(scene = id, error = %err, "scene generation failed");
                scene.status = SceneStatus::Error;
            }
        }
        Some(scene.status)
    }

    /// Generate every scene with text that is idle or failed, one at a time.
    pub async fn generate_all<G>(&mut self, generator: &G) -> BulkReport
    where
        G: SceneGenerator + ?Sized,
    {
        let targets: Vec<String> = self
            .scenes
            .iter()
            .filter(|s| s.is_bulk_target())
            .map(|s| s.id.clone())
            .collect();
        info!(count = targets.len(), "starting bulk scene generation");

        let mut report = BulkReport::default();
        for id in targets {
            match self.generate_scene(generator, &id).await {
                Some(SceneStatus::Complete) => report.completed.push(id),
                Some(_) => report.failed.push(id),
                None => {}
            }
        }

        info!(
            completed = report.completed.len(),
            failed = report.failed.len(),
            "bulk scene generation finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_has_one_scene() {
        let board = Storyboard::new();
        assert_eq!(board.scenes().len(), 1);
        assert_eq!(board.scenes()[0].status, SceneStatus::Idle);
        assert_eq!(board.style, "Cinematic Realistic");
    }

    #[test]
    fn test_remove_keeps_last_scene() {
        let mut board = Storyboard::new();
        assert!(!board.remove_scene("1"));
        let id = board.add_scene();
        assert!(board.remove_scene("1"));
        assert_eq!(board.scenes().len(), 1);
        assert_eq!(board.scenes()[0].id, id);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut board = Storyboard::new();
        let second = board.add_scene();
        board.remove_scene("1");
        let third = board.add_scene();
        assert_ne!(second, third);
    }

    #[test]
    fn test_update_text() {
        let mut board = Storyboard::new();
        assert!(board.update_text("1", "A rainy street"));
        assert!(!board.update_text("9", "nope"));
        assert_eq!(board.scene("1").unwrap().text, "A rainy street");
    }

    #[test]
    fn test_bulk_target_filter() {
        let mut scene = Scene::new("1".into());
        assert!(!scene.is_bulk_target());
        scene.text = "x".into();
        assert!(scene.is_bulk_target());
        scene.status = SceneStatus::Complete;
        assert!(!scene.is_bulk_target());
        scene.status = SceneStatus::Error;
        assert!(scene.is_bulk_target());
    }
}
