//! Mock generator for testing and demos.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::{ContentGenerator, GeneratedPost, GenerationRequest};
use crate::error::{Error, Result};
use crate::model::VisualAsset;
use crate::storyboard::{SceneGenerator, SceneRequest};

/// A recorded collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Generate(GenerationRequest),
    /// Asset id and style.
    RegenerateImage(String, String),
    /// Scene text.
    Scene(String),
}

/// Generator that returns canned responses and records every call.
///
/// Clones share the same state, so a test can keep one handle for
/// inspection while the session owns another.
///
/// # Examples
///
/// ```
/// use remix::generate::{GeneratedPost, MockGenerator};
///
/// let mock = MockGenerator::new(GeneratedPost {
///     title: "Canned".into(),
///     content: "Hello".into(),
///     ..Default::default()
/// });
/// assert!(mock.calls().is_empty());
/// ```
#[derive(Clone)]
pub struct MockGenerator {
    state: Arc<Mutex<MockState>>,
}

struct MockState {
    post: GeneratedPost,
    image: Vec<u8>,
    fail_generate: Option<String>,
    fail_images: Option<String>,
    empty_scenes: bool,
    calls: Vec<MockCall>,
}

impl MockGenerator {
    /// Creates a mock returning `post` from every `generate` call.
    pub fn new(post: GeneratedPost) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                post,
                image: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
                fail_generate: None,
                fail_images: None,
                empty_scenes: false,
                calls: Vec::new(),
            })),
        }
    }

    /// Bytes returned by image and scene calls.
    pub fn with_image(self, image: impl Into<Vec<u8>>) -> Self {
        self.lock().image = image.into();
        self
    }

    /// Make `generate` fail with `message`.
    pub fn failing_generate(self, message: impl Into<String>) -> Self {
        self.lock().fail_generate = Some(message.into());
        self
    }

    /// Make image and scene calls fail with `message`.
    pub fn failing_images(self, message: impl Into<String>) -> Self {
        self.lock().fail_images = Some(message.into());
        self
    }

    /// Make scene calls answer without an image.
    pub fn empty_scenes(self) -> Self {
        self.lock().empty_scenes = true;
        self
    }

    /// Replace the canned post.
    pub fn set_post(&self, post: GeneratedPost) {
        self.lock().post = post;
    }

    /// Change the bytes returned by later image calls.
    pub fn set_image(&self, image: impl Into<Vec<u8>>) {
        self.lock().image = image.into();
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedPost> {
        let mut state = self.lock();
        state.calls.push(MockCall::Generate(request.clone()));
        match &state.fail_generate {
            Some(message) => Err(Error::generation(message.clone())),
            None => Ok(state.post.clone()),
        }
    }

    async fn regenerate_image(&self, asset: &VisualAsset, style: &str) -> Result<Vec<u8>> {
        let mut state = self.lock();
        state
            .calls
            .push(MockCall::RegenerateImage(asset.id.to_string(), style.to_string()));
        match &state.fail_images {
            Some(message) => Err(Error::generation(message.clone())),
            None => Ok(state.image.clone()),
        }
    }
}

#[async_trait]
impl SceneGenerator for MockGenerator {
    async fn generate_scene(&self, request: &SceneRequest) -> Result<Option<Vec<u8>>> {
        let mut state = self.lock();
        state.calls.push(MockCall::Scene(request.text.clone()));
        if let Some(message) = &state.fail_images {
            return Err(Error::generation(message.clone()));
        }
        if state.empty_scenes {
            return Ok(None);
        }
        Ok(Some(state.image.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::Source;

    fn post() -> GeneratedPost {
        GeneratedPost {
            title: "Canned".into(),
            content: "Body".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_generate_records_call() {
        let mock = MockGenerator::new(post());
        let request = GenerationRequest::new(Source::Topic("cats".into()));

        let result = mock.generate(&request).await.unwrap();

        assert_eq!(result.title, "Canned");
        assert_eq!(mock.calls(), vec![MockCall::Generate(request)]);
    }

    #[tokio::test]
    async fn test_failing_generate() {
        let mock = MockGenerator::new(post()).failing_generate("quota exceeded");
        let request = GenerationRequest::new(Source::Topic("cats".into()));

        let err = mock.generate(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mock = MockGenerator::new(post()).with_image(vec![7]);
        let handle = mock.clone();
        let asset = VisualAsset::pending("image_1", "c", "p");

        let bytes = mock.regenerate_image(&asset, "Photorealistic").await.unwrap();

        assert_eq!(bytes, vec![7]);
        assert_eq!(
            handle.calls(),
            vec![MockCall::RegenerateImage("image_1".into(), "Photorealistic".into())]
        );
    }

    #[tokio::test]
    async fn test_empty_scenes() {
        let mock = MockGenerator::new(post()).empty_scenes();
        let request = SceneRequest {
            text: "A street".into(),
            context: String::new(),
            style: "Vintage Film".into(),
            style_reference: None,
            text_overlay: "No Text (Clean)".into(),
        };
        assert_eq!(mock.generate_scene(&request).await.unwrap(), None);
    }
}
