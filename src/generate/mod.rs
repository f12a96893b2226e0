//! Generation collaborator abstraction.
//!
//! The engine never talks to a model directly. A [`ContentGenerator`]
//! turns a [`GenerationRequest`] into a [`GeneratedPost`] and re-renders
//! single images on demand; the editing session drives it and owns the
//! resulting document.

pub mod mock;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::model::{Document, VisualAsset};
use crate::util::decode_text;

pub use mock::MockGenerator;

/// Number of in-body images a request may ask for.
pub const IMAGE_COUNT_OPTIONS: [u8; 6] = [0, 1, 3, 5, 8, 10];

/// Abstraction over post generation backends.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Produce a complete post for the request.
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedPost>;

    /// Re-render one asset from its stored prompt in the given style.
    ///
    /// Returns the new image bytes. An empty result is reported as
    /// [`Error::EmptyImage`] by the caller.
    async fn regenerate_image(&self, asset: &VisualAsset, style: &str) -> Result<Vec<u8>>;
}

/// Where the post content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "content", rename_all = "lowercase"))]
pub enum Source {
    /// An article to remix.
    Url(String),
    /// Uploaded research text.
    Text(String),
    /// A topic to research from scratch.
    Topic(String),
}

impl Source {
    /// Build a text source from uploaded file bytes.
    pub fn from_file_bytes(bytes: &[u8]) -> Self {
        Source::Text(decode_text(bytes).into_owned())
    }

    pub fn content(&self) -> &str {
        match self {
            Source::Url(s) | Source::Text(s) | Source::Topic(s) => s,
        }
    }

    /// Short name of the source kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Source::Url(_) => "url",
            Source::Text(_) => "text",
            Source::Topic(_) => "topic",
        }
    }

    /// Message shown when the source is blank.
    fn missing_message(&self) -> &'static str {
        match self {
            Source::Url(_) => "Please provide a valid URL.",
            Source::Text(_) => "Please upload a text file with content.",
            Source::Topic(_) => "Please provide a topic or instructions for research.",
        }
    }
}

/// Target length of the generated post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PostLength {
    Short,
    #[default]
    Medium,
    Long,
    Extensive,
}

impl PostLength {
    pub const ALL: [PostLength; 4] = [PostLength::Short, PostLength::Medium, PostLength::Long, PostLength::Extensive];

    /// Approximate word target.
    pub fn word_target(self) -> u32 {
        match self {
            PostLength::Short => 500,
            PostLength::Medium => 1000,
            PostLength::Long => 2000,
            PostLength::Extensive => 3000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PostLength::Short => "Short (~500 words)",
            PostLength::Medium => "Medium (~1000 words)",
            PostLength::Long => "Long (~2000 words)",
            PostLength::Extensive => "Extensive (~3000 words)",
        }
    }
}

/// Output language of the post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
    Portuguese,
    Japanese,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Portuguese,
        Language::Japanese,
    ];

    /// Name passed to the generator.
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Portuguese => "Portuguese",
            Language::Japanese => "Japanese",
        }
    }

    /// Menu label with locale.
    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English (US)",
            Language::Spanish => "Spanish (Mexico)",
            Language::French => "French (France)",
            Language::German => "German (Germany)",
            Language::Portuguese => "Portuguese (Brazil)",
            Language::Japanese => "Japanese (Japan)",
        }
    }
}

/// Art direction applied to every generated image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VisualStyle {
    #[default]
    ModernDigitalArt,
    Photorealistic,
    MinimalistVector,
    TechIsometric,
    HandDrawnSketch,
    GraphicNovel,
    /// Free-form style description.
    Custom(String),
}

impl VisualStyle {
    pub const PRESETS: [VisualStyle; 6] = [
        VisualStyle::ModernDigitalArt,
        VisualStyle::Photorealistic,
        VisualStyle::MinimalistVector,
        VisualStyle::TechIsometric,
        VisualStyle::HandDrawnSketch,
        VisualStyle::GraphicNovel,
    ];

    /// Style text passed to the generator.
    pub fn as_str(&self) -> &str {
        match self {
            VisualStyle::ModernDigitalArt => "Modern Digital Art",
            VisualStyle::Photorealistic => "Photorealistic",
            VisualStyle::MinimalistVector => "Minimalist Vector",
            VisualStyle::TechIsometric => "Tech Isometric",
            VisualStyle::HandDrawnSketch => "Hand-Drawn Sketch",
            VisualStyle::GraphicNovel => "Graphic Novel",
            VisualStyle::Custom(text) => text,
        }
    }
}

impl fmt::Display for VisualStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualStyle {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let preset = Self::PRESETS
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()));
        Ok(preset.unwrap_or_else(|| VisualStyle::Custom(s.to_string())))
    }
}

/// Everything the generator needs for one post.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationRequest {
    pub source: Source,
    /// Extra guidance; doubles as the topic for topic sources.
    pub instructions: String,
    pub length: PostLength,
    /// Number of in-body images, one of [`IMAGE_COUNT_OPTIONS`].
    pub image_count: u8,
    pub style: VisualStyle,
    pub language: Language,
}

impl GenerationRequest {
    /// Creates a request with default settings.
    pub fn new(source: Source) -> Self {
        Self {
            source,
            instructions: String::new(),
            length: PostLength::default(),
            image_count: 3,
            style: VisualStyle::default(),
            language: Language::default(),
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_length(mut self, length: PostLength) -> Self {
        self.length = length;
        self
    }

    pub fn with_image_count(mut self, count: u8) -> Self {
        self.image_count = count;
        self
    }

    pub fn with_style(mut self, style: VisualStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Check the request before it is sent.
    pub fn validate(&self) -> Result<()> {
        if self.source.content().trim().is_empty() {
            return Err(Error::InvalidRequest(self.source.missing_message().to_string()));
        }
        if !IMAGE_COUNT_OPTIONS.contains(&self.image_count) {
            return Err(Error::InvalidRequest(format!(
                "Image count must be one of {IMAGE_COUNT_OPTIONS:?}, got {}.",
                self.image_count
            )));
        }
        if let VisualStyle::Custom(text) = &self.style
            && text.trim().is_empty()
        {
            return Err(Error::InvalidRequest("Please describe the custom visual style.".into()));
        }
        Ok(())
    }
}

/// A post as returned by the generator.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratedPost {
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub subtitle: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub metadata: String,
    pub content: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visuals: Vec<VisualAsset>,
}

impl From<GeneratedPost> for Document {
    fn from(post: GeneratedPost) -> Self {
        let subtitle = post.subtitle.filter(|s| !s.trim().is_empty());
        Document {
            title: post.title,
            subtitle,
            metadata: post.metadata,
            body: post.content,
            visuals: post.visuals.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let cases = [
            (Source::Url("  ".into()), "Please provide a valid URL."),
            (Source::Text(String::new()), "Please upload a text file with content."),
            (Source::Topic("\n".into()), "Please provide a topic or instructions for research."),
        ];
        for (source, message) in cases {
            let err = GenerationRequest::new(source).validate().unwrap_err();
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn test_image_count_must_be_an_option() {
        let request = GenerationRequest::new(Source::Topic("cats".into()));
        assert!(request.clone().with_image_count(8).validate().is_ok());
        assert!(matches!(
            request.with_image_count(4).validate(),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_empty_custom_style_rejected() {
        let request = GenerationRequest::new(Source::Url("https://example.com".into()))
            .with_style(VisualStyle::Custom(" ".into()));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_from_file_bytes() {
        assert_eq!(Source::from_file_bytes(b"caf\xe9"), Source::Text("café".into()));
        assert_eq!(
            Source::from_file_bytes("naïve".as_bytes()),
            Source::Text("naïve".into())
        );
    }

    #[test]
    fn test_visual_style_parse() {
        assert_eq!("photorealistic".parse::<VisualStyle>().unwrap(), VisualStyle::Photorealistic);
        assert_eq!(VisualStyle::HandDrawnSketch.to_string(), "Hand-Drawn Sketch");
        assert_eq!(
            "Watercolor".parse::<VisualStyle>().unwrap(),
            VisualStyle::Custom("Watercolor".into())
        );
    }

    #[test]
    fn test_post_into_document() {
        let post = GeneratedPost {
            title: "T".into(),
            subtitle: Some("".into()),
            metadata: "M".into(),
            content: "[[IMAGE_1]]".into(),
            visuals: vec![VisualAsset::pending("image_1", "c", "p")],
        };
        let doc = Document::from(post);
        assert_eq!(doc.subtitle, None);
        assert_eq!(doc.body, "[[IMAGE_1]]");
        assert_eq!(doc.visuals.len(), 1);
    }

    #[test]
    fn test_length_labels() {
        assert_eq!(PostLength::default(), PostLength::Medium);
        assert_eq!(PostLength::Extensive.word_target(), 3000);
        assert_eq!(PostLength::ALL.len(), 4);
    }
}
