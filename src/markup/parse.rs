//! Line and token scanner producing the block list.
//!
//! The body is walked once, alternating between plain text segments and
//! placeholder tokens. Text is handled a line at a time:
//!
//! - `# ` lines are dropped (the title is rendered from the document)
//! - `## ` / `### ` lines become headings
//! - `- ` lines become list items; consecutive items share one list
//! - blank lines end the current paragraph or list
//! - any other line joins the current paragraph
//!
//! Image placeholders break the surrounding paragraph. Placeholders
//! inside a carousel region become slides of that region's carousel.
//! Caption and prompt-note tags attach to the image placeholder they
//! follow when only whitespace separates them.

use super::carousel::CarouselRegions;
use super::inline::parse_inline;
use super::ir::{Block, ImageRef, Inline, NoteKind};
use super::tokens::{Located, Token, asset_id_for, scan, strip_tokens};

/// Parse a body into its block list.
///
/// # Examples
///
/// ```
/// use remix::markup::{Block, parse};
///
/// let blocks = parse("## Intro\nHello\n\n[[IMAGE_1]]");
/// assert!(matches!(blocks[0], Block::Heading { level: 2, .. }));
/// assert!(matches!(blocks[1], Block::Paragraph(_)));
/// assert!(matches!(blocks[2], Block::Image(_)));
/// ```
pub fn parse(body: &str) -> Vec<Block> {
    BlockParser::new(body).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Text,
    Heading(u8),
    ListItem,
    /// A `# ` title line.
    Dropped,
}

/// Where a following caption or prompt-note tag would attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttachTarget {
    LastBlock,
    LastSlide,
}

#[derive(Default)]
struct OpenCarousel {
    slides: Vec<ImageRef>,
    /// Non-image blocks found inside the region, emitted after it.
    deferred: Vec<Block>,
}

struct BlockParser<'a> {
    body: &'a str,
    regions: CarouselRegions,
    blocks: Vec<Block>,
    // Line state
    line: Option<(LineKind, String)>,
    line_start: bool,
    line_had_token: bool,
    // Pending containers
    paragraph: Vec<Vec<Inline>>,
    list: Vec<Vec<Inline>>,
    carousel: Option<OpenCarousel>,
    attach: Option<AttachTarget>,
}

impl<'a> BlockParser<'a> {
    fn new(body: &'a str) -> Self {
        Self {
            body,
            regions: CarouselRegions::detect(body),
            blocks: Vec::new(),
            line: None,
            line_start: true,
            line_had_token: false,
            paragraph: Vec::new(),
            list: Vec::new(),
            carousel: None,
            attach: None,
        }
    }

    fn run(mut self) -> Vec<Block> {
        let body = self.body;
        let mut cursor = 0;
        for located in scan(body) {
            self.text(&body[cursor..located.offset]);
            self.token(located);
            cursor = located.end();
        }
        self.text(&body[cursor..]);

        self.end_line();
        self.flush_containers();
        self.close_carousel();
        self.blocks
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    fn text(&mut self, segment: &str) {
        let mut lines = segment.split('\n');
        if let Some(first) = lines.next() {
            self.line_text(first);
        }
        for line in lines {
            self.end_line();
            self.line_text(line);
        }
    }

    fn line_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !text.trim().is_empty() {
            self.attach = None;
        }

        match &mut self.line {
            Some((_, buf)) => buf.push_str(text),
            None if self.line_start => {
                self.line_start = false;
                self.line = Some(classify(text));
            }
            None => self.line = Some((LineKind::Text, text.to_string())),
        }
    }

    /// Finish the current line at a newline or end of input.
    fn end_line(&mut self) {
        let had_token = self.line_had_token;
        self.finish_partial_line(had_token);
        self.line_start = true;
        self.line_had_token = false;
    }

    /// Commit whatever the current line holds so far.
    ///
    /// A line with no content and no token is blank and ends the open
    /// paragraph or list.
    fn finish_partial_line(&mut self, had_token: bool) {
        match self.line.take() {
            None => {
                if !had_token {
                    self.flush_containers();
                }
            }
            Some((LineKind::Dropped, _)) => self.flush_containers(),
            Some((kind, buf)) => {
                let content = buf.trim();
                if content.is_empty() {
                    if !had_token && kind == LineKind::Text {
                        self.flush_containers();
                    }
                    return;
                }
                match kind {
                    LineKind::Text => {
                        self.flush_list();
                        self.paragraph.push(parse_inline(content));
                    }
                    LineKind::Heading(level) => {
                        self.flush_containers();
                        self.push_block(Block::Heading {
                            level,
                            content: parse_inline(content),
                        });
                    }
                    LineKind::ListItem => {
                        self.flush_paragraph();
                        self.list.push(parse_inline(content));
                    }
                    LineKind::Dropped => {}
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Tokens
    // ------------------------------------------------------------------

    fn token(&mut self, located: Located<'_>) {
        self.line_had_token = true;
        self.line_start = false;
        match located.token {
            Token::Image(digits) => {
                let image = ImageRef::new(asset_id_for(digits), located.offset);
                self.break_line();
                if self.regions.contains(located.offset)
                    && let Some(carousel) = self.carousel.as_mut()
                {
                    carousel.slides.push(image);
                    self.attach = Some(AttachTarget::LastSlide);
                } else {
                    self.push_block(Block::Image(image));
                    self.attach = Some(AttachTarget::LastBlock);
                }
            }
            // Markers that neither open nor close a region still split the
            // line, so the text around them never joins into a new token
            Token::CarouselStart => {
                self.break_line();
                if self.regions.opens_at(located.offset) && self.carousel.is_none() {
                    self.carousel = Some(OpenCarousel::default());
                    self.attach = None;
                }
            }
            Token::CarouselEnd => {
                self.break_line();
                if self.regions.closes_at(located.offset) {
                    self.close_carousel();
                }
            }
            Token::Caption(text) => self.tag(NoteKind::Caption, text),
            Token::PromptNote(text) => self.tag(NoteKind::PromptNote, text),
        }
    }

    fn tag(&mut self, kind: NoteKind, text: &str) {
        // Tag bodies are never expanded, so tokens inside them are dropped
        let text = strip_tokens(text).trim().to_string();
        if let Some(image) = self.attach_slot()
            && image_slot(image, kind).is_none()
        {
            *image_slot(image, kind) = Some(text);
            return;
        }

        self.break_line();
        self.push_block(Block::Note(kind, text));
        self.attach = None;
    }

    /// The image a caption-like tag would attach to right now.
    fn attach_slot(&mut self) -> Option<&mut ImageRef> {
        match self.attach? {
            AttachTarget::LastSlide => self.carousel.as_mut()?.slides.last_mut(),
            AttachTarget::LastBlock => {
                let blocks = match self.carousel.as_mut() {
                    Some(open) => &mut open.deferred,
                    None => &mut self.blocks,
                };
                match blocks.last_mut() {
                    Some(Block::Image(image)) => Some(image),
                    _ => None,
                }
            }
        }
    }

    /// Commit the partial line and close open containers before a
    /// block-level token. Text after the token on the same line starts a
    /// fresh paragraph.
    fn break_line(&mut self) {
        self.finish_partial_line(true);
        self.flush_containers();
    }

    // ------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------

    fn push_block(&mut self, block: Block) {
        match self.carousel.as_mut() {
            Some(open) => open.deferred.push(block),
            None => self.blocks.push(block),
        }
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.paragraph);
        let mut content = Vec::new();
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                content.push(Inline::SoftBreak);
            }
            content.extend(line);
        }
        self.push_block(Block::Paragraph(content));
    }

    fn flush_list(&mut self) {
        if self.list.is_empty() {
            return;
        }
        let items = std::mem::take(&mut self.list);
        self.push_block(Block::List(items));
    }

    fn flush_containers(&mut self) {
        self.flush_paragraph();
        self.flush_list();
    }

    fn close_carousel(&mut self) {
        if let Some(open) = self.carousel.take() {
            self.blocks.push(Block::Carousel(open.slides));
            self.blocks.extend(open.deferred);
            self.attach = None;
        }
    }
}

fn image_slot(image: &mut ImageRef, kind: NoteKind) -> &mut Option<String> {
    match kind {
        NoteKind::Caption => &mut image.caption,
        NoteKind::PromptNote => &mut image.prompt_note,
    }
}

/// Classify a line by its leading marker, returning the content after it.
fn classify(line: &str) -> (LineKind, String) {
    let trimmed = line.trim_end_matches('\r');
    if let Some(rest) = trimmed.strip_prefix("### ") {
        (LineKind::Heading(3), rest.to_string())
    } else if let Some(rest) = trimmed.strip_prefix("## ") {
        (LineKind::Heading(2), rest.to_string())
    } else if trimmed.starts_with("# ") {
        (LineKind::Dropped, String::new())
    } else if let Some(rest) = trimmed.strip_prefix("- ") {
        (LineKind::ListItem, rest.to_string())
    } else {
        (LineKind::Text, trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AssetId;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn image_ids(refs: &[ImageRef]) -> Vec<u64> {
        refs.iter()
            .map(|r| r.asset_id.as_ref().and_then(AssetId::index).unwrap_or(0))
            .collect()
    }

    #[test]
    fn test_empty_body() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n  \n").is_empty());
    }

    #[test]
    fn test_heading_and_bold_paragraph() {
        let blocks = parse("## Intro\nHello **world**.");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 2,
                    content: vec![text("Intro")]
                },
                Block::Paragraph(vec![
                    text("Hello "),
                    Inline::Strong(vec![text("world")]),
                    text("."),
                ]),
            ]
        );
    }

    #[test]
    fn test_title_line_dropped() {
        let blocks = parse("# The Title\nBody");
        assert_eq!(blocks, vec![Block::Paragraph(vec![text("Body")])]);
    }

    #[test]
    fn test_level_three_heading() {
        assert_eq!(
            parse("### Deep"),
            vec![Block::Heading {
                level: 3,
                content: vec![text("Deep")]
            }]
        );
    }

    #[test]
    fn test_deeper_heading_is_text() {
        assert_eq!(
            parse("#### Not a heading"),
            vec![Block::Paragraph(vec![text("#### Not a heading")])]
        );
    }

    #[test]
    fn test_paragraph_segmentation() {
        let blocks = parse("one\ntwo\n\nthree");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph(vec![text("one"), Inline::SoftBreak, text("two")]),
                Block::Paragraph(vec![text("three")]),
            ]
        );
    }

    #[test]
    fn test_list_grouping() {
        let blocks = parse("Intro\n- a\n- b\n\n- c\nafter");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph(vec![text("Intro")]),
                Block::List(vec![vec![text("a")], vec![text("b")]]),
                Block::List(vec![vec![text("c")]]),
                Block::Paragraph(vec![text("after")]),
            ]
        );
    }

    #[test]
    fn test_image_breaks_paragraph() {
        let blocks = parse("before [[IMAGE_1]] after");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], Block::Paragraph(vec![text("before")]));
        assert!(matches!(&blocks[1], Block::Image(r) if r.asset_id == Some(AssetId::numbered(1))));
        assert_eq!(blocks[2], Block::Paragraph(vec![text("after")]));
    }

    #[test]
    fn test_text_after_token_is_not_a_heading() {
        let blocks = parse("[[IMAGE_1]]## not heading");
        assert_eq!(blocks[1], Block::Paragraph(vec![text("## not heading")]));
    }

    #[test]
    fn test_caption_and_note_attach() {
        let blocks = parse(
            "[[IMAGE_2]]\n<figcaption>Override</figcaption>\n<prompt-note>Made with care</prompt-note>",
        );
        assert_eq!(blocks.len(), 1);
        let Block::Image(image) = &blocks[0] else {
            panic!("expected image, got {:?}", blocks[0]);
        };
        assert_eq!(image.caption.as_deref(), Some("Override"));
        assert_eq!(image.prompt_note.as_deref(), Some("Made with care"));
    }

    #[test]
    fn test_orphan_tags_become_notes() {
        let blocks = parse("Text\n<prompt-note>floating</prompt-note>");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph(vec![text("Text")]),
                Block::Note(NoteKind::PromptNote, "floating".into()),
            ]
        );
    }

    #[test]
    fn test_tokens_inside_tags_are_removed() {
        let blocks = parse(
            "[[IMAGE_1]]<prompt-note>see [[IMAGE_2]]</prompt-note>\n\n<figcaption>[[IMAGE_CAROUSEL_START]]</figcaption>",
        );
        assert_eq!(blocks.len(), 1);
        let Block::Image(image) = &blocks[0] else {
            panic!("expected image, got {:?}", blocks[0]);
        };
        assert_eq!(image.prompt_note.as_deref(), Some("see"));
        assert_eq!(image.caption.as_deref(), Some(""));
    }

    #[test]
    fn test_orphan_tag_token_is_removed() {
        let blocks = parse("Intro\n<prompt-note>[[IMAGE_CAROUSEL_START]] later</prompt-note>");
        assert_eq!(blocks[1], Block::Note(NoteKind::PromptNote, "later".into()));
    }

    #[test]
    fn test_caption_keeps_text_around_removed_token() {
        let blocks = parse("[[IMAGE_3]]<figcaption>left [[IMAGE_CAROUSEL_END]] right</figcaption>");
        assert!(matches!(&blocks[0], Block::Image(r) if r.caption.as_deref() == Some("left  right")));
    }

    #[test]
    fn test_text_between_image_and_tag_prevents_attach() {
        let blocks = parse("[[IMAGE_1]] words <figcaption>late</figcaption>");
        assert!(matches!(&blocks[0], Block::Image(r) if r.caption.is_none()));
        assert!(blocks.contains(&Block::Note(NoteKind::Caption, "late".into())));
    }

    #[test]
    fn test_second_caption_is_orphan() {
        let blocks = parse("[[IMAGE_1]]<figcaption>a</figcaption><figcaption>b</figcaption>");
        assert!(matches!(&blocks[0], Block::Image(r) if r.caption.as_deref() == Some("a")));
        assert_eq!(blocks[1], Block::Note(NoteKind::Caption, "b".into()));
    }

    #[test]
    fn test_carousel_collects_slides() {
        let blocks =
            parse("[[IMAGE_CAROUSEL_START]][[IMAGE_1]][[IMAGE_2]][[IMAGE_CAROUSEL_END]]");
        assert_eq!(blocks.len(), 1);
        let Block::Carousel(slides) = &blocks[0] else {
            panic!("expected carousel, got {:?}", blocks[0]);
        };
        assert_eq!(image_ids(slides), vec![1, 2]);
    }

    #[test]
    fn test_carousel_slide_caption() {
        let blocks = parse(
            "[[IMAGE_CAROUSEL_START]]\n[[IMAGE_1]]\n<figcaption>first</figcaption>\n[[IMAGE_CAROUSEL_END]]",
        );
        let Block::Carousel(slides) = &blocks[0] else {
            panic!("expected carousel");
        };
        assert_eq!(slides[0].caption.as_deref(), Some("first"));
    }

    #[test]
    fn test_text_inside_carousel_follows_it() {
        let blocks = parse(
            "[[IMAGE_CAROUSEL_START]]\nSwipe!\n[[IMAGE_1]]\n[[IMAGE_CAROUSEL_END]]\nAfter",
        );
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], Block::Carousel(s) if s.len() == 1));
        assert_eq!(blocks[1], Block::Paragraph(vec![text("Swipe!")]));
        assert_eq!(blocks[2], Block::Paragraph(vec![text("After")]));
    }

    #[test]
    fn test_images_outside_carousel_stay_standalone() {
        let blocks = parse(
            "[[IMAGE_1]]\n[[IMAGE_CAROUSEL_START]][[IMAGE_2]][[IMAGE_CAROUSEL_END]]\n[[IMAGE_3]]",
        );
        assert!(matches!(&blocks[0], Block::Image(_)));
        assert!(matches!(&blocks[1], Block::Carousel(s) if image_ids(s) == vec![2]));
        assert!(matches!(&blocks[2], Block::Image(_)));
    }

    #[test]
    fn test_unpaired_start_runs_to_end() {
        let blocks = parse("[[IMAGE_CAROUSEL_START]][[IMAGE_1]]\n[[IMAGE_2]]");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(&blocks[0], Block::Carousel(s) if image_ids(s) == vec![1, 2]));
    }

    #[test]
    fn test_unpaired_end_is_dropped() {
        let blocks = parse("[[IMAGE_1]][[IMAGE_CAROUSEL_END]]");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(&blocks[0], Block::Image(_)));
    }

    #[test]
    fn test_stray_marker_splits_text() {
        let blocks = parse("[[IMAGE_[[IMAGE_CAROUSEL_END]]1]]");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph(vec![text("[[IMAGE_")]),
                Block::Paragraph(vec![text("1]]")]),
            ]
        );
    }

    #[test]
    fn test_duplicate_placeholders_render_twice() {
        let blocks = parse("[[IMAGE_1]]\n\n[[IMAGE_1]]");
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| matches!(b, Block::Image(_))));
    }

    #[test]
    fn test_heading_before_image_on_same_line() {
        let blocks = parse("## Look [[IMAGE_1]]");
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 2,
                content: vec![text("Look")]
            }
        );
        assert!(matches!(&blocks[1], Block::Image(_)));
    }

    #[test]
    fn test_crlf_lines() {
        let blocks = parse("## Title\r\nBody\r\n");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 2,
                    content: vec![text("Title")]
                },
                Block::Paragraph(vec![text("Body")]),
            ]
        );
    }
}
