//! Placeholder vocabulary and its lexer.
//!
//! The body text embeds five reserved forms, matched case-sensitively:
//!
//! | Form | Meaning |
//! |---|---|
//! | `[[IMAGE_<N>]]` | image placeholder for asset `image_<N>` |
//! | `[[IMAGE_CAROUSEL_START]]` | opens a carousel region |
//! | `[[IMAGE_CAROUSEL_END]]` | closes a carousel region |
//! | `<figcaption>…</figcaption>` | caption override for the preceding image |
//! | `<prompt-note>…</prompt-note>` | note shown beneath the preceding image |
//!
//! Recognition is purely lexical. There is no nesting and no escape
//! mechanism; a tag closes at the first matching closer, which may be on
//! a later line. An opener without a closer is ordinary text.

use std::borrow::Cow;

use memchr::memmem;

use crate::model::AssetId;

pub const IMAGE_TOKEN_PREFIX: &str = "[[IMAGE_";
pub const TOKEN_SUFFIX: &str = "]]";
pub const CAROUSEL_START: &str = "[[IMAGE_CAROUSEL_START]]";
pub const CAROUSEL_END: &str = "[[IMAGE_CAROUSEL_END]]";
pub const CAPTION_OPEN: &str = "<figcaption>";
pub const CAPTION_CLOSE: &str = "</figcaption>";
pub const PROMPT_NOTE_OPEN: &str = "<prompt-note>";
pub const PROMPT_NOTE_CLOSE: &str = "</prompt-note>";

/// A recognized placeholder form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `[[IMAGE_<digits>]]`, holding the digit run.
    Image(&'a str),
    CarouselStart,
    CarouselEnd,
    /// Caption tag contents.
    Caption(&'a str),
    /// Prompt-note tag contents.
    PromptNote(&'a str),
}

/// A token with its byte span in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located<'a> {
    pub offset: usize,
    pub len: usize,
    pub token: Token<'a>,
}

impl Located<'_> {
    /// Byte offset just past the token.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Map the digit run of an image token to the asset id it references.
///
/// The mapping is exact: the digits are read as an unsigned integer and
/// appended to `image_`. Runs too large for `u64` reference nothing.
///
/// # Examples
///
/// ```
/// use remix::markup::asset_id_for;
///
/// assert_eq!(asset_id_for("3").unwrap().as_str(), "image_3");
/// assert_eq!(asset_id_for("007").unwrap().as_str(), "image_7");
/// assert!(asset_id_for("99999999999999999999999").is_none());
/// ```
pub fn asset_id_for(digits: &str) -> Option<AssetId> {
    digits.parse::<u64>().ok().map(AssetId::numbered)
}

/// Scan `text` for placeholder tokens in document order.
pub fn scan(text: &str) -> Scanner<'_> {
    Scanner { text, pos: 0 }
}

/// Iterator over the tokens of a text, produced by [`scan`].
pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Located<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() {
            // Both token families start with '[' or '<'
            let rel = memchr::memchr2(b'[', b'<', &bytes[self.pos..])?;
            let offset = self.pos + rel;

            if let Some(located) = self.match_at(offset) {
                self.pos = located.end();
                return Some(located);
            }
            self.pos = offset + 1;
        }
        None
    }
}

impl<'a> Scanner<'a> {
    fn match_at(&self, offset: usize) -> Option<Located<'a>> {
        let rest = &self.text[offset..];

        if rest.starts_with(CAROUSEL_START) {
            return Some(Located {
                offset,
                len: CAROUSEL_START.len(),
                token: Token::CarouselStart,
            });
        }
        if rest.starts_with(CAROUSEL_END) {
            return Some(Located {
                offset,
                len: CAROUSEL_END.len(),
                token: Token::CarouselEnd,
            });
        }
        if let Some(after) = rest.strip_prefix(IMAGE_TOKEN_PREFIX) {
            let digits_len = after.bytes().take_while(u8::is_ascii_digit).count();
            if digits_len > 0 && after[digits_len..].starts_with(TOKEN_SUFFIX) {
                return Some(Located {
                    offset,
                    len: IMAGE_TOKEN_PREFIX.len() + digits_len + TOKEN_SUFFIX.len(),
                    token: Token::Image(&after[..digits_len]),
                });
            }
            return None;
        }
        if let Some((inner, len)) = match_tag(rest, CAPTION_OPEN, CAPTION_CLOSE) {
            return Some(Located {
                offset,
                len,
                token: Token::Caption(inner),
            });
        }
        if let Some((inner, len)) = match_tag(rest, PROMPT_NOTE_OPEN, PROMPT_NOTE_CLOSE) {
            return Some(Located {
                offset,
                len,
                token: Token::PromptNote(inner),
            });
        }
        None
    }
}

/// Match `open … close` at the start of `rest`, returning the inner text
/// and the total length.
fn match_tag<'a>(rest: &'a str, open: &str, close: &str) -> Option<(&'a str, usize)> {
    let after = rest.strip_prefix(open)?;
    let inner_len = memmem::find(after.as_bytes(), close.as_bytes())?;
    Some((&after[..inner_len], open.len() + inner_len + close.len()))
}

/// Whether `text` still contains any recognized token.
pub fn contains_tokens(text: &str) -> bool {
    scan(text).next().is_some()
}

/// Remove every recognized token from `text`, keeping the text between
/// them.
///
/// Removal repeats until nothing is left to remove, so the pieces around
/// a token cannot close up into a new one.
///
/// # Examples
///
/// ```
/// use remix::markup::strip_tokens;
///
/// assert_eq!(strip_tokens("see [[IMAGE_2]] below"), "see  below");
/// assert_eq!(strip_tokens("[[IMAGE_[[IMAGE_1]]2]]"), "");
/// assert_eq!(strip_tokens("plain"), "plain");
/// ```
pub fn strip_tokens(text: &str) -> Cow<'_, str> {
    if !contains_tokens(text) {
        return Cow::Borrowed(text);
    }

    let mut current = text.to_string();
    loop {
        let mut out = String::with_capacity(current.len());
        let mut last = 0;
        for located in scan(&current) {
            out.push_str(&current[last..located.offset]);
            last = located.end();
        }
        out.push_str(&current[last..]);

        if !contains_tokens(&out) {
            return Cow::Owned(out);
        }
        current = out;
    }
}
