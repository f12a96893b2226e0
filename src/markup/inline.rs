//! Inline emphasis parsing.
//!
//! Handles `**strong**`, `*emphasis*`, and the accent spans. Strong runs
//! are matched before single markers: a `*` is only read as emphasis when
//! it is not part of a `**` pair that closes later in the line. Markers
//! without a closer, and empty spans, stay literal text.

use memchr::memmem;

use super::ir::{Accent, Inline};

/// Parse one line of text into inline nodes.
///
/// # Examples
///
/// ```
/// use remix::markup::{Inline, parse_inline};
///
/// let inlines = parse_inline("Hello **world**.");
/// assert_eq!(inlines, vec![
///     Inline::Text("Hello ".into()),
///     Inline::Strong(vec![Inline::Text("world".into())]),
///     Inline::Text(".".into()),
/// ]);
/// ```
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let rest = &text[i..];

        if rest.starts_with("**")
            && let Some(close) = find_from(bytes, i + 2, b"**")
            && close > i + 2
        {
            flush_text(&mut buf, &mut out);
            out.push(Inline::Strong(parse_inline(&text[i + 2..close])));
            i = close + 2;
            continue;
        }

        if bytes[i] == b'*'
            && let Some(close) = find_single_close(bytes, i + 1)
            && close > i + 1
        {
            flush_text(&mut buf, &mut out);
            out.push(Inline::Emphasis(parse_inline(&text[i + 1..close])));
            i = close + 1;
            continue;
        }

        if bytes[i] == b'<'
            && let Some((accent, inner, len)) = match_accent(rest)
        {
            flush_text(&mut buf, &mut out);
            out.push(Inline::Accent(accent, parse_inline(inner)));
            i += len;
            continue;
        }

        match rest.chars().next() {
            Some(c) => {
                buf.push(c);
                i += c.len_utf8();
            }
            None => break,
        }
    }

    flush_text(&mut buf, &mut out);
    out
}

fn flush_text(buf: &mut String, out: &mut Vec<Inline>) {
    if !buf.is_empty() {
        out.push(Inline::Text(std::mem::take(buf)));
    }
}

fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from > bytes.len() {
        return None;
    }
    memmem::find(&bytes[from..], needle).map(|p| from + p)
}

/// Find the `*` closing an emphasis span opened just before `from`,
/// stepping over complete `**…**` pairs.
fn find_single_close(bytes: &[u8], from: usize) -> Option<usize> {
    let mut j = from;
    while j < bytes.len() {
        if bytes[j] == b'*' {
            if bytes.get(j + 1) == Some(&b'*')
                && let Some(pair_close) = find_from(bytes, j + 2, b"**")
            {
                j = pair_close + 2;
                continue;
            }
            return Some(j);
        }
        j += 1;
    }
    None
}

/// Match an accent span at the start of `rest`.
fn match_accent(rest: &str) -> Option<(Accent, &str, usize)> {
    Accent::ALL.into_iter().find_map(|accent| {
        let after = rest.strip_prefix(accent.open_tag())?;
        let inner_len = memmem::find(after.as_bytes(), accent.close_tag().as_bytes())?;
        let len = accent.open_tag().len() + inner_len + accent.close_tag().len();
        Some((accent, &after[..inner_len], len))
    })
}
