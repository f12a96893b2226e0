//! Byte-level helpers shared by the renderers and the generation layer.

use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

// ============================================================================
// Text Decoding
// ============================================================================

/// Decode uploaded text bytes to a string.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. Falls back to Windows-1252 (what most "plain text" exports from
///    word processors turn out to be when they are not UTF-8)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8
/// without a BOM.
///
/// # Examples
///
/// ```
/// use remix::util::decode_text;
///
/// assert_eq!(decode_text("Hello, World!".as_bytes()), "Hello, World!");
/// assert_eq!(decode_text(b"caf\xe9"), "café");
/// ```
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

// ============================================================================
// Image Format Detection
// ============================================================================

/// Image formats the generation service and user uploads produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Svg,
}

impl ImageFormat {
    /// Get the MIME type string for this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

/// Detect an image format from its magic bytes.
///
/// Returns `None` for anything unrecognized; callers treat that as PNG,
/// which is what the generation service emits.
pub fn detect_image_format(data: &[u8]) -> Option<ImageFormat> {
    if data.len() >= 3 && data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return Some(ImageFormat::Jpeg);
    }
    if data.len() >= 4 && data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47
    {
        return Some(ImageFormat::Png);
    }
    if data.len() >= 3 && data[0] == 0x47 && data[1] == 0x49 && data[2] == 0x46 {
        return Some(ImageFormat::Gif);
    }
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Some(ImageFormat::WebP);
    }

    let head = &data[..data.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
        return Some(ImageFormat::Svg);
    }

    None
}

/// Encode image bytes as a `data:` URI suitable for an `img` `src`.
///
/// # Examples
///
/// ```
/// use remix::util::data_uri;
///
/// assert_eq!(data_uri(b"abc"), "data:image/png;base64,YWJj");
/// ```
pub fn data_uri(data: &[u8]) -> String {
    let mime = detect_image_format(data)
        .unwrap_or(ImageFormat::Png)
        .mime_type();
    format!("data:{};base64,{}", mime, STANDARD.encode(data))
}

/// Read `(width, height)` from the header of a PNG or JPEG image.
///
/// Other formats, and headers cut short, give `None`.
pub fn extract_image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    match detect_image_format(data)? {
        ImageFormat::Png => png_dimensions(data),
        ImageFormat::Jpeg => jpeg_dimensions(data),
        _ => None,
    }
}

/// Width and height from the IHDR chunk, which must come first.
fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let ihdr = data.get(8..24)?;
    if &ihdr[4..8] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(ihdr[8..12].try_into().ok()?);
    let height = u32::from_be_bytes(ihdr[12..16].try_into().ok()?);
    Some((width, height))
}

/// Walk the marker segments up to the first start-of-frame.
fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 2;
    loop {
        // Markers may be preceded by any number of 0xFF fill bytes
        while data.get(pos..pos + 2) == Some(&[0xFF, 0xFF][..]) {
            pos += 1;
        }
        let Some(&[0xFF, marker]) = data.get(pos..pos + 2) else {
            return None;
        };
        pos += 2;

        match marker {
            // Standalone markers carry no length
            0x01 | 0xD0..=0xD7 => continue,
            // End of image or start of scan before any frame header
            0xD9 | 0xDA => return None,
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                let frame = data.get(pos..pos + 7)?;
                let height = u16::from_be_bytes([frame[3], frame[4]]);
                let width = u16::from_be_bytes([frame[5], frame[6]]);
                return Some((u32::from(width), u32::from(height)));
            }
            _ => {
                let length = data.get(pos..pos + 2)?;
                let length = usize::from(u16::from_be_bytes([length[0], length[1]]));
                if length < 2 {
                    return None;
                }
                pos += length;
            }
        }
    }
}
