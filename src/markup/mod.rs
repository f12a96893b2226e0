//! Body markup: placeholder tokens, carousel regions, and the block list.
//!
//! A body is plain text with a small line-oriented markdown subset and
//! the placeholder forms described in [`tokens`]. [`parse`] turns it into
//! a list of [`Block`]s that both the export and preview renderers walk.

mod carousel;
mod inline;
mod ir;
mod parse;
pub mod tokens;

pub use carousel::{CarouselRegion, CarouselRegions};
pub use inline::parse_inline;
pub use ir::{Accent, Block, ImageRef, Inline, NoteKind, plain_text};
pub use parse::parse;
pub use tokens::{Located, Token, asset_id_for, contains_tokens, scan, strip_tokens};
