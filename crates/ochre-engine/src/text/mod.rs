//! Bitmap-font text support for the sprite batch.
//!
//! A [`Font`] bakes the printable ASCII range into a single glyph atlas at
//! construction time; the sprite batch turns strings into per-glyph quads
//! using the baked table, one quad per character, advance-based pen movement.

mod font;

pub use font::{Font, FontError, Glyph};
