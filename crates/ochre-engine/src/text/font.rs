use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::texture::Texture;

/// Atlas dimensions in pixels. Plenty for the ASCII range up to ~96 px.
const ATLAS_SIZE: u32 = 1024;

/// Pixels between glyphs in the atlas.
const GLYPH_PADDING: u32 = 1;

/// Error returned by [`Font::from_bytes`].
#[derive(Debug, Clone)]
pub struct FontError(pub String);

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font error: {}", self.0)
    }
}

impl std::error::Error for FontError {}

/// A baked glyph: atlas UV rectangle plus layout metrics.
///
/// Metrics are in logical pixels with a bottom-left origin: `offset_*` place
/// the bitmap's bottom-left corner relative to the pen position on the
/// baseline, `advance` moves the pen to the next glyph.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Glyph {
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub advance: f32,
}

impl Glyph {
    /// Returns the quad corners `(min, max)` for this glyph at a pen
    /// position, bottom-left origin, +Y up.
    #[inline]
    pub fn quad(&self, pen_x: f32, baseline_y: f32) -> ([f32; 2], [f32; 2]) {
        let x0 = pen_x + self.offset_x;
        let y0 = baseline_y + self.offset_y;
        ([x0, y0], [x0 + self.width, y0 + self.height])
    }

    /// True when the glyph has no bitmap (e.g. space) and only advances the
    /// pen.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A font baked to a glyph atlas at a fixed pixel size.
///
/// The atlas is RGBA with white color channels and glyph coverage in alpha,
/// so glyph quads flow through the ordinary sprite pipeline and tint with the
/// batch modulate color like any other sprite.
pub struct Font {
    atlas: Arc<Texture>,
    glyphs: HashMap<char, Glyph>,
    size: f32,
    line_height: f32,
}

impl Font {
    /// Parses a TrueType/OpenType font and bakes the printable ASCII range
    /// at `size` pixels.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        size: f32,
    ) -> Result<Self, FontError> {
        let baked = bake(bytes, size)?;
        let atlas = Arc::new(Texture::from_rgba(
            device,
            queue,
            ATLAS_SIZE,
            ATLAS_SIZE,
            &baked.pixels,
        ));
        Ok(Self {
            atlas,
            glyphs: baked.glyphs,
            size,
            line_height: baked.line_height,
        })
    }

    /// Test-only font over a hand-built glyph table, with no GPU atlas.
    #[cfg(test)]
    pub(crate) fn from_glyphs(glyphs: HashMap<char, Glyph>, size: f32, line_height: f32) -> Self {
        Self {
            atlas: Arc::new(Texture::headless(ATLAS_SIZE, ATLAS_SIZE)),
            glyphs,
            size,
            line_height,
        }
    }

    #[inline]
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    #[inline]
    pub fn atlas(&self) -> &Arc<Texture> {
        &self.atlas
    }

    /// The pixel size the atlas was baked at.
    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Measures a single-line string: advance-summed width and line height.
    pub fn measure(&self, text: &str) -> (f32, f32) {
        let width = text
            .chars()
            .filter_map(|c| self.glyphs.get(&c))
            .map(|g| g.advance)
            .sum();
        (width, self.line_height)
    }
}

struct Baked {
    pixels: Vec<u8>,
    glyphs: HashMap<char, Glyph>,
    line_height: f32,
}

/// Rasterizes the printable ASCII range into an RGBA atlas (white RGB,
/// coverage in alpha) with simple row-shelf packing.
fn bake(bytes: &[u8], size: f32) -> Result<Baked, FontError> {
    let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
        .map_err(|e| FontError(e.to_string()))?;

    let line_height = font
        .horizontal_line_metrics(size)
        .map(|m| m.new_line_size)
        .unwrap_or(size * 1.2);

    let mut pixels = vec![0u8; (ATLAS_SIZE * ATLAS_SIZE * 4) as usize];
    let mut glyphs = HashMap::new();

    let mut cursor_x = GLYPH_PADDING;
    let mut cursor_y = GLYPH_PADDING;
    let mut row_height = 0u32;

    for c in ' '..='~' {
        let (metrics, coverage) = font.rasterize(c, size);
        let w = metrics.width as u32;
        let h = metrics.height as u32;

        if cursor_x + w + GLYPH_PADDING > ATLAS_SIZE {
            cursor_x = GLYPH_PADDING;
            cursor_y += row_height + GLYPH_PADDING;
            row_height = 0;
        }
        if cursor_y + h + GLYPH_PADDING > ATLAS_SIZE {
            log::warn!("font atlas full, skipping {c:?} and later glyphs");
            break;
        }

        for row in 0..h {
            for col in 0..w {
                let cov = coverage[(row * w + col) as usize];
                let px = ((cursor_y + row) * ATLAS_SIZE + cursor_x + col) as usize * 4;
                pixels[px..px + 4].copy_from_slice(&[0xff, 0xff, 0xff, cov]);
            }
        }

        let atlas = ATLAS_SIZE as f32;
        glyphs.insert(
            c,
            Glyph {
                uv_min: [cursor_x as f32 / atlas, cursor_y as f32 / atlas],
                uv_max: [(cursor_x + w) as f32 / atlas, (cursor_y + h) as f32 / atlas],
                width: metrics.width as f32,
                height: metrics.height as f32,
                offset_x: metrics.xmin as f32,
                offset_y: metrics.ymin as f32,
                advance: metrics.advance_width,
            },
        );

        cursor_x += w + GLYPH_PADDING;
        row_height = row_height.max(h);
    }

    Ok(Baked {
        pixels,
        glyphs,
        line_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_font() -> Font {
        let mut glyphs = HashMap::new();
        glyphs.insert(
            'a',
            Glyph {
                uv_min: [0.0, 0.0],
                uv_max: [0.5, 0.5],
                width: 8.0,
                height: 10.0,
                offset_x: 1.0,
                offset_y: -2.0,
                advance: 9.0,
            },
        );
        glyphs.insert(
            ' ',
            Glyph {
                uv_min: [0.0, 0.0],
                uv_max: [0.0, 0.0],
                width: 0.0,
                height: 0.0,
                offset_x: 0.0,
                offset_y: 0.0,
                advance: 4.0,
            },
        );
        Font::from_glyphs(glyphs, 16.0, 20.0)
    }

    #[test]
    fn glyph_quad_offsets_from_pen() {
        let font = test_font();
        let g = font.glyph('a').unwrap();
        let (min, max) = g.quad(100.0, 50.0);
        assert_eq!(min, [101.0, 48.0]);
        assert_eq!(max, [109.0, 58.0]);
    }

    #[test]
    fn space_is_empty_but_advances() {
        let font = test_font();
        let g = font.glyph(' ').unwrap();
        assert!(g.is_empty());
        assert_eq!(g.advance, 4.0);
    }

    #[test]
    fn measure_sums_advances_and_skips_unknown() {
        let font = test_font();
        let (w, h) = font.measure("a a\u{1F980}");
        assert_eq!(w, 9.0 + 4.0 + 9.0);
        assert_eq!(h, 20.0);
    }
}
