use std::sync::Arc;

use glam::{Mat4, Vec4};

use crate::color::Color;
use crate::render::Viewport;
use crate::text::Font;
use crate::texture::{Texture, TextureId};

use super::camera::Camera2D;

/// Number of texture slots available to one batch segment. Matches the
/// binding-array length in the sprite shader.
pub const TEXTURE_SLOTS: usize = 16;

/// Vertex count of the circle fan (1 center + 32 rim vertices).
const CIRCLE_VERTICES: u32 = 33;
const CIRCLE_SEGMENTS: u32 = 32;
const CIRCLE_INDICES: u32 = CIRCLE_SEGMENTS * 3;

/// Sprite batch limits.
#[derive(Debug, Clone)]
pub struct SpriteBatchConfig {
    /// Maximum sprites (quads) per draw segment. A primitive that would
    /// exceed this seals the current segment and starts a new one.
    pub max_sprites: u32,
}

impl Default for SpriteBatchConfig {
    fn default() -> Self {
        Self { max_sprites: 512 }
    }
}

/// Sprite vertex: xy position, depth, texture slot packed into `position.w`,
/// straight-alpha color, texcoord. Locations 0/1/2 in the sprite shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
    pub texcoord: [f32; 2],
}

/// A texture occupying one slot of a segment. `texture == None` is the
/// built-in white texture.
pub(crate) struct BoundTexture {
    pub id: TextureId,
    pub texture: Option<Arc<Texture>>,
}

/// A sealed run of quads sharing one texture-slot stack. Each segment costs
/// exactly one indexed draw call at submission.
pub(crate) struct Segment {
    pub index_start: u32,
    pub index_count: u32,
    pub textures: Vec<BoundTexture>,
}

/// Begin/end-scoped accumulator for 2D sprites, shapes and text.
///
/// All primitives append in strict call order; a capacity or texture-slot
/// overflow seals the current segment ("flush") without leaving the
/// begin/end scope, so overflow never reorders or drops sprites. Draw calls
/// outside an open batch are rejected operations: logged once and discarded
/// without touching any cursor.
///
/// Vertices/indices accumulate for the whole frame and are uploaded once by
/// the submitter, which then draws each sealed segment separately.
pub struct SpriteBatch {
    max_vertices: u32,
    max_indices: u32,

    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    segments: Vec<Segment>,

    slots: Vec<BoundTexture>,
    segment_index_start: u32,
    segment_vertex_count: u32,
    segment_index_count: u32,

    begun: bool,
    warned_outside_begin: bool,
    projection: Mat4,

    modulate: Color,
    uv_rect: [f32; 4],
    flip_h: bool,
    flip_v: bool,
}

impl SpriteBatch {
    pub fn new(config: SpriteBatchConfig) -> Self {
        Self {
            max_vertices: config.max_sprites * 4,
            max_indices: config.max_sprites * 6,
            vertices: Vec::new(),
            indices: Vec::new(),
            segments: Vec::new(),
            slots: Vec::new(),
            segment_index_start: 0,
            segment_vertex_count: 0,
            segment_index_count: 0,
            begun: false,
            warned_outside_begin: false,
            projection: Mat4::IDENTITY,
            modulate: Color::WHITE,
            uv_rect: [0.0, 0.0, 1.0, 1.0],
            flip_h: false,
            flip_v: false,
        }
    }

    // ── batch scope ───────────────────────────────────────────────────────

    /// Opens the batch: resets cursors and sealed segments, computes the
    /// camera projection, and restores the modulate color to white. The UV
    /// rect and flip state persist across batches.
    pub fn begin(&mut self, camera: &Camera2D, viewport: Viewport) {
        if self.begun {
            log::warn!("sprite batch: begin while a batch is already open; restarting");
        }

        self.vertices.clear();
        self.indices.clear();
        self.segments.clear();
        self.slots.clear();
        self.segment_index_start = 0;
        self.segment_vertex_count = 0;
        self.segment_index_count = 0;
        self.begun = true;
        self.warned_outside_begin = false;
        self.projection = camera.projection(viewport);
        self.modulate = Color::WHITE;
    }

    /// Closes the batch, sealing the final segment. A no-op without an open
    /// batch.
    pub fn end(&mut self) {
        if !self.begun {
            return;
        }
        self.flush();
        self.begun = false;
    }

    // ── draw state ────────────────────────────────────────────────────────

    /// Sets the tint color applied to subsequent primitives.
    pub fn set_modulate(&mut self, color: Color) {
        self.modulate = color;
    }

    pub fn modulate(&self) -> Color {
        self.modulate
    }

    /// Sets the texture sub-rectangle used by subsequent sprites.
    pub fn set_uv_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.uv_rect = [x, y, w, h];
    }

    /// Mirrors subsequent sprites on the horizontal and/or vertical axis.
    pub fn set_flip(&mut self, horizontal: bool, vertical: bool) {
        self.flip_h = horizontal;
        self.flip_v = vertical;
    }

    // ── primitives ────────────────────────────────────────────────────────

    /// Draws a sprite at its natural texture size, centered on `(x, y)`.
    /// `None` draws the built-in white texture.
    pub fn draw_sprite(&mut self, texture: Option<&Arc<Texture>>, x: f32, y: f32) {
        self.draw_sprite_ext(texture, x, y, 0.0, 0.0, 0.0, 0.0, 0.5, 0.5);
    }

    /// Draws a sprite with full control.
    ///
    /// `width`/`height` of 0 use the texture's natural size. `origin` is the
    /// pivot inside the quad in `[0, 1]`; rotation is radians around it.
    /// Depth is `[0, 100]`, lower is closer.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_sprite_ext(
        &mut self,
        texture: Option<&Arc<Texture>>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rotation: f32,
        depth: f32,
        origin_x: f32,
        origin_y: f32,
    ) {
        if !self.guard("draw_sprite") {
            return;
        }
        self.ensure_segment_capacity(4, 6);
        let slot = self.resolve_slot(texture);

        let (width, height) = self.effective_size(texture, width, height);
        let corners = quad_corners(width, height, origin_x, origin_y, rotation);
        self.push_quad_at(
            [
                [x + corners[0][0], y + corners[0][1]],
                [x + corners[1][0], y + corners[1][1]],
                [x + corners[2][0], y + corners[2][1]],
                [x + corners[3][0], y + corners[3][1]],
            ],
            depth,
            slot,
        );
    }

    /// Draws a sprite whose quad corners are mapped through a 4×4 transform
    /// (only the XY part of the result is used).
    #[allow(clippy::too_many_arguments)]
    pub fn draw_sprite_transform(
        &mut self,
        texture: Option<&Arc<Texture>>,
        transform: &Mat4,
        width: f32,
        height: f32,
        depth: f32,
        origin_x: f32,
        origin_y: f32,
    ) {
        if !self.guard("draw_sprite_transform") {
            return;
        }
        self.ensure_segment_capacity(4, 6);
        let slot = self.resolve_slot(texture);

        let (width, height) = self.effective_size(texture, width, height);
        let corners = quad_corners(width, height, origin_x, origin_y, 0.0);
        let mapped = corners.map(|c| {
            let p = *transform * Vec4::new(c[0], c[1], 0.0, 1.0);
            [p.x, p.y]
        });
        self.push_quad_at(mapped, depth, slot);
    }

    /// Draws an untextured box centered on `(x, y)`.
    pub fn draw_box(&mut self, x: f32, y: f32, width: f32, height: f32, rotation: f32, depth: f32) {
        self.draw_sprite_ext(None, x, y, width, height, rotation, depth, 0.5, 0.5);
    }

    /// Draws an untextured circle as a 32-segment fan.
    pub fn draw_circle(&mut self, x: f32, y: f32, radius: f32, depth: f32) {
        if !self.guard("draw_circle") {
            return;
        }
        self.ensure_segment_capacity(CIRCLE_VERTICES, CIRCLE_INDICES);
        let slot = self.resolve_slot(None);

        let base = self.vertices.len() as u32;
        self.push_vertex_uv(x, y, depth, slot, 0.5, 0.5);

        let step = std::f32::consts::TAU / CIRCLE_SEGMENTS as f32;
        for i in 0..CIRCLE_SEGMENTS {
            let (s, c) = (i as f32 * step).sin_cos();
            self.push_vertex_uv(s * radius + x, c * radius + y, depth, slot, 0.5, 0.5);

            let rim = base + 1 + i;
            let next_rim = base + 1 + (i + 1) % CIRCLE_SEGMENTS;
            self.push_index(base);
            self.push_index(next_rim);
            self.push_index(rim);
        }
    }

    /// Draws a line of the given thickness as a rotated quad anchored at its
    /// start point.
    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32, depth: f32) {
        if !self.guard("draw_line") {
            return;
        }

        let dx = x2 - x1;
        let dy = y2 - y1;
        let length = (dx * dx + dy * dy).sqrt();
        if !(length > 0.0) {
            return;
        }

        let rotation = dy.atan2(dx);

        // Lines always span the full white texture regardless of the sprite
        // UV rect.
        let saved_uv = self.uv_rect;
        self.uv_rect = [0.0, 0.0, 1.0, 1.0];
        self.draw_sprite_ext(None, x1, y1, length, thickness, rotation, depth, 0.0, 0.5);
        self.uv_rect = saved_uv;
    }

    /// Draws a single line of text with the baseline at `y`. Each glyph is
    /// an independent quad going through the usual capacity and texture-slot
    /// protocol, so long strings may seal several segments transparently.
    pub fn draw_text(&mut self, font: &Font, text: &str, x: f32, y: f32, depth: f32) {
        if !self.guard("draw_text") {
            return;
        }

        let mut pen = x;
        for c in text.chars() {
            let Some(glyph) = font.glyph(c).copied() else {
                continue;
            };
            if glyph.is_empty() {
                pen += glyph.advance;
                continue;
            }

            self.ensure_segment_capacity(4, 6);
            let slot = self.resolve_slot(Some(font.atlas()));

            let ([x0, y0], [x1, y1]) = glyph.quad(pen, y);
            let base = self.vertices.len() as u32;
            self.push_vertex_uv(x0, y0, depth, slot, glyph.uv_min[0], glyph.uv_max[1]);
            self.push_vertex_uv(x1, y0, depth, slot, glyph.uv_max[0], glyph.uv_max[1]);
            self.push_vertex_uv(x1, y1, depth, slot, glyph.uv_max[0], glyph.uv_min[1]);
            self.push_vertex_uv(x0, y1, depth, slot, glyph.uv_min[0], glyph.uv_min[1]);
            self.push_quad_indices(base);

            pen += glyph.advance;
        }
    }

    // ── submission access ─────────────────────────────────────────────────

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Number of sealed draw segments (one draw call each).
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    pub(crate) fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn guard(&mut self, op: &str) -> bool {
        if self.begun {
            return true;
        }
        if !self.warned_outside_begin {
            log::warn!("sprite batch: {op} outside begin/end rejected");
            self.warned_outside_begin = true;
        }
        false
    }

    /// Seals the current segment: its index range plus the texture-slot
    /// stack become one pending draw call. The batch scope stays open.
    fn flush(&mut self) {
        if self.segment_index_count == 0 {
            return;
        }

        self.segments.push(Segment {
            index_start: self.segment_index_start,
            index_count: self.segment_index_count,
            textures: std::mem::take(&mut self.slots),
        });
        self.segment_index_start = self.indices.len() as u32;
        self.segment_vertex_count = 0;
        self.segment_index_count = 0;
    }

    /// Seals the segment first when appending `vertices`/`indices` would
    /// overflow the per-segment bounds.
    fn ensure_segment_capacity(&mut self, vertices: u32, indices: u32) {
        if self.segment_vertex_count + vertices > self.max_vertices
            || self.segment_index_count + indices > self.max_indices
        {
            self.flush();
        }
    }

    /// Maps a texture to its slot in the current segment, reusing an
    /// existing slot for the same texture and sealing the segment first when
    /// all slots are taken. Sprites are never dropped over slot pressure.
    fn resolve_slot(&mut self, texture: Option<&Arc<Texture>>) -> f32 {
        let id = texture.map_or(TextureId::WHITE, |t| t.id());

        if let Some(slot) = self.slots.iter().position(|s| s.id == id) {
            return slot as f32;
        }

        if self.slots.len() == TEXTURE_SLOTS {
            self.flush();
        }

        self.slots.push(BoundTexture {
            id,
            texture: texture.cloned(),
        });
        (self.slots.len() - 1) as f32
    }

    fn effective_size(
        &self,
        texture: Option<&Arc<Texture>>,
        width: f32,
        height: f32,
    ) -> (f32, f32) {
        let mut width = if width == 0.0 {
            texture.map_or(1.0, |t| t.width() as f32)
        } else {
            width
        };
        let mut height = if height == 0.0 {
            texture.map_or(1.0, |t| t.height() as f32)
        } else {
            height
        };

        if self.flip_h {
            width = -width;
        }
        if self.flip_v {
            height = -height;
        }
        (width, height)
    }

    /// Appends a quad with the active UV rect mapped across it. Corner order
    /// is bottom-left, bottom-right, top-right, top-left (for positive
    /// sizes).
    fn push_quad_at(&mut self, corners: [[f32; 2]; 4], depth: f32, slot: f32) {
        let [u, v, w, h] = self.uv_rect;
        let base = self.vertices.len() as u32;

        self.push_vertex_uv(corners[0][0], corners[0][1], depth, slot, u, v + h);
        self.push_vertex_uv(corners[1][0], corners[1][1], depth, slot, u + w, v + h);
        self.push_vertex_uv(corners[2][0], corners[2][1], depth, slot, u + w, v);
        self.push_vertex_uv(corners[3][0], corners[3][1], depth, slot, u, v);
        self.push_quad_indices(base);
    }

    fn push_quad_indices(&mut self, base: u32) {
        self.push_index(base);
        self.push_index(base + 2);
        self.push_index(base + 3);
        self.push_index(base);
        self.push_index(base + 1);
        self.push_index(base + 2);
    }

    fn push_vertex_uv(&mut self, x: f32, y: f32, depth: f32, slot: f32, u: f32, v: f32) {
        self.vertices.push(SpriteVertex {
            position: [x, y, depth, slot],
            color: self.modulate.to_array(),
            texcoord: [u, v],
        });
        self.segment_vertex_count += 1;
    }

    fn push_index(&mut self, index: u32) {
        self.indices.push(index);
        self.segment_index_count += 1;
    }
}

/// Quad corner offsets around the origin pivot, optionally rotated.
fn quad_corners(
    width: f32,
    height: f32,
    origin_x: f32,
    origin_y: f32,
    rotation: f32,
) -> [[f32; 2]; 4] {
    let corners = [
        [(0.0 - origin_x) * width, (0.0 - origin_y) * height],
        [(1.0 - origin_x) * width, (0.0 - origin_y) * height],
        [(1.0 - origin_x) * width, (1.0 - origin_y) * height],
        [(0.0 - origin_x) * width, (1.0 - origin_y) * height],
    ];

    if rotation == 0.0 {
        return corners;
    }

    let (sin, cos) = rotation.sin_cos();
    corners.map(|[x, y]| [x * cos - y * sin, x * sin + y * cos])
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::text::Glyph;

    use super::*;

    fn batch() -> SpriteBatch {
        SpriteBatch::new(SpriteBatchConfig::default())
    }

    fn small_batch(max_sprites: u32) -> SpriteBatch {
        SpriteBatch::new(SpriteBatchConfig { max_sprites })
    }

    fn begin(batch: &mut SpriteBatch) {
        batch.begin(&Camera2D::default(), Viewport::new(800.0, 600.0));
    }

    fn test_font() -> Font {
        let mut glyphs = HashMap::new();
        glyphs.insert(
            'a',
            Glyph {
                uv_min: [0.1, 0.2],
                uv_max: [0.3, 0.4],
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
    fn draws_outside_begin_are_rejected() {
        let mut b = batch();
        b.draw_box(0.0, 0.0, 10.0, 10.0, 0.0, 0.0);
        b.draw_circle(0.0, 0.0, 5.0, 0.0);
        b.end();

        assert!(b.vertices().is_empty());
        assert!(b.indices().is_empty());
        assert_eq!(b.segment_count(), 0);
    }

    #[test]
    fn end_without_geometry_is_idempotent() {
        let mut b = batch();
        begin(&mut b);
        b.end();
        b.end();
        assert_eq!(b.segment_count(), 0);
    }

    #[test]
    fn quads_share_one_segment_in_call_order() {
        let mut b = batch();
        begin(&mut b);
        for i in 0..3 {
            b.draw_box(i as f32 * 10.0, 0.0, 2.0, 2.0, 0.0, 0.0);
        }
        b.end();

        assert_eq!(b.vertices().len(), 12);
        assert_eq!(b.indices().len(), 18);
        assert_eq!(b.segment_count(), 1);

        let seg = &b.segments()[0];
        assert_eq!(seg.index_start, 0);
        assert_eq!(seg.index_count, 18);

        // Call order: quad i's first corner sits at x = 10 i - 1.
        for i in 0..3 {
            assert_eq!(b.vertices()[i * 4].position[0], 10.0 * i as f32 - 1.0);
        }
    }

    #[test]
    fn capacity_overflow_seals_segments_without_losing_sprites() {
        let mut b = small_batch(2);
        begin(&mut b);
        for i in 0..5 {
            b.draw_box(i as f32, 0.0, 2.0, 2.0, 0.0, 0.0);
        }
        b.end();

        // ceil(5 / 2) draw calls, all 5 quads present, in order.
        assert_eq!(b.segment_count(), 3);
        assert_eq!(b.vertices().len(), 20);
        let counts: Vec<u32> = b.segments().iter().map(|s| s.index_count).collect();
        assert_eq!(counts, vec![12, 12, 6]);
        assert_eq!(b.segments()[1].index_start, 12);
        assert_eq!(b.vertices()[16].position[0], 4.0 - 1.0);
    }

    #[test]
    fn every_segment_gets_its_own_slot_stack() {
        let mut b = small_batch(1);
        begin(&mut b);
        b.draw_box(0.0, 0.0, 1.0, 1.0, 0.0, 0.0);
        b.draw_box(1.0, 0.0, 1.0, 1.0, 0.0, 0.0);
        b.end();

        assert_eq!(b.segment_count(), 2);
        assert_eq!(b.segments()[0].textures.len(), 1);
        assert_eq!(b.segments()[1].textures.len(), 1);
    }

    #[test]
    fn same_texture_reuses_its_slot() {
        let texture = Arc::new(Texture::headless(32, 32));
        let mut b = batch();
        begin(&mut b);
        b.draw_sprite(Some(&texture), 10.0, 10.0);
        b.draw_sprite(Some(&texture), 50.0, 10.0);
        b.end();

        assert_eq!(b.segment_count(), 1);
        assert_eq!(b.vertices().len(), 8);
        assert_eq!(b.segments()[0].textures.len(), 1);
        assert!(b.vertices().iter().all(|v| v.position[3] == 0.0));
    }

    #[test]
    fn distinct_textures_take_distinct_slots() {
        let a = Arc::new(Texture::headless(32, 32));
        let c = Arc::new(Texture::headless(64, 64));
        let mut b = batch();
        begin(&mut b);
        b.draw_sprite(Some(&a), 0.0, 0.0);
        b.draw_sprite(Some(&c), 0.0, 0.0);
        b.draw_box(0.0, 0.0, 1.0, 1.0, 0.0, 0.0);
        b.end();

        assert_eq!(b.segment_count(), 1);
        assert_eq!(b.segments()[0].textures.len(), 3);
        assert_eq!(b.vertices()[4].position[3], 1.0);
        assert_eq!(b.vertices()[8].position[3], 2.0);
    }

    #[test]
    fn slot_exhaustion_forces_an_eager_flush() {
        let textures: Vec<_> = (0..TEXTURE_SLOTS + 1)
            .map(|_| Arc::new(Texture::headless(8, 8)))
            .collect();

        let mut b = batch();
        begin(&mut b);
        for t in &textures {
            b.draw_sprite(Some(t), 0.0, 0.0);
        }
        b.end();

        assert_eq!(b.segment_count(), 2);
        assert_eq!(b.segments()[0].textures.len(), TEXTURE_SLOTS);
        assert_eq!(b.segments()[1].textures.len(), 1);
        // Nothing dropped.
        assert_eq!(b.vertices().len(), (TEXTURE_SLOTS + 1) * 4);
        // The post-flush sprite starts a fresh stack at slot 0.
        let last = &b.vertices()[TEXTURE_SLOTS * 4];
        assert_eq!(last.position[3], 0.0);
    }

    #[test]
    fn sprite_natural_size_and_depth() {
        let texture = Arc::new(Texture::headless(32, 16));
        let mut b = batch();
        begin(&mut b);
        b.draw_sprite_ext(Some(&texture), 100.0, 50.0, 0.0, 0.0, 0.0, 7.0, 0.5, 0.5);
        b.end();

        let v = b.vertices();
        assert_eq!(v[0].position[0], 100.0 - 16.0);
        assert_eq!(v[0].position[1], 50.0 - 8.0);
        assert_eq!(v[2].position[0], 100.0 + 16.0);
        assert_eq!(v[2].position[1], 50.0 + 8.0);
        assert!(v.iter().all(|v| v.position[2] == 7.0));
    }

    #[test]
    fn uv_rect_maps_across_the_quad() {
        let mut b = batch();
        begin(&mut b);
        b.set_uv_rect(0.25, 0.5, 0.5, 0.25);
        b.draw_box(0.0, 0.0, 2.0, 2.0, 0.0, 0.0);
        b.end();

        let v = b.vertices();
        assert_eq!(v[0].texcoord, [0.25, 0.75]);
        assert_eq!(v[1].texcoord, [0.75, 0.75]);
        assert_eq!(v[2].texcoord, [0.75, 0.5]);
        assert_eq!(v[3].texcoord, [0.25, 0.5]);
    }

    #[test]
    fn flip_mirrors_the_quad() {
        let mut b = batch();
        begin(&mut b);
        b.set_flip(true, false);
        b.draw_box(0.0, 0.0, 2.0, 2.0, 0.0, 0.0);
        b.end();

        // Negated width mirrors corners around the pivot.
        assert_eq!(b.vertices()[0].position[0], 1.0);
        assert_eq!(b.vertices()[1].position[0], -1.0);
    }

    #[test]
    fn circle_is_a_33_vertex_fan() {
        let mut b = batch();
        begin(&mut b);
        b.draw_circle(5.0, 6.0, 2.0, 0.0);
        b.end();

        assert_eq!(b.vertices().len(), 33);
        assert_eq!(b.indices().len(), 96);
        assert_eq!(b.vertices()[0].position[0], 5.0);
        assert_eq!(b.vertices()[0].position[1], 6.0);
        // Rim vertices sit on the radius.
        for v in &b.vertices()[1..] {
            let dx = v.position[0] - 5.0;
            let dy = v.position[1] - 6.0;
            assert!(((dx * dx + dy * dy).sqrt() - 2.0).abs() < 1e-5);
        }
        // The fan closes back to the first rim vertex.
        assert_eq!(b.indices()[95], 1 + 31);
        assert_eq!(b.indices()[94], 1);
    }

    #[test]
    fn line_is_an_anchored_rotated_quad() {
        let mut b = batch();
        begin(&mut b);
        b.draw_line(0.0, 0.0, 10.0, 0.0, 2.0, 0.0);
        b.end();

        let v = b.vertices();
        assert_eq!(v.len(), 4);
        assert_eq!([v[0].position[0], v[0].position[1]], [0.0, -1.0]);
        assert_eq!([v[1].position[0], v[1].position[1]], [10.0, -1.0]);
        assert_eq!([v[2].position[0], v[2].position[1]], [10.0, 1.0]);
        assert_eq!([v[3].position[0], v[3].position[1]], [0.0, 1.0]);
    }

    #[test]
    fn zero_length_line_is_skipped() {
        let mut b = batch();
        begin(&mut b);
        b.draw_line(3.0, 3.0, 3.0, 3.0, 2.0, 0.0);
        b.end();
        assert!(b.vertices().is_empty());
    }

    #[test]
    fn line_restores_the_uv_rect() {
        let mut b = batch();
        begin(&mut b);
        b.set_uv_rect(0.25, 0.25, 0.5, 0.5);
        b.draw_line(0.0, 0.0, 10.0, 0.0, 1.0, 0.0);
        b.draw_box(0.0, 0.0, 2.0, 2.0, 0.0, 0.0);
        b.end();

        // Line vertices use the full texture...
        assert_eq!(b.vertices()[0].texcoord, [0.0, 1.0]);
        // ...the following box uses the configured rect again.
        assert_eq!(b.vertices()[4].texcoord, [0.25, 0.75]);
    }

    #[test]
    fn transformed_sprite_maps_corners_through_the_matrix() {
        let transform = Mat4::from_translation(glam::Vec3::new(5.0, 6.0, 0.0));
        let mut b = batch();
        begin(&mut b);
        b.draw_sprite_transform(None, &transform, 2.0, 2.0, 0.0, 0.5, 0.5);
        b.end();

        let v = b.vertices();
        assert_eq!([v[0].position[0], v[0].position[1]], [4.0, 5.0]);
        assert_eq!([v[2].position[0], v[2].position[1]], [6.0, 7.0]);
    }

    #[test]
    fn text_emits_one_quad_per_visible_glyph() {
        let font = test_font();
        let mut b = batch();
        begin(&mut b);
        b.draw_text(&font, "a a", 10.0, 20.0, 0.0);
        b.end();

        // Two 'a' quads; the space only advances the pen.
        assert_eq!(b.vertices().len(), 8);
        assert_eq!(b.segment_count(), 1);
        assert_eq!(b.segments()[0].textures.len(), 1);

        // First glyph at pen 10, second at pen 10 + 9 + 4.
        assert_eq!(b.vertices()[0].position[0], 11.0);
        assert_eq!(b.vertices()[4].position[0], 24.0);
        // Baseline offset applies.
        assert_eq!(b.vertices()[0].position[1], 18.0);
        // Glyph UVs come from the atlas table (v flipped across the quad).
        assert_eq!(b.vertices()[0].texcoord, [0.1, 0.4]);
        assert_eq!(b.vertices()[2].texcoord, [0.3, 0.2]);
    }

    #[test]
    fn long_text_flushes_transparently() {
        let font = test_font();
        let mut b = small_batch(2);
        begin(&mut b);
        b.draw_text(&font, "aaaaa", 0.0, 0.0, 0.0);
        b.end();

        assert_eq!(b.segment_count(), 3);
        assert_eq!(b.vertices().len(), 20);
        assert!(b.segments().iter().all(|s| s.textures.len() == 1));
    }

    #[test]
    fn begin_resets_modulate_to_white() {
        let mut b = batch();
        begin(&mut b);
        b.set_modulate(Color::RED);
        b.draw_box(0.0, 0.0, 1.0, 1.0, 0.0, 0.0);
        b.end();
        assert_eq!(b.vertices()[0].color, Color::RED.to_array());

        begin(&mut b);
        assert_eq!(b.modulate(), Color::WHITE);
    }

    #[test]
    fn begin_discards_the_previous_frame() {
        let mut b = batch();
        begin(&mut b);
        b.draw_box(0.0, 0.0, 1.0, 1.0, 0.0, 0.0);
        b.end();
        assert_eq!(b.segment_count(), 1);

        begin(&mut b);
        b.end();
        assert_eq!(b.segment_count(), 0);
        assert!(b.vertices().is_empty());
    }
}
