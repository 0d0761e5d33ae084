use std::f32::consts::TAU;

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::color::Color;

use super::arena::PrimArena;
use super::vertex::{GizmoVertex, LineSeg, Tri};

/// Arena capacities, fixed for the accumulator's lifetime.
///
/// Transparent triangles share the 3D triangle capacity, mirroring the split
/// performed at insertion time.
#[derive(Debug, Clone)]
pub struct GizmoConfig {
    pub max_lines: usize,
    pub max_tris: usize,
    pub max_2d_lines: usize,
    pub max_2d_tris: usize,
}

impl Default for GizmoConfig {
    fn default() -> Self {
        Self {
            max_lines: 0xffff,
            max_tris: 0xffff,
            max_2d_lines: 0xff,
            max_2d_tris: 0xff,
        }
    }
}

/// Immediate-mode debug geometry accumulator.
///
/// Owned by the caller and handed to frame code by reference; all methods
/// take `&mut self` and the type is intended to be driven by the single
/// thread that owns the graphics context. Shape operations decompose into
/// line/triangle records appended to fixed-capacity arenas; once an arena is
/// full, further records of that kind are dropped for the rest of the frame.
/// A shape that overflows mid-decomposition simply stops contributing — no
/// rollback of records already appended.
///
/// Triangles are routed at insertion time: fill alpha of exactly 1 goes to
/// the opaque buffer, anything else to the transparent buffer.
///
/// The optional `transform` on shape operations applies its linear part to
/// every generated local-space point and its full affine to the shape center;
/// `None` means identity.
pub struct Gizmos {
    lines: PrimArena<LineSeg>,
    tris: PrimArena<Tri>,
    transparent_tris: PrimArena<Tri>,
    lines_2d: PrimArena<LineSeg>,
    tris_2d: PrimArena<Tri>,
}

impl Gizmos {
    pub fn new(config: GizmoConfig) -> Self {
        Self {
            lines: PrimArena::new(config.max_lines),
            tris: PrimArena::new(config.max_tris),
            transparent_tris: PrimArena::new(config.max_tris),
            lines_2d: PrimArena::new(config.max_2d_lines),
            tris_2d: PrimArena::new(config.max_2d_tris),
        }
    }

    /// Removes all accumulated records. Call once per frame.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.tris.clear();
        self.transparent_tris.clear();
        self.lines_2d.clear();
        self.tris_2d.clear();
    }

    pub fn lines(&self) -> &PrimArena<LineSeg> {
        &self.lines
    }

    pub fn tris(&self) -> &PrimArena<Tri> {
        &self.tris
    }

    pub fn transparent_tris(&self) -> &PrimArena<Tri> {
        &self.transparent_tris
    }

    pub fn lines_2d(&self) -> &PrimArena<LineSeg> {
        &self.lines_2d
    }

    pub fn tris_2d(&self) -> &PrimArena<Tri> {
        &self.tris_2d
    }

    pub fn is_empty_3d(&self) -> bool {
        self.lines.is_empty() && self.tris.is_empty() && self.transparent_tris.is_empty()
    }

    pub fn is_empty_2d(&self) -> bool {
        self.lines_2d.is_empty() && self.tris_2d.is_empty()
    }

    // ── primitive records ─────────────────────────────────────────────────

    /// Adds a single line segment.
    pub fn add_line(&mut self, v0: Vec3, v1: Vec3, color: Color) {
        self.add_line_gradient(v0, v1, color, color);
    }

    /// Adds a line segment with per-endpoint colors.
    pub fn add_line_gradient(&mut self, v0: Vec3, v1: Vec3, c0: Color, c1: Color) {
        self.lines.append(LineSeg {
            v0: GizmoVertex::new(v0, c0),
            v1: GizmoVertex::new(v1, c1),
        });
    }

    /// Adds a triangle, routed to the opaque or transparent buffer by fill
    /// alpha.
    pub fn add_tri(&mut self, v0: Vec3, v1: Vec3, v2: Vec3, color: Color) {
        let record = Tri {
            v0: GizmoVertex::new(v0, color),
            v1: GizmoVertex::new(v1, color),
            v2: GizmoVertex::new(v2, color),
        };
        if color.is_opaque() {
            self.tris.append(record);
        } else {
            self.transparent_tris.append(record);
        }
    }

    // ── composite shapes ──────────────────────────────────────────────────

    /// Adds three unit-length axis lines (red X, green Y, blue Z) at the
    /// transform's translation.
    pub fn add_transform(&mut self, transform: &Mat4, scale: f32) {
        let origin = transform.col(3).truncate();
        let x_tip = origin + transform.col(0).truncate() * scale;
        let y_tip = origin + transform.col(1).truncate() * scale;
        let z_tip = origin + transform.col(2).truncate() * scale;

        self.add_line(origin, x_tip, Color::RED);
        self.add_line(origin, y_tip, Color::GREEN);
        self.add_line(origin, z_tip, Color::BLUE);
    }

    /// Adds a wireframe axis-aligned bounding box (12 edges).
    pub fn add_aabb(
        &mut self,
        center: Vec3,
        extents: Vec3,
        color: Color,
        transform: Option<&Mat4>,
    ) {
        let verts = box_corners(center, extents, transform);
        for (a, b) in BOX_EDGES {
            self.add_line(verts[a], verts[b], color);
        }
    }

    /// Adds a filled axis-aligned bounding box: 12 white edges plus 12
    /// fill-colored triangles (2 per face).
    pub fn add_aabb_filled(
        &mut self,
        center: Vec3,
        extents: Vec3,
        fill: Color,
        transform: Option<&Mat4>,
    ) {
        let v = box_corners(center, extents, transform);
        for (a, b) in BOX_EDGES {
            self.add_line(v[a], v[b], Color::WHITE);
        }

        // -Y face
        self.add_tri(v[2], v[1], v[0], fill);
        self.add_tri(v[3], v[2], v[0], fill);
        // +Y face
        self.add_tri(v[5], v[6], v[4], fill);
        self.add_tri(v[6], v[7], v[4], fill);
        // -Z face
        self.add_tri(v[4], v[3], v[0], fill);
        self.add_tri(v[7], v[3], v[4], fill);
        // +Z face
        self.add_tri(v[1], v[2], v[5], fill);
        self.add_tri(v[2], v[6], v[5], fill);
        // -X face
        self.add_tri(v[0], v[1], v[4], fill);
        self.add_tri(v[1], v[5], v[4], fill);
        // +X face
        self.add_tri(v[2], v[3], v[7], fill);
        self.add_tri(v[6], v[2], v[7], fill);
    }

    /// Adds a filled cylinder aligned to the Y axis, with white edge lines.
    /// Emits 4 triangles and 3 lines per segment.
    pub fn add_cylinder_filled(
        &mut self,
        center: Vec3,
        radius: f32,
        half_length: f32,
        segments: u32,
        fill: Color,
        transform: Option<&Mat4>,
    ) {
        let c = transform_point(transform, center);
        let step = TAU / segments as f32;

        for i in 0..segments {
            let (s0, c0) = (i as f32 * step).sin_cos();
            let (s1, c1) = ((i + 1) as f32 * step).sin_cos();

            let v0_top = transform_dir(transform, Vec3::new(0.0, half_length, 0.0));
            let v1_top = transform_dir(transform, Vec3::new(s0 * radius, half_length, c0 * radius));
            let v2_top = transform_dir(transform, Vec3::new(s1 * radius, half_length, c1 * radius));
            let v0_bot = transform_dir(transform, Vec3::new(0.0, -half_length, 0.0));
            let v1_bot =
                transform_dir(transform, Vec3::new(s0 * radius, -half_length, c0 * radius));
            let v2_bot =
                transform_dir(transform, Vec3::new(s1 * radius, -half_length, c1 * radius));

            self.add_tri(c + v0_top, c + v1_top, c + v2_top, fill);
            self.add_tri(c + v0_bot, c + v2_bot, c + v1_bot, fill);
            self.add_tri(c + v2_top, c + v1_top, c + v1_bot, fill);
            self.add_tri(c + v1_bot, c + v2_bot, c + v2_top, fill);

            self.add_line(c + v1_top, c + v2_top, Color::WHITE);
            self.add_line(c + v1_top, c + v1_bot, Color::WHITE);
            self.add_line(c + v1_bot, c + v2_bot, Color::WHITE);
        }
    }

    /// Adds a double-sided hollow ring in the XZ plane.
    ///
    /// Fill alpha 0 draws only the inner and outer boundary lines (forced
    /// opaque); otherwise 4 fill triangles per segment (both windings).
    pub fn add_ring(
        &mut self,
        center: Vec3,
        inner_radius: f32,
        outer_radius: f32,
        segments: u32,
        fill: Color,
        transform: Option<&Mat4>,
    ) {
        let solid = fill.with_alpha(1.0);
        let c = transform_point(transform, center);
        let step = TAU / segments as f32;

        for i in 0..segments {
            let (s0, c0) = (i as f32 * step).sin_cos();
            let (s1, c1) = ((i + 1) as f32 * step).sin_cos();

            let v1_outer =
                transform_dir(transform, Vec3::new(s0 * outer_radius, 0.0, c0 * outer_radius));
            let v2_outer =
                transform_dir(transform, Vec3::new(s1 * outer_radius, 0.0, c1 * outer_radius));
            let v1_inner =
                transform_dir(transform, Vec3::new(s0 * inner_radius, 0.0, c0 * inner_radius));
            let v2_inner =
                transform_dir(transform, Vec3::new(s1 * inner_radius, 0.0, c1 * inner_radius));

            if fill.a != 0.0 {
                self.add_tri(c + v2_outer, c + v1_outer, c + v1_inner, fill);
                self.add_tri(c + v1_inner, c + v2_inner, c + v2_outer, fill);
                self.add_tri(c + v1_inner, c + v1_outer, c + v2_outer, fill);
                self.add_tri(c + v2_outer, c + v2_inner, c + v1_inner, fill);
            } else {
                self.add_line(c + v1_inner, c + v2_inner, solid);
                self.add_line(c + v1_outer, c + v2_outer, solid);
            }
        }
    }

    /// Adds a double-sided disk in the XZ plane.
    ///
    /// Fill alpha 0 draws only the outer boundary line.
    pub fn add_disk(
        &mut self,
        center: Vec3,
        radius: f32,
        segments: u32,
        fill: Color,
        transform: Option<&Mat4>,
    ) {
        let solid = fill.with_alpha(1.0);
        let c = transform_point(transform, center);
        let step = TAU / segments as f32;

        for i in 0..segments {
            let (s0, c0) = (i as f32 * step).sin_cos();
            let (s1, c1) = ((i + 1) as f32 * step).sin_cos();

            let v1 = transform_dir(transform, Vec3::new(s0 * radius, 0.0, c0 * radius));
            let v2 = transform_dir(transform, Vec3::new(s1 * radius, 0.0, c1 * radius));

            if fill.a != 0.0 {
                self.add_tri(c, c + v1, c + v2, fill);
                self.add_tri(c + v2, c + v1, c, fill);
            } else {
                self.add_line(c + v1, c + v2, solid);
            }
        }
    }

    /// Adds an arc around the Y axis spanning `rotation ± half_angle`
    /// (radians). Fill alpha 0 draws the rim plus two spokes to the center.
    pub fn add_arc(
        &mut self,
        center: Vec3,
        rotation: f32,
        radius: f32,
        half_angle: f32,
        segments: u32,
        fill: Color,
        transform: Option<&Mat4>,
    ) {
        let solid = fill.with_alpha(1.0);
        let c = transform_point(transform, center);
        let step = 2.0 * half_angle / segments as f32;
        let at = |i: u32| -> Vec3 {
            let angle = i as f32 * step - half_angle + rotation;
            transform_dir(
                transform,
                Vec3::new(angle.sin() * radius, 0.0, angle.cos() * radius),
            )
        };

        for i in 0..segments {
            let v1 = at(i);
            let v2 = at(i + 1);

            if fill.a != 0.0 {
                self.add_tri(c, c + v1, c + v2, fill);
                self.add_tri(c + v2, c + v1, c, fill);
            } else {
                self.add_line(c + v1, c + v2, solid);
            }
        }

        if fill.a == 0.0 {
            self.add_line(c, c + at(0), solid);
            self.add_line(c, c + at(segments), solid);
        }
    }

    /// Adds an arc ring around the Y axis between `inner_radius` and
    /// `outer_radius`. Fill alpha 0 draws both rims plus the two radial edge
    /// lines closing the span.
    pub fn add_arc_ring(
        &mut self,
        center: Vec3,
        rotation: f32,
        inner_radius: f32,
        outer_radius: f32,
        half_angle: f32,
        segments: u32,
        fill: Color,
        transform: Option<&Mat4>,
    ) {
        let solid = fill.with_alpha(1.0);
        let c = transform_point(transform, center);
        let step = 2.0 * half_angle / segments as f32;
        let at = |i: u32, radius: f32| -> Vec3 {
            let angle = i as f32 * step - half_angle + rotation;
            transform_dir(
                transform,
                Vec3::new(angle.sin() * radius, 0.0, angle.cos() * radius),
            )
        };

        for i in 0..segments {
            let v1_outer = at(i, outer_radius);
            let v2_outer = at(i + 1, outer_radius);
            let v1_inner = at(i, inner_radius);
            let v2_inner = at(i + 1, inner_radius);

            if fill.a != 0.0 {
                self.add_tri(c + v2_outer, c + v1_outer, c + v1_inner, fill);
                self.add_tri(c + v1_inner, c + v2_inner, c + v2_outer, fill);
                self.add_tri(c + v1_inner, c + v1_outer, c + v2_outer, fill);
                self.add_tri(c + v2_outer, c + v2_inner, c + v1_inner, fill);
            } else {
                self.add_line(c + v1_inner, c + v2_inner, solid);
                self.add_line(c + v1_outer, c + v2_outer, solid);
            }
        }

        if fill.a == 0.0 {
            self.add_line(c + at(0, inner_radius), c + at(0, outer_radius), solid);
            self.add_line(
                c + at(segments, inner_radius),
                c + at(segments, outer_radius),
                solid,
            );
        }
    }

    /// Adds a full sphere: white lattice lines plus two fill triangles per
    /// lattice face.
    pub fn add_sphere(
        &mut self,
        center: Vec3,
        radius: f32,
        rows: u32,
        cols: u32,
        fill: Color,
        transform: Option<&Mat4>,
    ) {
        self.add_sphere_section(center, radius, rows, cols, fill, transform, 0.0, 360.0, -90.0, 90.0);
    }

    /// Adds a latitude/longitude section of a sphere. Angles are degrees;
    /// latitude spans `[-90, 90]`, longitude `[0, 360]`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_sphere_section(
        &mut self,
        center: Vec3,
        radius: f32,
        rows: u32,
        cols: u32,
        fill: Color,
        transform: Option<&Mat4>,
        lon_min: f32,
        lon_max: f32,
        lat_min: f32,
        lat_max: f32,
    ) {
        let c = transform_point(transform, center);
        let lon_range = (lon_max - lon_min).to_radians();
        let points = lattice_points(radius, rows, cols, transform, lon_min, lon_max, lat_min, lat_max);

        self.emit_lattice(&points, rows, cols, c, c, lon_range, fill);
    }

    /// Adds a capsule: a sphere lattice split into two caps at
    /// `±(height / 2 − radius)` along the (optionally rotated) Y axis,
    /// bridged by a cylindrical skirt.
    #[allow(clippy::too_many_arguments)]
    pub fn add_capsule(
        &mut self,
        center: Vec3,
        height: f32,
        radius: f32,
        rows: u32,
        cols: u32,
        fill: Color,
        rotation: Option<&Mat4>,
    ) {
        let cap_offset = height * 0.5 - radius;
        let top = transform_dir(rotation, Vec3::new(0.0, cap_offset, 0.0));
        let bottom = transform_dir(rotation, Vec3::new(0.0, -cap_offset, 0.0));
        let top_center = center + top;
        let bottom_center = center + bottom;

        let points = lattice_points(radius, rows, cols, rotation, 0.0, 360.0, -90.0, 90.0);
        self.emit_lattice(&points, rows, cols, bottom_center, top_center, TAU, fill);

        // Cylindrical skirt between the two caps.
        for i in 0..cols {
            let a0 = i as f32 / cols as f32 * TAU;
            let a1 = (i + 1) as f32 / cols as f32 * TAU;
            let p0 = transform_dir(rotation, Vec3::new(a0.cos(), 0.0, a0.sin()) * radius);
            let p1 = transform_dir(rotation, Vec3::new(a1.cos(), 0.0, a1.sin()) * radius);

            self.add_tri(top_center + p1, bottom_center + p1, bottom_center + p0, fill);
            self.add_tri(top_center + p1, bottom_center + p0, top_center + p0, fill);

            self.add_line(top_center + p0, top_center + p1, Color::WHITE);
            self.add_line(bottom_center + p0, bottom_center + p1, Color::WHITE);
            self.add_line(top_center + p0, bottom_center + p0, Color::WHITE);
        }
    }

    /// Adds a Hermite spline from `start` to `end` as `segments` line
    /// segments (at least one).
    pub fn add_hermite_spline(
        &mut self,
        start: Vec3,
        end: Vec3,
        tangent_start: Vec3,
        tangent_end: Vec3,
        segments: u32,
        color: Color,
    ) {
        let segments = segments.max(1);
        let mut prev = start;

        for i in 1..=segments {
            let s = i as f32 / segments as f32;
            let s2 = s * s;
            let s3 = s2 * s;

            let h1 = 2.0 * s3 - 3.0 * s2 + 1.0;
            let h2 = -2.0 * s3 + 3.0 * s2;
            let h3 = s3 - 2.0 * s2 + s;
            let h4 = s3 - s2;
            let point = start * h1 + end * h2 + tangent_start * h3 + tangent_end * h4;

            self.add_line(prev, point, color);
            prev = point;
        }
    }

    // ── 2D shapes (screen space) ──────────────────────────────────────────

    /// Adds a single 2D line segment.
    pub fn add_2d_line(&mut self, start: Vec2, end: Vec2, color: Color) {
        self.add_2d_line_gradient(start, end, color, color);
    }

    /// Adds a 2D line segment with per-endpoint colors.
    pub fn add_2d_line_gradient(&mut self, start: Vec2, end: Vec2, c0: Color, c1: Color) {
        self.lines_2d.append(LineSeg {
            v0: GizmoVertex::new_2d(start.x, start.y, c0),
            v1: GizmoVertex::new_2d(end.x, end.y, c1),
        });
    }

    /// Adds a 2D triangle.
    pub fn add_2d_tri(&mut self, v0: Vec2, v1: Vec2, v2: Vec2, color: Color) {
        self.tris_2d.append(Tri {
            v0: GizmoVertex::new_2d(v0.x, v0.y, color),
            v1: GizmoVertex::new_2d(v1.x, v1.y, color),
            v2: GizmoVertex::new_2d(v2.x, v2.y, color),
        });
    }

    /// Adds a wireframe 2D box (4 edges).
    pub fn add_2d_aabb(
        &mut self,
        center: Vec2,
        extents: Vec2,
        color: Color,
        transform: Option<&Mat4>,
    ) {
        let vx = transform_dir_2d(transform, Vec2::new(extents.x, 0.0));
        let vy = transform_dir_2d(transform, Vec2::new(0.0, extents.y));

        let v0 = center - vx - vy;
        let v1 = center + vx - vy;
        let v2 = center - vx + vy;
        let v3 = center + vx + vy;

        self.add_2d_line(v0, v1, color);
        self.add_2d_line(v1, v3, color);
        self.add_2d_line(v2, v3, color);
        self.add_2d_line(v2, v0, color);
    }

    /// Adds a filled 2D box (2 triangles).
    pub fn add_2d_aabb_filled(
        &mut self,
        center: Vec2,
        extents: Vec2,
        color: Color,
        transform: Option<&Mat4>,
    ) {
        let vx = transform_dir_2d(transform, Vec2::new(extents.x, 0.0));
        let vy = transform_dir_2d(transform, Vec2::new(0.0, extents.y));

        let v0 = center - vx - vy;
        let v1 = center + vx - vy;
        let v2 = center + vx + vy;
        let v3 = center - vx + vy;

        self.add_2d_tri(v0, v1, v2, color);
        self.add_2d_tri(v0, v2, v3, color);
    }

    /// Adds a 2D circle. Fill alpha 0 draws only the boundary (forced
    /// opaque); otherwise two triangles per segment (both windings).
    pub fn add_2d_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        segments: u32,
        color: Color,
        transform: Option<&Mat4>,
    ) {
        let solid = color.with_alpha(1.0);
        let step = TAU / segments as f32;

        for i in 0..segments {
            let (s0, c0) = (i as f32 * step).sin_cos();
            let (s1, c1) = ((i + 1) as f32 * step).sin_cos();

            let v1 = transform_dir_2d(transform, Vec2::new(s0 * radius, c0 * radius));
            let v2 = transform_dir_2d(transform, Vec2::new(s1 * radius, c1 * radius));

            if color.a != 0.0 {
                self.add_2d_tri(center, center + v1, center + v2, color);
                self.add_2d_tri(center + v2, center + v1, center, color);
            } else {
                self.add_2d_line(center + v1, center + v2, solid);
            }
        }
    }

    // ── shared lattice emission ───────────────────────────────────────────

    /// Walks the row/column faces of a sphere lattice, emitting white lines
    /// and two fill triangles per face. The lower half of the lattice is
    /// positioned around `lower_center`, the rest around `upper_center`
    /// (identical for a plain sphere, the two cap centers for a capsule).
    #[allow(clippy::too_many_arguments)]
    fn emit_lattice(
        &mut self,
        points: &[Vec3],
        rows: u32,
        cols: u32,
        lower_center: Vec3,
        upper_center: Vec3,
        lon_range: f32,
        fill: Color,
    ) {
        let cols = cols as usize;
        let faces = rows as usize * cols;
        let lower_faces = (rows as usize / 2) * cols;

        for face in 0..faces {
            let mut next = face + 1;
            if next % cols == 0 {
                next -= cols;
            }

            let c = if face < lower_faces {
                lower_center
            } else {
                upper_center
            };

            self.add_line(c + points[face], c + points[face + cols], Color::WHITE);

            // An open longitudinal section has no wrap seam to stitch.
            if face % cols == 0 && lon_range < TAU {
                continue;
            }

            self.add_line(c + points[next + cols], c + points[face + cols], Color::WHITE);
            self.add_tri(c + points[next + cols], c + points[face], c + points[next], fill);
            self.add_tri(
                c + points[next + cols],
                c + points[face + cols],
                c + points[face],
                fill,
            );
        }
    }
}

// ── helpers ───────────────────────────────────────────────────────────────

/// Applies only the linear part of the transform (rotation/scale, w = 0).
#[inline]
fn transform_dir(transform: Option<&Mat4>, v: Vec3) -> Vec3 {
    match transform {
        Some(m) => (*m * v.extend(0.0)).truncate(),
        None => v,
    }
}

/// Applies the full affine transform (w = 1).
#[inline]
fn transform_point(transform: Option<&Mat4>, p: Vec3) -> Vec3 {
    match transform {
        Some(m) => (*m * p.extend(1.0)).truncate(),
        None => p,
    }
}

#[inline]
fn transform_dir_2d(transform: Option<&Mat4>, v: Vec2) -> Vec2 {
    match transform {
        Some(m) => {
            let t = *m * Vec4::new(v.x, v.y, 0.0, 0.0);
            Vec2::new(t.x, t.y)
        }
        None => v,
    }
}

/// Corner order: the four -Y corners counter-clockwise, then the four +Y
/// corners in the same order.
fn box_corners(center: Vec3, extents: Vec3, transform: Option<&Mat4>) -> [Vec3; 8] {
    let vx = transform_dir(transform, Vec3::new(extents.x, 0.0, 0.0));
    let vy = transform_dir(transform, Vec3::new(0.0, extents.y, 0.0));
    let vz = transform_dir(transform, Vec3::new(0.0, 0.0, extents.z));
    let c = transform_point(transform, center);

    [
        c - vx - vz - vy,
        c - vx + vz - vy,
        c + vx + vz - vy,
        c + vx - vz - vy,
        c - vx - vz + vy,
        c - vx + vz + vy,
        c + vx + vz + vy,
        c + vx - vz + vy,
    ]
}

const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Generates the row/column point lattice shared by sphere and capsule.
///
/// Rows sweep latitude, columns sweep longitude. The returned vector has
/// `rows * cols + cols` entries; columns wrap, so each row stores `cols`
/// distinct points.
#[allow(clippy::too_many_arguments)]
fn lattice_points(
    radius: f32,
    rows: u32,
    cols: u32,
    transform: Option<&Mat4>,
    lon_min: f32,
    lon_max: f32,
    lat_min: f32,
    lat_max: f32,
) -> Vec<Vec3> {
    let lat_range = (lat_max - lat_min).to_radians();
    let lon_range = (lon_max - lon_min).to_radians();
    let inv_rows = 1.0 / rows as f32;
    let inv_cols = 1.0 / cols as f32;

    let mut points = vec![Vec3::ZERO; (rows * cols + cols) as usize];

    for row in 0..=rows {
        let lat = row as f32 * inv_rows * lat_range + lat_min.to_radians();
        let y = radius * lat.sin();
        let z = radius * lat.cos();

        for col in 0..=cols {
            let theta = col as f32 * inv_cols * lon_range + lon_min.to_radians();
            let point = Vec3::new(-z * theta.sin(), y, -z * theta.cos());
            let point = transform_dir(transform, point);

            let index = (row * cols + col % cols) as usize;
            points[index] = point;
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn gizmos() -> Gizmos {
        Gizmos::new(GizmoConfig::default())
    }

    fn pos(v: &GizmoVertex) -> Vec3 {
        Vec3::new(v.position[0], v.position[1], v.position[2])
    }

    #[test]
    fn line_capacity_two_keeps_first_two() {
        let mut g = Gizmos::new(GizmoConfig {
            max_lines: 2,
            ..GizmoConfig::default()
        });

        g.add_line(Vec3::ZERO, Vec3::X, Color::RED);
        g.add_line(Vec3::ZERO, Vec3::Y, Color::GREEN);
        g.add_line(Vec3::ZERO, Vec3::Z, Color::BLUE);

        let lines = g.lines().as_slice();
        assert_eq!(lines.len(), 2);
        assert_eq!(pos(&lines[0].v1), Vec3::X);
        assert_eq!(lines[0].v1.color, Color::RED.to_array());
        assert_eq!(pos(&lines[1].v1), Vec3::Y);
        assert_eq!(lines[1].v1.color, Color::GREEN.to_array());
    }

    #[test]
    fn tri_routes_by_exact_alpha() {
        let mut g = gizmos();
        g.add_tri(Vec3::ZERO, Vec3::X, Vec3::Y, Color::WHITE);
        assert_eq!(g.tris().len(), 1);
        assert_eq!(g.transparent_tris().len(), 0);

        g.add_tri(Vec3::ZERO, Vec3::X, Vec3::Y, Color::WHITE.with_alpha(0.5));
        assert_eq!(g.tris().len(), 1);
        assert_eq!(g.transparent_tris().len(), 1);

        // Alpha 0 is still "not exactly 1" and routes transparent.
        g.add_tri(Vec3::ZERO, Vec3::X, Vec3::Y, Color::WHITE.with_alpha(0.0));
        assert_eq!(g.transparent_tris().len(), 2);
    }

    #[test]
    fn clear_empties_every_buffer() {
        let mut g = gizmos();
        g.add_line(Vec3::ZERO, Vec3::X, Color::WHITE);
        g.add_tri(Vec3::ZERO, Vec3::X, Vec3::Y, Color::WHITE.with_alpha(0.5));
        g.add_2d_line(Vec2::ZERO, Vec2::X, Color::WHITE);
        g.add_2d_tri(Vec2::ZERO, Vec2::X, Vec2::Y, Color::WHITE);

        g.clear();
        assert!(g.is_empty_3d());
        assert!(g.is_empty_2d());
    }

    #[test]
    fn unit_aabb_is_twelve_cube_edges() {
        let mut g = gizmos();
        g.add_aabb(Vec3::ZERO, Vec3::ONE, Color::WHITE, None);

        let lines = g.lines().as_slice();
        assert_eq!(lines.len(), 12);

        // Every endpoint is a cube corner.
        for line in lines {
            for v in [pos(&line.v0), pos(&line.v1)] {
                assert_eq!(v.x.abs(), 1.0);
                assert_eq!(v.y.abs(), 1.0);
                assert_eq!(v.z.abs(), 1.0);
            }
        }

        // First edge of the -Y face runs along Z.
        assert_eq!(pos(&lines[0].v0), Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(pos(&lines[0].v1), Vec3::new(-1.0, -1.0, 1.0));

        // Each edge has unit-cube length 2 and every corner shows up 3 times.
        let mut corner_uses = std::collections::HashMap::new();
        for line in lines {
            assert_eq!((pos(&line.v0) - pos(&line.v1)).length(), 2.0);
            for v in [pos(&line.v0), pos(&line.v1)] {
                *corner_uses.entry(format!("{v:?}")).or_insert(0) += 1;
            }
        }
        assert_eq!(corner_uses.len(), 8);
        assert!(corner_uses.values().all(|&n| n == 3));
    }

    #[test]
    fn filled_aabb_emits_white_edges_and_routed_fill() {
        let mut g = gizmos();
        g.add_aabb_filled(Vec3::ZERO, Vec3::ONE, Color::RED.with_alpha(0.25), None);

        assert_eq!(g.lines().len(), 12);
        assert!(g
            .lines()
            .as_slice()
            .iter()
            .all(|l| l.v0.color == Color::WHITE.to_array()));
        assert_eq!(g.tris().len(), 0);
        assert_eq!(g.transparent_tris().len(), 12);

        let mut g = gizmos();
        g.add_aabb_filled(Vec3::ZERO, Vec3::ONE, Color::RED, None);
        assert_eq!(g.tris().len(), 12);
        assert_eq!(g.transparent_tris().len(), 0);
    }

    #[test]
    fn aabb_respects_transform() {
        let transform = Mat4::from_rotation_y(FRAC_PI_2);
        let mut g = gizmos();
        g.add_aabb(Vec3::new(2.0, 0.0, 0.0), Vec3::ONE, Color::WHITE, Some(&transform));

        // Center rotates to (0, 0, -2); the first corner is center - x' - z' - y'
        // with x' = (0,0,-1) and z' = (1,0,0).
        let first = pos(&g.lines().as_slice()[0].v0);
        assert!((first - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn ring_filled_emits_four_tris_per_segment() {
        let mut g = gizmos();
        g.add_ring(Vec3::ZERO, 0.5, 1.0, 8, Color::GREEN, None);
        assert_eq!(g.tris().len(), 32);
        assert_eq!(g.lines().len(), 0);
    }

    #[test]
    fn ring_without_fill_draws_opaque_boundary_lines() {
        let mut g = gizmos();
        g.add_ring(Vec3::ZERO, 0.5, 1.0, 8, Color::GREEN.with_alpha(0.0), None);

        let lines = g.lines().as_slice();
        assert_eq!(lines.len(), 16);
        assert!(g.tris().is_empty() && g.transparent_tris().is_empty());
        // The boundary uses the fill color forced opaque.
        assert!(lines.iter().all(|l| l.v0.color == [0.0, 1.0, 0.0, 1.0]));

        // Inner line radii ~0.5, outer ~1.0, all centered on the origin.
        for pair in lines.chunks(2) {
            assert!((pos(&pair[0].v0).length() - 0.5).abs() < 1e-5);
            assert!((pos(&pair[1].v0).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn ring_lines_center_consistently_with_fill() {
        // Both branches must use transformed_center + point; a shifted ring's
        // boundary should circle the shifted center.
        let center = Vec3::new(3.0, 0.0, 0.0);
        let mut g = gizmos();
        g.add_ring(center, 0.5, 1.0, 8, Color::WHITE.with_alpha(0.0), None);
        for line in g.lines().as_slice() {
            let r = (pos(&line.v0) - center).length();
            assert!((r - 0.5).abs() < 1e-5 || (r - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn disk_counts() {
        let mut g = gizmos();
        g.add_disk(Vec3::ZERO, 1.0, 8, Color::WHITE, None);
        assert_eq!(g.tris().len(), 16);

        let mut g = gizmos();
        g.add_disk(Vec3::ZERO, 1.0, 8, Color::WHITE.with_alpha(0.0), None);
        assert_eq!(g.lines().len(), 8);
    }

    #[test]
    fn arc_without_fill_adds_two_spokes() {
        let mut g = gizmos();
        g.add_arc(Vec3::ZERO, 0.0, 1.0, FRAC_PI_2, 5, Color::WHITE.with_alpha(0.0), None);
        assert_eq!(g.lines().len(), 7);

        let mut g = gizmos();
        g.add_arc(Vec3::ZERO, 0.0, 1.0, FRAC_PI_2, 5, Color::WHITE, None);
        assert_eq!(g.tris().len(), 10);
        assert_eq!(g.lines().len(), 0);
    }

    #[test]
    fn arc_ring_counts() {
        let mut g = gizmos();
        g.add_arc_ring(Vec3::ZERO, 0.0, 0.5, 1.0, FRAC_PI_2, 5, Color::WHITE.with_alpha(0.0), None);
        // 2 rim lines per segment + 2 radial edge lines.
        assert_eq!(g.lines().len(), 12);

        let mut g = gizmos();
        g.add_arc_ring(Vec3::ZERO, 0.0, 0.5, 1.0, FRAC_PI_2, 5, Color::WHITE, None);
        assert_eq!(g.tris().len(), 20);
    }

    #[test]
    fn cylinder_counts() {
        let mut g = gizmos();
        g.add_cylinder_filled(Vec3::ZERO, 1.0, 2.0, 8, Color::WHITE, None);
        assert_eq!(g.tris().len(), 32);
        assert_eq!(g.lines().len(), 24);
    }

    #[test]
    fn full_sphere_counts() {
        let mut g = gizmos();
        g.add_sphere(Vec3::ZERO, 1.0, 3, 4, Color::WHITE, None);
        // 12 faces; a full sphere stitches its wrap seam, so 2 lines + 2 tris
        // per face.
        assert_eq!(g.lines().len(), 24);
        assert_eq!(g.tris().len(), 24);

        // Every lattice point sits on the sphere.
        for line in g.lines().as_slice() {
            assert!((pos(&line.v0).length() - 1.0).abs() < 1e-4);
            assert!((pos(&line.v1).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn sphere_section_skips_wrap_seam() {
        let mut g = gizmos();
        g.add_sphere_section(Vec3::ZERO, 1.0, 3, 4, Color::WHITE, None, 0.0, 180.0, -90.0, 90.0);
        // One face per row (face % cols == 0) emits only its latitude line.
        assert_eq!(g.lines().len(), 24 - 3);
        assert_eq!(g.tris().len(), 24 - 6);
    }

    #[test]
    fn capsule_counts() {
        let mut g = gizmos();
        g.add_capsule(Vec3::ZERO, 4.0, 1.0, 4, 6, Color::WHITE, None);
        // Lattice: 24 faces -> 48 lines + 48 tris.
        // Skirt: 6 segments -> 18 lines + 12 tris.
        assert_eq!(g.lines().len(), 66);
        assert_eq!(g.tris().len(), 60);
    }

    #[test]
    fn capsule_caps_are_offset_along_y() {
        let mut g = gizmos();
        g.add_capsule(Vec3::ZERO, 6.0, 1.0, 4, 6, Color::WHITE, None);
        // Cap centers at y = ±2: the lattice extremes land at y = ±3.
        let max_y = g
            .lines()
            .as_slice()
            .iter()
            .flat_map(|l| [pos(&l.v0).y, pos(&l.v1).y])
            .fold(f32::MIN, f32::max);
        assert!((max_y - 3.0).abs() < 1e-4);
    }

    #[test]
    fn hermite_spline_is_a_connected_polyline() {
        let start = Vec3::ZERO;
        let end = Vec3::new(4.0, 0.0, 0.0);
        let mut g = gizmos();
        g.add_hermite_spline(start, end, Vec3::Y, Vec3::Y, 8, Color::WHITE);

        let lines = g.lines().as_slice();
        assert_eq!(lines.len(), 8);
        assert_eq!(pos(&lines[0].v0), start);
        assert!((pos(&lines[7].v1) - end).length() < 1e-5);
        for pair in lines.windows(2) {
            assert_eq!(pos(&pair[0].v1), pos(&pair[1].v0));
        }
    }

    #[test]
    fn hermite_spline_segment_floor_is_one() {
        let mut g = gizmos();
        g.add_hermite_spline(Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Y, 0, Color::WHITE);
        assert_eq!(g.lines().len(), 1);
    }

    #[test]
    fn transform_axes_are_rgb() {
        let transform = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let mut g = gizmos();
        g.add_transform(&transform, 1.0);

        let lines = g.lines().as_slice();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].v0.color, Color::RED.to_array());
        assert_eq!(lines[1].v0.color, Color::GREEN.to_array());
        assert_eq!(lines[2].v0.color, Color::BLUE.to_array());
        assert_eq!(pos(&lines[0].v0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(pos(&lines[0].v1), Vec3::new(2.0, 2.0, 3.0));
    }

    #[test]
    fn two_d_records_pin_z_to_one() {
        let mut g = gizmos();
        g.add_2d_line(Vec2::ZERO, Vec2::new(10.0, 0.0), Color::WHITE);
        g.add_2d_tri(Vec2::ZERO, Vec2::X, Vec2::Y, Color::WHITE);

        assert_eq!(g.lines_2d().as_slice()[0].v0.position[2], 1.0);
        assert_eq!(g.tris_2d().as_slice()[0].v2.position[2], 1.0);
    }

    #[test]
    fn two_d_boxes() {
        let mut g = gizmos();
        g.add_2d_aabb(Vec2::new(5.0, 5.0), Vec2::new(2.0, 1.0), Color::WHITE, None);
        assert_eq!(g.lines_2d().len(), 4);

        g.add_2d_aabb_filled(Vec2::new(5.0, 5.0), Vec2::new(2.0, 1.0), Color::WHITE, None);
        assert_eq!(g.tris_2d().len(), 2);
    }

    #[test]
    fn two_d_circle_counts() {
        let mut g = gizmos();
        g.add_2d_circle(Vec2::ZERO, 4.0, 16, Color::WHITE, None);
        assert_eq!(g.tris_2d().len(), 32);

        let mut g = gizmos();
        g.add_2d_circle(Vec2::ZERO, 4.0, 16, Color::WHITE.with_alpha(0.0), None);
        assert_eq!(g.lines_2d().len(), 16);
        assert!(g.lines_2d().as_slice().iter().all(|l| l.v0.color[3] == 1.0));
    }

    #[test]
    fn overflowing_shape_stops_without_rollback() {
        let mut g = Gizmos::new(GizmoConfig {
            max_lines: 5,
            ..GizmoConfig::default()
        });
        g.add_aabb(Vec3::ZERO, Vec3::ONE, Color::WHITE, None);
        // 12 edges attempted, the first 5 survive.
        assert_eq!(g.lines().len(), 5);
    }
}
