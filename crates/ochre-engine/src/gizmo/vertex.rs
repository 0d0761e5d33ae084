use glam::Vec3;

use crate::color::Color;

/// A gizmo vertex: homogeneous position + straight-alpha color.
///
/// Matches the GPU vertex layout (location 0 = position, location 1 = color).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GizmoVertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

impl GizmoVertex {
    #[inline]
    pub fn new(position: Vec3, color: Color) -> Self {
        Self {
            position: [position.x, position.y, position.z, 1.0],
            color: color.to_array(),
        }
    }

    /// 2D variant: z is fixed to 1 so the orthographic projection keeps the
    /// vertex inside the clip volume.
    #[inline]
    pub fn new_2d(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y, 1.0, 1.0],
            color: color.to_array(),
        }
    }
}

/// One line segment record. Segments are independent; shared endpoints are
/// duplicated rather than deduplicated.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineSeg {
    pub v0: GizmoVertex,
    pub v1: GizmoVertex,
}

/// One triangle record. Winding is caller-determined; two-sided shapes emit
/// both windings.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Tri {
    pub v0: GizmoVertex,
    pub v1: GizmoVertex,
    pub v2: GizmoVertex,
}
