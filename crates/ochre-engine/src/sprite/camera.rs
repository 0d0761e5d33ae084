use glam::{Mat4, Vec2};

use crate::render::Viewport;

/// Virtual 2D camera for the sprite batch.
///
/// `position` is the bottom-left-origin offset of the view in logical pixels;
/// `zoom` scales the visible bounds around the view center — increase it to
/// zoom out, decrease it to zoom in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera2D {
    /// Builds the orthographic projection for a window of `viewport` logical
    /// pixels.
    ///
    /// Depth values in `[0, 100]` land inside the clip range with lower
    /// values closer to the viewer.
    pub fn projection(&self, viewport: Viewport) -> Mat4 {
        let scaled_w = viewport.width * self.zoom;
        let scaled_h = viewport.height * self.zoom;

        let mid_x = self.position.x + viewport.width * 0.5;
        let mid_y = self.position.y + viewport.height * 0.5;

        let left = mid_x - scaled_w * 0.5;
        let right = mid_x + scaled_w * 0.5;
        let bottom = mid_y - scaled_h * 0.5;
        let top = mid_y + scaled_h * 0.5;

        Mat4::orthographic_rh(left, right, bottom, top, 1.0, -101.0)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    #[test]
    fn default_camera_maps_pixels_to_clip_space() {
        let proj = Camera2D::default().projection(Viewport::new(800.0, 600.0));

        let center = proj * Vec4::new(400.0, 300.0, 0.0, 1.0);
        assert!(center.x.abs() < 1e-5);
        assert!(center.y.abs() < 1e-5);

        let corner = proj * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((corner.x + 1.0).abs() < 1e-5);
        assert!((corner.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn depth_range_stays_inside_clip_volume() {
        let proj = Camera2D::default().projection(Viewport::new(800.0, 600.0));

        let near = (proj * Vec4::new(0.0, 0.0, 0.0, 1.0)).z;
        let far = (proj * Vec4::new(0.0, 0.0, 100.0, 1.0)).z;
        assert!(near > 0.0 && near < far && far < 1.0);
    }

    #[test]
    fn zoom_widens_the_visible_bounds() {
        let camera = Camera2D {
            position: Vec2::ZERO,
            zoom: 2.0,
        };
        let proj = camera.projection(Viewport::new(800.0, 600.0));

        // Zoomed out 2x: the old right edge is halfway to the new one.
        let edge = proj * Vec4::new(800.0, 300.0, 0.0, 1.0);
        assert!((edge.x - 0.5).abs() < 1e-5);
    }
}
