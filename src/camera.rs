//! Fixed perspective camera.

use glam::{Mat4, Vec2, Vec3};

/// Perspective camera looking at a target point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera five units back on +z with a 75° field of view.
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            fov_y: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Projection matrix for the given width/height ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), aspect, self.near, self.far)
    }

    /// Visible width and height in world units on the plane through the target.
    pub fn viewport_extent(&self, aspect: f32) -> Vec2 {
        let distance = self.position.distance(self.target);
        let height = 2.0 * (self.fov_y.to_radians() / 2.0).tan() * distance;
        Vec2::new(height * aspect, height)
    }

    /// World-space sprite diameter for an attenuated point `size`.
    ///
    /// An attenuated point covers `size * (H / 2) / depth` pixels on an
    /// `H`-pixel-tall target; a world quad matches that at `size * tan(fov/2)`.
    pub fn sprite_diameter(&self, size: f32) -> f32 {
        size * (self.fov_y.to_radians() / 2.0).tan()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_extent() {
        let camera = Camera::new();
        let square = camera.viewport_extent(1.0);
        let expected = 10.0 * 37.5_f32.to_radians().tan();
        assert!((square.y - expected).abs() < 1e-4);
        assert!((square.x - expected).abs() < 1e-4);

        let wide = camera.viewport_extent(16.0 / 9.0);
        assert!((wide.y - square.y).abs() < 1e-6);
        assert!((wide.x - square.y * 16.0 / 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_view_matrix_places_origin_in_front() {
        let view = Camera::new().view_matrix();
        let origin = view.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-5);
    }

    #[test]
    fn test_projection_keeps_origin_centered() {
        let camera = Camera::new();
        let clip = camera.projection_matrix(1.5) * camera.view_matrix() * Vec3::ZERO.extend(1.0);
        assert!(clip.x.abs() < 1e-5);
        assert!(clip.y.abs() < 1e-5);
        assert!(clip.w > 0.0);
    }

    #[test]
    fn test_sprite_diameter_matches_attenuated_points() {
        let camera = Camera::new();
        let size = 0.02;
        let height_px = 900.0;
        let depth = 5.0;

        let attenuated_px = size * (height_px / 2.0) / depth;
        let visible_height = 2.0 * depth * (camera.fov_y.to_radians() / 2.0).tan();
        let quad_px = camera.sprite_diameter(size) / visible_height * height_px;

        assert!((attenuated_px - quad_px).abs() < 1e-4);
        assert!(camera.sprite_diameter(size) < size);
    }
}
