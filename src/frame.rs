//! Per-frame particle update.
//!
//! Each frame pulls every point toward a pointer-dependent target with a fixed
//! blend factor and spins the particle group by an amount proportional to the
//! frame delta. The positional blend is per frame; the rotation is per second.

use std::f32::consts::FRAC_PI_4;

use glam::{EulerRot, Mat4, Vec2};

use crate::field::ParticleBuffer;

/// Fraction of the remaining distance covered each frame.
pub const SMOOTHING: f32 = 0.1;

/// Divides the half-viewport pointer offset to get the per-point target shift.
pub const PARALLAX_DIVISOR: f32 = 100.0;

/// Seconds per radian of x rotation.
pub const ROTATION_X_DIVISOR: f32 = 20.0;

/// Seconds per radian of y rotation.
pub const ROTATION_Y_DIVISOR: f32 = 30.0;

/// Fixed z tilt of the enclosing group.
pub const GROUP_TILT: f32 = FRAC_PI_4;

/// Everything the updater reads for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Pointer in normalized coordinates, each axis in `[-1, 1]`, y up.
    pub pointer: Vec2,
    /// Visible width and height in world units.
    pub viewport: Vec2,
}

impl FrameInput {
    pub fn new(delta: f32, pointer: Vec2, viewport: Vec2) -> Self {
        Self {
            delta,
            pointer,
            viewport,
        }
    }

    /// Offset from a point's anchor to its target.
    ///
    /// Screen-space pointer y is up while the field pulls y the other way.
    pub fn parallax_offset(&self) -> Vec2 {
        let half = self.pointer * self.viewport / 2.0;
        Vec2::new(half.x, -half.y) / PARALLAX_DIVISOR
    }
}

/// Where the pointer target is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParallaxMode {
    /// From the point's current position. A held pointer keeps the cloud
    /// sliding by a constant step per frame.
    #[default]
    Drift,
    /// From the point's rest position. A held pointer settles the cloud at a
    /// fixed offset.
    Anchored,
}

/// Accumulated x/y rotation of the particle group.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
}

impl Rotation {
    /// Apply one frame of rotation.
    pub fn advance(&mut self, delta: f32) {
        self.x -= delta / ROTATION_X_DIVISOR;
        self.y -= delta / ROTATION_Y_DIVISOR;
    }

    /// World transform of the particles: the tilted outer group around the
    /// rotating inner one.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_z(GROUP_TILT) * Mat4::from_euler(EulerRot::XYZ, self.x, self.y, 0.0)
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Move every point's x and y one step toward its target.
///
/// z is never touched. The buffer is marked dirty afterwards.
pub fn update_particles(buffer: &mut ParticleBuffer, input: &FrameInput, mode: ParallaxMode) {
    let offset = input.parallax_offset();
    let (positions, rest) = buffer.split_mut();

    match mode {
        ParallaxMode::Drift => {
            for p in positions.chunks_exact_mut(3) {
                let (x, y) = (p[0], p[1]);
                p[0] = lerp(x, x + offset.x, SMOOTHING);
                p[1] = lerp(y, y + offset.y, SMOOTHING);
            }
        }
        ParallaxMode::Anchored => {
            for (p, r) in positions.chunks_exact_mut(3).zip(rest.chunks_exact(3)) {
                p[0] = lerp(p[0], r[0] + offset.x, SMOOTHING);
                p[1] = lerp(p[1], r[1] + offset.y, SMOOTHING);
            }
        }
    }

    buffer.mark_dirty();
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn grid_buffer() -> ParticleBuffer {
        ParticleBuffer::from_positions(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).unwrap()
    }

    #[test]
    fn test_zero_pointer_is_fixed_point() {
        let mut buffer = grid_buffer();
        let input = FrameInput::new(1.0, Vec2::ZERO, Vec2::new(10.0, 10.0));
        let mut rotation = Rotation::default();

        update_particles(&mut buffer, &input, ParallaxMode::Drift);
        rotation.advance(input.delta);

        for (a, b) in buffer.as_slice().iter().zip([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]) {
            assert!((a - b).abs() < 1e-6);
        }
        assert!((rotation.x + 0.05).abs() < 1e-6);
        assert!((rotation.y + 1.0 / 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_z_untouched() {
        let mut buffer = grid_buffer();
        let input = FrameInput::new(0.016, Vec2::new(0.7, -0.4), Vec2::new(12.0, 8.0));

        for mode in [ParallaxMode::Drift, ParallaxMode::Anchored] {
            update_particles(&mut buffer, &input, mode);
            assert_eq!(buffer.point(0).z, 3.0);
            assert_eq!(buffer.point(1).z, 6.0);
            assert_eq!(buffer.point(2).z, 9.0);
        }
    }

    #[test]
    fn test_drift_steps_by_tenth_of_offset() {
        let mut buffer = grid_buffer();
        // offset = (1 * 10 / 2 / 100, -(1 * 10 / 2) / 100) = (0.05, -0.05)
        let input = FrameInput::new(0.016, Vec2::new(1.0, 1.0), Vec2::new(10.0, 10.0));

        update_particles(&mut buffer, &input, ParallaxMode::Drift);
        let p = buffer.point(0);
        assert!((p.x - 1.005).abs() < 1e-6);
        assert!((p.y - 1.995).abs() < 1e-6);

        update_particles(&mut buffer, &input, ParallaxMode::Drift);
        let p = buffer.point(0);
        assert!((p.x - 1.010).abs() < 1e-5);
        assert!((p.y - 1.990).abs() < 1e-5);
    }

    #[test]
    fn test_anchored_converges_geometrically() {
        let mut buffer = grid_buffer();
        let input = FrameInput::new(0.016, Vec2::new(0.5, -1.0), Vec2::new(8.0, 6.0));
        let target = Vec3::new(
            1.0 + 0.5 * 8.0 / 200.0,
            2.0 + 1.0 * 6.0 / 200.0,
            3.0,
        );

        let mut error = (buffer.point(0) - target).truncate().length();
        for _ in 0..50 {
            update_particles(&mut buffer, &input, ParallaxMode::Anchored);
            let next = (buffer.point(0) - target).truncate().length();
            assert!(next <= error);
            assert!((next - error * 0.9).abs() < 1e-5);
            error = next;
        }
    }

    #[test]
    fn test_update_marks_dirty() {
        let mut buffer = grid_buffer();
        buffer.take_dirty();
        update_particles(&mut buffer, &FrameInput::default(), ParallaxMode::Drift);
        assert!(buffer.is_dirty());
    }

    #[test]
    fn test_rotation_accumulates_linearly() {
        let deltas = [0.016, 0.5, 0.033, 1.25];
        let mut forward = Rotation::default();
        let mut backward = Rotation::default();
        for d in deltas {
            forward.advance(d);
        }
        for d in deltas.iter().rev() {
            backward.advance(*d);
        }
        let total: f32 = deltas.iter().sum();

        assert!((forward.x + total / 20.0).abs() < 1e-6);
        assert!((forward.y + total / 30.0).abs() < 1e-6);
        assert!((forward.x - backward.x).abs() < 1e-6);
        assert!((forward.y - backward.y).abs() < 1e-6);
    }

    #[test]
    fn test_model_matrix_applies_tilt() {
        let m = Rotation::default().model_matrix();
        let v = m.transform_vector3(Vec3::X);
        let s = std::f32::consts::FRAC_1_SQRT_2;
        assert!((v - Vec3::new(s, s, 0.0)).length() < 1e-6);
    }
}
