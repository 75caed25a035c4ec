//! Particle buffer and the field component that owns it.
//!
//! Positions live in a flat `Vec<f32>` with three floats per point, the same
//! layout the renderer uploads as a `Float32x3` vertex stream. Point `i`
//! occupies indices `[3i, 3i + 1, 3i + 2]`.
//!
//! # Example
//!
//! ```ignore
//! use driftfield::field::ParticleField;
//! use driftfield::frame::FrameInput;
//!
//! let mut field = ParticleField::new(5_000);
//! field.advance(&FrameInput::new(1.0 / 60.0, Vec2::ZERO, Vec2::new(10.0, 7.6)));
//! ```

use glam::Vec3;
use rand::Rng;

use crate::error::FieldError;
use crate::frame::{self, FrameInput, ParallaxMode, Rotation};

/// Default number of particles in a field.
pub const DEFAULT_PARTICLE_COUNT: u32 = 5_000;

/// Half the edge length of the spawn cube. Values are drawn from
/// `[-FIELD_HALF_EXTENT, FIELD_HALF_EXTENT]` on every axis.
pub const FIELD_HALF_EXTENT: f32 = 5.0;

/// Flat buffer of particle positions.
///
/// The point count is fixed at construction. Only values change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBuffer {
    positions: Vec<f32>,
    /// Positions at construction, used by [`ParallaxMode::Anchored`].
    rest: Vec<f32>,
    dirty: bool,
}

impl ParticleBuffer {
    /// Generate `count` points uniformly inside the spawn cube using the
    /// thread-local RNG.
    pub fn generate(count: u32) -> Self {
        Self::generate_with(count, &mut rand::thread_rng())
    }

    /// Generate `count` points from the given random source.
    pub fn generate_with<R: Rng + ?Sized>(count: u32, rng: &mut R) -> Self {
        let positions: Vec<f32> = (0..count as usize * 3)
            .map(|_| rng.gen_range(-FIELD_HALF_EXTENT..=FIELD_HALF_EXTENT))
            .collect();
        Self::from_parts(positions)
    }

    /// Wrap an existing flat position buffer.
    pub fn from_positions(positions: Vec<f32>) -> Result<Self, FieldError> {
        if positions.len() % 3 != 0 {
            return Err(FieldError::RaggedBuffer {
                len: positions.len(),
            });
        }
        Ok(Self::from_parts(positions))
    }

    fn from_parts(positions: Vec<f32>) -> Self {
        Self {
            rest: positions.clone(),
            positions,
            dirty: true,
        }
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat view of all coordinates.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.positions
    }

    /// Flat view of the construction-time coordinates.
    #[inline]
    pub fn rest_positions(&self) -> &[f32] {
        &self.rest
    }

    /// Raw bytes for GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Position of point `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn point(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    /// Construction-time position of point `index`.
    pub fn rest_point(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.rest[index * 3..index * 3 + 3])
    }

    /// Mutable access to the coordinates together with the rest positions.
    ///
    /// Length cannot change through this view.
    pub(crate) fn split_mut(&mut self) -> (&mut [f32], &[f32]) {
        (&mut self.positions, &self.rest)
    }

    /// Whether the buffer changed since the renderer last consumed it.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flag the buffer for re-upload.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Return the dirty flag and clear it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

/// The particle group: buffer, rotation and parallax behavior.
///
/// The buffer is generated once per particle count. Reconfiguring with the
/// same count keeps the existing points.
#[derive(Debug, Clone)]
pub struct ParticleField {
    count: u32,
    buffer: ParticleBuffer,
    rotation: Rotation,
    mode: ParallaxMode,
}

impl ParticleField {
    /// Create a field with `count` randomly placed points.
    pub fn new(count: u32) -> Self {
        Self::from_buffer(ParticleBuffer::generate(count))
    }

    /// Create a field around an existing buffer.
    pub fn from_buffer(buffer: ParticleBuffer) -> Self {
        Self {
            count: buffer.len() as u32,
            buffer,
            rotation: Rotation::default(),
            mode: ParallaxMode::default(),
        }
    }

    /// Set the parallax mode.
    pub fn with_parallax_mode(mut self, mode: ParallaxMode) -> Self {
        self.mode = mode;
        self
    }

    /// Change the particle count.
    ///
    /// Returns `true` when a new buffer was generated. The same count is a
    /// no-op.
    pub fn set_particle_count(&mut self, count: u32) -> bool {
        if count == self.count {
            return false;
        }
        log::debug!("regenerating particle field: {} -> {} points", self.count, count);
        self.count = count;
        self.buffer = ParticleBuffer::generate(count);
        true
    }

    #[inline]
    pub fn particle_count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn parallax_mode(&self) -> ParallaxMode {
        self.mode
    }

    #[inline]
    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    #[inline]
    pub fn buffer_mut(&mut self) -> &mut ParticleBuffer {
        &mut self.buffer
    }

    #[inline]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Run one frame of the updater against this field.
    pub fn advance(&mut self, input: &FrameInput) {
        frame::update_particles(&mut self.buffer, input, self.mode);
        self.rotation.advance(input.delta);
    }
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new(DEFAULT_PARTICLE_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_length_and_range() {
        let buffer = ParticleBuffer::generate(1_000);
        assert_eq!(buffer.as_slice().len(), 3_000);
        assert_eq!(buffer.len(), 1_000);
        assert!(buffer
            .as_slice()
            .iter()
            .all(|v| (-FIELD_HALF_EXTENT..=FIELD_HALF_EXTENT).contains(v)));
    }

    #[test]
    fn test_generate_zero() {
        let buffer = ParticleBuffer::generate(0);
        assert!(buffer.is_empty());
        assert_eq!(buffer.as_bytes().len(), 0);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = ParticleBuffer::generate_with(64, &mut StdRng::seed_from_u64(7));
        let b = ParticleBuffer::generate_with(64, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_from_positions_rejects_ragged() {
        let err = ParticleBuffer::from_positions(vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err, FieldError::RaggedBuffer { len: 2 });
    }

    #[test]
    fn test_point_accessors() {
        let buffer = ParticleBuffer::from_positions(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(buffer.point(1), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(buffer.rest_point(0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(buffer.as_bytes().len(), 24);
    }

    #[test]
    fn test_dirty_flag() {
        let mut buffer = ParticleBuffer::generate(4);
        // New buffers need their first upload.
        assert!(buffer.take_dirty());
        assert!(!buffer.is_dirty());
        buffer.mark_dirty();
        assert!(buffer.take_dirty());
        assert!(!buffer.take_dirty());
    }

    #[test]
    fn test_same_count_keeps_buffer() {
        let mut field = ParticleField::new(32);
        let before = field.buffer().as_slice().to_vec();

        assert!(!field.set_particle_count(32));
        assert_eq!(field.buffer().as_slice(), &before[..]);

        assert!(field.set_particle_count(16));
        assert_eq!(field.buffer().len(), 16);
        assert_eq!(field.particle_count(), 16);
    }

    #[test]
    fn test_default_field() {
        let field = ParticleField::default();
        assert_eq!(field.particle_count(), DEFAULT_PARTICLE_COUNT);
        assert_eq!(field.parallax_mode(), ParallaxMode::Drift);
        assert_eq!(field.rotation(), Rotation::default());
    }
}
