//! # driftfield
//!
//! A full-window particle backdrop: a cube of points that leans toward the
//! pointer and slowly tumbles, with scroll-paged captions on top.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! fn main() -> Result<(), BackdropError> {
//!     Backdrop::new()
//!         .with_particle_count(5_000)
//!         .with_color("#00bcd4")
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Particle buffer
//!
//! [`ParticleBuffer`] is a flat `Vec<f32>` with three floats per point,
//! generated uniformly inside a cube of half-size 5. Its length never changes.
//!
//! ### Frame update
//!
//! [`ParticleField::advance`] runs once per frame with a [`FrameInput`]
//! holding the frame delta, the normalized pointer and the visible world
//! extent. Every point's x and y move a tenth of the way toward a pointer
//! offset target; z is left alone. The group then rotates by `delta / 20`
//! around x and `delta / 30` around y.
//!
//! The core is plain data and can be driven without a window:
//!
//! ```ignore
//! let mut field = ParticleField::new(1_000);
//! let viewport = Camera::new().viewport_extent(16.0 / 9.0);
//! field.advance(&FrameInput::new(1.0 / 60.0, Vec2::new(0.3, -0.2), viewport));
//! ```
//!
//! ### Scroll paging
//!
//! [`ScrollControls`] maps wheel input to a damped offset across a fixed
//! number of pages. With the `egui` feature the captions are painted over
//! the field; without it the window title names the current page.

mod backdrop;
pub mod camera;
pub mod color;
pub mod error;
pub mod field;
pub mod frame;
mod gpu;
pub mod input;
#[cfg(feature = "egui")]
mod overlay;
pub mod scroll;
pub mod time;

pub use backdrop::{Backdrop, DEFAULT_POINT_SIZE};
pub use camera::Camera;
pub use error::{BackdropError, ColorError, FieldError, GpuError};
pub use field::{ParticleBuffer, ParticleField};
pub use frame::{FrameInput, ParallaxMode, Rotation};
pub use glam::{Vec2, Vec3};
pub use gpu::PointStyle;
pub use scroll::{Panel, PanelStyle, ScrollControls};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use driftfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Backdrop, BackdropError, Camera, FrameInput, Panel, ParallaxMode, ParticleBuffer,
        ParticleField, ScrollControls, Vec2, Vec3,
    };
}
