//! Error types for driftfield.
//!
//! The particle core never fails. These cover the outer surface: parsing
//! configuration, wrapping caller-provided buffers, and bringing up the
//! window and GPU.

use thiserror::Error;

/// Errors produced while parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The string was empty or only whitespace.
    #[error("color string is empty")]
    Empty,
    /// A `#` prefixed value that is not 3 or 6 hex digits.
    #[error("invalid hex color '{0}', expected #rgb or #rrggbb")]
    InvalidHex(String),
    /// A malformed `rgb()`/`hsl()` form or an unsupported color function.
    #[error("invalid color function '{0}'")]
    InvalidFunction(String),
    /// A bare name that is not in the known color table.
    #[error("unknown color name '{0}'")]
    UnknownName(String),
}

/// Errors produced when wrapping an existing position buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Flat buffers hold 3 floats per point.
    #[error("position buffer length {len} is not a multiple of 3")]
    RaggedBuffer { len: usize },
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found, ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors that can occur when running a backdrop.
#[derive(Debug, Error)]
pub enum BackdropError {
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// A configured color could not be parsed.
    #[error("invalid color: {0}")]
    Color(#[from] ColorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_error_converts_into_backdrop_error() {
        let err: BackdropError = ColorError::UnknownName("plaid".into()).into();
        assert!(matches!(err, BackdropError::Color(_)));
        assert_eq!(err.to_string(), "invalid color: unknown color name 'plaid'");
    }

    #[test]
    fn test_ragged_buffer_message() {
        let err = FieldError::RaggedBuffer { len: 7 };
        assert_eq!(err.to_string(), "position buffer length 7 is not a multiple of 3");
    }
}
