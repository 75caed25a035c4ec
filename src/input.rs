//! Pointer tracking.
//!
//! Converts raw cursor and wheel events into the values the frame loop reads:
//! the normalized pointer and the wheel movement since the last frame. The
//! pointer starts centered and keeps its last value when the cursor leaves
//! the window.

use glam::Vec2;
use winit::event::{MouseScrollDelta, WindowEvent};

/// Logical pixels per wheel line.
pub const LINE_HEIGHT: f32 = 40.0;

/// Pointer and wheel state.
#[derive(Debug)]
pub struct Input {
    mouse_position: Vec2,
    mouse_ndc: Vec2,
    /// Wheel movement this frame in pixels, positive when scrolling down the page.
    scroll_delta: f32,
    window_size: (u32, u32),
    /// Physical pixels per logical pixel.
    scale_factor: f64,
}

impl Input {
    /// Create a new input tracker.
    pub fn new() -> Self {
        Self {
            mouse_position: Vec2::ZERO,
            mouse_ndc: Vec2::ZERO,
            scroll_delta: 0.0,
            window_size: (800, 600),
            scale_factor: 1.0,
        }
    }

    /// Get the mouse position in screen pixels.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Get the mouse position in normalized device coordinates (-1 to 1).
    ///
    /// Origin is at center of window. X increases to the right, Y increases upward.
    pub fn pointer(&self) -> Vec2 {
        self.mouse_ndc
    }

    /// Page scroll requested this frame, in physical pixels.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Clear per-frame state. Call after the frame has consumed it.
    pub fn end_frame(&mut self) {
        self.scroll_delta = 0.0;
    }

    /// Update window size for NDC calculations.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
        self.recompute_ndc();
    }

    /// Set the window's scale factor so line scrolling matches physical page height.
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    fn add_wheel_lines(&mut self, lines: f32) {
        // Wheel up is positive in winit, page offset grows downward.
        self.scroll_delta -= lines * LINE_HEIGHT * self.scale_factor as f32;
    }

    fn set_cursor(&mut self, x: f32, y: f32) {
        self.mouse_position = Vec2::new(x, y);
        self.recompute_ndc();
    }

    fn recompute_ndc(&mut self) {
        let (w, h) = self.window_size;
        if w > 0 && h > 0 {
            self.mouse_ndc = Vec2::new(
                (self.mouse_position.x / w as f32) * 2.0 - 1.0,
                1.0 - (self.mouse_position.y / h as f32) * 2.0, // Y flipped
            )
            .clamp(Vec2::NEG_ONE, Vec2::ONE);
        }
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.set_cursor(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => self.add_wheel_lines(*y),
                MouseScrollDelta::PixelDelta(pos) => self.scroll_delta -= pos.y as f32,
            },
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_scale_factor(*scale_factor);
            }
            WindowEvent::Resized(size) => {
                self.set_window_size(size.width, size.height);
            }
            _ => {}
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_starts_centered() {
        let input = Input::new();
        assert_eq!(input.pointer(), Vec2::ZERO);
    }

    #[test]
    fn test_pointer_ndc() {
        let mut input = Input::new();
        input.set_window_size(800, 600);

        input.set_cursor(400.0, 300.0);
        assert!(input.pointer().length() < 1e-6);

        input.set_cursor(800.0, 0.0);
        assert!((input.pointer() - Vec2::new(1.0, 1.0)).length() < 1e-6);

        input.set_cursor(0.0, 600.0);
        assert!((input.pointer() - Vec2::new(-1.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_pointer_clamped_outside_window() {
        let mut input = Input::new();
        input.set_window_size(100, 100);
        input.set_cursor(250.0, -40.0);
        assert_eq!(input.pointer(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_resize_rescales_pointer() {
        let mut input = Input::new();
        input.set_window_size(200, 200);
        input.set_cursor(100.0, 100.0);
        input.set_window_size(400, 200);
        assert!((input.pointer().x + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_wheel_lines_follow_scale_factor() {
        let mut input = Input::new();
        input.add_wheel_lines(-1.0);
        assert_eq!(input.scroll_delta(), LINE_HEIGHT);
        input.end_frame();

        input.set_scale_factor(2.0);
        input.add_wheel_lines(-1.0);
        assert_eq!(input.scroll_delta(), 2.0 * LINE_HEIGHT);
        input.end_frame();

        input.add_wheel_lines(1.5);
        assert_eq!(input.scroll_delta(), -3.0 * LINE_HEIGHT);
    }

    #[test]
    fn test_scroll_cleared_at_end_of_frame() {
        let mut input = Input::new();
        input.scroll_delta = 120.0;
        input.end_frame();
        assert_eq!(input.scroll_delta(), 0.0);
    }
}
