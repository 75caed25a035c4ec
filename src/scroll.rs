//! Scroll paging for the caption overlay.
//!
//! The overlay is a stack of panels, one window height each. The wheel moves
//! a target offset in `[0, 1]` across the scrollable range and the displayed
//! offset follows it with a critically damped smoothing step, so the panels
//! glide rather than jump.

/// Snap distance for the damped offset.
const SETTLE_EPSILON: f32 = 1e-4;

/// Default number of pages.
pub const DEFAULT_PAGES: usize = 3;

/// Default smoothing time in seconds.
pub const DEFAULT_DAMPING: f32 = 0.25;

/// Text size class of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStyle {
    Title,
    Subtitle,
}

impl PanelStyle {
    /// Font size in logical points.
    pub fn font_size(&self) -> f32 {
        match self {
            PanelStyle::Title => 56.0,
            PanelStyle::Subtitle => 36.0,
        }
    }
}

/// One page of caption text, centered in its page.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub text: String,
    pub style: PanelStyle,
}

impl Panel {
    pub fn title(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: PanelStyle::Title,
        }
    }

    pub fn subtitle(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: PanelStyle::Subtitle,
        }
    }
}

/// The stock captions.
pub fn default_panels() -> Vec<Panel> {
    vec![
        Panel::title("Welcome to Our 3D World"),
        Panel::subtitle("Scroll to Explore"),
        Panel::subtitle("Amazing 3D Experience"),
    ]
}

/// Scroll position over a fixed number of pages.
#[derive(Debug, Clone)]
pub struct ScrollControls {
    pages: usize,
    damping: f32,
    panels: Vec<Panel>,
    target: f32,
    offset: f32,
    velocity: f32,
}

impl ScrollControls {
    /// Scroll over `panels`, one page per panel.
    pub fn new(panels: Vec<Panel>) -> Self {
        Self {
            pages: panels.len().max(1),
            damping: DEFAULT_DAMPING,
            panels,
            target: 0.0,
            offset: 0.0,
            velocity: 0.0,
        }
    }

    /// Override the page count. At least one page is kept.
    pub fn with_pages(mut self, pages: usize) -> Self {
        self.pages = pages.max(1);
        self
    }

    /// Smoothing time in seconds. Zero snaps immediately.
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping.max(0.0);
        self
    }

    #[inline]
    pub fn pages(&self) -> usize {
        self.pages
    }

    #[inline]
    pub fn damping(&self) -> f32 {
        self.damping
    }

    #[inline]
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Displayed offset in `[0, 1]`.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Offset the display is heading toward.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Move the target by `pixels` for a window `viewport_height` pixels tall.
    pub fn scroll_by(&mut self, pixels: f32, viewport_height: f32) {
        let scrollable = (self.pages - 1) as f32 * viewport_height;
        if scrollable <= 0.0 {
            self.target = 0.0;
            return;
        }
        self.target = (self.target + pixels / scrollable).clamp(0.0, 1.0);
    }

    /// Advance the displayed offset by `delta` seconds. Returns `true` while
    /// still moving.
    pub fn update(&mut self, delta: f32) -> bool {
        if self.damping == 0.0 {
            let moved = self.offset != self.target;
            self.offset = self.target;
            self.velocity = 0.0;
            return moved;
        }
        let before = self.offset;
        self.offset = smooth_damp(self.offset, self.target, &mut self.velocity, self.damping, delta);
        self.offset != before
    }

    /// Index of the page closest to the current offset.
    pub fn current_page(&self) -> usize {
        (self.offset * (self.pages - 1) as f32).round() as usize
    }

    /// Panel shown on the current page, if that page has one.
    pub fn current_panel(&self) -> Option<&Panel> {
        self.panels.get(self.current_page())
    }

    /// Top edge of panel `index` relative to the window top, in pixels.
    pub fn panel_top(&self, index: usize, viewport_height: f32) -> f32 {
        let scrolled = self.offset * (self.pages - 1) as f32 * viewport_height;
        index as f32 * viewport_height - scrolled
    }
}

impl Default for ScrollControls {
    fn default() -> Self {
        Self::new(default_panels()).with_pages(DEFAULT_PAGES)
    }
}

/// Critically damped approach of `current` toward `target`.
///
/// Never overshoots. `velocity` carries state between calls.
fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, delta: f32) -> f32 {
    if (current - target).abs() <= SETTLE_EPSILON {
        *velocity = 0.0;
        return target;
    }

    let omega = 2.0 / smooth_time.max(1e-4);
    let x = omega * delta;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * delta;
    *velocity = (*velocity - omega * temp) * decay;
    let output = target + (change + temp) * decay;

    if (target > current) == (output > target) {
        *velocity = 0.0;
        return target;
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let scroll = ScrollControls::default();
        assert_eq!(scroll.pages(), 3);
        assert_eq!(scroll.damping(), 0.25);
        assert_eq!(scroll.panels().len(), 3);
        assert_eq!(scroll.current_panel().unwrap().style, PanelStyle::Title);
    }

    #[test]
    fn test_target_clamps() {
        let mut scroll = ScrollControls::default();
        scroll.scroll_by(-500.0, 600.0);
        assert_eq!(scroll.target(), 0.0);

        // Two scrollable pages of 600px.
        scroll.scroll_by(600.0, 600.0);
        assert!((scroll.target() - 0.5).abs() < 1e-6);

        scroll.scroll_by(10_000.0, 600.0);
        assert_eq!(scroll.target(), 1.0);
    }

    #[test]
    fn test_single_page_never_scrolls() {
        let mut scroll = ScrollControls::new(vec![Panel::title("only")]);
        scroll.scroll_by(300.0, 600.0);
        assert_eq!(scroll.target(), 0.0);
        assert_eq!(scroll.panel_top(0, 600.0), 0.0);
    }

    #[test]
    fn test_offset_damps_without_overshoot() {
        let mut scroll = ScrollControls::default();
        scroll.scroll_by(1_200.0, 600.0);

        let mut last = scroll.offset();
        for _ in 0..300 {
            scroll.update(1.0 / 60.0);
            assert!(scroll.offset() >= last);
            assert!(scroll.offset() <= 1.0);
            last = scroll.offset();
        }
        assert_eq!(scroll.offset(), 1.0);
        assert_eq!(scroll.current_page(), 2);
        assert!(!scroll.update(1.0 / 60.0));
    }

    #[test]
    fn test_zero_damping_snaps() {
        let mut scroll = ScrollControls::default().with_damping(0.0);
        scroll.scroll_by(600.0, 600.0);
        assert!(scroll.update(0.016));
        assert!((scroll.offset() - 0.5).abs() < 1e-6);
        assert_eq!(scroll.current_page(), 1);
    }

    #[test]
    fn test_panel_layout_follows_offset() {
        let mut scroll = ScrollControls::default().with_damping(0.0);
        assert_eq!(scroll.panel_top(1, 500.0), 500.0);

        scroll.scroll_by(500.0, 500.0);
        scroll.update(0.016);
        assert!(scroll.panel_top(1, 500.0).abs() < 1e-3);
        assert!((scroll.panel_top(0, 500.0) + 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_delta_holds_position() {
        let mut scroll = ScrollControls::default();
        scroll.scroll_by(600.0, 600.0);
        scroll.update(0.0);
        assert_eq!(scroll.offset(), 0.0);
    }
}
