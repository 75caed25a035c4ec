//! Backdrop builder and runner

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::color::{parse_color, DEFAULT_BACKGROUND_COLOR, DEFAULT_PARTICLE_COLOR};
use crate::error::BackdropError;
use crate::field::{ParticleField, DEFAULT_PARTICLE_COUNT};
use crate::frame::{FrameInput, ParallaxMode};
use crate::gpu::{GpuState, PointStyle};
use crate::input::Input;
use crate::scroll::{default_panels, Panel, ScrollControls, DEFAULT_DAMPING, DEFAULT_PAGES};
use crate::time::Time;

/// Default attenuated point size.
pub const DEFAULT_POINT_SIZE: f32 = 0.02;

/// A particle backdrop builder.
///
/// Use method chaining to configure, then call `.run()` to open the window.
#[derive(Debug, Clone)]
pub struct Backdrop {
    particle_count: u32,
    color: String,
    background: String,
    point_size: f32,
    parallax: ParallaxMode,
    panels: Vec<Panel>,
    pages: Option<usize>,
    damping: f32,
    title: String,
}

impl Backdrop {
    /// Create a backdrop with default settings.
    pub fn new() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            color: DEFAULT_PARTICLE_COLOR.to_string(),
            background: DEFAULT_BACKGROUND_COLOR.to_string(),
            point_size: DEFAULT_POINT_SIZE,
            parallax: ParallaxMode::default(),
            panels: default_panels(),
            pages: Some(DEFAULT_PAGES),
            damping: DEFAULT_DAMPING,
            title: "driftfield".to_string(),
        }
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Particle color as hex, a CSS color name, or an `rgb()`/`hsl()` form.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Clear color, same formats as [`Backdrop::with_color`].
    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = color.into();
        self
    }

    /// Attenuated point size; on-screen pixels are `size * (height / 2) / depth`.
    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    pub fn with_parallax_mode(mut self, mode: ParallaxMode) -> Self {
        self.parallax = mode;
        self
    }

    /// Replace the caption panels. The page count follows the panel count
    /// unless set with [`Backdrop::with_pages`].
    pub fn with_panels(mut self, panels: Vec<Panel>) -> Self {
        self.panels = panels;
        self.pages = None;
        self
    }

    pub fn with_pages(mut self, pages: usize) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Scroll smoothing time in seconds.
    pub fn with_scroll_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Resolve colors into a point style.
    pub fn point_style(&self) -> Result<PointStyle, BackdropError> {
        Ok(PointStyle {
            color: parse_color(&self.color)?,
            background: parse_color(&self.background)?,
            point_size: self.point_size,
        })
    }

    /// Scroll state for the configured panels.
    pub fn scroll_controls(&self) -> ScrollControls {
        let scroll = ScrollControls::new(self.panels.clone()).with_damping(self.damping);
        match self.pages {
            Some(pages) => scroll.with_pages(pages),
            None => scroll,
        }
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), BackdropError> {
        let style = self.point_style()?;
        let scroll = self.scroll_controls();

        log::info!("generating {} particles", self.particle_count);
        let field = ParticleField::new(self.particle_count).with_parallax_mode(self.parallax);

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(field, scroll, style, self.title);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    field: ParticleField,
    scroll: ScrollControls,
    input: Input,
    time: Time,
    style: PointStyle,
    title: String,
    shown_page: Option<usize>,
    /// Failure raised inside a callback, returned from `run`.
    error: Option<BackdropError>,
}

impl App {
    fn new(field: ParticleField, scroll: ScrollControls, style: PointStyle, title: String) -> Self {
        Self {
            window: None,
            gpu_state: None,
            field,
            scroll,
            input: Input::new(),
            time: Time::new(),
            style,
            title,
            shown_page: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), BackdropError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        log::info!("window created at {}x{}", size.width, size.height);
        self.input.set_window_size(size.width, size.height);
        self.input.set_scale_factor(window.scale_factor());

        let gpu_state = pollster::block_on(GpuState::new(
            window.clone(),
            self.field.buffer(),
            self.style,
        ))?;

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        self.time = Time::new();
        Ok(())
    }

    /// Tick the clock, animate, and draw.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };

        let delta = self.time.update();
        if let Some(fps) = self.time.take_fps_sample() {
            log::debug!("frame {}: {:.1} fps", self.time.frame(), fps);
        }
        let viewport = gpu_state.camera.viewport_extent(gpu_state.aspect());
        self.field
            .advance(&FrameInput::new(delta, self.input.pointer(), viewport));

        let height = gpu_state.config.height as f32;
        self.scroll.scroll_by(self.input.scroll_delta(), height);
        self.scroll.update(delta);
        self.input.end_frame();

        gpu_state.upload_particles(self.field.buffer_mut());

        match gpu_state.render(self.field.rotation().model_matrix(), &self.scroll) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("render error: {:?}", e),
        }

        self.sync_title();
    }

    /// Name the visible panel in the window title when it changes.
    fn sync_title(&mut self) {
        let page = self.scroll.current_page();
        if self.shown_page == Some(page) {
            return;
        }
        self.shown_page = Some(page);
        log::debug!("showing page {}", page);

        // The overlay draws the captions itself.
        if cfg!(feature = "egui") {
            return;
        }
        if let Some(window) = &self.window {
            match self.scroll.current_panel() {
                Some(panel) => window.set_title(&format!("{} - {}", self.title, panel.text)),
                None => window.set_title(&self.title),
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("{}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        if let Some(gpu_state) = &mut self.gpu_state {
            gpu_state.on_window_event(&event);
        }

        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
