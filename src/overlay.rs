//! Caption panels painted over the particle field.
//!
//! Only compiled with the `egui` feature.

use std::sync::Arc;

use winit::window::Window;

use crate::scroll::ScrollControls;

/// Egui state that owns the caption layer of the window.
pub struct Overlay {
    window: Arc<Window>,
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// Tessellated captions for one frame.
struct PaintedPanels {
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

impl Overlay {
    pub fn new(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        window: Arc<Window>,
    ) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        // Drawn straight onto the swapchain image: no depth, no MSAA, no dithering.
        let renderer = egui_wgpu::Renderer::new(device, output_format, None, 1, false);

        Self {
            window,
            ctx,
            state,
            renderer,
        }
    }

    /// Track size and scale changes. The captions take no input.
    pub fn on_window_event(&mut self, event: &winit::event::WindowEvent) {
        let _ = self.state.on_window_event(&self.window, event);
    }

    fn paint(&mut self, scroll: &ScrollControls) -> PaintedPanels {
        let raw_input = self.state.take_egui_input(&self.window);
        let full_output = self.ctx.run(raw_input, |ctx| draw_panels(ctx, scroll));
        self.state
            .handle_platform_output(&self.window, full_output.platform_output);

        PaintedPanels {
            paint_jobs: self
                .ctx
                .tessellate(full_output.shapes, full_output.pixels_per_point),
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        }
    }

    /// Paint the captions at their scrolled position on top of `view`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        scroll: &ScrollControls,
    ) {
        let panels = self.paint(scroll);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: panels.pixels_per_point,
        };

        for (id, image_delta) in &panels.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &panels.paint_jobs,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.renderer
                .render(&mut render_pass, &panels.paint_jobs, &screen_descriptor);
        }

        for id in &panels.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

/// Paint every panel that intersects the window at its scrolled position.
pub fn draw_panels(ctx: &egui::Context, scroll: &ScrollControls) {
    let screen = ctx.screen_rect();
    let height = screen.height();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("scroll_panels"),
    ));

    for (index, panel) in scroll.panels().iter().enumerate() {
        let top = screen.top() + scroll.panel_top(index, height);
        if top + height < screen.top() || top > screen.bottom() {
            continue;
        }
        painter.text(
            egui::pos2(screen.center().x, top + height / 2.0),
            egui::Align2::CENTER_CENTER,
            &panel.text,
            egui::FontId::proportional(panel.style.font_size()),
            egui::Color32::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::Panel;

    fn painted_shapes(scroll: &ScrollControls) -> usize {
        let ctx = egui::Context::default();
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(800.0, 600.0),
            )),
            ..Default::default()
        };
        ctx.run(input, |ctx| draw_panels(ctx, scroll)).shapes.len()
    }

    #[test]
    fn test_first_panel_painted_at_rest() {
        assert!(painted_shapes(&ScrollControls::default()) >= 1);
    }

    #[test]
    fn test_no_panels_paint_nothing() {
        assert_eq!(painted_shapes(&ScrollControls::new(Vec::new())), 0);
    }

    #[test]
    fn test_far_panels_skipped() {
        let panels = (0..10).map(|i| Panel::subtitle(format!("page {}", i))).collect();
        let scroll = ScrollControls::new(panels);
        // Only the first two panels touch an 800x600 window at offset 0.
        assert_eq!(painted_shapes(&scroll), 2);
    }
}
