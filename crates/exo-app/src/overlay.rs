//! Dear ImGui overlay: the detail panel, body labels and status text.
//!
//! [`UiManager`] owns the imgui context and its winit/wgpu backends. The
//! overlay runs in physical pixels (`HiDpiMode::Locked(1.0)`), the same space
//! [`crate::scene::project_labels`] produces, and renders on top of the
//! tonemapped scene with `LoadOp::Load`.

use std::time::Instant;

use exo_panel::DetailPanel;
use imgui::{Condition, Context, FontConfig, FontSource, MouseCursor, StyleVar, Ui, WindowFlags};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use tracing::{error, warn};
use winit::event::{Event, WindowEvent};
use winit::window::{Window, WindowId};

use crate::scene::ScreenLabel;

/// Base font size in logical pixels.
const FONT_SIZE: f32 = 15.0;
/// Panel distance from the top-left corner, in logical pixels.
const PANEL_MARGIN: f32 = 4.0;
const PANEL_BG_ALPHA: f32 = 0.55;
/// Label column width, in font-size multiples.
const LABEL_COLUMN: f32 = 15.0;

const LABEL_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const FIELD_COLOR: [f32; 4] = [0.55, 0.8, 1.0, 1.0];
const TITLE_COLOR: [f32; 4] = [1.0, 0.85, 0.4, 1.0];
const STATUS_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 1.0];

/// What the overlay shows this frame.
pub struct OverlayFrame<'a> {
    pub panel: Option<&'a DetailPanel>,
    pub labels: &'a [ScreenLabel],
    /// `Some` when the FPS readout is enabled.
    pub fps: Option<f32>,
    /// The catalog has not arrived yet.
    pub loading: bool,
}

pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
    scale: f32,
}

impl UiManager {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        output_color_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        let scale = window.scale_factor() as f32;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: (FONT_SIZE * scale).round(),
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
            scale,
        }
    }

    /// Feed a window event to imgui. Returns `true` if imgui wants the input
    /// for itself, in which case the scene should not see it.
    pub fn handle_event(&mut self, window: &Window, window_id: WindowId, event: &WindowEvent) -> bool {
        let is_input = matches!(
            event,
            WindowEvent::CursorMoved { .. }
                | WindowEvent::MouseInput { .. }
                | WindowEvent::MouseWheel { .. }
                | WindowEvent::KeyboardInput { .. }
                | WindowEvent::ModifiersChanged(_)
                | WindowEvent::Focused(_)
        );
        let tracks_size = matches!(
            event,
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. }
        );
        if !is_input && !tracks_size {
            return false;
        }

        let ui_event: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        self.platform
            .handle_event(self.context.io_mut(), window, &ui_event);

        let io = self.context.io();
        is_input && (io.want_capture_mouse || io.want_capture_keyboard)
    }

    /// Start a frame and build the overlay.
    pub fn prepare(&mut self, window: &Window, frame: &OverlayFrame<'_>) {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(e) = self.platform.prepare_frame(self.context.io_mut(), window) {
            warn!("imgui prepare_frame failed: {e}");
        }

        let scale = self.scale;
        let ui = self.context.frame();
        draw_overlay(ui, frame, scale);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }
    }

    /// Render the frame built by [`prepare`](Self::prepare) over `target`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("overlay-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(e) = self.renderer.render(draw_data, queue, device, &mut pass) {
            error!("Failed to render overlay: {e}");
        }
    }
}

fn draw_overlay(ui: &Ui, frame: &OverlayFrame<'_>, scale: f32) {
    draw_labels(ui, frame.labels);
    if let Some(panel) = frame.panel {
        draw_panel(ui, panel, scale);
    }

    let [width, height] = ui.io().display_size;
    let draw_list = ui.get_foreground_draw_list();
    let margin = PANEL_MARGIN * scale;
    if let Some(fps) = frame.fps {
        let text = format!("{fps:.0} fps");
        let size = ui.calc_text_size(&text);
        draw_list.add_text([width - size[0] - margin, margin], STATUS_COLOR, &text);
    }
    if frame.loading {
        let text = "Loading catalog...";
        let size = ui.calc_text_size(text);
        draw_list.add_text([margin, height - size[1] - margin], STATUS_COLOR, text);
    }
}

/// Names centred just above their anchors.
fn draw_labels(ui: &Ui, labels: &[ScreenLabel]) {
    let draw_list = ui.get_foreground_draw_list();
    for label in labels {
        let [w, h] = ui.calc_text_size(&label.text);
        draw_list.add_text(
            [label.position.x - w * 0.5, label.position.y - h],
            LABEL_COLOR,
            &label.text,
        );
    }
}

fn draw_panel(ui: &Ui, panel: &DetailPanel, scale: f32) {
    let opacity = panel.opacity();
    if opacity <= 0.0 {
        return;
    }
    let margin = PANEL_MARGIN * scale;
    let value_column = LABEL_COLUMN * FONT_SIZE * scale;

    ui.window("##exoplanet-detail")
        .position([margin, margin + panel.offset_y() * scale], Condition::Always)
        .bg_alpha(PANEL_BG_ALPHA * opacity)
        .flags(
            WindowFlags::NO_DECORATION
                | WindowFlags::ALWAYS_AUTO_RESIZE
                | WindowFlags::NO_MOVE
                | WindowFlags::NO_SAVED_SETTINGS
                | WindowFlags::NO_FOCUS_ON_APPEARING
                | WindowFlags::NO_NAV
                | WindowFlags::NO_INPUTS,
        )
        .build(|| {
            let _panel_alpha = ui.push_style_var(StyleVar::Alpha(opacity));
            ui.text_colored(TITLE_COLOR, panel.title());
            ui.separator();

            for row in panel.rows() {
                if row.opacity <= 0.0 {
                    continue;
                }
                let [x, y] = ui.cursor_pos();
                ui.set_cursor_pos([x, y + row.offset_y * scale]);
                let _row_alpha = ui.push_style_var(StyleVar::Alpha(opacity * row.opacity));
                ui.text_colored(FIELD_COLOR, &row.label);
                ui.same_line_with_pos(value_column);
                ui.text(&row.value);
            }
        });
}
