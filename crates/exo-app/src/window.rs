//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]. It is the single
//! writer of the [`ViewModel`]: input events turn into selection and camera
//! commands, and every redraw advances the scene by the clamped frame time
//! before rendering it.

use std::sync::Arc;

use exo_catalog::{CatalogLoader, LoadRequest};
use exo_config::Config;
use exo_panel::DetailPanel;
use exo_render::{
    RenderContext, SceneFrame, SceneRenderer, SurfaceError, SurfaceWrapper,
    init_render_context_blocking,
};
use exo_view::{OrbitControls, Ray, ViewModel};
use glam::Vec2;
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::error::EventLoopError;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::frame_clock::FrameClock;
use crate::input::{PointerAction, PointerTracker};
use crate::overlay::{OverlayFrame, UiManager};
use crate::scene;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Everything the running viewer owns.
pub struct AppState {
    config: Config,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    renderer: Option<SceneRenderer>,
    ui: Option<UiManager>,
    surface_wrapper: SurfaceWrapper,
    clock: FrameClock,
    pointer: PointerTracker,
    view: ViewModel,
    loader: CatalogLoader,
    /// Panel for the selection it was built from.
    panel: Option<(usize, DetailPanel)>,
}

impl AppState {
    /// Build the viewer state and start loading the catalog in the background.
    pub fn new(config: Config) -> Self {
        let controls = OrbitControls::new(
            config.input.mouse_sensitivity,
            config.input.zoom_speed,
            config.input.invert_y,
        );
        let view = ViewModel::new(&config.viewer, controls);

        let loader = match CatalogLoader::spawn(LoadRequest::from_config(&config.catalog)) {
            Ok(loader) => loader,
            Err(e) => {
                error!("Could not start catalog loader: {e}");
                CatalogLoader::finished()
            }
        };

        Self {
            surface_wrapper: SurfaceWrapper::new(config.window.width, config.window.height, 1.0),
            config,
            window: None,
            gpu: None,
            renderer: None,
            ui: None,
            clock: FrameClock::new(),
            pointer: PointerTracker::new(),
            view,
            loader,
            panel: None,
        }
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    fn viewport(&self) -> Vec2 {
        let size = self.surface_wrapper.physical_size();
        Vec2::new(size.width as f32, size.height as f32)
    }

    fn fov_degrees(&self) -> f32 {
        self.config.render.fov_degrees
    }

    fn resize_surface(&mut self, width: u32, height: u32) {
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(&gpu.device, width, height);
            }
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
            debug!("Escape pressed, clearing selection");
            self.view.clear_selection();
        }
    }

    /// Route queued pointer actions to the camera and selection.
    fn apply_pointer_actions(&mut self) {
        let viewport = self.viewport();
        for action in self.pointer.drain_actions() {
            match action {
                PointerAction::DragStarted => self.view.begin_manipulation(),
                PointerAction::DragEnded => self.view.end_manipulation(),
                PointerAction::Rotate(delta) => {
                    self.view.controls_mut().rotate(delta, viewport.y);
                }
                PointerAction::Pan(delta) => {
                    let rig = *self.view.rig();
                    let fov_y = self.fov_degrees().to_radians();
                    self.view
                        .controls_mut()
                        .pan(&rig, delta, viewport.y, fov_y);
                }
                PointerAction::Zoom(notches) => self.view.controls_mut().zoom(notches),
                PointerAction::Click(cursor) => self.pick_at(cursor, viewport),
            }
        }
    }

    fn pick_at(&mut self, cursor: Vec2, viewport: Vec2) {
        let camera = scene::camera_for(self.view.rig(), self.fov_degrees(), viewport);
        let Some(ray) = Ray::from_cursor(
            cursor,
            viewport,
            camera.eye,
            camera.view_projection_matrix().inverse(),
        ) else {
            return;
        };
        match self.view.pick(&ray) {
            Some(index) => {
                if let Some(record) = self.view.selected_record() {
                    info!(index, "Selected {}", record.name);
                }
            }
            None => debug!("Click at ({:.0}, {:.0}) hit nothing", cursor.x, cursor.y),
        }
    }

    /// Rebuild the detail panel when the selection changes, otherwise animate it.
    fn sync_panel(&mut self, dt: f32) {
        let selected = self.view.selection().get();
        let current = self.panel.as_ref().map(|(index, _)| *index);
        if selected != current {
            self.panel = selected.zip(self.view.selected_record()).map(|(index, record)| {
                (index, DetailPanel::new(record, &mut rand::rng()))
            });
            return;
        }
        if let Some((_, panel)) = &mut self.panel {
            panel.advance(dt);
        }
    }

    /// One frame: absorb the catalog if it arrived, advance, then render.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(records) = self.loader.poll() {
            self.view.replace_records(records);
        }

        let dt = self.clock.tick();
        self.view.advance(dt);
        self.sync_panel(dt);

        let viewport = self.viewport();
        let camera = scene::camera_for(self.view.rig(), self.fov_degrees(), viewport);
        let bodies = scene::compose_bodies(&self.view);
        let labels = scene::project_labels(&camera, &scene::compose_labels(&self.view), viewport);

        let (Some(window), Some(gpu), Some(renderer)) =
            (&self.window, &mut self.gpu, &mut self.renderer)
        else {
            return;
        };

        match gpu.get_current_texture() {
            Ok(output) => {
                let target = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                let mut encoder = gpu
                    .device
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("frame-encoder"),
                    });

                renderer.render(
                    &gpu.device,
                    &gpu.queue,
                    &mut encoder,
                    &target,
                    &SceneFrame {
                        camera: &camera,
                        bodies: &bodies,
                    },
                );

                if let Some(ui) = &mut self.ui {
                    let overlay = OverlayFrame {
                        panel: self.panel.as_ref().map(|(_, panel)| panel),
                        labels: &labels,
                        fps: self.config.debug.show_fps.then(|| self.clock.fps()),
                        loading: self.loader.is_pending(),
                    };
                    ui.prepare(window, &overlay);
                    ui.render(&gpu.device, &gpu.queue, &mut encoder, &target);
                }

                gpu.queue.submit(std::iter::once(encoder.finish()));
                window.pre_present_notify();
                output.present();
            }
            Err(SurfaceError::Lost) => {
                let size = self.surface_wrapper.physical_size();
                gpu.resize(size.width, size.height);
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
            }
        }

        window.request_redraw();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let scale_factor = window.scale_factor();
        let inner_size = window.inner_size();
        self.surface_wrapper = SurfaceWrapper::new(inner_size.width, inner_size.height, scale_factor);
        info!(
            "Surface wrapper initialized: {}x{} (scale: {:.2})",
            inner_size.width, inner_size.height, scale_factor
        );

        let gpu = match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(gpu) => gpu,
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = self.surface_wrapper.physical_size();
        self.renderer = Some(SceneRenderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.surface_format,
            size.width,
            size.height,
            &self.config.render,
        ));
        self.ui = Some(UiManager::new(
            &gpu.device,
            &gpu.queue,
            gpu.surface_format,
            &window,
        ));
        self.gpu = Some(gpu);

        window.request_redraw();
        self.window = Some(window);
        self.clock.reset();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        // imgui sees every event first and may claim pointer or keyboard input.
        if let (Some(ui), Some(window)) = (&mut self.ui, &self.window)
            && ui.handle_event(window, window_id, &event)
        {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(resize) = self
                    .surface_wrapper
                    .handle_resize(new_size.width, new_size.height)
                {
                    self.resize_surface(resize.width, resize.height);
                    info!("Window resized to {}x{}", resize.width, resize.height);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let Some(window) = &self.window else {
                    return;
                };
                let inner = window.inner_size();
                if let Some(resize) = self.surface_wrapper.handle_scale_factor_changed(
                    scale_factor,
                    inner.width,
                    inner.height,
                ) {
                    self.resize_surface(resize.width, resize.height);
                    info!(
                        "Scale factor changed to {:.2}, resized to {}x{}",
                        scale_factor, resize.width, resize.height
                    );
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.pointer.set_shift(modifiers.state().shift_key());
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer.on_cursor_moved(position.x, position.y);
                self.apply_pointer_actions();
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.pointer.on_button(button, state);
                self.apply_pointer_actions();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.pointer.on_scroll(delta);
                self.apply_pointer_actions();
            }
            WindowEvent::Focused(false) | WindowEvent::CursorLeft { .. } => {
                self.pointer.cancel();
                self.apply_pointer_actions();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Creates an event loop and runs the viewer until the window closes.
#[instrument(skip_all)]
pub fn run(config: Config) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config);
    event_loop.run_app(&mut app)
}
