//! winit application: owns the window and GPU state, forwards input to
//! [`ViewerState`] and renders once per redraw.

use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result};
use asset::shapes;
use corelib::fps::title_with_fps;
use rand::{SeedableRng, rngs::StdRng};
use renderer::GpuState;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{
    controller::{Effect, ViewerState},
    input::action_for_key,
    stage::{POLYGON_RADIUS, ViewerOptions},
};

pub struct Viewer {
    options: ViewerOptions,
    state: ViewerState,
    rng: StdRng,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    last_frame: Instant,
    error: Option<anyhow::Error>,
}

impl Viewer {
    pub fn new(options: ViewerOptions) -> Self {
        Self {
            state: ViewerState::new(&options),
            options,
            rng: StdRng::from_entropy(),
            window: None,
            gpu: None,
            last_frame: Instant::now(),
            error: None,
        }
    }

    /// Error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.options.title.clone())
            .with_inner_size(PhysicalSize::new(self.options.width, self.options.height))
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Failed to create window")?,
        );
        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        if self.state.flags.mouse_look {
            grab_cursor(&window);
        }

        let mut gpu = pollster::block_on(GpuState::new(window.clone(), self.options.backends))?;

        let scene = self.options.build_scene(&mut self.rng);
        if scene.is_empty() {
            log::warn!("Stage '{}' has nothing to draw", self.state.stage);
        }
        gpu.load_scene(&scene);

        self.state.resize(size.width, size.height);
        self.last_frame = Instant::now();
        self.window = Some(window);
        self.gpu = Some(gpu);
        Ok(())
    }

    fn apply(&mut self, effect: Effect, event_loop: &ActiveEventLoop) {
        match effect {
            Effect::None => {}
            Effect::Exit => {
                log::info!("Exit requested");
                event_loop.exit();
            }
            Effect::SetPrimitive(primitive) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.set_primitive(primitive);
                }
            }
            Effect::RebuildPolygon(count) => {
                let mesh = shapes::polygon(count, POLYGON_RADIUS, &mut self.rng);
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.replace_mesh(0, &mesh);
                }
            }
        }
    }

    fn on_key(&mut self, event: &KeyEvent, event_loop: &ActiveEventLoop) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        match event.state {
            ElementState::Pressed => {
                self.state.held.press(code);
                if event.repeat {
                    return;
                }
                if let Some(action) = action_for_key(code) {
                    let effect = self.state.handle_action(action);
                    self.apply(effect, event_loop);
                }
            }
            ElementState::Released => self.state.held.release(code),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let update = self.state.update(dt);
        let (Some(window), Some(gpu)) = (self.window.as_ref(), self.gpu.as_mut()) else {
            return;
        };
        if let (Some(fps), true) = (update.fps, self.options.show_fps) {
            window.set_title(&title_with_fps(&self.options.title, fps));
        }
        if let Some(model) = update.model {
            gpu.set_model_matrix(0, model);
        }

        match gpu.render(&self.state.frame_params()) {
            Ok(()) => {}
            Err(e) if GpuState::is_surface_lost(&e) => {
                log::warn!("Surface lost/outdated: reconfiguring");
                gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Transient surface error: {e:?}"),
        }
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Initialisation failed: {e:#}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                self.state.resize(size.width, size.height);
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(false) => self.state.held.clear(),
            WindowEvent::KeyboardInput { event, .. } => self.on_key(&event, event_loop),
            WindowEvent::CursorMoved { position, .. } => {
                let height = self.gpu.as_ref().map_or(self.options.height, |g| g.size().1);
                let effect = self.state.handle_cursor_y(position.y, height);
                self.apply(effect, event_loop);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.state.handle_mouse_motion(dx, dy);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Hides the cursor and keeps it inside the window for mouse look.
fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    if let Err(e) = grabbed {
        log::warn!("Cursor grab unavailable: {e}");
    }
    window.set_cursor_visible(false);
}
