use std::sync::Arc;

use futures::executor::LocalPool;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use super::Viewport;
use crate::controller::RoomController;
use crate::frame::FrameIterator;
use crate::input::WinitController;
use crate::xr::{XrBootstrap, XrRuntime};

// === Constants ===

const INITIAL_WINDOW_WIDTH: u32 = 800;
const INITIAL_WINDOW_HEIGHT: u32 = 600;
const STATUS_INTERVAL: f64 = 5.0;

struct App {
    window: Option<Arc<Window>>,
    viewport: Option<Viewport>,
    controller: RoomController,
    input: WinitController,
    frames: FrameIterator,
    pool: LocalPool,
    xr: Option<XrBootstrap>,
    status_timer: f64,
}

impl App {
    fn new(controller: RoomController, runtime: Option<Box<dyn XrRuntime>>) -> Self {
        let pool = LocalPool::new();
        let xr = runtime.and_then(|runtime| {
            match XrBootstrap::spawn(&pool.spawner(), runtime, controller.xr_request()) {
                Ok(bootstrap) => Some(bootstrap),
                Err(e) => {
                    log::warn!("Failed to start XR bootstrap: {}", e);
                    None
                }
            }
        });

        Self {
            window: None,
            viewport: None,
            controller,
            input: WinitController::new(INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT),
            frames: FrameIterator::new(),
            pool,
            xr,
            status_timer: 0.0,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(viewport) = &mut self.viewport {
            viewport.resize(width, height);
        }
        self.input.set_viewport(width, height);
        self.controller.resize(width, height);
    }

    fn redraw(&mut self) {
        let Some(frame) = self.frames.next() else {
            return;
        };
        self.controller.tick(&frame);
        self.pool.run_until_stalled();

        self.status_timer += frame.delta;
        if self.status_timer >= STATUS_INTERVAL {
            self.status_timer = 0.0;
            log::info!(
                "Frame {}: reveal {}, {} interpolations running",
                frame.number,
                self.controller.reveal_state(),
                self.controller.animator().interpolations().len()
            );
        }

        let clear = self.controller.scene().clear_color;
        let Some(viewport) = &mut self.viewport else {
            return;
        };
        match viewport.render(clear) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = viewport.size();
                viewport.resize(w, h);
            }
            Err(e) => log::warn!("Render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Puzzle Room")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    INITIAL_WINDOW_WIDTH,
                    INITIAL_WINDOW_HEIGHT,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let viewport = match pollster::block_on(Viewport::new(window.clone())) {
            Ok(viewport) => viewport,
            Err(e) => {
                log::error!("Failed to initialize viewport: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = viewport.size();
        self.viewport = Some(viewport);
        self.window = Some(window);
        self.resize(width, height);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::RedrawRequested => self.redraw(),
            other => {
                if let Some(input) = self.input.process_event(&other) {
                    self.controller.handle_input(input);
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(xr) = &self.xr {
            if !xr.is_finished() {
                xr.abort();
                self.pool.run_until_stalled();
            }
        }
        log::info!("Exiting after {} frames", self.controller.frames());
    }
}

/// Open a window and run the room until it is closed
pub fn run_windowed(controller: RoomController, runtime: Option<Box<dyn XrRuntime>>) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(controller, runtime);

    println!("Puzzle Room - Controls: WASD, Space/Shift, Q/E to turn, click the box, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
