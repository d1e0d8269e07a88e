//! Interactive window: one animation tick and one frame per redraw.
//!
//! # Controls
//!
//! | Input            | Action                       |
//! |------------------|------------------------------|
//! | Left drag        | Orbit the camera             |
//! | Right drag       | Pan the camera target        |
//! | Mouse wheel      | Zoom                         |
//! | `Space`          | Pause or resume the animation |
//! | `R`              | Reset the clock to zero      |
//! | `Escape`         | Quit                         |

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::KeyCode,
    window::{Window, WindowId},
};

use crate::animator::Animator;
use crate::config::SceneConfig;
use crate::error::{ConfigError, ViewerError};
use crate::gpu::{OrbitCamera, Renderer};
use crate::input::{Input, MouseButton};
use crate::scene::Scene;
use crate::time::FrameMeter;

/// A built scene plus its animator, ready to be shown in a window.
pub struct Viewer {
    config: SceneConfig,
    scene: Scene,
    animator: Animator,
}

impl Viewer {
    /// Validate `config` and build its scene, posed at time zero.
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut scene = Scene::from_config(&config);
        let animator = Animator::new(config.tick_step);
        animator.pose(&mut scene);
        Ok(Self {
            config,
            scene,
            animator,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Open the window and run until it is closed. This blocks.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct App {
    viewer: Viewer,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    camera: OrbitCamera,
    input: Input,
    meter: FrameMeter,
    /// First failure inside the event loop, returned once it exits.
    error: Option<ViewerError>,
}

impl App {
    fn new(viewer: Viewer) -> Self {
        let camera = OrbitCamera::from_config(&viewer.config.camera);
        Self {
            viewer,
            window: None,
            renderer: None,
            camera,
            input: Input::new(),
            meter: FrameMeter::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ViewerError) {
        log::error!("{}", error);
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let wc = &self.viewer.config.window;
        let window_attrs = Window::default_attributes()
            .with_title(wc.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(wc.width, wc.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let renderer = pollster::block_on(Renderer::new(
            window.clone(),
            &self.viewer.scene,
            &self.viewer.config,
        ))?;

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn apply_controls(&mut self, event_loop: &ActiveEventLoop) {
        if self.input.key_pressed(KeyCode::Escape) {
            event_loop.exit();
        }

        let clock = self.viewer.animator.clock_mut();
        if self.input.key_pressed(KeyCode::Space) {
            clock.toggle_pause();
            log::info!("Animation {}", if clock.is_paused() { "paused" } else { "resumed" });
        }
        if self.input.key_pressed(KeyCode::KeyR) {
            clock.reset();
            self.viewer.animator.pose(&mut self.viewer.scene);
            log::info!("Clock reset");
        }

        let drag = self.input.cursor_delta();
        if self.input.button_held(MouseButton::Left) {
            self.camera.rotate(drag.x, drag.y);
        }
        if self.input.button_held(MouseButton::Right) {
            self.camera.pan(drag.x, drag.y);
        }
        let scroll = self.input.scroll_delta();
        if scroll != 0.0 {
            self.camera.zoom(scroll);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.apply_controls(event_loop);
        self.input.begin_frame();
        self.camera.update();
        self.viewer.animator.tick(&mut self.viewer.scene);

        if let Some(renderer) = &mut self.renderer {
            match renderer.render(&self.viewer.scene, &self.camera) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory, exiting");
                    event_loop.exit();
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        if let Some(window) = &self.window {
            if self.meter.record() {
                let clock = self.viewer.animator.clock();
                window.set_title(&format!(
                    "{} | t = {:.1}s | {:.0} fps{}",
                    self.viewer.config.window.title,
                    clock.time(),
                    self.meter.fps(),
                    if clock.is_paused() { " | paused" } else { "" }
                ));
            }
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
