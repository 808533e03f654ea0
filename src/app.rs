//! Window, event loop and the per-frame driver.

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalSize, Size},
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Fullscreen, Window, WindowAttributes, WindowId},
};

use crate::{
    config::AppConfig,
    error::{Result, SceneError},
    gfx::{rendering::RenderEngine, scene::Scene},
    input::InputState,
    performance::{FramePacer, PerformanceMonitor},
};

pub struct ChaddApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    input: InputState,
    pacer: FramePacer,
    monitor: PerformanceMonitor,
    /// First fatal error raised inside the event loop
    fatal: Option<SceneError>,
}

impl ChaddApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let event_loop = EventLoop::new()?;

        let scene = Scene::from_config(&config, config.window.width, config.window.height);
        let pacer = FramePacer::new(config.window.target_fps);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                scene,
                input: InputState::new(),
                pacer,
                monitor: PerformanceMonitor::new(),
                fatal: None,
            },
        })
    }

    /// Runs until the window closes or Escape is pressed.
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn window_attributes(&self, event_loop: &ActiveEventLoop) -> WindowAttributes {
        let window = &self.config.window;
        let mut attributes = WindowAttributes::default()
            .with_title(window.title.clone())
            .with_inner_size(Size::Physical(PhysicalSize::new(window.width, window.height)));

        if window.fullscreen {
            attributes =
                attributes.with_fullscreen(Some(Fullscreen::Borderless(event_loop.primary_monitor())));
        }
        attributes
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Arc::new(event_loop.create_window(self.window_attributes(event_loop))?);

        window.set_cursor_visible(false);
        if let Err(e) = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
        {
            log::warn!("Could not grab cursor: {}", e);
        }

        let (width, height) = window.inner_size().into();
        let mut renderer = pollster::block_on(RenderEngine::new(window.clone(), width, height))?;
        renderer.prepare_scene(&mut self.scene, &self.config)?;
        self.scene.resize(width, height);

        log::info!("Window ready: {}x{}", width, height);
        self.window = Some(window);
        self.render_engine = Some(renderer);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SceneError) {
        log::error!("{}", error);
        self.fatal.get_or_insert(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        // Nothing to pace until the renderer exists
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        let dt = self.pacer.begin_frame();
        let frame = self.input.take_frame();
        if frame.quit {
            event_loop.exit();
            return;
        }

        self.scene.update(&frame, dt);

        let stats = render_engine.render_frame(&self.scene);
        self.monitor
            .update_render_stats(stats.draw_calls, stats.instances);

        let frame_time = self.pacer.end_frame();
        self.monitor.record_frame(frame_time);
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(error) = self.init_graphics(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.input.process_keyboard_event(&event);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.process_scroll(&delta);
            }
            WindowEvent::Focused(false) => {
                self.input.release_all();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                self.scene.resize(width, height);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.process_mouse_motion(delta);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
