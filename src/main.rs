//! Seaglow - a wave-displaced ocean under glowing area light panels
//!
//! Fly with WASD/Space/Shift, drag to look, arrows tune tessellation.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Fullscreen, Window, WindowId},
};

use seaglow::cli::Args;
use seaglow::input::{command_for_press, movement_for_key, Command};
use seaglow::params::{AssetPaths, RenderConfig};
use seaglow::rendering::{FrameMatrices, RenderSystem};
use seaglow::scene::{DragButton, SceneState};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation
    scene: SceneState,

    // Configuration
    assets: AssetPaths,
    render_config: RenderConfig,

    // Time tracking
    last_frame: Instant,
    failed: bool,
}

impl App {
    fn new(scene: SceneState, assets: AssetPaths, render_config: RenderConfig) -> Self {
        Self {
            window: None,
            render_system: None,
            scene,
            assets,
            render_config,
            last_frame: Instant::now(),
            failed: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, message: String) {
        log::error!("{}", message);
        self.failed = true;
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: KeyEvent) {
        let PhysicalKey::Code(key) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;

        if let Some(movement) = movement_for_key(key) {
            self.scene.set_movement(movement, pressed);
            return;
        }
        if !pressed {
            return;
        }

        match command_for_press(key, event.repeat) {
            Some(Command::Exit) => event_loop.exit(),
            Some(Command::ToggleFullscreen) => {
                if let Some(window) = &self.window {
                    let next = match window.fullscreen() {
                        Some(_) => None,
                        None => Some(Fullscreen::Borderless(None)),
                    };
                    log::info!("Fullscreen {}", if next.is_some() { "on" } else { "off" });
                    window.set_fullscreen(next);
                }
            }
            Some(command) => {
                self.scene.apply(command);
            }
            None => {}
        }
    }

    /// Advance the scene and draw one frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;

        let time_s = self.scene.update(dt);

        let aspect = render_system.aspect_ratio();
        let frame = FrameMatrices {
            view: self.scene.camera.view_matrix(),
            projection: self
                .scene
                .camera
                .projection_matrix(&self.render_config, aspect),
        };
        render_system.push_state(&self.scene, &frame, time_s);

        match render_system.render(&self.scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = render_system.size();
                render_system.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, "GPU out of memory".to_string());
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Seaglow")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, format!("Failed to create window: {}", e)),
        };

        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.scene,
            &self.assets,
            &self.render_config,
        )) {
            Ok(render_system) => render_system,
            Err(e) => return self.fail(event_loop, e.to_string()),
        };

        self.scene.set_features(render_system.features());
        log::info!(
            "Seaglow running: {} waves, {} light panels",
            self.scene.waves.len(),
            self.scene.light_panel_count()
        );

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.last_frame = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, event),
            WindowEvent::MouseInput { state, button, .. } => {
                let drag = match button {
                    MouseButton::Left => DragButton::Look,
                    MouseButton::Right => DragButton::Dolly,
                    _ => return,
                };
                self.scene.set_drag(drag, state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.scene.cursor_moved(position.x, position.y);
            }
            WindowEvent::Focused(false) => self.scene.release_all(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = args.scene_settings();

    let scene = match SceneState::load(&settings) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::new(scene, settings.assets, args.render_config());
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        return ExitCode::FAILURE;
    }

    if app.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
