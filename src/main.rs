use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use gridcaster::config::Config;
use gridcaster::renderer::{self, Canvas, ViewMode};
use gridcaster::scaler::{ScaleLut, blit_nearest_stretch, build_scale_lut};
use gridcaster::{Camera, TileMap, cast_rays};

struct App {
    config: Config,
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    map: TileMap,
    camera: Camera,
    view: ViewMode,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Internal buffer, one column per ray
    fb_small: Vec<u32>,
    fb_w: usize,
    fb_h: usize,

    scale_lut: ScaleLut,

    // Input
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
    tick_backlog: Duration,
}

impl App {
    fn new(config: Config, map: TileMap) -> Self {
        let camera = Camera::new(config.start_pos, config.start_dir, config.start_plane);
        let (fb_w, fb_h) = (config.screen_width, config.screen_height);

        Self {
            config,
            window: None,
            surface: None,
            map,
            camera,
            view: ViewMode::TopDown,

            frame_counter: 0,
            last_fps_print: Instant::now(),

            fb_small: vec![0; fb_w * fb_h],
            fb_w,
            fb_h,

            scale_lut: ScaleLut::empty(),

            keys_down: HashSet::new(),
            last_tick: Instant::now(),
            tick_backlog: Duration::ZERO,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let (win_w, win_h) = self.config.window_size();
        let attributes = Window::default_attributes()
            .with_title("Gridcaster")
            .with_inner_size(LogicalSize::new(win_w as f64, win_h as f64));

        let window = match event_loop.create_window(attributes) {
            Ok(w) => Rc::new(w),
            Err(e) => {
                error!("cannot create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        let surface = match surface {
            Ok(s) => s,
            Err(e) => {
                error!("cannot create softbuffer surface: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.scale_lut =
            build_scale_lut(size.width as usize, size.height as usize, self.fb_w, self.fb_h);
        info!(
            "window {}x{}, internal {}x{}, fov {:.1} deg",
            size.width,
            size.height,
            self.fb_w,
            self.fb_h,
            self.camera.fov_degrees()
        );

        self.surface = Some(surface);
        self.last_tick = Instant::now();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    if !repeat {
                        self.on_key_press(code, event_loop);
                    }
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                self.tick();

                let (window, surface) = match (&self.window, &mut self.surface) {
                    (Some(w), Some(s)) if w.id() == id => (w, s),
                    _ => return,
                };

                let size = window.inner_size();
                let (Some(nw), Some(nh)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                else {
                    return; // Minimized window, skip drawing
                };
                if let Err(e) = surface.resize(nw, nh) {
                    error!("surface resize failed: {e}");
                    return;
                }

                let hits = match cast_rays(&self.camera, &self.map, self.fb_w) {
                    Ok(hits) => hits,
                    Err(e) => {
                        warn!("raycast skipped: {e}");
                        Vec::new()
                    }
                };

                let mut canvas = Canvas::new(&mut self.fb_small, self.fb_w, self.fb_h);
                match self.view {
                    ViewMode::TopDown => renderer::render_top_down(
                        &mut canvas,
                        &self.map,
                        &self.camera,
                        &hits,
                        self.config.cell_size,
                    ),
                    ViewMode::FirstPerson => renderer::render_columns(&mut canvas, &hits),
                }

                let mut buf = match surface.buffer_mut() {
                    Ok(buf) => buf,
                    Err(e) => {
                        error!("cannot map surface buffer: {e}");
                        return;
                    }
                };
                let dw = size.width as usize;
                blit_nearest_stretch(&mut buf, dw, &self.fb_small, &self.scale_lut);
                if let Err(e) = buf.present() {
                    error!("present failed: {e}");
                }

                // Log FPS
                self.frame_counter += 1;
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
                if elapsed >= 1.0 {
                    info!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
                    self.frame_counter = 0;
                    self.last_fps_print = now;
                }

                window.request_redraw();
            }

            WindowEvent::Resized(new_size) => {
                self.scale_lut = build_scale_lut(
                    new_size.width as usize,
                    new_size.height as usize,
                    self.fb_w,
                    self.fb_h,
                );
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl App {
    fn on_key_press(&mut self, code: KeyCode, event_loop: &ActiveEventLoop) {
        match code {
            KeyCode::Escape => {
                info!("escape pressed; stopping");
                event_loop.exit();
            }
            KeyCode::Tab => {
                self.view = self.view.toggled();
                info!("view mode: {:?}", self.view);
            }
            _ => (),
        }
    }

    fn held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.keys_down.contains(k))
    }

    /// Run the fixed-rate input steps that fell due since the last frame.
    fn tick(&mut self) {
        // Cap the backlog to avoid huge jumps if the app was paused
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).min(Duration::from_millis(100));
        self.last_tick = now;
        self.tick_backlog += dt;

        let step = Duration::from_secs_f64(1.0 / self.config.tick_hz);
        while self.tick_backlog >= step {
            self.tick_backlog -= step;
            self.apply_input();
        }
    }

    fn apply_input(&mut self) {
        let turn = self.config.turn_step;
        if self.held(&[KeyCode::ArrowLeft, KeyCode::KeyA]) {
            self.camera = self.camera.rotated(-turn);
        }
        if self.held(&[KeyCode::ArrowRight, KeyCode::KeyD]) {
            self.camera = self.camera.rotated(turn);
        }

        let mut distance = 0.0;
        if self.held(&[KeyCode::ArrowUp, KeyCode::KeyW]) {
            distance += self.config.move_step;
        }
        if self.held(&[KeyCode::ArrowDown, KeyCode::KeyS]) {
            distance -= self.config.move_step;
        }
        if distance != 0.0 {
            let next = self.camera.moved(distance);
            if self.map.is_open_at(next.pos) {
                self.camera = next;
            } else {
                debug!("move to ({:.2}, {:.2}) blocked", next.pos.x, next.pos.y);
            }
        }
    }
}

fn main() {
    let config = Config::default();
    if let Err(e) = simple_logging::log_to_file(&config.log_file, config.log_level) {
        eprintln!("cannot open log file {}: {e}", config.log_file);
    }
    info!("starting gridcaster");

    let map = TileMap::demo();
    if !map.is_enclosed() {
        warn!("map border is open; rays may escape");
    }

    let event_loop = match EventLoop::new() {
        Ok(el) => el,
        Err(e) => {
            error!("cannot create event loop: {e}");
            return;
        }
    };

    // Poll: keep redrawing even without input, input steps are time based
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, map);
    if let Err(e) = event_loop.run_app(&mut app) {
        error!("event loop failed: {e}");
    }
    info!("gridcaster finished");
}
