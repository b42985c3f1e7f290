//! Landing page scene viewer.
//! Run with: `cargo run --bin landing`
//!
//! Hosts the procedural landscape behind the panel deck: pointer moves
//! drive camera parallax, wheel/swipe/keys drive panel navigation.
//!
//! Controls:
//! - Mouse move: camera parallax
//! - Scroll / swipe: previous or next panel
//! - Up/Down arrows: previous or next panel
//! - 1-6: jump straight to a panel
//! - ESC: Exit

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use overlook_engine::assets::SpriteStore;
use overlook_engine::camera::ParallaxCamera;
use overlook_engine::panels::{PanelNavigator, PanelSet};
use overlook_engine::render::{capped_surface_size, GpuContext, GpuContextConfig, Renderer};
use overlook_engine::scene::Scene;

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct AppState {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: Renderer,
    scene: Scene,
    camera: ParallaxCamera,
    sprites: SpriteStore,
    navigator: PanelNavigator,
    start_time: Instant,
    /// y of the most recent touch-down, pending the release
    touch_start_y: Option<f32>,
}

impl AppState {
    fn new(window: Arc<Window>) -> Self {
        let gpu = GpuContext::new(Arc::clone(&window), GpuContextConfig::default());

        let camera = ParallaxCamera::new();
        let scene = Scene::compose(&camera, gpu.aspect());
        let mut sprites = SpriteStore::new(&gpu.device, &gpu.queue, ".");
        sprites.poll(&gpu.device, &gpu.queue);

        let renderer = Renderer::new(&gpu, &scene, sprites.layout());

        let panels = PanelSet::builtin().expect("built-in panel data is malformed");
        let navigator = PanelNavigator::new(panels);

        Self {
            window,
            gpu,
            renderer,
            scene,
            camera,
            sprites,
            navigator,
            start_time: Instant::now(),
            touch_start_y: None,
        }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let (width, height) =
            capped_surface_size(new_size.width, new_size.height, self.window.scale_factor());
        self.gpu.resize(width, height);
        self.renderer.resize(&self.gpu);
        self.scene.reflow(self.gpu.aspect());
    }

    fn handle_pointer(&mut self, x: f64, y: f64) {
        let (width, height) = self.gpu.dimensions();
        let size = self.window.inner_size();
        // Normalize against the window, not the capped surface.
        let (w, h) = if size.width > 0 && size.height > 0 {
            (size.width as f64, size.height as f64)
        } else {
            (width.max(1) as f64, height.max(1) as f64)
        };
        let nx = (x / w) * 2.0 - 1.0;
        let ny = (y / h) * 2.0 - 1.0;
        self.camera.set_pointer(nx as f32, ny as f32);
    }

    fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        // Match browser convention: scrolling up is a negative delta.
        let delta_y = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * 40.0,
            MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
        };
        if let Some(index) = self.navigator.handle_wheel(delta_y, Instant::now()) {
            self.log_panel(index);
        }
    }

    fn handle_touch(&mut self, phase: TouchPhase, y: f32) {
        match phase {
            TouchPhase::Started => self.touch_start_y = Some(y),
            TouchPhase::Ended => {
                if let Some(start_y) = self.touch_start_y.take() {
                    if let Some(index) = self.navigator.handle_swipe(start_y, y, Instant::now()) {
                        self.log_panel(index);
                    }
                }
            }
            TouchPhase::Cancelled => self.touch_start_y = None,
            TouchPhase::Moved => {}
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let index = match key {
            KeyCode::ArrowDown => Some(self.navigator.advance()),
            KeyCode::ArrowUp => Some(self.navigator.retreat()),
            KeyCode::Digit1 => Some(self.navigator.select(0, Instant::now())),
            KeyCode::Digit2 => Some(self.navigator.select(1, Instant::now())),
            KeyCode::Digit3 => Some(self.navigator.select(2, Instant::now())),
            KeyCode::Digit4 => Some(self.navigator.select(3, Instant::now())),
            KeyCode::Digit5 => Some(self.navigator.select(4, Instant::now())),
            KeyCode::Digit6 => Some(self.navigator.select(5, Instant::now())),
            _ => None,
        };
        if let Some(index) = index {
            self.log_panel(index);
        }
    }

    fn log_panel(&self, index: usize) {
        if let Some(panel) = self.navigator.panels().get(index) {
            println!("[Landing] panel {} - {}", index, panel.title);
        }
    }

    fn update(&mut self) {
        if !self.sprites.all_resolved() {
            self.sprites.poll(&self.gpu.device, &self.gpu.queue);
        }
        let sprites = &self.sprites;
        self.scene.update_prop_scales(|kind| sprites.aspect(kind));
        self.camera.tick();
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let t = self.start_time.elapsed().as_secs_f32();
        self.renderer
            .render(&self.gpu, &self.scene, &self.camera, &self.sprites, t)
    }
}

// ============================================================================
// APPLICATION HANDLER
// ============================================================================

struct App {
    state: Option<AppState>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        println!("[Landing] Creating window...");
        let window_attrs = WindowAttributes::default()
            .with_title("Overlook")
            .with_inner_size(PhysicalSize::new(1280, 800));

        let window = Arc::new(event_loop.create_window(window_attrs).unwrap());
        let state = AppState::new(window);
        state.log_panel(state.navigator.active_index());
        self.state = Some(state);
        println!("[Landing] Ready. Scroll or use Up/Down to browse panels.");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                state.resize(new_size);
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.handle_pointer(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                state.handle_scroll(delta);
            }
            WindowEvent::Touch(touch) => {
                state.handle_touch(touch.phase, touch.location.y as f32);
            }
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if key == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
                state.handle_key(key);
            }
            WindowEvent::RedrawRequested => {
                state.update();

                match state.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let size = state.window.inner_size();
                        state.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                    Err(e) => eprintln!("Render error: {:?}", e),
                }

                state.window.request_redraw();
            }
            _ => {}
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    println!("=== Overlook Landing Page ===");

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App { state: None };
    event_loop.run_app(&mut app).unwrap();
}
