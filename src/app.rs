use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::camera::{Camera, Rect};
use crate::color::Rgba;
use crate::error::{FigurineError, Result};
use crate::flat_pass::FlatPass;
use crate::gpu::GpuContext;
use crate::input::{Input, InputAction};
use crate::scene::Scene;

/// When the driver draws a new frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RedrawMode {
    /// Redraw every tick. Drags only change angles; the next tick shows them.
    #[default]
    Continuous,
    /// Sleep until input changes something, or while the animation runs.
    OnInput,
}

/// Configuration for the viewer window.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub redraw_mode: RedrawMode,
    /// Zoom change per wheel line.
    pub zoom_sensitivity: f32,
    pub clear_color: Rgba,
    pub axes: bool,
    /// WGSL replacing the built-in flat shader.
    pub shader: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Figurine".to_string(),
            width: 800,
            height: 800,
            redraw_mode: RedrawMode::Continuous,
            zoom_sensitivity: 0.1,
            clear_color: Rgba::new(0.0, 0.0, 0.0, 1.0),
            axes: true,
            shader: None,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn redraw_mode(mut self, mode: RedrawMode) -> Self {
        self.redraw_mode = mode;
        self
    }

    pub fn zoom_sensitivity(mut self, per_line: f32) -> Self {
        self.zoom_sensitivity = per_line;
        self
    }

    /// Background color; RGB on the 0–255 scale, alpha 0–1.
    pub fn clear_color(mut self, color: Rgba) -> Self {
        self.clear_color = color;
        self
    }

    /// Overrides the scene's debug-axes setting.
    pub fn axes(mut self, show: bool) -> Self {
        self.axes = show;
        self
    }

    pub fn shader(mut self, source: impl Into<String>) -> Self {
        self.shader = Some(source.into());
        self
    }
}

/// Applies one input action to the scene. Returns whether anything visible changed.
///
/// Pixel positions are mapped into the ±1 frame of a viewport of the given size.
pub fn apply_action(scene: &mut Scene, action: InputAction, viewport: Vec2) -> bool {
    let to_frame = |p: Vec2| {
        Camera::pointer_to_frame(
            p.x,
            p.y,
            Rect::sized(viewport.x, viewport.y),
            viewport.x,
            viewport.y,
        )
    };
    match action {
        InputAction::BeginDrag(p) => {
            scene.begin_drag(to_frame(p));
            false
        }
        InputAction::DragTo(p) => scene.drag_to(to_frame(p)),
        InputAction::EndDrag => {
            scene.end_drag();
            false
        }
        InputAction::PointerEnter(p) => scene.pointer_enter(to_frame(p)),
        InputAction::SetAnimating(on) => {
            let changed = scene.is_animating() != on;
            scene.set_animating(on);
            changed
        }
    }
}

/// Whether the driver should ask for another frame after handling an event.
///
/// `changed` says the event altered something visible.
pub fn wants_redraw(mode: RedrawMode, animating: bool, changed: bool) -> bool {
    match mode {
        RedrawMode::Continuous => true,
        RedrawMode::OnInput => changed || animating,
    }
}

/// Open a window with default configuration and show the scene until it closes.
///
/// # Example
/// ```no_run
/// let scene = figurine::Scene::with_parts(figurine::creature());
/// figurine::run(scene).unwrap();
/// ```
pub fn run(scene: Scene) -> Result<()> {
    run_with_config(AppConfig::default(), scene)
}

/// Open a window with custom configuration.
///
/// Startup failures (no window, adapter or device, or a shader that does not build)
/// are returned once the event loop has exited.
///
/// # Example
/// ```no_run
/// use figurine::{AppConfig, RedrawMode, Scene};
///
/// figurine::run_with_config(
///     AppConfig::new().title("Creature").redraw_mode(RedrawMode::OnInput),
///     Scene::with_parts(figurine::creature()),
/// )
/// .unwrap();
/// ```
pub fn run_with_config(config: AppConfig, scene: Scene) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(match config.redraw_mode {
        RedrawMode::Continuous => ControlFlow::Poll,
        RedrawMode::OnInput => ControlFlow::Wait,
    });

    let scene = scene.axes(config.axes);
    let mut app = Driver {
        state: DriverState::Pending { config, scene },
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct Driver {
    state: DriverState,
    error: Option<FigurineError>,
}

enum DriverState {
    Pending {
        config: AppConfig,
        scene: Scene,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        pass: FlatPass,
        scene: Scene,
        input: Input,
        config: AppConfig,
        start_time: Instant,
    },
    Exited,
}

fn start(
    event_loop: &ActiveEventLoop,
    config: AppConfig,
    scene: Scene,
) -> Result<DriverState> {
    let window_attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

    let window = Arc::new(event_loop.create_window(window_attrs)?);
    let gpu = GpuContext::new(window.clone())?;
    let mut pass = match &config.shader {
        Some(source) => FlatPass::with_shader(&gpu, source)?,
        None => FlatPass::new(&gpu)?,
    };
    pass.set_clear_color(config.clear_color.normalized());

    log::info!(
        "showing {} parts, redraw mode {:?}",
        scene.len(),
        config.redraw_mode
    );
    window.request_redraw();

    Ok(DriverState::Running {
        window,
        gpu,
        pass,
        scene,
        input: Input::new(),
        config,
        start_time: Instant::now(),
    })
}

impl ApplicationHandler for Driver {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, DriverState::Pending { .. }) {
            return;
        }
        let DriverState::Pending { config, scene } =
            std::mem::replace(&mut self.state, DriverState::Exited)
        else {
            return;
        };

        match start(event_loop, config, scene) {
            Ok(running) => self.state = running,
            Err(err) => {
                log::error!("startup failed: {err}");
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let DriverState::Running {
            window,
            gpu,
            pass,
            scene,
            input,
            config,
            start_time,
        } = &mut self.state
        else {
            return;
        };

        let viewport = Vec2::new(gpu.width() as f32, gpu.height() as f32);
        let mut changed = false;
        if let Some(action) = input.handle_event(&event) {
            changed = apply_action(scene, action, viewport);
        }
        if input.has_scroll() {
            changed = true;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
                pass.ensure_depth_size(gpu);
                changed = true;
            }
            WindowEvent::RedrawRequested => {
                let elapsed_ms = start_time.elapsed().as_secs_f64() * 1000.0;
                let zoom_delta = input.take_zoom_delta(config.zoom_sensitivity);
                scene.draw(pass, elapsed_ms as f32, zoom_delta);

                match pass.present(gpu) {
                    Ok(()) => {}
                    Err(FigurineError::Surface(
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                    )) => {
                        log::debug!("surface lost, reconfiguring");
                        gpu.reconfigure();
                    }
                    Err(FigurineError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                        log::error!("out of GPU memory");
                        event_loop.exit();
                        return;
                    }
                    Err(err) => log::warn!("frame skipped: {err}"),
                }
            }
            _ => {}
        }

        if wants_redraw(config.redraw_mode, scene.is_animating(), changed) {
            window.request_redraw();
        }
    }
}
