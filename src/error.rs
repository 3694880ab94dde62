//! Error types.
//!
//! Scene, camera and primitive code cannot fail. Everything here comes from
//! standing up the window and GPU, or from acquiring a frame.

use thiserror::Error;

/// Everything that can go wrong outside the scene model.
#[derive(Error, Debug)]
pub enum FigurineError {
    /// No window, no adapter, no device, or a shader/pipeline that would not build.
    /// Fatal at startup.
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// The window's surface could not be created.
    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// No compatible GPU adapter.
    #[error("Failed to request adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    /// Device creation failed.
    #[error("Failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// A frame could not be acquired from the surface.
    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    /// The window system rejected us.
    #[error("Window error: {0}")]
    Window(#[from] winit::error::OsError),

    /// The event loop could not start or exited with an error.
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

pub type Result<T> = std::result::Result<T, FigurineError>;
