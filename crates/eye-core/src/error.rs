use thiserror::Error;

/// Failures reading or validating a JSON record (shared face state or
/// engine settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid face state: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Fatal errors: the render loop cannot continue without a presentable
/// surface.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("No compatible graphics adapter found")]
    NoAdapter,

    #[error("Device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("Settings error: {0}")]
    Settings(#[from] ConfigError),
}
