use thiserror::Error;

pub type WindowResult<T> = Result<T, WindowError>;

/// Failures reported by window construction and the pump channel.
///
/// Construction failures are reported exactly once, from `PlatformWindow::create`.
/// Nothing is retried internally.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("native display connection unavailable: {0}")]
    DisplayUnavailable(String),

    #[error("event loop error: {0}")]
    EventLoop(String),

    #[error("native window creation failed: {0}")]
    WindowCreation(String),

    #[error("failed to spawn pump thread: {0}")]
    ThreadSpawn(#[from] std::io::Error),

    #[error("pump thread exited before the window was constructed")]
    PumpExited,

    #[error("pump thread has terminated")]
    PumpTerminated,

    #[error("pump thread panicked")]
    PumpPanicked,

    #[error("config error: {0}")]
    Config(String),
}

impl From<winit::error::EventLoopError> for WindowError {
    fn from(e: winit::error::EventLoopError) -> Self {
        match e {
            winit::error::EventLoopError::Os(os) => Self::DisplayUnavailable(os.to_string()),
            other => Self::EventLoop(other.to_string()),
        }
    }
}

impl From<winit::error::OsError> for WindowError {
    fn from(e: winit::error::OsError) -> Self {
        Self::WindowCreation(e.to_string())
    }
}
