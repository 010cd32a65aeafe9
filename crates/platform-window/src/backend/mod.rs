//! Native backends.
//!
//! A backend owns the OS event loop. It runs entirely on the pump thread: it
//! builds the native window, completes the construction handshake, then feeds
//! every native message (and every posted [`Command`]) through
//! [`Pump::dispatch`] until told to exit.

pub mod headless;
pub mod winit;

use crate::config::WindowConfig;
use crate::error::WindowResult;
use crate::handshake::Handshake;
use crate::pump::{Command, Pump};

pub use self::headless::{HeadlessBackend, HeadlessInjector, SurfaceState};
pub use self::winit::WinitBackend;

/// Cross-thread wake channel into a running pump loop.
pub trait Waker: Send + Sync + 'static {
    /// Enqueue `cmd` for the pump thread. Returns once enqueued; fails with
    /// [`crate::WindowError::PumpTerminated`] when the loop is already gone.
    fn post(&self, cmd: Command) -> WindowResult<()>;
}

pub trait Backend: Send + 'static {
    type Waker: Waker;

    fn name(&self) -> &'static str;

    /// Runs on the pump thread and returns when the loop exits.
    ///
    /// Must complete `handshake` before dispatching anything. Errors after the
    /// handshake are only logged by the caller.
    fn run(self, config: WindowConfig, handshake: Handshake<Self::Waker>, pump: Pump)
        -> WindowResult<()>;
}
