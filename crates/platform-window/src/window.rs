//! Window lifecycle: creation handshake, marshalled operations, shutdown.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver};
use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
};

use crate::backend::{Backend, Waker, WinitBackend};
use crate::config::WindowConfig;
use crate::error::{WindowError, WindowResult};
use crate::event::{CanonicalEvent, Size};
use crate::handshake;
use crate::native::NativeHandle;
use crate::pump::{Command, EventCallback, Pump, Sink};
use crate::shared::{Lifecycle, Shared};

const PUMP_THREAD_NAME: &str = "window-pump";

/// How canonical events reach the application.
pub enum Delivery {
    /// Invoked on the pump thread, once per canonical event. `NoEvent` is never
    /// passed to it.
    Callback(EventCallback),
    /// Buffered in a FIFO drained by [`PlatformWindow::wait_for_next_event`].
    Poll,
}

impl Delivery {
    pub fn callback<F>(f: F) -> Self
    where
        F: FnMut(CanonicalEvent) + Send + 'static,
    {
        Delivery::Callback(Box::new(f))
    }

    #[inline]
    pub fn poll() -> Self {
        Delivery::Poll
    }
}

impl std::fmt::Debug for Delivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delivery::Callback(_) => f.write_str("Delivery::Callback"),
            Delivery::Poll => f.write_str("Delivery::Poll"),
        }
    }
}

/// One native window and the thread that pumps its events.
///
/// Dropping the window performs the same blocking shutdown as [`destroy`].
///
/// [`destroy`]: PlatformWindow::destroy
pub struct PlatformWindow {
    shared: Arc<Shared>,
    native: NativeHandle,
    waker: Box<dyn Waker>,
    events: Option<Receiver<CanonicalEvent>>,
    thread: Option<JoinHandle<()>>,
}

impl PlatformWindow {
    /// Create a window on the default (winit) backend.
    pub fn create(config: WindowConfig, delivery: Delivery) -> WindowResult<Self> {
        Self::create_with(WinitBackend::new(), config, delivery)
    }

    /// Create a window on `backend`.
    ///
    /// Blocks until the pump thread has finished constructing the native
    /// window. On success the size cache already holds the real client size.
    pub fn create_with<B: Backend>(
        backend: B,
        config: WindowConfig,
        delivery: Delivery,
    ) -> WindowResult<Self> {
        let shared = Arc::new(Shared::new(&config));

        let (sink, events) = match delivery {
            Delivery::Callback(f) => (Sink::Callback(f), None),
            Delivery::Poll => {
                let (tx, rx) = unbounded();
                (Sink::Queue(tx), Some(rx))
            }
        };

        let pump = Pump::new(shared.clone(), sink);
        let (handshake, waiter) = handshake::pair::<B::Waker>(shared.clone());
        let backend_name = backend.name();

        log::debug!(
            "creating window \"{}\" on {} backend",
            config.title,
            backend_name
        );

        let thread = thread::Builder::new()
            .name(PUMP_THREAD_NAME.to_owned())
            .spawn(move || {
                if let Err(e) = backend.run(config, handshake, pump) {
                    log::error!("{} pump loop failed: {}", backend_name, e);
                }
            })?;

        let ready = match waiter.wait() {
            Ok(ready) => ready,
            Err(e) => {
                if thread.join().is_err() {
                    log::error!("{} pump thread panicked during construction", backend_name);
                }
                return Err(e);
            }
        };

        Ok(Self {
            shared,
            native: ready.native,
            waker: Box::new(ready.waker),
            events,
            thread: Some(thread),
        })
    }

    /// Stop the pump loop and join its thread.
    ///
    /// When this returns no further event is delivered. Reports
    /// [`WindowError::PumpPanicked`] if the pump thread unwound.
    ///
    /// Called from inside the event callback (on the pump thread itself) the
    /// loop is told to stop but cannot be joined; the state then stays at
    /// [`Lifecycle::ShutdownRequested`].
    pub fn destroy(mut self) -> WindowResult<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> WindowResult<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };

        self.shared.advance(Lifecycle::ShutdownRequested);
        if let Err(e) = self.waker.post(Command::Shutdown) {
            log::debug!("shutdown not posted: {}", e);
        }

        if thread.thread().id() == thread::current().id() {
            log::warn!("window destroyed from its own pump thread; not joining");
            return Ok(());
        }

        let joined = thread.join();
        self.shared.advance(Lifecycle::Joined);
        self.shared.advance(Lifecycle::Destroyed);
        log::info!("window \"{}\" destroyed", self.shared.title());

        joined.map_err(|_| {
            log::error!("pump thread panicked");
            WindowError::PumpPanicked
        })
    }

    /// Marshalled onto the pump thread; returns once enqueued.
    pub fn show(&self) -> WindowResult<()> {
        self.waker.post(Command::Show)
    }

    /// Marshalled onto the pump thread; returns once enqueued.
    pub fn hide(&self) -> WindowResult<()> {
        self.waker.post(Command::Hide)
    }

    /// Marshalled onto the pump thread; [`title`](Self::title) reflects the
    /// new value immediately.
    pub fn set_title(&self, title: &str) -> WindowResult<()> {
        self.shared.set_title(title);
        self.waker.post(Command::SetTitle(title.to_owned()))
    }

    /// Inject a `Custom` event, delivered in order with native events.
    pub fn post_custom(&self, code: i32, payload: usize) -> WindowResult<()> {
        self.waker.post(Command::Custom { code, payload })
    }

    /// Last known client size. Never touches the pump thread, so it is safe
    /// to call from inside an event callback.
    #[inline]
    pub fn size(&self) -> Size {
        self.shared.size()
    }

    #[inline]
    pub fn title(&self) -> String {
        self.shared.title()
    }

    #[inline]
    pub fn state(&self) -> Lifecycle {
        self.shared.lifecycle()
    }

    #[inline]
    pub fn native_handle(&self) -> NativeHandle {
        self.native
    }

    /// False once the pump has released the native window, e.g. after the
    /// session ended. The raw handle must not be used then.
    #[inline]
    pub fn is_native_alive(&self) -> bool {
        self.shared.native_alive()
    }

    #[inline]
    pub fn is_polling(&self) -> bool {
        self.events.is_some()
    }

    /// Block until the pump processes the next native message and return what
    /// it produced (`NoEvent` if nothing).
    ///
    /// Returns `QuitRequest` once the pump loop has exited. Callback-delivery
    /// windows have no queue and always get `NoEvent`.
    pub fn wait_for_next_event(&self) -> CanonicalEvent {
        match &self.events {
            Some(rx) => rx.recv().unwrap_or(CanonicalEvent::QuitRequest),
            None => {
                log::warn!("wait_for_next_event on a callback-delivery window");
                CanonicalEvent::NoEvent
            }
        }
    }

    /// Non-blocking variant of [`wait_for_next_event`](Self::wait_for_next_event).
    pub fn try_next_event(&self) -> Option<CanonicalEvent> {
        self.events.as_ref()?.try_recv().ok()
    }
}

impl Drop for PlatformWindow {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!("window shutdown on drop: {}", e);
        }
    }
}

impl std::fmt::Debug for PlatformWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformWindow")
            .field("native", &self.native)
            .field("state", &self.state())
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

impl HasWindowHandle for PlatformWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        if !self.shared.native_alive() {
            return Err(HandleError::Unavailable);
        }
        let raw = self.native.raw_window().ok_or(HandleError::NotSupported)?;
        // SAFETY: the pump clears `native_alive` before it releases the native
        // window, so the raw handle names a live window at this point.
        Ok(unsafe { WindowHandle::borrow_raw(raw) })
    }
}

impl HasDisplayHandle for PlatformWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        if !self.shared.native_alive() {
            return Err(HandleError::Unavailable);
        }
        let raw = self.native.raw_display().ok_or(HandleError::NotSupported)?;
        // SAFETY: the display connection is process-wide and outlives every
        // window opened on it.
        Ok(unsafe { DisplayHandle::borrow_raw(raw) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use parking_lot::Mutex;
    use std::sync::OnceLock;
    use std::time::Duration;

    #[test]
    fn destroy_from_the_callback_stops_at_shutdown_requested() {
        let (backend, inj) = HeadlessBackend::new();
        let slot: Arc<OnceLock<Mutex<Option<PlatformWindow>>>> = Arc::new(OnceLock::new());
        let (tx, rx) = unbounded();

        let handler_slot = slot.clone();
        let window = PlatformWindow::create_with(
            backend,
            WindowConfig::new("Test"),
            Delivery::callback(move |ev| {
                if ev != CanonicalEvent::QuitRequest {
                    return;
                }
                let Some(w) = handler_slot.get().and_then(|m| m.lock().take()) else {
                    return;
                };
                let shared = w.shared.clone();
                let result = w.destroy();
                let _ = tx.send((result.is_ok(), shared.lifecycle()));
            }),
        )
        .unwrap();
        let _ = slot.set(Mutex::new(Some(window)));

        inj.close().unwrap();
        let (ok, state) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(ok);
        assert_eq!(state, Lifecycle::ShutdownRequested);
    }
}
