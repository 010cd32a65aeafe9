use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::config::WindowConfig;
use crate::event::Size;

/// Lifecycle of a window handle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lifecycle {
    /// Spawned; native construction not finished yet.
    Pending,
    Created,
    Running,
    ShutdownRequested,
    Joined,
    Destroyed,
}

/// State readable from any thread.
///
/// `size` is written only by the pump thread.
pub(crate) struct Shared {
    size: Mutex<Size>,
    title: Mutex<String>,
    lifecycle: Mutex<Lifecycle>,
    /// Set while the native window exists. Cleared by the pump thread before
    /// it releases the window.
    native_alive: AtomicBool,
}

impl Shared {
    pub(crate) fn new(config: &WindowConfig) -> Self {
        Self {
            size: Mutex::new(config.size()),
            title: Mutex::new(config.title.clone()),
            lifecycle: Mutex::new(Lifecycle::Pending),
            native_alive: AtomicBool::new(false),
        }
    }

    #[inline]
    pub(crate) fn size(&self) -> Size {
        *self.size.lock()
    }

    #[inline]
    pub(crate) fn set_size(&self, size: Size) {
        *self.size.lock() = size;
    }

    #[inline]
    pub(crate) fn title(&self) -> String {
        self.title.lock().clone()
    }

    #[inline]
    pub(crate) fn set_title(&self, title: &str) {
        let mut g = self.title.lock();
        g.clear();
        g.push_str(title);
    }

    #[inline]
    pub(crate) fn lifecycle(&self) -> Lifecycle {
        *self.lifecycle.lock()
    }

    #[inline]
    pub(crate) fn native_alive(&self) -> bool {
        self.native_alive.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn set_native_alive(&self, alive: bool) {
        self.native_alive.store(alive, Ordering::Release);
    }

    /// Move to `next` if it is later than the current state.
    pub(crate) fn advance(&self, next: Lifecycle) {
        let mut g = self.lifecycle.lock();
        if next > *g {
            log::debug!("window lifecycle: {:?} -> {:?}", *g, next);
            *g = next;
        }
    }
}
