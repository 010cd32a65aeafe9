//! One-shot construction handshake between `create` and the pump thread.
//!
//! The pump thread completes it exactly once, after the native window exists
//! (or failed to). If the pump thread unwinds or returns without completing,
//! dropping the [`Handshake`] reports [`WindowError::PumpExited`], so the
//! creating thread never blocks forever.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::error::{WindowError, WindowResult};
use crate::event::Size;
use crate::native::NativeHandle;
use crate::shared::{Lifecycle, Shared};

/// What a backend hands back once its native window is live.
pub struct Ready<W> {
    pub native: NativeHandle,
    pub waker: W,
    /// Client size actually obtained from the OS.
    pub size: Size,
}

struct Slot<W> {
    result: Mutex<Option<WindowResult<Ready<W>>>>,
    cond: Condvar,
}

/// Pump-thread side.
pub struct Handshake<W> {
    slot: Option<Arc<Slot<W>>>,
    shared: Arc<Shared>,
}

/// Creating-thread side.
pub(crate) struct Waiter<W> {
    slot: Arc<Slot<W>>,
}

pub(crate) fn pair<W>(shared: Arc<Shared>) -> (Handshake<W>, Waiter<W>) {
    let slot = Arc::new(Slot {
        result: Mutex::new(None),
        cond: Condvar::new(),
    });
    (
        Handshake {
            slot: Some(slot.clone()),
            shared,
        },
        Waiter { slot },
    )
}

impl<W> Handshake<W> {
    /// Publish the construction outcome. Later calls are ignored.
    pub fn complete(&mut self, result: WindowResult<Ready<W>>) {
        let Some(slot) = self.slot.take() else {
            return;
        };

        match &result {
            Ok(ready) => {
                self.shared.set_size(ready.size);
                self.shared.set_native_alive(true);
                self.shared.advance(Lifecycle::Created);
            }
            Err(e) => log::error!("window construction failed: {}", e),
        }

        *slot.result.lock() = Some(result);
        slot.cond.notify_all();
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.slot.is_none()
    }
}

impl<W> Drop for Handshake<W> {
    fn drop(&mut self) {
        if !self.is_complete() {
            self.complete(Err(WindowError::PumpExited));
        }
    }
}

impl<W> Waiter<W> {
    /// Block until the pump thread completes the handshake.
    pub(crate) fn wait(self) -> WindowResult<Ready<W>> {
        let mut g = self.slot.result.lock();
        loop {
            if let Some(result) = g.take() {
                return result;
            }
            self.slot.cond.wait(&mut g);
        }
    }
}
