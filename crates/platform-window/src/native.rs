use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

/// Immutable native identity of a window.
///
/// The value never changes for the lifetime of the owning `PlatformWindow`,
/// but the native window may go away first (session end). Check
/// `PlatformWindow::is_native_alive` before handing it to native code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeHandle {
    Raw {
        window: RawWindowHandle,
        display: RawDisplayHandle,
    },
    /// Window of the headless backend; has no OS resource behind it.
    Headless(u64),
}

// SAFETY: the handle is an opaque identifier and this crate never dereferences
// it. Whether the window it names still exists is tracked separately; see
// `PlatformWindow::is_native_alive`.
unsafe impl Send for NativeHandle {}
unsafe impl Sync for NativeHandle {}

impl NativeHandle {
    #[inline]
    pub fn raw_window(&self) -> Option<RawWindowHandle> {
        match self {
            NativeHandle::Raw { window, .. } => Some(*window),
            NativeHandle::Headless(_) => None,
        }
    }

    #[inline]
    pub fn raw_display(&self) -> Option<RawDisplayHandle> {
        match self {
            NativeHandle::Raw { display, .. } => Some(*display),
            NativeHandle::Headless(_) => None,
        }
    }
}
