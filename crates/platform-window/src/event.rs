use crate::key::KeyCode;

/// Canonical mouse button set.
///
/// The discriminant doubles as an index into per-button state, and the
/// ascending order is the order synthesized releases are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ButtonId {
    Left = 0,
    Right = 1,
    Unknown = 2,
}

impl ButtonId {
    pub const COUNT: usize = 3;
    pub const ALL: [ButtonId; Self::COUNT] = [ButtonId::Left, ButtonId::Right, ButtonId::Unknown];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl From<winit::event::MouseButton> for ButtonId {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => ButtonId::Left,
            winit::event::MouseButton::Right => ButtonId::Right,
            _ => ButtonId::Unknown,
        }
    }
}

/// Client-area size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Size {
    #[inline]
    fn from(s: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(s.width, s.height)
    }
}

/// Platform-independent window/input event.
///
/// Wheel and key events carry no pointer coordinates. Button events carry the
/// last cursor position the pump observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanonicalEvent {
    /// A native message that has no canonical counterpart.
    NoEvent,
    /// The user or the session asked the window to close.
    QuitRequest,
    Resized {
        width: u32,
        height: u32,
    },
    MouseMove {
        x: i32,
        y: i32,
    },
    MouseButton {
        button: ButtonId,
        pressed: bool,
        x: i32,
        y: i32,
    },
    /// Positive values scroll away from the user.
    MouseWheel {
        angle_degrees: f32,
    },
    Key {
        key: KeyCode,
        pressed: bool,
    },
    /// Caller-defined event posted through `PlatformWindow::post_custom`.
    Custom {
        code: i32,
        payload: usize,
    },
}

impl CanonicalEvent {
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, CanonicalEvent::NoEvent)
    }
}

impl Default for CanonicalEvent {
    fn default() -> Self {
        CanonicalEvent::NoEvent
    }
}
