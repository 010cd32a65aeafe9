pub mod backend;
pub mod config;
pub mod error;
pub mod event;
pub mod handshake;
pub mod input;
pub mod key;
pub mod native;
pub mod pump;
pub mod shared;
pub mod translate;
pub mod window;

pub use crate::backend::{Backend, HeadlessBackend, HeadlessInjector, SurfaceState, WinitBackend};
pub use crate::config::WindowConfig;
pub use crate::error::{WindowError, WindowResult};
pub use crate::event::{ButtonId, CanonicalEvent, Size};
pub use crate::key::KeyCode;
pub use crate::native::NativeHandle;
pub use crate::shared::Lifecycle;
pub use crate::translate::{translate, KeyInput};
pub use crate::window::{Delivery, PlatformWindow};
