//! Display-less backend.
//!
//! A crossbeam channel stands in for the native message queue. The paired
//! [`HeadlessInjector`] plays the part of the OS: it pushes native messages from
//! any thread and can inspect what the pump did to the "native" window.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use winit::keyboard::KeyCode as Scancode;

use crate::backend::{Backend, Waker};
use crate::config::WindowConfig;
use crate::error::{WindowError, WindowResult};
use crate::event::{ButtonId, Size};
use crate::handshake::{Handshake, Ready};
use crate::input::PointerCapture;
use crate::native::NativeHandle;
use crate::pump::{Command, Flow, NativeMessage, NativeSurface, Pump};
use crate::translate::KeyInput;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Native-side state of a headless window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceState {
    pub visible: bool,
    pub title: String,
    pub captured: bool,
    pub grabs: u32,
    pub releases: u32,
}

pub struct HeadlessBackend {
    rx: Receiver<NativeMessage>,
    tx: Sender<NativeMessage>,
    surface: Arc<Mutex<SurfaceState>>,
    fail: Option<String>,
}

impl HeadlessBackend {
    pub fn new() -> (Self, HeadlessInjector) {
        let (tx, rx) = unbounded();
        let surface = Arc::new(Mutex::new(SurfaceState::default()));
        let injector = HeadlessInjector {
            tx: tx.clone(),
            surface: surface.clone(),
        };
        (
            Self {
                rx,
                tx,
                surface,
                fail: None,
            },
            injector,
        )
    }

    /// A backend whose native window construction always fails.
    pub fn failing(reason: impl Into<String>) -> (Self, HeadlessInjector) {
        let (mut backend, injector) = Self::new();
        backend.fail = Some(reason.into());
        (backend, injector)
    }
}

pub struct HeadlessWaker {
    tx: Sender<NativeMessage>,
}

impl Waker for HeadlessWaker {
    fn post(&self, cmd: Command) -> WindowResult<()> {
        self.tx
            .send(NativeMessage::Command(cmd))
            .map_err(|_| WindowError::PumpTerminated)
    }
}

struct HeadlessSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl PointerCapture for HeadlessSurface {
    fn grab_pointer(&mut self) {
        let mut s = self.state.lock();
        s.captured = true;
        s.grabs += 1;
    }

    fn release_pointer(&mut self) {
        let mut s = self.state.lock();
        s.captured = false;
        s.releases += 1;
    }
}

impl NativeSurface for HeadlessSurface {
    fn show(&mut self) {
        self.state.lock().visible = true;
    }

    fn hide(&mut self) {
        self.state.lock().visible = false;
    }

    fn set_title(&mut self, title: &str) {
        self.state.lock().title = title.to_owned();
    }
}

impl Backend for HeadlessBackend {
    type Waker = HeadlessWaker;

    fn name(&self) -> &'static str {
        "headless"
    }

    fn run(
        self,
        config: WindowConfig,
        mut handshake: Handshake<HeadlessWaker>,
        mut pump: Pump,
    ) -> WindowResult<()> {
        let HeadlessBackend {
            rx,
            tx,
            surface,
            fail,
        } = self;

        if let Some(reason) = fail {
            handshake.complete(Err(WindowError::WindowCreation(reason)));
            return Ok(());
        }

        {
            let mut s = surface.lock();
            s.visible = config.visible;
            s.title = config.title.clone();
        }
        let mut native = HeadlessSurface { state: surface };
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);

        log::info!("headless window {} created: \"{}\"", id, config.title);
        handshake.complete(Ok(Ready {
            native: NativeHandle::Headless(id),
            waker: HeadlessWaker { tx },
            size: config.size(),
        }));
        pump.enter_loop();

        for msg in rx.iter() {
            if pump.dispatch(msg, &mut native) == Flow::Exit {
                break;
            }
        }

        pump.retire_native();
        log::debug!("headless window {} loop exited", id);
        Ok(())
    }
}

/// Test/driver side of a headless window. Cloneable and usable from any thread.
#[derive(Clone)]
pub struct HeadlessInjector {
    tx: Sender<NativeMessage>,
    surface: Arc<Mutex<SurfaceState>>,
}

impl HeadlessInjector {
    /// Push one raw native message. Fails once the pump loop is gone.
    pub fn send(&self, msg: NativeMessage) -> WindowResult<()> {
        self.tx.send(msg).map_err(|_| WindowError::PumpTerminated)
    }

    pub fn resize(&self, width: u32, height: u32) -> WindowResult<()> {
        self.send(NativeMessage::Resized(Size::new(width, height)))
    }

    pub fn move_cursor(&self, x: i32, y: i32) -> WindowResult<()> {
        self.send(NativeMessage::CursorMoved { x, y })
    }

    pub fn press(&self, button: ButtonId) -> WindowResult<()> {
        self.send(NativeMessage::Button {
            button,
            pressed: true,
        })
    }

    pub fn release(&self, button: ButtonId) -> WindowResult<()> {
        self.send(NativeMessage::Button {
            button,
            pressed: false,
        })
    }

    pub fn wheel(&self, angle_degrees: f32) -> WindowResult<()> {
        self.send(NativeMessage::Wheel { angle_degrees })
    }

    pub fn key(&self, input: KeyInput, pressed: bool) -> WindowResult<()> {
        self.send(NativeMessage::Key { input, pressed })
    }

    /// Key identified only by its physical position.
    pub fn scancode(&self, code: Scancode, pressed: bool) -> WindowResult<()> {
        self.key(KeyInput::physical(code), pressed)
    }

    pub fn lose_capture(&self) -> WindowResult<()> {
        self.send(NativeMessage::CaptureLost)
    }

    pub fn close(&self) -> WindowResult<()> {
        self.send(NativeMessage::CloseRequested)
    }

    pub fn end_session(&self) -> WindowResult<()> {
        self.send(NativeMessage::SessionEnded)
    }

    /// Unrecognized native traffic.
    pub fn noise(&self) -> WindowResult<()> {
        self.send(NativeMessage::Other)
    }

    #[inline]
    pub fn surface(&self) -> SurfaceState {
        self.surface.lock().clone()
    }
}
