//! winit 0.30 backend.
//!
//! winit allows one event loop per process, so a single process-lifetime
//! thread runs it for every window. Each window keeps its own pump thread: the
//! loop thread routes native events by `WindowId` into that window's channel,
//! and the pump thread blocks on the channel.

use std::collections::HashMap;
use std::hash::Hash;
use std::io;
use std::sync::{Arc, OnceLock};
use std::thread;

use crossbeam_channel::{bounded, unbounded, Sender};
use parking_lot::Mutex;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

use crate::backend::{Backend, Waker};
use crate::config::WindowConfig;
use crate::error::{WindowError, WindowResult};
use crate::event::Size;
use crate::handshake::{Handshake, Ready};
use crate::input::PointerCapture;
use crate::native::NativeHandle;
use crate::pump::{Command, Flow, NativeMessage, NativeSurface, Pump};
use crate::translate::KeyInput;

/// Degrees of rotation reported for one wheel detent (one line).
pub const DEGREES_PER_LINE: f32 = 15.0;
/// Pixel scroll distance treated as one line.
pub const PIXELS_PER_LINE: f64 = 20.0;

const LOOP_THREAD_NAME: &str = "winit-loop";

#[derive(Debug, Default, Clone, Copy)]
pub struct WinitBackend;

impl WinitBackend {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

/// Posts straight into the window's own message channel; the winit loop is
/// not involved.
pub struct WinitWaker {
    tx: Sender<NativeMessage>,
}

impl Waker for WinitWaker {
    fn post(&self, cmd: Command) -> WindowResult<()> {
        self.tx
            .send(NativeMessage::Command(cmd))
            .map_err(|_| WindowError::PumpTerminated)
    }
}

impl Backend for WinitBackend {
    type Waker = WinitWaker;

    fn name(&self) -> &'static str {
        "winit"
    }

    fn run(
        self,
        config: WindowConfig,
        mut handshake: Handshake<WinitWaker>,
        mut pump: Pump,
    ) -> WindowResult<()> {
        let host = match shared_loop() {
            Ok(host) => host,
            Err(e) => {
                handshake.complete(Err(e));
                return Ok(());
            }
        };

        let (tx, rx) = unbounded();
        let window = match host.open(&config, tx.clone()) {
            Ok(window) => window,
            Err(e) => {
                handshake.complete(Err(e));
                return Ok(());
            }
        };

        let native = match native_handle(&window) {
            Ok(native) => native,
            Err(e) => {
                host.release(window);
                handshake.complete(Err(e));
                return Ok(());
            }
        };
        let size = Size::from(window.inner_size());

        log::info!(
            "window created: \"{}\" {}x{}",
            config.title,
            size.width,
            size.height
        );
        handshake.complete(Ok(Ready {
            native,
            waker: WinitWaker { tx },
            size,
        }));
        pump.enter_loop();

        let mut surface = WinitSurface { window };
        for msg in rx.iter() {
            if pump.dispatch(msg, &mut surface) == Flow::Exit {
                break;
            }
        }

        pump.retire_native();
        host.release(surface.window);
        Ok(())
    }
}

fn native_handle(window: &Window) -> WindowResult<NativeHandle> {
    Ok(NativeHandle::Raw {
        window: window
            .window_handle()
            .map_err(|e| WindowError::WindowCreation(e.to_string()))?
            .as_raw(),
        display: window
            .display_handle()
            .map_err(|e| WindowError::WindowCreation(e.to_string()))?
            .as_raw(),
    })
}

/// Requests handled on the loop thread.
enum LoopRequest {
    Open {
        config: WindowConfig,
        events: Sender<NativeMessage>,
        reply: Sender<WindowResult<Arc<Window>>>,
    },
    /// Stop routing to this window and drop it on the loop thread.
    Release(Arc<Window>),
}

/// Why the shared loop could not start. Kept so every later `create` reports
/// the same cause.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StartFailure {
    Display(String),
    EventLoop(String),
    Spawn(String),
}

impl From<WindowError> for StartFailure {
    fn from(e: WindowError) -> Self {
        match e {
            WindowError::DisplayUnavailable(msg) => StartFailure::Display(msg),
            other => StartFailure::EventLoop(other.to_string()),
        }
    }
}

impl From<&StartFailure> for WindowError {
    fn from(f: &StartFailure) -> Self {
        match f {
            StartFailure::Display(msg) => WindowError::DisplayUnavailable(msg.clone()),
            StartFailure::EventLoop(msg) => WindowError::EventLoop(msg.clone()),
            StartFailure::Spawn(msg) => WindowError::ThreadSpawn(io::Error::other(msg.clone())),
        }
    }
}

struct LoopHost {
    proxy: Mutex<EventLoopProxy<LoopRequest>>,
}

impl LoopHost {
    fn post(&self, req: LoopRequest) -> WindowResult<()> {
        self.proxy
            .lock()
            .send_event(req)
            .map_err(|_| WindowError::EventLoop("winit event loop has stopped".into()))
    }

    /// Create a window on the loop thread and start routing its events to `events`.
    fn open(
        &self,
        config: &WindowConfig,
        events: Sender<NativeMessage>,
    ) -> WindowResult<Arc<Window>> {
        let (reply, answer) = bounded(1);
        self.post(LoopRequest::Open {
            config: config.clone(),
            events,
            reply,
        })?;
        answer
            .recv()
            .map_err(|_| WindowError::EventLoop("winit event loop has stopped".into()))?
    }

    fn release(&self, window: Arc<Window>) {
        if let Err(e) = self.post(LoopRequest::Release(window)) {
            log::debug!("window released off the loop thread: {}", e);
        }
    }
}

fn shared_loop() -> WindowResult<&'static LoopHost> {
    static LOOP: OnceLock<Result<LoopHost, StartFailure>> = OnceLock::new();
    LOOP.get_or_init(start_loop)
        .as_ref()
        .map_err(WindowError::from)
}

fn start_loop() -> Result<LoopHost, StartFailure> {
    let (tx, rx) = bounded(1);

    thread::Builder::new()
        .name(LOOP_THREAD_NAME.to_owned())
        .spawn(move || {
            let event_loop = match build_event_loop() {
                Ok(el) => el,
                Err(e) => {
                    let _ = tx.send(Err(StartFailure::from(e)));
                    return;
                }
            };
            let _ = tx.send(Ok(event_loop.create_proxy()));

            let mut app = LoopApp::default();
            if let Err(e) = event_loop.run_app(&mut app) {
                log::error!("winit event loop stopped: {}", e);
            }
        })
        .map_err(|e| StartFailure::Spawn(e.to_string()))?;

    match rx.recv() {
        Ok(Ok(proxy)) => {
            log::debug!("winit event loop running on \"{}\"", LOOP_THREAD_NAME);
            Ok(LoopHost {
                proxy: Mutex::new(proxy),
            })
        }
        Ok(Err(failure)) => {
            log::error!("winit event loop unavailable: {:?}", failure);
            Err(failure)
        }
        Err(_) => Err(StartFailure::EventLoop(
            "winit loop thread exited during startup".into(),
        )),
    }
}

#[cfg(target_os = "macos")]
fn build_event_loop() -> WindowResult<EventLoop<LoopRequest>> {
    Err(WindowError::EventLoop(
        "the macOS event loop must run on the main thread".into(),
    ))
}

#[cfg(not(target_os = "macos"))]
fn build_event_loop() -> WindowResult<EventLoop<LoopRequest>> {
    let mut builder = EventLoop::<LoopRequest>::with_user_event();

    #[cfg(any(
        target_os = "linux",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd"
    ))]
    {
        winit::platform::x11::EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
        winit::platform::wayland::EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
    }

    #[cfg(target_os = "windows")]
    {
        winit::platform::windows::EventLoopBuilderExtWindows::with_any_thread(&mut builder, true);
    }

    Ok(builder.build()?)
}

/// Native window id → the owning pump's message channel.
pub(crate) struct Registry<K> {
    routes: HashMap<K, Sender<NativeMessage>>,
}

impl<K> Default for Registry<K> {
    fn default() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Copy + std::fmt::Debug> Registry<K> {
    pub(crate) fn insert(&mut self, id: K, events: Sender<NativeMessage>) {
        self.routes.insert(id, events);
    }

    pub(crate) fn remove(&mut self, id: K) -> bool {
        self.routes.remove(&id).is_some()
    }

    /// Deliver `msg` to the pump owning `id`. Routes whose pump has gone are
    /// dropped. Returns whether the message was handed over.
    pub(crate) fn route(&mut self, id: K, msg: NativeMessage) -> bool {
        let Some(tx) = self.routes.get(&id) else {
            return false;
        };
        if tx.send(msg).is_ok() {
            return true;
        }
        log::debug!("pump for window {:?} is gone; dropping its route", id);
        self.routes.remove(&id);
        false
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.routes.len()
    }
}

#[derive(Default)]
struct LoopApp {
    routes: Registry<WindowId>,
    resumed: bool,
    pending: Vec<LoopRequest>,
}

impl LoopApp {
    fn handle(&mut self, event_loop: &ActiveEventLoop, req: LoopRequest) {
        match req {
            LoopRequest::Open {
                config,
                events,
                reply,
            } => {
                let attrs = Window::default_attributes()
                    .with_title(config.title.clone())
                    .with_inner_size(PhysicalSize::new(config.width, config.height))
                    .with_visible(config.visible)
                    .with_resizable(config.resizable);

                match event_loop.create_window(attrs) {
                    Ok(window) => {
                        let window = Arc::new(window);
                        let id = window.id();
                        self.routes.insert(id, events);
                        if reply.send(Ok(window)).is_err() {
                            self.routes.remove(id);
                        }
                    }
                    Err(e) => {
                        let _ = reply.send(Err(e.into()));
                    }
                }
            }
            LoopRequest::Release(window) => {
                self.routes.remove(window.id());
                log::debug!("released window {:?}; {} still open", window.id(), self.routes.len());
            }
        }
    }
}

impl ApplicationHandler<LoopRequest> for LoopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.resumed = true;
        for req in std::mem::take(&mut self.pending) {
            self.handle(event_loop, req);
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, req: LoopRequest) {
        if self.resumed {
            self.handle(event_loop, req);
        } else {
            self.pending.push(req);
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let destroyed = matches!(event, WindowEvent::Destroyed);
        self.routes.route(id, convert_window_event(event));
        if destroyed {
            self.routes.remove(id);
        }
    }
}

struct WinitSurface {
    window: Arc<Window>,
}

/// winit already holds an implicit pointer capture while a button is down
/// (`SetCapture` on Win32, the implicit ButtonPress grab on X11), so drags
/// that leave the window keep reporting. Nothing to do natively.
impl PointerCapture for WinitSurface {
    fn grab_pointer(&mut self) {
        log::debug!("pointer capture held by button press on {:?}", self.window.id());
    }

    fn release_pointer(&mut self) {
        log::debug!("pointer capture ends on {:?}", self.window.id());
    }
}

impl NativeSurface for WinitSurface {
    fn show(&mut self) {
        self.window.set_visible(true);
    }

    fn hide(&mut self) {
        self.window.set_visible(false);
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }
}

fn convert_window_event(event: WindowEvent) -> NativeMessage {
    match event {
        WindowEvent::CloseRequested => NativeMessage::CloseRequested,
        WindowEvent::Destroyed => NativeMessage::SessionEnded,
        WindowEvent::Resized(size) => NativeMessage::Resized(size.into()),
        WindowEvent::CursorMoved { position, .. } => NativeMessage::CursorMoved {
            x: position.x as i32,
            y: position.y as i32,
        },
        WindowEvent::MouseInput { state, button, .. } => NativeMessage::Button {
            button: button.into(),
            pressed: state == ElementState::Pressed,
        },
        WindowEvent::MouseWheel { delta, .. } => NativeMessage::Wheel {
            angle_degrees: wheel_angle(delta),
        },
        // Synthetic presses/releases on focus change are kept, so no key
        // stays pressed after the window loses focus.
        WindowEvent::KeyboardInput { event, .. } => {
            key_message(KeyInput::from(&event), event.state)
        }
        WindowEvent::Focused(false) => NativeMessage::CaptureLost,
        _ => NativeMessage::Other,
    }
}

fn key_message(input: KeyInput, state: ElementState) -> NativeMessage {
    NativeMessage::Key {
        input,
        pressed: state == ElementState::Pressed,
    }
}

/// Vertical wheel rotation in degrees. Positive is away from the user.
pub fn wheel_angle(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, lines) => lines * DEGREES_PER_LINE,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32 * DEGREES_PER_LINE,
    }
}
