//! Normalization and delivery, run on the pump thread.
//!
//! Backends feed [`NativeMessage`]s into [`Pump::dispatch`] one at a time, in
//! native arrival order. The pump translates them, updates derived input
//! state and delivers canonical events either to the registered callback or to
//! the poll queue.

use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::event::{ButtonId, CanonicalEvent, Size};
use crate::input::{InputTracker, PointerCapture};
use crate::shared::{Lifecycle, Shared};
use crate::translate::{translate, KeyInput};

/// Synthetic messages marshalled onto the pump thread.
///
/// Only the pump loop recognizes these; they never appear in the native stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    Hide,
    SetTitle(String),
    Custom { code: i32, payload: usize },
    /// Wake the loop and make it exit.
    Shutdown,
}

/// Backend-neutral form of one native message.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeMessage {
    /// Close button / window-manager close.
    CloseRequested,
    /// The OS session or the native window itself is going away.
    SessionEnded,
    Resized(Size),
    CursorMoved { x: i32, y: i32 },
    Button { button: ButtonId, pressed: bool },
    Wheel { angle_degrees: f32 },
    Key { input: KeyInput, pressed: bool },
    /// Another surface seized the pointer grab.
    CaptureLost,
    /// A native message with no canonical counterpart.
    Other,
    Command(Command),
}

/// Operations the pump performs on the native window. Only ever called on the
/// pump thread.
pub trait NativeSurface: PointerCapture {
    fn show(&mut self);
    fn hide(&mut self);
    fn set_title(&mut self, title: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub type EventCallback = Box<dyn FnMut(CanonicalEvent) + Send + 'static>;

pub(crate) enum Sink {
    Callback(EventCallback),
    Queue(Sender<CanonicalEvent>),
}

pub struct Pump {
    shared: Arc<Shared>,
    tracker: InputTracker,
    sink: Sink,
    scratch: Vec<CanonicalEvent>,
}

impl Pump {
    pub(crate) fn new(shared: Arc<Shared>, sink: Sink) -> Self {
        Self {
            shared,
            tracker: InputTracker::new(),
            sink,
            scratch: Vec::with_capacity(ButtonId::COUNT),
        }
    }

    /// Backends call this once the native window exists and the loop starts.
    pub fn enter_loop(&self) {
        self.shared.advance(Lifecycle::Running);
    }

    /// Backends call this after the loop stops and before the native window is
    /// released. Handle accessors report the window unavailable from then on.
    pub fn retire_native(&self) {
        self.shared.set_native_alive(false);
    }

    #[inline]
    pub fn tracker(&self) -> &InputTracker {
        &self.tracker
    }

    /// Handle one message. Returns [`Flow::Exit`] when the loop must stop.
    pub fn dispatch(&mut self, msg: NativeMessage, surface: &mut dyn NativeSurface) -> Flow {
        debug_assert!(self.scratch.is_empty());

        let mut flow = Flow::Continue;
        let native = !matches!(msg, NativeMessage::Command(_));

        match msg {
            NativeMessage::CloseRequested => self.scratch.push(CanonicalEvent::QuitRequest),
            NativeMessage::SessionEnded => {
                log::info!("native session ended; stopping pump");
                self.scratch.push(CanonicalEvent::QuitRequest);
                flow = Flow::Exit;
            }
            NativeMessage::Resized(size) => {
                self.shared.set_size(size);
                self.scratch.push(CanonicalEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
            }
            NativeMessage::CursorMoved { x, y } => self.scratch.push(self.tracker.on_move(x, y)),
            NativeMessage::Button { button, pressed } => {
                let ev = self.tracker.on_button(button, pressed, surface);
                self.scratch.push(ev);
            }
            NativeMessage::Wheel { angle_degrees } => {
                self.scratch.push(CanonicalEvent::MouseWheel { angle_degrees })
            }
            NativeMessage::Key { input, pressed } => self.scratch.push(CanonicalEvent::Key {
                key: translate(&input),
                pressed,
            }),
            NativeMessage::CaptureLost => self.tracker.on_capture_lost(&mut self.scratch, surface),
            NativeMessage::Other => {}
            NativeMessage::Command(cmd) => flow = self.run_command(cmd, surface),
        }

        self.deliver(native);
        flow
    }

    fn run_command(&mut self, cmd: Command, surface: &mut dyn NativeSurface) -> Flow {
        log::debug!("pump command: {:?}", cmd);
        match cmd {
            Command::Show => surface.show(),
            Command::Hide => surface.hide(),
            Command::SetTitle(title) => surface.set_title(&title),
            Command::Custom { code, payload } => {
                self.scratch.push(CanonicalEvent::Custom { code, payload })
            }
            Command::Shutdown => return Flow::Exit,
        }
        Flow::Continue
    }

    fn deliver(&mut self, native: bool) {
        match &mut self.sink {
            Sink::Callback(handler) => {
                for ev in self.scratch.drain(..) {
                    handler(ev);
                }
            }
            Sink::Queue(tx) => {
                if self.scratch.is_empty() && native {
                    self.scratch.push(CanonicalEvent::NoEvent);
                }
                for ev in self.scratch.drain(..) {
                    if tx.send(ev).is_err() {
                        log::debug!("poll queue closed; dropping {:?}", ev);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WindowConfig;
    use crate::key::KeyCode;
    use crossbeam_channel::unbounded;
    use parking_lot::Mutex;
    use winit::keyboard::{Key, KeyCode as Scancode, KeyLocation, PhysicalKey};

    #[derive(Default)]
    struct FakeSurface {
        visible: Option<bool>,
        title: Option<String>,
        grabs: u32,
        releases: u32,
    }

    impl PointerCapture for FakeSurface {
        fn grab_pointer(&mut self) {
            self.grabs += 1;
        }
        fn release_pointer(&mut self) {
            self.releases += 1;
        }
    }

    impl NativeSurface for FakeSurface {
        fn show(&mut self) {
            self.visible = Some(true);
        }
        fn hide(&mut self) {
            self.visible = Some(false);
        }
        fn set_title(&mut self, title: &str) {
            self.title = Some(title.to_owned());
        }
    }

    fn callback_pump() -> (Pump, Arc<Mutex<Vec<CanonicalEvent>>>, Arc<Shared>) {
        let shared = Arc::new(Shared::new(&WindowConfig::new("Test")));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        let sink = Sink::Callback(Box::new(move |ev| sink_seen.lock().push(ev)));
        (Pump::new(shared.clone(), sink), seen, shared)
    }

    #[test]
    fn resize_updates_cache_and_is_delivered() {
        let (mut pump, seen, shared) = callback_pump();
        let mut s = FakeSurface::default();
        pump.dispatch(NativeMessage::Resized(Size::new(800, 600)), &mut s);
        assert_eq!(shared.size(), Size::new(800, 600));
        assert_eq!(
            *seen.lock(),
            vec![CanonicalEvent::Resized {
                width: 800,
                height: 600
            }]
        );
    }

    #[test]
    fn callback_never_sees_no_event() {
        let (mut pump, seen, _) = callback_pump();
        let mut s = FakeSurface::default();
        pump.dispatch(NativeMessage::Other, &mut s);
        pump.dispatch(NativeMessage::CaptureLost, &mut s);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn close_request_keeps_running_session_end_stops() {
        let (mut pump, seen, _) = callback_pump();
        let mut s = FakeSurface::default();
        assert_eq!(pump.dispatch(NativeMessage::CloseRequested, &mut s), Flow::Continue);
        assert_eq!(pump.dispatch(NativeMessage::SessionEnded, &mut s), Flow::Exit);
        assert_eq!(
            *seen.lock(),
            vec![CanonicalEvent::QuitRequest, CanonicalEvent::QuitRequest]
        );
    }

    #[test]
    fn commands_reach_the_surface_without_delivery() {
        let (mut pump, seen, _) = callback_pump();
        let mut s = FakeSurface::default();
        pump.dispatch(NativeMessage::Command(Command::Hide), &mut s);
        pump.dispatch(NativeMessage::Command(Command::SetTitle("Renamed".into())), &mut s);
        assert_eq!(s.visible, Some(false));
        assert_eq!(s.title.as_deref(), Some("Renamed"));
        assert!(seen.lock().is_empty());

        let flow = pump.dispatch(NativeMessage::Command(Command::Shutdown), &mut s);
        assert_eq!(flow, Flow::Exit);
    }

    #[test]
    fn custom_command_is_delivered() {
        let (mut pump, seen, _) = callback_pump();
        let mut s = FakeSurface::default();
        pump.dispatch(
            NativeMessage::Command(Command::Custom { code: 7, payload: 0xBEEF }),
            &mut s,
        );
        assert_eq!(
            *seen.lock(),
            vec![CanonicalEvent::Custom {
                code: 7,
                payload: 0xBEEF
            }]
        );
    }

    #[test]
    fn key_messages_are_translated() {
        let (mut pump, seen, _) = callback_pump();
        let mut s = FakeSurface::default();
        let input = KeyInput::new(
            Key::Character("!".into()),
            PhysicalKey::Code(Scancode::Digit1),
            KeyLocation::Standard,
        );
        pump.dispatch(NativeMessage::Key { input, pressed: true }, &mut s);
        assert_eq!(
            *seen.lock(),
            vec![CanonicalEvent::Key {
                key: KeyCode::Key1,
                pressed: true
            }]
        );
    }

    #[test]
    fn poll_queue_gets_one_item_per_native_message() {
        let shared = Arc::new(Shared::new(&WindowConfig::default()));
        let (tx, rx) = unbounded();
        let mut pump = Pump::new(shared, Sink::Queue(tx));
        let mut s = FakeSurface::default();

        pump.dispatch(NativeMessage::Other, &mut s);
        pump.dispatch(NativeMessage::CursorMoved { x: 3, y: 4 }, &mut s);
        pump.dispatch(NativeMessage::Command(Command::Show), &mut s);

        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                CanonicalEvent::NoEvent,
                CanonicalEvent::MouseMove { x: 3, y: 4 }
            ]
        );
    }

    #[test]
    fn capture_loss_in_poll_mode_enqueues_each_release() {
        let shared = Arc::new(Shared::new(&WindowConfig::default()));
        let (tx, rx) = unbounded();
        let mut pump = Pump::new(shared, Sink::Queue(tx));
        let mut s = FakeSurface::default();

        pump.dispatch(NativeMessage::Button { button: ButtonId::Right, pressed: true }, &mut s);
        pump.dispatch(NativeMessage::Button { button: ButtonId::Left, pressed: true }, &mut s);
        let _ = rx.try_iter().count();

        pump.dispatch(NativeMessage::CaptureLost, &mut s);
        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(got.len(), 2);
        assert!(matches!(
            got[0],
            CanonicalEvent::MouseButton { button: ButtonId::Left, pressed: false, .. }
        ));
        assert!(matches!(
            got[1],
            CanonicalEvent::MouseButton { button: ButtonId::Right, pressed: false, .. }
        ));
        assert!(!pump.tracker().any_pressed());
        assert_eq!((s.grabs, s.releases), (1, 1));
    }
}
