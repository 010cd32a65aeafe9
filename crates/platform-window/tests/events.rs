use std::sync::Arc;

use parking_lot::Mutex;
use platform_window::{
    ButtonId, CanonicalEvent, Delivery, HeadlessBackend, HeadlessInjector, KeyCode,
    PlatformWindow, Size, WindowConfig,
};
use winit::keyboard::KeyCode as Scancode;

fn poll_window() -> (PlatformWindow, HeadlessInjector) {
    let (backend, inj) = HeadlessBackend::new();
    let window =
        PlatformWindow::create_with(backend, WindowConfig::new("Test"), Delivery::poll()).unwrap();
    (window, inj)
}

fn callback_window() -> (PlatformWindow, HeadlessInjector, Arc<Mutex<Vec<CanonicalEvent>>>) {
    let (backend, inj) = HeadlessBackend::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let window = PlatformWindow::create_with(
        backend,
        WindowConfig::new("Test"),
        Delivery::callback(move |ev| sink.lock().push(ev)),
    )
    .unwrap();
    (window, inj, seen)
}

#[test]
fn resizes_arrive_in_native_order() {
    let (window, inj, seen) = callback_window();
    let sizes = [(800, 600), (1, 1), (1024, 768), (800, 600), (3, 7)];
    for (w, h) in sizes {
        inj.resize(w, h).unwrap();
    }
    window.destroy().unwrap();

    let got: Vec<_> = seen
        .lock()
        .iter()
        .map(|ev| match *ev {
            CanonicalEvent::Resized { width, height } => (width, height),
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(got, sizes);
}

#[test]
fn capture_loss_releases_every_pressed_button_once() {
    let (window, inj, seen) = callback_window();
    inj.press(ButtonId::Unknown).unwrap();
    inj.press(ButtonId::Left).unwrap();
    inj.press(ButtonId::Right).unwrap();
    inj.lose_capture().unwrap();
    // A second loss with nothing pressed synthesizes nothing.
    inj.lose_capture().unwrap();
    window.destroy().unwrap();

    let releases: Vec<_> = seen
        .lock()
        .iter()
        .filter_map(|ev| match *ev {
            CanonicalEvent::MouseButton {
                button,
                pressed: false,
                ..
            } => Some(button),
            _ => None,
        })
        .collect();
    assert_eq!(
        releases,
        vec![ButtonId::Left, ButtonId::Right, ButtonId::Unknown]
    );

    let surface = inj.surface();
    assert_eq!((surface.grabs, surface.releases), (1, 1));
    assert!(!surface.captured);
}

#[test]
fn pointer_grab_follows_pressed_buttons() {
    let (window, inj) = poll_window();
    inj.press(ButtonId::Left).unwrap();
    inj.press(ButtonId::Right).unwrap();
    inj.release(ButtonId::Left).unwrap();
    for _ in 0..3 {
        window.wait_for_next_event();
    }
    assert!(inj.surface().captured);

    inj.release(ButtonId::Right).unwrap();
    window.wait_for_next_event();
    let surface = inj.surface();
    assert!(!surface.captured);
    assert_eq!((surface.grabs, surface.releases), (1, 1));
}

#[test]
fn end_to_end_scenario() {
    let (window, inj) = poll_window();

    inj.resize(800, 600).unwrap();
    assert_eq!(
        window.wait_for_next_event(),
        CanonicalEvent::Resized {
            width: 800,
            height: 600
        }
    );
    assert_eq!(window.size(), Size::new(800, 600));

    inj.move_cursor(10, 10).unwrap();
    inj.press(ButtonId::Left).unwrap();
    assert_eq!(
        window.wait_for_next_event(),
        CanonicalEvent::MouseMove { x: 10, y: 10 }
    );
    assert_eq!(
        window.wait_for_next_event(),
        CanonicalEvent::MouseButton {
            button: ButtonId::Left,
            pressed: true,
            x: 10,
            y: 10
        }
    );

    inj.move_cursor(20, 20).unwrap();
    assert_eq!(
        window.wait_for_next_event(),
        CanonicalEvent::MouseMove { x: 20, y: 20 }
    );

    inj.lose_capture().unwrap();
    assert_eq!(
        window.wait_for_next_event(),
        CanonicalEvent::MouseButton {
            button: ButtonId::Left,
            pressed: false,
            x: 20,
            y: 20
        }
    );

    // Nothing left pressed: the next loss produces no release.
    inj.lose_capture().unwrap();
    assert_eq!(window.wait_for_next_event(), CanonicalEvent::NoEvent);
    let surface = inj.surface();
    assert!(!surface.captured);
    assert_eq!((surface.grabs, surface.releases), (1, 1));
}

#[test]
fn unmapped_native_traffic_polls_as_no_event() {
    let (window, inj) = poll_window();
    inj.noise().unwrap();
    inj.noise().unwrap();
    assert_eq!(window.wait_for_next_event(), CanonicalEvent::NoEvent);
    assert_eq!(window.wait_for_next_event(), CanonicalEvent::NoEvent);
    assert_eq!(window.try_next_event(), None);
}

#[test]
fn callback_never_receives_no_event() {
    let (window, inj, seen) = callback_window();
    inj.noise().unwrap();
    inj.wheel(-15.0).unwrap();
    inj.noise().unwrap();
    window.destroy().unwrap();
    assert_eq!(
        *seen.lock(),
        vec![CanonicalEvent::MouseWheel {
            angle_degrees: -15.0
        }]
    );
}

#[test]
fn keys_are_translated_on_the_pump() {
    let (window, inj) = poll_window();
    inj.scancode(Scancode::KeyA, true).unwrap();
    inj.scancode(Scancode::Numpad5, true).unwrap();
    inj.scancode(Scancode::Digit5, false).unwrap();
    inj.scancode(Scancode::ShiftRight, true).unwrap();

    let keys: Vec<_> = (0..4)
        .map(|_| match window.wait_for_next_event() {
            CanonicalEvent::Key { key, pressed } => (key, pressed),
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            (KeyCode::A, true),
            (KeyCode::Numpad5, true),
            (KeyCode::Key5, false),
            (KeyCode::Shift, true),
        ]
    );
}

#[test]
fn close_request_keeps_the_loop_alive() {
    let (window, inj) = poll_window();
    inj.close().unwrap();
    assert_eq!(window.wait_for_next_event(), CanonicalEvent::QuitRequest);
    inj.move_cursor(5, 6).unwrap();
    assert_eq!(
        window.wait_for_next_event(),
        CanonicalEvent::MouseMove { x: 5, y: 6 }
    );
}
