//! Pressed-button tracking and pointer capture.
//!
//! Owned by the pump thread. Never shared.

use crate::event::{ButtonId, CanonicalEvent};

/// Native pointer capture (grab) control, implemented by each backend surface.
pub trait PointerCapture {
    fn grab_pointer(&mut self);
    fn release_pointer(&mut self);
}

/// Derived input state for one window.
#[derive(Debug, Default)]
pub struct InputTracker {
    pressed: [bool; ButtonId::COUNT],
    captured: bool,
    x: i32,
    y: i32,
}

impl InputTracker {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_move(&mut self, x: i32, y: i32) -> CanonicalEvent {
        self.x = x;
        self.y = y;
        CanonicalEvent::MouseMove { x, y }
    }

    /// Button transition at the last known cursor position.
    ///
    /// The first press grabs the pointer; the release that leaves nothing
    /// pressed lets it go.
    pub fn on_button(
        &mut self,
        button: ButtonId,
        pressed: bool,
        capture: &mut (impl PointerCapture + ?Sized),
    ) -> CanonicalEvent {
        if pressed {
            if !self.any_pressed() && !self.captured {
                capture.grab_pointer();
                self.captured = true;
            }
            self.pressed[button.index()] = true;
        } else {
            self.pressed[button.index()] = false;
            if !self.any_pressed() && self.captured {
                capture.release_pointer();
                self.captured = false;
            }
        }

        CanonicalEvent::MouseButton {
            button,
            pressed,
            x: self.x,
            y: self.y,
        }
    }

    /// Another surface took the grab: synthesize a release for every pressed
    /// button, in ascending `ButtonId` order, then clear all state.
    ///
    /// A grab this tracker still believes it holds is released natively too,
    /// otherwise no later button-up would ever let it go.
    pub fn on_capture_lost(
        &mut self,
        out: &mut Vec<CanonicalEvent>,
        capture: &mut (impl PointerCapture + ?Sized),
    ) {
        for button in ButtonId::ALL {
            if self.pressed[button.index()] {
                out.push(CanonicalEvent::MouseButton {
                    button,
                    pressed: false,
                    x: self.x,
                    y: self.y,
                });
            }
        }
        self.pressed = [false; ButtonId::COUNT];
        if self.captured {
            capture.release_pointer();
            self.captured = false;
        }
    }

    #[inline]
    pub fn is_pressed(&self, button: ButtonId) -> bool {
        self.pressed[button.index()]
    }

    #[inline]
    pub fn any_pressed(&self) -> bool {
        self.pressed.iter().any(|&p| p)
    }

    pub fn pressed_buttons(&self) -> impl Iterator<Item = ButtonId> + '_ {
        ButtonId::ALL
            .into_iter()
            .filter(move |b| self.pressed[b.index()])
    }

    #[inline]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    #[inline]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        grabs: u32,
        releases: u32,
    }

    impl PointerCapture for Recorder {
        fn grab_pointer(&mut self) {
            self.grabs += 1;
        }
        fn release_pointer(&mut self) {
            self.releases += 1;
        }
    }

    #[test]
    fn press_reports_last_cursor_position() {
        let mut t = InputTracker::new();
        let mut cap = Recorder::default();
        t.on_move(10, 10);
        let ev = t.on_button(ButtonId::Left, true, &mut cap);
        assert_eq!(
            ev,
            CanonicalEvent::MouseButton {
                button: ButtonId::Left,
                pressed: true,
                x: 10,
                y: 10
            }
        );
        assert!(t.is_pressed(ButtonId::Left));
    }

    #[test]
    fn grab_on_first_press_release_on_last_release() {
        let mut t = InputTracker::new();
        let mut cap = Recorder::default();

        t.on_button(ButtonId::Left, true, &mut cap);
        t.on_button(ButtonId::Right, true, &mut cap);
        assert_eq!(cap.grabs, 1);
        assert!(t.is_captured());

        t.on_button(ButtonId::Left, false, &mut cap);
        assert_eq!(cap.releases, 0);

        t.on_button(ButtonId::Right, false, &mut cap);
        assert_eq!(cap.releases, 1);
        assert!(!t.is_captured());
        assert!(!t.any_pressed());
    }

    #[test]
    fn stray_release_does_not_release_an_unheld_grab() {
        let mut t = InputTracker::new();
        let mut cap = Recorder::default();
        let ev = t.on_button(ButtonId::Right, false, &mut cap);
        assert!(matches!(ev, CanonicalEvent::MouseButton { pressed: false, .. }));
        assert_eq!(cap.releases, 0);
    }

    #[test]
    fn capture_loss_releases_each_pressed_button_once_in_order() {
        let mut t = InputTracker::new();
        let mut cap = Recorder::default();
        t.on_move(20, 20);
        t.on_button(ButtonId::Unknown, true, &mut cap);
        t.on_button(ButtonId::Left, true, &mut cap);
        t.on_button(ButtonId::Right, true, &mut cap);

        let mut out = Vec::new();
        t.on_capture_lost(&mut out, &mut cap);

        let released: Vec<ButtonId> = out
            .iter()
            .map(|e| match *e {
                CanonicalEvent::MouseButton {
                    button,
                    pressed: false,
                    x: 20,
                    y: 20,
                } => button,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(released, vec![ButtonId::Left, ButtonId::Right, ButtonId::Unknown]);
        assert_eq!(t.pressed_buttons().count(), 0);
        assert!(!t.is_captured());
        assert_eq!(cap.releases, 1);

        out.clear();
        t.on_capture_lost(&mut out, &mut cap);
        assert!(out.is_empty());
        assert_eq!(cap.releases, 1);
    }

    #[test]
    fn capture_loss_then_press_grabs_again() {
        let mut t = InputTracker::new();
        let mut cap = Recorder::default();
        t.on_button(ButtonId::Left, true, &mut cap);
        t.on_capture_lost(&mut Vec::new(), &mut cap);
        t.on_button(ButtonId::Left, true, &mut cap);
        assert_eq!(cap.grabs, 2);
        assert_eq!(cap.releases, 1);
    }

    #[test]
    fn release_after_capture_loss_leaves_no_grab_behind() {
        let mut t = InputTracker::new();
        let mut cap = Recorder::default();
        t.on_button(ButtonId::Left, true, &mut cap);
        t.on_capture_lost(&mut Vec::new(), &mut cap);
        t.on_button(ButtonId::Left, false, &mut cap);
        assert_eq!((cap.grabs, cap.releases), (1, 1));
        assert!(!t.is_captured());
    }
}
