//! Native key → [`KeyCode`] translation.
//!
//! Resolution runs in two stages:
//! 1. the layout-aware logical key (respects Shift/Caps Lock and the active layout);
//! 2. if that yields [`KeyCode::Unknown`], the physical scancode is resolved to the
//!    symbol it carries on a US layout, and that symbol is mapped instead.
//!
//! Left/right Shift, Control and Alt collapse to one code each. Left/right Super
//! stay distinct (`Lwin`/`Rwin`). Keypad keys never collapse onto the main row:
//! keypad digits are `Numpad0..9` and keypad operators are `Multiply`, `Add`,
//! `Subtract`, `Decimal`, `Separator` and `Divide`.

use winit::event::KeyEvent;
use winit::keyboard::{
    Key, KeyCode as Scancode, KeyLocation, NamedKey, NativeKey, NativeKeyCode, PhysicalKey,
};

use crate::key::KeyCode;

/// The parts of a native key event the translator looks at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub logical: Key,
    pub physical: PhysicalKey,
    pub location: KeyLocation,
}

impl KeyInput {
    #[inline]
    pub fn new(logical: Key, physical: PhysicalKey, location: KeyLocation) -> Self {
        Self {
            logical,
            physical,
            location,
        }
    }

    /// Physical key only; the logical key is left unidentified.
    #[inline]
    pub fn physical(code: Scancode) -> Self {
        Self::new(
            Key::Unidentified(NativeKey::Unidentified),
            PhysicalKey::Code(code),
            KeyLocation::Standard,
        )
    }
}

impl From<&KeyEvent> for KeyInput {
    fn from(e: &KeyEvent) -> Self {
        Self::new(e.logical_key.clone(), e.physical_key, e.location)
    }
}

/// A resolved key symbol, independent of where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symbol {
    Named(NamedKey),
    Char(char),
}

/// Translate a native key. Never fails: unmapped keys become [`KeyCode::Unknown`].
pub fn translate(input: &KeyInput) -> KeyCode {
    // The extra ISO key carries `<`/`>` or `\`/`|` depending on layout; its
    // code is positional.
    if input.physical == PhysicalKey::Code(Scancode::IntlBackslash) {
        return KeyCode::Oem102;
    }

    let layout = layout_symbol(&input.logical)
        .map(|sym| map_symbol(sym, input.location))
        .unwrap_or(KeyCode::Unknown);

    if layout != KeyCode::Unknown {
        return layout;
    }

    default_symbol(input.physical)
        .map(|(sym, location)| map_symbol(sym, location))
        .unwrap_or(KeyCode::Unknown)
}

fn layout_symbol(key: &Key) -> Option<Symbol> {
    match key {
        Key::Named(n) => Some(Symbol::Named(*n)),
        Key::Character(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Symbol::Char(c)),
                _ => None,
            }
        }
        Key::Unidentified(_) | Key::Dead(_) => None,
    }
}

fn map_symbol(sym: Symbol, location: KeyLocation) -> KeyCode {
    match sym {
        Symbol::Named(n) => map_named(n, location),
        Symbol::Char(c) if location == KeyLocation::Numpad => map_keypad_char(c),
        Symbol::Char(c) => map_char(c),
    }
}

fn map_keypad_char(c: char) -> KeyCode {
    match c {
        '0' => KeyCode::Numpad0,
        '1' => KeyCode::Numpad1,
        '2' => KeyCode::Numpad2,
        '3' => KeyCode::Numpad3,
        '4' => KeyCode::Numpad4,
        '5' => KeyCode::Numpad5,
        '6' => KeyCode::Numpad6,
        '7' => KeyCode::Numpad7,
        '8' => KeyCode::Numpad8,
        '9' => KeyCode::Numpad9,
        '*' => KeyCode::Multiply,
        '+' => KeyCode::Add,
        '-' => KeyCode::Subtract,
        '.' => KeyCode::Decimal,
        ',' => KeyCode::Separator,
        '/' => KeyCode::Divide,
        _ => KeyCode::Unknown,
    }
}

fn map_char(c: char) -> KeyCode {
    match c.to_ascii_lowercase() {
        'a' => KeyCode::A,
        'b' => KeyCode::B,
        'c' => KeyCode::C,
        'd' => KeyCode::D,
        'e' => KeyCode::E,
        'f' => KeyCode::F,
        'g' => KeyCode::G,
        'h' => KeyCode::H,
        'i' => KeyCode::I,
        'j' => KeyCode::J,
        'k' => KeyCode::K,
        'l' => KeyCode::L,
        'm' => KeyCode::M,
        'n' => KeyCode::N,
        'o' => KeyCode::O,
        'p' => KeyCode::P,
        'q' => KeyCode::Q,
        'r' => KeyCode::R,
        's' => KeyCode::S,
        't' => KeyCode::T,
        'u' => KeyCode::U,
        'v' => KeyCode::V,
        'w' => KeyCode::W,
        'x' => KeyCode::X,
        'y' => KeyCode::Y,
        'z' => KeyCode::Z,
        '0' => KeyCode::Key0,
        '1' => KeyCode::Key1,
        '2' => KeyCode::Key2,
        '3' => KeyCode::Key3,
        '4' => KeyCode::Key4,
        '5' => KeyCode::Key5,
        '6' => KeyCode::Key6,
        '7' => KeyCode::Key7,
        '8' => KeyCode::Key8,
        '9' => KeyCode::Key9,
        ' ' => KeyCode::Space,
        ';' | ':' => KeyCode::Oem1,
        '=' | '+' => KeyCode::OemPlus,
        ',' | '<' => KeyCode::OemComma,
        '-' | '_' => KeyCode::OemMinus,
        '.' | '>' => KeyCode::OemPeriod,
        '/' | '?' => KeyCode::Oem2,
        '`' | '~' => KeyCode::Oem3,
        '[' | '{' => KeyCode::Oem4,
        '\\' | '|' => KeyCode::Oem5,
        ']' | '}' => KeyCode::Oem6,
        '\'' | '"' => KeyCode::Oem7,
        // Shifted digit-row symbols resolve through the physical key.
        _ => KeyCode::Unknown,
    }
}

fn map_named(n: NamedKey, location: KeyLocation) -> KeyCode {
    match n {
        NamedKey::Backspace => KeyCode::Backspace,
        NamedKey::Tab => KeyCode::Tab,
        NamedKey::Clear => KeyCode::Clear,
        NamedKey::Enter => KeyCode::Return,
        NamedKey::Shift => KeyCode::Shift,
        NamedKey::Control => KeyCode::Control,
        NamedKey::Alt | NamedKey::AltGraph => KeyCode::Menu,
        NamedKey::Pause => KeyCode::Pause,
        NamedKey::CapsLock => KeyCode::Capital,
        NamedKey::KanaMode | NamedKey::HangulMode => KeyCode::Kana,
        NamedKey::JunjaMode => KeyCode::Junja,
        NamedKey::FinalMode => KeyCode::Final,
        NamedKey::HanjaMode | NamedKey::KanjiMode => KeyCode::Hanja,
        NamedKey::Escape => KeyCode::Escape,
        NamedKey::Convert => KeyCode::Convert,
        NamedKey::NonConvert => KeyCode::Nonconvert,
        NamedKey::Accept => KeyCode::Accept,
        NamedKey::ModeChange => KeyCode::Modechange,
        NamedKey::Space => KeyCode::Space,
        NamedKey::PageUp => KeyCode::Prior,
        NamedKey::PageDown => KeyCode::Next,
        NamedKey::End => KeyCode::End,
        NamedKey::Home => KeyCode::Home,
        NamedKey::ArrowLeft => KeyCode::Left,
        NamedKey::ArrowUp => KeyCode::Up,
        NamedKey::ArrowRight => KeyCode::Right,
        NamedKey::ArrowDown => KeyCode::Down,
        NamedKey::Select => KeyCode::Select,
        NamedKey::Print => KeyCode::Print,
        NamedKey::Execute => KeyCode::Execute,
        NamedKey::PrintScreen => KeyCode::Snapshot,
        NamedKey::Insert => KeyCode::Insert,
        NamedKey::Delete => KeyCode::Delete,
        NamedKey::Help => KeyCode::Help,
        NamedKey::Super | NamedKey::Meta => {
            if location == KeyLocation::Right {
                KeyCode::Rwin
            } else {
                KeyCode::Lwin
            }
        }
        NamedKey::ContextMenu => KeyCode::Apps,
        NamedKey::Standby => KeyCode::Sleep,
        NamedKey::NumLock => KeyCode::Numlock,
        NamedKey::ScrollLock => KeyCode::Scroll,
        NamedKey::Power => KeyCode::Power,
        NamedKey::BrowserBack => KeyCode::BrowserBack,
        NamedKey::BrowserForward => KeyCode::BrowserForward,
        NamedKey::BrowserRefresh => KeyCode::BrowserRefresh,
        NamedKey::BrowserStop => KeyCode::BrowserStop,
        NamedKey::BrowserSearch => KeyCode::BrowserSearch,
        NamedKey::BrowserFavorites => KeyCode::BrowserFavorites,
        NamedKey::BrowserHome => KeyCode::BrowserHome,
        NamedKey::AudioVolumeMute => KeyCode::VolumeMute,
        NamedKey::AudioVolumeDown => KeyCode::VolumeDown,
        NamedKey::AudioVolumeUp => KeyCode::VolumeUp,
        NamedKey::MediaTrackNext => KeyCode::MediaNextTrack,
        NamedKey::MediaTrackPrevious => KeyCode::MediaPrevTrack,
        NamedKey::MediaStop => KeyCode::MediaStop,
        NamedKey::MediaPlayPause => KeyCode::MediaPlayPause,
        NamedKey::LaunchMail => KeyCode::MediaLaunchMail,
        NamedKey::LaunchMediaPlayer => KeyCode::MediaLaunchMediaSelect,
        NamedKey::LaunchApplication1 => KeyCode::MediaLaunchApp1,
        NamedKey::LaunchApplication2 => KeyCode::MediaLaunchApp2,
        NamedKey::BrightnessDown => KeyCode::BrightnessDown,
        NamedKey::BrightnessUp => KeyCode::BrightnessUp,
        NamedKey::MediaRewind => KeyCode::MediaRewind,
        NamedKey::MediaFastForward => KeyCode::MediaFastForward,
        NamedKey::MediaPlay => KeyCode::Play,
        NamedKey::ColorF0Red => KeyCode::Red,
        NamedKey::ColorF1Green => KeyCode::Green,
        NamedKey::ColorF2Yellow => KeyCode::Yellow,
        NamedKey::ColorF3Blue => KeyCode::Blue,
        NamedKey::ChannelUp => KeyCode::ChannelUp,
        NamedKey::ChannelDown => KeyCode::ChannelDown,
        NamedKey::Info => KeyCode::Info,
        NamedKey::Guide => KeyCode::Guide,
        NamedKey::Subtitle | NamedKey::ClosedCaptionToggle => KeyCode::Subtitle,
        NamedKey::MediaLast => KeyCode::Last,
        NamedKey::InstantReplay => KeyCode::InstantReplay,
        NamedKey::MediaAudioTrack => KeyCode::MediaAudioTrack,
        NamedKey::MicrophoneToggle => KeyCode::Microphone,
        NamedKey::F1 => KeyCode::F1,
        NamedKey::F2 => KeyCode::F2,
        NamedKey::F3 => KeyCode::F3,
        NamedKey::F4 => KeyCode::F4,
        NamedKey::F5 => KeyCode::F5,
        NamedKey::F6 => KeyCode::F6,
        NamedKey::F7 => KeyCode::F7,
        NamedKey::F8 => KeyCode::F8,
        NamedKey::F9 => KeyCode::F9,
        NamedKey::F10 => KeyCode::F10,
        NamedKey::F11 => KeyCode::F11,
        NamedKey::F12 => KeyCode::F12,
        NamedKey::F13 => KeyCode::F13,
        NamedKey::F14 => KeyCode::F14,
        NamedKey::F15 => KeyCode::F15,
        NamedKey::F16 => KeyCode::F16,
        NamedKey::F17 => KeyCode::F17,
        NamedKey::F18 => KeyCode::F18,
        NamedKey::F19 => KeyCode::F19,
        NamedKey::F20 => KeyCode::F20,
        NamedKey::F21 => KeyCode::F21,
        NamedKey::F22 => KeyCode::F22,
        NamedKey::F23 => KeyCode::F23,
        NamedKey::F24 => KeyCode::F24,
        _ => KeyCode::Unknown,
    }
}

/// Layout-independent fallback: the symbol a scancode carries on a US layout.
fn default_symbol(physical: PhysicalKey) -> Option<(Symbol, KeyLocation)> {
    use KeyLocation::{Left, Numpad, Right, Standard};
    use Symbol::{Char, Named};

    let code = match physical {
        PhysicalKey::Code(code) => code,
        PhysicalKey::Unidentified(native) => return native_default_symbol(native),
    };

    let entry = match code {
        Scancode::Backquote => (Char('`'), Standard),
        Scancode::Backslash => (Char('\\'), Standard),
        Scancode::BracketLeft => (Char('['), Standard),
        Scancode::BracketRight => (Char(']'), Standard),
        Scancode::Comma => (Char(','), Standard),
        Scancode::Digit0 => (Char('0'), Standard),
        Scancode::Digit1 => (Char('1'), Standard),
        Scancode::Digit2 => (Char('2'), Standard),
        Scancode::Digit3 => (Char('3'), Standard),
        Scancode::Digit4 => (Char('4'), Standard),
        Scancode::Digit5 => (Char('5'), Standard),
        Scancode::Digit6 => (Char('6'), Standard),
        Scancode::Digit7 => (Char('7'), Standard),
        Scancode::Digit8 => (Char('8'), Standard),
        Scancode::Digit9 => (Char('9'), Standard),
        Scancode::Equal => (Char('='), Standard),
        Scancode::KeyA => (Char('a'), Standard),
        Scancode::KeyB => (Char('b'), Standard),
        Scancode::KeyC => (Char('c'), Standard),
        Scancode::KeyD => (Char('d'), Standard),
        Scancode::KeyE => (Char('e'), Standard),
        Scancode::KeyF => (Char('f'), Standard),
        Scancode::KeyG => (Char('g'), Standard),
        Scancode::KeyH => (Char('h'), Standard),
        Scancode::KeyI => (Char('i'), Standard),
        Scancode::KeyJ => (Char('j'), Standard),
        Scancode::KeyK => (Char('k'), Standard),
        Scancode::KeyL => (Char('l'), Standard),
        Scancode::KeyM => (Char('m'), Standard),
        Scancode::KeyN => (Char('n'), Standard),
        Scancode::KeyO => (Char('o'), Standard),
        Scancode::KeyP => (Char('p'), Standard),
        Scancode::KeyQ => (Char('q'), Standard),
        Scancode::KeyR => (Char('r'), Standard),
        Scancode::KeyS => (Char('s'), Standard),
        Scancode::KeyT => (Char('t'), Standard),
        Scancode::KeyU => (Char('u'), Standard),
        Scancode::KeyV => (Char('v'), Standard),
        Scancode::KeyW => (Char('w'), Standard),
        Scancode::KeyX => (Char('x'), Standard),
        Scancode::KeyY => (Char('y'), Standard),
        Scancode::KeyZ => (Char('z'), Standard),
        Scancode::Minus => (Char('-'), Standard),
        Scancode::Period => (Char('.'), Standard),
        Scancode::Quote => (Char('\''), Standard),
        Scancode::Semicolon => (Char(';'), Standard),
        Scancode::Slash => (Char('/'), Standard),

        Scancode::AltLeft => (Named(NamedKey::Alt), Left),
        Scancode::AltRight => (Named(NamedKey::Alt), Right),
        Scancode::ControlLeft => (Named(NamedKey::Control), Left),
        Scancode::ControlRight => (Named(NamedKey::Control), Right),
        Scancode::ShiftLeft => (Named(NamedKey::Shift), Left),
        Scancode::ShiftRight => (Named(NamedKey::Shift), Right),
        Scancode::SuperLeft | Scancode::Meta => (Named(NamedKey::Super), Left),
        Scancode::SuperRight => (Named(NamedKey::Super), Right),
        Scancode::Backspace => (Named(NamedKey::Backspace), Standard),
        Scancode::CapsLock => (Named(NamedKey::CapsLock), Standard),
        Scancode::ContextMenu => (Named(NamedKey::ContextMenu), Standard),
        Scancode::Enter => (Named(NamedKey::Enter), Standard),
        Scancode::Space => (Named(NamedKey::Space), Standard),
        Scancode::Tab => (Named(NamedKey::Tab), Standard),
        Scancode::Convert => (Named(NamedKey::Convert), Standard),
        Scancode::NonConvert => (Named(NamedKey::NonConvert), Standard),
        Scancode::KanaMode => (Named(NamedKey::KanaMode), Standard),
        Scancode::Lang1 => (Named(NamedKey::HangulMode), Standard),
        Scancode::Lang2 => (Named(NamedKey::HanjaMode), Standard),
        Scancode::Delete => (Named(NamedKey::Delete), Standard),
        Scancode::End => (Named(NamedKey::End), Standard),
        Scancode::Help => (Named(NamedKey::Help), Standard),
        Scancode::Home => (Named(NamedKey::Home), Standard),
        Scancode::Insert => (Named(NamedKey::Insert), Standard),
        Scancode::PageDown => (Named(NamedKey::PageDown), Standard),
        Scancode::PageUp => (Named(NamedKey::PageUp), Standard),
        Scancode::ArrowDown => (Named(NamedKey::ArrowDown), Standard),
        Scancode::ArrowLeft => (Named(NamedKey::ArrowLeft), Standard),
        Scancode::ArrowRight => (Named(NamedKey::ArrowRight), Standard),
        Scancode::ArrowUp => (Named(NamedKey::ArrowUp), Standard),
        Scancode::Escape => (Named(NamedKey::Escape), Standard),
        Scancode::PrintScreen => (Named(NamedKey::PrintScreen), Standard),
        Scancode::ScrollLock => (Named(NamedKey::ScrollLock), Standard),
        Scancode::Pause => (Named(NamedKey::Pause), Standard),
        Scancode::Select => (Named(NamedKey::Select), Standard),

        Scancode::NumLock => (Named(NamedKey::NumLock), Numpad),
        Scancode::Numpad0 => (Char('0'), Numpad),
        Scancode::Numpad1 => (Char('1'), Numpad),
        Scancode::Numpad2 => (Char('2'), Numpad),
        Scancode::Numpad3 => (Char('3'), Numpad),
        Scancode::Numpad4 => (Char('4'), Numpad),
        Scancode::Numpad5 => (Char('5'), Numpad),
        Scancode::Numpad6 => (Char('6'), Numpad),
        Scancode::Numpad7 => (Char('7'), Numpad),
        Scancode::Numpad8 => (Char('8'), Numpad),
        Scancode::Numpad9 => (Char('9'), Numpad),
        Scancode::NumpadAdd => (Char('+'), Numpad),
        Scancode::NumpadSubtract => (Char('-'), Numpad),
        Scancode::NumpadMultiply | Scancode::NumpadStar => (Char('*'), Numpad),
        Scancode::NumpadDivide => (Char('/'), Numpad),
        Scancode::NumpadDecimal => (Char('.'), Numpad),
        Scancode::NumpadComma => (Char(','), Numpad),
        Scancode::NumpadEnter => (Named(NamedKey::Enter), Numpad),
        Scancode::NumpadClear => (Named(NamedKey::Clear), Numpad),
        Scancode::NumpadBackspace => (Named(NamedKey::Backspace), Numpad),

        Scancode::BrowserBack => (Named(NamedKey::BrowserBack), Standard),
        Scancode::BrowserFavorites => (Named(NamedKey::BrowserFavorites), Standard),
        Scancode::BrowserForward => (Named(NamedKey::BrowserForward), Standard),
        Scancode::BrowserHome => (Named(NamedKey::BrowserHome), Standard),
        Scancode::BrowserRefresh => (Named(NamedKey::BrowserRefresh), Standard),
        Scancode::BrowserSearch => (Named(NamedKey::BrowserSearch), Standard),
        Scancode::BrowserStop => (Named(NamedKey::BrowserStop), Standard),
        Scancode::LaunchApp1 => (Named(NamedKey::LaunchApplication1), Standard),
        Scancode::LaunchApp2 => (Named(NamedKey::LaunchApplication2), Standard),
        Scancode::LaunchMail => (Named(NamedKey::LaunchMail), Standard),
        Scancode::MediaPlayPause => (Named(NamedKey::MediaPlayPause), Standard),
        Scancode::MediaSelect => (Named(NamedKey::LaunchMediaPlayer), Standard),
        Scancode::MediaStop => (Named(NamedKey::MediaStop), Standard),
        Scancode::MediaTrackNext => (Named(NamedKey::MediaTrackNext), Standard),
        Scancode::MediaTrackPrevious => (Named(NamedKey::MediaTrackPrevious), Standard),
        Scancode::Power => (Named(NamedKey::Power), Standard),
        Scancode::Sleep => (Named(NamedKey::Standby), Standard),
        Scancode::AudioVolumeDown => (Named(NamedKey::AudioVolumeDown), Standard),
        Scancode::AudioVolumeMute => (Named(NamedKey::AudioVolumeMute), Standard),
        Scancode::AudioVolumeUp => (Named(NamedKey::AudioVolumeUp), Standard),

        Scancode::F1 => (Named(NamedKey::F1), Standard),
        Scancode::F2 => (Named(NamedKey::F2), Standard),
        Scancode::F3 => (Named(NamedKey::F3), Standard),
        Scancode::F4 => (Named(NamedKey::F4), Standard),
        Scancode::F5 => (Named(NamedKey::F5), Standard),
        Scancode::F6 => (Named(NamedKey::F6), Standard),
        Scancode::F7 => (Named(NamedKey::F7), Standard),
        Scancode::F8 => (Named(NamedKey::F8), Standard),
        Scancode::F9 => (Named(NamedKey::F9), Standard),
        Scancode::F10 => (Named(NamedKey::F10), Standard),
        Scancode::F11 => (Named(NamedKey::F11), Standard),
        Scancode::F12 => (Named(NamedKey::F12), Standard),
        Scancode::F13 => (Named(NamedKey::F13), Standard),
        Scancode::F14 => (Named(NamedKey::F14), Standard),
        Scancode::F15 => (Named(NamedKey::F15), Standard),
        Scancode::F16 => (Named(NamedKey::F16), Standard),
        Scancode::F17 => (Named(NamedKey::F17), Standard),
        Scancode::F18 => (Named(NamedKey::F18), Standard),
        Scancode::F19 => (Named(NamedKey::F19), Standard),
        Scancode::F20 => (Named(NamedKey::F20), Standard),
        Scancode::F21 => (Named(NamedKey::F21), Standard),
        Scancode::F22 => (Named(NamedKey::F22), Standard),
        Scancode::F23 => (Named(NamedKey::F23), Standard),
        Scancode::F24 => (Named(NamedKey::F24), Standard),

        _ => return None,
    };

    Some(entry)
}

/// Raw X11 keycodes (evdev + 8) that winit leaves unidentified.
fn native_default_symbol(native: NativeKeyCode) -> Option<(Symbol, KeyLocation)> {
    let named = match native {
        NativeKeyCode::Xkb(232) => NamedKey::BrightnessDown,
        NativeKeyCode::Xkb(233) => NamedKey::BrightnessUp,
        NativeKeyCode::Xkb(150) => NamedKey::Standby,
        _ => return None,
    };
    Some((Symbol::Named(named), KeyLocation::Standard))
}
