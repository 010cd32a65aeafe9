//! Canonical key codes.
//!
//! Values follow Windows virtual-key codes, extended with media, DTV, OCAP and
//! gamepad codes. The numeric values are a stable contract: never renumber.

macro_rules! key_codes {
    ($($(#[$meta:meta])* $name:ident = $value:literal,)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u32)]
        pub enum KeyCode {
            $($(#[$meta])* $name = $value,)*
        }

        impl KeyCode {
            /// Every code, in declaration order.
            pub const ALL: &'static [KeyCode] = &[$(KeyCode::$name,)*];

            /// Inverse of [`KeyCode::raw`].
            pub const fn from_raw(value: u32) -> Option<KeyCode> {
                match value {
                    $($value => Some(KeyCode::$name),)*
                    _ => None,
                }
            }
        }
    };
}

key_codes! {
    Unknown = 0x00,
    Backspace = 0x08,
    Tab = 0x09,
    Backtab = 0x0A,
    Clear = 0x0C,
    /// Return/Enter, on either the main block or the keypad.
    Return = 0x0D,
    /// Left or right Shift.
    Shift = 0x10,
    /// Left or right Control.
    Control = 0x11,
    /// Left or right Alt.
    Menu = 0x12,
    Pause = 0x13,
    Capital = 0x14,
    /// Also Hangul.
    Kana = 0x15,
    Junja = 0x17,
    Final = 0x18,
    /// Also Kanji.
    Hanja = 0x19,
    Escape = 0x1B,
    Convert = 0x1C,
    Nonconvert = 0x1D,
    Accept = 0x1E,
    Modechange = 0x1F,
    Space = 0x20,
    /// Page Up.
    Prior = 0x21,
    /// Page Down.
    Next = 0x22,
    End = 0x23,
    Home = 0x24,
    Left = 0x25,
    Up = 0x26,
    Right = 0x27,
    Down = 0x28,
    Select = 0x29,
    Print = 0x2A,
    Execute = 0x2B,
    Snapshot = 0x2C,
    Insert = 0x2D,
    Delete = 0x2E,
    Help = 0x2F,
    Key0 = 0x30,
    Key1 = 0x31,
    Key2 = 0x32,
    Key3 = 0x33,
    Key4 = 0x34,
    Key5 = 0x35,
    Key6 = 0x36,
    Key7 = 0x37,
    Key8 = 0x38,
    Key9 = 0x39,
    A = 0x41,
    B = 0x42,
    C = 0x43,
    D = 0x44,
    E = 0x45,
    F = 0x46,
    G = 0x47,
    H = 0x48,
    I = 0x49,
    J = 0x4A,
    K = 0x4B,
    L = 0x4C,
    M = 0x4D,
    N = 0x4E,
    O = 0x4F,
    P = 0x50,
    Q = 0x51,
    R = 0x52,
    S = 0x53,
    T = 0x54,
    U = 0x55,
    V = 0x56,
    W = 0x57,
    X = 0x58,
    Y = 0x59,
    Z = 0x5A,
    /// Left Windows/Super key. Also Command.
    Lwin = 0x5B,
    Rwin = 0x5C,
    Apps = 0x5D,
    Sleep = 0x5F,
    Numpad0 = 0x60,
    Numpad1 = 0x61,
    Numpad2 = 0x62,
    Numpad3 = 0x63,
    Numpad4 = 0x64,
    Numpad5 = 0x65,
    Numpad6 = 0x66,
    Numpad7 = 0x67,
    Numpad8 = 0x68,
    Numpad9 = 0x69,
    Multiply = 0x6A,
    Add = 0x6B,
    Separator = 0x6C,
    Subtract = 0x6D,
    Decimal = 0x6E,
    Divide = 0x6F,
    F1 = 0x70,
    F2 = 0x71,
    F3 = 0x72,
    F4 = 0x73,
    F5 = 0x74,
    F6 = 0x75,
    F7 = 0x76,
    F8 = 0x77,
    F9 = 0x78,
    F10 = 0x79,
    F11 = 0x7A,
    F12 = 0x7B,
    F13 = 0x7C,
    F14 = 0x7D,
    F15 = 0x7E,
    F16 = 0x7F,
    F17 = 0x80,
    F18 = 0x81,
    F19 = 0x82,
    F20 = 0x83,
    F21 = 0x84,
    F22 = 0x85,
    F23 = 0x86,
    F24 = 0x87,
    Numlock = 0x90,
    Scroll = 0x91,
    Wlan = 0x97,
    Power = 0x98,
    BrowserBack = 0xA6,
    BrowserForward = 0xA7,
    BrowserRefresh = 0xA8,
    BrowserStop = 0xA9,
    BrowserSearch = 0xAA,
    BrowserFavorites = 0xAB,
    BrowserHome = 0xAC,
    VolumeMute = 0xAD,
    VolumeDown = 0xAE,
    VolumeUp = 0xAF,
    MediaNextTrack = 0xB0,
    MediaPrevTrack = 0xB1,
    MediaStop = 0xB2,
    MediaPlayPause = 0xB3,
    MediaLaunchMail = 0xB4,
    MediaLaunchMediaSelect = 0xB5,
    MediaLaunchApp1 = 0xB6,
    MediaLaunchApp2 = 0xB7,
    /// `;:` on a US layout.
    Oem1 = 0xBA,
    /// `=+` on a US layout.
    OemPlus = 0xBB,
    OemComma = 0xBC,
    OemMinus = 0xBD,
    OemPeriod = 0xBE,
    /// `/?` on a US layout.
    Oem2 = 0xBF,
    /// `` `~ `` on a US layout.
    Oem3 = 0xC0,
    BrightnessDown = 0xD8,
    BrightnessUp = 0xD9,
    KbdBrightnessDown = 0xDA,
    /// `[{` on a US layout.
    Oem4 = 0xDB,
    /// `\|` on a US layout.
    Oem5 = 0xDC,
    /// `]}` on a US layout.
    Oem6 = 0xDD,
    /// `'"` on a US layout.
    Oem7 = 0xDE,
    Oem8 = 0xDF,
    /// The extra key between left Shift and Z on ISO keyboards.
    Oem102 = 0xE2,
    MediaRewind = 0xE3,
    MediaFastForward = 0xE4,
    KbdBrightnessUp = 0xE8,
    DbeSbcschar = 0xF3,
    DbeDbcschar = 0xF4,
    Play = 0xFA,
    Red = 0x193,
    Green = 0x194,
    Yellow = 0x195,
    Blue = 0x196,
    ChannelUp = 0x1AB,
    ChannelDown = 0x1AC,
    Info = 0x1C9,
    Guide = 0x1CA,
    /// Also ClosedCaption.
    Subtitle = 0x1CC,
    /// Also PreviousChannel.
    Last = 0x25F,
    InstantReplay = 0x273,
    LaunchThisApplication = 0x3000,
    MediaAudioTrack = 0x3001,
    Microphone = 0x3002,
    Mouse1 = 0x7000,
    Mouse2 = 0x7001,
    Mouse3 = 0x7002,
    Mouse4 = 0x7003,
    Mouse5 = 0x7004,
    /// Xbox A, PS O or X, Switch A.
    Gamepad1 = 0x8000,
    /// Xbox B, PS X or O, Switch B.
    Gamepad2 = 0x8001,
    /// Xbox X, PS square, Switch X.
    Gamepad3 = 0x8002,
    /// Xbox Y, PS triangle, Switch Y.
    Gamepad4 = 0x8003,
    GamepadLeftBumper = 0x8004,
    GamepadRightBumper = 0x8005,
    GamepadLeftTrigger = 0x8006,
    GamepadRightTrigger = 0x8007,
    /// Back / Select.
    Gamepad5 = 0x8008,
    /// Start / Menu.
    Gamepad6 = 0x8009,
    GamepadLeftStick = 0x800A,
    GamepadRightStick = 0x800B,
    GamepadDPadUp = 0x800C,
    GamepadDPadDown = 0x800D,
    GamepadDPadLeft = 0x800E,
    GamepadDPadRight = 0x800F,
    GamepadSystem = 0x8010,
    GamepadLeftStickUp = 0x8011,
    GamepadLeftStickDown = 0x8012,
    GamepadLeftStickLeft = 0x8013,
    GamepadLeftStickRight = 0x8014,
    GamepadRightStickUp = 0x8015,
    GamepadRightStickDown = 0x8016,
    GamepadRightStickLeft = 0x8017,
    GamepadRightStickRight = 0x8018,
}

impl KeyCode {
    pub const HANGUL: KeyCode = KeyCode::Kana;
    pub const KANJI: KeyCode = KeyCode::Hanja;
    pub const COMMAND: KeyCode = KeyCode::Lwin;
    pub const CLOSED_CAPTION: KeyCode = KeyCode::Subtitle;
    pub const PREVIOUS_CHANNEL: KeyCode = KeyCode::Last;

    /// Stable numeric value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self as u32
    }
}

impl Default for KeyCode {
    fn default() -> Self {
        KeyCode::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_values_are_fixed() {
        assert_eq!(KeyCode::Unknown.raw(), 0);
        assert_eq!(KeyCode::Return.raw(), 0x0D);
        assert_eq!(KeyCode::Key0.raw(), 0x30);
        assert_eq!(KeyCode::A.raw(), 0x41);
        assert_eq!(KeyCode::Numpad9.raw(), 0x69);
        assert_eq!(KeyCode::F24.raw(), 0x87);
        assert_eq!(KeyCode::Oem7.raw(), 0xDE);
        assert_eq!(KeyCode::Red.raw(), 0x193);
        assert_eq!(KeyCode::Last.raw(), 0x25F);
        assert_eq!(KeyCode::Mouse1.raw(), 0x7000);
        assert_eq!(KeyCode::GamepadRightStickRight.raw(), 0x8018);
    }

    #[test]
    fn aliases_share_values() {
        assert_eq!(KeyCode::HANGUL.raw(), 0x15);
        assert_eq!(KeyCode::KANJI.raw(), 0x19);
        assert_eq!(KeyCode::COMMAND, KeyCode::Lwin);
        assert_eq!(KeyCode::CLOSED_CAPTION.raw(), 0x1CC);
        assert_eq!(KeyCode::PREVIOUS_CHANNEL.raw(), 0x25F);
    }

    #[test]
    fn raw_values_round_trip_through_the_table() {
        for &k in KeyCode::ALL {
            assert_eq!(KeyCode::from_raw(k.raw()), Some(k));
        }
        assert_eq!(KeyCode::from_raw(0x40), None);
        assert_eq!(KeyCode::from_raw(0xFFFF_FFFF), None);
    }
}
