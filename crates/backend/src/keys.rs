//! Host key codes, engine key codes, and the binding table that connects them.
//!
//! Host codes follow the GLFW numbering: printable keys use their uppercase
//! ASCII value and everything else lives at 256 and above. Engine codes are the
//! legacy 8-bit vocabulary, where non-printable keys set the high bit.
//! `EngineKey` carries the whole doomkeys set, including codes no binding
//! produces, so hosts can name any key the engine understands.

/// Number of distinct host key codes tracked by frame input.
pub const HOST_KEY_SPACE: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostKey(pub u16);

impl HostKey {
    pub const SPACE: Self = Self(32);
    pub const APOSTROPHE: Self = Self(39);
    pub const COMMA: Self = Self(44);
    pub const MINUS: Self = Self(45);
    pub const PERIOD: Self = Self(46);
    pub const SLASH: Self = Self(47);
    pub const DIGIT_0: Self = Self(48);
    pub const SEMICOLON: Self = Self(59);
    pub const EQUAL: Self = Self(61);
    pub const A: Self = Self(65);
    pub const D: Self = Self(68);
    pub const S: Self = Self(83);
    pub const W: Self = Self(87);
    pub const Y: Self = Self(89);
    pub const LEFT_BRACKET: Self = Self(91);
    pub const BACKSLASH: Self = Self(92);
    pub const RIGHT_BRACKET: Self = Self(93);
    pub const GRAVE: Self = Self(96);
    pub const ESCAPE: Self = Self(256);
    pub const ENTER: Self = Self(257);
    pub const TAB: Self = Self(258);
    pub const BACKSPACE: Self = Self(259);
    pub const INSERT: Self = Self(260);
    pub const DELETE: Self = Self(261);
    pub const RIGHT: Self = Self(262);
    pub const LEFT: Self = Self(263);
    pub const DOWN: Self = Self(264);
    pub const UP: Self = Self(265);
    pub const PAGE_UP: Self = Self(266);
    pub const PAGE_DOWN: Self = Self(267);
    pub const HOME: Self = Self(268);
    pub const END: Self = Self(269);
    pub const CAPS_LOCK: Self = Self(280);
    pub const SCROLL_LOCK: Self = Self(281);
    pub const NUM_LOCK: Self = Self(282);
    pub const PRINT_SCREEN: Self = Self(283);
    pub const PAUSE: Self = Self(284);
    pub const F1: Self = Self(290);
    pub const F2: Self = Self(291);
    pub const F3: Self = Self(292);
    pub const F4: Self = Self(293);
    pub const F5: Self = Self(294);
    pub const F6: Self = Self(295);
    pub const F7: Self = Self(296);
    pub const F8: Self = Self(297);
    pub const F9: Self = Self(298);
    pub const F10: Self = Self(299);
    pub const F11: Self = Self(300);
    pub const F12: Self = Self(301);
    pub const LEFT_SHIFT: Self = Self(340);
    pub const LEFT_CONTROL: Self = Self(341);
    pub const LEFT_ALT: Self = Self(342);
    pub const LEFT_SUPER: Self = Self(343);
    pub const RIGHT_SHIFT: Self = Self(344);
    pub const RIGHT_CONTROL: Self = Self(345);
    pub const RIGHT_ALT: Self = Self(346);
    pub const RIGHT_SUPER: Self = Self(347);

    /// Host code of an ASCII letter, digit or punctuation key.
    pub const fn ascii(byte: u8) -> Self {
        Self(byte.to_ascii_uppercase() as u16)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineKey(pub u8);

impl EngineKey {
    pub const TAB: Self = Self(9);
    pub const ENTER: Self = Self(13);
    pub const ESCAPE: Self = Self(27);
    pub const MINUS: Self = Self(0x2d);
    pub const EQUALS: Self = Self(0x3d);
    pub const BACKSPACE: Self = Self(0x7f);
    pub const STRAFE_LEFT: Self = Self(0xa0);
    pub const STRAFE_RIGHT: Self = Self(0xa1);
    pub const USE: Self = Self(0xa2);
    pub const FIRE: Self = Self(0xa3);
    pub const LEFT_ARROW: Self = Self(0xac);
    pub const UP_ARROW: Self = Self(0xad);
    pub const RIGHT_ARROW: Self = Self(0xae);
    pub const DOWN_ARROW: Self = Self(0xaf);
    pub const RCTRL: Self = Self(0x80 + 0x1d);
    pub const RSHIFT: Self = Self(0x80 + 0x36);
    pub const RALT: Self = Self(0x80 + 0x38);
    pub const LALT: Self = Self::RALT;
    pub const CAPS_LOCK: Self = Self(0x80 + 0x3a);
    pub const F1: Self = Self(0x80 + 0x3b);
    pub const F2: Self = Self(0x80 + 0x3c);
    pub const F3: Self = Self(0x80 + 0x3d);
    pub const F4: Self = Self(0x80 + 0x3e);
    pub const F5: Self = Self(0x80 + 0x3f);
    pub const F6: Self = Self(0x80 + 0x40);
    pub const F7: Self = Self(0x80 + 0x41);
    pub const F8: Self = Self(0x80 + 0x42);
    pub const F9: Self = Self(0x80 + 0x43);
    pub const F10: Self = Self(0x80 + 0x44);
    pub const NUM_LOCK: Self = Self(0x80 + 0x45);
    pub const SCROLL_LOCK: Self = Self(0x80 + 0x46);
    pub const HOME: Self = Self(0x80 + 0x47);
    pub const PAGE_UP: Self = Self(0x80 + 0x49);
    pub const END: Self = Self(0x80 + 0x4f);
    pub const PAGE_DOWN: Self = Self(0x80 + 0x51);
    pub const INSERT: Self = Self(0x80 + 0x52);
    pub const DELETE: Self = Self(0x80 + 0x53);
    pub const F11: Self = Self(0x80 + 0x57);
    pub const F12: Self = Self(0x80 + 0x58);
    pub const PRINT_SCREEN: Self = Self(0x80 + 0x59);
    pub const PAUSE: Self = Self(0xff);

    /// Non-printable engine keys carry the high bit.
    pub const fn is_extended(self) -> bool {
        self.0 & 0x80 != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub host: HostKey,
    pub engine: EngineKey,
}

const fn bind(host: HostKey, engine: EngineKey) -> Binding {
    Binding { host, engine }
}

/// Keys the poller watches, in poll order.
pub const BINDINGS: [Binding; 30] = [
    bind(HostKey::ENTER, EngineKey::ENTER),
    bind(HostKey::Y, EngineKey(b'y')),
    bind(HostKey::ESCAPE, EngineKey::ESCAPE),
    bind(HostKey::LEFT, EngineKey::LEFT_ARROW),
    bind(HostKey::A, EngineKey::STRAFE_LEFT),
    bind(HostKey::RIGHT, EngineKey::RIGHT_ARROW),
    bind(HostKey::D, EngineKey::STRAFE_RIGHT),
    bind(HostKey::UP, EngineKey::UP_ARROW),
    bind(HostKey::W, EngineKey::UP_ARROW),
    bind(HostKey::DOWN, EngineKey::DOWN_ARROW),
    bind(HostKey::S, EngineKey::DOWN_ARROW),
    bind(HostKey::LEFT_CONTROL, EngineKey::FIRE),
    bind(HostKey::RIGHT_CONTROL, EngineKey::FIRE),
    bind(HostKey::SPACE, EngineKey::USE),
    bind(HostKey::LEFT_SHIFT, EngineKey::RSHIFT),
    bind(HostKey::RIGHT_SHIFT, EngineKey::RSHIFT),
    bind(HostKey::LEFT_ALT, EngineKey::LALT),
    bind(HostKey::RIGHT_ALT, EngineKey::LALT),
    bind(HostKey::F2, EngineKey::F2),
    bind(HostKey::F3, EngineKey::F3),
    bind(HostKey::F4, EngineKey::F4),
    bind(HostKey::F5, EngineKey::F5),
    bind(HostKey::F6, EngineKey::F6),
    bind(HostKey::F7, EngineKey::F7),
    bind(HostKey::F8, EngineKey::F8),
    bind(HostKey::F9, EngineKey::F9),
    bind(HostKey::F10, EngineKey::F10),
    bind(HostKey::F11, EngineKey::F11),
    bind(HostKey::EQUAL, EngineKey::EQUALS),
    bind(HostKey::MINUS, EngineKey::MINUS),
];

/// Maps a host key to the engine vocabulary.
///
/// Keys missing from [`BINDINGS`] fall through as their own code truncated to
/// eight bits, so printable ASCII keys keep their value and the engine decides
/// what to make of them. Aliases (arrow and WASD, left and right modifiers)
/// collapse to one engine code with no bookkeeping between them.
pub fn translate(key: HostKey) -> EngineKey {
    BINDINGS
        .iter()
        .find(|binding| binding.host == key)
        .map(|binding| binding.engine)
        .unwrap_or(EngineKey(key.0 as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_bound(key: HostKey) -> bool {
        BINDINGS.iter().any(|binding| binding.host == key)
    }

    #[test]
    fn unbound_codes_pass_through_unchanged() {
        for code in 0u16..=255 {
            let key = HostKey(code);
            if is_bound(key) {
                continue;
            }
            assert_eq!(translate(key), EngineKey(code as u8), "code={code}");
        }
    }

    #[test]
    fn documented_bindings_translate_exactly() {
        let expected = [
            (HostKey::ENTER, 13),
            (HostKey::Y, b'y'),
            (HostKey::ESCAPE, 27),
            (HostKey::LEFT, 0xac),
            (HostKey::A, 0xa0),
            (HostKey::RIGHT, 0xae),
            (HostKey::D, 0xa1),
            (HostKey::SPACE, 0xa2),
            (HostKey::F2, 0x80 + 0x3c),
            (HostKey::F10, 0x80 + 0x44),
            (HostKey::F11, 0x80 + 0x57),
            (HostKey::EQUAL, 0x3d),
            (HostKey::MINUS, 0x2d),
        ];
        for (host, engine) in expected {
            assert_eq!(translate(host), EngineKey(engine), "host={host:?}");
        }
    }

    #[test]
    fn aliases_share_one_engine_code() {
        assert_eq!(translate(HostKey::UP), EngineKey::UP_ARROW);
        assert_eq!(translate(HostKey::W), EngineKey::UP_ARROW);
        assert_eq!(translate(HostKey::DOWN), EngineKey::DOWN_ARROW);
        assert_eq!(translate(HostKey::S), EngineKey::DOWN_ARROW);
        assert_eq!(translate(HostKey::LEFT_CONTROL), EngineKey::FIRE);
        assert_eq!(translate(HostKey::RIGHT_CONTROL), EngineKey::FIRE);
        assert_eq!(translate(HostKey::LEFT_SHIFT), EngineKey::RSHIFT);
        assert_eq!(translate(HostKey::RIGHT_SHIFT), EngineKey::RSHIFT);
        assert_eq!(translate(HostKey::LEFT_ALT), EngineKey::LALT);
        assert_eq!(translate(HostKey::RIGHT_ALT), EngineKey::LALT);
    }

    #[test]
    fn function_keys_map_in_sequence_up_to_f10() {
        let hosts = [
            HostKey::F2,
            HostKey::F3,
            HostKey::F4,
            HostKey::F5,
            HostKey::F6,
            HostKey::F7,
            HostKey::F8,
            HostKey::F9,
            HostKey::F10,
        ];
        for (offset, host) in hosts.into_iter().enumerate() {
            assert_eq!(translate(host), EngineKey(0x80 + 0x3c + offset as u8));
        }
    }

    #[test]
    fn binding_table_has_no_duplicate_host_keys() {
        for (index, binding) in BINDINGS.iter().enumerate() {
            assert!(
                BINDINGS[index + 1..]
                    .iter()
                    .all(|other| other.host != binding.host),
                "duplicate host key {:?}",
                binding.host
            );
        }
    }

    #[test]
    fn ascii_helper_uses_uppercase_code() {
        assert_eq!(HostKey::ascii(b'w'), HostKey::W);
        assert_eq!(HostKey::ascii(b'='), HostKey::EQUAL);
    }

    #[test]
    fn extended_flag_tracks_high_bit() {
        assert!(EngineKey::FIRE.is_extended());
        assert!(EngineKey::F11.is_extended());
        assert!(!EngineKey::ENTER.is_extended());
        assert!(!EngineKey(b'y').is_extended());
    }
}
