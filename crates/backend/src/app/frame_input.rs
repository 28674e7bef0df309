use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::input::InputSource;
use crate::keys::{HostKey, HOST_KEY_SPACE};

#[derive(Debug, Clone, Copy, Default)]
struct KeyLatch {
    is_down: bool,
    was_down: bool,
    tapped: bool,
}

impl KeyLatch {
    fn handle(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => self.is_down = true,
            ElementState::Released => {
                if self.is_down && !self.was_down {
                    self.tapped = true;
                }
                self.is_down = false;
            }
        }
    }

    fn pressed_edge(&self) -> bool {
        (self.is_down && !self.was_down) || self.tapped
    }

    fn released_edge(&self) -> bool {
        !self.is_down && self.was_down
    }

    // A tap reports its press now and its release on the following frame.
    fn end_frame(&mut self) {
        self.was_down = self.is_down || self.tapped;
        self.tapped = false;
    }
}

/// Keyboard and mouse state gathered from window events between two drawn
/// frames.
#[derive(Debug)]
pub(crate) struct FrameInput {
    keys: Vec<KeyLatch>,
    primary_button: KeyLatch,
    pending_motion_x: f64,
    frame_motion_x: f32,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            keys: vec![KeyLatch::default(); HOST_KEY_SPACE],
            primary_button: KeyLatch::default(),
            pending_motion_x: 0.0,
            frame_motion_x: 0.0,
        }
    }
}

impl FrameInput {
    pub(crate) fn handle_keyboard_input(&mut self, key_event: &winit::event::KeyEvent) {
        if key_event.repeat {
            return;
        }
        if let Some(key) = host_key_from_physical(key_event.physical_key) {
            self.handle_host_key(key, key_event.state);
        }
    }

    pub(crate) fn handle_host_key(&mut self, key: HostKey, state: ElementState) {
        if let Some(latch) = self.keys.get_mut(key.index()) {
            latch.handle(state);
        }
    }

    pub(crate) fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.primary_button.handle(state);
        }
    }

    pub(crate) fn add_mouse_motion(&mut self, delta_x: f64) {
        self.pending_motion_x += delta_x;
    }

    /// Horizontal motion of the last completed frame.
    pub(crate) fn mouse_delta_x(&self) -> f32 {
        self.frame_motion_x
    }

    /// Releases everything still held, e.g. when the window loses focus.
    pub(crate) fn release_all(&mut self) {
        for latch in self.keys.iter_mut().filter(|latch| latch.is_down) {
            latch.handle(ElementState::Released);
        }
        if self.primary_button.is_down {
            self.primary_button.handle(ElementState::Released);
        }
    }

    pub(crate) fn end_frame(&mut self) {
        for latch in &mut self.keys {
            latch.end_frame();
        }
        self.primary_button.end_frame();
        self.frame_motion_x = self.pending_motion_x as f32;
        self.pending_motion_x = 0.0;
    }

    fn latch(&self, key: HostKey) -> KeyLatch {
        self.keys.get(key.index()).copied().unwrap_or_default()
    }
}

impl InputSource for FrameInput {
    fn is_key_pressed(&self, key: HostKey) -> bool {
        self.latch(key).pressed_edge()
    }

    fn is_key_released(&self, key: HostKey) -> bool {
        self.latch(key).released_edge()
    }

    fn is_primary_button_pressed(&self) -> bool {
        self.primary_button.pressed_edge()
    }

    fn is_primary_button_released(&self) -> bool {
        self.primary_button.released_edge()
    }
}

pub(crate) fn host_key_from_physical(key: PhysicalKey) -> Option<HostKey> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let key = match code {
        KeyCode::Space => HostKey::SPACE,
        KeyCode::Quote => HostKey::APOSTROPHE,
        KeyCode::Comma => HostKey::COMMA,
        KeyCode::Minus => HostKey::MINUS,
        KeyCode::Period => HostKey::PERIOD,
        KeyCode::Slash => HostKey::SLASH,
        KeyCode::Digit0 => HostKey::ascii(b'0'),
        KeyCode::Digit1 => HostKey::ascii(b'1'),
        KeyCode::Digit2 => HostKey::ascii(b'2'),
        KeyCode::Digit3 => HostKey::ascii(b'3'),
        KeyCode::Digit4 => HostKey::ascii(b'4'),
        KeyCode::Digit5 => HostKey::ascii(b'5'),
        KeyCode::Digit6 => HostKey::ascii(b'6'),
        KeyCode::Digit7 => HostKey::ascii(b'7'),
        KeyCode::Digit8 => HostKey::ascii(b'8'),
        KeyCode::Digit9 => HostKey::ascii(b'9'),
        KeyCode::Semicolon => HostKey::SEMICOLON,
        KeyCode::Equal => HostKey::EQUAL,
        KeyCode::KeyA => HostKey::ascii(b'a'),
        KeyCode::KeyB => HostKey::ascii(b'b'),
        KeyCode::KeyC => HostKey::ascii(b'c'),
        KeyCode::KeyD => HostKey::ascii(b'd'),
        KeyCode::KeyE => HostKey::ascii(b'e'),
        KeyCode::KeyF => HostKey::ascii(b'f'),
        KeyCode::KeyG => HostKey::ascii(b'g'),
        KeyCode::KeyH => HostKey::ascii(b'h'),
        KeyCode::KeyI => HostKey::ascii(b'i'),
        KeyCode::KeyJ => HostKey::ascii(b'j'),
        KeyCode::KeyK => HostKey::ascii(b'k'),
        KeyCode::KeyL => HostKey::ascii(b'l'),
        KeyCode::KeyM => HostKey::ascii(b'm'),
        KeyCode::KeyN => HostKey::ascii(b'n'),
        KeyCode::KeyO => HostKey::ascii(b'o'),
        KeyCode::KeyP => HostKey::ascii(b'p'),
        KeyCode::KeyQ => HostKey::ascii(b'q'),
        KeyCode::KeyR => HostKey::ascii(b'r'),
        KeyCode::KeyS => HostKey::ascii(b's'),
        KeyCode::KeyT => HostKey::ascii(b't'),
        KeyCode::KeyU => HostKey::ascii(b'u'),
        KeyCode::KeyV => HostKey::ascii(b'v'),
        KeyCode::KeyW => HostKey::ascii(b'w'),
        KeyCode::KeyX => HostKey::ascii(b'x'),
        KeyCode::KeyY => HostKey::ascii(b'y'),
        KeyCode::KeyZ => HostKey::ascii(b'z'),
        KeyCode::BracketLeft => HostKey::LEFT_BRACKET,
        KeyCode::Backslash => HostKey::BACKSLASH,
        KeyCode::BracketRight => HostKey::RIGHT_BRACKET,
        KeyCode::Backquote => HostKey::GRAVE,
        KeyCode::Escape => HostKey::ESCAPE,
        KeyCode::Enter => HostKey::ENTER,
        KeyCode::Tab => HostKey::TAB,
        KeyCode::Backspace => HostKey::BACKSPACE,
        KeyCode::Insert => HostKey::INSERT,
        KeyCode::Delete => HostKey::DELETE,
        KeyCode::ArrowRight => HostKey::RIGHT,
        KeyCode::ArrowLeft => HostKey::LEFT,
        KeyCode::ArrowDown => HostKey::DOWN,
        KeyCode::ArrowUp => HostKey::UP,
        KeyCode::PageUp => HostKey::PAGE_UP,
        KeyCode::PageDown => HostKey::PAGE_DOWN,
        KeyCode::Home => HostKey::HOME,
        KeyCode::End => HostKey::END,
        KeyCode::CapsLock => HostKey::CAPS_LOCK,
        KeyCode::ScrollLock => HostKey::SCROLL_LOCK,
        KeyCode::NumLock => HostKey::NUM_LOCK,
        KeyCode::PrintScreen => HostKey::PRINT_SCREEN,
        KeyCode::Pause => HostKey::PAUSE,
        KeyCode::F1 => HostKey::F1,
        KeyCode::F2 => HostKey::F2,
        KeyCode::F3 => HostKey::F3,
        KeyCode::F4 => HostKey::F4,
        KeyCode::F5 => HostKey::F5,
        KeyCode::F6 => HostKey::F6,
        KeyCode::F7 => HostKey::F7,
        KeyCode::F8 => HostKey::F8,
        KeyCode::F9 => HostKey::F9,
        KeyCode::F10 => HostKey::F10,
        KeyCode::F11 => HostKey::F11,
        KeyCode::F12 => HostKey::F12,
        KeyCode::ShiftLeft => HostKey::LEFT_SHIFT,
        KeyCode::ControlLeft => HostKey::LEFT_CONTROL,
        KeyCode::AltLeft => HostKey::LEFT_ALT,
        KeyCode::SuperLeft => HostKey::LEFT_SUPER,
        KeyCode::ShiftRight => HostKey::RIGHT_SHIFT,
        KeyCode::ControlRight => HostKey::RIGHT_CONTROL,
        KeyCode::AltRight => HostKey::RIGHT_ALT,
        KeyCode::SuperRight => HostKey::RIGHT_SUPER,
        _ => return None,
    };
    Some(key)
}
