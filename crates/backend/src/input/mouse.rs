use super::queue::KeyEvent;

pub const DEFAULT_MOUSE_SENSITIVITY: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEventKind {
    KeyDown,
    KeyUp,
    Mouse,
}

/// Event record in the engine's own layout.
///
/// For mouse events `data1` holds the button mask and `data2`/`data3` the
/// horizontal and vertical motion. For key events `data1` is the engine key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineEvent {
    pub kind: EngineEventKind,
    pub data1: i32,
    pub data2: i32,
    pub data3: i32,
}

impl From<KeyEvent> for EngineEvent {
    fn from(event: KeyEvent) -> Self {
        Self {
            kind: if event.pressed {
                EngineEventKind::KeyDown
            } else {
                EngineEventKind::KeyUp
            },
            data1: i32::from(event.key.0),
            data2: 0,
            data3: 0,
        }
    }
}

/// Horizontal-only motion event; buttons and vertical motion stay zero.
pub fn mouse_motion_event(delta_x: f32, sensitivity: i32) -> EngineEvent {
    EngineEvent {
        kind: EngineEventKind::Mouse,
        data1: 0,
        data2: (sensitivity as f32 * delta_x) as i32,
        data3: 0,
    }
}
