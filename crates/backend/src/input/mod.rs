mod mouse;
mod poller;
mod queue;

pub use mouse::{
    mouse_motion_event, EngineEvent, EngineEventKind, DEFAULT_MOUSE_SENSITIVITY,
};
pub use poller::{InputPoller, InputSource};
pub use queue::{KeyEvent, KeyQueue, KEY_QUEUE_CAPACITY};
