use crate::input::{EngineEvent, KeyEvent};

/// Callbacks the backend offers to the host engine.
///
/// None of these fail from the host's point of view. Presentation and audio
/// problems are logged by the backend and, where fatal, end the run after the
/// current tick.
pub trait Platform {
    /// Presents one engine frame of `0x00RRGGBB` pixels and closes the input
    /// frame, queueing any key transitions observed since the last call.
    fn draw_frame(&mut self, screen: &[u32]);

    fn sleep_ms(&mut self, ms: u32);

    /// Milliseconds since the backend started, wrapping at `u32::MAX`.
    fn ticks_ms(&self) -> u32;

    /// Oldest pending key event, if any.
    fn next_key_event(&mut self) -> Option<KeyEvent>;

    /// Mouse motion observed during the last completed frame.
    fn mouse_event(&mut self) -> EngineEvent;

    fn set_window_title(&mut self, title: &str);

    fn start_music(&mut self, song: usize);

    fn stop_music(&mut self);

    fn update_music(&mut self);
}

/// The engine side of the contract.
pub trait EngineHost {
    /// Screen buffer size in pixels; fixed for the whole run.
    fn resolution(&self) -> (u32, u32);

    /// Called once after the backend window and audio are up.
    fn start(&mut self, _platform: &mut dyn Platform) {}

    fn tick(&mut self, platform: &mut dyn Platform);

    fn shutdown(&mut self) {}
}
