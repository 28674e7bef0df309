use crate::keys::{translate, EngineKey, HostKey, BINDINGS};

use super::queue::{KeyEvent, KeyQueue};

/// Per-frame, edge-triggered view of the input devices.
///
/// Each query answers for the current frame only and is true once per
/// transition.
pub trait InputSource {
    fn is_key_pressed(&self, key: HostKey) -> bool;
    fn is_key_released(&self, key: HostKey) -> bool;
    fn is_primary_button_pressed(&self) -> bool;
    fn is_primary_button_released(&self) -> bool;
}

/// Turns frame transitions into queued engine key events.
#[derive(Debug, Default)]
pub struct InputPoller {
    queue: KeyQueue,
    queued_count: usize,
}

impl InputPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans the primary mouse button, then every binding in table order.
    pub fn poll(&mut self, source: &dyn InputSource) {
        if source.is_primary_button_pressed() {
            self.push(KeyEvent::pressed(EngineKey::FIRE));
        } else if source.is_primary_button_released() {
            self.push(KeyEvent::released(EngineKey::FIRE));
        }

        for binding in &BINDINGS {
            if source.is_key_pressed(binding.host) {
                self.push(KeyEvent::pressed(translate(binding.host)));
            } else if source.is_key_released(binding.host) {
                self.push(KeyEvent::released(translate(binding.host)));
            }
        }
    }

    fn push(&mut self, event: KeyEvent) {
        self.queue.push(event);
        self.queued_count += 1;
    }

    /// Events queued since the last call, including any later overwritten.
    pub fn take_queued_count(&mut self) -> usize {
        std::mem::take(&mut self.queued_count)
    }

    pub fn pop(&mut self) -> Option<KeyEvent> {
        self.queue.pop()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    #[cfg(test)]
    pub(crate) fn queue(&self) -> &KeyQueue {
        &self.queue
    }
}
