use crate::keys::EngineKey;

pub const KEY_QUEUE_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub pressed: bool,
    pub key: EngineKey,
}

impl KeyEvent {
    pub const fn pressed(key: EngineKey) -> Self {
        Self { pressed: true, key }
    }

    pub const fn released(key: EngineKey) -> Self {
        Self {
            pressed: false,
            key,
        }
    }
}

const EMPTY_SLOT: KeyEvent = KeyEvent::released(EngineKey(0));

/// Fixed-capacity ring of key events.
///
/// A push into a full queue overwrites the oldest unread event and moves the
/// read cursor past it. Nothing reports the loss.
#[derive(Debug, Clone)]
pub struct KeyQueue {
    slots: [KeyEvent; KEY_QUEUE_CAPACITY],
    read: usize,
    write: usize,
    len: usize,
}

impl Default for KeyQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyQueue {
    pub const fn new() -> Self {
        Self {
            slots: [EMPTY_SLOT; KEY_QUEUE_CAPACITY],
            read: 0,
            write: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, event: KeyEvent) {
        self.slots[self.write] = event;
        self.write = (self.write + 1) % KEY_QUEUE_CAPACITY;
        if self.len == KEY_QUEUE_CAPACITY {
            self.read = (self.read + 1) % KEY_QUEUE_CAPACITY;
        } else {
            self.len += 1;
        }
    }

    pub fn pop(&mut self) -> Option<KeyEvent> {
        if self.len == 0 {
            return None;
        }
        let event = self.slots[self.read];
        self.read = (self.read + 1) % KEY_QUEUE_CAPACITY;
        self.len -= 1;
        Some(event)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cursors(&self) -> (usize, usize) {
        (self.read, self.write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: u8) -> KeyEvent {
        KeyEvent::pressed(EngineKey(n))
    }

    #[test]
    fn empty_queue_pops_nothing_repeatedly() {
        let mut queue = KeyQueue::new();
        assert_eq!(queue.pop(), None);
        assert_eq!(queue.pop(), None);
        assert_eq!(queue.cursors(), (0, 0));
        assert!(queue.is_empty());
    }

    #[test]
    fn events_come_out_in_push_order() {
        let mut queue = KeyQueue::new();
        queue.push(numbered(1));
        queue.push(KeyEvent::released(EngineKey(1)));
        queue.push(numbered(2));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(numbered(1)));
        assert_eq!(queue.pop(), Some(KeyEvent::released(EngineKey(1))));
        assert_eq!(queue.pop(), Some(numbered(2)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn full_queue_holds_capacity_events() {
        let mut queue = KeyQueue::new();
        for n in 0..KEY_QUEUE_CAPACITY as u8 {
            queue.push(numbered(n));
        }
        assert_eq!(queue.len(), KEY_QUEUE_CAPACITY);
        for n in 0..KEY_QUEUE_CAPACITY as u8 {
            assert_eq!(queue.pop(), Some(numbered(n)));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn overflow_drops_oldest_unread_event() {
        let mut queue = KeyQueue::new();
        for n in 1..=(KEY_QUEUE_CAPACITY as u8 + 1) {
            queue.push(numbered(n));
        }

        assert_eq!(queue.len(), KEY_QUEUE_CAPACITY);
        for n in 2..=(KEY_QUEUE_CAPACITY as u8 + 1) {
            assert_eq!(queue.pop(), Some(numbered(n)));
        }
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn cursors_stay_in_range_under_interleaving() {
        let mut queue = KeyQueue::new();
        let mut seed: u32 = 0x9e37_79b9;
        for step in 0..10_000u32 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let pushes = seed % 5;
            let pops = (seed >> 8) % 4;
            for _ in 0..pushes {
                queue.push(numbered(step as u8));
            }
            for _ in 0..pops {
                queue.pop();
            }
            let (read, write) = queue.cursors();
            assert!(read < KEY_QUEUE_CAPACITY, "read={read} step={step}");
            assert!(write < KEY_QUEUE_CAPACITY, "write={write} step={step}");
            assert!(queue.len() <= KEY_QUEUE_CAPACITY);
            assert_eq!((read + queue.len()) % KEY_QUEUE_CAPACITY, write);
        }
    }
}
