use backend::{songs, EngineHost, EngineKey, KeyEvent, Platform};
use tracing::info;

const SCREEN_WIDTH: u32 = 640;
const SCREEN_HEIGHT: u32 = 400;
const BAR_COLORS: [u32; 8] = [
    0x00c0_c0c0,
    0x00c0_c000,
    0x0000_c0c0,
    0x0000_c000,
    0x00c0_00c0,
    0x00c0_0000,
    0x0000_00c0,
    0x0010_1010,
];
const MARKER_SIZE: i32 = 16;
const MARKER_COLOR: u32 = 0x00ff_ffff;
const MARKER_FIRE_COLOR: u32 = 0x00ff_4000;
const FIRE_FLASH_FRAMES: u32 = 8;
const DEFAULT_MARKER_SPEED: i32 = 4;
const MAX_MARKER_SPEED: i32 = 32;
/// Mouse deltas arrive pre-multiplied by the sensitivity.
const MOUSE_DIVISOR: i32 = 8;
const SCROLL_PIXELS_PER_TICK: u32 = 1;
/// F2..F10 are contiguous; F11 sits elsewhere in the extended range.
const SONG_KEYS: [EngineKey; 10] = [
    EngineKey::F2,
    EngineKey::F3,
    EngineKey::F4,
    EngineKey::F5,
    EngineKey::F6,
    EngineKey::F7,
    EngineKey::F8,
    EngineKey::F9,
    EngineKey::F10,
    EngineKey::F11,
];

/// Stand-in engine driving the backend callbacks until a real engine is
/// linked in.
pub(crate) struct TestCardHost {
    args: Vec<String>,
    screen: Vec<u32>,
    held: [u8; 256],
    marker: (i32, i32),
    speed: i32,
    scroll: u32,
    fire_flash: u32,
    last_key: Option<KeyEvent>,
}

impl TestCardHost {
    pub(crate) fn new(args: Vec<String>) -> Self {
        Self {
            args,
            screen: vec![0; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
            held: [0; 256],
            marker: (SCREEN_WIDTH as i32 / 2, SCREEN_HEIGHT as i32 / 2),
            speed: DEFAULT_MARKER_SPEED,
            scroll: 0,
            fire_flash: 0,
            last_key: None,
        }
    }

    fn is_held(&self, key: EngineKey) -> bool {
        self.held[usize::from(key.0)] > 0
    }

    fn handle_key(&mut self, event: KeyEvent, platform: &mut dyn Platform) {
        let slot = &mut self.held[usize::from(event.key.0)];
        if !event.pressed {
            *slot = slot.saturating_sub(1);
            return;
        }
        *slot = slot.saturating_add(1);

        if let Some(index) = SONG_KEYS.iter().position(|key| *key == event.key) {
            platform.start_music(index + 1);
        }
        match event.key {
            EngineKey::EQUALS => self.speed = (self.speed + 1).min(MAX_MARKER_SPEED),
            EngineKey::MINUS => self.speed = (self.speed - 1).max(1),
            EngineKey::FIRE => self.fire_flash = FIRE_FLASH_FRAMES,
            EngineKey::ESCAPE => platform.stop_music(),
            _ => {}
        }
    }

    fn move_marker(&mut self, mouse_dx: i32) {
        let mut dx = mouse_dx / MOUSE_DIVISOR;
        let mut dy = 0;
        if self.is_held(EngineKey::LEFT_ARROW) || self.is_held(EngineKey::STRAFE_LEFT) {
            dx -= self.speed;
        }
        if self.is_held(EngineKey::RIGHT_ARROW) || self.is_held(EngineKey::STRAFE_RIGHT) {
            dx += self.speed;
        }
        if self.is_held(EngineKey::UP_ARROW) {
            dy -= self.speed;
        }
        if self.is_held(EngineKey::DOWN_ARROW) {
            dy += self.speed;
        }
        self.marker.0 = (self.marker.0 + dx).clamp(0, SCREEN_WIDTH as i32 - MARKER_SIZE);
        self.marker.1 = (self.marker.1 + dy).clamp(0, SCREEN_HEIGHT as i32 - MARKER_SIZE);
    }

    fn paint(&mut self) {
        let bar_width = SCREEN_WIDTH / BAR_COLORS.len() as u32;
        for (y, row) in self.screen.chunks_exact_mut(SCREEN_WIDTH as usize).enumerate() {
            for (x, pixel) in row.iter_mut().enumerate() {
                let shifted = (x as u32 + self.scroll) % SCREEN_WIDTH;
                let bar = (shifted / bar_width) as usize % BAR_COLORS.len();
                let color = BAR_COLORS[bar];
                // Darker lower half so vertical flips are visible.
                *pixel = if y as u32 >= SCREEN_HEIGHT / 2 {
                    (color >> 1) & 0x007f_7f7f
                } else {
                    color
                };
            }
        }

        let color = if self.fire_flash > 0 {
            MARKER_FIRE_COLOR
        } else {
            MARKER_COLOR
        };
        let (left, top) = (self.marker.0 as usize, self.marker.1 as usize);
        for y in top..top + MARKER_SIZE as usize {
            let row = y * SCREEN_WIDTH as usize;
            self.screen[row + left..row + left + MARKER_SIZE as usize].fill(color);
        }
    }

    fn title(&self) -> String {
        match self.last_key {
            Some(event) => format!(
                "DOOM test card - key 0x{:02x} {}",
                event.key.0,
                if event.pressed { "down" } else { "up" }
            ),
            None => "DOOM test card".to_string(),
        }
    }
}

impl EngineHost for TestCardHost {
    fn resolution(&self) -> (u32, u32) {
        (SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    fn start(&mut self, platform: &mut dyn Platform) {
        info!(args = ?self.args, "test_card_started");
        platform.start_music(songs::INTROA);
    }

    fn tick(&mut self, platform: &mut dyn Platform) {
        while let Some(event) = platform.next_key_event() {
            self.handle_key(event, platform);
            self.last_key = Some(event);
        }
        let motion = platform.mouse_event();
        self.move_marker(motion.data2);

        self.scroll = (self.scroll + SCROLL_PIXELS_PER_TICK) % SCREEN_WIDTH;
        self.fire_flash = self.fire_flash.saturating_sub(1);
        self.paint();

        platform.update_music();
        platform.draw_frame(&self.screen);
        let title = self.title();
        platform.set_window_title(&title);
    }

    fn shutdown(&mut self) {
        info!("test_card_stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use backend::{mouse_motion_event, EngineEvent};

    use super::*;

    #[derive(Default)]
    struct RecordingPlatform {
        pending: VecDeque<KeyEvent>,
        mouse_dx: f32,
        frames: Vec<Vec<u32>>,
        titles: Vec<String>,
        songs: Vec<usize>,
        music_updates: u32,
        stops: u32,
    }

    impl Platform for RecordingPlatform {
        fn draw_frame(&mut self, screen: &[u32]) {
            self.frames.push(screen.to_vec());
        }

        fn sleep_ms(&mut self, _ms: u32) {}

        fn ticks_ms(&self) -> u32 {
            0
        }

        fn next_key_event(&mut self) -> Option<KeyEvent> {
            self.pending.pop_front()
        }

        fn mouse_event(&mut self) -> EngineEvent {
            mouse_motion_event(self.mouse_dx, 10)
        }

        fn set_window_title(&mut self, title: &str) {
            self.titles.push(title.to_string());
        }

        fn start_music(&mut self, song: usize) {
            self.songs.push(song);
        }

        fn stop_music(&mut self) {
            self.stops += 1;
        }

        fn update_music(&mut self) {
            self.music_updates += 1;
        }
    }

    fn host() -> TestCardHost {
        TestCardHost::new(vec!["doomgeneric-rl".to_string()])
    }

    #[test]
    fn start_plays_intro_song() {
        let mut platform = RecordingPlatform::default();
        host().start(&mut platform);
        assert_eq!(platform.songs, vec![songs::INTROA]);
    }

    #[test]
    fn tick_draws_one_full_frame_and_updates_music() {
        let mut platform = RecordingPlatform::default();
        let mut card = host();
        card.tick(&mut platform);

        assert_eq!(platform.frames.len(), 1);
        assert_eq!(
            platform.frames[0].len(),
            (SCREEN_WIDTH * SCREEN_HEIGHT) as usize
        );
        assert_eq!(platform.music_updates, 1);
        assert_eq!(platform.titles, vec!["DOOM test card".to_string()]);
    }

    #[test]
    fn tick_drains_every_pending_event() {
        let mut platform = RecordingPlatform::default();
        platform.pending.extend([
            KeyEvent::pressed(EngineKey::RIGHT_ARROW),
            KeyEvent::pressed(EngineKey::FIRE),
            KeyEvent::released(EngineKey::FIRE),
        ]);
        let mut card = host();
        card.tick(&mut platform);

        assert!(platform.pending.is_empty());
        assert!(card.is_held(EngineKey::RIGHT_ARROW));
        assert!(!card.is_held(EngineKey::FIRE));
        assert_eq!(card.fire_flash, FIRE_FLASH_FRAMES - 1);
        assert_eq!(platform.titles, vec!["DOOM test card - key 0xa3 up".to_string()]);
    }

    #[test]
    fn held_arrow_moves_marker_every_tick() {
        let mut platform = RecordingPlatform::default();
        platform
            .pending
            .push_back(KeyEvent::pressed(EngineKey::RIGHT_ARROW));
        let mut card = host();
        let start_x = card.marker.0;
        card.tick(&mut platform);
        card.tick(&mut platform);
        assert_eq!(card.marker.0, start_x + 2 * DEFAULT_MARKER_SPEED);

        platform
            .pending
            .push_back(KeyEvent::released(EngineKey::RIGHT_ARROW));
        card.tick(&mut platform);
        assert_eq!(card.marker.0, start_x + 2 * DEFAULT_MARKER_SPEED);
    }

    #[test]
    fn aliased_keys_stay_held_until_both_release() {
        let mut platform = RecordingPlatform::default();
        platform.pending.extend([
            KeyEvent::pressed(EngineKey::UP_ARROW),
            KeyEvent::pressed(EngineKey::UP_ARROW),
            KeyEvent::released(EngineKey::UP_ARROW),
        ]);
        let mut card = host();
        card.tick(&mut platform);
        assert!(card.is_held(EngineKey::UP_ARROW));
    }

    #[test]
    fn marker_is_clamped_to_screen() {
        let mut card = host();
        card.move_marker(i32::MAX / 2);
        assert_eq!(card.marker.0, SCREEN_WIDTH as i32 - MARKER_SIZE);
        card.move_marker(i32::MIN / 2);
        assert_eq!(card.marker.0, 0);
    }

    #[test]
    fn mouse_motion_moves_marker() {
        let mut platform = RecordingPlatform {
            mouse_dx: 4.0,
            ..RecordingPlatform::default()
        };
        let mut card = host();
        let start_x = card.marker.0;
        card.tick(&mut platform);
        assert_eq!(card.marker.0, start_x + 40 / MOUSE_DIVISOR);
    }

    #[test]
    fn function_keys_select_songs() {
        let mut platform = RecordingPlatform::default();
        platform.pending.extend([
            KeyEvent::pressed(EngineKey::F2),
            KeyEvent::released(EngineKey::F2),
            KeyEvent::pressed(EngineKey::F11),
            KeyEvent::pressed(EngineKey::ESCAPE),
        ]);
        host().tick(&mut platform);
        assert_eq!(platform.songs, vec![1, 10]);
        assert_eq!(platform.stops, 1);
    }

    #[test]
    fn equals_and_minus_adjust_speed_within_bounds() {
        let mut platform = RecordingPlatform::default();
        let mut card = host();
        platform.pending.push_back(KeyEvent::pressed(EngineKey::EQUALS));
        card.tick(&mut platform);
        assert_eq!(card.speed, DEFAULT_MARKER_SPEED + 1);

        for _ in 0..(2 * MAX_MARKER_SPEED) {
            platform.pending.push_back(KeyEvent::pressed(EngineKey::MINUS));
        }
        card.tick(&mut platform);
        assert_eq!(card.speed, 1);
    }

    #[test]
    fn fire_flashes_marker() {
        let mut platform = RecordingPlatform::default();
        platform.pending.push_back(KeyEvent::pressed(EngineKey::FIRE));
        let mut card = host();
        card.tick(&mut platform);

        let (x, y) = (card.marker.0 as usize, card.marker.1 as usize);
        let frame = &platform.frames[0];
        assert_eq!(frame[y * SCREEN_WIDTH as usize + x], MARKER_FIRE_COLOR);
    }

    #[test]
    fn bars_scroll_between_ticks() {
        let mut platform = RecordingPlatform::default();
        let mut card = host();
        card.tick(&mut platform);
        card.tick(&mut platform);
        let row = SCREEN_WIDTH as usize;
        assert_ne!(platform.frames[0][..row], platform.frames[1][..row]);
    }
}
