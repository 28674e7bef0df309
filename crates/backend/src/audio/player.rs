use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::decoder::TrackDecoder;
use super::manifest::MusicManifest;
use super::output::AudioOutput;
use super::stream::{MusicStream, SampleSink};

pub const MUSIC_SLOT_COUNT: usize = 64;

/// Engine-numbered music slots played one at a time through the output
/// device.
pub struct MusicPlayer {
    output: Option<AudioOutput>,
    slots: Vec<Option<PathBuf>>,
    current_song: usize,
    playback: Option<MusicStream<TrackDecoder>>,
    buffer: Duration,
}

impl MusicPlayer {
    /// A player without an output device still tracks songs but stays silent.
    pub fn new(output: Option<AudioOutput>, buffer: Duration) -> Self {
        Self {
            output,
            slots: vec![None; MUSIC_SLOT_COUNT],
            current_song: 0,
            playback: None,
            buffer,
        }
    }

    /// Probes every manifest entry and fills the slots that open cleanly.
    /// Returns the number of loaded slots.
    pub fn load_manifest(&mut self, resource_dir: &Path, manifest: &MusicManifest) -> usize {
        let mut loaded = 0;
        for entry in &manifest.tracks {
            let Some(slot) = self.slots.get_mut(entry.song) else {
                warn!(song = entry.song, file = %entry.file, "music song number out of range");
                continue;
            };
            let path = resource_dir.join(&entry.file);
            match TrackDecoder::open(&path) {
                Ok(_) => {
                    info!(song = entry.song, path = %path.display(), "music_loaded");
                    *slot = Some(path);
                    loaded += 1;
                }
                Err(error) => {
                    warn!(song = entry.song, error = %error, "music_load_failed");
                }
            }
        }
        loaded
    }

    pub fn start(&mut self, song: usize) {
        if song >= MUSIC_SLOT_COUNT {
            warn!(song, "music song number out of range");
            return;
        }
        self.stop();
        self.current_song = song;
        info!(song, "music_started");

        let Some(path) = self.slots[song].as_deref() else {
            debug!(song, "music slot empty");
            return;
        };
        let Some(output) = self.output.as_ref() else {
            return;
        };
        match TrackDecoder::open(path) {
            Ok(decoder) => self.playback = Some(MusicStream::new(decoder, output.spec())),
            Err(error) => warn!(song, error = %error, "music_start_failed"),
        }
    }

    pub fn stop(&mut self) {
        self.playback = None;
        if let Some(output) = self.output.as_mut() {
            output.clear();
        }
    }

    /// Tops up the device queue from the current song.
    pub fn update(&mut self) {
        let (Some(playback), Some(output)) = (self.playback.as_mut(), self.output.as_mut()) else {
            return;
        };
        let target_frames = buffered_frames(self.buffer, output.spec().sample_rate);
        if let Err(error) = playback.refill(output, target_frames) {
            warn!(song = self.current_song, error = %error, "music_stream_failed");
            self.playback = None;
        }
    }

    pub fn current_song(&self) -> usize {
        self.current_song
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    pub fn is_loaded(&self, song: usize) -> bool {
        self.slots.get(song).is_some_and(Option::is_some)
    }
}

fn buffered_frames(buffer: Duration, sample_rate: u32) -> usize {
    (buffer.as_secs_f64() * f64::from(sample_rate)).ceil() as usize
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::audio::{MusicTrackEntry, MUSIC_MANIFEST_FILE};

    fn silent_player() -> MusicPlayer {
        MusicPlayer::new(None, Duration::from_millis(250))
    }

    #[test]
    fn unreadable_tracks_leave_slots_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("intro.mp3"), b"not really audio").expect("write");
        let mut player = silent_player();

        let loaded = player.load_manifest(dir.path(), &MusicManifest::default());
        assert_eq!(loaded, 0);
        assert!(!player.is_loaded(crate::audio::songs::INTROA));
    }

    #[test]
    fn out_of_range_manifest_entries_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest = MusicManifest {
            tracks: vec![MusicTrackEntry {
                song: MUSIC_SLOT_COUNT,
                file: MUSIC_MANIFEST_FILE.to_string(),
            }],
        };
        let mut player = silent_player();
        assert_eq!(player.load_manifest(dir.path(), &manifest), 0);
    }

    #[test]
    fn start_records_current_song_even_when_slot_is_empty() {
        let mut player = silent_player();
        player.start(7);
        assert_eq!(player.current_song(), 7);
        assert!(!player.is_playing());
        player.update();
        player.stop();
        assert_eq!(player.current_song(), 7);
    }

    #[test]
    fn out_of_range_start_is_ignored() {
        let mut player = silent_player();
        player.start(3);
        player.start(MUSIC_SLOT_COUNT + 1);
        assert_eq!(player.current_song(), 3);
    }

    #[test]
    fn buffer_duration_converts_to_frames() {
        assert_eq!(buffered_frames(Duration::from_millis(250), 48_000), 12_000);
        assert_eq!(buffered_frames(Duration::ZERO, 44_100), 0);
    }
}
