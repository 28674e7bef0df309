mod decoder;
mod error;
mod manifest;
mod output;
mod player;
mod stream;

pub use error::{AudioError, MusicError};
pub use manifest::{
    resolve_music_manifest, songs, MusicManifest, MusicTrackEntry, MUSIC_MANIFEST_FILE,
};
pub use output::AudioOutput;
pub use player::{MusicPlayer, MUSIC_SLOT_COUNT};
pub use stream::StreamSpec;
