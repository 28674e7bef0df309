use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::MusicError;

pub const MUSIC_MANIFEST_FILE: &str = "music.json";

/// Engine song numbers used by the default manifest.
pub mod songs {
    pub const E1M1: usize = 1;
    pub const E1M2: usize = 2;
    pub const INTER: usize = 28;
    pub const INTRO: usize = 29;
    pub const INTROA: usize = 32;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MusicTrackEntry {
    pub song: usize,
    /// Path relative to the resource directory.
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MusicManifest {
    pub tracks: Vec<MusicTrackEntry>,
}

impl Default for MusicManifest {
    fn default() -> Self {
        let entry = |song, file: &str| MusicTrackEntry {
            song,
            file: file.to_string(),
        };
        Self {
            tracks: vec![
                entry(songs::INTROA, "intro.mp3"),
                entry(songs::INTER, "inter.mp3"),
                entry(songs::E1M1, "e1m1.mp3"),
                entry(songs::E1M2, "e1m2.mp3"),
            ],
        }
    }
}

#[derive(Debug)]
pub(crate) enum ManifestReadState {
    Missing,
    Malformed(serde_json::Error),
    Present(MusicManifest),
}

pub(crate) fn manifest_path(resource_dir: &Path) -> PathBuf {
    resource_dir.join(MUSIC_MANIFEST_FILE)
}

pub(crate) fn read_music_manifest(path: &Path) -> Result<ManifestReadState, MusicError> {
    if !path.exists() {
        return Ok(ManifestReadState::Missing);
    }

    let raw = fs::read_to_string(path).map_err(|source| MusicError::ReadManifest {
        path: path.to_path_buf(),
        source,
    })?;
    match serde_json::from_str::<MusicManifest>(&raw) {
        Ok(manifest) => Ok(ManifestReadState::Present(manifest)),
        Err(error) => Ok(ManifestReadState::Malformed(error)),
    }
}

/// The manifest under `resource_dir`, or the built-in table when it is absent
/// or unusable.
pub fn resolve_music_manifest(resource_dir: &Path) -> MusicManifest {
    let path = manifest_path(resource_dir);
    match read_music_manifest(&path) {
        Ok(ManifestReadState::Present(manifest)) => {
            debug!(path = %path.display(), tracks = manifest.tracks.len(), "music_manifest_loaded");
            manifest
        }
        Ok(ManifestReadState::Missing) => MusicManifest::default(),
        Ok(ManifestReadState::Malformed(error)) => {
            warn!(
                path = %path.display(),
                error = %error,
                "malformed music manifest; using built-in track table"
            );
            MusicManifest::default()
        }
        Err(error) => {
            warn!(error = %error, "unable to read music manifest; using built-in track table");
            MusicManifest::default()
        }
    }
}
