use std::path::PathBuf;

use symphonia::core::errors::Error as SymphoniaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no default audio output device available")]
    NoOutputDevice,
    #[error("failed to query default output config: {0}")]
    DefaultConfig(#[source] cpal::DefaultStreamConfigError),
    #[error("unsupported output sample format {0}")]
    UnsupportedSampleFormat(cpal::SampleFormat),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[source] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    PlayStream(#[source] cpal::PlayStreamError),
}

#[derive(Debug, Error)]
pub enum MusicError {
    #[error("failed to open music file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unrecognized music format in {path}: {source}")]
    Probe {
        path: PathBuf,
        #[source]
        source: SymphoniaError,
    },
    #[error("music file {path} has no audio track")]
    NoAudioTrack { path: PathBuf },
    #[error("music file {path} does not declare {property}")]
    MissingTrackInfo {
        path: PathBuf,
        property: &'static str,
    },
    #[error("no decoder for music file {path}: {source}")]
    Codec {
        path: PathBuf,
        #[source]
        source: SymphoniaError,
    },
    #[error("failed to decode music file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: SymphoniaError,
    },
    #[error("failed to read music manifest {path}: {source}")]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
