use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use super::error::MusicError;
use super::stream::{BlockSource, StreamSpec};

/// Streams one music file packet by packet.
pub(crate) struct TrackDecoder {
    path: PathBuf,
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    spec: StreamSpec,
}

impl TrackDecoder {
    pub(crate) fn open(path: &Path) -> Result<Self, MusicError> {
        let file = File::open(path).map_err(|source| MusicError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let stream = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(extension);
        }
        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                stream,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|source| MusicError::Probe {
                path: path.to_path_buf(),
                source,
            })?;
        let format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| MusicError::NoAudioTrack {
                path: path.to_path_buf(),
            })?;
        let sample_rate =
            track
                .codec_params
                .sample_rate
                .ok_or_else(|| MusicError::MissingTrackInfo {
                    path: path.to_path_buf(),
                    property: "a sample rate",
                })?;
        let channels = track
            .codec_params
            .channels
            .map(|channels| channels.count() as u16)
            .ok_or_else(|| MusicError::MissingTrackInfo {
                path: path.to_path_buf(),
                property: "a channel layout",
            })?;
        let track_id = track.id;
        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|source| MusicError::Codec {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            format,
            decoder,
            track_id,
            spec: StreamSpec {
                channels,
                sample_rate,
            },
        })
    }
}

fn decode_error(path: &Path, source: SymphoniaError) -> MusicError {
    MusicError::Decode {
        path: path.to_path_buf(),
        source,
    }
}

impl BlockSource for TrackDecoder {
    fn spec(&self) -> StreamSpec {
        self.spec
    }

    fn next_block(&mut self, out: &mut Vec<f32>) -> Result<bool, MusicError> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(error))
                    if error.kind() == io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(false);
                }
                Err(SymphoniaError::ResetRequired) => return Ok(false),
                Err(source) => return Err(decode_error(&self.path, source)),
            };
            if packet.track_id() != self.track_id {
                continue;
            }

            match self.decoder.decode(&packet) {
                Ok(decoded) => {
                    let mut buffer =
                        SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
                    buffer.copy_interleaved_ref(decoded);
                    out.extend_from_slice(buffer.samples());
                    return Ok(true);
                }
                Err(SymphoniaError::DecodeError(reason)) => {
                    debug!(path = %self.path.display(), reason, "music_packet_skipped");
                }
                Err(source) => return Err(decode_error(&self.path, source)),
            }
        }
    }

    fn rewind(&mut self) -> Result<(), MusicError> {
        *self = Self::open(&self.path)?;
        Ok(())
    }
}
