use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{info, warn};

use super::error::AudioError;
use super::stream::{SampleSink, StreamSpec};

/// Samples waiting for the device callback, plus the master volume applied
/// on the way out.
#[derive(Debug)]
pub(crate) struct SampleQueue {
    samples: VecDeque<f32>,
    volume: f32,
}

impl SampleQueue {
    pub(crate) fn new(volume: f32) -> Self {
        Self {
            samples: VecDeque::new(),
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Fills `output` from the queue, padding with silence on underrun.
    pub(crate) fn drain_into(&mut self, output: &mut [f32]) {
        for slot in output.iter_mut() {
            *slot = self
                .samples
                .pop_front()
                .map_or(0.0, |sample| sample * self.volume);
        }
    }
}

fn lock_queue(shared: &Mutex<SampleQueue>) -> MutexGuard<'_, SampleQueue> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The default output device, fed from a shared sample queue.
pub struct AudioOutput {
    _stream: cpal::Stream,
    shared: Arc<Mutex<SampleQueue>>,
    spec: StreamSpec,
}

impl AudioOutput {
    pub fn open_default(volume: f32) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let supported = device
            .default_output_config()
            .map_err(AudioError::DefaultConfig)?;
        let spec = StreamSpec {
            channels: supported.channels(),
            sample_rate: supported.sample_rate(),
        };

        let shared = Arc::new(Mutex::new(SampleQueue::new(volume)));
        let callback_queue = Arc::clone(&shared);
        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => device
                .build_output_stream(
                    &supported.config(),
                    move |output: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        lock_queue(&callback_queue).drain_into(output);
                    },
                    |error| warn!(error = %error, "audio_stream_error"),
                    None,
                )
                .map_err(AudioError::BuildStream)?,
            format => return Err(AudioError::UnsupportedSampleFormat(format)),
        };
        stream.play().map_err(AudioError::PlayStream)?;

        info!(
            channels = spec.channels,
            sample_rate = spec.sample_rate,
            volume,
            "audio_output_opened"
        );
        Ok(Self {
            _stream: stream,
            shared,
            spec,
        })
    }
}

impl SampleSink for AudioOutput {
    fn spec(&self) -> StreamSpec {
        self.spec
    }

    fn queued_frames(&self) -> usize {
        lock_queue(&self.shared).samples.len() / self.spec.channels.max(1) as usize
    }

    fn push_samples(&mut self, samples: &[f32]) {
        lock_queue(&self.shared).samples.extend(samples.iter().copied());
    }

    fn clear(&mut self) {
        lock_queue(&self.shared).samples.clear();
    }
}
