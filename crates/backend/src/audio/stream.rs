use super::error::MusicError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSpec {
    pub channels: u16,
    pub sample_rate: u32,
}

/// A decoder that yields interleaved f32 blocks.
pub(crate) trait BlockSource {
    fn spec(&self) -> StreamSpec;

    /// Appends the next block to `out`. Returns `false` at end of stream.
    fn next_block(&mut self, out: &mut Vec<f32>) -> Result<bool, MusicError>;

    fn rewind(&mut self) -> Result<(), MusicError>;
}

/// Where converted samples go; usually the device queue.
pub(crate) trait SampleSink {
    fn spec(&self) -> StreamSpec;
    fn queued_frames(&self) -> usize;
    fn push_samples(&mut self, samples: &[f32]);
    fn clear(&mut self);
}

/// Pulls blocks from a source, converts them to the sink layout, and loops
/// back to the start when the source runs dry.
pub(crate) struct MusicStream<S> {
    source: S,
    rate: RateConverter,
    decoded: Vec<f32>,
    remapped: Vec<f32>,
    converted: Vec<f32>,
}

impl<S: BlockSource> MusicStream<S> {
    pub(crate) fn new(source: S, output: StreamSpec) -> Self {
        let rate = RateConverter::new(source.spec().sample_rate, output.sample_rate);
        Self {
            source,
            rate,
            decoded: Vec::new(),
            remapped: Vec::new(),
            converted: Vec::new(),
        }
    }

    pub(crate) fn refill(
        &mut self,
        sink: &mut dyn SampleSink,
        target_frames: usize,
    ) -> Result<(), MusicError> {
        let in_channels = self.source.spec().channels.max(1) as usize;
        let out_channels = sink.spec().channels.max(1) as usize;
        let mut rewound_without_audio = false;

        while sink.queued_frames() < target_frames {
            self.decoded.clear();
            if !self.source.next_block(&mut self.decoded)? {
                if rewound_without_audio {
                    // Nothing decodable in the whole track.
                    return Ok(());
                }
                self.source.rewind()?;
                self.rate.reset();
                rewound_without_audio = true;
                continue;
            }
            if self.decoded.is_empty() {
                continue;
            }
            rewound_without_audio = false;

            remap_channels(&self.decoded, in_channels, out_channels, &mut self.remapped);
            self.converted.clear();
            self.rate
                .process(&self.remapped, out_channels, &mut self.converted);
            sink.push_samples(&self.converted);
        }
        Ok(())
    }
}

/// Mono is copied to every output channel; otherwise channels map one to one
/// and output channels past the source count are silent.
pub(crate) fn remap_channels(
    input: &[f32],
    in_channels: usize,
    out_channels: usize,
    out: &mut Vec<f32>,
) {
    out.clear();
    if in_channels == out_channels {
        out.extend_from_slice(input);
        return;
    }
    for frame in input.chunks_exact(in_channels) {
        for channel in 0..out_channels {
            let sample = if in_channels == 1 {
                frame[0]
            } else {
                frame.get(channel).copied().unwrap_or(0.0)
            };
            out.push(sample);
        }
    }
}

/// Sample-and-hold rate conversion that keeps its phase across blocks.
#[derive(Debug, Clone)]
pub(crate) struct RateConverter {
    step: f64,
    phase: f64,
}

impl RateConverter {
    pub(crate) fn new(input_rate: u32, output_rate: u32) -> Self {
        let step = if input_rate == 0 || output_rate == 0 {
            1.0
        } else {
            f64::from(input_rate) / f64::from(output_rate)
        };
        Self { step, phase: 0.0 }
    }

    pub(crate) fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub(crate) fn process(&mut self, input: &[f32], channels: usize, out: &mut Vec<f32>) {
        let frames = input.len() / channels;
        while self.phase < frames as f64 {
            let index = self.phase as usize * channels;
            out.extend_from_slice(&input[index..index + channels]);
            self.phase += self.step;
        }
        self.phase -= frames as f64;
    }
}
