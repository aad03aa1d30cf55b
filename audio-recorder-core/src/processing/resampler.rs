use crate::models::audio_format::{AudioFormat, SampleWidth};
use crate::models::audio_models::{InputBlock, OutputPacket, PacketSamples};
use crate::models::config::{AmplitudePolicy, RecorderConfiguration};

use super::interpolator::LanczosInterpolator;
use super::sample_counter::CaptureCounters;

/// Converts planar float blocks at the input's native rate into interleaved
/// integer PCM packets in the recorder's output format.
///
/// Stateful across blocks: blocks must be processed one at a time, in the
/// order the audio input delivered them.
#[derive(Debug, Clone)]
pub struct Resampler {
    format: AudioFormat,
    interpolator: LanczosInterpolator,
    amplitude_policy: AmplitudePolicy,
    counters: CaptureCounters,
}

impl Resampler {
    pub fn new(format: AudioFormat) -> Self {
        Self::with_config(format, &RecorderConfiguration::default())
    }

    pub fn with_config(format: AudioFormat, config: &RecorderConfiguration) -> Self {
        Self {
            format,
            interpolator: LanczosInterpolator::new(config.lanczos_window),
            amplitude_policy: config.amplitude_policy,
            counters: CaptureCounters::new(),
        }
    }

    pub fn format(&self) -> &AudioFormat {
        &self.format
    }

    pub fn counters(&self) -> &CaptureCounters {
        &self.counters
    }

    /// Resample one block into one packet.
    ///
    /// The packet holds exactly as many frames as are needed to keep the
    /// running output total in step with the running input total. A
    /// single-frame packet samples the start of the block.
    pub fn process_block(&mut self, block: &InputBlock) -> OutputPacket {
        let out_samples = self
            .counters
            .advance(block.frames(), block.sample_rate(), self.format.sample_rate);

        log::trace!(
            "block of {} frames at {} Hz -> {} frames at {} Hz",
            block.frames(),
            block.sample_rate(),
            out_samples,
            self.format.sample_rate
        );

        let values = self.interpolate(block, out_samples);
        let policy = self.amplitude_policy;
        let samples = match self.format.sample_width {
            SampleWidth::Eight => {
                PacketSamples::Eight(values.into_iter().map(|v| narrow_i8(v, policy)).collect())
            }
            SampleWidth::Sixteen => {
                PacketSamples::Sixteen(values.into_iter().map(|v| narrow_i16(v, policy)).collect())
            }
        };

        OutputPacket {
            channel_count: self.format.channel_count,
            samples,
        }
    }

    /// Scaled, not yet narrowed, interleaved output values.
    fn interpolate(&self, block: &InputBlock, out_samples: usize) -> Vec<f64> {
        let channels = self.format.channel_count as usize;
        let max_amplitude = self.format.max_amplitude();
        let mut values = vec![0.0; out_samples * channels];

        for channel in 0..channels {
            let Some(audio_data) = source_plane(block, channel) else {
                continue;
            };

            let mut offset = channel;
            for i in 0..out_samples {
                let t = if out_samples > 1 {
                    i as f64 / (out_samples - 1) as f64
                } else {
                    0.0
                };
                values[offset] = self.interpolator.value_at(audio_data, t) * max_amplitude;
                offset += channels;
            }
        }
        values
    }
}

/// Input plane feeding output `channel`: mono input feeds every channel,
/// otherwise channels without a plane stay silent.
fn source_plane(block: &InputBlock, channel: usize) -> Option<&[f32]> {
    if block.channel_count() == 1 {
        block.channel(0)
    } else {
        block.channel(channel)
    }
}

fn narrow_i16(value: f64, policy: AmplitudePolicy) -> i16 {
    match policy {
        // `as` truncates toward zero, saturates, and maps NaN to 0.
        AmplitudePolicy::Clamp => value as i16,
        AmplitudePolicy::Wrap => wrap(value) as i16,
    }
}

fn narrow_i8(value: f64, policy: AmplitudePolicy) -> i8 {
    match policy {
        AmplitudePolicy::Clamp => value as i8,
        AmplitudePolicy::Wrap => wrap(value) as i8,
    }
}

/// Truncate toward zero keeping the low bits, so the final narrowing cast
/// wraps instead of saturating.
fn wrap(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().rem_euclid(65536.0) as i64
}
