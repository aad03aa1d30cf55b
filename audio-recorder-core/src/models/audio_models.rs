use serde::Serialize;

use super::audio_format::SampleWidth;

/// One block of planar float audio as delivered by the audio input.
///
/// Each plane holds one channel's samples; all planes have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct InputBlock {
    sample_rate: f64,
    planes: Vec<Vec<f32>>,
}

impl InputBlock {
    /// Build a block from per-channel planes. Planes of unequal length are
    /// truncated to the shortest.
    pub fn new(sample_rate: f64, mut planes: Vec<Vec<f32>>) -> Self {
        let frames = planes.iter().map(Vec::len).min().unwrap_or(0);
        for plane in &mut planes {
            plane.truncate(frames);
        }
        Self { sample_rate, planes }
    }

    /// Build a block from interleaved samples `[c0, c1, ..., c0, c1, ...]`.
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(sample_rate: f64, samples: &[f32], channels: usize) -> Self {
        if channels == 0 {
            return Self::new(sample_rate, Vec::new());
        }
        let frames = samples.len() / channels;
        let mut planes = vec![Vec::with_capacity(frames); channels];
        for frame in samples.chunks_exact(channels) {
            for (plane, &sample) in planes.iter_mut().zip(frame) {
                plane.push(sample);
            }
        }
        Self { sample_rate, planes }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Number of sample-frames in the block.
    pub fn frames(&self) -> usize {
        self.planes.first().map_or(0, Vec::len)
    }

    pub fn channel_count(&self) -> usize {
        self.planes.len()
    }

    /// Samples of the given channel, or `None` if the block has no such plane.
    pub fn channel(&self, channel: usize) -> Option<&[f32]> {
        self.planes.get(channel).map(Vec::as_slice)
    }
}

/// Interleaved integer samples of one outgoing packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketSamples {
    Eight(Vec<i8>),
    Sixteen(Vec<i16>),
}

/// Fixed-format PCM packet ready for the output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPacket {
    pub channel_count: u16,
    pub samples: PacketSamples,
}

impl OutputPacket {
    /// Total number of integer samples across all channels.
    pub fn len(&self) -> usize {
        match &self.samples {
            PacketSamples::Eight(s) => s.len(),
            PacketSamples::Sixteen(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn frames(&self) -> usize {
        match self.channel_count {
            0 => 0,
            channels => self.len() / channels as usize,
        }
    }

    /// Sample at interleaved position `index`, widened to `i32`.
    pub fn sample(&self, index: usize) -> Option<i32> {
        match &self.samples {
            PacketSamples::Eight(s) => s.get(index).map(|&v| v as i32),
            PacketSamples::Sixteen(s) => s.get(index).map(|&v| v as i32),
        }
    }

    /// Serialize for transmission: signed bytes for 8-bit, little-endian
    /// for 16-bit.
    pub fn to_bytes(&self) -> Vec<u8> {
        match &self.samples {
            PacketSamples::Eight(s) => s.iter().map(|&v| v as u8).collect(),
            PacketSamples::Sixteen(s) => {
                let mut data = Vec::with_capacity(s.len() * SampleWidth::Sixteen.bytes_per_sample());
                for &v in s {
                    data.extend_from_slice(&v.to_le_bytes());
                }
                data
            }
        }
    }
}

/// Counters for debugging a recording session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecorderDiagnostics {
    pub session_id: String,
    pub created_at: String,
    pub mimetype: String,
    pub blocks_processed: u64,
    pub empty_blocks: u64,
    pub samples_read: u64,
    pub samples_written: u64,
    pub packets_sent: u64,
    pub bytes_sent: u64,
}

impl RecorderDiagnostics {
    pub fn new(mimetype: &str) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            mimetype: mimetype.to_string(),
            ..Default::default()
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
