use serde::{Deserialize, Serialize};

/// Base mimetype for 8-bit signed raw PCM.
pub const MIMETYPE_L8: &str = "audio/L8";

/// Base mimetype for 16-bit signed raw PCM.
pub const MIMETYPE_L16: &str = "audio/L16";

/// Width of a single encoded sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleWidth {
    #[serde(rename = "L8")]
    Eight,
    #[serde(rename = "L16")]
    Sixteen,
}

impl SampleWidth {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            Self::Eight => 1,
            Self::Sixteen => 2,
        }
    }

    /// Scale applied to a `[-1.0, 1.0]` float sample before narrowing.
    pub fn max_amplitude(self) -> f64 {
        match self {
            Self::Eight => 128.0,
            Self::Sixteen => 32768.0,
        }
    }

    pub fn mimetype(self) -> &'static str {
        match self {
            Self::Eight => MIMETYPE_L8,
            Self::Sixteen => MIMETYPE_L16,
        }
    }
}

/// Format of the raw PCM stream produced by the recorder.
///
/// Parsed from mimetypes like `audio/L16;rate=44100,channels=2`
/// (RFC 4856 raw audio with comma-separated parameters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channel_count: u16,
    pub sample_width: SampleWidth,
}

impl AudioFormat {
    pub fn new(sample_rate: u32, channel_count: u16, sample_width: SampleWidth) -> Option<Self> {
        if sample_rate == 0 || channel_count == 0 {
            return None;
        }
        Some(Self {
            sample_rate,
            channel_count,
            sample_width,
        })
    }

    /// Parse a raw audio mimetype.
    ///
    /// Returns `None` for anything other than `audio/L8` or `audio/L16`
    /// with at least a `rate` parameter. `channels` defaults to 1 and
    /// unrecognized parameters are ignored.
    pub fn parse(mimetype: &str) -> Option<Self> {
        let (sample_width, parameters) = if let Some(rest) = mimetype.strip_prefix("audio/L8;") {
            (SampleWidth::Eight, rest)
        } else if let Some(rest) = mimetype.strip_prefix("audio/L16;") {
            (SampleWidth::Sixteen, rest)
        } else {
            log::trace!("not a raw audio mimetype: {}", mimetype);
            return None;
        };

        let mut rate = None;
        let mut channels = 1u16;

        for parameter in parameters.split(',') {
            let Some((name, value)) = parameter.split_once('=') else {
                log::trace!("malformed mimetype parameter {:?} in {}", parameter, mimetype);
                return None;
            };

            match name.trim() {
                "rate" => rate = Some(value.trim().parse::<u32>().ok()?),
                "channels" => channels = value.trim().parse::<u16>().ok()?,
                _ => {}
            }
        }

        Self::new(rate?, channels, sample_width)
    }

    pub fn max_amplitude(&self) -> f64 {
        self.sample_width.max_amplitude()
    }

    /// Canonical mimetype for this format.
    pub fn to_mimetype(&self) -> String {
        format!(
            "{};rate={},channels={}",
            self.sample_width.mimetype(),
            self.sample_rate,
            self.channel_count
        )
    }
}
