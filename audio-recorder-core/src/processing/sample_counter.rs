/// Cross-block sample accounting for one recording session.
///
/// Output sizes are derived from running totals rather than a per-block
/// ratio, so rounding never accumulates: after every block,
/// `written_samples == round(read_samples * output_rate / input_rate)`
/// (while the input rate stays fixed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureCounters {
    read_samples: u64,
    written_samples: u64,
}

impl CaptureCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample-frames consumed from the audio input so far.
    pub fn read_samples(&self) -> u64 {
        self.read_samples
    }

    /// Sample-frames emitted so far.
    pub fn written_samples(&self) -> u64 {
        self.written_samples
    }

    /// Account for `in_samples` new input frames at `input_rate` and return
    /// how many output frames at `output_rate` the block must produce.
    ///
    /// Never negative: if the expected total drops below what was already
    /// written (only possible when the input rate changes between blocks),
    /// the block produces nothing and `written_samples` is left alone.
    pub fn advance(&mut self, in_samples: usize, input_rate: f64, output_rate: u32) -> usize {
        self.read_samples += in_samples as u64;

        if !(input_rate.is_finite() && input_rate > 0.0) {
            log::warn!("ignoring block with invalid input rate {}", input_rate);
            return 0;
        }

        let expected = (self.read_samples as f64 * output_rate as f64 / input_rate).round();
        let written = self.written_samples as f64;
        if expected < written {
            log::warn!(
                "expected output total {} fell below written total {}; emitting nothing",
                expected,
                written
            );
            return 0;
        }

        let expected = expected as u64;
        let out_samples = expected - self.written_samples;
        self.written_samples = expected;
        out_samples as usize
    }

    /// Signed difference between the ideal and the actual output total.
    pub fn drift(&self, input_rate: f64, output_rate: u32) -> f64 {
        self.written_samples as f64 - self.read_samples as f64 * output_rate as f64 / input_rate
    }
}
