use super::kernel::{lanczos, DEFAULT_LANCZOS_WINDOW};

/// Lanczos interpolation over a finite buffer of samples.
///
/// Samples outside the buffer are treated as zero, so the first and last
/// `window` samples of every buffer are slightly attenuated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanczosInterpolator {
    window: usize,
}

impl LanczosInterpolator {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Value of the waveform at relative position `t`, where 0 is the first
    /// sample and 1 is the last.
    pub fn value_at(&self, samples: &[f32], t: f64) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }

        let index = (samples.len() - 1) as f64 * t;
        let a = self.window as i64;
        let floor = index.floor() as i64;
        let start = floor - a + 1;
        let end = floor + a;

        let mut sum = 0.0;
        for i in start..=end {
            let Some(&sample) = usize::try_from(i).ok().and_then(|i| samples.get(i)) else {
                continue;
            };
            sum += sample as f64 * lanczos(index - i as f64, self.window as f64);
        }
        sum
    }
}

impl Default for LanczosInterpolator {
    fn default() -> Self {
        Self::new(DEFAULT_LANCZOS_WINDOW)
    }
}
