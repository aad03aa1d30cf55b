use serde::{Deserialize, Serialize};

use super::error::RecorderError;

/// How interpolated samples outside the integer range are narrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmplitudePolicy {
    /// Saturate at the minimum/maximum representable sample.
    #[default]
    Clamp,
    /// Wrap modulo the integer width (two's complement overflow).
    Wrap,
}

/// Tunables for a recording session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfiguration {
    /// Block size requested from the audio input, in sample-frames
    /// (default: 2048). Must be a power of two between 256 and 16384.
    pub buffer_size: usize,

    /// Lanczos window half-width `a` (default: 3).
    pub lanczos_window: usize,

    /// Narrowing policy for out-of-range samples (default: clamp).
    pub amplitude_policy: AmplitudePolicy,
}

impl RecorderConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if !self.buffer_size.is_power_of_two() || !(256..=16384).contains(&self.buffer_size) {
            return Err(format!("unsupported buffer size: {}", self.buffer_size));
        }
        if !(1..=64).contains(&self.lanczos_window) {
            return Err(format!("unsupported lanczos window: {}", self.lanczos_window));
        }
        Ok(())
    }

    /// Load and validate a configuration from JSON. Missing fields take
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, RecorderError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RecorderError::ConfigurationFailed(format!("failed to parse configuration: {}", e)))?;
        config.validate().map_err(RecorderError::ConfigurationFailed)?;
        Ok(config)
    }
}

impl Default for RecorderConfiguration {
    fn default() -> Self {
        Self {
            buffer_size: 2048,
            lanczos_window: 3,
            amplitude_policy: AmplitudePolicy::Clamp,
        }
    }
}
