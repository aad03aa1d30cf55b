//! # audio-recorder-core
//!
//! Streams live audio input to a flow-controlled output channel as raw
//! PCM (`audio/L8` or `audio/L16`).
//!
//! Blocks arrive at whatever rate and size the audio input chooses; each
//! one is resampled with Lanczos interpolation into exactly as many output
//! frames as keep the running totals in step, then packed into interleaved
//! integer samples. Acknowledgements from the sink start the capture, and
//! end it.
//!
//! ## Architecture
//!
//! ```text
//! audio-recorder-core (this crate)
//! ├── traits/       ← OutputStream, DeviceAccess/DeviceSource, RecorderDelegate
//! ├── models/       ← AudioFormat, AckStatus, RecorderError, RecorderState, etc.
//! ├── processing/   ← Lanczos kernel, interpolator, CaptureCounters, Resampler
//! └── session/      ← RawAudioRecorder (ack-driven lifecycle), DeviceSubscription
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export key types at crate root for convenience.
pub use models::ack::{AckKind, AckStatus, StatusCode};
pub use models::audio_format::{AudioFormat, SampleWidth};
pub use models::audio_models::{InputBlock, OutputPacket, PacketSamples, RecorderDiagnostics};
pub use models::config::{AmplitudePolicy, RecorderConfiguration};
pub use models::error::RecorderError;
pub use models::state::{RecorderState, TerminalEvent};
pub use processing::interpolator::LanczosInterpolator;
pub use processing::resampler::Resampler;
pub use processing::sample_counter::CaptureCounters;
pub use session::device_guard::DeviceSubscription;
pub use session::recorder::RawAudioRecorder;
pub use session::registry::{is_supported_type, supported_types, SUPPORTED_TYPES};
pub use traits::device_access::{AccessCallback, BlockCallback, BlockRequest, DeviceAccess, DeviceSource, HardwareTrack};
pub use traits::output_stream::{AckHandler, OutputStream};
pub use traits::recorder_delegate::RecorderDelegate;
