use std::sync::Arc;

use crate::models::audio_models::InputBlock;
use crate::models::error::RecorderError;

/// Callback invoked with each block of captured audio.
///
/// Blocks arrive in capture order and the callback is never re-entered
/// while a previous invocation is still running.
pub type BlockCallback = Arc<dyn Fn(&InputBlock) + Send + Sync + 'static>;

/// Continuation receiving the outcome of an access request.
///
/// `Err` is a denial; it is terminal for the requesting session.
pub type AccessCallback =
    Box<dyn FnOnce(Result<Box<dyn DeviceSource>, RecorderError>) + Send + 'static>;

/// Shape of the blocks the recorder asks the device for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRequest {
    /// Sample-frames per block.
    pub frames: usize,
    /// Channels per block.
    pub channels: u16,
}

/// Grants (or denies) access to the platform's audio input.
pub trait DeviceAccess: Send + Sync {
    /// Whether the platform audio subsystem is present at all.
    fn is_available(&self) -> bool;

    /// Ask for access to the audio input. `on_result` is invoked exactly
    /// once, possibly before this call returns.
    fn request_access(&self, on_result: AccessCallback);
}

/// Live audio input granted by [`DeviceAccess`].
pub trait DeviceSource: Send {
    /// Attach the per-block processing hook.
    fn connect(&mut self, request: BlockRequest, callback: BlockCallback) -> Result<(), RecorderError>;

    /// Detach the per-block processing hook.
    fn disconnect_hook(&mut self);

    /// Disconnect the source itself.
    fn disconnect(&mut self);

    /// Hardware tracks backing this source.
    fn tracks(&self) -> Vec<Arc<dyn HardwareTrack>>;

    fn is_suspended(&self) -> bool {
        false
    }

    fn resume(&mut self) -> Result<(), RecorderError> {
        Ok(())
    }
}

/// One underlying hardware capture track.
pub trait HardwareTrack: Send + Sync {
    fn stop(&self);
}
