use crate::models::error::RecorderError;
use crate::models::state::RecorderState;

/// Event delegate for recorder notifications.
///
/// `on_close` and `on_error` are mutually exclusive and fire at most once
/// per session. Callbacks run on whichever thread delivered the triggering
/// acknowledgement or device result.
pub trait RecorderDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, _state: &RecorderState) {}

    /// Called when the sink closed the stream normally.
    fn on_close(&self);

    /// Called when recording could not start or could not continue.
    fn on_error(&self, error: &RecorderError);
}
