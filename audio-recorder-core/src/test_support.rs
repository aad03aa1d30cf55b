//! Scripted fakes for the sink and the audio input, shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::ack::AckStatus;
use crate::models::audio_models::InputBlock;
use crate::models::error::RecorderError;
use crate::models::state::RecorderState;
use crate::traits::device_access::{
    AccessCallback, BlockCallback, BlockRequest, DeviceAccess, DeviceSource, HardwareTrack,
};
use crate::traits::output_stream::{AckHandler, OutputStream};
use crate::traits::recorder_delegate::RecorderDelegate;

/// Ordered log of side effects across every fake.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.0.lock().iter().filter(|e| *e == event).count()
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.0.lock().iter().position(|e| e == event)
    }
}

pub struct FakeOutput {
    log: EventLog,
    handler: Mutex<Option<AckHandler>>,
    packets: Mutex<Vec<Vec<u8>>>,
    reply: Mutex<Option<AckStatus>>,
}

impl FakeOutput {
    pub fn new(log: EventLog) -> Arc<Self> {
        Arc::new(Self {
            log,
            handler: Mutex::new(None),
            packets: Mutex::new(Vec::new()),
            reply: Mutex::new(None),
        })
    }

    /// Acknowledge every blob with success as soon as it is sent.
    pub fn set_auto_ack(&self, enabled: bool) {
        *self.reply.lock() = enabled.then(AckStatus::success);
    }

    /// Answer every blob with `status` from inside `send_data`.
    pub fn reply_with(&self, status: AckStatus) {
        *self.reply.lock() = Some(status);
    }

    /// Deliver an acknowledgement to whichever handler is attached.
    pub fn ack(&self, status: AckStatus) {
        let handler = self.handler.lock().clone();
        if let Some(handler) = handler {
            handler(status);
        }
    }

    /// The currently attached handler, kept so tests can keep calling it
    /// after the recorder detaches.
    pub fn handler(&self) -> Option<AckHandler> {
        self.handler.lock().clone()
    }

    pub fn has_handler(&self) -> bool {
        self.handler.lock().is_some()
    }

    pub fn packets(&self) -> Vec<Vec<u8>> {
        self.packets.lock().clone()
    }
}

impl OutputStream for FakeOutput {
    fn send_data(&self, data: &[u8]) {
        self.log.push("output.data");
        self.packets.lock().push(data.to_vec());
        let reply = self.reply.lock().clone();
        if let Some(status) = reply {
            self.ack(status);
        }
    }

    fn send_end(&self) {
        self.log.push("output.end");
    }

    fn set_ack_handler(&self, handler: Option<AckHandler>) {
        *self.handler.lock() = handler;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Grant,
    Deny,
    Defer,
}

/// Audio input whose access outcome is scripted by the test.
pub struct FakeDevice {
    log: EventLog,
    available: bool,
    mode: AccessMode,
    track_count: usize,
    suspended: bool,
    fail_connect: bool,
    connect_block: Option<InputBlock>,
    hook: Arc<Mutex<Option<BlockCallback>>>,
    request: Arc<Mutex<Option<BlockRequest>>>,
    pending: Mutex<Vec<AccessCallback>>,
    requests: AtomicUsize,
}

impl FakeDevice {
    fn with_mode(log: EventLog, mode: AccessMode, available: bool) -> Self {
        Self {
            log,
            available,
            mode,
            track_count: 1,
            suspended: false,
            fail_connect: false,
            connect_block: None,
            hook: Arc::new(Mutex::new(None)),
            request: Arc::new(Mutex::new(None)),
            pending: Mutex::new(Vec::new()),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn granting(log: EventLog) -> Self {
        Self::with_mode(log, AccessMode::Grant, true)
    }

    pub fn denying(log: EventLog) -> Self {
        Self::with_mode(log, AccessMode::Deny, true)
    }

    pub fn deferred(log: EventLog) -> Self {
        Self::with_mode(log, AccessMode::Defer, true)
    }

    pub fn unavailable(log: EventLog) -> Self {
        Self::with_mode(log, AccessMode::Grant, false)
    }

    pub fn with_tracks(mut self, track_count: usize) -> Self {
        self.track_count = track_count;
        self
    }

    pub fn suspended(mut self) -> Self {
        self.suspended = true;
        self
    }

    pub fn failing_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    /// Deliver `block` through the hook before `connect` returns.
    pub fn delivering_on_connect(mut self, block: InputBlock) -> Self {
        self.connect_block = Some(block);
        self
    }

    pub fn log(&self) -> EventLog {
        self.log.clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Block shape the recorder asked for when it connected.
    pub fn block_request(&self) -> Option<BlockRequest> {
        *self.request.lock()
    }

    pub fn is_hooked(&self) -> bool {
        self.hook.lock().is_some()
    }

    /// Deliver a block through the attached hook. False if none is attached.
    pub fn deliver(&self, block: &InputBlock) -> bool {
        let hook = self.hook.lock().clone();
        match hook {
            Some(hook) => {
                hook(block);
                true
            }
            None => false,
        }
    }

    pub fn grant_pending(&self) {
        let pending: Vec<AccessCallback> = self.pending.lock().drain(..).collect();
        for on_result in pending {
            on_result(Ok(Box::new(self.make_source())));
        }
    }

    pub fn deny_pending(&self) {
        let pending: Vec<AccessCallback> = self.pending.lock().drain(..).collect();
        for on_result in pending {
            on_result(Err(RecorderError::PermissionDenied));
        }
    }

    fn make_source(&self) -> FakeSource {
        let mut source = FakeSource::new(self.log.clone(), self.track_count);
        source.hook = Arc::clone(&self.hook);
        source.request = Arc::clone(&self.request);
        source.suspended = self.suspended;
        source.fail_connect = self.fail_connect;
        source.connect_block = self.connect_block.clone();
        source
    }
}

impl DeviceAccess for FakeDevice {
    fn is_available(&self) -> bool {
        self.available
    }

    fn request_access(&self, on_result: AccessCallback) {
        self.log.push("device.request");
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            AccessMode::Grant => on_result(Ok(Box::new(self.make_source()))),
            AccessMode::Deny => on_result(Err(RecorderError::PermissionDenied)),
            AccessMode::Defer => self.pending.lock().push(on_result),
        }
    }
}

pub struct FakeSource {
    log: EventLog,
    hook: Arc<Mutex<Option<BlockCallback>>>,
    request: Arc<Mutex<Option<BlockRequest>>>,
    tracks: Vec<Arc<dyn HardwareTrack>>,
    suspended: bool,
    fail_connect: bool,
    connect_block: Option<InputBlock>,
}

impl FakeSource {
    pub fn new(log: EventLog, track_count: usize) -> Self {
        let tracks = (0..track_count)
            .map(|i| {
                Arc::new(FakeTrack {
                    log: log.clone(),
                    name: format!("track{}", i),
                }) as Arc<dyn HardwareTrack>
            })
            .collect();
        Self {
            log,
            hook: Arc::new(Mutex::new(None)),
            request: Arc::new(Mutex::new(None)),
            tracks,
            suspended: false,
            fail_connect: false,
            connect_block: None,
        }
    }
}

impl DeviceSource for FakeSource {
    fn connect(&mut self, request: BlockRequest, callback: BlockCallback) -> Result<(), RecorderError> {
        self.log.push("device.connect");
        if self.fail_connect {
            return Err(RecorderError::DeviceFailure("connect failed".into()));
        }
        *self.request.lock() = Some(request);
        *self.hook.lock() = Some(Arc::clone(&callback));
        if let Some(block) = &self.connect_block {
            callback(block);
        }
        Ok(())
    }

    fn disconnect_hook(&mut self) {
        self.log.push("device.disconnect_hook");
        *self.hook.lock() = None;
    }

    fn disconnect(&mut self) {
        self.log.push("device.disconnect");
    }

    fn tracks(&self) -> Vec<Arc<dyn HardwareTrack>> {
        self.tracks.clone()
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> Result<(), RecorderError> {
        self.log.push("device.resume");
        self.suspended = false;
        Ok(())
    }
}

struct FakeTrack {
    log: EventLog,
    name: String,
}

impl HardwareTrack for FakeTrack {
    fn stop(&self) {
        self.log.push(format!("{}.stop", self.name));
    }
}

/// Delegate that records every notification.
pub struct RecordingDelegate {
    log: EventLog,
    states: Mutex<Vec<RecorderState>>,
    errors: Mutex<Vec<RecorderError>>,
    closes: AtomicUsize,
}

impl RecordingDelegate {
    pub fn new(log: EventLog) -> Arc<Self> {
        Arc::new(Self {
            log,
            states: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
        })
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn errors(&self) -> Vec<RecorderError> {
        self.errors.lock().clone()
    }

    pub fn state_names(&self) -> Vec<&'static str> {
        self.states.lock().iter().map(RecorderState::name).collect()
    }
}

impl RecorderDelegate for RecordingDelegate {
    fn on_state_changed(&self, state: &RecorderState) {
        self.states.lock().push(state.clone());
    }

    fn on_close(&self) {
        self.log.push("delegate.close");
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, error: &RecorderError) {
        self.log.push("delegate.error");
        self.errors.lock().push(error.clone());
    }
}
