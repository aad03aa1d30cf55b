use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};

use crate::models::ack::{AckKind, AckStatus};
use crate::models::audio_format::AudioFormat;
use crate::models::audio_models::{InputBlock, RecorderDiagnostics};
use crate::models::config::RecorderConfiguration;
use crate::models::error::RecorderError;
use crate::models::state::{RecorderState, TerminalEvent};
use crate::processing::resampler::Resampler;
use crate::processing::sample_counter::CaptureCounters;
use crate::session::device_guard::DeviceSubscription;
use crate::session::registry;
use crate::traits::device_access::{BlockCallback, BlockRequest, DeviceAccess, DeviceSource};
use crate::traits::output_stream::OutputStream;
use crate::traits::recorder_delegate::RecorderDelegate;

/// Lifecycle state plus the device handle, protected by `parking_lot::Mutex`.
struct SessionState {
    state: RecorderState,
    subscription: Option<DeviceSubscription>,
    /// A granted source is being connected outside the lock.
    connecting: bool,
    /// Termination entered while connecting; finished once the source is back.
    deferred: Option<Termination>,
    /// State changes waiting for the delegate, in transition order.
    notices: VecDeque<RecorderState>,
    notifying: bool,
}

/// Resampler and per-block counters, touched only by the block hook.
struct Pipeline {
    resampler: Resampler,
    diagnostics: RecorderDiagnostics,
}

impl Pipeline {
    /// Resample one block, returning the bytes to send (if any).
    fn process(&mut self, block: &InputBlock) -> Option<Vec<u8>> {
        let packet = self.resampler.process_block(block);
        let counters = self.resampler.counters();

        let diagnostics = &mut self.diagnostics;
        diagnostics.blocks_processed += 1;
        diagnostics.samples_read = counters.read_samples();
        diagnostics.samples_written = counters.written_samples();

        if packet.is_empty() {
            diagnostics.empty_blocks += 1;
            return None;
        }

        let data = packet.to_bytes();
        diagnostics.packets_sent += 1;
        diagnostics.bytes_sent += data.len() as u64;
        Some(data)
    }
}

/// Work left to do once the session lock is released.
enum Step {
    Nothing,
    RequestDevice,
    Captured,
    Release(DeviceSubscription),
    Terminate(Termination),
}

struct Termination {
    event: TerminalEvent,
    subscription: Option<DeviceSubscription>,
    send_end: bool,
}

struct RecorderCore {
    format: AudioFormat,
    config: RecorderConfiguration,
    output: Arc<dyn OutputStream>,
    device_access: Arc<dyn DeviceAccess>,
    session_state: Mutex<SessionState>,
    pipeline: Arc<Mutex<Pipeline>>,
    // Gates the block hook; cleared as soon as the session stops.
    streaming: Arc<AtomicBool>,
    // Held around every send so end-of-stream never overtakes a packet.
    send_gate: Arc<ReentrantMutex<()>>,
    delegate: Mutex<Option<Arc<dyn RecorderDelegate>>>,
}

/// Streams raw PCM captured from the audio input to an [`OutputStream`].
///
/// The sink drives the whole lifecycle through acknowledgements:
/// the first success ack requests the audio input, a resource-closed ack
/// ends the session normally and any other failure ends it with an error.
/// A stopped recorder cannot be restarted; create a new one instead.
///
/// Delegate notifications arrive in transition order, one at a time, but
/// not necessarily on the thread that caused the transition.
///
/// ```text
/// [DeviceSource] → InputBlock → [Resampler] → PCM packet → [OutputStream]
///                                                    ack ↙
///                                       [RawAudioRecorder state machine]
/// ```
pub struct RawAudioRecorder {
    core: Arc<RecorderCore>,
}

impl RawAudioRecorder {
    /// Create a recorder for `mimetype` with the default configuration.
    pub fn new(
        output: Arc<dyn OutputStream>,
        device_access: Arc<dyn DeviceAccess>,
        mimetype: &str,
    ) -> Result<Self, RecorderError> {
        Self::with_config(output, device_access, mimetype, RecorderConfiguration::default())
    }

    pub fn with_config(
        output: Arc<dyn OutputStream>,
        device_access: Arc<dyn DeviceAccess>,
        mimetype: &str,
        config: RecorderConfiguration,
    ) -> Result<Self, RecorderError> {
        config.validate().map_err(RecorderError::ConfigurationFailed)?;

        if !device_access.is_available() {
            return Err(RecorderError::DeviceNotAvailable);
        }

        let format = AudioFormat::parse(mimetype)
            .ok_or_else(|| RecorderError::UnsupportedFormat(mimetype.to_string()))?;

        let pipeline = Pipeline {
            resampler: Resampler::with_config(format, &config),
            diagnostics: RecorderDiagnostics::new(&format.to_mimetype()),
        };

        let core = Arc::new(RecorderCore {
            format,
            config,
            output,
            device_access,
            session_state: Mutex::new(SessionState {
                state: RecorderState::Idle,
                subscription: None,
                connecting: false,
                deferred: None,
                notices: VecDeque::new(),
                notifying: false,
            }),
            pipeline: Arc::new(Mutex::new(pipeline)),
            streaming: Arc::new(AtomicBool::new(false)),
            send_gate: Arc::new(ReentrantMutex::new(())),
            delegate: Mutex::new(None),
        });

        core.subscribe();
        Ok(Self { core })
    }

    /// Like [`RawAudioRecorder::new`], but `None` if the format or the
    /// platform is unsupported.
    pub fn get_instance(
        output: Arc<dyn OutputStream>,
        device_access: Arc<dyn DeviceAccess>,
        mimetype: &str,
    ) -> Option<Self> {
        match Self::new(output, device_access, mimetype) {
            Ok(recorder) => Some(recorder),
            Err(e) => {
                log::debug!("no recorder for {}: {}", mimetype, e);
                None
            }
        }
    }

    pub fn is_supported_type(device_access: &dyn DeviceAccess, mimetype: &str) -> bool {
        registry::is_supported_type(device_access, mimetype)
    }

    pub fn supported_types(device_access: &dyn DeviceAccess) -> Vec<&'static str> {
        registry::supported_types(device_access)
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn RecorderDelegate>) {
        *self.core.delegate.lock() = Some(delegate);
    }

    pub fn state(&self) -> RecorderState {
        self.core.session_state.lock().state.clone()
    }

    /// How the session ended, once it has.
    pub fn terminal_event(&self) -> Option<TerminalEvent> {
        self.core.session_state.lock().state.terminal_event().cloned()
    }

    pub fn format(&self) -> AudioFormat {
        self.core.format
    }

    pub fn counters(&self) -> CaptureCounters {
        *self.core.pipeline.lock().resampler.counters()
    }

    pub fn diagnostics(&self) -> RecorderDiagnostics {
        self.core.pipeline.lock().diagnostics.clone()
    }
}

impl RecorderCore {
    /// Idle → awaiting first ack: start listening to the sink.
    fn subscribe(self: &Arc<Self>) {
        self.session_state.lock().state = RecorderState::AwaitingFirstAck;

        let weak = Arc::downgrade(self);
        self.output.set_ack_handler(Some(Arc::new(move |status: AckStatus| {
            if let Some(core) = weak.upgrade() {
                core.handle_ack(status);
            }
        })));

        log::debug!("recorder for {} awaiting first ack", self.format.to_mimetype());
    }

    fn handle_ack(self: &Arc<Self>, status: AckStatus) {
        let step = {
            let mut s = self.session_state.lock();
            let current = s.state.clone();
            match (current, status.kind()) {
                (RecorderState::Stopped(_), _) => {
                    log::trace!("ignoring ack {} after stop", status.code);
                    Step::Nothing
                }
                (RecorderState::Idle | RecorderState::AwaitingFirstAck, AckKind::Success) => {
                    Self::transition(&mut s, RecorderState::RequestingDevice);
                    Step::RequestDevice
                }
                (RecorderState::RequestingDevice | RecorderState::Capturing, AckKind::Success) => {
                    log::trace!("stream ack {}", status.code);
                    Step::Nothing
                }
                (_, AckKind::ResourceClosed) => self.terminate(&mut s, TerminalEvent::Closed),
                (_, AckKind::Error) => {
                    let error = RecorderError::StreamError {
                        code: status.code,
                        message: status.message,
                    };
                    self.terminate(&mut s, TerminalEvent::Errored(error))
                }
            }
        };

        self.run(step);
    }

    fn run(self: &Arc<Self>, step: Step) {
        match step {
            Step::Nothing => {}
            Step::RequestDevice => {
                self.deliver_notices();
                // The delegate may have stopped the session meanwhile.
                if matches!(self.session_state.lock().state, RecorderState::RequestingDevice) {
                    self.request_device();
                }
            }
            Step::Captured => {
                log::debug!("capturing {}", self.format.to_mimetype());
                self.deliver_notices();
            }
            Step::Release(subscription) => {
                log::debug!("audio input granted after stop; releasing");
                subscription.release();
            }
            Step::Terminate(termination) => self.finish(termination),
        }
    }

    /// Requesting the device is single-shot: there is no retry.
    fn request_device(self: &Arc<Self>) {
        log::debug!("requesting audio input access");

        let weak: Weak<Self> = Arc::downgrade(self);
        self.device_access.request_access(Box::new(move |result| match weak.upgrade() {
            Some(core) => core.access_resolved(result),
            None => {
                if let Ok(source) = result {
                    DeviceSubscription::new(source).release();
                }
            }
        }));
    }

    fn access_resolved(self: &Arc<Self>, result: Result<Box<dyn DeviceSource>, RecorderError>) {
        let mut s = self.session_state.lock();
        let requesting = matches!(s.state, RecorderState::RequestingDevice);

        let mut source = match result {
            Ok(source) if requesting => source,
            Ok(source) => {
                drop(s);
                return self.run(Step::Release(DeviceSubscription::new(source)));
            }
            Err(error) if requesting => {
                log::debug!("audio input access denied: {}", error);
                let step = self.terminate(&mut s, TerminalEvent::Errored(error));
                drop(s);
                return self.run(step);
            }
            Err(_) => return,
        };
        s.connecting = true;
        drop(s);

        // The device may deliver blocks, and the sink may ack them, before
        // connect returns. A stop in that window is deferred until here.
        self.streaming.store(true, Ordering::SeqCst);
        let wired = self.start_capture(source.as_mut());

        let step = {
            let mut s = self.session_state.lock();
            s.connecting = false;
            let subscription = DeviceSubscription::new(source);
            match (s.deferred.take(), wired) {
                (Some(mut termination), _) => {
                    termination.subscription = Some(subscription);
                    Step::Terminate(termination)
                }
                (None, Ok(())) => {
                    s.subscription = Some(subscription);
                    Self::transition(&mut s, RecorderState::Capturing);
                    Step::Captured
                }
                (None, Err(error)) => {
                    log::error!("failed to start audio capture: {}", error);
                    s.subscription = Some(subscription);
                    Step::Terminate(self.stop(&mut s, TerminalEvent::Errored(error)))
                }
            }
        };
        self.run(step);
    }

    fn start_capture(&self, source: &mut dyn DeviceSource) -> Result<(), RecorderError> {
        let request = BlockRequest {
            frames: self.config.buffer_size,
            channels: self.format.channel_count,
        };
        source.connect(request, self.block_callback())?;

        if source.is_suspended() {
            source.resume()?;
        }
        Ok(())
    }

    fn block_callback(&self) -> BlockCallback {
        let pipeline = Arc::clone(&self.pipeline);
        let output = Arc::clone(&self.output);
        let streaming = Arc::clone(&self.streaming);
        let send_gate = Arc::clone(&self.send_gate);

        Arc::new(move |block: &InputBlock| {
            let _gate = send_gate.lock();
            if !streaming.load(Ordering::SeqCst) {
                return;
            }

            let data = pipeline.lock().process(block);
            if let Some(data) = data {
                output.send_data(&data);
            }
        })
    }

    fn transition(s: &mut SessionState, state: RecorderState) {
        s.state = state.clone();
        s.notices.push_back(state);
    }

    /// Stop now, or park the termination while a source is mid-connect.
    fn terminate(&self, s: &mut SessionState, event: TerminalEvent) -> Step {
        let termination = self.stop(s, event);
        if s.connecting {
            s.deferred = Some(termination);
            Step::Nothing
        } else {
            Step::Terminate(termination)
        }
    }

    /// Enter the terminal state. Must be called with the session lock held;
    /// the returned termination is carried out after it is released.
    fn stop(&self, s: &mut SessionState, event: TerminalEvent) -> Termination {
        self.streaming.store(false, Ordering::SeqCst);
        s.state = RecorderState::Stopped(event.clone());

        let send_end = matches!(event, TerminalEvent::Errored(_));
        Termination {
            event,
            subscription: s.subscription.take(),
            send_end,
        }
    }

    fn finish(&self, termination: Termination) {
        let Termination {
            event,
            subscription,
            send_end,
        } = termination;

        if let Some(subscription) = subscription {
            subscription.release();
        }

        self.output.set_ack_handler(None);
        if send_end {
            let _gate = self.send_gate.lock();
            self.output.send_end();
        }

        let state = RecorderState::Stopped(event);
        log::debug!("recorder stopped: {}", state.name());

        // Queued only now so the delegate hears about it after teardown.
        self.session_state.lock().notices.push_back(state);
        self.deliver_notices();
    }

    /// Drain queued state changes to the delegate. Only one thread delivers
    /// at a time; anything queued meanwhile is picked up by that thread.
    fn deliver_notices(&self) {
        {
            let mut s = self.session_state.lock();
            if s.notifying {
                return;
            }
            s.notifying = true;
        }

        loop {
            let state = {
                let mut s = self.session_state.lock();
                match s.notices.pop_front() {
                    Some(state) => state,
                    None => {
                        s.notifying = false;
                        return;
                    }
                }
            };
            self.notify(&state);
        }
    }

    fn notify(&self, state: &RecorderState) {
        let Some(delegate) = self.delegate.lock().clone() else {
            return;
        };
        delegate.on_state_changed(state);
        match state {
            RecorderState::Stopped(TerminalEvent::Errored(error)) => delegate.on_error(error),
            RecorderState::Stopped(TerminalEvent::Closed) => delegate.on_close(),
            _ => {}
        }
    }
}

impl Drop for RecorderCore {
    fn drop(&mut self) {
        self.streaming.store(false, Ordering::SeqCst);
        if !self.session_state.get_mut().state.is_terminal() {
            self.output.set_ack_handler(None);
        }
    }
}
