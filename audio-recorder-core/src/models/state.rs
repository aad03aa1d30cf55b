use super::error::RecorderError;

/// How a recording session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// The sink closed the stream normally.
    Closed,
    /// Recording could not start or could not continue.
    Errored(RecorderError),
}

/// Recorder lifecycle state machine.
///
/// State transitions:
/// ```text
/// idle → awaiting_first_ack → requesting_device → capturing
///               ↓                    ↓                ↓
///               └──────────────→ stopped(closed | errored)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    AwaitingFirstAck,
    RequestingDevice,
    Capturing,
    Stopped(TerminalEvent),
}

impl RecorderState {
    pub fn is_capturing(&self) -> bool {
        matches!(self, Self::Capturing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped(_))
    }

    pub fn terminal_event(&self) -> Option<&TerminalEvent> {
        match self {
            Self::Stopped(event) => Some(event),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingFirstAck => "awaiting_first_ack",
            Self::RequestingDevice => "requesting_device",
            Self::Capturing => "capturing",
            Self::Stopped(TerminalEvent::Closed) => "closed",
            Self::Stopped(TerminalEvent::Errored(_)) => "errored",
        }
    }
}
