use std::fmt;

/// Numeric status code carried by an acknowledgement from the output sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// The operation succeeded.
    pub const SUCCESS: StatusCode = StatusCode(0x0000);

    /// Internal failure on the receiving side.
    pub const SERVER_ERROR: StatusCode = StatusCode(0x0200);

    /// The resource is already closed; the sink ended the stream.
    pub const RESOURCE_CLOSED: StatusCode = StatusCode(0x0206);

    /// The client is not permitted to send this stream.
    pub const CLIENT_FORBIDDEN: StatusCode = StatusCode(0x0303);

    pub fn kind(self) -> AckKind {
        match self {
            Self::SUCCESS => AckKind::Success,
            Self::RESOURCE_CLOSED => AckKind::ResourceClosed,
            _ => AckKind::Error,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// How the recorder interprets an acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckKind {
    Success,
    ResourceClosed,
    Error,
}

/// Acknowledgement delivered by the output sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckStatus {
    pub code: StatusCode,
    pub message: String,
}

impl AckStatus {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn success() -> Self {
        Self::new(StatusCode::SUCCESS, "OK")
    }

    pub fn resource_closed() -> Self {
        Self::new(StatusCode::RESOURCE_CLOSED, "Stream closed")
    }

    pub fn kind(&self) -> AckKind {
        self.code.kind()
    }
}
