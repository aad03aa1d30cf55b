use std::sync::Arc;

use crate::models::ack::AckStatus;

/// Handler invoked for every acknowledgement the sink sends back.
pub type AckHandler = Arc<dyn Fn(AckStatus) + Send + Sync + 'static>;

/// Flow-controlled binary output channel the recorder writes PCM into.
///
/// Implementations must not hold internal locks while invoking the ack
/// handler: the recorder detaches itself (`set_ack_handler(None)`) and may
/// send data from inside the handler.
pub trait OutputStream: Send + Sync {
    /// Send one binary blob along the stream.
    fn send_data(&self, data: &[u8]);

    /// Signal end-of-stream.
    fn send_end(&self);

    /// Replace the single acknowledgement handler slot. `None` detaches.
    fn set_ack_handler(&self, handler: Option<AckHandler>);
}
