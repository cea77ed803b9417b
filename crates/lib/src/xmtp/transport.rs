//! Transport seam for the XMTP listener.
//!
//! The connection manager drives these traits; the binding to an actual
//! client lives behind them. The in-tree implementation is the channel-backed
//! mock (`super::mock`), which also drives the listener in tests.

use crate::xmtp::ListenerConfig;
use async_trait::async_trait;

/// Message payload as delivered by the transport. Anything that is not plain
/// text is dropped by the handler (fail closed, never rendered as text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Unsupported { content_type: String },
}

/// One inbound message event from the network.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// Sender identity (an address). Compared against the session's own
    /// identity for self-loop avoidance.
    pub sender: String,
    /// Handle of the conversation the event arrived on; replies go back here.
    pub conversation_id: String,
    pub payload: Payload,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("xmtp handshake failed: {0}")]
    Handshake(String),
    #[error("xmtp stream failed: {0}")]
    Stream(String),
    #[error("xmtp send failed: {0}")]
    Send(String),
}

/// Capability to open sessions against the messaging network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establish a session: derive the identity and complete the handshake.
    /// The caller has already prepared the local state store directory.
    async fn connect(&self, config: &ListenerConfig)
        -> Result<Box<dyn Session>, TransportError>;
}

/// One live connection: an identity, an inbound event stream, and a send
/// operation scoped to a conversation. At most one session is live per
/// process; it is dropped and re-created on reconnect.
#[async_trait]
pub trait Session: Send + Sync {
    /// The session's own identity; inbound events from this sender are dropped.
    fn identity(&self) -> &str;

    /// Await the next inbound event. `Ok(None)` means the stream ended, which
    /// the connection manager treats as fatal (reconnect).
    async fn next_event(&mut self) -> Result<Option<InboundEvent>, TransportError>;

    /// Send a text reply into a conversation. Fire-and-forget from the core's
    /// perspective; failures are handled at message scope only.
    async fn send(&self, conversation_id: &str, text: &str) -> Result<(), TransportError>;
}
