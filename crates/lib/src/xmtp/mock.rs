//! Channel-backed mock transport.
//!
//! Stands in for the real XMTP client (not yet integrated) and doubles as the
//! test driver for the listener: a `MockHandle` scripts inbound events and
//! failures and observes outbound replies across reconnects.

use crate::xmtp::transport::{InboundEvent, Payload, Session, Transport, TransportError};
use crate::xmtp::ListenerConfig;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

type EventResult = Result<InboundEvent, TransportError>;

struct Shared {
    /// Receiver side of the scripted event stream. Kept here (not in the
    /// session) so a reconnected session resumes the same stream.
    events: tokio::sync::Mutex<mpsc::UnboundedReceiver<EventResult>>,
    /// Keeps the stream open when no handle exists (serve mode): the session
    /// parks on recv() instead of observing end-of-stream.
    _keepalive: mpsc::UnboundedSender<EventResult>,
    sent: std::sync::Mutex<Vec<(String, String)>>,
    connects: AtomicUsize,
    fail_sends: AtomicBool,
    fail_next_connect: AtomicBool,
}

/// Mock implementation of [`Transport`].
pub struct MockTransport {
    shared: Arc<Shared>,
}

/// Driver side of the mock: pushes inbound events, injects failures, and
/// inspects replies the listener sent.
pub struct MockHandle {
    tx: mpsc::UnboundedSender<EventResult>,
    shared: Arc<Shared>,
}

impl MockTransport {
    /// Mock transport with no driver: connects, then idles without yielding
    /// events. Used by `serve` until a real XMTP client is integrated.
    pub fn idle() -> Self {
        Self::with_handle().0
    }

    /// Mock transport plus a handle for scripting events.
    pub fn with_handle() -> (Self, MockHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            events: tokio::sync::Mutex::new(rx),
            _keepalive: tx.clone(),
            sent: std::sync::Mutex::new(Vec::new()),
            connects: AtomicUsize::new(0),
            fail_sends: AtomicBool::new(false),
            fail_next_connect: AtomicBool::new(false),
        });
        (
            Self {
                shared: shared.clone(),
            },
            MockHandle { tx, shared },
        )
    }
}

impl MockHandle {
    /// Push a plain text message event.
    pub fn push_text(&self, sender: &str, conversation_id: &str, text: &str) {
        self.push_event(InboundEvent {
            sender: sender.to_string(),
            conversation_id: conversation_id.to_string(),
            payload: Payload::Text(text.to_string()),
        });
    }

    pub fn push_event(&self, event: InboundEvent) {
        let _ = self.tx.send(Ok(event));
    }

    /// Inject a fatal stream error; the next `next_event` call returns it.
    pub fn fail_stream(&self, reason: &str) {
        let _ = self.tx.send(Err(TransportError::Stream(reason.to_string())));
    }

    /// Make the next connect attempt fail with a handshake error.
    pub fn fail_next_connect(&self) {
        self.shared.fail_next_connect.store(true, Ordering::SeqCst);
    }

    /// Toggle per-message send failures.
    pub fn set_fail_sends(&self, fail: bool) {
        self.shared.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Replies sent so far, as (conversation_id, text) in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.shared
            .sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of connect attempts made against this transport.
    pub fn connect_count(&self) -> usize {
        self.shared.connects.load(Ordering::SeqCst)
    }
}

/// Deterministic placeholder identity for the mock: sha256 of the wallet key,
/// rendered as a 20-byte 0x-address. The real client derives the address from
/// the key itself; for self-loop avoidance only stability matters.
pub fn derive_identity(wallet_key: &str) -> String {
    let digest = Sha256::digest(wallet_key.as_bytes());
    format!("0x{}", hex::encode(&digest[..20]))
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(
        &self,
        config: &ListenerConfig,
    ) -> Result<Box<dyn Session>, TransportError> {
        self.shared.connects.fetch_add(1, Ordering::SeqCst);
        if self.shared.fail_next_connect.swap(false, Ordering::SeqCst) {
            return Err(TransportError::Handshake(
                "scripted handshake failure".to_string(),
            ));
        }
        let key = config
            .wallet_key
            .as_deref()
            .ok_or_else(|| TransportError::Handshake("wallet key missing".to_string()))?;
        Ok(Box::new(MockSession {
            identity: derive_identity(key),
            shared: self.shared.clone(),
        }))
    }
}

struct MockSession {
    identity: String,
    shared: Arc<Shared>,
}

#[async_trait]
impl Session for MockSession {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn next_event(&mut self) -> Result<Option<InboundEvent>, TransportError> {
        let mut rx = self.shared.events.lock().await;
        match rx.recv().await {
            Some(Ok(event)) => Ok(Some(event)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    async fn send(&self, conversation_id: &str, text: &str) -> Result<(), TransportError> {
        if self.shared.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::Send("scripted send failure".to_string()));
        }
        self.shared
            .sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((conversation_id.to_string(), text.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_identity_is_stable_and_address_shaped() {
        let a = derive_identity("0xdeadbeef");
        let b = derive_identity("0xdeadbeef");
        assert_eq!(a, b);
        assert!(a.starts_with("0x"));
        assert_eq!(a.len(), 42);
        assert_ne!(a, derive_identity("0xother"));
    }
}
