//! XMTP listener: connection lifecycle, per-message intake, and supervised
//! reconnects.
//!
//! One long-lived listener task per process. The supervisor owns the retry
//! loop: a missing wallet key degrades permanently (the HTTP surface stays
//! up), while transport failures reconnect after a fixed delay, indefinitely.
//! Per-message errors never escape message scope.

pub mod mock;
pub mod transport;

use crate::command;
use crate::config::{self, Config, XmtpEnv};
use crate::respond;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use transport::{InboundEvent, Payload, Session, Transport, TransportError};

/// Listener lifecycle state, published through a watch channel for the health
/// endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerStatus {
    Uninitialized,
    Connecting,
    Listening,
    Reconnecting,
    Degraded,
    Terminated,
}

impl ListenerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListenerStatus::Uninitialized => "uninitialized",
            ListenerStatus::Connecting => "connecting",
            ListenerStatus::Listening => "listening",
            ListenerStatus::Reconnecting => "reconnecting",
            ListenerStatus::Degraded => "degraded",
            ListenerStatus::Terminated => "terminated",
        }
    }
}

/// Resolved listener settings, passed by value into [`run_listener`] so
/// session construction does not read process-wide state.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    pub wallet_key: Option<String>,
    pub env: XmtpEnv,
    pub db_dir: PathBuf,
    pub reconnect_delay: Duration,
}

impl ListenerConfig {
    /// Resolve from app config plus environment overrides.
    pub fn from_config(config: &Config) -> Self {
        Self {
            wallet_key: config::resolve_wallet_key(config),
            env: config::resolve_xmtp_env(config),
            db_dir: config::resolve_db_dir(config),
            reconnect_delay: Duration::from_millis(config.xmtp.reconnect_delay_ms),
        }
    }
}

/// Why the event pump stopped.
enum PumpEnd {
    Shutdown,
    StreamEnded,
    Fatal(TransportError),
}

/// Run the listener until shutdown.
///
/// With no wallet key it degrades immediately and permanently; no handshake
/// is ever attempted (there is no way to inject a credential at runtime).
/// Otherwise: connect, pump events, and on any fatal transport error wait the
/// configured fixed delay and reconnect. The retry loop is unbounded; only
/// the shutdown signal ends it.
pub async fn run_listener(
    config: ListenerConfig,
    transport: Arc<dyn Transport>,
    status_tx: watch::Sender<ListenerStatus>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    if config.wallet_key.is_none() {
        log::warn!("XMTP_WALLET_KEY not set; listener degraded, serving health and agent card only");
        let _ = status_tx.send(ListenerStatus::Degraded);
        return;
    }

    loop {
        if *shutdown_rx.borrow() {
            break;
        }
        let _ = status_tx.send(ListenerStatus::Connecting);

        match open_session(&config, transport.as_ref()).await {
            Ok(mut session) => {
                log::info!(
                    "xmtp session established (env: {}, identity: {})",
                    config.env.as_str(),
                    session.identity()
                );
                let _ = status_tx.send(ListenerStatus::Listening);
                match pump_events(session.as_mut(), &mut shutdown_rx).await {
                    PumpEnd::Shutdown => break,
                    PumpEnd::StreamEnded => log::warn!("xmtp stream ended unexpectedly"),
                    PumpEnd::Fatal(e) => log::warn!("xmtp stream failed: {}", e),
                }
            }
            Err(e) => log::warn!("xmtp connect failed: {}", e),
        }

        let _ = status_tx.send(ListenerStatus::Reconnecting);
        log::info!("reconnecting in {:?}", config.reconnect_delay);
        tokio::select! {
            _ = tokio::time::sleep(config.reconnect_delay) => {}
            res = shutdown_rx.changed() => {
                if res.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    let _ = status_tx.send(ListenerStatus::Terminated);
    log::info!("xmtp listener stopped");
}

/// Prepare the local state store directory, then connect. The store is
/// exclusive to the single live session; it is only ever opened from here.
async fn open_session(
    config: &ListenerConfig,
    transport: &dyn Transport,
) -> Result<Box<dyn Session>, TransportError> {
    tokio::fs::create_dir_all(&config.db_dir).await.map_err(|e| {
        TransportError::Handshake(format!(
            "preparing state store {}: {}",
            config.db_dir.display(),
            e
        ))
    })?;
    transport.connect(config).await
}

/// Consume inbound events until shutdown or a fatal stream condition.
async fn pump_events(
    session: &mut dyn Session,
    shutdown_rx: &mut watch::Receiver<bool>,
) -> PumpEnd {
    loop {
        tokio::select! {
            res = shutdown_rx.changed() => {
                if res.is_err() || *shutdown_rx.borrow() {
                    return PumpEnd::Shutdown;
                }
            }
            event = session.next_event() => match event {
                Ok(Some(event)) => handle_event(&*session, event).await,
                Ok(None) => return PumpEnd::StreamEnded,
                Err(e) => return PumpEnd::Fatal(e),
            },
        }
    }
}

/// Handle one inbound event: drop the session's own messages and non-text
/// payloads, otherwise classify, synthesize, and reply on the originating
/// conversation. Every message yields one reply or none, and errors stay at
/// message scope.
async fn handle_event(session: &dyn Session, event: InboundEvent) {
    if event.sender.eq_ignore_ascii_case(session.identity()) {
        log::debug!("skipping own message in {}", event.conversation_id);
        return;
    }
    let text = match event.payload {
        Payload::Text(text) => text,
        Payload::Unsupported { content_type } => {
            log::debug!(
                "dropping non-text payload ({}) in {}",
                content_type,
                event.conversation_id
            );
            return;
        }
    };
    let cmd = command::classify(&text);
    log::info!(
        "message from {} classified as {}",
        event.sender,
        cmd.action.as_str()
    );
    let reply = respond::synthesize(&cmd);
    if let Err(e) = session.send(&event.conversation_id, &reply).await {
        log::warn!("reply to {} failed: {}", event.conversation_id, e);
    }
}
