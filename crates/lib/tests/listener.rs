//! Listener behavior tests driven through the mock transport: reply ordering,
//! self-message exclusion, fail-closed payload handling, and recovery from
//! transport failures.

use lib::command::classify;
use lib::config::XmtpEnv;
use lib::respond::synthesize;
use lib::xmtp::mock::{derive_identity, MockHandle, MockTransport};
use lib::xmtp::transport::{InboundEvent, Payload};
use lib::xmtp::{run_listener, ListenerConfig, ListenerStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const WALLET_KEY: &str = "0x6d6f636b2d77616c6c65742d6b6579";
const PEER: &str = "0x1111111111111111111111111111111111111111";

fn listener_config(reconnect_ms: u64) -> ListenerConfig {
    ListenerConfig {
        wallet_key: Some(WALLET_KEY.to_string()),
        env: XmtpEnv::Local,
        db_dir: std::env::temp_dir()
            .join(format!("mango-listener-test-{}", uuid::Uuid::new_v4())),
        reconnect_delay: Duration::from_millis(reconnect_ms),
    }
}

struct Harness {
    handle: MockHandle,
    status_rx: watch::Receiver<ListenerStatus>,
    shutdown_tx: watch::Sender<bool>,
    task: tokio::task::JoinHandle<()>,
}

impl Harness {
    fn start(config: ListenerConfig) -> Self {
        let (transport, handle) = MockTransport::with_handle();
        Self::start_with(config, transport, handle)
    }

    fn start_with(config: ListenerConfig, transport: MockTransport, handle: MockHandle) -> Self {
        let (status_tx, status_rx) = watch::channel(ListenerStatus::Uninitialized);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run_listener(
            config,
            Arc::new(transport),
            status_tx,
            shutdown_rx,
        ));
        Self {
            handle,
            status_rx,
            shutdown_tx,
            task,
        }
    }

    fn status(&self) -> ListenerStatus {
        *self.status_rx.borrow()
    }
}

async fn wait_for(what: &str, cond: impl Fn() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {}", what);
}

#[tokio::test]
async fn degrades_permanently_without_wallet_key() {
    let mut config = listener_config(10);
    config.wallet_key = None;
    let h = Harness::start(config);

    wait_for("degraded status", || h.status() == ListenerStatus::Degraded).await;
    // No handshake was ever attempted, and none will be.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(h.handle.connect_count(), 0);
    assert_eq!(h.status(), ListenerStatus::Degraded);
}

#[tokio::test]
async fn replies_in_arrival_order_within_a_conversation() {
    let h = Harness::start(listener_config(10));
    wait_for("listening", || h.status() == ListenerStatus::Listening).await;

    h.handle.push_text(PEER, "conv-1", "hello");
    h.handle.push_text(PEER, "conv-1", "swap 100 usdc to eth");
    h.handle.push_text(PEER, "conv-1", "asdkjfh");

    wait_for("three replies", || h.handle.sent().len() == 3).await;
    let sent = h.handle.sent();
    assert_eq!(sent[0].0, "conv-1");
    assert_eq!(sent[0].1, synthesize(&classify("hello")));
    assert!(sent[1].1.contains("from=USDC&to=ETH&amount=100"));
    assert_eq!(sent[2].1, synthesize(&classify("asdkjfh")));
}

#[tokio::test]
async fn never_replies_to_its_own_messages() {
    let h = Harness::start(listener_config(10));
    wait_for("listening", || h.status() == ListenerStatus::Listening).await;

    h.handle
        .push_text(&derive_identity(WALLET_KEY), "conv-1", "hello");
    h.handle.push_text(PEER, "conv-1", "hi");

    wait_for("one reply", || h.handle.sent().len() == 1).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    let sent = h.handle.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, synthesize(&classify("hi")));
}

#[tokio::test]
async fn drops_non_text_payloads_without_crashing() {
    let h = Harness::start(listener_config(10));
    wait_for("listening", || h.status() == ListenerStatus::Listening).await;

    h.handle.push_event(InboundEvent {
        sender: PEER.to_string(),
        conversation_id: "conv-1".to_string(),
        payload: Payload::Unsupported {
            content_type: "application/octet-stream".to_string(),
        },
    });
    h.handle.push_text(PEER, "conv-1", "help");

    wait_for("one reply", || h.handle.sent().len() == 1).await;
    assert_eq!(h.handle.sent()[0].1, synthesize(&classify("help")));
    assert_eq!(h.status(), ListenerStatus::Listening);
}

#[tokio::test]
async fn send_failures_stay_at_message_scope() {
    let h = Harness::start(listener_config(10));
    wait_for("listening", || h.status() == ListenerStatus::Listening).await;

    h.handle.set_fail_sends(true);
    h.handle.push_text(PEER, "conv-1", "hello");
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(h.handle.sent().is_empty());
    assert_eq!(h.status(), ListenerStatus::Listening);

    h.handle.set_fail_sends(false);
    h.handle.push_text(PEER, "conv-1", "hi");
    wait_for("reply after failure", || h.handle.sent().len() == 1).await;
    // The failed send never tore the session down.
    assert_eq!(h.handle.connect_count(), 1);
}

#[tokio::test]
async fn reconnects_exactly_once_per_stream_failure() {
    let h = Harness::start(listener_config(20));
    wait_for("listening", || h.status() == ListenerStatus::Listening).await;
    assert_eq!(h.handle.connect_count(), 1);

    h.handle.fail_stream("stream interrupted");
    wait_for("reconnect", || {
        h.handle.connect_count() == 2 && h.status() == ListenerStatus::Listening
    })
    .await;

    // One failure, one reconnect; no concurrent retry storm.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(h.handle.connect_count(), 2);

    // The recovered session keeps handling messages.
    h.handle.push_text(PEER, "conv-2", "/quote eth");
    wait_for("reply after reconnect", || h.handle.sent().len() == 1).await;
}

#[tokio::test]
async fn retries_after_handshake_failure() {
    let (transport, handle) = MockTransport::with_handle();
    handle.fail_next_connect();
    let h = Harness::start_with(listener_config(20), transport, handle);

    wait_for("recovery after failed handshake", || {
        h.handle.connect_count() >= 2 && h.status() == ListenerStatus::Listening
    })
    .await;
}

#[tokio::test]
async fn shutdown_terminates_the_listener() {
    let h = Harness::start(listener_config(10));
    wait_for("listening", || h.status() == ListenerStatus::Listening).await;

    h.shutdown_tx.send(true).expect("signal shutdown");
    wait_for("terminated", || h.status() == ListenerStatus::Terminated).await;
    tokio::time::timeout(Duration::from_secs(1), h.task)
        .await
        .expect("listener task exits")
        .expect("listener task does not panic");
}
