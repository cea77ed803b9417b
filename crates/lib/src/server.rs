//! Liveness and discovery HTTP server (health check, agent card, root doc).
//!
//! Read-only and independent of the listener's state machine: the server must
//! stay reachable through every listener failure mode, degraded mode included.

use crate::card::{self, MANGOSWAP_AGENT_ID, SPRAAY_AGENT_ID};
use crate::config::Config;
use crate::xmtp::{self, mock::MockTransport, ListenerConfig, ListenerStatus};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Shared state for the HTTP surface.
#[derive(Clone)]
pub struct ServerState {
    started_at: Instant,
    listener_status: watch::Receiver<ListenerStatus>,
}

impl ServerState {
    pub fn new(listener_status: watch::Receiver<ListenerStatus>) -> Self {
        Self {
            started_at: Instant::now(),
            listener_status,
        }
    }
}

/// Build the router: health, agent card, root informational document.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/.well-known/agent-card.json", get(agent_card_doc))
        .with_state(state)
}

/// Run the whole service: spawn the XMTP listener and serve HTTP until
/// SIGINT/SIGTERM. Listener failures never take the server down; with no
/// wallet key configured only the HTTP surface runs.
pub async fn serve(config: Config) -> Result<()> {
    let listener_config = ListenerConfig::from_config(&config);
    if listener_config.wallet_key.is_some() {
        // Mirrors the deployed service: the XMTP client binding is not wired
        // up yet, so the listener connects to the mock transport.
        log::warn!("xmtp client not yet integrated, listener running in mock mode");
    }

    let (status_tx, status_rx) = watch::channel(ListenerStatus::Uninitialized);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let transport: Arc<dyn xmtp::transport::Transport> = Arc::new(MockTransport::idle());
    let listener_task = tokio::spawn(xmtp::run_listener(
        listener_config,
        transport,
        status_tx,
        shutdown_rx,
    ));

    let state = ServerState::new(status_rx);
    let bind_addr = format!("{}:{}", config.server.bind.trim(), config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("health check + agent card listening on {}", bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("server exited")?;

    let _ = listener_task.await;
    log::info!("server stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or
/// SIGTERM), after signalling the listener task to stop.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, stopping listener");
    let _ = shutdown_tx.send(true);
}

/// GET /health — process status plus the live listener state for both agents.
async fn health(State(state): State<ServerState>) -> Json<Value> {
    let status = state.listener_status.borrow().as_str();
    Json(json!({
        "status": "ok",
        "agents": {
            "mangoswap": { "id": MANGOSWAP_AGENT_ID, "status": status },
            "spraay": { "id": SPRAAY_AGENT_ID, "status": status }
        },
        "uptime": state.started_at.elapsed().as_secs(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// GET /.well-known/agent-card.json — the capability document, with permissive
/// cross-origin access so registries and explorers can fetch it.
async fn agent_card_doc() -> impl IntoResponse {
    (
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(card::agent_card().clone()),
    )
}

/// GET / — root informational document linking the card and health endpoints.
async fn root() -> Json<Value> {
    Json(json!({
        "name": "Agent Mango",
        "description": "MangoSwap and Spraay ERC-8004 agents on XMTP",
        "agents": [
            { "name": "MangoSwap Router", "id": format!("ethereum:{}", MANGOSWAP_AGENT_ID) },
            { "name": "Spraay Batch Payments", "id": format!("ethereum:{}", SPRAAY_AGENT_ID) }
        ],
        "links": {
            "agentCard": "/.well-known/agent-card.json",
            "health": "/health"
        }
    }))
}
