//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.mango/config.json`) and environment.
//! Environment variables override file values for deployment-provided settings
//! (wallet key, XMTP environment, port).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP server settings (health check and agent card).
    #[serde(default)]
    pub server: ServerConfig,

    /// XMTP listener settings.
    #[serde(default)]
    pub xmtp: XmtpConfig,
}

/// HTTP bind and port settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port for the health/discovery server (default 3000). Overridden by PORT env.
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0" — the health surface is meant to be probed).
    #[serde(default = "default_server_bind")]
    pub bind: String,
}

fn default_server_port() -> u16 {
    3000
}

fn default_server_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            bind: default_server_bind(),
        }
    }
}

/// XMTP network environment selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XmtpEnv {
    #[default]
    Production,
    Dev,
    Local,
}

impl XmtpEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            XmtpEnv::Production => "production",
            XmtpEnv::Dev => "dev",
            XmtpEnv::Local => "local",
        }
    }

    /// Parse from a string (case-insensitive). Unknown values map to None so
    /// callers can fall back to the configured default.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" => Some(XmtpEnv::Production),
            "dev" => Some(XmtpEnv::Dev),
            "local" => Some(XmtpEnv::Local),
            _ => None,
        }
    }
}

/// XMTP listener config (credential, environment, state store, retry delay).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XmtpConfig {
    /// Private wallet key the XMTP identity is derived from. Overridden by
    /// XMTP_WALLET_KEY env when set. When absent entirely, the listener stays
    /// degraded and only the HTTP surface runs.
    pub wallet_key: Option<String>,

    /// Network environment. Overridden by XMTP_ENV env when set.
    #[serde(default)]
    pub env: XmtpEnv,

    /// Local directory for the XMTP state store. When unset, resolved via
    /// `resolve_db_dir` (deployment mount, then home dir, then relative path).
    pub db_dir: Option<PathBuf>,

    /// Fixed delay between reconnect attempts after a transport failure.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

fn default_reconnect_delay_ms() -> u64 {
    15_000
}

impl Default for XmtpConfig {
    fn default() -> Self {
        Self {
            wallet_key: None,
            env: XmtpEnv::default(),
            db_dir: None,
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

/// Trimmed, non-empty environment variable value.
fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

/// Resolve the wallet key: env XMTP_WALLET_KEY overrides config.
pub fn resolve_wallet_key(config: &Config) -> Option<String> {
    env_non_empty("XMTP_WALLET_KEY").or_else(|| {
        config
            .xmtp
            .wallet_key
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Resolve the XMTP environment: env XMTP_ENV overrides config when it parses.
pub fn resolve_xmtp_env(config: &Config) -> XmtpEnv {
    env_non_empty("XMTP_ENV")
        .and_then(|s| XmtpEnv::parse(&s))
        .unwrap_or(config.xmtp.env)
}

/// Resolve the server port: env PORT overrides config when it parses.
pub fn resolve_port(config: &Config) -> u16 {
    env_non_empty("PORT")
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.server.port)
}

/// Resolve the XMTP state store directory. Preference order: explicit config
/// value, deployment-provided volume mount, conventional home path, relative
/// fallback for local runs.
pub fn resolve_db_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.xmtp.db_dir {
        if !dir.as_os_str().is_empty() {
            return dir.clone();
        }
    }
    if let Some(mount) = env_non_empty("RAILWAY_VOLUME_MOUNT_PATH") {
        return PathBuf::from(mount).join("xmtp");
    }
    dirs::home_dir()
        .map(|h| h.join(".mango").join("xmtp"))
        .unwrap_or_else(|| PathBuf::from(".data").join("xmtp"))
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("MANGO_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".mango").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the default path (or MANGO_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
