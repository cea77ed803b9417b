//! Intent classification: free-text message → agent command.
//!
//! Matching is an ordered, first-match rule table over the lowercased and
//! trimmed input. The order is part of the contract (the greeting/help rule
//! runs before any substring rule) and is pinned by tests. Substring matching
//! (not just slash prefixes) lets the agent answer conversational phrasing
//! like "what's the price of ETH?" at the cost of the odd false positive.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Which logical agent a command is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentTarget {
    MangoSwap,
    Spraay,
    Unknown,
}

/// Recognized intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Help,
    Swap,
    Dca,
    Quote,
    BatchPayment,
    X402,
    Unknown,
}

impl Action {
    /// Stable string tag (used in logs).
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Help => "help",
            Action::Swap => "swap",
            Action::Dca => "dca",
            Action::Quote => "quote",
            Action::BatchPayment => "batch-payment",
            Action::X402 => "x402",
            Action::Unknown => "unknown",
        }
    }
}

/// A classified inbound message: target agent, action, extracted parameters,
/// and the original text. Built once per message, consumed by the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCommand {
    pub agent: AgentTarget,
    pub action: Action,
    pub params: BTreeMap<String, String>,
    pub raw: String,
}

/// Swap phrase: amount, from-token, "to"/"for", to-token (e.g. "swap 100 usdc to eth").
static SWAP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"swap\s+([\d.]+)\s+(\w+)\s+(?:to|for)\s+(\w+)").expect("swap pattern")
});

const HELP_TOKENS: [&str; 4] = ["/help", "help", "hi", "hello"];

type Predicate = fn(&str) -> bool;
type Build = fn(&str) -> (AgentTarget, Action, BTreeMap<String, String>);

/// Ordered rule table. First predicate that matches the normalized input wins;
/// reordering entries changes classification semantics.
const RULES: [(Predicate, Build); 6] = [
    (is_help, build_help),
    (is_swap, build_swap),
    (is_dca, build_dca),
    (is_quote, build_quote),
    (is_batch, build_batch),
    (is_x402, build_x402),
];

fn is_help(lower: &str) -> bool {
    HELP_TOKENS.contains(&lower)
}

fn is_swap(lower: &str) -> bool {
    lower.starts_with("/swap") || lower.contains("swap")
}

fn is_dca(lower: &str) -> bool {
    lower.starts_with("/dca") || lower.contains("dca")
}

fn is_quote(lower: &str) -> bool {
    lower.starts_with("/quote") || lower.contains("price") || lower.contains("quote")
}

fn is_batch(lower: &str) -> bool {
    lower.starts_with("/batch") || lower.contains("batch") || lower.contains("send to multiple")
}

fn is_x402(lower: &str) -> bool {
    lower.starts_with("/x402") || lower.contains("x402") || lower.contains("gateway")
}

fn build_help(_lower: &str) -> (AgentTarget, Action, BTreeMap<String, String>) {
    (AgentTarget::Unknown, Action::Help, BTreeMap::new())
}

/// Swap params are best-effort: when the phrase does not parse, the command is
/// still a swap but with empty params, and synthesis falls back to the usage
/// hint instead of a half-filled quote.
fn build_swap(lower: &str) -> (AgentTarget, Action, BTreeMap<String, String>) {
    let mut params = BTreeMap::new();
    if let Some(caps) = SWAP_RE.captures(lower) {
        params.insert("amount".to_string(), caps[1].to_string());
        params.insert("fromToken".to_string(), caps[2].to_uppercase());
        params.insert("toToken".to_string(), caps[3].to_uppercase());
    }
    (AgentTarget::MangoSwap, Action::Swap, params)
}

fn build_dca(_lower: &str) -> (AgentTarget, Action, BTreeMap<String, String>) {
    (AgentTarget::MangoSwap, Action::Dca, BTreeMap::new())
}

fn build_quote(_lower: &str) -> (AgentTarget, Action, BTreeMap<String, String>) {
    (AgentTarget::MangoSwap, Action::Quote, BTreeMap::new())
}

fn build_batch(_lower: &str) -> (AgentTarget, Action, BTreeMap<String, String>) {
    (AgentTarget::Spraay, Action::BatchPayment, BTreeMap::new())
}

fn build_x402(_lower: &str) -> (AgentTarget, Action, BTreeMap<String, String>) {
    (AgentTarget::Spraay, Action::X402, BTreeMap::new())
}

/// Classify a raw message. Total: any input maps to a command, unrecognized
/// input to the unknown action.
pub fn classify(text: &str) -> ClassifiedCommand {
    let lower = text.trim().to_lowercase();
    for (matches, build) in RULES {
        if matches(&lower) {
            let (agent, action, params) = build(&lower);
            return ClassifiedCommand {
                agent,
                action,
                params,
                raw: text.to_string(),
            };
        }
    }
    ClassifiedCommand {
        agent: AgentTarget::Unknown,
        action: Action::Unknown,
        params: BTreeMap::new(),
        raw: text.to_string(),
    }
}
