//! Response synthesis: classified command → reply text.
//!
//! Pure and deterministic; no network or state access. All user-facing copy
//! and link templates live here as data so they can change without touching
//! the classifier or the listener.

use crate::command::{Action, ClassifiedCommand};

const HELP_TEXT: &str = "\
🥭 Agent Mango — DeFi Agent Suite

MangoSwap (Agent #26345):
  /swap <amount> <token> to <token> — Get swap quote
  /dca — Set up dollar-cost averaging
  /quote <token> — Get token price

Spraay (Agent #26346):
  /batch — Start a batch payment
  /x402 — Query x402 gateway

Links:
  MangoSwap: https://mangoswap.xyz
  Spraay Gateway: https://gateway.spraay.app
  8004scan: https://8004scan.io/ethereum/agent/26345";

const SWAP_USAGE_TEXT: &str = "\
🔄 To swap, use: /swap <amount> <fromToken> to <toToken>
Example: /swap 100 USDC to ETH";

const DCA_TEXT: &str = "\
📅 DCA (Dollar-Cost Averaging)

Set up scheduled token purchases on Base.
Visit https://mangoswap.xyz/dca to configure your schedule.

Supports any token pair routed through Uniswap V3 / Aerodrome.";

const QUOTE_TEXT: &str = "📊 For real-time quotes, visit https://mangoswap.xyz — prices route through Uniswap V3 / Aerodrome for best execution.";

const BATCH_PAYMENT_TEXT: &str = "\
📦 Spraay Batch Payments

Send tokens to multiple recipients in one transaction.
Supported networks: Base, Bittensor, Unichain, Plasma, BOB

API: https://gateway.spraay.app
Docs: https://spraay.app

Use the x402 gateway for programmatic access with USDC micropayments.";

const X402_TEXT: &str = "\
⚡ Spraay x402 Gateway

9 paid endpoints on Base mainnet.
AI agents pay per-request with USDC via x402 protocol.

Gateway: https://gateway.spraay.app
Payment wallet: 0xAd62f03C7514bb8c51f1eA70C2b75C37404695c8

Bazaar listing: https://bazaar.x402.org";

const UNKNOWN_TEXT: &str = "\
🥭 Not sure what you mean. Try one of:
  /swap — get a swap quote
  /dca — set up scheduled purchases
  /quote — get token prices
  /batch — start a batch payment

Say \"help\" for the full menu.";

/// Produce the reply text for a classified command. Total: every action has
/// exactly one branch, and the unknown action yields the fixed fallback.
pub fn synthesize(cmd: &ClassifiedCommand) -> String {
    match cmd.action {
        Action::Help => HELP_TEXT.to_string(),
        Action::Swap => synthesize_swap(cmd),
        Action::Dca => DCA_TEXT.to_string(),
        Action::Quote => QUOTE_TEXT.to_string(),
        Action::BatchPayment => BATCH_PAYMENT_TEXT.to_string(),
        Action::X402 => X402_TEXT.to_string(),
        Action::Unknown => UNKNOWN_TEXT.to_string(),
    }
}

/// Swap is the only interpolated template. All three params must be present
/// (and non-empty) for the quote text; otherwise the fixed usage hint is
/// returned, never a partially filled link.
fn synthesize_swap(cmd: &ClassifiedCommand) -> String {
    let param = |key: &str| cmd.params.get(key).map(String::as_str).filter(|s| !s.is_empty());
    let (Some(amount), Some(from), Some(to)) =
        (param("amount"), param("fromToken"), param("toToken"))
    else {
        return SWAP_USAGE_TEXT.to_string();
    };
    format!(
        "🔄 Swap Request: {amount} {from} → {to}\n\
         \n\
         To execute this swap on Base, visit:\n\
         https://mangoswap.xyz/swap?from={from}&to={to}&amount={amount}\n\
         \n\
         Gas-free via Coinbase Paymaster 🎉\n\
         Routes through Uniswap V3 / Aerodrome for best price."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::classify;

    #[test]
    fn swap_with_all_params_interpolates_quote_and_link() {
        let cmd = classify("swap 100 usdc to eth");
        let reply = synthesize(&cmd);
        assert!(reply.contains("100 USDC → ETH"), "reply: {}", reply);
        assert!(
            reply.contains("https://mangoswap.xyz/swap?from=USDC&to=ETH&amount=100"),
            "reply: {}",
            reply
        );
    }

    #[test]
    fn swap_with_missing_params_returns_usage_hint() {
        let cmd = classify("swap please");
        let reply = synthesize(&cmd);
        assert_eq!(reply, SWAP_USAGE_TEXT);
        assert!(!reply.contains("mangoswap.xyz/swap?"));
    }

    #[test]
    fn help_lists_commands_for_both_agents() {
        let reply = synthesize(&classify("help"));
        for needle in ["/swap", "/dca", "/quote", "/batch", "/x402"] {
            assert!(reply.contains(needle), "missing {} in: {}", needle, reply);
        }
    }

    #[test]
    fn unknown_fallback_lists_primary_keywords() {
        let reply = synthesize(&classify("asdkjfh"));
        for needle in ["/swap", "/dca", "/quote", "/batch"] {
            assert!(reply.contains(needle), "missing {} in: {}", needle, reply);
        }
    }

    #[test]
    fn fixed_templates_for_remaining_actions() {
        assert_eq!(synthesize(&classify("/dca")), DCA_TEXT);
        assert_eq!(synthesize(&classify("/quote")), QUOTE_TEXT);
        assert_eq!(synthesize(&classify("/batch")), BATCH_PAYMENT_TEXT);
        assert_eq!(synthesize(&classify("/x402")), X402_TEXT);
    }

    #[test]
    fn synthesis_is_deterministic() {
        let cmd = classify("swap 2.5 eth for usdc");
        assert_eq!(synthesize(&cmd), synthesize(&cmd));
    }
}
