//! Agent Mango core library — config, intent classification, response
//! templates, the XMTP listener, and the discovery HTTP server used by the CLI.

pub mod card;
pub mod command;
pub mod config;
pub mod respond;
pub mod server;
pub mod xmtp;
