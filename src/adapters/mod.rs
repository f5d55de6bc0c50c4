//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - EVM: JSON-RPC balance reader
//! - DeFiLlama: yield pools API client
//! - Cache: TTL wrapper for any yield source
//! - Notifier: log-based alert delivery
//! - CLI: Command-line interface handlers

pub mod http;
pub mod evm;
pub mod defillama;
pub mod cache;
pub mod notifier;
pub mod cli;

#[cfg(test)]
mod test_server;

pub use evm::{EvmRpcClient, EvmRpcConfig};
pub use defillama::{DefiLlamaClient, DefiLlamaConfig};
pub use cache::CachedYieldSource;
pub use notifier::LogNotifier;
pub use cli::CliApp;
