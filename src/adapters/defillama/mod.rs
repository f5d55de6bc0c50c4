//! DeFiLlama adapter
//!
//! Implements `YieldSource` over the public yields API.

pub mod client;
pub mod types;

pub use client::{DefiLlamaClient, DefiLlamaConfig, DEFAULT_POOLS_URL};
pub use types::{LlamaPool, PoolFilter, SymbolMatch};
