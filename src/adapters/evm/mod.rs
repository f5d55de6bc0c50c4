//! EVM adapter
//!
//! `BalanceSource` over plain JSON-RPC endpoints, one per chain.

pub mod rpc;

pub use rpc::{encode_balance_of, parse_hex_u128, EvmRpcClient, EvmRpcConfig};
