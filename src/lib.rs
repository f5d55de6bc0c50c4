//! Rendite - Euro stablecoin yield tracker library
//!
//! Detects a wallet's Euro-stablecoin positions on EVM lending and liquidity
//! protocols, matches them to live yield quotes, and aggregates portfolio
//! metrics.
//!
//! # Modules
//!
//! - `domain`: Core logic (registry, matcher, detection, portfolio, alerts)
//! - `ports`: Trait abstractions (BalanceSource, YieldSource, AlertNotifier)
//! - `adapters`: External implementations (EVM JSON-RPC, DeFiLlama, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Portfolio tracker and alert runner

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
