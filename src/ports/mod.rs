//! Ports Layer - Trait definitions for external dependencies
//!
//! Following hexagonal architecture, these traits abstract:
//! - On-chain balance reads (`BalanceSource`)
//! - Yield quotes from an aggregator (`YieldSource`)
//! - Alert delivery (`AlertNotifier`)
//!
//! Implementations are injected as `Arc<dyn …>` so the domain stays pure.

pub mod balance;
pub mod yields;
pub mod notifier;
pub mod mocks;

pub use balance::{BalanceError, BalanceSource};
pub use yields::{YieldError, YieldSource};
pub use notifier::{AlertNotifier, NotifyError};
