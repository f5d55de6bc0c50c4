//! Application Layer - Use cases over the ports
//!
//! - `tracker`: concurrent refresh of positions, balances and yields, polling loop
//! - `alerts`: rule evaluation and notification dispatch

pub mod tracker;
pub mod alerts;

pub use tracker::{PortfolioTracker, TrackerError, TrackerStatus};
pub use alerts::{AlertRunError, AlertRunReport, AlertRunner};
