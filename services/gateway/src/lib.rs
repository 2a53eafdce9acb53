//! Query gateway for the fixed-rate token exchange.
//!
//! Bootstraps an engine from configuration and serves its registry, rates,
//! custody and trade counters over read-only JSON routes.

pub mod config;
pub mod deploy;
pub mod error;
pub mod handlers;
pub mod models;
pub mod rate_limit;
pub mod router;
pub mod state;
