//! Token Ledger & Fixed-Rate Exchange Engine
//!
//! This crate implements the contract layer of the exchange: fungible token
//! ledgers, the factory that creates them, and the engine that swaps base
//! currency for registered tokens (and back) at owner-set rates, skimming an
//! owner fee on every buy.
//!
//! # Modules
//! - `errors`: Structured error taxonomy
//! - `events`: Contract events
//! - `security`: Owner guard for administrative operations
//! - `native`: Base-currency balances and receive hooks
//! - `ledger`: Balances, allowances and transfers for one token
//! - `factory`: Token ledger construction
//! - `exchange`: Registry, rates, custody, buy/sell
//! - `adversary`: Payment-refusing counterparty used in rollback tests

pub mod errors;
pub mod events;
pub mod security;
pub mod native;
pub mod ledger;
pub mod factory;
pub mod exchange;
pub mod adversary;

pub use errors::ExchangeError;
pub use exchange::{Exchange, ExchangeConfig, TokenInfo, TokenListing};
pub use factory::TokenConfig;
pub use ledger::TokenLedger;

/// Contract ABI version, frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
