//! Command-line and environment configuration for the gateway binary.

use std::net::SocketAddr;

use clap::Parser;
use contracts::{ExchangeConfig, TokenConfig};
use types::fee::FeeFraction;
use types::ids::Address;
use types::numeric::Amount;

use crate::deploy::DeployConfig;
use crate::rate_limit::RateLimitConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "gateway")]
#[command(about = "Fixed-rate token exchange query gateway")]
#[command(version)]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Owner of the exchange
    #[arg(long, env = "DEPLOYER", value_parser = parse_address)]
    pub deployer: Address,

    /// Accuracy constant for scaled division
    #[arg(long, env = "DIVISION_ACCURACY", default_value = "100000", value_parser = parse_amount)]
    pub division_accuracy: Amount,

    /// Owner fee, in units of 1e-18 of each buy payment
    #[arg(long, env = "OWNER_FEE", default_value = "500000000000000000", value_parser = parse_amount)]
    pub owner_fee: Amount,

    #[arg(long, env = "TOKEN_NAME", default_value = "TestTokenDex")]
    pub token_name: String,

    #[arg(long, env = "TOKEN_SYMBOL", default_value = "TTD")]
    pub token_symbol: String,

    #[arg(long, env = "TOKEN_DECIMALS", default_value_t = 2)]
    pub token_decimals: u8,

    #[arg(long, env = "INITIAL_SUPPLY", default_value = "500000000000000", value_parser = parse_amount)]
    pub initial_supply: Amount,

    /// Initial buy rate (base units per token unit)
    #[arg(long, env = "BUY_RATE", value_parser = parse_amount)]
    pub buy_rate: Option<Amount>,

    /// Initial sell rate (base units per token unit)
    #[arg(long, env = "SELL_RATE", value_parser = parse_amount)]
    pub sell_rate: Option<Amount>,

    /// Burst size of each per-route bucket
    #[arg(long, env = "RATE_LIMIT_CAPACITY", default_value_t = 100)]
    pub rate_limit_capacity: u32,

    /// Requests per second refilled into each bucket
    #[arg(long, env = "RATE_LIMIT_REFILL", default_value_t = 50.0)]
    pub rate_limit_refill: f64,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Engine and initial token parameters.
    ///
    /// Rates are applied when either one is configured; a missing side is zero.
    pub fn deploy(&self) -> anyhow::Result<DeployConfig> {
        let owner_fee = FeeFraction::new(self.owner_fee)
            .map_err(|e| anyhow::anyhow!("invalid OWNER_FEE {}: {e}", self.owner_fee))?;

        let rates = match (self.buy_rate, self.sell_rate) {
            (None, None) => None,
            (buy, sell) => Some((buy.unwrap_or_default(), sell.unwrap_or_default())),
        };

        Ok(DeployConfig {
            deployer: self.deployer,
            exchange: ExchangeConfig {
                division_accuracy: self.division_accuracy,
                owner_fee,
            },
            token: TokenConfig::new(
                self.token_name.clone(),
                self.token_symbol.clone(),
                self.token_decimals,
                self.initial_supply,
            ),
            rates,
        })
    }

    pub fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig {
            capacity: self.rate_limit_capacity,
            refill_per_sec: self.rate_limit_refill,
        }
    }
}

fn parse_address(s: &str) -> Result<Address, String> {
    s.parse::<Address>().map_err(|e| format!("invalid address `{s}`: {e}"))
}

fn parse_amount(s: &str) -> Result<Amount, String> {
    Amount::from_str_radix(s, 10).map_err(|e| format!("invalid amount `{s}`: {e}"))
}
