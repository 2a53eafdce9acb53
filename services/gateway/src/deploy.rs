//! Deployment bootstrap: engine, initial token, optional rates.

use contracts::{Exchange, ExchangeConfig, ExchangeError, TokenConfig};
use tracing::info;
use types::ids::Address;
use types::numeric::Amount;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// Exchange owner
    pub deployer: Address,
    pub exchange: ExchangeConfig,
    pub token: TokenConfig,
    /// `(buy_rate, sell_rate)` applied to the initial token
    pub rates: Option<(Amount, Amount)>,
}

/// A freshly bootstrapped engine and the token it was seeded with.
#[derive(Debug)]
pub struct Deployment {
    pub exchange: Exchange,
    pub token: Address,
}

/// Construct the engine and create the initial token through the owner.
pub fn bootstrap(config: &DeployConfig) -> Result<Deployment, ExchangeError> {
    let mut exchange = Exchange::new(config.deployer, config.exchange.clone())?;
    let token = exchange.create_token(config.deployer, config.token.clone())?;

    if let Some((buy_rate, sell_rate)) = config.rates {
        exchange.setup_rates(config.deployer, token, buy_rate, sell_rate)?;
    }

    info!(
        exchange = %exchange.address(),
        token = %token,
        symbol = %config.token.symbol,
        "exchange deployed"
    );

    Ok(Deployment { exchange, token })
}
