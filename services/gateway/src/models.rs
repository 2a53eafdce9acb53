//! Response bodies. Amounts are rendered as decimal strings.

use contracts::TokenInfo;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: String,
}

impl From<TokenInfo> for TokenResponse {
    fn from(info: TokenInfo) -> Self {
        Self {
            address: info.address.to_string(),
            name: info.name,
            symbol: info.symbol,
            decimals: info.decimals,
            total_supply: info.total_supply.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesResponse {
    pub buy_rate: String,
    pub sell_rate: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradesResponse {
    pub buys: String,
    pub sales: String,
}
