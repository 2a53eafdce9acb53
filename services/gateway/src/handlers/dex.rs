use super::parse_address;
use crate::error::AppError;
use crate::models::{RatesResponse, TradesResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn get_rates(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<RatesResponse>, AppError> {
    state.rate_limiter.check_rate_limit("rates")?;
    let token = parse_address(&token)?;

    let exchange = state.exchange.read();
    Ok(Json(RatesResponse {
        buy_rate: exchange.buy_rate(&token).to_string(),
        sell_rate: exchange.sell_rate(&token).to_string(),
    }))
}

pub async fn get_trades(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<TradesResponse>, AppError> {
    state.rate_limiter.check_rate_limit("trades")?;
    let token = parse_address(&token)?;

    let exchange = state.exchange.read();
    Ok(Json(TradesResponse {
        buys: exchange.buys_amount(&token).to_string(),
        sales: exchange.sales_amount(&token).to_string(),
    }))
}

/// Base currency held in custody, as bare decimal text.
pub async fn max_exchange_eth(State(state): State<AppState>) -> Result<String, AppError> {
    state.rate_limiter.check_rate_limit("max_exchange")?;

    let exchange = state.exchange.read();
    Ok(exchange.max_exchange_eth().to_string())
}

/// Token units held in custody, as bare decimal text.
pub async fn max_exchange_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<String, AppError> {
    state.rate_limiter.check_rate_limit("max_exchange")?;
    let token = parse_address(&token)?;

    let exchange = state.exchange.read();
    Ok(exchange.max_exchange_token(&token).to_string())
}
