use super::registered_token;
use crate::error::AppError;
use crate::models::TokenResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn list_tokens(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    state.rate_limiter.check_rate_limit("tokens")?;

    let exchange = state.exchange.read();
    let tokens = exchange
        .supported_tokens()
        .iter()
        .map(|token| token.to_string())
        .collect();

    Ok(Json(tokens))
}

pub async fn get_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<TokenResponse>, AppError> {
    state.rate_limiter.check_rate_limit("token")?;

    let exchange = state.exchange.read();
    let token = registered_token(&exchange, &token)?;
    let info = exchange
        .token_info(&token)
        .ok_or_else(|| AppError::NotFound(format!("Unknown token: {}", token)))?;

    Ok(Json(info.into()))
}
