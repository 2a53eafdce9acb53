use crate::handlers::{dex, tokens};
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/tokens", get(tokens::list_tokens))
        .route("/tokens/{token}", get(tokens::get_token))
        .route("/dex/rates/{token}", get(dex::get_rates))
        .route("/dex/trades/{token}", get(dex::get_trades))
        // static segment wins over the capture below
        .route("/dex/max_exchange/eth", get(dex::max_exchange_eth))
        .route("/dex/max_exchange/{token}", get(dex::max_exchange_token))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
