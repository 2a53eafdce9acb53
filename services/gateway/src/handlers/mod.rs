//! Route handlers.
//!
//! Rate, trade and custody routes report the engine's values for any
//! well-formed address, so an unregistered token reads as zeros. Token
//! metadata exists only for registered tokens and is 404 otherwise.

pub mod dex;
pub mod tokens;

use crate::error::AppError;
use contracts::Exchange;
use types::ids::Address;

fn parse_address(raw: &str) -> Result<Address, AppError> {
    raw.parse::<Address>()
        .map_err(|_| AppError::BadRequest(format!("Malformed token address: {}", raw)))
}

/// Parse a path segment as a registered token address.
fn registered_token(exchange: &Exchange, raw: &str) -> Result<Address, AppError> {
    let token = parse_address(raw)?;
    if !exchange.is_supported(&token) {
        return Err(AppError::NotFound(format!("Unknown token: {}", token)));
    }
    Ok(token)
}
