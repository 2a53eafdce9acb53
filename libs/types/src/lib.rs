//! Types library for the fixed-rate token exchange
//!
//! This library provides the core type definitions shared by the ledger,
//! the exchange engine and the query gateway, so that every layer agrees on
//! identity width, amount width and rounding behaviour.
//!
//! # Modules
//! - `ids`: Account/contract identities and contract address derivation
//! - `numeric`: 256-bit amounts and the scaled (fixed-point) division helper
//! - `fee`: Owner fee fraction over a 10^18 denominator
//! - `errors`: Arithmetic error taxonomy

// Public modules
pub mod ids;
pub mod numeric;
pub mod fee;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::fee::*;
    pub use crate::errors::*;
}
