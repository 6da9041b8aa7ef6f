//! Error types for ternlex
//!
//! Only precondition failures live here. Malformed input on the decode path is
//! never an error: it becomes a [`DecodedUnit`](crate::DecodedUnit) diagnostic.

use thiserror::Error;

use crate::table::Tier;

/// Ternlex error type
#[derive(Debug, Error)]
pub enum TernlexError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Table document is not valid JSON or lacks `mapping`
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Table content violates a table invariant
    #[error("Invalid {tier} table: {message}")]
    InvalidTable { tier: Tier, message: String },

    /// A table key is the wrong width or contains non-alphabet symbols
    #[error("Invalid {tier} key {key:?}: {reason}")]
    InvalidKey {
        tier: Tier,
        key: String,
        reason: String,
    },

    /// Tier-1 lacks the shift command for a width
    #[error("Tier-1 table has no SHIFT_{0} entry")]
    MissingShift(usize),

    /// Tier-1 maps more than one key to the same shift command
    #[error("Tier-1 table has more than one SHIFT_{0} entry")]
    DuplicateShift(usize),

    /// Hex nibble groups are not 17 distinct 3-symbol groups
    #[error("Invalid hex nibble table: {0}")]
    InvalidNibbleTable(String),

    /// A character is outside both tiers and Tier-1 has no HEX_ESCAPE entry
    #[error("Cannot encode {ch:?}: not in any table and Tier-1 has no HEX_ESCAPE entry")]
    MissingHexEscapeConfig { ch: char },

    /// Invalid caller-supplied argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, TernlexError>;
