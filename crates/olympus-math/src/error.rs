//! Error types for the slot math crate

use thiserror::Error;

use crate::symbols::Symbol;

/// Randomness-source draw failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RngError {
    #[error("Weighted draw over an empty item list")]
    EmptyItems,

    #[error("Weighted draw with {items} items but {weights} weights")]
    LengthMismatch { items: usize, weights: usize },

    #[error("Weight at index {index} is negative or not finite: {weight}")]
    InvalidWeight { index: usize, weight: f64 },

    #[error("Total weight is zero, no valid draw possible")]
    ZeroTotalWeight,
}

/// Configuration table violations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Grid must have at least one row and one column (got {cols}x{rows})")]
    EmptyGrid { cols: usize, rows: usize },

    #[error("Symbol {0} has no weight entry")]
    MissingSymbol(Symbol),

    #[error("Symbol {0} has more than one weight entry")]
    DuplicateSymbol(Symbol),

    #[error("Symbol {symbol} has an invalid {context} weight: {weight}")]
    InvalidSymbolWeight {
        symbol: Symbol,
        context: &'static str,
        weight: f64,
    },

    #[error("All {0} symbol weights are zero")]
    ZeroSymbolWeights(&'static str),

    #[error("Malformed paytable: {0}")]
    Paytable(String),

    #[error("Malformed multiplier table: {0}")]
    Multipliers(String),

    #[error("Drop chance for {context} must be within [0, 1] (got {value})")]
    DropChance { context: &'static str, value: f64 },

    #[error("Invalid free spin rules: {0}")]
    FreeSpins(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Top-level error for engine and simulator operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rng(#[from] RngError),

    #[error("Bet must be a positive finite amount (got {0})")]
    InvalidBet(f64),

    #[error("Spin count must be positive")]
    InvalidSpinCount,

    #[error("Iteration count must be positive")]
    InvalidIterations,

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
}

/// Result type alias
pub type MathResult<T> = Result<T, MathError>;

/// Reject bets the simulator cannot divide by
pub(crate) fn check_bet(bet: f64) -> MathResult<()> {
    if bet.is_finite() && bet > 0.0 {
        Ok(())
    } else {
        Err(MathError::InvalidBet(bet))
    }
}
