//! Spin outcome types

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Position};
use crate::symbols::Symbol;

/// A multiplier landed on a cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierDrop {
    pub position: Position,
    pub value: f64,
}

/// Count-based win for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaylineWin {
    pub symbol: Symbol,
    /// Occurrences anywhere on the grid
    pub count: usize,
    /// Paytable multiplier for `count` (before bet and multipliers)
    pub payout: f64,
    /// Flattened indices (`col * rows + row`), ascending
    pub positions: Vec<usize>,
}

/// Complete outcome of one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    pub grid: Grid,
    pub wins: Vec<PaylineWin>,
    /// Multipliers dropped this spin
    pub multipliers: Vec<MultiplierDrop>,
    /// 1 (or the carried-in sum during free spins) plus this spin's drops
    pub total_multiplier: f64,
    /// `(Σ win payouts + scatter payout) × bet × total_multiplier`
    pub total_win: f64,
    pub scatter_count: usize,
    pub scatter_payout: f64,
    pub triggered_free_spins: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_spins_awarded: Option<u32>,
    #[serde(default)]
    pub is_free_spin: bool,
}

impl SpinResult {
    /// Paytable multiplier before bet and multipliers
    pub fn base_win(&self) -> f64 {
        self.symbol_payout() + self.scatter_payout
    }

    /// Σ of symbol win payouts
    pub fn symbol_payout(&self) -> f64 {
        self.wins.iter().map(|w| w.payout).sum()
    }

    pub fn is_win(&self) -> bool {
        self.total_win > 0.0
    }

    /// Win-to-bet ratio
    pub fn win_ratio(&self, bet: f64) -> f64 {
        if bet > 0.0 { self.total_win / bet } else { 0.0 }
    }

    /// Values of the multipliers dropped this spin, in draw order
    pub fn multiplier_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.multipliers.iter().map(|m| m.value)
    }
}
