//! Paytable and scatter-pays win evaluation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::Grid;
use crate::spin::PaylineWin;
use crate::symbols::Symbol;

/// Symbol -> payout multipliers indexed by exact count on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Paytable {
    entries: BTreeMap<Symbol, Vec<f64>>,
}

impl Paytable {
    pub fn new(entries: BTreeMap<Symbol, Vec<f64>>) -> Self {
        Self { entries }
    }

    /// Reference scatter-pays table (8+ paying symbols, 4+ scatters)
    pub fn reference() -> Self {
        let pay8 = |p: [f64; 5]| {
            let mut row = vec![0.0; 8];
            row.extend_from_slice(&p);
            row
        };
        let entries = BTreeMap::from([
            (Symbol::Crown, pay8([2.8, 4.5, 9.0, 22.0, 45.0])),
            (Symbol::Cup, pay8([1.4, 2.8, 5.5, 11.0, 23.0])),
            (Symbol::Sword, pay8([1.1, 2.3, 4.5, 9.0, 14.0])),
            (Symbol::Ring, pay8([0.9, 1.8, 3.6, 7.0, 11.0])),
            (Symbol::Hourglass, pay8([0.55, 1.1, 2.3, 4.5, 7.5])),
            (Symbol::YellowGem, pay8([0.28, 0.55, 1.4, 2.3, 4.5])),
            (Symbol::PurpleGem, pay8([0.28, 0.55, 1.4, 2.3, 4.5])),
            (Symbol::RedGem, pay8([0.23, 0.45, 1.1, 1.8, 3.6])),
            (Symbol::GreenGem, pay8([0.18, 0.36, 0.9, 1.6, 2.8])),
            (Symbol::BlueGem, pay8([0.14, 0.28, 0.7, 1.4, 2.3])),
            (
                Symbol::Scatter,
                vec![
                    0.0, 0.0, 0.0, 0.0, 2.0, 3.0, 10.0, 20.0, 50.0, 100.0, 250.0, 500.0, 1000.0,
                ],
            ),
        ]);
        Self { entries }
    }

    /// Payout multiplier for an exact count; 0 when absent or out of range
    pub fn payout(&self, symbol: Symbol, count: usize) -> f64 {
        self.entries
            .get(&symbol)
            .and_then(|row| row.get(count))
            .copied()
            .unwrap_or(0.0)
    }

    /// Raw row for a symbol
    pub fn row(&self, symbol: Symbol) -> Option<&[f64]> {
        self.entries.get(&symbol).map(Vec::as_slice)
    }

    pub fn set_row(&mut self, symbol: Symbol, payouts: Vec<f64>) {
        self.entries.insert(symbol, payouts);
    }

    /// Scatter-pays evaluation over the whole grid
    ///
    /// One win per paying symbol whose count reaches `min_count` and whose
    /// exact-count payout is non-zero. Scatters never appear here. Wins come
    /// out in symbol declaration order.
    pub fn evaluate(&self, grid: &Grid, min_count: usize) -> Vec<PaylineWin> {
        let counts = grid.counts();
        Symbol::paying()
            .filter_map(|symbol| {
                let count = counts[symbol.index()];
                if count < min_count {
                    return None;
                }
                let payout = self.payout(symbol, count);
                (payout > 0.0).then(|| PaylineWin {
                    symbol,
                    count,
                    payout,
                    positions: grid.positions_of(symbol),
                })
            })
            .collect()
    }

    /// Scatter payout for an exact count
    pub fn scatter_payout(&self, count: usize) -> f64 {
        self.payout(Symbol::Scatter, count)
    }

    /// Check payouts are finite and non-negative, and that counts below the
    /// qualifying minimum pay nothing.
    ///
    /// `min_count` applies to paying symbols, `scatter_min` to the scatter.
    /// A row that decreases with count is accepted with a warning.
    pub fn validate(&self, min_count: usize, scatter_min: usize) -> Result<(), ConfigError> {
        for (&symbol, row) in &self.entries {
            let floor = if symbol.is_scatter() { scatter_min } else { min_count };

            for (count, &payout) in row.iter().enumerate() {
                if !payout.is_finite() || payout < 0.0 {
                    return Err(ConfigError::Paytable(format!(
                        "{symbol} pays {payout} for {count}"
                    )));
                }
                if count < floor && payout != 0.0 {
                    return Err(ConfigError::Paytable(format!(
                        "{symbol} pays {payout} for {count}, below the minimum of {floor}"
                    )));
                }
            }

            if row.windows(2).any(|w| w[1] < w[0]) {
                log::warn!("Paytable row for {symbol} is not monotonic: {row:?}");
            }
        }
        Ok(())
    }
}

impl Default for Paytable {
    fn default() -> Self {
        Self::reference()
    }
}
