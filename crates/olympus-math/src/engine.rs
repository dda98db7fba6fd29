//! Spin engine: grid generation, multiplier drops and win evaluation

use std::sync::Arc;

use crate::config::{FreeSpinRules, GameConfig, SpinContext};
use crate::error::{MathResult, check_bet};
use crate::grid::{Grid, Position};
use crate::rng::RandomSource;
use crate::spin::{MultiplierDrop, PaylineWin, SpinResult};
use crate::symbols::Symbol;

/// Something that produces spin outcomes
///
/// [`GameEngine`] is the production implementation. The free spin
/// controller, round player and simulator only see this trait.
pub trait Spinner {
    /// One spin; `active_multipliers` only count when `is_free_spins`
    fn spin(
        &mut self,
        bet: f64,
        is_free_spins: bool,
        active_multipliers: &[f64],
    ) -> MathResult<SpinResult>;

    /// Rules the free spin controller applies to this spinner's outcomes
    fn free_spin_rules(&self) -> FreeSpinRules;
}

/// Draw tables for one context
#[derive(Debug, Clone)]
struct ContextTables {
    symbol_weights: Vec<f64>,
    drop_chance: f64,
}

/// Every table a spin draws from, built once from the config
///
/// Kept apart from the randomness source so a lookup can stay borrowed
/// while the source is drawn from.
#[derive(Debug, Clone)]
struct DrawTables {
    symbols: Vec<Symbol>,
    base: ContextTables,
    free: ContextTables,
    multiplier_values: Vec<f64>,
    multiplier_weights: Vec<f64>,
}

impl DrawTables {
    fn new(config: &GameConfig) -> Self {
        let context = |context: SpinContext| ContextTables {
            symbol_weights: config.weights(context),
            drop_chance: config.drop_chance.get(context),
        };
        Self {
            symbols: config.symbols(),
            base: context(SpinContext::BaseGame),
            free: context(SpinContext::FreeSpins),
            multiplier_values: config.multiplier_values(),
            multiplier_weights: config.multiplier_table_weights(),
        }
    }

    fn context(&self, is_free_spins: bool) -> &ContextTables {
        match SpinContext::from_free_spins(is_free_spins) {
            SpinContext::BaseGame => &self.base,
            SpinContext::FreeSpins => &self.free,
        }
    }
}

/// Scatter-pays game engine
///
/// Stateless between spins apart from the randomness source.
pub struct GameEngine<R: RandomSource> {
    config: Arc<GameConfig>,
    rng: R,
    tables: DrawTables,
}

impl<R: RandomSource> GameEngine<R> {
    /// Validate the config and build an engine around it
    pub fn new(config: GameConfig, rng: R) -> MathResult<Self> {
        Self::with_shared_config(Arc::new(config), rng)
    }

    /// Engine over a config shared with other engines
    pub fn with_shared_config(config: Arc<GameConfig>, rng: R) -> MathResult<Self> {
        config.validate()?;
        Ok(Self {
            tables: DrawTables::new(&config),
            config,
            rng,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn shared_config(&self) -> Arc<GameConfig> {
        Arc::clone(&self.config)
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Give back the randomness source
    pub fn into_rng(self) -> R {
        self.rng
    }

    /// Fill every cell, column by column, from the context's weights
    pub fn generate_grid(&mut self, is_free_spins: bool) -> MathResult<Grid> {
        let (cols, rows) = (self.config.cols, self.config.rows);
        let weights = &self.tables.context(is_free_spins).symbol_weights;

        let mut columns = Vec::with_capacity(cols);
        for _ in 0..cols {
            let mut column = Vec::with_capacity(rows);
            for _ in 0..rows {
                column.push(*self.rng.weighted_choice(&self.tables.symbols, weights)?);
            }
            columns.push(column);
        }
        Grid::from_columns(columns)
    }

    /// One Bernoulli trial per cell; a hit draws its value immediately
    pub fn generate_multiplier_drops(
        &mut self,
        is_free_spins: bool,
    ) -> MathResult<Vec<MultiplierDrop>> {
        let chance = self.tables.context(is_free_spins).drop_chance;
        let mut drops = Vec::new();

        for col in 0..self.config.cols {
            for row in 0..self.config.rows {
                if self.rng.uniform() < chance {
                    let value = *self.rng.weighted_choice(
                        &self.tables.multiplier_values,
                        &self.tables.multiplier_weights,
                    )?;
                    drops.push(MultiplierDrop {
                        position: Position::new(row, col),
                        value,
                    });
                }
            }
        }
        Ok(drops)
    }

    /// Paying-symbol wins over the whole grid
    pub fn calculate_wins(&self, grid: &Grid) -> Vec<PaylineWin> {
        self.config.paytable.evaluate(grid, self.config.min_win_count)
    }

    pub fn count_scatters(&self, grid: &Grid) -> usize {
        grid.count(Symbol::Scatter)
    }

    /// Exact-count scatter payout
    pub fn scatter_payout(&self, count: usize) -> f64 {
        self.config.paytable.scatter_payout(count)
    }

    /// Play one spin
    ///
    /// Draws the grid first, then the multiplier trials. The bet is
    /// checked before anything is drawn.
    pub fn spin(
        &mut self,
        bet: f64,
        is_free_spins: bool,
        active_multipliers: &[f64],
    ) -> MathResult<SpinResult> {
        check_bet(bet)?;

        let grid = self.generate_grid(is_free_spins)?;
        let multipliers = self.generate_multiplier_drops(is_free_spins)?;

        let wins = self.calculate_wins(&grid);
        let scatter_count = self.count_scatters(&grid);
        let scatter_payout = self.scatter_payout(scatter_count);

        // A carried sum replaces the base of 1; this spin's drops add on top
        let mut total_multiplier: f64 = if is_free_spins && !active_multipliers.is_empty() {
            active_multipliers.iter().sum()
        } else {
            1.0
        };
        for drop in &multipliers {
            total_multiplier += drop.value;
        }

        let base_win: f64 = wins.iter().map(|w| w.payout).sum::<f64>() + scatter_payout;
        let total_win = base_win * bet * total_multiplier;

        let triggered_free_spins = scatter_count >= self.config.free_spins.scatters_needed;
        let free_spins_awarded = triggered_free_spins.then_some(self.config.free_spins.spins_awarded);

        Ok(SpinResult {
            grid,
            wins,
            multipliers,
            total_multiplier,
            total_win,
            scatter_count,
            scatter_payout,
            triggered_free_spins,
            free_spins_awarded,
            is_free_spin: is_free_spins,
        })
    }
}

impl<R: RandomSource> Spinner for GameEngine<R> {
    fn spin(
        &mut self,
        bet: f64,
        is_free_spins: bool,
        active_multipliers: &[f64],
    ) -> MathResult<SpinResult> {
        GameEngine::spin(self, bet, is_free_spins, active_multipliers)
    }

    fn free_spin_rules(&self) -> FreeSpinRules {
        self.config.free_spins
    }
}
