//! Game configuration
//!
//! All tables the engine draws from. A [`GameConfig`] is built once,
//! validated, and then shared read-only (the engine holds it in an `Arc`).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paytable::Paytable;
use crate::rng::total_weight;
use crate::symbols::Symbol;

/// Which weight/drop table a draw uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinContext {
    BaseGame,
    FreeSpins,
}

impl SpinContext {
    pub fn from_free_spins(is_free_spins: bool) -> Self {
        if is_free_spins {
            Self::FreeSpins
        } else {
            Self::BaseGame
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::BaseGame => "base game",
            Self::FreeSpins => "free spins",
        }
    }
}

/// Per-symbol draw weights for both contexts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolWeight {
    pub symbol: Symbol,
    pub base_game: f64,
    pub free_spins: f64,
}

impl SymbolWeight {
    pub fn new(symbol: Symbol, base_game: f64, free_spins: f64) -> Self {
        Self {
            symbol,
            base_game,
            free_spins,
        }
    }

    pub fn weight(&self, context: SpinContext) -> f64 {
        match context {
            SpinContext::BaseGame => self.base_game,
            SpinContext::FreeSpins => self.free_spins,
        }
    }
}

/// One entry of the multiplier value table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierWeight {
    pub value: f64,
    pub weight: f64,
}

/// Per-cell multiplier drop probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropChance {
    pub base_game: f64,
    pub free_spins: f64,
}

impl DropChance {
    pub fn get(&self, context: SpinContext) -> f64 {
        match context {
            SpinContext::BaseGame => self.base_game,
            SpinContext::FreeSpins => self.free_spins,
        }
    }
}

impl Default for DropChance {
    fn default() -> Self {
        Self {
            base_game: 0.015,
            free_spins: 0.08,
        }
    }
}

/// Free spin trigger and retrigger rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeSpinRules {
    /// Scatters required to trigger (and retrigger)
    pub scatters_needed: usize,
    /// Spins awarded on trigger, regardless of scatter count
    pub spins_awarded: u32,
    /// Spins added by a retrigger
    pub retrigger_spins: u32,
    /// Dropped multipliers carry into later free spins
    pub multipliers_persist: bool,
}

impl Default for FreeSpinRules {
    fn default() -> Self {
        Self {
            scatters_needed: 4,
            spins_awarded: 15,
            retrigger_spins: 5,
            multipliers_persist: true,
        }
    }
}

/// Complete game math configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub name: String,
    pub cols: usize,
    pub rows: usize,
    pub symbol_weights: Vec<SymbolWeight>,
    pub paytable: Paytable,
    pub multiplier_weights: Vec<MultiplierWeight>,
    pub drop_chance: DropChance,
    pub free_spins: FreeSpinRules,
    /// Minimum count for a paying symbol to win
    pub min_win_count: usize,
    /// Design RTP in percent, reported next to simulated figures
    pub target_rtp: f64,
}

impl GameConfig {
    /// Reference 5×6 scatter-pays game
    pub fn reference() -> Self {
        use Symbol::*;

        let symbol_weights = vec![
            SymbolWeight::new(BlueGem, 150.0, 140.0),
            SymbolWeight::new(GreenGem, 120.0, 115.0),
            SymbolWeight::new(RedGem, 100.0, 95.0),
            SymbolWeight::new(PurpleGem, 80.0, 80.0),
            SymbolWeight::new(YellowGem, 80.0, 80.0),
            SymbolWeight::new(Hourglass, 70.0, 65.0),
            SymbolWeight::new(Ring, 40.0, 45.0),
            SymbolWeight::new(Sword, 35.0, 40.0),
            SymbolWeight::new(Cup, 30.0, 35.0),
            SymbolWeight::new(Crown, 20.0, 25.0),
            SymbolWeight::new(Scatter, 15.0, 25.0),
        ];

        let multiplier_weights = [
            (2.0, 700.0),
            (3.0, 150.0),
            (4.0, 80.0),
            (5.0, 50.0),
            (10.0, 15.0),
            (15.0, 6.0),
            (20.0, 4.0),
            (25.0, 3.0),
            (50.0, 1.5),
            (100.0, 0.4),
            (500.0, 0.1),
        ]
        .into_iter()
        .map(|(value, weight)| MultiplierWeight { value, weight })
        .collect();

        Self {
            name: "Gates of Olympus".into(),
            cols: 5,
            rows: 6,
            symbol_weights,
            paytable: Paytable::reference(),
            multiplier_weights,
            drop_chance: DropChance::default(),
            free_spins: FreeSpinRules::default(),
            min_win_count: 8,
            target_rtp: 96.0,
        }
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Symbols in table order
    pub fn symbols(&self) -> Vec<Symbol> {
        self.symbol_weights.iter().map(|w| w.symbol).collect()
    }

    /// Weights for one context, aligned with [`GameConfig::symbols`]
    pub fn weights(&self, context: SpinContext) -> Vec<f64> {
        self.symbol_weights.iter().map(|w| w.weight(context)).collect()
    }

    pub fn multiplier_values(&self) -> Vec<f64> {
        self.multiplier_weights.iter().map(|m| m.value).collect()
    }

    pub fn multiplier_table_weights(&self) -> Vec<f64> {
        self.multiplier_weights.iter().map(|m| m.weight).collect()
    }

    pub fn grid_size(&self) -> usize {
        self.cols * self.rows
    }

    /// Check every table invariant
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyGrid {
                cols: self.cols,
                rows: self.rows,
            });
        }

        let mut seen = HashSet::new();
        for entry in &self.symbol_weights {
            if !seen.insert(entry.symbol) {
                return Err(ConfigError::DuplicateSymbol(entry.symbol));
            }
            for context in [SpinContext::BaseGame, SpinContext::FreeSpins] {
                let weight = entry.weight(context);
                if !weight.is_finite() || weight < 0.0 {
                    return Err(ConfigError::InvalidSymbolWeight {
                        symbol: entry.symbol,
                        context: context.label(),
                        weight,
                    });
                }
            }
        }
        if let Some(&missing) = Symbol::ALL.iter().find(|s| !seen.contains(*s)) {
            return Err(ConfigError::MissingSymbol(missing));
        }
        for context in [SpinContext::BaseGame, SpinContext::FreeSpins] {
            if self.weights(context).iter().sum::<f64>() <= 0.0 {
                return Err(ConfigError::ZeroSymbolWeights(context.label()));
            }
        }

        if self.min_win_count == 0 {
            return Err(ConfigError::Paytable("minimum win count must be positive".into()));
        }
        self.paytable
            .validate(self.min_win_count, self.free_spins.scatters_needed)?;

        if let Some(bad) = self
            .multiplier_weights
            .iter()
            .find(|m| !m.value.is_finite() || m.value <= 0.0)
        {
            return Err(ConfigError::Multipliers(format!(
                "value {} must be positive",
                bad.value
            )));
        }
        total_weight(&self.multiplier_table_weights())
            .map_err(|e| ConfigError::Multipliers(e.to_string()))?;

        for context in [SpinContext::BaseGame, SpinContext::FreeSpins] {
            let value = self.drop_chance.get(context);
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::DropChance {
                    context: context.label(),
                    value,
                });
            }
        }

        if self.free_spins.scatters_needed == 0 {
            return Err(ConfigError::FreeSpins("scatters needed must be positive".into()));
        }
        if self.free_spins.spins_awarded == 0 {
            return Err(ConfigError::FreeSpins("spins awarded must be positive".into()));
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::reference()
    }
}
