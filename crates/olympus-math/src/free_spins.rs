//! Free spin session controller
//!
//! Drives a [`Spinner`] through a free spin award:
//! - dropped multipliers accumulate and carry into every later spin
//! - a retrigger extends the same session by the configured amount
//! - the session ends when no spins remain

use serde::{Deserialize, Serialize};

use crate::config::FreeSpinRules;
use crate::engine::Spinner;
use crate::error::MathResult;
use crate::spin::SpinResult;

/// One played free spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSpinStep {
    /// 1-based spin number within the session
    pub index: u32,
    pub result: SpinResult,
    /// Spins left after this one, retrigger included
    pub spins_remaining: u32,
    pub retriggered: bool,
}

/// Totals of a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeSpinOutcome {
    pub total_win: f64,
    /// Largest single free spin win
    pub biggest_win: f64,
    pub spins_played: u32,
    /// Initial award plus every retrigger
    pub spins_awarded: u32,
    pub retriggers: u32,
}

/// Live free spin session
#[derive(Debug, Clone)]
pub struct FreeSpinSession {
    rules: FreeSpinRules,
    spins_remaining: u32,
    active_multipliers: Vec<f64>,
    total_win: f64,
    biggest_win: f64,
    spins_played: u32,
    spins_awarded: u32,
    retriggers: u32,
}

impl FreeSpinSession {
    pub fn new(awarded: u32, rules: FreeSpinRules) -> Self {
        Self {
            rules,
            spins_remaining: awarded,
            active_multipliers: Vec::new(),
            total_win: 0.0,
            biggest_win: 0.0,
            spins_played: 0,
            spins_awarded: awarded,
            retriggers: 0,
        }
    }

    pub fn spins_remaining(&self) -> u32 {
        self.spins_remaining
    }

    /// Multipliers carried into the next spin, in drop order
    pub fn active_multipliers(&self) -> &[f64] {
        &self.active_multipliers
    }

    pub fn total_win(&self) -> f64 {
        self.total_win
    }

    pub fn biggest_win(&self) -> f64 {
        self.biggest_win
    }

    pub fn is_finished(&self) -> bool {
        self.spins_remaining == 0
    }

    /// Play the next spin, or `None` once the session is over
    pub fn play_spin<S: Spinner + ?Sized>(
        &mut self,
        spinner: &mut S,
        bet: f64,
    ) -> MathResult<Option<FreeSpinStep>> {
        if self.is_finished() {
            return Ok(None);
        }

        let result = spinner.spin(bet, true, &self.active_multipliers)?;

        if self.rules.multipliers_persist {
            self.active_multipliers.extend(result.multiplier_values());
        }
        self.total_win += result.total_win;
        self.biggest_win = self.biggest_win.max(result.total_win);

        let retriggered = result.triggered_free_spins;
        if retriggered {
            self.spins_remaining += self.rules.retrigger_spins;
            self.spins_awarded += self.rules.retrigger_spins;
            self.retriggers += 1;
        }
        self.spins_remaining -= 1;
        self.spins_played += 1;

        Ok(Some(FreeSpinStep {
            index: self.spins_played,
            result,
            spins_remaining: self.spins_remaining,
            retriggered,
        }))
    }

    /// Play until no spins remain
    pub fn run<S: Spinner + ?Sized>(mut self, spinner: &mut S, bet: f64) -> MathResult<FreeSpinOutcome> {
        while self.play_spin(spinner, bet)?.is_some() {}
        Ok(self.outcome())
    }

    /// Totals so far
    pub fn outcome(&self) -> FreeSpinOutcome {
        FreeSpinOutcome {
            total_win: self.total_win,
            biggest_win: self.biggest_win,
            spins_played: self.spins_played,
            spins_awarded: self.spins_awarded,
            retriggers: self.retriggers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::engine::GameEngine;
    use crate::rng::SeededSource;

    #[test]
    fn test_empty_award_plays_nothing() {
        let mut engine = GameEngine::new(GameConfig::reference(), SeededSource::new(5)).unwrap();
        let outcome = FreeSpinSession::new(0, FreeSpinRules::default())
            .run(&mut engine, 1.0)
            .unwrap();
        assert_eq!(outcome, FreeSpinOutcome::default());
    }

    #[test]
    fn test_session_plays_at_least_award() {
        let mut engine = GameEngine::new(GameConfig::reference(), SeededSource::new(17)).unwrap();
        let outcome = FreeSpinSession::new(15, FreeSpinRules::default())
            .run(&mut engine, 1.0)
            .unwrap();
        assert_eq!(outcome.spins_played, outcome.spins_awarded);
        assert_eq!(outcome.spins_awarded, 15 + 5 * outcome.retriggers);
        assert!(outcome.biggest_win <= outcome.total_win);
    }

    #[test]
    fn test_multipliers_only_grow() {
        let mut engine = GameEngine::new(GameConfig::reference(), SeededSource::new(99)).unwrap();
        let mut session = FreeSpinSession::new(15, FreeSpinRules::default());
        let mut previous: Vec<f64> = Vec::new();
        while let Some(step) = session.play_spin(&mut engine, 1.0).unwrap() {
            let active = session.active_multipliers();
            assert!(active.starts_with(&previous));
            assert_eq!(active.len(), previous.len() + step.result.multipliers.len());
            previous = active.to_vec();
        }
    }
}
