//! Full game rounds: a base spin plus its free spin session

use serde::{Deserialize, Serialize};

use crate::engine::Spinner;
use crate::error::MathResult;
use crate::free_spins::{FreeSpinSession, FreeSpinStep};
use crate::spin::SpinResult;

/// Every free spin of a triggered session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSpinRecord {
    pub spins: Vec<FreeSpinStep>,
    /// Award from the triggering base spin
    pub initial_spins: u32,
    pub total_win: f64,
    pub biggest_win: f64,
    pub spins_awarded: u32,
    pub retriggers: u32,
}

/// One round as a player sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRound {
    pub bet: f64,
    pub base: SpinResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_spins: Option<FreeSpinRecord>,
    /// Base spin win plus the whole session
    pub total_win: f64,
}

impl GameRound {
    /// Largest single spin win in the round
    pub fn biggest_spin_win(&self) -> f64 {
        let free = self.free_spins.as_ref().map_or(0.0, |r| r.biggest_win);
        self.base.total_win.max(free)
    }

    pub fn free_spins_played(&self) -> usize {
        self.free_spins.as_ref().map_or(0, |r| r.spins.len())
    }

    pub fn win_ratio(&self) -> f64 {
        if self.bet > 0.0 { self.total_win / self.bet } else { 0.0 }
    }
}

/// Play a base spin and, if it triggers, the whole session
pub fn play_round<S: Spinner + ?Sized>(spinner: &mut S, bet: f64) -> MathResult<GameRound> {
    let base = spinner.spin(bet, false, &[])?;

    let free_spins = if base.triggered_free_spins {
        let rules = spinner.free_spin_rules();
        let awarded = base.free_spins_awarded.unwrap_or(rules.spins_awarded);
        let mut session = FreeSpinSession::new(awarded, rules);

        let mut spins = Vec::with_capacity(awarded as usize);
        while let Some(step) = session.play_spin(spinner, bet)? {
            spins.push(step);
        }
        let outcome = session.outcome();
        Some(FreeSpinRecord {
            spins,
            initial_spins: awarded,
            total_win: outcome.total_win,
            biggest_win: outcome.biggest_win,
            spins_awarded: outcome.spins_awarded,
            retriggers: outcome.retriggers,
        })
    } else {
        None
    };

    let total_win = base.total_win + free_spins.as_ref().map_or(0.0, |r| r.total_win);
    Ok(GameRound {
        bet,
        base,
        free_spins,
        total_win,
    })
}
