//! Playback durations per event kind

use serde::{Deserialize, Serialize};

use crate::event::BookEvent;

/// How long each event occupies the screen (ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventTiming {
    pub draw_board_ms: u64,
    pub multiplier_drop_ms: u64,
    pub symbol_win_ms: u64,
    pub scatter_win_ms: u64,
    pub freespin_trigger_ms: u64,
    pub update_free_spin_ms: u64,
    pub end_free_spin_ms: u64,
    pub payout_ms: u64,
    /// Pause between consecutive events
    pub gap_ms: u64,
}

impl Default for EventTiming {
    fn default() -> Self {
        Self::normal()
    }
}

impl EventTiming {
    /// Standard playback
    pub fn normal() -> Self {
        Self {
            draw_board_ms: 800,
            multiplier_drop_ms: 1000,
            symbol_win_ms: 1500,
            scatter_win_ms: 1000,
            freespin_trigger_ms: 2000,
            update_free_spin_ms: 300,
            end_free_spin_ms: 1500,
            payout_ms: 1000,
            gap_ms: 100,
        }
    }

    /// Every duration halved, gap kept
    pub fn turbo() -> Self {
        let n = Self::normal();
        Self {
            draw_board_ms: n.draw_board_ms / 2,
            multiplier_drop_ms: n.multiplier_drop_ms / 2,
            symbol_win_ms: n.symbol_win_ms / 2,
            scatter_win_ms: n.scatter_win_ms / 2,
            freespin_trigger_ms: n.freespin_trigger_ms / 2,
            update_free_spin_ms: n.update_free_spin_ms / 2,
            end_free_spin_ms: n.end_free_spin_ms / 2,
            payout_ms: n.payout_ms / 2,
            gap_ms: n.gap_ms,
        }
    }

    /// No waiting at all (tests, batch export)
    pub fn instant() -> Self {
        Self {
            draw_board_ms: 0,
            multiplier_drop_ms: 0,
            symbol_win_ms: 0,
            scatter_win_ms: 0,
            freespin_trigger_ms: 0,
            update_free_spin_ms: 0,
            end_free_spin_ms: 0,
            payout_ms: 0,
            gap_ms: 0,
        }
    }

    /// Duration of an event; `None` for events that are not played
    pub fn duration_ms(&self, event: &BookEvent) -> Option<u64> {
        let ms = match event {
            BookEvent::DrawBoard { .. } => self.draw_board_ms,
            BookEvent::MultiplierDrop { .. } => self.multiplier_drop_ms,
            BookEvent::SymbolWin { .. } => self.symbol_win_ms,
            BookEvent::ScatterWin { .. } => self.scatter_win_ms,
            BookEvent::FreespinTrigger { .. } => self.freespin_trigger_ms,
            BookEvent::UpdateFreeSpin { .. } => self.update_free_spin_ms,
            BookEvent::EndFreeSpin { .. } => self.end_free_spin_ms,
            BookEvent::Payout { .. } => self.payout_ms,
            BookEvent::Unknown => return None,
        };
        Some(ms)
    }
}
