//! BookEvent — one presentation step of a game round
//!
//! Serialized with a `type` tag; tags and field names use the frontend's
//! camelCase, and snake_case field names are accepted on input. Any tag
//! this crate does not know decodes as [`BookEvent::Unknown`].

use serde::{Deserialize, Serialize};

use olympus_math::{Grid, MultiplierDrop, PaylineWin};

use crate::error::StageResult;

/// Presentation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BookEvent {
    /// Show a fresh grid
    DrawBoard {
        grid: Grid,
        #[serde(default, alias = "free_spin")]
        free_spin: bool,
    },

    /// Land multipliers on cells
    MultiplierDrop { multipliers: Vec<MultiplierDrop> },

    /// Highlight paying symbols
    SymbolWin { wins: Vec<PaylineWin> },

    ScatterWin { count: usize, payout: f64 },

    /// Free spins awarded (or added by a retrigger)
    FreespinTrigger {
        #[serde(alias = "spins_awarded")]
        spins_awarded: u32,
    },

    /// Free spin counter
    UpdateFreeSpin { spin: u32, remaining: u32 },

    /// Session total
    EndFreeSpin { amount: f64 },

    /// Round total
    Payout { amount: f64, bet: f64 },

    #[serde(other)]
    Unknown,
}

impl BookEvent {
    /// Wire tag
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::DrawBoard { .. } => "drawBoard",
            Self::MultiplierDrop { .. } => "multiplierDrop",
            Self::SymbolWin { .. } => "symbolWin",
            Self::ScatterWin { .. } => "scatterWin",
            Self::FreespinTrigger { .. } => "freespinTrigger",
            Self::UpdateFreeSpin { .. } => "updateFreeSpin",
            Self::EndFreeSpin { .. } => "endFreeSpin",
            Self::Payout { .. } => "payout",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// Decode a JSON array of events
pub fn parse_book(json: &str) -> StageResult<Vec<BookEvent>> {
    Ok(serde_json::from_str(json)?)
}

/// Encode events as a JSON array
pub fn to_json(events: &[BookEvent]) -> StageResult<String> {
    Ok(serde_json::to_string_pretty(events)?)
}
