//! Stake Engine library export
//!
//! Plays rounds for a bet mode and writes the files an RGS loads:
//!
//! ```text
//! <root>/
//!   books_<mode>.jsonl       one LibraryBook per line
//!   lookUpTable_<mode>.csv   sim,weight,payout
//!   index.json               modes with their book and weight files
//!   config.json              backend: game id, target RTP, bet modes
//!   config_fe.json           frontend: grid, symbols, paytable, bet modes
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;

use olympus_math::{GameConfig, GameRound, Spinner, Symbol, play_round};

use crate::book::book_events;
use crate::error::StageResult;
use crate::event::BookEvent;

/// Rounds between progress lines
const PROGRESS_INTERVAL: u64 = 10_000;

/// A bet mode of the exported game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetMode {
    pub name: String,
    /// Price in bets
    pub cost: f64,
}

impl BetMode {
    pub fn new(name: impl Into<String>, cost: f64) -> Self {
        Self {
            name: name.into(),
            cost,
        }
    }

    /// Standard single-cost base game
    pub fn base() -> Self {
        Self::new("base", 1.0)
    }

    pub fn books_file(&self) -> String {
        format!("books_{}.jsonl", self.name)
    }

    pub fn lookup_file(&self) -> String {
        format!("lookUpTable_{}.csv", self.name)
    }
}

/// One simulated round as stored in a books file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryBook {
    /// 1-based simulation number
    pub id: u64,
    /// Round win / bet
    pub payout_multiplier: f64,
    pub events: Vec<BookEvent>,
    /// Bet mode the round was played under
    pub criteria: String,
    pub base_game_wins: f64,
    pub free_game_wins: f64,
}

impl LibraryBook {
    pub fn from_round(id: u64, round: &GameRound, mode: &BetMode) -> Self {
        Self {
            id,
            payout_multiplier: round.win_ratio(),
            events: book_events(round),
            criteria: mode.name.clone(),
            base_game_wins: round.base.total_win,
            free_game_wins: round.free_spins.as_ref().map_or(0.0, |r| r.total_win),
        }
    }

    /// Lookup table row `sim,weight,payout`; every book weighs 1
    pub fn lookup_row(&self) -> String {
        format!("{},1,{}", self.id, self.payout_multiplier)
    }
}

/// Totals of one mode's simulations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeSummary {
    pub simulations: u64,
    pub total_bet: f64,
    pub total_won: f64,
    /// Percent
    pub rtp: f64,
}

/// Play `simulations` rounds and turn each into a book
pub fn create_books<S: Spinner + ?Sized>(
    spinner: &mut S,
    simulations: u64,
    bet: f64,
    mode: &BetMode,
) -> StageResult<(Vec<LibraryBook>, ModeSummary)> {
    let mut books = Vec::with_capacity(simulations as usize);
    let mut total_bet = 0.0;
    let mut total_won = 0.0;

    for sim in 1..=simulations {
        let round = play_round(spinner, bet)?;
        total_bet += bet;
        total_won += round.total_win;
        books.push(LibraryBook::from_round(sim, &round, mode));

        if sim % PROGRESS_INTERVAL == 0 {
            log::debug!(
                "{}: {sim}/{simulations} books, running RTP {:.2}%",
                mode.name,
                total_won / total_bet * 100.0
            );
        }
    }

    let rtp = if total_bet > 0.0 { total_won / total_bet * 100.0 } else { 0.0 };
    Ok((
        books,
        ModeSummary {
            simulations,
            total_bet,
            total_won,
            rtp,
        },
    ))
}

/// Lowercase, underscore-separated id from a display name
pub fn game_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            id.push(c.to_ascii_lowercase());
        } else if !id.is_empty() && !id.ends_with('_') {
            id.push('_');
        }
    }
    id.truncate(id.trim_end_matches('_').len());
    id
}

/// Library directory writer
pub struct LibraryWriter {
    root: PathBuf,
}

impl LibraryWriter {
    /// Open (and create) a library directory
    pub fn open(root: impl AsRef<Path>) -> StageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `books_<mode>.jsonl`, one compact JSON object per line
    pub fn save_books(&self, books: &[LibraryBook], mode: &BetMode) -> StageResult<PathBuf> {
        let path = self.root.join(mode.books_file());
        let mut out = BufWriter::new(File::create(&path)?);
        for book in books {
            serde_json::to_writer(&mut out, book)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;

        log::info!("Saved {} books to {}", books.len(), path.display());
        Ok(path)
    }

    /// `lookUpTable_<mode>.csv`
    pub fn save_lookup_table(&self, books: &[LibraryBook], mode: &BetMode) -> StageResult<PathBuf> {
        let path = self.root.join(mode.lookup_file());
        let mut out = BufWriter::new(File::create(&path)?);
        for book in books {
            writeln!(out, "{}", book.lookup_row())?;
        }
        out.flush()?;

        log::info!("Saved lookup table to {}", path.display());
        Ok(path)
    }

    /// `index.json` listing every mode
    pub fn write_index(&self, modes: &[BetMode]) -> StageResult<PathBuf> {
        let entries: Vec<_> = modes
            .iter()
            .map(|mode| {
                json!({
                    "name": mode.name,
                    "cost": mode.cost,
                    "events": mode.books_file(),
                    "weights": mode.lookup_file(),
                })
            })
            .collect();
        self.write_json("index.json", &json!({ "modes": entries }))
    }

    /// `config.json` for the backend and `config_fe.json` for the frontend
    pub fn write_configs(&self, config: &GameConfig, modes: &[BetMode]) -> StageResult<(PathBuf, PathBuf)> {
        let id = game_id(&config.name);
        let bet_modes: BTreeMap<&str, f64> = modes.iter().map(|m| (m.name.as_str(), m.cost)).collect();
        let paytable: BTreeMap<&str, &[f64]> = Symbol::ALL
            .iter()
            .filter_map(|&s| config.paytable.row(s).map(|row| (s.name(), row)))
            .collect();
        let symbols: Vec<&str> = Symbol::ALL.iter().map(|s| s.name()).collect();

        let backend = json!({
            "game_id": id,
            "target_rtp": config.target_rtp,
            "bet_modes": bet_modes,
        });
        let frontend = json!({
            "game_id": id,
            "game_name": config.name,
            "rows": config.rows,
            "cols": config.cols,
            "symbols": symbols,
            "paytable": paytable,
            "bet_modes": bet_modes,
        });

        Ok((
            self.write_json("config.json", &backend)?,
            self.write_json("config_fe.json", &frontend)?,
        ))
    }

    fn write_json(&self, name: &str, value: &serde_json::Value) -> StageResult<PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, serde_json::to_string_pretty(value)?)?;
        log::debug!("Wrote {}", path.display());
        Ok(path)
    }
}
