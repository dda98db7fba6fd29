//! # olympus-math — Scatter-pays slot math engine
//!
//! Deterministic game math for a 5×6 scatter-pays slot with multiplier
//! drops and a free spins feature, plus a Monte-Carlo simulator for RTP
//! and volatility estimation.
//!
//! ## Architecture
//!
//! ```text
//! GameConfig (symbol weights, paytable, multipliers, free spin rules)
//!     │
//!     v
//! GameEngine<R: RandomSource> ── impl Spinner
//!     │                              │
//!     ├── FreeSpinSession            ├── play_round → GameRound
//!     v                              v
//! SpinResult                    Simulator → SimulationResult / BatchSummary
//! ```
//!
//! The engine owns no I/O. All randomness enters through [`RandomSource`]:
//! [`SeededSource`] in production, [`ScriptedSource`] in tests.

pub mod config;
pub mod engine;
pub mod error;
pub mod free_spins;
pub mod grid;
pub mod paytable;
pub mod report;
pub mod rng;
pub mod round;
pub mod simulator;
pub mod spin;
pub mod stats;
pub mod symbols;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use free_spins::*;
pub use grid::*;
pub use paytable::*;
pub use report::*;
pub use rng::*;
pub use round::*;
pub use simulator::*;
pub use spin::*;
pub use stats::*;
pub use symbols::*;
