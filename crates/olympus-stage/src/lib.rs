//! # olympus-stage — Presentation events for olympus-math rounds
//!
//! The math engine knows nothing about animation. This crate turns a played
//! [`olympus_math::GameRound`] into a book of typed events and sequences
//! them on a deterministic timeline:
//!
//! ```text
//! GameRound ── book_events ──> Vec<BookEvent> ── Sequencer::play ──> Schedule
//!                                                      │
//!                                                      └──> EventHandler hooks
//! ```
//!
//! [`library`] writes whole simulated sessions out as a Stake Engine
//! library (books, lookup table, index and configs).

pub mod book;
pub mod error;
pub mod event;
pub mod library;
pub mod sequencer;
pub mod timing;

pub use book::*;
pub use error::*;
pub use event::*;
pub use library::*;
pub use sequencer::*;
pub use timing::*;
