//! Sequencer — deterministic event playback
//!
//! Events play strictly in order: each occupies its kind's duration and
//! the next starts one gap later. The sequencer never sleeps. It computes
//! the schedule and hands every event to an [`EventHandler`], so a
//! presentation layer can drive real timers from the returned offsets.

use serde::{Deserialize, Serialize};

use olympus_math::{Grid, MultiplierDrop, PaylineWin};

use crate::event::BookEvent;
use crate::timing::EventTiming;

/// Receives events in playback order; every hook defaults to a no-op
pub trait EventHandler {
    fn draw_board(&mut self, _grid: &Grid, _free_spin: bool) {}
    fn multiplier_drop(&mut self, _multipliers: &[MultiplierDrop]) {}
    fn symbol_win(&mut self, _wins: &[PaylineWin]) {}
    fn scatter_win(&mut self, _count: usize, _payout: f64) {}
    fn freespin_trigger(&mut self, _spins_awarded: u32) {}
    fn update_free_spin(&mut self, _spin: u32, _remaining: u32) {}
    fn end_free_spin(&mut self, _amount: f64) {}
    fn payout(&mut self, _amount: f64, _bet: f64) {}
}

/// Handler that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHandler;

impl EventHandler for NullHandler {}

/// An event with its place on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Position in the input book
    pub index: usize,
    pub event: BookEvent,
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl ScheduledEvent {
    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }
}

/// Computed playback of a book
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub events: Vec<ScheduledEvent>,
    /// Unknown events dropped from playback
    pub skipped: usize,
    pub total_duration_ms: u64,
}

impl Schedule {
    /// Event on screen at `time_ms`
    pub fn event_at(&self, time_ms: u64) -> Option<&ScheduledEvent> {
        self.events
            .iter()
            .find(|e| e.start_ms <= time_ms && time_ms < e.end_ms())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    timing: EventTiming,
}

impl Sequencer {
    pub fn new(timing: EventTiming) -> Self {
        Self { timing }
    }

    pub fn timing(&self) -> &EventTiming {
        &self.timing
    }

    /// Timeline only, nothing dispatched
    pub fn schedule(&self, events: &[BookEvent]) -> Schedule {
        self.play(events, &mut NullHandler)
    }

    /// Dispatch every event in order and return the timeline
    pub fn play<H: EventHandler + ?Sized>(&self, events: &[BookEvent], handler: &mut H) -> Schedule {
        let mut schedule = Schedule::default();
        let mut cursor = 0u64;

        for (index, event) in events.iter().enumerate() {
            let Some(duration_ms) = self.timing.duration_ms(event) else {
                log::warn!("Unknown event type at index {index}, skipping");
                schedule.skipped += 1;
                continue;
            };

            if !schedule.events.is_empty() {
                cursor += self.timing.gap_ms;
            }
            dispatch(event, handler);

            schedule.events.push(ScheduledEvent {
                index,
                event: event.clone(),
                start_ms: cursor,
                duration_ms,
            });
            cursor += duration_ms;
        }

        schedule.total_duration_ms = cursor;
        log::debug!(
            "Sequenced {} events over {} ms ({} skipped)",
            schedule.events.len(),
            schedule.total_duration_ms,
            schedule.skipped
        );
        schedule
    }
}

fn dispatch<H: EventHandler + ?Sized>(event: &BookEvent, handler: &mut H) {
    match event {
        BookEvent::DrawBoard { grid, free_spin } => handler.draw_board(grid, *free_spin),
        BookEvent::MultiplierDrop { multipliers } => handler.multiplier_drop(multipliers),
        BookEvent::SymbolWin { wins } => handler.symbol_win(wins),
        BookEvent::ScatterWin { count, payout } => handler.scatter_win(*count, *payout),
        BookEvent::FreespinTrigger { spins_awarded } => handler.freespin_trigger(*spins_awarded),
        BookEvent::UpdateFreeSpin { spin, remaining } => handler.update_free_spin(*spin, *remaining),
        BookEvent::EndFreeSpin { amount } => handler.end_free_spin(*amount),
        BookEvent::Payout { amount, bet } => handler.payout(*amount, *bet),
        BookEvent::Unknown => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_include_gaps() {
        let events = vec![
            BookEvent::ScatterWin { count: 4, payout: 2.0 },
            BookEvent::FreespinTrigger { spins_awarded: 15 },
            BookEvent::Payout { amount: 2.0, bet: 1.0 },
        ];
        let schedule = Sequencer::default().schedule(&events);

        let starts: Vec<u64> = schedule.events.iter().map(|e| e.start_ms).collect();
        assert_eq!(starts, vec![0, 1100, 3200]);
        assert_eq!(schedule.total_duration_ms, 4200);
        assert_eq!(schedule.event_at(1500).map(|e| e.index), Some(1));
        assert!(schedule.event_at(1050).is_none());
    }

    #[test]
    fn test_unknown_is_skipped() {
        let events = vec![
            BookEvent::Unknown,
            BookEvent::EndFreeSpin { amount: 10.0 },
            BookEvent::Unknown,
        ];
        let schedule = Sequencer::default().schedule(&events);
        assert_eq!(schedule.skipped, 2);
        assert_eq!(schedule.events.len(), 1);
        assert_eq!(schedule.events[0].index, 1);
        assert_eq!(schedule.events[0].start_ms, 0);
        assert_eq!(schedule.total_duration_ms, 1500);
    }

    #[test]
    fn test_empty_book() {
        let schedule = Sequencer::new(EventTiming::instant()).schedule(&[]);
        assert_eq!(schedule, Schedule::default());
    }
}
