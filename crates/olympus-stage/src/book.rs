//! Projection of a played round into its event book

use olympus_math::{GameRound, SpinResult};

use crate::event::BookEvent;

fn push_spin(spin: &SpinResult, out: &mut Vec<BookEvent>) {
    out.push(BookEvent::DrawBoard {
        grid: spin.grid.clone(),
        free_spin: spin.is_free_spin,
    });
    if !spin.multipliers.is_empty() {
        out.push(BookEvent::MultiplierDrop {
            multipliers: spin.multipliers.clone(),
        });
    }
    if !spin.wins.is_empty() {
        out.push(BookEvent::SymbolWin {
            wins: spin.wins.clone(),
        });
    }
    if spin.scatter_payout > 0.0 {
        out.push(BookEvent::ScatterWin {
            count: spin.scatter_count,
            payout: spin.scatter_payout,
        });
    }
}

/// Every event of a round, in playback order
///
/// Base spin events come first. A triggered session follows as counter
/// update plus spin events per free spin (with the retrigger amount after a
/// retriggering spin), closed by the session total. The round payout ends
/// the book.
pub fn book_events(round: &GameRound) -> Vec<BookEvent> {
    let mut out = Vec::new();
    push_spin(&round.base, &mut out);

    if let Some(record) = &round.free_spins {
        let initial = record.initial_spins;
        out.push(BookEvent::FreespinTrigger {
            spins_awarded: initial,
        });

        let mut before = initial;
        for step in &record.spins {
            out.push(BookEvent::UpdateFreeSpin {
                spin: step.index,
                remaining: step.spins_remaining,
            });
            push_spin(&step.result, &mut out);
            if step.retriggered {
                out.push(BookEvent::FreespinTrigger {
                    spins_awarded: step.spins_remaining + 1 - before,
                });
            }
            before = step.spins_remaining;
        }

        out.push(BookEvent::EndFreeSpin {
            amount: record.total_win,
        });
    }

    out.push(BookEvent::Payout {
        amount: round.total_win,
        bet: round.bet,
    });
    out
}
