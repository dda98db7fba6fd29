//! Simulation statistics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::free_spins::FreeSpinOutcome;
use crate::spin::SpinResult;

/// Win/loss split of base spins against the bet
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VolatilityMetrics {
    /// Base spins paying more than the bet
    pub wins: u64,
    /// Base spins paying less than the bet
    pub losses: u64,
    /// `wins / total_spins × 100`
    pub win_rate: f64,
    /// Mean excess over the bet for winning spins
    pub avg_win_size: f64,
    /// Mean shortfall against the bet for losing spins
    pub avg_loss_size: f64,
    /// Standard deviation of round win / bet
    pub volatility_index: f64,
}

/// Aggregate result of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub total_spins: u64,
    pub total_bet: f64,
    pub total_won: f64,
    /// Percent
    pub rtp: f64,
    /// Largest base spin or single free spin win
    pub biggest_win: f64,
    /// Largest base spin plus session total
    pub biggest_round_win: f64,
    pub free_spins_triggered: u64,
    pub free_spins_played: u64,
    pub retriggers: u64,
    /// Rounds that paid anything
    pub hits: u64,
    /// `total_won / total_spins`
    pub average_win: f64,
    pub volatility: VolatilityMetrics,
    /// Base spin win / bet floored to tenths, keyed in tenths
    pub win_distribution: BTreeMap<u64, u64>,
}

impl SimulationResult {
    /// Free spin trigger frequency in percent
    pub fn trigger_rate(&self) -> f64 {
        percent(self.free_spins_triggered, self.total_spins)
    }

    pub fn hit_rate(&self) -> f64 {
        percent(self.hits, self.total_spins)
    }

    /// Histogram buckets by descending frequency, ties in ascending key order
    pub fn top_buckets(&self, n: usize) -> Vec<(u64, u64)> {
        let mut buckets: Vec<(u64, u64)> =
            self.win_distribution.iter().map(|(&k, &v)| (k, v)).collect();
        buckets.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        buckets.truncate(n);
        buckets
    }
}

/// Render a tenths bucket key as `"12.3x"`
pub fn bucket_label(key: u64) -> String {
    format!("{}.{}x", key / 10, key % 10)
}

/// Tenths bucket for a win multiple
pub fn bucket_key(win: f64, bet: f64) -> u64 {
    let tenths = (win / bet * 10.0).floor();
    if tenths.is_finite() && tenths > 0.0 { tenths as u64 } else { 0 }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}

/// Running mean and variance (Welford)
#[derive(Debug, Clone, Copy, Default)]
struct RunningMoments {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningMoments {
    fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Population standard deviation
    fn std_dev(&self) -> f64 {
        if self.count > 0 {
            (self.m2 / self.count as f64).sqrt()
        } else {
            0.0
        }
    }
}

/// Collects rounds into a [`SimulationResult`]
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    bet: f64,
    total_spins: u64,
    total_bet: f64,
    total_won: f64,
    biggest_win: f64,
    biggest_round_win: f64,
    free_spins_triggered: u64,
    free_spins_played: u64,
    retriggers: u64,
    hits: u64,
    wins: u64,
    losses: u64,
    win_excess: f64,
    loss_deficit: f64,
    round_returns: RunningMoments,
    histogram: BTreeMap<u64, u64>,
}

impl StatsAccumulator {
    pub fn new(bet: f64) -> Self {
        Self {
            bet,
            total_spins: 0,
            total_bet: 0.0,
            total_won: 0.0,
            biggest_win: 0.0,
            biggest_round_win: 0.0,
            free_spins_triggered: 0,
            free_spins_played: 0,
            retriggers: 0,
            hits: 0,
            wins: 0,
            losses: 0,
            win_excess: 0.0,
            loss_deficit: 0.0,
            round_returns: RunningMoments::default(),
            histogram: BTreeMap::new(),
        }
    }

    /// Record one base spin and its session, if it triggered one
    pub fn record(&mut self, base: &SpinResult, session: Option<&FreeSpinOutcome>) {
        let bet = self.bet;
        self.total_spins += 1;
        self.total_bet += bet;

        let base_win = base.total_win;
        let session_win = session.map_or(0.0, |s| s.total_win);
        let round_win = base_win + session_win;
        self.total_won += round_win;

        self.biggest_win = self.biggest_win.max(base_win);
        if let Some(s) = session {
            self.free_spins_triggered += 1;
            self.free_spins_played += u64::from(s.spins_played);
            self.retriggers += u64::from(s.retriggers);
            self.biggest_win = self.biggest_win.max(s.biggest_win);
        }
        self.biggest_round_win = self.biggest_round_win.max(round_win);

        if round_win > 0.0 {
            self.hits += 1;
        }
        if base_win > bet {
            self.wins += 1;
            self.win_excess += base_win - bet;
        } else if base_win < bet {
            self.losses += 1;
            self.loss_deficit += bet - base_win;
        }

        *self.histogram.entry(bucket_key(base_win, bet)).or_insert(0) += 1;
        self.round_returns.push(round_win / bet);
    }

    pub fn finish(self) -> SimulationResult {
        let mean_of = |sum: f64, n: u64| if n > 0 { sum / n as f64 } else { 0.0 };

        SimulationResult {
            total_spins: self.total_spins,
            total_bet: self.total_bet,
            total_won: self.total_won,
            rtp: if self.total_bet > 0.0 {
                self.total_won / self.total_bet * 100.0
            } else {
                0.0
            },
            biggest_win: self.biggest_win,
            biggest_round_win: self.biggest_round_win,
            free_spins_triggered: self.free_spins_triggered,
            free_spins_played: self.free_spins_played,
            retriggers: self.retriggers,
            hits: self.hits,
            average_win: mean_of(self.total_won, self.total_spins),
            volatility: VolatilityMetrics {
                wins: self.wins,
                losses: self.losses,
                win_rate: percent(self.wins, self.total_spins),
                avg_win_size: mean_of(self.win_excess, self.wins),
                avg_loss_size: mean_of(self.loss_deficit, self.losses),
                volatility_index: self.round_returns.std_dev(),
            },
            win_distribution: self.histogram,
        }
    }
}

/// Aggregate over several independent runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub results: Vec<SimulationResult>,
    pub avg_rtp: f64,
    pub min_rtp: f64,
    pub max_rtp: f64,
    /// Population standard deviation of the per-run RTPs
    pub rtp_std_dev: f64,
    pub target_rtp: f64,
}

impl BatchSummary {
    pub fn from_results(results: Vec<SimulationResult>, target_rtp: f64) -> Self {
        let mut moments = RunningMoments::default();
        let mut min_rtp = f64::INFINITY;
        let mut max_rtp = f64::NEG_INFINITY;
        for r in &results {
            moments.push(r.rtp);
            min_rtp = min_rtp.min(r.rtp);
            max_rtp = max_rtp.max(r.rtp);
        }
        if results.is_empty() {
            min_rtp = 0.0;
            max_rtp = 0.0;
        }

        Self {
            avg_rtp: moments.mean,
            rtp_std_dev: moments.std_dev(),
            min_rtp,
            max_rtp,
            target_rtp,
            results,
        }
    }

    pub fn total_spins(&self) -> u64 {
        self.results.iter().map(|r| r.total_spins).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::grid::Grid;
    use crate::symbols::Symbol;

    fn spin_paying(total_win: f64) -> SpinResult {
        SpinResult {
            grid: Grid::from_columns(vec![vec![Symbol::BlueGem]]).unwrap(),
            wins: Vec::new(),
            multipliers: Vec::new(),
            total_multiplier: 1.0,
            total_win,
            scatter_count: 0,
            scatter_payout: 0.0,
            triggered_free_spins: false,
            free_spins_awarded: None,
            is_free_spin: false,
        }
    }

    #[test]
    fn test_bucket_key_and_label() {
        assert_eq!(bucket_key(0.0, 1.0), 0);
        assert_eq!(bucket_key(1.29, 1.0), 12);
        assert_eq!(bucket_key(5.0, 2.0), 25);
        assert_eq!(bucket_label(25), "2.5x");
        assert_eq!(bucket_label(0), "0.0x");
    }

    #[test]
    fn test_win_loss_push_classification() {
        let mut acc = StatsAccumulator::new(1.0);
        acc.record(&spin_paying(3.0), None);
        acc.record(&spin_paying(1.0), None);
        acc.record(&spin_paying(0.0), None);
        acc.record(&spin_paying(0.5), None);
        let result = acc.finish();

        assert_eq!(result.total_spins, 4);
        assert_eq!(result.volatility.wins, 1);
        assert_eq!(result.volatility.losses, 2);
        assert_relative_eq!(result.volatility.avg_win_size, 2.0);
        assert_relative_eq!(result.volatility.avg_loss_size, 0.75);
        assert_relative_eq!(result.volatility.win_rate, 25.0);
        assert_relative_eq!(result.rtp, 112.5);
        assert_eq!(result.hits, 3);
        assert_eq!(result.win_distribution.get(&10), Some(&1));
    }

    #[test]
    fn test_session_counts_toward_totals_not_classification() {
        let mut acc = StatsAccumulator::new(2.0);
        let session = FreeSpinOutcome {
            total_win: 40.0,
            biggest_win: 25.0,
            spins_played: 20,
            spins_awarded: 20,
            retriggers: 1,
        };
        let mut base = spin_paying(1.0);
        base.triggered_free_spins = true;
        acc.record(&base, Some(&session));
        let result = acc.finish();

        assert_relative_eq!(result.total_won, 41.0);
        assert_relative_eq!(result.biggest_win, 25.0);
        assert_relative_eq!(result.biggest_round_win, 41.0);
        assert_eq!(result.free_spins_triggered, 1);
        assert_eq!(result.free_spins_played, 20);
        assert_eq!(result.retriggers, 1);
        assert_eq!(result.volatility.losses, 1);
        assert_eq!(result.win_distribution.get(&5), Some(&1));
    }

    #[test]
    fn test_std_dev() {
        let mut acc = StatsAccumulator::new(1.0);
        for win in [0.0, 2.0, 0.0, 2.0] {
            acc.record(&spin_paying(win), None);
        }
        assert_relative_eq!(acc.finish().volatility.volatility_index, 1.0);
    }

    #[test]
    fn test_batch_summary() {
        let mut results = Vec::new();
        for rtp in [90.0, 100.0, 110.0] {
            let mut acc = StatsAccumulator::new(1.0);
            acc.record(&spin_paying(rtp / 100.0), None);
            results.push(acc.finish());
        }
        let summary = BatchSummary::from_results(results, 96.0);
        assert_relative_eq!(summary.avg_rtp, 100.0, epsilon = 1e-9);
        assert_relative_eq!(summary.min_rtp, 90.0, epsilon = 1e-9);
        assert_relative_eq!(summary.max_rtp, 110.0, epsilon = 1e-9);
        assert_relative_eq!(summary.rtp_std_dev, (200.0f64 / 3.0).sqrt(), epsilon = 1e-9);
        assert_eq!(summary.total_spins(), 3);
    }

    #[test]
    fn test_top_buckets_order() {
        let mut acc = StatsAccumulator::new(1.0);
        for win in [0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 3.0] {
            acc.record(&spin_paying(win), None);
        }
        let top = acc.finish().top_buckets(3);
        assert_eq!(top, vec![(0, 3), (10, 2), (20, 1)]);
    }
}
