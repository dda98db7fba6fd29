//! Human-readable simulation reports

use crate::stats::{BatchSummary, SimulationResult, bucket_label};

/// Histogram rows shown by default
pub const DEFAULT_TOP_BUCKETS: usize = 20;

/// Text report for one run
pub fn simulation_report(result: &SimulationResult, target_rtp: f64, top: usize) -> String {
    let mut out = String::new();
    let v = &result.volatility;

    out.push_str("=== SIMULATION REPORT ===\n");
    out.push_str(&format!("Total Spins: {}\n", result.total_spins));
    out.push_str(&format!("Total Bet: {:.2}\n", result.total_bet));
    out.push_str(&format!("Total Won: {:.2}\n", result.total_won));
    out.push_str(&format!("RTP: {:.2}%\n", result.rtp));
    out.push_str(&format!("Target RTP: {target_rtp:.2}%\n"));
    out.push_str(&format!("Difference: {:+.2}%\n", result.rtp - target_rtp));
    out.push('\n');
    out.push_str(&format!("Biggest Win: {:.2}\n", result.biggest_win));
    out.push_str(&format!("Biggest Round Win: {:.2}\n", result.biggest_round_win));
    out.push_str(&format!("Average Win: {:.4}\n", result.average_win));
    out.push_str(&format!(
        "Free Spins Triggered: {} ({:.2}%)\n",
        result.free_spins_triggered,
        result.trigger_rate()
    ));
    out.push_str(&format!(
        "Free Spins Played: {} ({} retriggers)\n",
        result.free_spins_played, result.retriggers
    ));
    out.push_str(&format!("Hit Rate: {:.2}%\n", result.hit_rate()));
    out.push('\n');
    out.push_str("Volatility Metrics:\n");
    out.push_str(&format!("  Wins: {}\n", v.wins));
    out.push_str(&format!("  Losses: {}\n", v.losses));
    out.push_str(&format!("  Win Rate: {:.2}%\n", v.win_rate));
    out.push_str(&format!("  Avg Win Size: {:.2}\n", v.avg_win_size));
    out.push_str(&format!("  Avg Loss Size: {:.2}\n", v.avg_loss_size));
    out.push_str(&format!("  Volatility Index: {:.2}\n", v.volatility_index));

    if top > 0 && !result.win_distribution.is_empty() {
        out.push('\n');
        out.push_str(&format!("Win Distribution (top {top}):\n"));
        for (key, count) in result.top_buckets(top) {
            let share = count as f64 / result.total_spins as f64 * 100.0;
            out.push_str(&format!("  {:>10}: {count:>10} ({share:.3}%)\n", bucket_label(key)));
        }
    }

    out
}

/// Text report for a batch
pub fn batch_report(summary: &BatchSummary) -> String {
    let mut out = String::new();

    out.push_str("=== BATCH REPORT ===\n");
    out.push_str(&format!("Simulations: {}\n", summary.results.len()));
    out.push_str(&format!("Total Spins: {}\n", summary.total_spins()));
    out.push_str(&format!("Average RTP: {:.2}%\n", summary.avg_rtp));
    out.push_str(&format!("Min RTP: {:.2}%\n", summary.min_rtp));
    out.push_str(&format!("Max RTP: {:.2}%\n", summary.max_rtp));
    out.push_str(&format!("RTP Std Dev: {:.2}\n", summary.rtp_std_dev));
    out.push_str(&format!("Target RTP: {:.2}%\n", summary.target_rtp));

    out
}
