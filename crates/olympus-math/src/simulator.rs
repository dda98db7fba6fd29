//! Monte-Carlo RTP simulator
//!
//! Plays base spins (and every free spin session they trigger) through a
//! [`Spinner`] and folds the outcomes into a [`SimulationResult`]. Batches
//! of independent runs execute in parallel on the rayon pool; each worker
//! builds its own engine over the shared configuration.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::config::GameConfig;
use crate::engine::{GameEngine, Spinner};
use crate::error::{MathError, MathResult, check_bet};
use crate::free_spins::FreeSpinSession;
use crate::rng::{RandomSource, SeededSource};
use crate::stats::{BatchSummary, SimulationResult, StatsAccumulator};

/// Batch progress is logged every this many finished runs
const PROGRESS_INTERVAL: usize = 10;

/// Run `spin_count` base spins on one spinner
pub fn run_spins<S: Spinner + ?Sized>(
    spinner: &mut S,
    spin_count: u64,
    bet: f64,
) -> MathResult<SimulationResult> {
    check_bet(bet)?;
    if spin_count == 0 {
        return Err(MathError::InvalidSpinCount);
    }

    let rules = spinner.free_spin_rules();
    let mut stats = StatsAccumulator::new(bet);

    for _ in 0..spin_count {
        let base = spinner.spin(bet, false, &[])?;
        let session = if base.triggered_free_spins {
            let awarded = base.free_spins_awarded.unwrap_or(rules.spins_awarded);
            Some(FreeSpinSession::new(awarded, rules).run(spinner, bet)?)
        } else {
            None
        };
        stats.record(&base, session.as_ref());
    }

    Ok(stats.finish())
}

/// Simulator over one validated configuration
#[derive(Debug, Clone)]
pub struct Simulator {
    config: Arc<GameConfig>,
    seed: Option<u64>,
}

impl Simulator {
    pub fn new(config: GameConfig) -> MathResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            seed: None,
        })
    }

    /// Make every run reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn engine<R: RandomSource>(&self, rng: R) -> MathResult<GameEngine<R>> {
        GameEngine::with_shared_config(Arc::clone(&self.config), rng)
    }

    /// Source for batch iteration `i`: stream `i` of the seed, or fresh entropy
    fn iteration_source(&self, iteration: usize) -> SeededSource {
        match self.seed {
            Some(seed) => SeededSource::with_stream(seed, iteration as u64),
            None => SeededSource::from_entropy(),
        }
    }

    /// One run of `spin_count` base spins
    pub fn simulate(&self, spin_count: u64, bet: f64) -> MathResult<SimulationResult> {
        self.simulate_with(SeededSource::from_seed_option(self.seed), spin_count, bet)
    }

    /// One run on a caller-supplied source
    pub fn simulate_with<R: RandomSource>(
        &self,
        rng: R,
        spin_count: u64,
        bet: f64,
    ) -> MathResult<SimulationResult> {
        check_bet(bet)?;
        if spin_count == 0 {
            return Err(MathError::InvalidSpinCount);
        }

        let mut engine = self.engine(rng)?;
        let result = run_spins(&mut engine, spin_count, bet)?;
        log::info!(
            "Simulated {} spins: RTP {:.2}% (target {:.2}%), {} free spin triggers",
            result.total_spins,
            result.rtp,
            self.config.target_rtp,
            result.free_spins_triggered
        );
        Ok(result)
    }

    fn check_batch(iterations: usize, spins_per_iteration: u64, bet: f64) -> MathResult<()> {
        check_bet(bet)?;
        if iterations == 0 {
            return Err(MathError::InvalidIterations);
        }
        if spins_per_iteration == 0 {
            return Err(MathError::InvalidSpinCount);
        }
        Ok(())
    }

    /// Independent runs in parallel
    ///
    /// With a seed, iteration `i` draws from ChaCha stream `i`, so the
    /// summary is identical to [`Simulator::run_sequential`].
    pub fn run_multiple_simulations(
        &self,
        iterations: usize,
        spins_per_iteration: u64,
        bet: f64,
    ) -> MathResult<BatchSummary> {
        Self::check_batch(iterations, spins_per_iteration, bet)?;
        log::info!(
            "Running {iterations} simulations of {spins_per_iteration} spins on {} threads",
            rayon::current_num_threads()
        );

        let done = AtomicUsize::new(0);
        let results = (0..iterations)
            .into_par_iter()
            .map(|i| -> MathResult<SimulationResult> {
                let mut engine = self.engine(self.iteration_source(i))?;
                let result = run_spins(&mut engine, spins_per_iteration, bet)?;

                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                if finished % PROGRESS_INTERVAL == 0 {
                    log::debug!("Completed {finished}/{iterations} simulations");
                }
                Ok(result)
            })
            .collect::<MathResult<Vec<_>>>()?;

        Ok(self.summarize(results))
    }

    /// Independent runs on the calling thread
    pub fn run_sequential(
        &self,
        iterations: usize,
        spins_per_iteration: u64,
        bet: f64,
    ) -> MathResult<BatchSummary> {
        Self::check_batch(iterations, spins_per_iteration, bet)?;

        let mut results = Vec::with_capacity(iterations);
        for i in 0..iterations {
            let mut engine = self.engine(self.iteration_source(i))?;
            results.push(run_spins(&mut engine, spins_per_iteration, bet)?);

            if (i + 1) % PROGRESS_INTERVAL == 0 {
                let avg = results.iter().map(|r| r.rtp).sum::<f64>() / results.len() as f64;
                log::debug!("Completed {}/{iterations} simulations, running RTP {avg:.2}%", i + 1);
            }
        }

        Ok(self.summarize(results))
    }

    fn summarize(&self, results: Vec<SimulationResult>) -> BatchSummary {
        let summary = BatchSummary::from_results(results, self.config.target_rtp);
        log::info!(
            "Batch complete: avg RTP {:.2}% (min {:.2}%, max {:.2}%, σ {:.2}), target {:.2}%",
            summary.avg_rtp,
            summary.min_rtp,
            summary.max_rtp,
            summary.rtp_std_dev,
            summary.target_rtp
        );
        summary
    }
}
