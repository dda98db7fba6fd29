//! Engine and free spin scenarios
//!
//! Outcomes are forced through scripted uniforms:
//! - each cell uniform sits in the middle of the wanted symbol's weight band
//! - drop trials use 0.99 (no drop) or 0.0 (drop, value drawn next)

use std::collections::VecDeque;

use approx::assert_relative_eq;
use olympus_math::{
    FreeSpinRules, FreeSpinSession, GameConfig, GameEngine, Grid, MathError, MathResult,
    MultiplierDrop, Position, ScriptedSource, SpinContext, SpinResult, Spinner, Symbol,
    play_round,
};

const NO_DROP: f64 = 0.99;
const DROP: f64 = 0.0;

/// Uniform that selects `symbol` from the context's weight table
fn symbol_u(config: &GameConfig, symbol: Symbol, context: SpinContext) -> f64 {
    let weights = config.weights(context);
    let total: f64 = weights.iter().sum();
    let mut before = 0.0;
    for (s, w) in config.symbols().into_iter().zip(weights) {
        if s == symbol {
            return (before + w / 2.0) / total;
        }
        before += w;
    }
    panic!("{symbol} not in config");
}

/// Uniform that selects `value` from the multiplier table
fn multiplier_u(config: &GameConfig, value: f64) -> f64 {
    let total: f64 = config.multiplier_weights.iter().map(|m| m.weight).sum();
    let mut before = 0.0;
    for m in &config.multiplier_weights {
        if m.value == value {
            return (before + m.weight / 2.0) / total;
        }
        before += m.weight;
    }
    panic!("multiplier {value} not in config");
}

/// Script for a grid filled in column-major order from `(symbol, count)` runs
fn grid_script(config: &GameConfig, runs: &[(Symbol, usize)], context: SpinContext) -> Vec<f64> {
    let script: Vec<f64> = runs
        .iter()
        .flat_map(|&(symbol, n)| std::iter::repeat_n(symbol_u(config, symbol, context), n))
        .collect();
    assert_eq!(script.len(), config.grid_size());
    script
}

fn twelve_crowns() -> [(Symbol, usize); 4] {
    [
        (Symbol::Crown, 12),
        (Symbol::BlueGem, 6),
        (Symbol::GreenGem, 6),
        (Symbol::RedGem, 6),
    ]
}

fn four_scatters() -> [(Symbol, usize); 5] {
    [
        (Symbol::Scatter, 4),
        (Symbol::BlueGem, 7),
        (Symbol::GreenGem, 7),
        (Symbol::RedGem, 7),
        (Symbol::PurpleGem, 5),
    ]
}

fn engine_with(script: Vec<f64>) -> GameEngine<ScriptedSource> {
    GameEngine::new(GameConfig::reference(), ScriptedSource::new(script)).unwrap()
}

#[test]
fn test_twelve_crowns_pay_45() {
    let config = GameConfig::reference();
    let mut script = grid_script(&config, &twelve_crowns(), SpinContext::BaseGame);
    script.extend(std::iter::repeat_n(NO_DROP, 30));

    let mut engine = engine_with(script);
    let result = engine.spin(1.0, false, &[]).unwrap();

    assert_eq!(result.wins.len(), 1);
    let win = &result.wins[0];
    assert_eq!(win.symbol, Symbol::Crown);
    assert_eq!(win.count, 12);
    assert_relative_eq!(win.payout, 45.0);
    assert_eq!(win.positions, (0..12).collect::<Vec<_>>());
    assert!(result.multipliers.is_empty());
    assert_relative_eq!(result.total_multiplier, 1.0);
    assert_relative_eq!(result.total_win, 45.0);
    assert!(!result.triggered_free_spins);
    assert_eq!(engine.rng_mut().draws(), 60);
}

#[test]
fn test_four_scatters_trigger_free_spins() {
    let config = GameConfig::reference();
    let mut script = grid_script(&config, &four_scatters(), SpinContext::BaseGame);
    script.extend(std::iter::repeat_n(NO_DROP, 30));

    let result = engine_with(script).spin(2.0, false, &[]).unwrap();

    assert_eq!(result.scatter_count, 4);
    assert_relative_eq!(result.scatter_payout, 2.0);
    assert!(result.triggered_free_spins);
    assert_eq!(result.free_spins_awarded, Some(15));
    assert!(result.wins.is_empty());
    assert_relative_eq!(result.total_win, 4.0);
}

#[test]
fn test_base_game_drop_multiplies_win() {
    let config = GameConfig::reference();
    let mut script = grid_script(&config, &twelve_crowns(), SpinContext::BaseGame);
    // Drop on cell (row 0, col 0) with value 5, nothing elsewhere
    script.push(DROP);
    script.push(multiplier_u(&config, 5.0));
    script.extend(std::iter::repeat_n(NO_DROP, 29));

    let result = engine_with(script).spin(1.0, false, &[]).unwrap();

    assert_eq!(
        result.multipliers,
        vec![MultiplierDrop {
            position: Position::new(0, 0),
            value: 5.0
        }]
    );
    // The drop adds to the base multiplier of 1
    assert_relative_eq!(result.total_multiplier, 6.0);
    assert_relative_eq!(result.total_win, 270.0);
}

#[test]
fn test_free_spin_adds_active_and_new_multipliers() {
    let config = GameConfig::reference();
    let mut script = grid_script(&config, &twelve_crowns(), SpinContext::FreeSpins);
    script.extend(std::iter::repeat_n(NO_DROP, 29));
    // Last cell (row 5, col 4) drops a 10
    script.push(DROP);
    script.push(multiplier_u(&config, 10.0));

    let result = engine_with(script).spin(1.0, true, &[3.0, 2.0]).unwrap();

    assert!(result.is_free_spin);
    assert_eq!(result.multipliers[0].position, Position::new(5, 4));
    assert_relative_eq!(result.total_multiplier, 15.0);
    assert_relative_eq!(result.total_win, 45.0 * 15.0);
}

#[test]
fn test_free_spin_without_carry_starts_from_one() {
    let config = GameConfig::reference();
    let mut script = grid_script(&config, &twelve_crowns(), SpinContext::FreeSpins);
    script.push(DROP);
    script.push(multiplier_u(&config, 2.0));
    script.extend(std::iter::repeat_n(NO_DROP, 29));

    let result = engine_with(script).spin(1.0, true, &[]).unwrap();

    assert_relative_eq!(result.total_multiplier, 3.0);
    assert_relative_eq!(result.total_win, 135.0);
}

#[test]
fn test_carried_multipliers_replace_base_of_one() {
    let config = GameConfig::reference();
    let mut script = grid_script(&config, &twelve_crowns(), SpinContext::FreeSpins);
    script.extend(std::iter::repeat_n(NO_DROP, 30));

    let result = engine_with(script).spin(1.0, true, &[4.0]).unwrap();

    assert!(result.multipliers.is_empty());
    assert_relative_eq!(result.total_multiplier, 4.0);
    assert_relative_eq!(result.total_win, 180.0);
}

#[test]
fn test_identical_sources_give_identical_results() {
    let config = GameConfig::reference();
    let mut script = grid_script(&config, &four_scatters(), SpinContext::FreeSpins);
    script.extend([DROP, 0.4, NO_DROP, DROP, 0.95]);

    let mut a = engine_with(script.clone());
    let mut b = engine_with(script);
    for _ in 0..5 {
        assert_eq!(
            a.spin(1.0, true, &[2.0]).unwrap(),
            b.spin(1.0, true, &[2.0]).unwrap()
        );
    }
}

#[test]
fn test_wins_need_eight_of_a_kind() {
    let config = GameConfig::reference();
    let engine = engine_with(vec![0.5]);
    let seven_each = [
        (Symbol::Crown, 7),
        (Symbol::Cup, 7),
        (Symbol::Sword, 7),
        (Symbol::Ring, 7),
        (Symbol::Hourglass, 2),
    ];
    let columns: Vec<Vec<Symbol>> = seven_each
        .iter()
        .flat_map(|&(s, n)| std::iter::repeat_n(s, n))
        .collect::<Vec<_>>()
        .chunks(config.rows)
        .map(<[Symbol]>::to_vec)
        .collect();
    let grid = Grid::from_columns(columns).unwrap();

    assert!(engine.calculate_wins(&grid).is_empty());
}

#[test]
fn test_scatter_payout_table_bounds() {
    let engine = engine_with(vec![0.5]);
    let table = [0.0, 0.0, 0.0, 0.0, 2.0, 3.0, 10.0, 20.0, 50.0, 100.0, 250.0, 500.0, 1000.0];
    for (count, &expected) in table.iter().enumerate() {
        assert_relative_eq!(engine.scatter_payout(count), expected);
    }
    assert_relative_eq!(engine.scatter_payout(13), 0.0);
    assert_relative_eq!(engine.scatter_payout(30), 0.0);
}

#[test]
fn test_all_zero_weights_rejected() {
    let mut config = GameConfig::reference();
    for entry in &mut config.symbol_weights {
        entry.base_game = 0.0;
        entry.free_spins = 0.0;
    }
    let err = GameEngine::new(config, ScriptedSource::constant(0.5)).err();
    assert!(matches!(err, Some(MathError::Config(_))));
}

// ═══════════════════════════════════════════════════════════════════════════
// SCRIPTED SPINNER
// ═══════════════════════════════════════════════════════════════════════════

/// Plays back prepared outcomes and records the multipliers it was handed
struct ScriptedSpinner {
    outcomes: VecDeque<SpinResult>,
    seen_active: Vec<Vec<f64>>,
}

impl ScriptedSpinner {
    fn new(outcomes: Vec<SpinResult>) -> Self {
        Self {
            outcomes: outcomes.into(),
            seen_active: Vec::new(),
        }
    }
}

impl Spinner for ScriptedSpinner {
    fn spin(&mut self, _bet: f64, is_free_spins: bool, active: &[f64]) -> MathResult<SpinResult> {
        self.seen_active.push(active.to_vec());
        let mut result = self
            .outcomes
            .pop_front()
            .unwrap_or_else(|| outcome(false, &[], 0.0));
        result.is_free_spin = is_free_spins;
        Ok(result)
    }

    fn free_spin_rules(&self) -> FreeSpinRules {
        FreeSpinRules::default()
    }
}

fn outcome(triggered: bool, drops: &[f64], total_win: f64) -> SpinResult {
    SpinResult {
        grid: Grid::from_columns(vec![vec![Symbol::BlueGem; 6]; 5]).unwrap(),
        wins: Vec::new(),
        multipliers: drops
            .iter()
            .enumerate()
            .map(|(i, &value)| MultiplierDrop {
                position: Position::new(i % 6, i / 6),
                value,
            })
            .collect(),
        total_multiplier: 1.0,
        total_win,
        scatter_count: if triggered { 4 } else { 0 },
        scatter_payout: if triggered { 2.0 } else { 0.0 },
        triggered_free_spins: triggered,
        free_spins_awarded: triggered.then_some(15),
        is_free_spin: false,
    }
}

#[test]
fn test_retrigger_adds_five_spins() {
    let mut spinner = ScriptedSpinner::new(vec![
        outcome(false, &[], 1.0),
        outcome(true, &[], 2.0),
        outcome(false, &[], 0.0),
    ]);
    let mut session = FreeSpinSession::new(3, FreeSpinRules::default());

    let first = session.play_spin(&mut spinner, 1.0).unwrap().unwrap();
    assert_eq!(first.spins_remaining, 2);
    assert!(!first.retriggered);

    let second = session.play_spin(&mut spinner, 1.0).unwrap().unwrap();
    assert!(second.retriggered);
    assert_eq!(second.spins_remaining, 2 - 1 + 5);

    let outcome = session.run(&mut spinner, 1.0).unwrap();
    assert_eq!(outcome.spins_played, 8);
    assert_eq!(outcome.spins_awarded, 8);
    assert_eq!(outcome.retriggers, 1);
    assert_relative_eq!(outcome.total_win, 3.0);
    assert_relative_eq!(outcome.biggest_win, 2.0);
}

#[test]
fn test_active_multipliers_accumulate() {
    let mut spinner = ScriptedSpinner::new(vec![
        outcome(false, &[2.0], 0.0),
        outcome(false, &[], 0.0),
        outcome(false, &[5.0, 3.0], 0.0),
        outcome(false, &[10.0], 0.0),
    ]);
    FreeSpinSession::new(5, FreeSpinRules::default())
        .run(&mut spinner, 1.0)
        .unwrap();

    assert_eq!(
        spinner.seen_active,
        vec![
            vec![],
            vec![2.0],
            vec![2.0],
            vec![2.0, 5.0, 3.0],
            vec![2.0, 5.0, 3.0, 10.0],
        ]
    );
}

#[test]
fn test_multipliers_reset_when_not_persistent() {
    let rules = FreeSpinRules {
        multipliers_persist: false,
        ..FreeSpinRules::default()
    };
    let mut spinner = ScriptedSpinner::new(vec![outcome(false, &[2.0], 0.0)]);
    FreeSpinSession::new(2, rules).run(&mut spinner, 1.0).unwrap();
    assert!(spinner.seen_active.iter().all(Vec::is_empty));
}

#[test]
fn test_round_records_whole_session() {
    let mut outcomes = vec![outcome(true, &[], 2.0)];
    outcomes.extend((0..15).map(|i| outcome(i == 3, &[], 1.0)));
    let mut spinner = ScriptedSpinner::new(outcomes);

    let round = play_round(&mut spinner, 1.0).unwrap();
    let record = round.free_spins.as_ref().unwrap();

    assert!(!spinner.seen_active.is_empty());
    assert_eq!(record.spins.len(), 20);
    assert_eq!(record.spins_awarded, 20);
    assert_eq!(record.retriggers, 1);
    assert!(record.spins[3].retriggered);
    assert_eq!(record.spins.last().unwrap().spins_remaining, 0);
    assert!(record.spins.iter().all(|s| s.result.is_free_spin));
    // 15 scripted wins of 1.0, then 5 empty spins
    assert_relative_eq!(record.total_win, 15.0);
    assert_relative_eq!(round.total_win, 17.0);
    assert_relative_eq!(round.biggest_spin_win(), 2.0);
}

#[test]
fn test_round_without_trigger_has_no_session() {
    let mut spinner = ScriptedSpinner::new(vec![outcome(false, &[], 0.5)]);
    let round = play_round(&mut spinner, 1.0).unwrap();
    assert!(round.free_spins.is_none());
    assert_relative_eq!(round.total_win, 0.5);
    assert_eq!(spinner.seen_active.len(), 1);
}

#[test]
fn test_simulator_rejects_bad_arguments_before_drawing() {
    let mut engine = engine_with(vec![0.5]);
    assert_eq!(
        olympus_math::run_spins(&mut engine, 10, -1.0),
        Err(MathError::InvalidBet(-1.0))
    );
    assert_eq!(
        olympus_math::run_spins(&mut engine, 0, 1.0),
        Err(MathError::InvalidSpinCount)
    );
    assert_eq!(engine.rng_mut().draws(), 0);
}
