//! Olympus slot math CLI
//!
//! Usage:
//!   olympus simulate --spins 1000000      - One run with a full report
//!   olympus batch --iterations 10         - Parallel runs, RTP spread
//!   olympus spin --seed 7                 - Play one round, print its book
//!   olympus books --simulations 10000     - Write a Stake Engine library
//!   olympus config --format yaml          - Dump the active configuration

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use olympus_math::{
    DEFAULT_TOP_BUCKETS, GameConfig, GameEngine, SeededSource, Simulator, batch_report, play_round,
    simulation_report,
};
use olympus_stage::{BetMode, EventTiming, LibraryWriter, Sequencer, book_events, create_books};

#[derive(Parser, Debug)]
#[command(name = "olympus", version, about = "Scatter-pays slot math simulator")]
struct Cli {
    /// Game configuration (.yaml, .yml or .json); reference game if omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one simulation and print its report
    Simulate {
        #[arg(short, long, default_value_t = 1_000_000)]
        spins: u64,
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        /// Fixed seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Histogram rows to show
        #[arg(long, default_value_t = DEFAULT_TOP_BUCKETS)]
        top: usize,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run independent simulations and report the RTP spread
    Batch {
        #[arg(short, long, default_value_t = 10)]
        iterations: usize,
        #[arg(short, long, default_value_t = 100_000)]
        spins: u64,
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        #[arg(long)]
        seed: Option<u64>,
        /// Run on the current thread only
        #[arg(long)]
        sequential: bool,
        #[arg(long)]
        json: bool,
    },
    /// Play one round and print its event book with playback offsets
    Spin {
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        #[arg(long)]
        seed: Option<u64>,
        /// Keep spinning until a round enters free spins
        #[arg(long)]
        until_free_spins: bool,
        /// Print the round and book as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play rounds and write a Stake Engine library directory
    Books {
        #[arg(short = 'n', long, default_value_t = 100)]
        simulations: u64,
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        #[arg(long)]
        seed: Option<u64>,
        /// Bet mode name used in file names and book criteria
        #[arg(long, default_value = "base")]
        mode: String,
        /// Library directory
        #[arg(short, long, default_value = "library")]
        output: PathBuf,
    },
    /// Print the active configuration
    Config {
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

/// Rounds tried by `spin --until-free-spins` before giving up
const MAX_ROUNDS_FOR_TRIGGER: usize = 1_000_000;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    log::debug!("Using configuration '{}'", config.name);

    match cli.command {
        Commands::Simulate {
            spins,
            bet,
            seed,
            top,
            json,
        } => simulate(config, spins, bet, seed, top, json),
        Commands::Batch {
            iterations,
            spins,
            bet,
            seed,
            sequential,
            json,
        } => batch(config, iterations, spins, bet, seed, sequential, json),
        Commands::Spin {
            bet,
            seed,
            until_free_spins,
            json,
        } => spin(config, bet, seed, until_free_spins, json),
        Commands::Books {
            simulations,
            bet,
            seed,
            mode,
            output,
        } => books(config, simulations, bet, seed, mode, &output),
        Commands::Config { format } => print_config(&config, format),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::reference());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let config = match ext.as_deref() {
        Some("yaml" | "yml") => GameConfig::from_yaml_str(&text),
        Some("json") => GameConfig::from_json_str(&text),
        _ => bail!("Unsupported config extension: {}", path.display()),
    }
    .with_context(|| format!("Invalid config {}", path.display()))?;

    log::info!("Loaded config '{}' from {}", config.name, path.display());
    Ok(config)
}

fn simulator(config: GameConfig, seed: Option<u64>) -> Result<Simulator> {
    let sim = Simulator::new(config).context("Configuration rejected")?;
    Ok(match seed {
        Some(seed) => sim.with_seed(seed),
        None => sim,
    })
}

fn simulate(
    config: GameConfig,
    spins: u64,
    bet: f64,
    seed: Option<u64>,
    top: usize,
    json: bool,
) -> Result<()> {
    let target = config.target_rtp;
    let sim = simulator(config, seed)?;
    let result = sim.simulate(spins, bet).context("Simulation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", simulation_report(&result, target, top));
    }
    Ok(())
}

fn batch(
    config: GameConfig,
    iterations: usize,
    spins: u64,
    bet: f64,
    seed: Option<u64>,
    sequential: bool,
    json: bool,
) -> Result<()> {
    let sim = simulator(config, seed)?;
    let summary = if sequential {
        sim.run_sequential(iterations, spins, bet)
    } else {
        sim.run_multiple_simulations(iterations, spins, bet)
    }
    .context("Batch simulation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", batch_report(&summary));
    }
    Ok(())
}

fn spin(config: GameConfig, bet: f64, seed: Option<u64>, until_free_spins: bool, json: bool) -> Result<()> {
    let mut engine = GameEngine::new(config, SeededSource::from_seed_option(seed))
        .context("Configuration rejected")?;

    let mut round = play_round(&mut engine, bet)?;
    let mut played = 1;
    while until_free_spins && round.free_spins.is_none() {
        if played >= MAX_ROUNDS_FOR_TRIGGER {
            bail!("No free spin trigger in {played} rounds");
        }
        round = play_round(&mut engine, bet)?;
        played += 1;
    }
    if played > 1 {
        log::info!("Free spins triggered after {played} rounds");
    }

    let book = book_events(&round);
    let schedule = Sequencer::new(EventTiming::normal()).schedule(&book);

    if json {
        let out = serde_json::json!({ "round": round, "book": book, "schedule": schedule });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "Round: bet {:.2}, win {:.2} ({:.2}x), {} free spins",
        round.bet,
        round.total_win,
        round.win_ratio(),
        round.free_spins_played()
    );
    for event in &schedule.events {
        println!(
            "{:>7} ms  {:<16} {}",
            event.start_ms,
            event.event.type_name(),
            serde_json::to_string(&event.event)?
        );
    }
    println!("Playback: {} ms", schedule.total_duration_ms);
    Ok(())
}

fn books(
    config: GameConfig,
    simulations: u64,
    bet: f64,
    seed: Option<u64>,
    mode: String,
    output: &Path,
) -> Result<()> {
    if simulations == 0 {
        bail!("At least one simulation is required");
    }
    let target = config.target_rtp;
    let mode = BetMode::new(mode, 1.0);
    let mut engine = GameEngine::new(config, SeededSource::from_seed_option(seed))
        .context("Configuration rejected")?;

    let (books, summary) = create_books(&mut engine, simulations, bet, &mode)
        .with_context(|| format!("Failed to simulate mode '{}'", mode.name))?;
    log::info!(
        "{}: {} simulations, RTP {:.2}% (target {target:.2}%, difference {:+.2}%)",
        mode.name,
        summary.simulations,
        summary.rtp,
        summary.rtp - target
    );

    let writer = LibraryWriter::open(output)
        .with_context(|| format!("Failed to create library {}", output.display()))?;
    let modes = [mode];
    writer.save_books(&books, &modes[0])?;
    writer.save_lookup_table(&books, &modes[0])?;
    writer.write_index(&modes)?;
    writer.write_configs(engine.config(), &modes)?;

    println!(
        "Wrote {} books for '{}' to {} (RTP {:.2}%)",
        books.len(),
        modes[0].name,
        writer.root().display(),
        summary.rtp
    );
    Ok(())
}

fn print_config(config: &GameConfig, format: Format) -> Result<()> {
    let text = match format {
        Format::Yaml => serde_yml::to_string(config)?,
        Format::Json => serde_json::to_string_pretty(config)?,
    };
    println!("{text}");
    Ok(())
}
