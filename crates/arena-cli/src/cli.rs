use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use match_logic::{
    from_entropy, run_match, run_tournament, run_tournament_parallel, seeded, Mode, Strategy,
};
use rand::Rng;

use crate::config::TournamentConfig;
use crate::display::{match_table, results_table, standings_table, strategies_table};
use crate::plot::save_plots;

#[derive(Parser)]
#[command(
    name = "arena",
    version,
    about = "Iterated Prisoner's Dilemma tournaments between a fixed catalog of strategies."
)]
pub struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Also log per-match totals and the seed in use
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Cumulative,
    Trajectory,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Cumulative => Mode::Cumulative,
            ModeArg::Trajectory => Mode::Trajectory,
        }
    }
}

/// Settings shared by `tournament` and `play`; flags override the config file
#[derive(Args)]
struct RunArgs {
    /// JSON config file (iterations, mode, seed, strategies, payoffs, params)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Rounds per match
    #[arg(short, long)]
    iterations: Option<usize>,
    /// Keep only totals, or every round's score as well
    #[arg(short, long)]
    mode: Option<ModeArg>,
    /// Seed for reproducible runs of the random strategies
    #[arg(short, long)]
    seed: Option<u64>,
    /// Write per-round score plots to this PNG (implies trajectory mode)
    #[arg(short, long)]
    plot: Option<PathBuf>,
    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play every unordered pair of strategies once
    Tournament {
        #[command(flatten)]
        run: RunArgs,
        /// Comma-separated strategies, in table order (default: full catalog)
        #[arg(long, value_delimiter = ',')]
        strategies: Option<Vec<Strategy>>,
        /// Run matches on all cores, each with its own seeded stream
        #[arg(long)]
        parallel: bool,
        /// Also print per-strategy totals
        #[arg(long)]
        standings: bool,
    },
    /// Play a single match
    Play {
        /// Player 1 strategy
        a: Strategy,
        /// Player 2 strategy
        b: Strategy,
        #[command(flatten)]
        run: RunArgs,
    },
    /// List the strategy catalog
    Strategies {
        /// JSON config file whose parameters the descriptions should use
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl RunArgs {
    /// Config file merged with command line overrides, validated
    fn resolve(&self) -> Result<TournamentConfig> {
        let mut config = TournamentConfig::load(self.config.as_deref())?;
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.plot.is_some() {
            config.mode = Mode::Trajectory;
        }
        Ok(config)
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.level());
    dispatch(cli)
}

impl Cli {
    fn level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Warn
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

/// Diagnostics go to stderr through `log`; results go to stdout.
/// `RUST_LOG` takes precedence over the command line level.
fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .format_level(false)
        .init();
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Tournament { run, strategies, parallel, standings } => {
            cmd_tournament(run, strategies, parallel, standings)
        }
        Commands::Play { a, b, run } => cmd_play(a, b, run),
        Commands::Strategies { config } => cmd_strategies(config),
    }
}

fn resolve_seed(config: &TournamentConfig) -> u64 {
    let seed = config.seed.unwrap_or_else(|| from_entropy().gen());
    log::debug!("Using seed {}", seed);
    seed
}

fn cmd_tournament(
    run: RunArgs,
    strategies: Option<Vec<Strategy>>,
    parallel: bool,
    standings: bool,
) -> Result<()> {
    let mut config = run.resolve()?;
    if let Some(strategies) = strategies {
        config.strategies = strategies;
    }
    config.validate()?;

    let rules = config.rules();
    let seed = resolve_seed(&config);
    let (iterations, catalog, mode) = (config.iterations, &config.strategies, config.mode);
    let matrix = if parallel {
        run_tournament_parallel(&rules, iterations, catalog, mode, seed)
    } else {
        run_tournament(&rules, iterations, catalog, mode, &mut seeded(seed))
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if run.json {
        serde_json::to_writer_pretty(&mut out, &matrix).context("failed to write results")?;
        writeln!(out).context("failed to write results")?;
    } else {
        writeln!(out, "{}", results_table(&matrix)).context("failed to write results")?;
        if standings {
            writeln!(out).context("failed to write results")?;
            writeln!(out, "{}", standings_table(&matrix.standings()))
                .context("failed to write results")?;
        }
    }

    if let Some(path) = &run.plot {
        save_plots(&matrix, path)?;
    }
    Ok(())
}

fn cmd_play(a: Strategy, b: Strategy, run: RunArgs) -> Result<()> {
    let config = run.resolve()?;
    config.rules().validate().context("invalid game rules")?;

    let seed = resolve_seed(&config);
    log::info!("Running game {} vs. {}...", a, b);
    let mut rng = seeded(seed);
    let result = run_match(&config.rules(), config.iterations, a, b, config.mode, &mut rng);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if run.json {
        serde_json::to_writer_pretty(&mut out, &result).context("failed to write result")?;
        writeln!(out).context("failed to write result")?;
    } else {
        writeln!(out, "{}", match_table(&result)).context("failed to write result")?;
    }

    if let Some(path) = &run.plot {
        crate::plot::render(&[&result])?
            .save(path)
            .with_context(|| format!("failed to write plot to {}", path.display()))?;
    }
    Ok(())
}

fn cmd_strategies(config: Option<PathBuf>) -> Result<()> {
    let config = TournamentConfig::load(config.as_deref())?;
    config.params.validate().context("invalid strategy parameters")?;
    let mut out = io::stdout().lock();
    writeln!(out, "{}", strategies_table(&config.params)).context("failed to write catalog")?;
    Ok(())
}
