use std::path::PathBuf;

use aigopt::dot::GraphvizStyle;
use aigopt::{Aig, AigError, RewriteConfig, RewriteStrategy};
use clap::{Parser, ValueEnum};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Only rewrites which do not grow the circuit
    CostGated,
    /// All rewrites, the circuit may grow
    Unconditional,
}

impl From<Strategy> for RewriteStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::CostGated => RewriteStrategy::CostGated,
            Strategy::Unconditional => RewriteStrategy::Unconditional,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about = "Optimizes an And-Inverter Graph read from an ASCII AIGER file")]
struct Cli {
    /// Input file (aag)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Number of rewrite rounds
    #[arg(long, default_value_t = 3)]
    rounds: usize,

    /// Rewrite strategy
    #[arg(long, value_enum, default_value_t = Strategy::CostGated)]
    strategy: Strategy,

    /// Check by exhaustive simulation that the outputs did not change
    #[arg(long)]
    verify: bool,

    /// Write the optimized circuit (aag)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the optimized circuit as a Graphviz graph
    #[arg(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Log level on stderr
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

/// Compares the functions of both circuits, skipped if they are too large.
fn verify(before: &Aig, after: &Aig) -> Result<()> {
    let expected = match before.truth_tables() {
        Ok(tables) => tables,
        Err(AigError::TooManyInputs(n)) => {
            log::warn!(
                "{} inputs is too many for exhaustive simulation, skipping verification",
                n
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    if after.truth_tables()? != expected {
        bail!("the optimized circuit does not compute the same outputs");
    }
    log::info!("verification passed");
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Metrics go to stdout, everything else to stderr
    TermLogger::init(
        cli.log_level.into(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    log::info!("Loading circuit from {:?}", cli.input);
    let mut aig = Aig::from_file(&cli.input)
        .wrap_err_with(|| format!("cannot load {}", cli.input.display()))?;
    let original = cli.verify.then(|| aig.clone());
    println!("{}", aig.metrics());

    let config = RewriteConfig::default()
        .with_rounds(cli.rounds)
        .with_strategy(cli.strategy.into());
    aig.rewrite_with(&config)?;
    println!("{}", aig.metrics());

    if let Some(original) = original {
        verify(&original, &aig)?;
    }

    if let Some(path) = &cli.output {
        log::info!("Writing circuit to {:?}", path);
        std::fs::write(path, aig.to_ascii()?)?;
    }

    if let Some(path) = &cli.dot {
        log::info!("Writing DOT to {:?}", path);
        std::fs::write(path, aig.to_dot(GraphvizStyle::default())?)?;
    }

    Ok(())
}
