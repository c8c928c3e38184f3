//! servfaz CLI - run calculations and maintain the rate cache

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use servfaz_core::{Block, CellValue, ScanConfig, SheetGrid};
use servfaz_engine::{run_calculation, CalculationInput, InMemoryEngine};
use servfaz_selic::{parse_flex_date, Corrector, MonthKey, RateLookup, SelicLookup};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "servfaz")]
#[command(
    author,
    version,
    about = "Spreadsheet-driven legal calculation: parse result blocks and apply SELIC correction"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline against a grid snapshot
    Run {
        /// Grid snapshot JSON (flat map of A1-style address to cell spec)
        #[arg(long)]
        grid: PathBuf,

        /// Calculation input JSON (original field names)
        #[arg(long)]
        input: PathBuf,

        /// Rate cache file
        #[arg(long, default_value = "data/selic_cache.json")]
        cache: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply the SELIC correction to previously saved base blocks
    Correct {
        /// JSON array of base blocks
        #[arg(long)]
        blocks: PathBuf,

        /// Target date (DD/MM/YYYY)
        #[arg(long)]
        until: String,

        /// Rate cache file
        #[arg(long, default_value = "data/selic_cache.json")]
        cache: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Guarantee the rate cache covers the month of a date
    Rates {
        /// Date inside the month to ensure (DD/MM/YYYY)
        date: String,

        /// Rate cache file
        #[arg(long, default_value = "data/selic_cache.json")]
        cache: PathBuf,
    },
}

/// One cell of a grid snapshot file
#[derive(serde::Deserialize)]
struct CellSpec {
    value: serde_json::Value,
    #[serde(default)]
    format: Option<String>,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            grid,
            input,
            cache,
            output,
        } => run(&grid, &input, &cache, output.as_deref()),
        Commands::Correct {
            blocks,
            until,
            cache,
            output,
        } => correct(&blocks, &until, &cache, output.as_deref()),
        Commands::Rates { date, cache } => rates(&date, &cache),
    }
}

fn run(grid: &Path, input: &Path, cache: &Path, output: Option<&Path>) -> Result<()> {
    let grid = load_grid(grid)?;
    let input: CalculationInput = serde_json::from_str(
        &fs::read_to_string(input)
            .with_context(|| format!("Failed to read input '{}'", input.display()))?,
    )
    .context("Failed to parse calculation input")?;

    // A snapshot already holds computed values, so the engine's recompute
    // is a no-op here.
    let mut session = InMemoryEngine::new(grid);
    let mut lookup = SelicLookup::open(cache);

    let outcome = run_calculation(
        &mut session,
        &input,
        &ScanConfig::resumo(),
        &Corrector::default(),
        &mut lookup,
    )?;

    if outcome.neutral_months > 0 {
        eprintln!(
            "warning: {} month(s) had no resolvable rate; corrected values may be understated",
            outcome.neutral_months
        );
    }

    emit(&serde_json::to_string_pretty(&outcome)?, output)
}

fn correct(blocks: &Path, until: &str, cache: &Path, output: Option<&Path>) -> Result<()> {
    let blocks: Vec<Block> = serde_json::from_str(
        &fs::read_to_string(blocks)
            .with_context(|| format!("Failed to read blocks '{}'", blocks.display()))?,
    )
    .context("Failed to parse base blocks")?;

    let corrector = Corrector::default();
    if !corrector.needs_correction(until) {
        eprintln!("target date is not past the baseline; nothing to correct");
        return emit(&serde_json::to_string_pretty(&blocks)?, output);
    }

    let mut lookup = SelicLookup::open(cache);
    let correction = corrector.correct(&blocks, until, &mut lookup)?;

    if correction.neutral_months > 0 {
        eprintln!(
            "warning: {} of {} month(s) fell back to a neutral factor",
            correction.neutral_months,
            correction.window.len()
        );
    }

    emit(&serde_json::to_string_pretty(&correction.blocks)?, output)
}

fn rates(date: &str, cache: &Path) -> Result<()> {
    let month = MonthKey::from_date(parse_flex_date(date)?);
    let mut lookup = SelicLookup::open(cache);

    match lookup.ensure(date)? {
        Some(rate) => println!("{}: {}%", month, rate),
        None => println!("{}: not published yet", month),
    }
    Ok(())
}

/// Load a grid snapshot: a flat JSON object mapping A1-style addresses to
/// `{ "value": ..., "format": "0.00%" }` specs.
fn load_grid(path: &Path) -> Result<SheetGrid> {
    let snapshot: BTreeMap<String, CellSpec> = serde_json::from_str(
        &fs::read_to_string(path)
            .with_context(|| format!("Failed to read grid '{}'", path.display()))?,
    )
    .context("Failed to parse grid snapshot")?;

    let mut grid = SheetGrid::new();
    for (addr, spec) in snapshot {
        let value = match spec.value {
            serde_json::Value::Null => CellValue::Empty,
            serde_json::Value::Number(n) => CellValue::Number(
                n.as_f64()
                    .with_context(|| format!("non-finite number at {}", addr))?,
            ),
            serde_json::Value::String(s) => CellValue::Text(s),
            other => anyhow::bail!("unsupported cell value at {}: {}", addr, other),
        };
        grid.set(&addr, value)
            .with_context(|| format!("bad cell address '{}'", addr))?;
        if let Some(format) = spec.format {
            grid.set_format(&addr, &format)?;
        }
    }

    Ok(grid)
}

fn emit(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("Failed to write '{}'", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
