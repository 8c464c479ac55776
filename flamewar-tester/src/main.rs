mod reports;
mod stats;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use flamewar_game::constants::{
    DEFAULT_BATCH_RUNS, DEFAULT_BATCH_SEED, DEFAULT_HAND_SIZE, DEFAULT_INTERRUPT_CHANCE,
    DEFAULT_NUM_GOALS, DEFAULT_NUM_PLAYERS,
};
use flamewar_game::{BatchConfig, BatchReport, CardCatalog, GameConfig, run_batch};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use stats::summarize_report;

#[derive(Debug, Parser)]
#[command(name = "flamewar-tester", version = "0.1.0")]
#[command(about = "Balance testing for the Flamewar card game - seeded batch simulation")]
struct Args {
    /// Number of games to simulate
    #[arg(long, default_value_t = DEFAULT_BATCH_RUNS)]
    runs: usize,

    /// Batch seed; every run derives its own seed from it
    #[arg(long, default_value_t = DEFAULT_BATCH_SEED)]
    seed: u64,

    /// Players at the table
    #[arg(long, default_value_t = DEFAULT_NUM_PLAYERS)]
    players: usize,

    /// Goals face-up at once
    #[arg(long, default_value_t = DEFAULT_NUM_GOALS)]
    goals: usize,

    /// Cards dealt to each player
    #[arg(long, default_value_t = DEFAULT_HAND_SIZE)]
    hand_size: usize,

    /// Chance per round that someone plays an interrupt
    #[arg(long, default_value_t = DEFAULT_INTERRUPT_CHANCE)]
    interrupt_chance: f64,

    /// Card catalog JSON to use instead of the bundled deck
    #[arg(long)]
    cards: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Histogram buckets per metric (console report)
    #[arg(long, default_value_t = 10)]
    bins: usize,

    /// Print one line per simulated game
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            num_goals: self.goals,
            num_players: self.players,
            hand_size: self.hand_size,
            interrupt_chance: self.interrupt_chance,
        }
    }

    const fn batch_config(&self) -> BatchConfig {
        BatchConfig::new(self.runs, self.seed)
    }

    /// Banner and progress lines would corrupt machine-readable output on stdout.
    fn chatty(&self) -> bool {
        self.output.is_some() || self.report == "console" || self.report == "markdown"
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.chatty() {
        announce_banner();
    }

    let catalog = load_catalog(&args)?;
    log::info!(
        "simulating {} games from seed {} with {} players",
        args.runs,
        args.seed,
        args.players
    );
    let start_time = Instant::now();
    let report = run_batch(&catalog, &args.game_config(), &args.batch_config())
        .context("invalid game configuration")?;
    let elapsed = start_time.elapsed();

    if args.verbose && args.chatty() {
        print_runs(&report);
    }

    write_reports(&args, &report, elapsed)
}

fn announce_banner() {
    println!("{}", "🔥 Flamewar Balance Tester".bright_cyan().bold());
    println!("{}", "==========================".cyan());
}

fn load_catalog(args: &Args) -> Result<CardCatalog> {
    let Some(path) = &args.cards else {
        return CardCatalog::load_default().context("bundled card catalog is invalid");
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    CardCatalog::from_json(&json).with_context(|| format!("failed to load {}", path.display()))
}

fn print_runs(report: &BatchReport) {
    println!("{}", "🎲 Runs".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());
    for run in &report.runs {
        println!("   {}", reports::describe_run(run));
    }
}

fn write_reports(args: &Args, report: &BatchReport, duration: Duration) -> Result<()> {
    let mut out = open_report_sink(args.output.as_deref())?;
    let summaries = summarize_report(report);

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut out, report, &summaries)?,
        "markdown" => reports::generate_markdown_report(&mut out, report, &summaries)?,
        "csv" => reports::generate_csv_report(&mut out, report)?,
        _ => {
            reports::generate_console_report(
                &mut out,
                report,
                &summaries,
                args.bins,
                duration,
            )?;
            writeln!(&mut out)?;
            writeln!(&mut out, "🏁 Total time: {duration:?}")?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Buffered writer over the `--output` file, or stdout when none is given.
fn open_report_sink(path: Option<&Path>) -> Result<BufWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(stdout()),
    };
    Ok(BufWriter::new(sink))
}
