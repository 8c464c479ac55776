//! Batch harness: play many seeded games and collect balance metrics.

use serde::{Deserialize, Serialize};

use crate::catalog::CardCatalog;
use crate::constants::{DEFAULT_BATCH_RUNS, DEFAULT_BATCH_SEED, FLAME_WAR_POINTS};
use crate::error::{Exhaustion, GameConfigError, GameSetupError};
use crate::game::{Game, GameConfig, GameStats};

/// How many games to play and which seed family to draw them from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default = "BatchConfig::default_runs")]
    pub runs: usize,
    #[serde(default = "BatchConfig::default_seed")]
    pub seed: u64,
}

impl BatchConfig {
    const fn default_runs() -> usize {
        DEFAULT_BATCH_RUNS
    }

    const fn default_seed() -> u64 {
        DEFAULT_BATCH_SEED
    }

    #[must_use]
    pub const fn new(runs: usize, seed: u64) -> Self {
        Self { runs, seed }
    }

    /// Seed for run `index`. Independent of how many runs the batch has.
    #[must_use]
    pub fn run_seed(&self, index: usize) -> u64 {
        crate::rng::derive_stream_seed(self.seed, format!("run-{index}").as_bytes())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new(Self::default_runs(), Self::default_seed())
    }
}

/// Count of games ended by each pile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhaustionTally {
    pub email: u32,
    pub attention: u32,
    pub goal: u32,
}

impl ExhaustionTally {
    pub const fn record(&mut self, kind: Exhaustion) {
        match kind {
            Exhaustion::Email => self.email += 1,
            Exhaustion::Attention => self.attention += 1,
            Exhaustion::Goal => self.goal += 1,
        }
    }

    #[must_use]
    pub const fn get(&self, kind: Exhaustion) -> u32 {
        match kind {
            Exhaustion::Email => self.email,
            Exhaustion::Attention => self.attention,
            Exhaustion::Goal => self.goal,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.email + self.attention + self.goal
    }
}

/// Metrics of one finished game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub run: usize,
    pub seed: u64,
    pub exhaustion: Exhaustion,
    pub scores: Vec<u32>,
    pub max_score: u32,
    pub won_goals: u32,
    /// Goals in the goal discard.
    pub burned_goals: u32,
    /// Won goals worth exactly the flame-war payout.
    pub won_flamewars: u32,
    /// Goals still on the table worth exactly the flame-war payout.
    pub lost_flamewars: u32,
    pub rounds: u32,
    pub email_pile_remaining: u32,
    pub stats: GameStats,
}

impl RunMetrics {
    /// Read metrics off a game that has been played to termination.
    #[must_use]
    pub fn from_game(run: usize, game: &Game, exhaustion: Exhaustion) -> Self {
        let scores = game.scores();
        let won = game.players().iter().flat_map(|p| p.winnings.iter());
        Self {
            run,
            seed: game.seed(),
            exhaustion,
            max_score: scores.iter().copied().max().unwrap_or(0),
            scores,
            won_goals: count(won.clone().count()),
            burned_goals: count(game.table().goal_discard.len()),
            won_flamewars: count(won.filter(|goal| goal.points == FLAME_WAR_POINTS).count()),
            lost_flamewars: count(game.table().flame_war_valued_goals()),
            rounds: game.rounds(),
            email_pile_remaining: count(game.table().email_pile.len()),
            stats: game.stats().clone(),
        }
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// One named metric across every run of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    pub name: &'static str,
    pub values: Vec<f64>,
}

/// Names of the series produced by [`BatchReport::series`], in order.
pub const SERIES_NAMES: [&str; 8] = [
    "scores",
    "max_score",
    "won_goals",
    "burned_goals",
    "won_flamewars",
    "lost_flamewars",
    "rounds",
    "email_pile_remaining",
];

/// Everything a batch produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub game: GameConfig,
    pub batch: BatchConfig,
    pub runs: Vec<RunMetrics>,
    pub exhaustion: ExhaustionTally,
    /// Runs whose deal ran a pile dry before the first round.
    pub setup_failures: u32,
}

impl BatchReport {
    /// One scalar series per metric. `scores` flattens every player's score
    /// of every run; the rest hold one value per run.
    #[must_use]
    pub fn series(&self) -> Vec<MetricSeries> {
        let scores = self
            .runs
            .iter()
            .flat_map(|run| run.scores.iter().copied().map(f64::from))
            .collect();

        vec![
            MetricSeries {
                name: SERIES_NAMES[0],
                values: scores,
            },
            MetricSeries {
                name: SERIES_NAMES[1],
                values: self.per_run(|run| run.max_score),
            },
            MetricSeries {
                name: SERIES_NAMES[2],
                values: self.per_run(|run| run.won_goals),
            },
            MetricSeries {
                name: SERIES_NAMES[3],
                values: self.per_run(|run| run.burned_goals),
            },
            MetricSeries {
                name: SERIES_NAMES[4],
                values: self.per_run(|run| run.won_flamewars),
            },
            MetricSeries {
                name: SERIES_NAMES[5],
                values: self.per_run(|run| run.lost_flamewars),
            },
            MetricSeries {
                name: SERIES_NAMES[6],
                values: self.per_run(|run| run.rounds),
            },
            MetricSeries {
                name: SERIES_NAMES[7],
                values: self.per_run(|run| run.email_pile_remaining),
            },
        ]
    }

    fn per_run(&self, pick: fn(&RunMetrics) -> u32) -> Vec<f64> {
        self.runs.iter().map(|run| f64::from(pick(run))).collect()
    }

    /// Fraction of tallied games ended by `kind`.
    #[must_use]
    pub fn exhaustion_rate(&self, kind: Exhaustion) -> f64 {
        let total = self.exhaustion.total();
        if total == 0 {
            0.0
        } else {
            f64::from(self.exhaustion.get(kind)) / f64::from(total)
        }
    }
}

/// Play one game to termination.
///
/// # Errors
///
/// Returns the setup error when the game cannot be dealt.
pub fn run_single(
    catalog: &CardCatalog,
    config: &GameConfig,
    run: usize,
    seed: u64,
) -> Result<RunMetrics, GameSetupError> {
    let mut game = Game::new(catalog, config.clone(), seed)?;
    let exhaustion = game.play();
    Ok(RunMetrics::from_game(run, &game, exhaustion))
}

/// Play `batch.runs` independent games and aggregate their outcomes.
///
/// Games that exhaust a pile during the deal are tallied but produce no
/// metrics.
///
/// # Errors
///
/// Returns an error when `config` is invalid; no games are played.
pub fn run_batch(
    catalog: &CardCatalog,
    config: &GameConfig,
    batch: &BatchConfig,
) -> Result<BatchReport, GameConfigError> {
    config.validate()?;
    let mut report = BatchReport {
        game: config.clone(),
        batch: *batch,
        runs: Vec::with_capacity(batch.runs),
        exhaustion: ExhaustionTally::default(),
        setup_failures: 0,
    };

    for run in 0..batch.runs {
        let seed = batch.run_seed(run);
        match run_single(catalog, config, run, seed) {
            Ok(metrics) => {
                log::debug!(
                    "run {run} (seed {seed:#018x}): {} after {} rounds, max score {}",
                    metrics.exhaustion,
                    metrics.rounds,
                    metrics.max_score
                );
                report.exhaustion.record(metrics.exhaustion);
                report.runs.push(metrics);
            }
            Err(GameSetupError::Exhausted(kind)) => {
                log::debug!("run {run} (seed {seed:#018x}) could not be dealt: {kind}");
                report.exhaustion.record(kind);
                report.setup_failures += 1;
            }
            Err(GameSetupError::Config(err)) => return Err(err),
        }
    }

    log::debug!(
        "batch of {} finished: email {}, attention {}, goal {}",
        batch.runs,
        report.exhaustion.email,
        report.exhaustion.attention,
        report.exhaustion.goal
    );
    Ok(report)
}
