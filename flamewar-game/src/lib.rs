//! Flamewar Game Engine
//!
//! Simulation core for the Flamewar office-email card game: the card
//! catalog, seeded piles, goals and their interrupts, the round loop, and a
//! batch harness for balance testing. No I/O beyond loading a catalog.

pub mod cards;
pub mod catalog;
pub mod constants;
pub mod error;
pub mod game;
pub mod goal;
pub mod interrupts;
pub mod pile;
pub mod player;
pub mod rng;
pub mod simulation;
pub mod table;

// Re-export commonly used types
pub use cards::{Attention, Email, HandCard, Interrupt};
pub use catalog::{AttentionTemplate, CardCatalog, CatalogError, EmailTemplate, GoalGroup};
pub use error::{Exhaustion, GameConfigError, GameSetupError};
pub use game::{CardCensus, Game, GameConfig, GameStats, GameStatus, GameView};
pub use goal::{Goal, Resolution, RuleOverride};
pub use pile::Pile;
pub use player::{ActionOutcome, Hand, Player};
pub use rng::{GameRng, derive_stream_seed};
pub use simulation::{
    BatchConfig, BatchReport, ExhaustionTally, MetricSeries, RunMetrics, SERIES_NAMES, run_batch,
    run_single,
};
pub use table::Table;
