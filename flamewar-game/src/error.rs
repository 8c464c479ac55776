//! Error types shared across the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A pile could not satisfy a draw the rules demanded.
///
/// This ends the game it happens in. It is the outcome the balance harness
/// measures, not a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Error, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exhaustion {
    #[error("attention pile is empty")]
    Attention,
    #[error("email pile is empty")]
    Email,
    #[error("goal pile is empty")]
    Goal,
}

impl Exhaustion {
    pub const ALL: [Self; 3] = [Self::Email, Self::Attention, Self::Goal];

    /// Short key used in tallies and reports.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Attention => "attention",
            Self::Email => "email",
            Self::Goal => "goal",
        }
    }
}

/// Errors raised when game configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum GameConfigError {
    #[error("a game needs at least one player")]
    NoPlayers,
    #[error("a game needs at least one active goal")]
    NoGoals,
    #[error("hand size must be at least 1")]
    EmptyHand,
    #[error("interrupt chance must be between 0.00 and 1.00 (got {0:.2})")]
    InterruptChance(f64),
}

/// Errors raised while constructing a game.
#[derive(Debug, Error, PartialEq)]
pub enum GameSetupError {
    #[error("invalid game config: {0}")]
    Config(#[from] GameConfigError),
    #[error("deck ran out during setup: {0}")]
    Exhausted(#[from] Exhaustion),
}
