//! Centralized rule and tuning constants for the Flamewar simulation.
//!
//! These values define the printed rules of the deck.

// Table setup ---------------------------------------------------------------
pub const DEFAULT_NUM_GOALS: usize = 2;
pub const DEFAULT_NUM_PLAYERS: usize = 6;
pub const DEFAULT_HAND_SIZE: usize = 5;
pub const DEFAULT_INTERRUPT_COPIES: u8 = 2;

// Round flow ----------------------------------------------------------------
pub const DEFAULT_INTERRUPT_CHANCE: f64 = 0.1;
pub const DEFAULT_ATTENTION_SEND: u8 = 2;

// Goals ---------------------------------------------------------------------
pub const DEFAULT_MAX_FLAMES: u32 = 3;

// Interrupts ----------------------------------------------------------------
pub const FLAME_WAR_POINTS: u32 = 10;
pub const FLAME_WAR_THRESHOLD: u32 = 10;
pub const EPIC_THREAD_FACTOR: u32 = 2;
pub const VOLUNTOLD_READS: usize = 2;
pub const VOLUNTOLD_SENDS: usize = 2;

// Harness -------------------------------------------------------------------
pub const DEFAULT_BATCH_RUNS: usize = 100;
pub const DEFAULT_BATCH_SEED: u64 = 1337;
