//! The game state machine: setup, the round loop, and termination.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::cards::{HandCard, Interrupt};
use crate::catalog::CardCatalog;
use crate::constants::{
    DEFAULT_HAND_SIZE, DEFAULT_INTERRUPT_CHANCE, DEFAULT_NUM_GOALS, DEFAULT_NUM_PLAYERS,
};
use crate::error::{Exhaustion, GameConfigError, GameSetupError};
use crate::goal::Resolution;
use crate::player::{ActionOutcome, Player};
use crate::rng::GameRng;
use crate::table::Table;

/// Table-level rules for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "GameConfig::default_num_goals")]
    pub num_goals: usize,
    #[serde(default = "GameConfig::default_num_players")]
    pub num_players: usize,
    #[serde(default = "GameConfig::default_hand_size")]
    pub hand_size: usize,
    /// Chance per round that a random player plays an interrupt.
    #[serde(default = "GameConfig::default_interrupt_chance")]
    pub interrupt_chance: f64,
}

impl GameConfig {
    const fn default_num_goals() -> usize {
        DEFAULT_NUM_GOALS
    }

    const fn default_num_players() -> usize {
        DEFAULT_NUM_PLAYERS
    }

    const fn default_hand_size() -> usize {
        DEFAULT_HAND_SIZE
    }

    const fn default_interrupt_chance() -> f64 {
        DEFAULT_INTERRUPT_CHANCE
    }

    /// Validate table invariants.
    ///
    /// # Errors
    ///
    /// Returns an error when a count is zero or the interrupt chance is not
    /// a probability.
    pub fn validate(&self) -> Result<(), GameConfigError> {
        if self.num_players == 0 {
            return Err(GameConfigError::NoPlayers);
        }
        if self.num_goals == 0 {
            return Err(GameConfigError::NoGoals);
        }
        if self.hand_size == 0 {
            return Err(GameConfigError::EmptyHand);
        }
        if !(0.0..=1.0).contains(&self.interrupt_chance) {
            return Err(GameConfigError::InterruptChance(self.interrupt_chance));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_goals: Self::default_num_goals(),
            num_players: Self::default_num_players(),
            hand_size: Self::default_hand_size(),
            interrupt_chance: Self::default_interrupt_chance(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    Terminated(Exhaustion),
}

/// Per-game action counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub reads: u32,
    pub sends: u32,
    /// Reads or sends that found nothing to act on.
    pub idle_actions: u32,
    pub goals_won: u32,
    pub goals_burned: u32,
    pub interrupts_played: BTreeMap<Interrupt, u32>,
}

impl GameStats {
    fn record(&mut self, outcome: ActionOutcome) {
        match outcome {
            ActionOutcome::NoOp => self.idle_actions += 1,
            ActionOutcome::Read => self.reads += 1,
            ActionOutcome::Sent { resolution } => {
                self.sends += 1;
                match resolution {
                    Some(Resolution::Won) => self.goals_won += 1,
                    Some(Resolution::Burned) => self.goals_burned += 1,
                    None => {}
                }
            }
            ActionOutcome::Played(interrupt) => {
                *self.interrupts_played.entry(interrupt).or_default() += 1;
            }
        }
    }
}

/// Count of each card type across every location it can be in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCensus {
    pub goals: usize,
    pub emails: usize,
    pub interrupts: usize,
    pub attention: usize,
}

impl CardCensus {
    /// Totals a freshly built game starts with.
    #[must_use]
    pub fn of_catalog(catalog: &CardCatalog) -> Self {
        Self {
            goals: catalog.goal_count(),
            emails: catalog.emails.len(),
            interrupts: catalog.interrupt_count(),
            attention: catalog.attention.len(),
        }
    }
}

/// One game of Flamewar, from the deal to the first pile that runs dry.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    pub(crate) table: Table,
    pub(crate) players: Vec<Player>,
    current_player: usize,
    rounds: u32,
    status: GameStatus,
    stats: GameStats,
    pub(crate) rng: GameRng,
}

impl Game {
    /// Shuffle a fresh deck from the catalog, deal every player a hand,
    /// and turn the first goals face-up.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the deck is too small
    /// to finish the deal.
    pub fn new(catalog: &CardCatalog, config: GameConfig, seed: u64) -> Result<Self, GameSetupError> {
        config.validate()?;
        let mut rng = GameRng::from_seed(seed);
        let mut table = Table::from_catalog(catalog, &mut rng);

        let mut players = Vec::with_capacity(config.num_players);
        for _ in 0..config.num_players {
            let mut player = Player::default();
            for _ in 0..config.hand_size {
                player.draw(&mut table, &mut rng)?;
            }
            players.push(player);
        }
        table.deal_goals(config.num_goals, &mut rng)?;

        log::debug!(
            "game {seed:#x} dealt: {} players, {} goals up, {} cards left in the email deck",
            players.len(),
            table.goals.len(),
            table.email_pile.len()
        );

        Ok(Self {
            config,
            table,
            players,
            current_player: 0,
            rounds: 0,
            status: GameStatus::Running,
            stats: GameStats::default(),
            rng,
        })
    }

    #[must_use]
    pub const fn table(&self) -> &Table {
        &self.table
    }

    /// Direct table access for scripted scenarios.
    pub const fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Direct player access for scripted scenarios.
    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    #[must_use]
    pub const fn current_player(&self) -> usize {
        self.current_player
    }

    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub const fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub const fn rng_draws(&self) -> u64 {
        self.rng.draws()
    }

    #[must_use]
    pub fn scores(&self) -> Vec<u32> {
        self.players.iter().map(Player::points).collect()
    }

    /// Play rounds until a pile runs dry and return which one did.
    pub fn play(&mut self) -> Exhaustion {
        loop {
            if let Err(kind) = self.play_round() {
                log::debug!(
                    "game {:#x} ended after {} rounds: {kind}",
                    self.seed(),
                    self.rounds
                );
                return kind;
            }
        }
    }

    /// Play a single round for the current player.
    ///
    /// # Errors
    ///
    /// Returns the exhaustion that ended the game. A game that has already
    /// ended returns its recorded exhaustion without changing state.
    pub fn play_round(&mut self) -> Result<(), Exhaustion> {
        if let GameStatus::Terminated(kind) = self.status {
            return Err(kind);
        }
        self.rounds += 1;

        let drawn = self.table.draw_attention(&mut self.rng);
        let attention = self.settle(drawn)?;
        let actor = self.current_player;
        for _ in 0..attention.read {
            self.read_email(actor);
        }
        for _ in 0..attention.send {
            self.send_email(actor)?;
        }

        if self.rng.chance(self.config.interrupt_chance)
            && let Some(idx) = self.rng.pick_index(self.players.len())
        {
            self.play_interrupt(idx)?;
        }

        self.current_player = (self.current_player + 1) % self.players.len();
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("after round {}:\n{}", self.rounds, self.view());
        }
        Ok(())
    }

    /// Have player `idx` read one unread email on the table.
    pub fn read_email(&mut self, idx: usize) -> ActionOutcome {
        if self.is_terminated() {
            return ActionOutcome::NoOp;
        }
        let Self {
            players,
            table,
            rng,
            ..
        } = self;
        let outcome = players
            .get(idx)
            .map_or(ActionOutcome::NoOp, |player| player.read_email(table, rng));
        self.stats.record(outcome);
        outcome
    }

    /// Have player `idx` send one email from hand.
    ///
    /// # Errors
    ///
    /// Returns the exhaustion raised by the goal or email replacement draw.
    pub fn send_email(&mut self, idx: usize) -> Result<ActionOutcome, Exhaustion> {
        if let GameStatus::Terminated(kind) = self.status {
            return Err(kind);
        }
        let Self {
            players,
            table,
            rng,
            ..
        } = self;
        let result = match players.get_mut(idx) {
            Some(player) => player.send_email(table, rng),
            None => Ok(ActionOutcome::NoOp),
        };
        let outcome = self.settle(result)?;
        self.stats.record(outcome);
        Ok(outcome)
    }

    /// Have player `idx` play the first interrupt in their hand.
    ///
    /// # Errors
    ///
    /// Returns the exhaustion raised by the effect or the replacement draw.
    pub fn play_interrupt(&mut self, idx: usize) -> Result<ActionOutcome, Exhaustion> {
        if let GameStatus::Terminated(kind) = self.status {
            return Err(kind);
        }
        let Some(interrupt) = self
            .players
            .get_mut(idx)
            .and_then(Player::take_first_interrupt)
        else {
            return Ok(ActionOutcome::NoOp);
        };
        log::trace!("player {idx} plays {interrupt}");
        self.stats.record(ActionOutcome::Played(interrupt));

        let applied = interrupt.apply(self);
        self.table.interrupt_discard.push(interrupt);
        self.settle(applied)?;

        let Self {
            players,
            table,
            rng,
            ..
        } = self;
        let drawn = players[idx].draw(table, rng);
        self.settle(drawn)?;
        Ok(ActionOutcome::Played(interrupt))
    }

    /// Count every card type across piles, hands, goals, winnings, and discards.
    #[must_use]
    pub fn census(&self) -> CardCensus {
        let table = &self.table;
        let mut census = CardCensus {
            goals: table.goal_pile.len()
                + table.goals.len()
                + table.goal_discard.len()
                + self.players.iter().map(|p| p.winnings.len()).sum::<usize>(),
            emails: table.attached_emails().count() + table.email_discard.len(),
            interrupts: table.interrupt_discard.len(),
            attention: table.attention_pile.len() + table.attention_discard.len(),
        };
        let held = table
            .email_pile
            .iter()
            .chain(self.players.iter().flat_map(|p| p.hand.iter()));
        for card in held {
            match card {
                HandCard::Email(_) => census.emails += 1,
                HandCard::Interrupt(_) => census.interrupts += 1,
            }
        }
        census
    }

    /// Human-readable dump of piles, goals, and hands.
    #[must_use]
    pub fn describe(&self) -> String {
        self.view().to_string()
    }

    #[must_use]
    pub const fn view(&self) -> GameView<'_> {
        GameView(self)
    }

    const fn is_terminated(&self) -> bool {
        matches!(self.status, GameStatus::Terminated(_))
    }

    fn settle<T>(&mut self, result: Result<T, Exhaustion>) -> Result<T, Exhaustion> {
        if let Err(kind) = &result {
            self.status = GameStatus::Terminated(*kind);
        }
        result
    }
}

/// Text rendering of a game: pile and discard sizes, goals with their
/// attached emails (unread as `()`), and hands with the current player starred.
pub struct GameView<'a>(&'a Game);

impl fmt::Display for GameView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let game = self.0;
        let table = &game.table;
        writeln!(f, "Piles:")?;
        writeln!(
            f,
            " email: {}/{}",
            table.email_pile.len(),
            table.email_discard.len()
        )?;
        writeln!(
            f,
            " attin: {}/{}",
            table.attention_pile.len(),
            table.attention_discard.len()
        )?;
        writeln!(
            f,
            " goals: {}/{}",
            table.goal_pile.len(),
            table.goal_discard.len()
        )?;
        writeln!(f, "Goals:")?;
        for goal in &table.goals {
            write!(
                f,
                "  {}/{}, {}/{}:",
                goal.lights_count(),
                goal.num_lights,
                goal.flames_count(),
                goal.max_flames
            )?;
            for (i, email) in goal.emails.iter().enumerate() {
                let sep = if i == 0 { " " } else { ", " };
                if email.is_read() {
                    write!(f, "{sep}{email}")?;
                } else {
                    write!(f, "{sep}()")?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "Players:")?;
        for (i, player) in game.players.iter().enumerate() {
            let marker = if i == game.current_player { "*" } else { " " };
            write!(f, " {marker}{i}: {}pts; [", player.points())?;
            for (j, card) in player.hand.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{card}")?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
