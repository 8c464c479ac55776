//! Interrupt effects applied to a running game.

use crate::cards::Interrupt;
use crate::constants::{VOLUNTOLD_READS, VOLUNTOLD_SENDS};
use crate::error::Exhaustion;
use crate::game::Game;
use crate::goal::Goal;

impl Interrupt {
    /// Apply this effect to the game.
    ///
    /// Only `Voluntold` can fail, because it drives real player actions.
    ///
    /// # Errors
    ///
    /// Propagates any exhaustion raised by the drafted player's sends.
    pub fn apply(self, game: &mut Game) -> Result<(), Exhaustion> {
        match self {
            Self::FlameWar => {
                if let Some(idx) = game.rng.pick_index(game.table.goals.len()) {
                    game.table.goals[idx].apply_flame_war();
                }
                Ok(())
            }
            Self::EpicThread => {
                if let Some(idx) = game.rng.pick_index(game.table.goals.len()) {
                    game.table.goals[idx].apply_epic_thread();
                }
                Ok(())
            }
            Self::Misdelivered => {
                let lost = game
                    .table
                    .goals
                    .iter_mut()
                    .find_map(Goal::remove_first_read);
                if let Some(email) = lost {
                    game.table.email_discard.push(email);
                }
                Ok(())
            }
            Self::Voluntold => {
                let Some(idx) = game.rng.pick_index(game.players.len()) else {
                    return Ok(());
                };
                for _ in 0..VOLUNTOLD_READS {
                    game.read_email(idx);
                }
                for _ in 0..VOLUNTOLD_SENDS {
                    game.send_email(idx)?;
                }
                Ok(())
            }
        }
    }
}
