//! Players and the actions they take against the table.

use smallvec::SmallVec;

use crate::cards::{Email, HandCard, Interrupt};
use crate::error::Exhaustion;
use crate::goal::{Goal, Resolution};
use crate::rng::GameRng;
use crate::table::Table;

/// Hands hover around five cards; eight covers the usual drift inline.
pub type Hand = SmallVec<[HandCard; 8]>;

/// What a single player action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing to act on; no state changed.
    NoOp,
    Read,
    Sent { resolution: Option<Resolution> },
    Played(Interrupt),
}

#[derive(Debug, Clone, Default)]
pub struct Player {
    pub hand: Hand,
    pub winnings: Vec<Goal>,
}

impl Player {
    /// Draw one card from the email deck into the hand.
    ///
    /// # Errors
    ///
    /// Returns [`Exhaustion::Email`] when the deck is empty.
    pub fn draw(&mut self, table: &mut Table, rng: &mut GameRng) -> Result<(), Exhaustion> {
        let card = table.email_pile.draw_one(rng)?;
        self.hand.push(card);
        Ok(())
    }

    /// Final score: the sum of every won goal's points.
    #[must_use]
    pub fn points(&self) -> u32 {
        self.winnings.iter().map(|goal| goal.points).sum()
    }

    #[must_use]
    pub fn email_count(&self) -> usize {
        self.hand.iter().filter(|card| card.is_email()).count()
    }

    #[must_use]
    pub fn interrupt_count(&self) -> usize {
        self.hand.len() - self.email_count()
    }

    /// Read one unread email, chosen uniformly from every active goal.
    pub fn read_email(&self, table: &mut Table, rng: &mut GameRng) -> ActionOutcome {
        let pool: Vec<(usize, usize)> = table
            .goals
            .iter()
            .enumerate()
            .flat_map(|(goal_idx, goal)| {
                goal.emails
                    .iter()
                    .enumerate()
                    .filter(|(_, email)| !email.is_read())
                    .map(move |(email_idx, _)| (goal_idx, email_idx))
            })
            .collect();

        let Some(pick) = rng.pick_index(pool.len()) else {
            return ActionOutcome::NoOp;
        };
        let (goal_idx, email_idx) = pool[pick];
        table.goals[goal_idx].emails[email_idx].mark_read();
        ActionOutcome::Read
    }

    /// Send a random email from hand to a random active goal, settle the
    /// goal if it crossed a threshold, then draw a replacement card.
    ///
    /// The goal is chosen before the email, and is chosen even when the
    /// hand holds no email.
    ///
    /// # Errors
    ///
    /// Returns [`Exhaustion::Goal`] when a settled goal cannot be replaced
    /// and [`Exhaustion::Email`] when the replacement card cannot be drawn.
    pub fn send_email(
        &mut self,
        table: &mut Table,
        rng: &mut GameRng,
    ) -> Result<ActionOutcome, Exhaustion> {
        let Some(goal_idx) = rng.pick_index(table.goals.len()) else {
            return Ok(ActionOutcome::NoOp);
        };
        let Some(nth) = rng.pick_index(self.email_count()) else {
            return Ok(ActionOutcome::NoOp);
        };
        let Some(email) = self.remove_nth_email(nth) else {
            return Ok(ActionOutcome::NoOp);
        };

        table.goals[goal_idx].attach(email);
        let resolution = table.goals[goal_idx].resolution();
        if let Some(resolution) = resolution {
            self.settle_goal(table, goal_idx, resolution, rng)?;
        }
        self.draw(table, rng)?;
        Ok(ActionOutcome::Sent { resolution })
    }

    /// Remove the first interrupt in hand order, if any.
    pub fn take_first_interrupt(&mut self) -> Option<Interrupt> {
        let slot = self
            .hand
            .iter()
            .position(|card| card.as_interrupt().is_some())?;
        self.hand.remove(slot).as_interrupt()
    }

    fn remove_nth_email(&mut self, nth: usize) -> Option<Email> {
        let slot = self
            .hand
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_email())
            .nth(nth)?
            .0;
        match self.hand.remove(slot) {
            HandCard::Email(email) => Some(email),
            card @ HandCard::Interrupt(_) => {
                self.hand.insert(slot, card);
                None
            }
        }
    }

    fn settle_goal(
        &mut self,
        table: &mut Table,
        goal_idx: usize,
        resolution: Resolution,
        rng: &mut GameRng,
    ) -> Result<(), Exhaustion> {
        let mut goal = table.goals.remove(goal_idx);
        table.email_discard.extend(goal.take_emails());
        log::trace!(
            "goal {:?} {:?} at {} points",
            goal.flavor,
            resolution,
            goal.points
        );
        match resolution {
            Resolution::Burned => table.goal_discard.push(goal),
            Resolution::Won => self.winnings.push(goal),
        }
        let replacement = table.goal_pile.draw_one(rng)?;
        table.goals.push(replacement);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pile::Pile;

    fn bare_table(goals: Vec<Goal>, spare_goals: Vec<Goal>, deck: Vec<HandCard>) -> Table {
        Table {
            goals,
            goal_pile: Pile::new(Exhaustion::Goal, spare_goals),
            goal_discard: Vec::new(),
            email_pile: Pile::new(Exhaustion::Email, deck),
            email_discard: Vec::new(),
            interrupt_discard: Vec::new(),
            attention_pile: Pile::empty(Exhaustion::Attention),
            attention_discard: Vec::new(),
        }
    }

    fn light_emails(n: usize) -> Vec<HandCard> {
        (0..n).map(|_| Email::new(1, 0, "ok").into()).collect()
    }

    #[test]
    fn read_with_nothing_attached_is_noop() {
        let mut rng = GameRng::from_seed(1);
        let mut table = bare_table(vec![Goal::new("g", 2, "f")], Vec::new(), Vec::new());
        let player = Player::default();
        let before = table.goals.clone();
        assert_eq!(player.read_email(&mut table, &mut rng), ActionOutcome::NoOp);
        assert_eq!(table.goals, before);
    }

    #[test]
    fn read_marks_exactly_one_email() {
        let mut rng = GameRng::from_seed(1);
        let mut goal = Goal::new("g", 5, "f");
        goal.attach(Email::new(1, 0, "a"));
        goal.attach(Email::new(1, 0, "b"));
        let mut table = bare_table(vec![goal], Vec::new(), Vec::new());
        let player = Player::default();
        assert_eq!(player.read_email(&mut table, &mut rng), ActionOutcome::Read);
        assert_eq!(table.goals[0].unread_count(), 1);
        assert_eq!(player.read_email(&mut table, &mut rng), ActionOutcome::Read);
        assert_eq!(player.read_email(&mut table, &mut rng), ActionOutcome::NoOp);
        assert!(table.goals[0].emails.iter().all(Email::is_read));
    }

    #[test]
    fn send_without_email_in_hand_skips_replacement() {
        let mut rng = GameRng::from_seed(1);
        let goals = vec![Goal::new("g", 2, "f"), Goal::new("h", 2, "f")];
        let mut table = bare_table(goals, Vec::new(), light_emails(3));
        let mut player = Player::default();
        player.hand.push(Interrupt::Voluntold.into());
        let before = rng.draws();
        let outcome = player.send_email(&mut table, &mut rng).unwrap();
        assert_eq!(outcome, ActionOutcome::NoOp);
        assert!(rng.draws() > before, "goal is picked before the hand is checked");
        assert_eq!(player.hand.len(), 1);
        assert_eq!(table.email_pile.len(), 3);
    }

    #[test]
    fn send_attaches_and_redraws() {
        let mut rng = GameRng::from_seed(1);
        let mut table = bare_table(vec![Goal::new("g", 2, "f")], Vec::new(), light_emails(3));
        let mut player = Player::default();
        player.draw(&mut table, &mut rng).unwrap();
        let outcome = player.send_email(&mut table, &mut rng).unwrap();
        assert_eq!(outcome, ActionOutcome::Sent { resolution: None });
        assert_eq!(table.goals[0].emails.len(), 1);
        assert_eq!(player.hand.len(), 1);
        assert_eq!(table.email_pile.len(), 1);
    }

    #[test]
    fn send_with_empty_deck_reports_email_exhaustion() {
        let mut rng = GameRng::from_seed(1);
        let mut table = bare_table(vec![Goal::new("g", 2, "f")], Vec::new(), light_emails(1));
        let mut player = Player::default();
        player.draw(&mut table, &mut rng).unwrap();
        assert_eq!(
            player.send_email(&mut table, &mut rng),
            Err(Exhaustion::Email)
        );
        assert_eq!(table.goals[0].emails.len(), 1);
    }

    #[test]
    fn won_goal_goes_to_winnings_and_is_replaced() {
        let mut rng = GameRng::from_seed(3);
        let mut goal = Goal::new("g", 2, "target");
        let mut primed = Email::new(1, 0, "primed");
        primed.mark_read();
        goal.attach(primed);
        let mut pending = Email::new(1, 0, "pending");
        pending.mark_read();
        let mut table = bare_table(
            vec![goal],
            vec![Goal::new("g", 3, "next")],
            light_emails(2),
        );
        let mut player = Player::default();
        player.hand.push(pending.into());

        let outcome = player.send_email(&mut table, &mut rng).unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::Sent {
                resolution: Some(Resolution::Won)
            }
        );
        assert_eq!(player.winnings.len(), 1);
        assert_eq!(player.points(), 2);
        assert!(player.winnings[0].emails.is_empty());
        assert_eq!(table.email_discard.len(), 2);
        assert_eq!(table.goals.len(), 1);
        assert_eq!(table.goals[0].flavor, "next");
        assert_eq!(player.hand.len(), 1);
    }

    #[test]
    fn burned_goal_goes_to_discard_even_when_also_won() {
        let mut rng = GameRng::from_seed(3);
        let mut scorcher = Email::new(2, 3, "both");
        scorcher.mark_read();
        let mut table = bare_table(
            vec![Goal::new("g", 2, "doomed")],
            vec![Goal::new("g", 3, "next")],
            light_emails(1),
        );
        let mut player = Player::default();
        player.hand.push(scorcher.into());

        let outcome = player.send_email(&mut table, &mut rng).unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::Sent {
                resolution: Some(Resolution::Burned)
            }
        );
        assert!(player.winnings.is_empty());
        assert_eq!(table.goal_discard.len(), 1);
        assert_eq!(table.email_discard.len(), 1);
    }

    #[test]
    fn settled_goal_without_replacement_reports_goal_exhaustion() {
        let mut rng = GameRng::from_seed(3);
        let mut winner = Email::new(5, 0, "big");
        winner.mark_read();
        let mut table = bare_table(vec![Goal::new("g", 2, "last")], Vec::new(), light_emails(1));
        let mut player = Player::default();
        player.hand.push(winner.into());
        assert_eq!(
            player.send_email(&mut table, &mut rng),
            Err(Exhaustion::Goal)
        );
        assert_eq!(player.winnings.len(), 1);
        assert!(table.goals.is_empty());
        assert_eq!(table.email_pile.len(), 1, "no replacement card after goal exhaustion");
    }

    #[test]
    fn first_interrupt_in_hand_order_is_taken() {
        let mut player = Player::default();
        player.hand.push(Email::new(1, 0, "a").into());
        player.hand.push(Interrupt::EpicThread.into());
        player.hand.push(Interrupt::FlameWar.into());
        assert_eq!(player.interrupt_count(), 2);
        assert_eq!(player.take_first_interrupt(), Some(Interrupt::EpicThread));
        assert_eq!(player.take_first_interrupt(), Some(Interrupt::FlameWar));
        assert_eq!(player.take_first_interrupt(), None);
        assert_eq!(player.hand.len(), 1);
    }
}
