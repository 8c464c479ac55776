//! Shared table state: piles, face-up goals, discards.

use crate::cards::{Attention, Email, HandCard, Interrupt};
use crate::catalog::CardCatalog;
use crate::constants::FLAME_WAR_POINTS;
use crate::error::Exhaustion;
use crate::goal::Goal;
use crate::pile::Pile;
use crate::rng::GameRng;

/// Everything on the table that no single player owns.
///
/// Discards are append-only sinks: nothing is ever drawn back out of them.
#[derive(Debug, Clone)]
pub struct Table {
    pub goals: Vec<Goal>,
    pub goal_pile: Pile<Goal>,
    pub goal_discard: Vec<Goal>,
    pub email_pile: Pile<HandCard>,
    pub email_discard: Vec<Email>,
    pub interrupt_discard: Vec<Interrupt>,
    pub attention_pile: Pile<Attention>,
    pub attention_discard: Vec<Attention>,
}

impl Table {
    /// Build fresh piles from a catalog. The email deck (emails plus
    /// interrupts) is shuffled; the others are drawn from at random anyway.
    #[must_use]
    pub fn from_catalog(catalog: &CardCatalog, rng: &mut GameRng) -> Self {
        let mut goal_pile = Pile::empty(Exhaustion::Goal);
        for (name, group) in &catalog.goals {
            for flavor in &group.cards {
                goal_pile.push(Goal::new(name.as_str(), group.lights, flavor.as_str()));
            }
        }

        let mut email_pile = Pile::empty(Exhaustion::Email);
        for template in &catalog.emails {
            email_pile.push(HandCard::Email(Email::new(
                template.lights,
                template.flames,
                template.subject.as_str(),
            )));
        }
        for _ in 0..catalog.interrupt_copies {
            for interrupt in Interrupt::ALL {
                email_pile.push(HandCard::Interrupt(interrupt));
            }
        }
        email_pile.shuffle(rng);

        let attention_pile = Pile::new(
            Exhaustion::Attention,
            catalog
                .attention
                .iter()
                .map(|card| Attention::new(card.read, card.send, card.flavor.as_str()))
                .collect(),
        );

        Self {
            goals: Vec::new(),
            goal_pile,
            goal_discard: Vec::new(),
            email_pile,
            email_discard: Vec::new(),
            interrupt_discard: Vec::new(),
            attention_pile,
            attention_discard: Vec::new(),
        }
    }

    /// Deal `count` goals face-up.
    ///
    /// # Errors
    ///
    /// Returns [`Exhaustion::Goal`] when the goal pile is too small.
    pub fn deal_goals(&mut self, count: usize, rng: &mut GameRng) -> Result<(), Exhaustion> {
        let dealt = self.goal_pile.draw(count, rng)?;
        self.goals.extend(dealt);
        Ok(())
    }

    /// Draw and spend this round's attention card.
    ///
    /// # Errors
    ///
    /// Returns [`Exhaustion::Attention`] when the attention pile is empty.
    pub fn draw_attention(&mut self, rng: &mut GameRng) -> Result<Attention, Exhaustion> {
        let attention = self.attention_pile.draw_one(rng)?;
        self.attention_discard.push(attention.clone());
        Ok(attention)
    }

    /// Emails attached to face-up goals.
    pub fn attached_emails(&self) -> impl Iterator<Item = &Email> {
        self.goals.iter().flat_map(|goal| goal.emails.iter())
    }

    /// Active goals currently worth the flame-war payout.
    #[must_use]
    pub fn flame_war_valued_goals(&self) -> usize {
        self.goals
            .iter()
            .filter(|goal| goal.points == FLAME_WAR_POINTS)
            .count()
    }
}
