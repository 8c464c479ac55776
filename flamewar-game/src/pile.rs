//! Finite draw-without-replacement piles.

use crate::error::Exhaustion;
use crate::rng::GameRng;

/// A face-down pile. Order carries no meaning; every draw picks uniformly
/// among the remaining cards and moves the card out by value.
#[derive(Debug, Clone, PartialEq)]
pub struct Pile<T> {
    cards: Vec<T>,
    kind: Exhaustion,
}

impl<T> Pile<T> {
    /// Create a pile that reports `kind` when it runs dry.
    #[must_use]
    pub const fn new(kind: Exhaustion, cards: Vec<T>) -> Self {
        Self { cards, kind }
    }

    #[must_use]
    pub const fn empty(kind: Exhaustion) -> Self {
        Self::new(kind, Vec::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cards.iter()
    }

    pub fn push(&mut self, card: T) {
        self.cards.push(card);
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    /// Draw `n` distinct cards.
    ///
    /// # Errors
    ///
    /// Returns the pile's exhaustion kind when fewer than `n` cards remain.
    /// The pile is left untouched in that case.
    pub fn draw(&mut self, n: usize, rng: &mut GameRng) -> Result<Vec<T>, Exhaustion> {
        if n > self.cards.len() {
            return Err(self.kind);
        }
        let mut drawn = Vec::with_capacity(n);
        for _ in 0..n {
            drawn.push(self.draw_one(rng)?);
        }
        Ok(drawn)
    }

    /// Draw a single card.
    ///
    /// # Errors
    ///
    /// Returns the pile's exhaustion kind when the pile is empty.
    pub fn draw_one(&mut self, rng: &mut GameRng) -> Result<T, Exhaustion> {
        let idx = rng.pick_index(self.cards.len()).ok_or(self.kind)?;
        Ok(self.cards.remove(idx))
    }
}
