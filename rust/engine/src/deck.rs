use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// A deck dealt front to back.
///
/// Shuffling always restarts from a fresh [`full_deck`], so a shuffled deck
/// never holds the same card twice.
#[derive(Debug)]
pub struct Deck {
    order: Vec<Card>,
    next: usize,
    rng: ChaCha20Rng,
}

impl Deck {
    /// Unshuffled deck whose shuffles are driven by `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            order: full_deck(),
            next: 0,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Builds a deck that deals `cards` in the given order.
    ///
    /// Used to replay a known hand. The list may be shorter than 52 cards,
    /// but a card may not appear twice. Calling [`Deck::shuffle`] discards
    /// the preset order.
    pub fn stacked(cards: Vec<Card>) -> Result<Self, GameError> {
        let mut seen = HashSet::with_capacity(cards.len());
        if let Some(dup) = cards.iter().find(|c| !seen.insert(**c)) {
            return Err(GameError::InvalidCard(dup.to_string()));
        }
        Ok(Self {
            order: cards,
            next: 0,
            rng: ChaCha20Rng::seed_from_u64(0),
        })
    }

    pub fn shuffle(&mut self) {
        let mut order = full_deck();
        order.shuffle(&mut self.rng);
        self.order = order;
        self.next = 0;
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let card = self.order.get(self.next).copied()?;
        self.next += 1;
        Some(card)
    }

    /// Removes `n` cards from the front of the deck. Takes nothing when
    /// fewer than `n` remain.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(GameError::DeckExhausted {
                requested: n,
                remaining,
            });
        }
        let dealt = self.order[self.next..self.next + n].to_vec();
        self.next += n;
        Ok(dealt)
    }

    pub fn burn_card(&mut self) -> Result<(), GameError> {
        self.deal(1).map(drop)
    }

    pub fn remaining(&self) -> usize {
        self.order.len() - self.next
    }
}
