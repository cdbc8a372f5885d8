use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pot::Stack;

/// Opaque player identity. The engine never owns names or display data,
/// only this id and the chip balance it is given for the hand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Represents a player action during a betting round.
///
/// Amounts are chips taken from the acting player's stack: `Bet(n)` puts in
/// `n`, `Raise(n)` puts in the call amount plus `n`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check (no bet, only valid if nothing to call)
    Check,
    /// Call the current bet, or as much of it as the stack covers
    Call,
    /// Open the betting with the given amount
    Bet(u32),
    /// Raise the current bet by the given amount
    Raise(u32),
}

/// A seated player: an identity plus the chip balance the engine debits and
/// credits during a hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    chips: u32,
}

impl Player {
    pub fn new(id: PlayerId, chips: u32) -> Self {
        Self { id, chips }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn chips(&self) -> u32 {
        self.chips
    }

    pub fn add_chips(&mut self, amount: u32) {
        self.chips = self.chips.saturating_add(amount);
    }

    pub fn is_funded(&self) -> bool {
        self.chips > 0
    }
}

impl Stack for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn chips(&self) -> u32 {
        self.chips
    }

    fn chips_mut(&mut self) -> &mut u32 {
        &mut self.chips
    }
}
