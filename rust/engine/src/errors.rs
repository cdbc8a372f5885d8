use thiserror::Error;

use crate::player::{PlayerAction, PlayerId};
use crate::table::SeatIndex;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid rank: {0:?}")]
    InvalidRank(String),
    #[error("Invalid card: {0:?}")]
    InvalidCard(String),
    #[error("Invalid action {action:?}: {reason}")]
    InvalidAction {
        action: PlayerAction,
        reason: &'static str,
    },
    #[error("Seat {0} is already occupied")]
    SeatOccupied(SeatIndex),
    #[error("Player {0} is not seated")]
    PlayerNotSeated(PlayerId),
    #[error("Seat {seat} does not exist (table has {seats} seats)")]
    InvalidSeat { seat: SeatIndex, seats: usize },
    #[error("Game over: {funded} funded player(s), need at least 2")]
    GameOver { funded: usize },
    #[error("It's not seat {actual}'s turn (expected seat {expected})")]
    NotPlayersTurn {
        expected: SeatIndex,
        actual: SeatIndex,
    },
    #[error("No decision is pending")]
    NoPendingDecision,
    #[error("Hand in progress")]
    HandInProgress,
    #[error("Deck exhausted: requested {requested}, remaining {remaining}")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("Chip conservation violated: expected {expected}, found {actual}")]
    ChipConservation { expected: u64, actual: u64 },
    #[error("Table holds {total} chips, more than a single stack can hold")]
    ChipOverflow { total: u64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
