use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::{Blinds, Street};
use crate::hand::HandCategory;
use crate::player::{PlayerAction, PlayerId};
use crate::table::SeatIndex;

/// Records a single accepted player action during a hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: SeatIndex,
    pub player: PlayerId,
    /// The betting street when this action occurred
    pub street: Street,
    pub action: PlayerAction,
    /// Chips the action actually moved into the pots
    pub chips: u32,
}

/// How one pot was paid out.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PotAward {
    pub pot: usize,
    pub amount: u64,
    /// Winners in payout order with the chips each received
    pub winners: Vec<(PlayerId, u64)>,
    /// Winning hand, absent when the pot was uncontested
    pub hand: Option<HandCategory>,
}

/// Complete record of a poker hand including all actions, board cards, and outcome.
///
/// Records are built in memory and handed back to the caller when the hand
/// completes; storing them is up to the caller.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Unique identifier for this hand (format: YYYYMMDD-NNNNNN)
    pub hand_id: String,
    /// RNG seed used for deck shuffling (enables deterministic replay)
    pub seed: Option<u64>,
    pub button: SeatIndex,
    pub blinds: Blinds,
    /// Chronological list of all player actions
    pub actions: Vec<ActionRecord>,
    /// Community cards on the board (up to 5 cards)
    pub board: Vec<Card>,
    /// Hole cards shown at showdown
    #[serde(default)]
    pub shown: Vec<(PlayerId, [Card; 2])>,
    #[serde(default)]
    pub awards: Vec<PotAward>,
    /// Timestamp when the hand started (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

impl HandRecord {
    pub fn new(hand_id: String, seed: Option<u64>, button: SeatIndex, blinds: Blinds) -> Self {
        Self {
            hand_id,
            seed,
            button,
            blinds,
            actions: Vec::new(),
            board: Vec::new(),
            shown: Vec::new(),
            awards: Vec::new(),
            ts: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }

    /// Chips won by `player` across all pots.
    pub fn winnings(&self, player: PlayerId) -> u64 {
        self.awards
            .iter()
            .flat_map(|a| a.winners.iter())
            .filter(|(p, _)| *p == player)
            .map(|(_, chips)| chips)
            .sum()
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Hands out sequential hand ids for one date.
#[derive(Debug, Clone)]
pub struct HandIds {
    date: String,
    seq: u32,
}

impl Default for HandIds {
    fn default() -> Self {
        Self::for_date(&Utc::now().format("%Y%m%d").to_string())
    }
}

impl HandIds {
    pub fn for_date(date: &str) -> Self {
        Self {
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.date, self.seq)
    }
}
