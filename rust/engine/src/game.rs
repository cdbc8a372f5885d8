use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::history::HandRecord;
use crate::player::PlayerId;
use crate::pot::PotLedger;
use crate::rules::ActionChoices;
use crate::table::SeatIndex;

/// Represents a betting street in Texas Hold'em poker.
/// Defines the four stages of a poker hand.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Street {
    /// Before flop (hole cards dealt)
    Preflop,
    /// After flop (3 community cards)
    Flop,
    /// After turn (4th community card)
    Turn,
    /// After river (5th community card)
    River,
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        };
        write!(f, "{repr}")
    }
}

/// Phases of one hand, in the order the engine walks them.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    Init,
    DealHole,
    PostBlinds,
    Betting(Street),
    DealFlop,
    DealTurn,
    DealRiver,
    Showdown,
}

impl Phase {
    /// Where the hand goes once the betting on `street` is over.
    pub fn after_betting(street: Street) -> Phase {
        match street {
            Street::Preflop => Phase::DealFlop,
            Street::Flop => Phase::DealTurn,
            Street::Turn => Phase::DealRiver,
            Street::River => Phase::Showdown,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Blinds {
    pub small: u32,
    pub big: u32,
}

impl fmt::Display for Blinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.small, self.big)
    }
}

/// Seats in clockwise order starting at `start`, visiting each seat once.
pub fn clockwise(start: SeatIndex, num_seats: usize) -> impl Iterator<Item = SeatIndex> {
    (0..num_seats).map(move |offset| (start + offset) % num_seats)
}

/// A decision the engine is waiting on.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub seat: SeatIndex,
    pub player: PlayerId,
    pub street: Street,
    pub choices: ActionChoices,
    pub to_call: u32,
    pub stack: u32,
}

/// Wagers and turn order for a single street.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BettingRound {
    pub street: Street,
    wagers: BTreeMap<SeatIndex, u32>,
    pointer: SeatIndex,
    /// Seats that acted since the last raise.
    acted: BTreeSet<SeatIndex>,
}

impl BettingRound {
    pub fn new(street: Street, pointer: SeatIndex) -> Self {
        Self {
            street,
            wagers: BTreeMap::new(),
            pointer,
            acted: BTreeSet::new(),
        }
    }

    pub fn wager(&self, seat: SeatIndex) -> u32 {
        self.wagers.get(&seat).copied().unwrap_or(0)
    }

    pub fn max_wager(&self) -> u32 {
        self.wagers.values().copied().max().unwrap_or(0)
    }

    /// Whether any chips went in on this street.
    pub fn opened(&self) -> bool {
        self.max_wager() > 0
    }

    pub fn to_call(&self, seat: SeatIndex) -> u32 {
        self.max_wager().saturating_sub(self.wager(seat))
    }

    pub fn pointer(&self) -> SeatIndex {
        self.pointer
    }

    /// Forced chips (blinds). They count as wagers but not as having acted.
    pub fn force(&mut self, seat: SeatIndex, chips: u32) {
        *self.wagers.entry(seat).or_default() += chips;
    }

    /// Records a voluntary action that moved `chips`.
    pub fn record(&mut self, seat: SeatIndex, chips: u32) {
        let previous_max = self.max_wager();
        *self.wagers.entry(seat).or_default() += chips;
        if self.wager(seat) > previous_max {
            self.acted.clear();
        }
        self.acted.insert(seat);
        self.pointer = seat + 1;
    }

    pub fn record_fold(&mut self, seat: SeatIndex) {
        self.acted.insert(seat);
        self.pointer = seat + 1;
    }

    /// Next seat that owes an action, or `None` when the round is over.
    ///
    /// `funded` tells whether a seat still has chips behind; all-in players
    /// are skipped but stay in `active`.
    pub fn next_to_act(
        &self,
        active: &BTreeSet<SeatIndex>,
        num_seats: usize,
        funded: impl Fn(SeatIndex) -> bool,
    ) -> Option<SeatIndex> {
        if active.len() <= 1 {
            return None;
        }
        let max = self.max_wager();
        let can_act: Vec<SeatIndex> = active.iter().copied().filter(|&s| funded(s)).collect();
        if can_act.len() <= 1 && can_act.iter().all(|&s| self.wager(s) >= max) {
            return None;
        }
        clockwise(self.pointer % num_seats.max(1), num_seats).find(|seat| {
            can_act.contains(seat) && (!self.acted.contains(seat) || self.wager(*seat) < max)
        })
    }
}

/// Everything that lives for exactly one hand, from dealing to showdown.
#[derive(Debug)]
pub struct HandState {
    pub phase: Phase,
    pub dealer: SeatIndex,
    pub blinds: Blinds,
    pub pots: PotLedger,
    pub deck: Deck,
    pub board: Vec<Card>,
    pub holes: BTreeMap<SeatIndex, [Card; 2]>,
    /// Seats still contesting the hand. Only shrinks, via folds.
    pub active: BTreeSet<SeatIndex>,
    pub round: Option<BettingRound>,
    pub pending: Option<Decision>,
    pub record: HandRecord,
    /// Sum of all seated stacks when the hand began.
    pub chips_at_start: u64,
}
