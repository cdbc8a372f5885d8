//! Main and side pot accounting.
//!
//! Chips are posted one player at a time into an ordered list of pots. A pot
//! becomes *limited* when someone goes all-in into it: its per-player cap is
//! fixed at that player's stake, stakes above the cap move to a side pot
//! directly after it, and later posts spill past it into higher pots.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::player::PlayerId;

/// Anything holding a mutable chip balance that can be posted into pots.
pub trait Stack {
    fn id(&self) -> PlayerId;
    fn chips(&self) -> u32;
    fn chips_mut(&mut self) -> &mut u32;
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pot {
    /// Contributions in first-posted order.
    stakes: Vec<(PlayerId, u32)>,
    /// Per-player cap once an all-in limited this pot.
    cap: Option<u32>,
}

impl Pot {
    fn limited(cap: u32) -> Self {
        Self {
            stakes: Vec::new(),
            cap: Some(cap),
        }
    }

    pub fn stake(&self, id: PlayerId) -> u32 {
        self.stakes
            .iter()
            .find(|(p, _)| *p == id)
            .map_or(0, |(_, chips)| *chips)
    }

    fn add(&mut self, id: PlayerId, chips: u32) {
        if chips == 0 {
            return;
        }
        match self.stakes.iter_mut().find(|(p, _)| *p == id) {
            Some((_, stake)) => *stake += chips,
            None => self.stakes.push((id, chips)),
        }
    }

    pub fn cap(&self) -> Option<u32> {
        self.cap
    }

    pub fn is_limited(&self) -> bool {
        self.cap.is_some()
    }

    pub fn stakes(&self) -> &[(PlayerId, u32)] {
        &self.stakes
    }

    pub fn contributors(&self) -> Vec<PlayerId> {
        self.stakes.iter().map(|(p, _)| *p).collect()
    }

    pub fn total(&self) -> u64 {
        self.stakes.iter().map(|(_, c)| u64::from(*c)).sum()
    }

    /// Caps the pot at `level` and returns the layer above it, if any.
    ///
    /// The returned pot inherits what is left of a previous cap, so it stays
    /// limited when this pot already was.
    fn limit_at(&mut self, level: u32) -> Option<Pot> {
        let previous = self.cap;
        if previous.is_some_and(|cap| cap <= level) {
            return None;
        }
        self.cap = Some(level);

        let mut side = Pot {
            stakes: Vec::new(),
            cap: previous.map(|cap| cap - level),
        };
        for (id, stake) in self.stakes.iter_mut() {
            if *stake > level {
                side.stakes.push((*id, *stake - level));
                *stake = level;
            }
        }
        (!side.stakes.is_empty()).then_some(side)
    }
}

/// A non-empty pot as seen by showdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PotShare {
    pub index: usize,
    pub contributors: Vec<PlayerId>,
    pub total: u64,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PotLedger {
    pots: Vec<Pot>,
}

impl PotLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.pots.clear();
    }

    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    pub fn total(&self) -> u64 {
        self.pots.iter().map(Pot::total).sum()
    }

    /// Chips `id` has in all pots together.
    pub fn committed(&self, id: PlayerId) -> u64 {
        self.pots.iter().map(|p| u64::from(p.stake(id))).sum()
    }

    /// Moves up to `chips` from `player` into the pots and returns the amount
    /// actually taken, which is `min(chips, player.chips())`.
    pub fn post<S: Stack + ?Sized>(&mut self, player: &mut S, chips: u32) -> u32 {
        let id = player.id();
        let before = player.chips();
        let total_before = self.total();

        if self.pots.is_empty() {
            self.pots.push(Pot::default());
        }

        let mut remaining = chips;
        let mut idx = 0;
        while idx < self.pots.len() && player.chips() > 0 && remaining > 0 {
            let pot = &mut self.pots[idx];
            let stake = pot.stake(id);

            let mut amount = remaining;
            if let Some(cap) = pot.cap {
                amount = amount.min(cap.saturating_sub(stake));
            }
            let all_in = amount >= player.chips();
            if all_in {
                amount = player.chips();
            }

            *player.chips_mut() -= amount;
            pot.add(id, amount);
            remaining -= amount;
            debug!(player = %id, amount, pot = idx, all_in, "posted");

            if all_in {
                if let Some(side) = pot.limit_at(stake + amount) {
                    debug!(
                        pot = idx,
                        cap = stake + amount,
                        moved = side.total(),
                        "split side pot"
                    );
                    self.pots.insert(idx + 1, side);
                }
            }
            idx += 1;
        }

        // Every existing pot is capped below what this player still wants to
        // put in: open a new pot above them.
        if player.chips() > 0 && remaining > 0 {
            let amount = remaining.min(player.chips());
            let mut pot = if amount == player.chips() {
                Pot::limited(amount)
            } else {
                Pot::default()
            };
            *player.chips_mut() -= amount;
            pot.add(id, amount);
            debug!(player = %id, amount, pot = self.pots.len(), "opened pot");
            self.pots.push(pot);
        }

        let posted = before - player.chips();
        debug_assert_eq!(posted, chips.min(before));
        debug_assert_eq!(self.total(), total_before + u64::from(posted));
        posted
    }

    /// Non-empty pots in index order with their contributors and totals.
    pub fn list(&self) -> Vec<PotShare> {
        self.pots
            .iter()
            .enumerate()
            .filter(|(_, pot)| !pot.stakes.is_empty())
            .map(|(index, pot)| PotShare {
                index,
                contributors: pot.contributors(),
                total: pot.total(),
            })
            .collect()
    }
}

/// Splits `total` evenly across `winners` (already in payout order).
///
/// An indivisible remainder goes one chip at a time to the earliest winners.
pub fn split_evenly<T: Copy>(total: u64, winners: &[T]) -> Vec<(T, u64)> {
    if winners.is_empty() {
        return Vec::new();
    }
    let n = winners.len() as u64;
    let share = total / n;
    let odd = (total % n) as usize;
    winners
        .iter()
        .enumerate()
        .map(|(i, w)| (*w, share + u64::from(i < odd)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ps {
        id: PlayerId,
        chips: u32,
    }

    impl Stack for Ps {
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

    fn ps(id: u32, chips: u32) -> Ps {
        Ps {
            id: PlayerId(id),
            chips,
        }
    }

    #[test]
    fn main_pot_simple() {
        let mut ledger = PotLedger::new();
        let mut p1 = ps(1, 1000);
        assert_eq!(ledger.post(&mut p1, 500), 500);
        assert_eq!(p1.chips, 500);
        assert_eq!(ledger.pots()[0].stake(PlayerId(1)), 500);
        assert!(!ledger.pots()[0].is_limited());
    }

    #[test]
    fn all_in_call_limits_without_split_when_stakes_match() {
        let mut ledger = PotLedger::new();
        let mut p1 = ps(1, 1000);
        let mut p2 = ps(2, 500);
        ledger.post(&mut p1, 500);
        ledger.post(&mut p2, 500);
        assert_eq!(ledger.pots().len(), 1);
        assert_eq!(ledger.pots()[0].cap(), Some(500));
    }

    #[test]
    fn short_all_in_moves_excess_to_side_pot() {
        let mut ledger = PotLedger::new();
        let mut p1 = ps(1, 1000);
        let mut p3 = ps(3, 300);
        ledger.post(&mut p1, 500);
        assert_eq!(ledger.post(&mut p3, 500), 300);
        assert_eq!(p3.chips, 0);
        assert_eq!(ledger.pots()[0].stake(PlayerId(3)), 300);
        assert_eq!(ledger.pots()[0].stake(PlayerId(1)), 300);
        assert_eq!(ledger.pots()[1].stake(PlayerId(1)), 200);
        assert_eq!(ledger.pots()[1].stake(PlayerId(3)), 0);
    }

    #[test]
    fn opening_shove_limits_the_new_pot() {
        let mut ledger = PotLedger::new();
        let mut p1 = ps(1, 300);
        let mut p2 = ps(2, 1000);
        ledger.post(&mut p1, 300);
        ledger.post(&mut p2, 700);
        let list = ledger.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].total, 600);
        assert_eq!(list[1].contributors, vec![PlayerId(2)]);
        assert_eq!(list[1].total, 400);
    }

    #[test]
    fn zero_post_creates_empty_main_pot_only() {
        let mut ledger = PotLedger::new();
        let mut p1 = ps(1, 100);
        assert_eq!(ledger.post(&mut p1, 0), 0);
        assert_eq!(ledger.pots().len(), 1);
        assert!(ledger.list().is_empty());
    }

    #[test]
    fn split_evenly_gives_odd_chips_to_first_winners() {
        assert_eq!(split_evenly(101, &['a', 'b']), vec![('a', 51), ('b', 50)]);
        assert_eq!(
            split_evenly(100, &['a', 'b', 'c']),
            vec![('a', 34), ('b', 33), ('c', 33)]
        );
        assert!(split_evenly::<char>(10, &[]).is_empty());
    }
}
