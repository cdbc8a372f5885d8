//! Seating: a fixed ring of seats, each empty or holding a [`Player`].
//!
//! The engine only talks to seats through [`Seating`]; [`Table`] is the
//! in-memory implementation used by drivers and tests.

use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::{Player, PlayerId};

pub type SeatIndex = usize;

pub trait Seating {
    fn num_seats(&self) -> usize;

    /// Occupant of `seat`. Indices wrap around the table.
    fn get(&self, seat: SeatIndex) -> Option<&Player>;

    fn get_mut(&mut self, seat: SeatIndex) -> Option<&mut Player>;

    /// First occupied seat at or after `from`, searching around the table.
    fn find(&self, from: SeatIndex) -> Option<SeatIndex> {
        let n = self.num_seats();
        (0..n)
            .map(|offset| (from + offset) % n)
            .find(|&seat| self.get(seat).is_some())
    }

    fn occupied(&self) -> usize {
        (0..self.num_seats())
            .filter(|&seat| self.get(seat).is_some())
            .count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    seats: Vec<Option<Player>>,
}

impl Table {
    pub fn new(num_seats: usize) -> Self {
        Self {
            seats: vec![None; num_seats],
        }
    }

    pub fn join(&mut self, seat: SeatIndex, player: Player) -> Result<(), GameError> {
        let seats = self.seats.len();
        let slot = self
            .seats
            .get_mut(seat)
            .ok_or(GameError::InvalidSeat { seat, seats })?;
        if slot.is_some() {
            return Err(GameError::SeatOccupied(seat));
        }
        *slot = Some(player);
        Ok(())
    }

    pub fn leave(&mut self, id: PlayerId) -> Result<Player, GameError> {
        self.seats
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|p| p.id() == id))
            .and_then(Option::take)
            .ok_or(GameError::PlayerNotSeated(id))
    }

    pub fn seat_of(&self, id: PlayerId) -> Option<SeatIndex> {
        self.seats
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|p| p.id() == id))
    }

    pub fn free(&self) -> impl Iterator<Item = SeatIndex> + '_ {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(i, _)| i)
    }

    pub fn players(&self) -> impl Iterator<Item = (SeatIndex, &Player)> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|p| (i, p)))
    }
}

impl Seating for Table {
    fn num_seats(&self) -> usize {
        self.seats.len()
    }

    fn get(&self, seat: SeatIndex) -> Option<&Player> {
        if self.seats.is_empty() {
            return None;
        }
        self.seats[seat % self.seats.len()].as_ref()
    }

    fn get_mut(&mut self, seat: SeatIndex) -> Option<&mut Player> {
        if self.seats.is_empty() {
            return None;
        }
        let n = self.seats.len();
        self.seats[seat % n].as_mut()
    }
}
