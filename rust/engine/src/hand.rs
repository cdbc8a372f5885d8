use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

/// Hand categories ordered weakest to strongest. The discriminant is the
/// category rank used as the most significant digit of [`HandCategory::score`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

/// A classified five-card hand together with the ranks needed to break ties
/// inside its category.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    StraightFlush { high: Rank },
    FourOfAKind { quads: Rank, kicker: Rank },
    FullHouse { trips: Rank, pair: Rank },
    /// Ranks high to low.
    Flush { ranks: [Rank; 5] },
    /// A wheel (A-2-3-4-5) has `high == Five`.
    Straight { high: Rank },
    ThreeOfAKind { trips: Rank, kickers: [Rank; 2] },
    TwoPair { high: Rank, low: Rank, kicker: Rank },
    Pair { pair: Rank, kickers: [Rank; 3] },
    HighCard { ranks: [Rank; 5] },
}

const BASE: u32 = 13;

impl HandCategory {
    pub fn category(&self) -> Category {
        match self {
            HandCategory::StraightFlush { .. } => Category::StraightFlush,
            HandCategory::FourOfAKind { .. } => Category::FourOfAKind,
            HandCategory::FullHouse { .. } => Category::FullHouse,
            HandCategory::Flush { .. } => Category::Flush,
            HandCategory::Straight { .. } => Category::Straight,
            HandCategory::ThreeOfAKind { .. } => Category::ThreeOfAKind,
            HandCategory::TwoPair { .. } => Category::TwoPair,
            HandCategory::Pair { .. } => Category::OnePair,
            HandCategory::HighCard { .. } => Category::HighCard,
        }
    }

    /// Tie-break ranks, most significant first.
    pub fn tie_breaks(&self) -> Vec<Rank> {
        match *self {
            HandCategory::StraightFlush { high } | HandCategory::Straight { high } => vec![high],
            HandCategory::FourOfAKind { quads, kicker } => vec![quads, kicker],
            HandCategory::FullHouse { trips, pair } => vec![trips, pair],
            HandCategory::Flush { ranks } | HandCategory::HighCard { ranks } => ranks.to_vec(),
            HandCategory::ThreeOfAKind { trips, kickers } => {
                vec![trips, kickers[0], kickers[1]]
            }
            HandCategory::TwoPair { high, low, kicker } => vec![high, low, kicker],
            HandCategory::Pair { pair, kickers } => vec![pair, kickers[0], kickers[1], kickers[2]],
        }
    }

    /// Single integer giving the total order over all hands.
    ///
    /// The category occupies the `13^5` digit and the tie-break ranks fill the
    /// lower base-13 digits, right aligned. With at most five tie-break ranks
    /// each contributing `0..=12`, a category never reaches the next one.
    pub fn score(&self) -> u32 {
        let tie_breaks = self.tie_breaks();
        let n = tie_breaks.len() as u32;
        let kickers: u32 = tie_breaks
            .iter()
            .enumerate()
            .map(|(i, r)| (r.value() as u32 - 2) * BASE.pow(n - 1 - i as u32))
            .sum();
        self.category() as u32 * BASE.pow(5) + kickers
    }
}

impl Ord for HandCategory {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score().cmp(&other.score())
    }
}

impl PartialOrd for HandCategory {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn names(ranks: &[Rank]) -> String {
    ranks.iter().map(|r| r.name()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandCategory::StraightFlush { high } => {
                write!(f, "Straight Flush, {} High", high.name())
            }
            HandCategory::FourOfAKind { quads, kicker } => write!(
                f,
                "Four of a Kind of {}, kicker {}",
                quads.plural(),
                kicker.name()
            ),
            HandCategory::FullHouse { trips, pair } => {
                write!(f, "Full House, {} over {}", trips.plural(), pair.plural())
            }
            HandCategory::Flush { ranks } => write!(f, "Flush with {}", names(ranks)),
            HandCategory::Straight { high } => write!(f, "Straight, {} High", high.name()),
            HandCategory::ThreeOfAKind { trips, kickers } => write!(
                f,
                "Three of a Kind of {} with {}",
                trips.plural(),
                names(kickers)
            ),
            HandCategory::TwoPair { high, low, kicker } => write!(
                f,
                "Two Pair of {} and {}, kicker {}",
                high.plural(),
                low.plural(),
                kicker.name()
            ),
            HandCategory::Pair { pair, kickers } => {
                write!(f, "Pair of {} with {}", pair.plural(), names(kickers))
            }
            HandCategory::HighCard { ranks } => write!(f, "High Card {}", names(ranks)),
        }
    }
}

/// Classifies exactly five cards. Cards are assumed distinct.
pub fn classify(cards: &[Card; 5]) -> HandCategory {
    let mut ranks: [Rank; 5] = (*cards).map(|c| c.rank);
    ranks.sort_unstable();
    let descending = [ranks[4], ranks[3], ranks[2], ranks[1], ranks[0]];

    let straight = detect_straight_high(&ranks);
    let flush = cards.iter().all(|c| c.suit == cards[0].suit);

    match (straight, flush) {
        (Some(high), true) => return HandCategory::StraightFlush { high },
        (None, true) => return HandCategory::Flush { ranks: descending },
        (Some(high), false) => return HandCategory::Straight { high },
        (None, false) => {}
    }

    let groups = group_by_multiplicity(&descending);
    let quads = ranks_with(&groups, 4);
    let trips = ranks_with(&groups, 3);
    let pairs = ranks_with(&groups, 2);
    let singles = ranks_with(&groups, 1);

    if let (Some(&quads), Some(&kicker)) = (quads.first(), singles.first()) {
        return HandCategory::FourOfAKind { quads, kicker };
    }
    if let Some(&trips) = trips.first() {
        if let Some(&pair) = pairs.first() {
            return HandCategory::FullHouse { trips, pair };
        }
        return HandCategory::ThreeOfAKind {
            trips,
            kickers: [singles[0], singles[1]],
        };
    }
    match pairs.as_slice() {
        [high, low] => HandCategory::TwoPair {
            high: *high,
            low: *low,
            kicker: singles[0],
        },
        [pair] => HandCategory::Pair {
            pair: *pair,
            kickers: [singles[0], singles[1], singles[2]],
        },
        _ => HandCategory::HighCard { ranks: descending },
    }
}

/// Highest card of a five-card straight given ascending ranks. The wheel
/// reports Five as its high card.
fn detect_straight_high(ascending: &[Rank; 5]) -> Option<Rank> {
    let values = (*ascending).map(Rank::value);
    if values == [2, 3, 4, 5, 14] {
        return Some(Rank::Five);
    }
    let consecutive = values.windows(2).all(|w| w[1] == w[0] + 1);
    consecutive.then_some(ascending[4])
}

/// `(rank, count)` pairs in descending rank order.
fn group_by_multiplicity(descending: &[Rank; 5]) -> Vec<(Rank, usize)> {
    let mut groups: Vec<(Rank, usize)> = Vec::with_capacity(5);
    for &r in descending {
        match groups.last_mut() {
            Some((rank, count)) if *rank == r => *count += 1,
            _ => groups.push((r, 1)),
        }
    }
    groups
}

fn ranks_with(groups: &[(Rank, usize)], count: usize) -> Vec<Rank> {
    groups
        .iter()
        .filter(|(_, c)| *c == count)
        .map(|(r, _)| *r)
        .collect()
}

/// The strongest five-card hand found among seven cards.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BestHand {
    pub category: HandCategory,
    /// The five cards that make the hand, in canonical card order.
    pub cards: [Card; 5],
}

impl BestHand {
    pub fn score(&self) -> u32 {
        self.category.score()
    }
}

/// Finds the best five-card hand out of seven by dropping every pair of
/// cards in turn (21 candidates).
///
/// Input order does not matter: the cards are sorted before enumeration, so
/// even the chosen five cards are stable when several subsets tie.
pub fn best_from_seven(cards: &[Card; 7]) -> BestHand {
    let mut sorted = *cards;
    sorted.sort_unstable();

    let without = |skip_a: usize, skip_b: usize| -> [Card; 5] {
        let mut five = [sorted[0]; 5];
        let kept = (0..7).filter(|&i| i != skip_a && i != skip_b);
        for (slot, i) in five.iter_mut().zip(kept) {
            *slot = sorted[i];
        }
        five
    };

    let first = without(5, 6);
    let mut best = BestHand {
        category: classify(&first),
        cards: first,
    };
    for skip_a in 0..7 {
        for skip_b in (skip_a + 1)..7 {
            let five = without(skip_a, skip_b);
            let category = classify(&five);
            if category.score() > best.score() {
                best = BestHand {
                    category,
                    cards: five,
                };
            }
        }
    }
    best
}

pub fn compare_hands(a: &HandCategory, b: &HandCategory) -> Ordering {
    a.score().cmp(&b.score())
}
