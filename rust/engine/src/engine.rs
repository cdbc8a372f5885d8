use std::collections::{BTreeMap, BTreeSet};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info, warn};

use crate::cards::{format_cards, Card};
use crate::config::TableConfig;
use crate::deck::Deck;
use crate::errors::{ConfigError, GameError};
use crate::game::{clockwise, BettingRound, Decision, HandState, Phase, Street};
use crate::hand::{best_from_seven, BestHand};
use crate::history::{ActionRecord, HandIds, HandRecord, PotAward};
use crate::player::{PlayerAction, PlayerId};
use crate::pot::{split_evenly, PotLedger};
use crate::rules::{action_choices, validate_action, ValidatedAction};
use crate::table::{SeatIndex, Seating, Table};

/// What a call to [`Engine::step`] produced.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Progress {
    /// The hand moved into a new phase.
    Entered(Phase),
    /// Play is suspended until [`Engine::act`] resolves this decision.
    AwaitingAction(Decision),
    /// Showdown paid out; the next step starts a new hand.
    HandComplete(HandRecord),
}

/// Resumable Hold'em state machine for one table.
///
/// The engine never blocks: the driver calls [`Engine::step`] repeatedly and
/// answers every [`Progress::AwaitingAction`] with [`Engine::act`]. While a
/// decision is pending, stepping returns the same decision and changes
/// nothing, so a driver may poll freely or inject a fold on timeout.
///
/// # Examples
///
/// ```
/// use holdem_engine::config::TableConfig;
/// use holdem_engine::engine::Engine;
/// use holdem_engine::player::{Player, PlayerAction, PlayerId};
///
/// let config = TableConfig { seats: 4, seed: Some(7), ..TableConfig::default() };
/// let mut engine = Engine::from_config(config).unwrap();
/// engine.table_mut().unwrap().join(0, Player::new(PlayerId(1), 1_000)).unwrap();
/// engine.table_mut().unwrap().join(2, Player::new(PlayerId(2), 1_000)).unwrap();
///
/// // Everyone just calls or checks down.
/// let record = engine
///     .play_hand_with(|d| {
///         if d.to_call > 0 { PlayerAction::Call } else { PlayerAction::Check }
///     })
///     .unwrap();
/// assert_eq!(record.board.len(), 5);
/// assert_eq!(engine.chips_in_play(), 2_000);
/// ```
#[derive(Debug)]
pub struct Engine<T: Seating> {
    table: T,
    config: TableConfig,
    seeds: ChaCha20Rng,
    button: Option<SeatIndex>,
    hand: Option<HandState>,
    hand_ids: HandIds,
    preset_deck: Option<Deck>,
}

impl Engine<Table> {
    /// Validates `config` and builds an engine around an empty [`Table`].
    pub fn from_config(config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let table = Table::new(config.seats);
        Ok(Self::new(table, config))
    }
}

impl<T: Seating> Engine<T> {
    pub fn new(table: T, config: TableConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            table,
            config,
            seeds: ChaCha20Rng::seed_from_u64(seed),
            button: None,
            hand: None,
            hand_ids: HandIds::default(),
            preset_deck: None,
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    /// Seating may only change between hands.
    pub fn table_mut(&mut self) -> Result<&mut T, GameError> {
        if self.hand.is_some() {
            return Err(GameError::HandInProgress);
        }
        Ok(&mut self.table)
    }

    pub fn phase(&self) -> Phase {
        self.hand.as_ref().map_or(Phase::Init, |h| h.phase)
    }

    pub fn button(&self) -> Option<SeatIndex> {
        self.button
    }

    pub fn hand(&self) -> Option<&HandState> {
        self.hand.as_ref()
    }

    pub fn pending(&self) -> Option<&Decision> {
        self.hand.as_ref().and_then(|h| h.pending.as_ref())
    }

    /// Makes the next hand deal `cards` in order instead of shuffling.
    ///
    /// The list may be shorter than a full hand needs; dealing past its end
    /// aborts that hand with [`GameError::DeckExhausted`] and refunds the pots.
    pub fn preset_deck(&mut self, cards: Vec<Card>) -> Result<(), GameError> {
        self.preset_deck = Some(Deck::stacked(cards)?);
        Ok(())
    }

    /// Chips in seated stacks plus chips in the pots. Constant during a hand.
    pub fn chips_in_play(&self) -> u64 {
        let in_pots = self.hand.as_ref().map_or(0, |h| h.pots.total());
        table_chips(&self.table) + in_pots
    }

    /// Runs the current phase and moves to the next one.
    pub fn step(&mut self) -> Result<Progress, GameError> {
        let phase = match self.hand.as_ref() {
            None => return self.init_hand(),
            Some(hand) => hand.phase,
        };
        let Self { table, hand, .. } = self;
        let Some(state) = hand.as_mut() else {
            return Err(GameError::NoPendingDecision);
        };

        let next = match phase {
            Phase::Init | Phase::DealHole => deal_hole(table, state),
            Phase::PostBlinds => post_blinds(table, state),
            Phase::Betting(street) => match betting(table, state, street) {
                Ok(Ok(next)) => Ok(next),
                Ok(Err(decision)) => return Ok(Progress::AwaitingAction(decision)),
                Err(e) => Err(e),
            },
            Phase::DealFlop => deal_street(state, 3, Street::Flop),
            Phase::DealTurn => deal_street(state, 1, Street::Turn),
            Phase::DealRiver => deal_street(state, 1, Street::River),
            Phase::Showdown => match showdown(table, state) {
                Ok(record) => {
                    *hand = None;
                    return Ok(Progress::HandComplete(record));
                }
                Err(e) => Err(e),
            },
        };
        match next {
            Ok(next) => {
                state.phase = next;
                Ok(Progress::Entered(next))
            }
            Err(e) => {
                abort_hand(table, state, &e);
                *hand = None;
                Err(e)
            }
        }
    }

    /// Steps until a decision is needed or the hand completes.
    pub fn run_until_decision(&mut self) -> Result<Progress, GameError> {
        loop {
            match self.step()? {
                Progress::Entered(_) => continue,
                other => return Ok(other),
            }
        }
    }

    /// Plays the current (or a new) hand to completion, asking `decide` for
    /// every action.
    pub fn play_hand_with<F>(&mut self, mut decide: F) -> Result<HandRecord, GameError>
    where
        F: FnMut(&Decision) -> PlayerAction,
    {
        loop {
            match self.run_until_decision()? {
                Progress::AwaitingAction(decision) => {
                    let action = decide(&decision);
                    self.act(decision.seat, action)?;
                }
                Progress::HandComplete(record) => return Ok(record),
                Progress::Entered(_) => {}
            }
        }
    }

    /// Resolves the pending decision for `seat`.
    ///
    /// Rejected actions leave the hand exactly as it was, so the driver can
    /// ask again.
    pub fn act(&mut self, seat: SeatIndex, action: PlayerAction) -> Result<(), GameError> {
        let seats = self.table.num_seats();
        let Self { table, hand, .. } = self;
        let hand = hand.as_mut().ok_or(GameError::NoPendingDecision)?;
        let decision = hand.pending.clone().ok_or(GameError::NoPendingDecision)?;
        if decision.seat != seat {
            return Err(GameError::NotPlayersTurn {
                expected: decision.seat,
                actual: seat,
            });
        }
        let validated = validate_action(&decision.choices, decision.stack, decision.to_call, action)
            .inspect_err(|e| warn!(seat, error = %e, "rejected action"))?;
        let round = hand.round.as_mut().ok_or(GameError::NoPendingDecision)?;

        let posted = match validated {
            ValidatedAction::Fold => {
                hand.active.remove(&seat);
                round.record_fold(seat);
                0
            }
            other => {
                let player = table
                    .get_mut(seat)
                    .ok_or(GameError::InvalidSeat { seat, seats })?;
                let posted = hand.pots.post(player, other.chips());
                round.record(seat, posted);
                posted
            }
        };
        hand.pending = None;

        debug!(seat, player = %decision.player, ?action, posted, "action accepted");
        hand.record.actions.push(ActionRecord {
            seat,
            player: decision.player,
            street: decision.street,
            action,
            chips: posted,
        });
        Ok(())
    }

    fn init_hand(&mut self) -> Result<Progress, GameError> {
        let n = self.table.num_seats();
        let funded: BTreeSet<SeatIndex> = (0..n)
            .filter(|&s| self.table.get(s).is_some_and(|p| p.is_funded()))
            .collect();
        if funded.len() < 2 {
            return Err(GameError::GameOver {
                funded: funded.len(),
            });
        }
        // Any single stack must be able to hold every chip on the table.
        let total = table_chips(&self.table);
        if total > u64::from(u32::MAX) {
            return Err(GameError::ChipOverflow { total });
        }

        let start = self.button.map_or(0, |b| b + 1) % n;
        let dealer = clockwise(start, n)
            .find(|s| funded.contains(s))
            .ok_or(GameError::GameOver { funded: 0 })?;
        self.button = Some(dealer);

        let seed = self.seeds.next_u64();
        let (deck, seed) = match self.preset_deck.take() {
            Some(deck) => (deck, None),
            None => {
                let mut deck = Deck::seeded(seed);
                deck.shuffle();
                (deck, Some(seed))
            }
        };

        let blinds = self.config.blinds();
        let record = HandRecord::new(self.hand_ids.next_id(), seed, dealer, blinds);
        info!(
            hand_id = %record.hand_id,
            dealer,
            players = funded.len(),
            %blinds,
            "hand started"
        );

        self.hand = Some(HandState {
            phase: Phase::DealHole,
            dealer,
            blinds,
            pots: PotLedger::new(),
            deck,
            board: Vec::with_capacity(5),
            holes: BTreeMap::new(),
            active: funded,
            round: None,
            pending: None,
            record,
            chips_at_start: total,
        });
        Ok(Progress::Entered(Phase::DealHole))
    }
}

fn table_chips<T: Seating>(table: &T) -> u64 {
    (0..table.num_seats())
        .filter_map(|s| table.get(s))
        .map(|p| u64::from(p.chips()))
        .sum()
}

/// Returns every chip still in the pots to whoever committed it.
fn abort_hand<T: Seating>(table: &mut T, hand: &mut HandState, error: &GameError) {
    let mut refunded = 0u64;
    for seat in 0..table.num_seats() {
        let Some(player) = table.get_mut(seat) else {
            continue;
        };
        let committed = hand.pots.committed(player.id());
        // Stacks were checked against the table total before the deal.
        if let Ok(back) = u32::try_from(committed) {
            player.add_chips(back);
            refunded += committed;
        }
    }
    hand.pots.clear();
    warn!(hand_id = %hand.record.hand_id, error = %error, refunded, "hand aborted");
}

fn next_active(hand: &HandState, from: SeatIndex, n: usize) -> Option<SeatIndex> {
    clockwise(from % n, n).find(|s| hand.active.contains(s))
}

fn deal_hole<T: Seating>(table: &T, hand: &mut HandState) -> Result<Phase, GameError> {
    let n = table.num_seats();
    for seat in clockwise((hand.dealer + 1) % n, n) {
        if !hand.active.contains(&seat) {
            continue;
        }
        let cards = hand.deck.deal(2)?;
        hand.holes.insert(seat, [cards[0], cards[1]]);
    }
    debug!(players = hand.holes.len(), "dealt hole cards");
    Ok(Phase::PostBlinds)
}

fn post_blinds<T: Seating>(table: &mut T, hand: &mut HandState) -> Result<Phase, GameError> {
    let n = table.num_seats();
    let missing = GameError::GameOver {
        funded: hand.active.len(),
    };
    // Heads-up the button posts the small blind.
    let small = if hand.active.len() == 2 {
        hand.dealer
    } else {
        next_active(hand, hand.dealer + 1, n).ok_or(missing.clone())?
    };
    let big = next_active(hand, small + 1, n).ok_or(missing)?;

    let mut round = BettingRound::new(Street::Preflop, big + 1);
    for (seat, amount) in [(small, hand.blinds.small), (big, hand.blinds.big)] {
        let player = table
            .get_mut(seat)
            .ok_or(GameError::InvalidSeat { seat, seats: n })?;
        let posted = hand.pots.post(player, amount);
        round.force(seat, posted);
    }
    info!(small, big, blinds = %hand.blinds, "blinds posted");
    hand.round = Some(round);
    Ok(Phase::Betting(Street::Preflop))
}

/// `Ok(phase)` when the round is over, `Err(decision)` when someone must act.
fn betting<T: Seating>(
    table: &T,
    hand: &mut HandState,
    street: Street,
) -> Result<Result<Phase, Decision>, GameError> {
    if let Some(decision) = &hand.pending {
        return Ok(Err(decision.clone()));
    }
    let n = table.num_seats();
    let round = hand
        .round
        .get_or_insert_with(|| BettingRound::new(street, hand.dealer + 1));
    let funded = |s: SeatIndex| table.get(s).is_some_and(|p| p.is_funded());

    match round.next_to_act(&hand.active, n, funded) {
        Some(seat) => {
            let player = table
                .get(seat)
                .ok_or(GameError::InvalidSeat { seat, seats: n })?;
            let to_call = round.to_call(seat);
            let decision = Decision {
                seat,
                player: player.id(),
                street,
                choices: action_choices(player.chips(), to_call, round.opened()),
                to_call,
                stack: player.chips(),
            };
            debug!(seat, %street, to_call, choices = %decision.choices, "awaiting action");
            hand.pending = Some(decision.clone());
            Ok(Err(decision))
        }
        None => {
            hand.round = None;
            let next = if hand.active.len() <= 1 {
                Phase::Showdown
            } else {
                Phase::after_betting(street)
            };
            debug!(%street, pots = hand.pots.total(), "betting round over");
            Ok(Ok(next))
        }
    }
}

fn deal_street(hand: &mut HandState, count: usize, street: Street) -> Result<Phase, GameError> {
    hand.deck.burn_card()?;
    let cards = hand.deck.deal(count)?;
    hand.board.extend_from_slice(&cards);
    info!(%street, board = %format_cards(&hand.board), "dealt");
    hand.round = Some(BettingRound::new(street, hand.dealer + 1));
    Ok(Phase::Betting(street))
}

fn showdown<T: Seating>(table: &mut T, hand: &mut HandState) -> Result<HandRecord, GameError> {
    let n = table.num_seats();
    // Payout order: first seat after the button, clockwise.
    let order: Vec<SeatIndex> = clockwise((hand.dealer + 1) % n, n)
        .filter(|s| hand.active.contains(s))
        .collect();
    let mut ids: BTreeMap<SeatIndex, PlayerId> = BTreeMap::new();
    for &seat in &order {
        let player = table
            .get(seat)
            .ok_or(GameError::InvalidSeat { seat, seats: n })?;
        ids.insert(seat, player.id());
    }

    let contested = order.len() > 1;
    let mut best: BTreeMap<SeatIndex, BestHand> = BTreeMap::new();
    if contested {
        for &seat in &order {
            let hole = hand.holes.get(&seat).copied().ok_or(GameError::DeckExhausted {
                requested: 2,
                remaining: hand.deck.remaining(),
            })?;
            let seven: [Card; 7] = [&hole[..], &hand.board[..]]
                .concat()
                .try_into()
                .map_err(|_| GameError::DeckExhausted {
                    requested: 5,
                    remaining: hand.board.len(),
                })?;
            let made = best_from_seven(&seven);
            info!(seat, player = %ids[&seat], hand = %made.category, "shows");
            hand.record.shown.push((ids[&seat], hole));
            best.insert(seat, made);
        }
    }

    // Settle every pot before touching a stack so a failure pays nobody.
    let mut payouts: Vec<(SeatIndex, u32)> = Vec::new();
    for share in hand.pots.list() {
        let mut eligible: Vec<SeatIndex> = order
            .iter()
            .copied()
            .filter(|s| share.contributors.contains(&ids[s]))
            .collect();
        if eligible.is_empty() {
            eligible = order.clone();
        }

        let top = eligible.iter().filter_map(|s| best.get(s)).map(BestHand::score).max();
        let winners: Vec<SeatIndex> = match top {
            Some(top) => eligible
                .iter()
                .copied()
                .filter(|s| best.get(s).is_some_and(|b| b.score() == top))
                .collect(),
            None => eligible,
        };
        let winning_hand = winners
            .first()
            .and_then(|s| best.get(s))
            .map(|b| b.category);

        let mut paid = Vec::with_capacity(winners.len());
        for (seat, chips) in split_evenly(share.total, &winners) {
            let amount =
                u32::try_from(chips).map_err(|_| GameError::ChipOverflow { total: chips })?;
            payouts.push((seat, amount));
            paid.push((ids[&seat], chips));
        }
        info!(pot = share.index, amount = share.total, winners = ?paid, "pot awarded");
        hand.record.awards.push(PotAward {
            pot: share.index,
            amount: share.total,
            winners: paid,
            hand: winning_hand,
        });
    }
    hand.pots.clear();
    for (seat, amount) in payouts {
        let player = table
            .get_mut(seat)
            .ok_or(GameError::InvalidSeat { seat, seats: n })?;
        player.add_chips(amount);
    }

    let actual = table_chips(table);
    if actual != hand.chips_at_start {
        return Err(GameError::ChipConservation {
            expected: hand.chips_at_start,
            actual,
        });
    }

    hand.record.board = hand.board.clone();
    Ok(hand.record.clone())
}
