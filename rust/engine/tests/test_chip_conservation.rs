use holdem_engine::config::TableConfig;
use holdem_engine::engine::{Engine, Progress};
use holdem_engine::errors::GameError;
use holdem_engine::game::Decision;
use holdem_engine::player::{Player, PlayerAction as A, PlayerId};
use holdem_engine::rules::ActionChoice as C;
use holdem_engine::table::Table;
use proptest::prelude::*;

/// Turns a random byte into a legal action for `d`.
fn pick(d: &Decision, byte: u8) -> A {
    let offered: Vec<C> = d.choices.iter().copied().collect();
    let choice = offered[byte as usize % offered.len()];
    let room = d.stack.saturating_sub(d.to_call).max(1);
    let size = 1 + (u32::from(byte) * 7) % room;
    match choice {
        C::Fold => A::Fold,
        C::Check => A::Check,
        C::Call => A::Call,
        C::Bet => A::Bet(size.min(d.stack)),
        C::Raise => A::Raise(size),
    }
}

fn seated(stacks: &[u32], seed: u64) -> Engine<Table> {
    let config = TableConfig {
        seats: stacks.len(),
        seed: Some(seed),
        ..TableConfig::default()
    };
    let mut eng = Engine::from_config(config).unwrap();
    let table = eng.table_mut().unwrap();
    for (seat, &chips) in stacks.iter().enumerate() {
        table.join(seat, Player::new(PlayerId(seat as u32), chips)).unwrap();
    }
    eng
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chips_are_conserved_across_hands(
        stacks in prop::collection::vec(1u32..400, 2..7),
        seed in any::<u64>(),
        bytes in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let mut eng = seated(&stacks, seed);
        let total: u64 = stacks.iter().map(|&c| u64::from(c)).sum();
        let mut next = bytes.iter().cycle();
        let mut hands = 0;

        while hands < 6 {
            let progress = match eng.step() {
                Ok(p) => p,
                Err(GameError::GameOver { .. }) => break,
                Err(e) => return Err(TestCaseError::fail(e.to_string())),
            };
            prop_assert_eq!(eng.chips_in_play(), total);
            match progress {
                Progress::AwaitingAction(d) => {
                    let byte = next.next().copied().unwrap_or(0);
                    eng.act(d.seat, pick(&d, byte)).unwrap();
                    prop_assert_eq!(eng.chips_in_play(), total);
                }
                Progress::HandComplete(record) => {
                    let paid: u64 = record.awards.iter().map(|a| a.amount).sum();
                    prop_assert!(paid > 0);
                    hands += 1;
                }
                Progress::Entered(_) => {}
            }
        }
    }
}
