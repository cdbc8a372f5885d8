use holdem_engine::cards::{full_deck, parse_cards, Card, Rank as R};
use holdem_engine::hand::{best_from_seven, classify, compare_hands, Category, HandCategory};
use proptest::prelude::*;
use proptest::sample::subsequence;

fn five(s: &str) -> HandCategory {
    let cards: [Card; 5] = parse_cards(s).unwrap().try_into().unwrap();
    classify(&cards)
}

fn seven(s: &str) -> HandCategory {
    let cards: [Card; 7] = parse_cards(s).unwrap().try_into().unwrap();
    best_from_seven(&cards).category
}

const LADDER: [(&str, Category); 9] = [
    ("kc as 9d 3h 2d", Category::HighCard),
    ("7c 4s 4d th jd", Category::OnePair),
    ("2c 2s 3d 3h jd", Category::TwoPair),
    ("3c 3h 3d td js", Category::ThreeOfAKind),
    ("9c 8h 7d td jh", Category::Straight),
    ("7h 8h 2h th jh", Category::Flush),
    ("3h 3c 3s tc th", Category::FullHouse),
    ("7h 7s 7c 7d jh", Category::FourOfAKind),
    ("7h 8h 9h th jh", Category::StraightFlush),
];

#[test]
fn classifies_every_category() {
    for (hand, category) in LADDER {
        assert_eq!(five(hand).category(), category, "{hand}");
    }
}

#[test]
fn canonical_hands_are_strictly_ordered() {
    for pair in LADDER.windows(2) {
        let (weaker, stronger) = (five(pair[0].0), five(pair[1].0));
        assert!(weaker < stronger, "{} !< {}", pair[0].0, pair[1].0);
        assert!(compare_hands(&stronger, &weaker).is_gt());
    }
}

#[test]
fn tie_break_ranks() {
    assert_eq!(
        five("3h 3c 3s tc th"),
        HandCategory::FullHouse {
            trips: R::Three,
            pair: R::Ten
        }
    );
    assert_eq!(
        five("7h 7s 7c 7d jh"),
        HandCategory::FourOfAKind {
            quads: R::Seven,
            kicker: R::Jack
        }
    );
    assert_eq!(
        five("kc as 9d 3h 2d"),
        HandCategory::HighCard {
            ranks: [R::Ace, R::King, R::Nine, R::Three, R::Two]
        }
    );
}

#[test]
fn wheel_is_five_high() {
    assert_eq!(five("ah 2c 3d 4s 5h"), HandCategory::Straight { high: R::Five });
    assert_eq!(
        five("as 2s 3s 4s 5s"),
        HandCategory::StraightFlush { high: R::Five }
    );
    assert!(five("ah 2c 3d 4s 5h") < five("2h 3c 4d 5s 6h"));
    // No wrap-around straights.
    assert_eq!(five("qh kc ad 2s 3h").category(), Category::HighCard);
}

#[test]
fn score_is_category_then_kickers() {
    assert_eq!(five("ah kh qh jh th").score(), 8 * 13u32.pow(5) + 12);
    assert_eq!(
        five("2c 3d 4h 5s 7c").score(),
        5 * 13u32.pow(4) + 3 * 13u32.pow(3) + 2 * 13u32.pow(2) + 13
    );
    // The strongest hand of a category stays below the weakest of the next.
    let best_pair = five("ah ad kc qs jh");
    let worst_two_pair = five("2h 2d 3c 3s 4h");
    assert!(best_pair.score() < worst_two_pair.score());
    assert!(best_pair.score() < 2 * 13u32.pow(5));
}

#[test]
fn relative_straights() {
    let h1 = seven("ah kc qd js th 3s 4d");
    let h2 = seven("ah kc 8d 5s 2h 3s 4d");
    assert_eq!(h1, HandCategory::Straight { high: R::Ace });
    assert_eq!(h2, HandCategory::Straight { high: R::Five });
    assert!(h1 > h2);
}

#[test]
fn relative_two_pairs() {
    let h1 = seven("kd 9h 8s 4d 8h 5s kc");
    let h2 = seven("4s qc kd 9h 8s 4d 8h");
    assert_eq!(
        h1,
        HandCategory::TwoPair {
            high: R::King,
            low: R::Eight,
            kicker: R::Nine
        }
    );
    assert_eq!(
        h2,
        HandCategory::TwoPair {
            high: R::Eight,
            low: R::Four,
            kicker: R::King
        }
    );
    assert!(h1 > h2);
}

#[test]
fn relative_pairs_and_kickers() {
    let eights = seven("jd 9h 8s 4d 8h 5s kc");
    let queens = seven("2s qc qd 9h 8s 4d 7h");
    assert_eq!(
        eights,
        HandCategory::Pair {
            pair: R::Eight,
            kickers: [R::King, R::Jack, R::Nine]
        }
    );
    assert_eq!(
        queens,
        HandCategory::Pair {
            pair: R::Queen,
            kickers: [R::Nine, R::Eight, R::Seven]
        }
    );
    assert!(queens > eights);

    let better_kicker = seven("8s qc kd 9h 8c 4d 7h");
    assert_eq!(
        better_kicker,
        HandCategory::Pair {
            pair: R::Eight,
            kickers: [R::King, R::Queen, R::Nine]
        }
    );
    assert!(better_kicker > eights);
}

#[test]
fn descriptions() {
    assert_eq!(five("7h 8h 9h th jh").to_string(), "Straight Flush, Jack High");
    assert_eq!(five("7h 7s 7c 7d jh").to_string(), "Four of a Kind of Sevens, kicker Jack");
    assert_eq!(five("3h 3c 3s tc th").to_string(), "Full House, Threes over Tens");
    assert_eq!(five("6h 6c 6s tc th").to_string(), "Full House, Sixes over Tens");
    assert_eq!(
        five("2c 2s 3d 3h jd").to_string(),
        "Two Pair of Threes and Twos, kicker Jack"
    );
    assert_eq!(five("7c 4s 4d th jd").to_string(), "Pair of Fours with Jack, Ten, Seven");
    assert_eq!(
        five("kc as 9d 3h 2d").to_string(),
        "High Card Ace, King, Nine, Three, Two"
    );
}

#[test]
fn best_hand_cards_match_category() {
    let cards: [Card; 7] = parse_cards("2c 9h 9d 4s 9s kh kd").unwrap().try_into().unwrap();
    let best = best_from_seven(&cards);
    assert_eq!(
        best.category,
        HandCategory::FullHouse {
            trips: R::Nine,
            pair: R::King
        }
    );
    assert_eq!(classify(&best.cards), best.category);
}

fn seven_cards() -> impl Strategy<Value = (Vec<Card>, Vec<Card>)> {
    subsequence(full_deck(), 7).prop_flat_map(|cards| (Just(cards.clone()), Just(cards).prop_shuffle()))
}

proptest! {
    #[test]
    fn best_from_seven_ignores_input_order((cards, shuffled) in seven_cards()) {
        let a: [Card; 7] = cards.try_into().unwrap();
        let b: [Card; 7] = shuffled.try_into().unwrap();
        prop_assert_eq!(best_from_seven(&a), best_from_seven(&b));
    }

    #[test]
    fn best_from_seven_beats_every_subset((cards, _) in seven_cards()) {
        let all: [Card; 7] = cards.clone().try_into().unwrap();
        let best = best_from_seven(&all);
        prop_assert_eq!(classify(&best.cards), best.category);
        for skip_a in 0..7 {
            for skip_b in (skip_a + 1)..7 {
                let subset: Vec<Card> = cards
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip_a && *i != skip_b)
                    .map(|(_, c)| *c)
                    .collect();
                let subset: [Card; 5] = subset.try_into().unwrap();
                prop_assert!(classify(&subset).score() <= best.score());
            }
        }
    }
}
