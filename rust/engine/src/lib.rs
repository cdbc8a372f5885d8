//! # holdem-engine: Texas Hold'em Rules Engine
//!
//! Card ranking, multi-way side pots and a resumable betting state machine
//! that drives a hand from the deal to the showdown. Seating, player
//! identity and the input loop stay outside the engine.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and text parsing
//! - [`deck`] - Seeded deck shuffling with ChaCha20 RNG
//! - [`hand`] - Five-card classification and best-of-seven selection
//! - [`pot`] - Pot ledger with side pots for all-in players
//! - [`rules`] - Capability sets and action validation
//! - [`game`] - Streets, phases and per-hand state
//! - [`engine`] - The resumable hand state machine
//! - [`table`] - Seating trait and an in-memory table
//! - [`player`] - Player identity, stacks and actions
//! - [`history`] - In-memory hand records
//! - [`config`] - Table configuration (TOML file and environment)
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::cards::parse_cards;
//! use holdem_engine::hand::{best_from_seven, Category};
//!
//! let cards: [_; 7] = parse_cards("ah kh qh jh th 2c 3d")
//!     .unwrap()
//!     .try_into()
//!     .unwrap();
//! let best = best_from_seven(&cards);
//! assert_eq!(best.category.category(), Category::StraightFlush);
//! println!("{}", best.category); // Straight Flush, Ace High
//! ```
//!
//! ## Side Pots
//!
//! ```rust
//! use holdem_engine::player::{Player, PlayerId};
//! use holdem_engine::pot::PotLedger;
//!
//! let mut big = Player::new(PlayerId(1), 1_000);
//! let mut short = Player::new(PlayerId(2), 300);
//! let mut ledger = PotLedger::new();
//! ledger.post(&mut big, 500);
//! ledger.post(&mut short, 500); // all-in for 300
//!
//! let pots = ledger.list();
//! assert_eq!(pots[0].total, 600);
//! assert_eq!(pots[1].total, 200);
//! assert_eq!(pots[1].contributors, vec![PlayerId(1)]);
//! ```
//!
//! ## Driving a Hand
//!
//! [`engine::Engine::step`] advances one phase at a time and stops with
//! [`engine::Progress::AwaitingAction`] whenever a player must act; the
//! caller answers with [`engine::Engine::act`].

pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod history;
pub mod player;
pub mod pot;
pub mod rules;
pub mod table;
