// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! Hexbet cards types.
//!
//! This crate define the cards used by the hand simulator:
//!
//! ```
//! # use hexbet_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! let td = Card::new(Rank::Ten, Suit::Diamonds);
//! assert_eq!(td.to_string(), "T♦");
//! ```
//!
//! and a [Deck] type that is shuffled once per hand and consumed from the front:
//!
//! ```
//! # use hexbet_cards::Deck;
//! let mut deck = Deck::new_and_shuffled(&mut rand::rng());
//! deck.burn().unwrap();
//! let _card = deck.draw().unwrap();
//! assert_eq!(deck.count(), Deck::SIZE - 2);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, Deck, DeckExhausted, Rank, Suit};
