// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! Poker cards definitions.
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Poker card.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    /// Create a card given a rank and a suit.
    pub const fn new(rank: Rank, suit: Suit) -> Card {
        Self { rank, suit }
    }

    /// Returns the card suit.
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Returns the card rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({}{})", self.rank, self.suit)
    }
}

/// Card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Deuce
    Deuce = 0,
    /// Trey
    Trey,
    /// Four
    Four,
    /// Five
    Five,
    /// Six
    Six,
    /// Seven
    Seven,
    /// Eight
    Eight,
    /// Nine
    Nine,
    /// Ten
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace
    Ace,
}

impl Rank {
    /// Returns all ranks from ace down to deuce.
    pub fn ranks() -> impl DoubleEndedIterator<Item = Rank> {
        use Rank::*;
        [
            Ace, King, Queen, Jack, Ten, Nine, Eight, Seven, Six, Five, Four, Trey, Deuce,
        ]
        .into_iter()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self {
            Rank::Deuce => '2',
            Rank::Trey => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };

        write!(f, "{rank}")
    }
}

/// Card suit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    /// Spades suit.
    Spades,
    /// Hearts suit.
    Hearts,
    /// Diamonds suit.
    Diamonds,
    /// Clubs suit.
    Clubs,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        };

        write!(f, "{suit}")
    }
}

impl Suit {
    /// Returns all suits.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs].into_iter()
    }
}

/// Error returned when drawing from a deck with no cards left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("deck exhausted")]
pub struct DeckExhausted;

/// A cards deck consumed from the front.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    next: usize,
}

impl Deck {
    /// The number of cards in the deck.
    pub const SIZE: usize = 52;

    /// Creates a new shuffled deck.
    pub fn new_and_shuffled<R: Rng>(rng: &mut R) -> Self {
        Self::new_shuffled_by(|n| rng.random_range(0..n))
    }

    /// Creates a new deck shuffled with Fisher-Yates.
    ///
    /// The `pick` closure is called with `n` and must return a uniform index in
    /// `0..n`, every permutation is then equally likely.
    pub fn new_shuffled_by<F>(mut pick: F) -> Self
    where
        F: FnMut(usize) -> usize,
    {
        let mut deck = Self::default();
        for i in (1..deck.cards.len()).rev() {
            let j = pick(i + 1);
            debug_assert!(j <= i, "pick out of range");
            deck.cards.swap(i, j.min(i));
        }

        deck
    }

    /// Removes and returns the card at the front of the deck.
    pub fn draw(&mut self) -> Result<Card, DeckExhausted> {
        let card = self.cards.get(self.next).copied().ok_or(DeckExhausted)?;
        self.next += 1;
        Ok(card)
    }

    /// Discards the card at the front of the deck without exposing it.
    pub fn burn(&mut self) -> Result<(), DeckExhausted> {
        self.draw().map(|_| ())
    }

    /// Checks if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Number of cards left in the deck.
    pub fn count(&self) -> usize {
        self.cards.len() - self.next
    }

    /// The cards left in the deck in draw order.
    pub fn remaining(&self) -> &[Card] {
        &self.cards[self.next..]
    }
}

impl Default for Deck {
    /// A deck in ranks order, aces first.
    fn default() -> Self {
        let cards = Rank::ranks()
            .flat_map(|r| Suit::suits().map(move |s| Card::new(r, s)))
            .collect::<Vec<_>>();
        Self { cards, next: 0 }
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::iter::Skip<std::vec::IntoIter<Card>>;

    fn into_iter(self) -> Self::IntoIter {
        let next = self.next;
        self.cards.into_iter().skip(next)
    }
}
