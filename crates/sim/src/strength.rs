// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! Agent strength and decision model.
//!
//! An agent strength in `[0, 1]` is a weighted sum of its normalized win rate
//! and of its inverse odds normalized against the other agents at the table.
//! Strength drives both the fold probability and the stake sizes.
use hexbet_core::{agent::Agent, poker::Chips};

/// Weight of the win rate in the strength score.
const WIN_RATE_WEIGHT: f64 = 0.6;
/// Weight of the inverse odds in the strength score.
const ODDS_WEIGHT: f64 = 0.4;
/// Denominator floor when all agents have the same odds.
const MIN_ODDS_SPREAD: f64 = 0.0001;
/// Fold probability bounds.
const MIN_FOLD_CHANCE: f64 = 0.05;
const MAX_FOLD_CHANCE: f64 = 0.35;
/// Rolls below this bet, above it up to [RAISE_BELOW] raise.
const BET_BELOW: f64 = 0.45;
const RAISE_BELOW: f64 = 0.75;

/// The odds bounds among the agents in a hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OddsRange {
    /// Lowest odds, the favourite.
    pub min: f64,
    /// Highest odds, the outsider.
    pub max: f64,
}

impl OddsRange {
    /// Returns the odds range of the given agents, `None` if there are no agents.
    pub fn of(agents: &[Agent]) -> Option<Self> {
        agents.iter().map(|a| a.odds).fold(None, |range, odds| {
            Some(match range {
                None => OddsRange {
                    min: odds,
                    max: odds,
                },
                Some(r) => OddsRange {
                    min: r.min.min(odds),
                    max: r.max.max(odds),
                },
            })
        })
    }

    /// Maps odds to `[0, 1]` with the lowest odds scoring highest.
    pub fn score(&self, odds: f64) -> f64 {
        let spread = (self.max - self.min).max(MIN_ODDS_SPREAD);
        ((self.max - odds) / spread).clamp(0.0, 1.0)
    }
}

/// Computes an agent strength in `[0, 1]`.
pub fn strength(agent: &Agent, range: OddsRange) -> f64 {
    let win_score = (agent.win_rate / 100.0).clamp(0.0, 1.0);
    WIN_RATE_WEIGHT * win_score + ODDS_WEIGHT * range.score(agent.odds)
}

/// Fold probability for a strength, stronger agents fold less.
pub fn fold_chance(strength: f64) -> f64 {
    (MIN_FOLD_CHANCE + 0.25 * (1.0 - strength)).clamp(MIN_FOLD_CHANCE, MAX_FOLD_CHANCE)
}

/// Scales a raw stake magnitude to table chips, at least one chip.
pub fn scale_stake(raw: u32, scale: f64) -> Chips {
    Chips::new((raw as f64 * scale).round().max(1.0) as u32)
}

/// An agent decision before it is applied to the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Leave the hand.
    Fold,
    /// Put in the base stake.
    Bet,
    /// Put in the base stake plus a random increment.
    Raise,
    /// Match the round highest contribution.
    Call,
}

/// The betting profile of an agent, a pure function of its attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    /// The agent strength.
    pub strength: f64,
    /// The agent fold probability.
    pub fold_chance: f64,
}

impl Profile {
    /// Creates the profile for an agent at a table with the given odds range.
    pub fn new(agent: &Agent, range: OddsRange) -> Self {
        let strength = strength(agent, range);
        Self {
            strength,
            fold_chance: fold_chance(strength),
        }
    }

    /// Maps a uniform roll in `[0, 1)` to a decision.
    pub fn decide(&self, roll: f64) -> Decision {
        if roll < self.fold_chance {
            Decision::Fold
        } else if roll < BET_BELOW {
            Decision::Bet
        } else if roll < RAISE_BELOW {
            Decision::Raise
        } else {
            Decision::Call
        }
    }

    /// Raw bet magnitude before scaling.
    pub fn base_raw(&self) -> u32 {
        (40.0 + 60.0 * self.strength).round().max(1.0) as u32
    }

    /// Raw raise magnitude for a uniform `roll` in `[0, 1)`.
    pub fn raise_raw(&self, roll: f64) -> u32 {
        self.base_raw() + (roll * (20.0 + 60.0 * self.strength)).round() as u32
    }

    /// The bet size in chips.
    pub fn bet_size(&self, scale: f64) -> Chips {
        scale_stake(self.base_raw(), scale)
    }

    /// The raise size in chips for a uniform `roll` in `[0, 1)`.
    pub fn raise_size(&self, roll: f64, scale: f64) -> Chips {
        scale_stake(self.raise_raw(roll), scale)
    }
}
