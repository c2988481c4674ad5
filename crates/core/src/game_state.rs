// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! Hand state types streamed to observers.
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

use crate::{
    agent::AgentId,
    poker::{Card, Chips},
};

/// A hand stage.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Hole cards dealt, no board.
    #[default]
    Preflop,
    /// Three board cards.
    Flop,
    /// Fourth board card.
    Turn,
    /// Fifth board card.
    River,
    /// Winner selection.
    Showdown,
}

impl Stage {
    /// The number of board cards revealed when entering this stage.
    pub fn reveals(&self) -> usize {
        match self {
            Stage::Flop => 3,
            Stage::Turn | Stage::River => 1,
            Stage::Preflop | Stage::Showdown => 0,
        }
    }

    /// The stage that follows this one, `None` after showdown.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Preflop => Some(Stage::Flop),
            Stage::Flop => Some(Stage::Turn),
            Stage::Turn => Some(Stage::River),
            Stage::River => Some(Stage::Showdown),
            Stage::Showdown => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Preflop => "preflop",
            Stage::Flop => "flop",
            Stage::Turn => "turn",
            Stage::River => "river",
            Stage::Showdown => "showdown",
        };

        write!(f, "{s}")
    }
}

/// An agent action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// The agent is about to act.
    Thinking,
    /// Bet.
    Bet,
    /// Call.
    Call,
    /// Raise.
    Raise,
    /// Fold.
    Fold,
    /// Check.
    Check,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Thinking => "thinking",
            Action::Bet => "bet",
            Action::Call => "call",
            Action::Raise => "raise",
            Action::Fold => "fold",
            Action::Check => "check",
        };

        write!(f, "{s}")
    }
}

/// A record of one agent action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionEvent {
    /// The acting agent.
    pub agent: AgentId,
    /// The acting agent display name.
    pub name: String,
    /// The action.
    pub action: Action,
    /// The chips moved by the action, none for thinking and fold.
    pub amount: Option<Chips>,
    /// Simulator time at which the action happened.
    pub at: Duration,
}

impl fmt::Display for DecisionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.amount {
            Some(amount) => write!(f, "{} {} {}", self.name, self.action, amount),
            None => write!(f, "{} {}", self.name, self.action),
        }
    }
}

/// A full snapshot of a hand.
///
/// Every snapshot is self contained, observers replace their copy instead of
/// merging it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandState {
    /// The hand number starting at 1.
    pub hand: u64,
    /// The current stage.
    pub stage: Stage,
    /// Chips contributed to this hand.
    pub pot: Chips,
    /// The board cards.
    pub community_cards: Vec<Card>,
    /// Each agent two hole cards.
    pub hole_cards: AHashMap<AgentId, [Card; 2]>,
    /// Each agent chips behind.
    pub stacks: AHashMap<AgentId, Chips>,
    /// Each agent contribution to the pot in this hand.
    pub contributions: AHashMap<AgentId, Chips>,
    /// The agents who folded this hand.
    pub folded: AHashSet<AgentId>,
    /// The winner, set only in the showdown snapshot once the pot has been paid.
    pub winner: Option<AgentId>,
}

impl HandState {
    /// The stack of an agent, zero for unknown agents.
    pub fn stack(&self, agent: &AgentId) -> Chips {
        self.stacks.get(agent).copied().unwrap_or_default()
    }

    /// The pot contribution of an agent, zero for unknown agents.
    pub fn contribution(&self, agent: &AgentId) -> Chips {
        self.contributions.get(agent).copied().unwrap_or_default()
    }

    /// Checks if an agent folded this hand.
    pub fn is_folded(&self, agent: &AgentId) -> bool {
        self.folded.contains(agent)
    }

    /// Chips held by the agents plus chips still waiting in the pot.
    ///
    /// The showdown snapshot carries the winner with the pot already credited
    /// to its stack, the pot is not counted again.
    pub fn total_chips(&self) -> Chips {
        let stacks: Chips = self.stacks.values().sum();
        if self.winner.is_some() {
            stacks
        } else {
            stacks + self.pot
        }
    }
}
