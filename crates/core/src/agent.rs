// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! AI agents seated at the simulated table.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::SimError;

/// A stable agent identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(String);

impl AgentId {
    /// Creates an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An AI agent, read only for the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// The agent id.
    pub id: AgentId,
    /// The agent display name.
    pub name: String,
    /// Win rate percentage in `0..=100`.
    pub win_rate: f64,
    /// Decimal betting odds, lower means favourite.
    pub odds: f64,
}

impl Agent {
    /// Bookmaker margin applied by [Agent::with_derived_odds].
    pub const HOUSE_MARGIN: f64 = 0.05;

    /// Creates an agent.
    pub fn new(id: impl Into<String>, name: impl Into<String>, win_rate: f64, odds: f64) -> Self {
        Self {
            id: AgentId::new(id),
            name: name.into(),
            win_rate,
            odds,
        }
    }

    /// Creates an agent whose odds are priced from its win rate.
    ///
    /// The win probability is clamped to `[0.05, 0.95]` and the fair price is
    /// marked up by [Agent::HOUSE_MARGIN], rounded to two decimals.
    pub fn with_derived_odds(id: impl Into<String>, name: impl Into<String>, win_rate: f64) -> Self {
        let p = (win_rate / 100.0).clamp(0.05, 0.95);
        let odds = ((1.0 / p) * (1.0 + Self::HOUSE_MARGIN) * 100.0).round() / 100.0;
        Self::new(id, name, win_rate, odds)
    }

    /// Checks this agent can be simulated.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.odds.is_finite() && self.odds > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "agent {} has non positive odds {}",
                self.id, self.odds
            )));
        }

        if !self.win_rate.is_finite() {
            return Err(SimError::InvalidConfiguration(format!(
                "agent {} has invalid win rate {}",
                self.id, self.win_rate
            )));
        }

        Ok(())
    }
}

/// The demo roster shown in the lobby.
pub fn demo_roster() -> Vec<Agent> {
    [
        ("ai-1", "MAKO", 68.5),
        ("ai-2", "MASQUE", 62.3),
        ("ai-3", "BULWARK", 58.1),
        ("ai-4", "FALCON", 71.2),
        ("ai-5", "DRIFTER", 52.8),
        ("ai-6", "LANTERN", 65.7),
    ]
    .into_iter()
    .map(|(id, name, win_rate)| Agent::with_derived_odds(id, name, win_rate))
    .collect()
}
