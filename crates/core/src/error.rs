// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! Simulator errors.
use thiserror::Error;

use crate::poker::DeckExhausted;

/// Errors raised by the hand simulator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The agents list cannot be simulated.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A hand consumed more cards than the deck holds.
    #[error("deck exhausted")]
    DeckExhausted,
}

impl From<DeckExhausted> for SimError {
    fn from(_: DeckExhausted) -> Self {
        SimError::DeckExhausted
    }
}
