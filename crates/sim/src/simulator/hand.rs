// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! The in flight hand.
use ahash::{AHashMap, AHashSet};

use hexbet_core::{
    agent::{Agent, AgentId},
    game_state::{HandState, Stage},
    poker::{Chips, Deck, DeckExhausted},
};

/// A hand state with its deck and the round betting marker.
#[derive(Debug)]
pub struct Hand {
    state: HandState,
    deck: Deck,
    /// The highest single contribution in the current betting round.
    current_bet: Chips,
}

impl Hand {
    /// Deals a hand, one card to each agent in seat order and then a second one.
    pub fn deal(
        number: u64,
        agents: &[Agent],
        mut deck: Deck,
        stacks: AHashMap<AgentId, Chips>,
    ) -> Result<Self, DeckExhausted> {
        let first = agents
            .iter()
            .map(|_| deck.draw())
            .collect::<Result<Vec<_>, _>>()?;

        let mut hole_cards = AHashMap::with_capacity(agents.len());
        for (agent, c1) in agents.iter().zip(first) {
            hole_cards.insert(agent.id.clone(), [c1, deck.draw()?]);
        }

        let contributions = agents
            .iter()
            .map(|a| (a.id.clone(), Chips::ZERO))
            .collect();

        let state = HandState {
            hand: number,
            stage: Stage::Preflop,
            pot: Chips::ZERO,
            community_cards: Vec::with_capacity(5),
            hole_cards,
            stacks,
            contributions,
            folded: AHashSet::default(),
            winner: None,
        };

        Ok(Self {
            state,
            deck,
            current_bet: Chips::ZERO,
        })
    }

    /// The hand state.
    pub fn state(&self) -> &HandState {
        &self.state
    }

    /// Consumes the hand returning the agents stacks.
    pub fn into_stacks(self) -> AHashMap<AgentId, Chips> {
        self.state.stacks
    }

    /// The cards left in the deck.
    #[cfg(test)]
    pub fn cards_left(&self) -> usize {
        self.deck.count()
    }

    /// The highest contribution in this betting round.
    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }

    /// Checks if an agent folded.
    pub fn is_folded(&self, agent: &AgentId) -> bool {
        self.state.is_folded(agent)
    }

    /// An agent chips behind.
    pub fn stack(&self, agent: &AgentId) -> Chips {
        self.state.stack(agent)
    }

    /// Burns a card, reveals the board cards for the stage and opens its round.
    pub fn enter_street(&mut self, stage: Stage) -> Result<(), DeckExhausted> {
        self.deck.burn()?;
        for _ in 0..stage.reveals() {
            let card = self.deck.draw()?;
            self.state.community_cards.push(card);
        }

        self.state.stage = stage;
        self.current_bet = Chips::ZERO;
        Ok(())
    }

    /// Moves up to `chips` from the agent stack to the pot.
    ///
    /// Returns the chips actually moved.
    pub fn contribute(&mut self, agent: &AgentId, chips: Chips) -> Chips {
        let Some(stack) = self.state.stacks.get_mut(agent) else {
            return Chips::ZERO;
        };

        let amount = chips.min(*stack);
        *stack -= amount;
        self.state.pot += amount;
        *self.state.contributions.entry(agent.clone()).or_default() += amount;
        amount
    }

    /// Raises the round marker to at least `chips`.
    pub fn raise_bet(&mut self, chips: Chips) {
        self.current_bet = self.current_bet.max(chips);
    }

    /// Marks an agent as folded.
    pub fn fold(&mut self, agent: &AgentId) {
        self.state.folded.insert(agent.clone());
    }

    /// Enters the showdown paying the whole pot to the winner.
    pub fn showdown(&mut self, winner: &AgentId) {
        self.state.stage = Stage::Showdown;
        *self.state.stacks.entry(winner.clone()).or_default() += self.state.pot;
        self.state.winner = Some(winner.clone());
    }

    /// Clears the pot and the winner after the pot has been paid.
    pub fn reset_pot(&mut self) {
        self.state.pot = Chips::ZERO;
        self.state.winner = None;
    }
}
