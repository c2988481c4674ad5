// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! Observers of the simulator events.
use serde::Serialize;
use tokio::sync::mpsc;

use hexbet_core::game_state::{DecisionEvent, HandState};

/// Receives the simulator events.
///
/// Calls are synchronous and happen on the thread driving the simulator, an
/// implementation must not block.
pub trait EventSink {
    /// A new snapshot of the hand.
    fn on_state(&mut self, state: HandState);

    /// An agent action.
    fn on_decision(&mut self, event: DecisionEvent);

    /// A new hand is starting.
    fn on_new_hand(&mut self);
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn on_state(&mut self, state: HandState) {
        (**self).on_state(state);
    }

    fn on_decision(&mut self, event: DecisionEvent) {
        (**self).on_decision(event);
    }

    fn on_new_hand(&mut self) {
        (**self).on_new_hand();
    }
}

/// A simulator event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SimEvent {
    /// A hand snapshot.
    State(HandState),
    /// An agent action.
    Decision(DecisionEvent),
    /// A new hand signal.
    NewHand,
}

/// A sink that records all events in memory.
#[derive(Debug, Default)]
pub struct Recorder {
    events: Vec<SimEvent>,
}

impl Recorder {
    /// All the recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// The recorded snapshots.
    pub fn states(&self) -> impl Iterator<Item = &HandState> {
        self.events.iter().filter_map(|e| match e {
            SimEvent::State(state) => Some(state),
            _ => None,
        })
    }

    /// The recorded decisions.
    pub fn decisions(&self) -> impl Iterator<Item = &DecisionEvent> {
        self.events.iter().filter_map(|e| match e {
            SimEvent::Decision(event) => Some(event),
            _ => None,
        })
    }

    /// The number of new hand signals.
    pub fn new_hands(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SimEvent::NewHand))
            .count()
    }

    /// Removes and returns the recorded events.
    pub fn take(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for Recorder {
    fn on_state(&mut self, state: HandState) {
        self.events.push(SimEvent::State(state));
    }

    fn on_decision(&mut self, event: DecisionEvent) {
        self.events.push(SimEvent::Decision(event));
    }

    fn on_new_hand(&mut self) {
        self.events.push(SimEvent::NewHand);
    }
}

/// A sink that forwards events to a channel.
///
/// Events sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    events_tx: mpsc::UnboundedSender<SimEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiver for its events.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SimEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        (Self { events_tx }, events_rx)
    }
}

impl EventSink for ChannelSink {
    fn on_state(&mut self, state: HandState) {
        let _ = self.events_tx.send(SimEvent::State(state));
    }

    fn on_decision(&mut self, event: DecisionEvent) {
        let _ = self.events_tx.send(SimEvent::Decision(event));
    }

    fn on_new_hand(&mut self) {
        let _ = self.events_tx.send(SimEvent::NewHand);
    }
}
