// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! Hexbet Texas Hold'em hand simulator.
//!
//! The [Simulator] advances a hand through preflop, flop, turn, river and
//! showdown on a virtual clock, generating agent decisions from their win rate
//! and odds and streaming snapshots to an [EventSink]:
//!
//! ```
//! # use std::time::Duration;
//! # use hexbet_core::agent::demo_roster;
//! # use hexbet_sim::{Recorder, Simulator};
//! let mut sim = Simulator::new(demo_roster(), Recorder::default());
//! sim.start().unwrap();
//! sim.advance(Duration::from_secs(10));
//! assert!(!sim.sink().events().is_empty());
//! sim.stop();
//! ```
//!
//! A [Table] runs a simulator in real time on a tokio task.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod random;
pub mod sink;
pub mod strength;
pub mod timers;

mod simulator;
pub use simulator::{SimConfig, Simulator};

mod table;
pub use table::Table;

pub use random::Randomness;
pub use sink::{ChannelSink, EventSink, Recorder, SimEvent};
