// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! Hexbet core types shared by the simulator and its observers.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod agent;
pub mod error;
pub mod game_state;
pub mod poker;

pub use error::SimError;
