// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! The simulator source of chance.
use rand::Rng;

/// Source of randomness for shuffles, think times, decisions and winners.
pub trait Randomness {
    /// A uniform value in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// A uniform index in `0..n`, `n` must be positive.
    fn index(&mut self, n: usize) -> usize;
}

impl<R: Rng> Randomness for R {
    fn unit(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn index(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }
}
