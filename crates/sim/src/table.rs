// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! Real time simulator table.
use anyhow::Result;
use log::info;
use tokio::{
    sync::{mpsc, oneshot},
    time::{self, Instant},
};

use hexbet_core::SimError;

use crate::{random::Randomness, simulator::Simulator, sink::EventSink};

/// A handle to a simulator running in real time on a tokio task.
///
/// Dropping the handle stops the task.
#[derive(Debug)]
pub struct Table {
    /// Channel for sending commands.
    commands_tx: mpsc::Sender<TableCommand>,
}

/// Command for the table task.
#[derive(Debug)]
enum TableCommand {
    /// Start a new game.
    Start {
        resp_tx: oneshot::Sender<Result<(), SimError>>,
    },
    /// Stop the game.
    Stop { resp_tx: oneshot::Sender<()> },
}

impl Table {
    /// Spawns a task that drives the simulator clock.
    ///
    /// Must be called from a tokio runtime.
    pub fn new<S, R>(sim: Simulator<S, R>) -> Self
    where
        S: EventSink + Send + 'static,
        R: Randomness + Send + 'static,
    {
        let (commands_tx, commands_rx) = mpsc::channel(16);

        let mut task = TableTask {
            sim,
            commands_rx,
            origin: Instant::now(),
        };

        tokio::spawn(async move {
            task.run().await;
            info!("Table task stopped");
        });

        Self { commands_tx }
    }

    /// Starts dealing hands, restarting from the first hand if already running.
    ///
    /// Returns an error if the agents cannot be simulated.
    pub async fn start(&self) -> Result<()> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx
            .send(TableCommand::Start { resp_tx })
            .await?;

        resp_rx.await??;
        Ok(())
    }

    /// Stops dealing, no event is emitted after this returns.
    pub async fn stop(&self) -> Result<()> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx.send(TableCommand::Stop { resp_tx }).await?;
        resp_rx.await?;
        Ok(())
    }
}

struct TableTask<S, R> {
    /// The simulator driven by this task.
    sim: Simulator<S, R>,
    /// Channel for receiving table commands.
    commands_rx: mpsc::Receiver<TableCommand>,
    /// The instant of the simulator zero time.
    origin: Instant,
}

impl<S: EventSink, R: Randomness> TableTask<S, R> {
    async fn run(&mut self) {
        loop {
            let deadline = self.sim.next_deadline().map(|d| self.origin + d);

            tokio::select! {
                // Run the steps that are due.
                _ = time::sleep_until(deadline.unwrap_or(self.origin)), if deadline.is_some() => {
                    self.sim.advance_to(self.origin.elapsed());
                }
                res = self.commands_rx.recv() => match res {
                    Some(TableCommand::Start { resp_tx }) => {
                        // Catch up the clock so the first hand starts now.
                        self.sim.advance_to(self.origin.elapsed());
                        let _ = resp_tx.send(self.sim.start());
                    }
                    Some(TableCommand::Stop { resp_tx }) => {
                        self.sim.stop();
                        let _ = resp_tx.send(());
                    }
                    None => break,
                },
            }
        }
    }
}
