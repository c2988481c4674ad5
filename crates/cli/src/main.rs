// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! Hexbet simulator CLI, prints the events of a simulated table.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::{Result, bail};
use clap::Parser;
use log::{error, info};
use rand::{SeedableRng, rngs::StdRng};

use hexbet_core::{
    agent::{Agent, demo_roster},
    game_state::HandState,
};
use hexbet_sim::{ChannelSink, SimConfig, SimEvent, Simulator, Table};

#[derive(Debug, Parser)]
struct Cli {
    /// Number of agents at the table.
    #[clap(long, short, default_value_t = 6, value_parser = clap::value_parser!(u8).range(2..=6))]
    agents: u8,
    /// Seed for a reproducible run.
    #[clap(long, short)]
    seed: Option<u64>,
    /// Number of hands to play, 0 plays until Ctrl-C.
    #[clap(long, default_value_t = 1)]
    hands: u64,
    /// Clock speed multiplier.
    #[clap(long, default_value_t = 1.0)]
    speed: f64,
    /// Print events as JSON lines.
    #[clap(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{e}");
    }
}

async fn run(cli: Cli) -> Result<()> {
    if !(cli.speed > 0.0 && cli.speed.is_finite()) {
        bail!("Invalid speed {}", cli.speed);
    }

    let agents = demo_roster()
        .into_iter()
        .take(cli.agents as usize)
        .collect::<Vec<_>>();

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let (sink, mut events_rx) = ChannelSink::new();
    let config = SimConfig::default().scaled(cli.speed);
    let table = Table::new(Simulator::with_config(agents.clone(), sink, config, rng));
    table.start().await?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut hands_done = 0;
    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                res?;
                info!("Interrupted after {hands_done} hands");
                break;
            }
            event = events_rx.recv() => {
                let Some(event) = event else {
                    break;
                };

                if cli.json {
                    println!("{}", serde_json::to_string(&event)?);
                } else {
                    print_event(&event, &agents);
                }

                if matches!(event, SimEvent::NewHand) {
                    hands_done += 1;
                    if cli.hands > 0 && hands_done >= cli.hands {
                        break;
                    }
                }
            }
        }
    }

    table.stop().await
}

fn print_event(event: &SimEvent, agents: &[Agent]) {
    match event {
        SimEvent::State(state) => print_state(state, agents),
        SimEvent::Decision(decision) => println!("  {decision}"),
        SimEvent::NewHand => println!(),
    }
}

fn print_state(state: &HandState, agents: &[Agent]) {
    let board = state
        .community_cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    println!(
        "Hand {} {:<8} pot {:>5}  [{board}]",
        state.hand, state.stage, state.pot
    );

    let Some(winner) = &state.winner else {
        return;
    };

    for agent in agents {
        let tag = if &agent.id == winner {
            "winner"
        } else if state.is_folded(&agent.id) {
            "folded"
        } else {
            ""
        };

        let cards = state
            .hole_cards
            .get(&agent.id)
            .map(|[c1, c2]| format!("{c1} {c2}"))
            .unwrap_or_default();

        println!(
            "  {:<8} {cards:<6} stack {:>6} {tag}",
            agent.name,
            state.stack(&agent.id)
        );
    }
}
