// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! Hand simulator state machine.
use ahash::AHashMap;
use log::{debug, error, info};
use rand::{SeedableRng, rngs::StdRng};
use std::time::Duration;

use hexbet_core::{
    SimError,
    agent::{Agent, AgentId},
    game_state::{Action, DecisionEvent, HandState, Stage},
    poker::{Chips, Deck},
};

use crate::{
    random::Randomness,
    sink::EventSink,
    strength::{Decision, OddsRange, Profile},
    timers::Timers,
};

mod hand;
use hand::Hand;

/// Simulator stakes and pacing.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Chips given to each agent before the first hand.
    pub starting_stack: Chips,
    /// Converts raw stake magnitudes into table chips.
    pub stake_scale: f64,
    /// Minimum agent think time.
    pub think_base: Duration,
    /// Upper bound (exclusive) of the random time added to the think time.
    pub think_jitter: Duration,
    /// Gap between an agent action and the next agent thinking.
    pub action_gap: Duration,
    /// Pause between a betting round and the next street.
    pub stage_pause: Duration,
    /// Pause between the river betting round and the showdown.
    pub showdown_pause: Duration,
    /// Delay from the showdown to the pot reset.
    pub pot_reset_delay: Duration,
    /// Delay from the showdown to the next hand.
    pub new_hand_delay: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            starting_stack: Chips::new(1_000),
            stake_scale: 1.0 / 30.0,
            think_base: Duration::from_millis(800),
            think_jitter: Duration::from_millis(700),
            action_gap: Duration::from_millis(200),
            stage_pause: Duration::from_millis(500),
            showdown_pause: Duration::from_millis(800),
            pot_reset_delay: Duration::from_millis(500),
            new_hand_delay: Duration::from_millis(3_000),
        }
    }
}

impl SimConfig {
    /// Returns this config with every delay divided by `speed`.
    ///
    /// Panics if `speed` is not a positive number.
    pub fn scaled(self, speed: f64) -> Self {
        assert!(speed > 0.0 && speed.is_finite(), "speed must be positive");

        let scale = |d: Duration| d.div_f64(speed);
        Self {
            think_base: scale(self.think_base),
            think_jitter: scale(self.think_jitter),
            action_gap: scale(self.action_gap),
            stage_pause: scale(self.stage_pause),
            showdown_pause: scale(self.showdown_pause),
            pot_reset_delay: scale(self.pot_reset_delay),
            new_hand_delay: scale(self.new_hand_delay),
            ..self
        }
    }
}

/// A scheduled simulator step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// The agent at the index starts thinking.
    Think(usize),
    /// The agent at the index acts.
    Act(usize),
    /// Enter a street or the showdown.
    Street(Stage),
    /// Clear the pot after the showdown.
    ResetPot,
    /// Deal the next hand.
    NextHand,
}

/// A Texas Hold'em hand simulator driven by a virtual clock.
///
/// The simulator is a single writer state machine: all state changes happen
/// while running the steps that [Simulator::advance] pops from its timer queue,
/// and every change is reported to the [EventSink] as it happens.
pub struct Simulator<S, R = StdRng> {
    agents: Vec<Agent>,
    profiles: Vec<Profile>,
    sink: S,
    rng: R,
    config: SimConfig,
    timers: Timers<Step>,
    hand: Option<Hand>,
    now: Duration,
    running: bool,
}

impl<S: EventSink> Simulator<S> {
    /// Creates a simulator with the default config and OS seeded randomness.
    pub fn new(agents: Vec<Agent>, sink: S) -> Self {
        Self::with_config(agents, sink, SimConfig::default(), StdRng::from_os_rng())
    }
}

impl<S: EventSink, R: Randomness> Simulator<S, R> {
    /// Creates a simulator with the given config and randomness.
    ///
    /// The agents are validated by [Simulator::start].
    pub fn with_config(agents: Vec<Agent>, sink: S, config: SimConfig, rng: R) -> Self {
        Self {
            agents,
            profiles: Vec::new(),
            sink,
            rng,
            config,
            timers: Timers::default(),
            hand: None,
            now: Duration::ZERO,
            running: false,
        }
    }

    /// Starts the first hand.
    ///
    /// Any step pending from a previous start is cancelled, stacks are seeded to
    /// the starting stack and the preflop betting round is scheduled. Fails
    /// without scheduling anything if the agents are invalid or too many to be
    /// dealt.
    pub fn start(&mut self) -> Result<(), SimError> {
        let range = self.validate()?;

        self.timers.cancel_all();
        self.running = false;
        self.hand = None;
        self.profiles = self
            .agents
            .iter()
            .map(|a| Profile::new(a, range))
            .collect();

        let stacks = self
            .agents
            .iter()
            .map(|a| (a.id.clone(), self.config.starting_stack))
            .collect();
        self.hand = Some(self.deal(1, stacks)?);
        self.running = true;

        info!("Starting hand 1 with {} agents", self.agents.len());
        self.enter_preflop();
        Ok(())
    }

    /// Stops the simulation cancelling all pending steps.
    pub fn stop(&mut self) {
        let cancelled = self.timers.cancel_all();
        if self.running {
            info!(
                "Simulator stopped, {cancelled} steps cancelled, timers generation {}",
                self.timers.generation()
            );
        }

        self.running = false;
    }

    /// Advances the clock by `dt` running all steps that become due.
    pub fn advance(&mut self, dt: Duration) {
        self.advance_to(self.now + dt);
    }

    /// Advances the clock to `target` running all steps due at or before it.
    pub fn advance_to(&mut self, target: Duration) {
        while let Some((due, step)) = self.timers.pop_due(target) {
            self.now = self.now.max(due);
            if let Err(e) = self.run_step(step) {
                self.abort(e);
            }
        }

        self.now = self.now.max(target);
    }

    /// When the next step is due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    /// The simulator clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Checks if hands are being played.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// A snapshot of the current hand.
    pub fn hand_state(&self) -> Option<HandState> {
        self.hand.as_ref().map(|h| h.state().clone())
    }

    /// The agents at the table.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// The events sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The mutable events sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn validate(&self) -> Result<OddsRange, SimError> {
        for agent in &self.agents {
            agent.validate()?;
        }

        OddsRange::of(&self.agents)
            .ok_or_else(|| SimError::InvalidConfiguration("no agents".to_string()))
    }

    fn deal(&mut self, number: u64, stacks: AHashMap<AgentId, Chips>) -> Result<Hand, SimError> {
        let rng = &mut self.rng;
        let deck = Deck::new_shuffled_by(|n| rng.index(n));
        Ok(Hand::deal(number, &self.agents, deck, stacks)?)
    }

    fn abort(&mut self, err: SimError) {
        let number = self.hand.as_ref().map(|h| h.state().hand).unwrap_or_default();
        let cancelled = self.timers.cancel_all();
        error!(
            "Hand {number} aborted: {err}, {cancelled} steps cancelled, timers generation {}",
            self.timers.generation()
        );

        self.running = false;
    }

    fn run_step(&mut self, step: Step) -> Result<(), SimError> {
        match step {
            Step::Think(idx) => self.emit_decision(idx, Action::Thinking, None),
            Step::Act(idx) => self.act(idx),
            Step::Street(Stage::Showdown) => self.showdown(),
            Step::Street(stage) => self.enter_street(stage)?,
            Step::ResetPot => {
                if let Some(hand) = self.hand.as_mut() {
                    hand.reset_pot();
                }

                self.emit_state();
            }
            Step::NextHand => self.next_hand()?,
        }

        Ok(())
    }

    fn enter_preflop(&mut self) {
        self.emit_state();

        let round = self.play_round();
        let due = self.now + round + self.config.stage_pause;
        self.timers.schedule(due, Step::Street(Stage::Flop));
    }

    fn enter_street(&mut self, stage: Stage) -> Result<(), SimError> {
        let Some(hand) = self.hand.as_mut() else {
            return Ok(());
        };

        hand.enter_street(stage)?;
        debug!("Hand {} enters {stage}", hand.state().hand);
        self.emit_state();

        let round = self.play_round();
        let next = match stage.next() {
            Some(Stage::Showdown) => (Stage::Showdown, self.config.showdown_pause),
            Some(next) => (next, self.config.stage_pause),
            None => return Ok(()),
        };

        self.timers
            .schedule(self.now + round + next.1, Step::Street(next.0));
        Ok(())
    }

    /// Schedules one action for each agent still in the hand.
    ///
    /// Returns the time it takes for all agents to act.
    fn play_round(&mut self) -> Duration {
        let jitter_ms = self.config.think_jitter.as_millis() as usize;
        let mut offset = Duration::ZERO;

        for idx in self.active_agents() {
            let jitter = if jitter_ms > 0 {
                self.rng.index(jitter_ms) as u64
            } else {
                0
            };

            let think = self.config.think_base + Duration::from_millis(jitter);
            self.timers.schedule(self.now + offset, Step::Think(idx));
            self.timers
                .schedule(self.now + offset + think, Step::Act(idx));

            offset += think + self.config.action_gap;
        }

        offset
    }

    fn act(&mut self, idx: usize) {
        let Some(hand) = self.hand.as_mut() else {
            return;
        };

        let agent_id = &self.agents[idx].id;
        if hand.is_folded(agent_id) {
            return;
        }

        // Agents who run out of chips sit out the rest of the hand.
        if hand.stack(agent_id) == Chips::ZERO {
            debug!("Agent {agent_id} has no chips left");
            hand.fold(agent_id);
            return;
        }

        let profile = self.profiles[idx];
        let scale = self.config.stake_scale;
        let (action, amount) = match profile.decide(self.rng.unit()) {
            Decision::Fold => {
                hand.fold(agent_id);
                (Action::Fold, None)
            }
            Decision::Bet => {
                let chips = hand.contribute(agent_id, profile.bet_size(scale));
                hand.raise_bet(chips);
                (Action::Bet, Some(chips))
            }
            Decision::Raise => {
                let size = profile.raise_size(self.rng.unit(), scale);
                let chips = hand.contribute(agent_id, size);
                hand.raise_bet(chips);
                (Action::Raise, Some(chips))
            }
            Decision::Call => {
                let to_call = hand.current_bet();
                let chips = hand.contribute(agent_id, to_call);
                (Action::Call, Some(chips))
            }
        };

        self.emit_decision(idx, action, amount);
        if action != Action::Fold {
            self.emit_state();
        }
    }

    fn showdown(&mut self) {
        let active = self.active_agents();
        let winner = if active.is_empty() {
            self.rng.index(self.agents.len())
        } else {
            active[self.rng.index(active.len())]
        };

        let Some(hand) = self.hand.as_mut() else {
            return;
        };

        let winner_id = &self.agents[winner].id;
        hand.showdown(winner_id);
        info!(
            "Hand {} won by {} with a pot of {}",
            hand.state().hand,
            winner_id,
            hand.state().pot
        );

        self.emit_state();

        let now = self.now;
        self.timers
            .schedule(now + self.config.pot_reset_delay, Step::ResetPot);
        self.timers
            .schedule(now + self.config.new_hand_delay, Step::NextHand);
    }

    fn next_hand(&mut self) -> Result<(), SimError> {
        self.timers.cancel_all();

        let Some(prev) = self.hand.take() else {
            return Ok(());
        };

        let number = prev.state().hand + 1;
        self.hand = Some(self.deal(number, prev.into_stacks())?);

        info!("Starting hand {number}");
        self.sink.on_new_hand();
        self.enter_preflop();
        Ok(())
    }

    /// Indices of the agents who have not folded.
    fn active_agents(&self) -> Vec<usize> {
        let Some(hand) = self.hand.as_ref() else {
            return Vec::new();
        };

        self.agents
            .iter()
            .enumerate()
            .filter(|(_, a)| !hand.is_folded(&a.id))
            .map(|(idx, _)| idx)
            .collect()
    }

    fn emit_state(&mut self) {
        if let Some(hand) = self.hand.as_ref() {
            self.sink.on_state(hand.state().clone());
        }
    }

    fn emit_decision(&mut self, idx: usize, action: Action, amount: Option<Chips>) {
        let agent = &self.agents[idx];
        let event = DecisionEvent {
            agent: agent.id.clone(),
            name: agent.name.clone(),
            action,
            amount,
            at: self.now,
        };

        debug!("{event}");
        self.sink.on_decision(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Recorder, SimEvent};
    use ahash::HashSet;
    use std::collections::VecDeque;

    const SECOND: Duration = Duration::from_secs(1);

    fn roster(n: usize) -> Vec<Agent> {
        (0..n)
            .map(|i| {
                let win_rate = 40.0 + (i as f64 * 7.0) % 45.0;
                let odds = 1.5 + (i as f64 * 0.9) % 6.0;
                Agent::new(format!("ai-{i}"), format!("AI {i}"), win_rate, odds)
            })
            .collect()
    }

    fn new_sim(agents: Vec<Agent>, seed: u64) -> Simulator<Recorder> {
        Simulator::with_config(
            agents,
            Recorder::default(),
            SimConfig::default(),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Advances the simulator until `hands` new hand signals have been emitted.
    fn run_hands<R: Randomness>(sim: &mut Simulator<Recorder, R>, hands: usize) {
        for _ in 0..100_000 {
            if sim.sink().new_hands() >= hands {
                return;
            }

            sim.advance(Duration::from_millis(250));
        }

        panic!("hands did not complete");
    }

    /// Splits events into hands at each new hand signal.
    fn hands(events: &[SimEvent]) -> Vec<&[SimEvent]> {
        events
            .split(|e| matches!(e, SimEvent::NewHand))
            .collect()
    }

    /// Randomness that returns scripted decision rolls before falling back to
    /// a fixed roll, indices come from a seeded generator.
    struct Scripted {
        rolls: VecDeque<f64>,
        fallback: f64,
        rng: StdRng,
    }

    impl Scripted {
        fn new(rolls: &[f64], fallback: f64) -> Self {
            Self {
                rolls: rolls.iter().copied().collect(),
                fallback,
                rng: StdRng::seed_from_u64(1),
            }
        }
    }

    impl Randomness for Scripted {
        fn unit(&mut self) -> f64 {
            self.rolls.pop_front().unwrap_or(self.fallback)
        }

        fn index(&mut self, n: usize) -> usize {
            self.rng.index(n)
        }
    }

    #[test]
    fn empty_roster_fails_start() {
        let mut sim = Simulator::new(vec![], Recorder::default());

        let res = sim.start();
        assert!(matches!(res, Err(SimError::InvalidConfiguration(_))));
        assert!(!sim.is_running());
        assert_eq!(sim.next_deadline(), None);

        sim.advance(SECOND * 60);
        assert!(sim.sink().events().is_empty());
    }

    #[test]
    fn non_positive_odds_fails_start() {
        let mut agents = roster(3);
        agents[1].odds = 0.0;

        let mut sim = new_sim(agents, 1);
        assert!(matches!(
            sim.start(),
            Err(SimError::InvalidConfiguration(_))
        ));
        assert_eq!(sim.next_deadline(), None);
        assert!(sim.hand_state().is_none());
    }

    #[test]
    fn start_deals_and_seeds_stacks() {
        let agents = roster(4);
        let mut sim = new_sim(agents.clone(), 3);
        sim.start().unwrap();

        assert!(sim.is_running());
        let state = sim.hand_state().unwrap();
        assert_eq!(state.hand, 1);
        assert_eq!(state.stage, Stage::Preflop);
        assert_eq!(state.pot, Chips::ZERO);
        assert!(state.community_cards.is_empty());
        for agent in &agents {
            assert_eq!(state.stack(&agent.id), Chips::new(1_000));
            assert_eq!(state.contribution(&agent.id), Chips::ZERO);
            assert!(state.hole_cards.contains_key(&agent.id));
        }

        // The preflop snapshot is emitted synchronously.
        assert!(matches!(sim.sink().events(), [SimEvent::State(_)]));
        assert_eq!(sim.sink().new_hands(), 0);
    }

    #[test]
    fn stage_order() {
        let mut sim = new_sim(roster(6), 7);
        sim.start().unwrap();
        run_hands(&mut sim, 3);

        let events = sim.sink().events();
        for hand in &hands(events)[..3] {
            let mut stages = hand
                .iter()
                .filter_map(|e| match e {
                    SimEvent::State(s) => Some(s.stage),
                    _ => None,
                })
                .collect::<Vec<_>>();
            stages.dedup();

            assert_eq!(
                stages,
                [
                    Stage::Preflop,
                    Stage::Flop,
                    Stage::Turn,
                    Stage::River,
                    Stage::Showdown
                ]
            );
        }
    }

    #[test]
    fn chips_are_conserved() {
        let agents = roster(6);
        let mut sim = new_sim(agents.clone(), 11);
        sim.start().unwrap();
        run_hands(&mut sim, 5);

        let total = Chips::new(1_000 * agents.len() as u32);
        for state in sim.sink().states() {
            assert_eq!(state.total_chips(), total);

            let contributed: Chips = state.contributions.values().sum();
            let pot_reset = state.stage == Stage::Showdown && state.pot == Chips::ZERO;
            assert!(state.pot == contributed || pot_reset);
        }
    }

    #[test]
    fn deck_integrity() {
        let agents = roster(9);
        let mut sim = new_sim(agents.clone(), 5);
        sim.start().unwrap();
        run_hands(&mut sim, 3);

        for state in sim.sink().states() {
            let expected_board = match state.stage {
                Stage::Preflop => 0,
                Stage::Flop => 3,
                Stage::Turn => 4,
                Stage::River | Stage::Showdown => 5,
            };
            assert_eq!(state.community_cards.len(), expected_board);

            let mut cards = HashSet::default();
            cards.extend(state.community_cards.iter().copied());
            cards.extend(state.hole_cards.values().flatten().copied());
            assert_eq!(cards.len(), 2 * agents.len() + expected_board);
        }
    }

    #[test]
    fn folded_agents_stop_contributing() {
        let mut sim = new_sim(roster(6), 13);
        sim.start().unwrap();
        run_hands(&mut sim, 4);

        let events = sim.sink().events();
        let mut folds = 0;
        for hand in hands(events) {
            // Contribution of each folded agent at the time it folded.
            let mut folded: AHashMap<AgentId, Chips> = AHashMap::default();
            let mut last: Option<&HandState> = None;

            for event in hand {
                match event {
                    SimEvent::Decision(d) if d.action == Action::Fold => {
                        folds += 1;
                        let chips = last.map(|s| s.contribution(&d.agent)).unwrap_or_default();
                        folded.insert(d.agent.clone(), chips);
                    }
                    SimEvent::Decision(d) if d.action != Action::Thinking => {
                        assert!(!folded.contains_key(&d.agent), "{} acted after fold", d.agent);
                    }
                    SimEvent::State(s) => {
                        for (agent, chips) in folded.iter() {
                            assert!(s.is_folded(agent));
                            assert_eq!(s.contribution(agent), *chips);
                        }
                        last = Some(s);
                    }
                    _ => {}
                }
            }
        }

        assert!(folds > 0);
    }

    #[test]
    fn actions_are_paced_and_ordered() {
        let mut sim = new_sim(roster(4), 17);
        sim.start().unwrap();
        run_hands(&mut sim, 2);

        let decisions = sim.sink().decisions().collect::<Vec<_>>();
        assert!(decisions.windows(2).all(|w| w[0].at < w[1].at));

        // Each action follows its agent thinking by the think time.
        for w in decisions.windows(2) {
            if w[1].action != Action::Thinking {
                assert_eq!(w[0].action, Action::Thinking);
                assert_eq!(w[0].agent, w[1].agent);

                let think = w[1].at - w[0].at;
                assert!(think >= Duration::from_millis(800));
                assert!(think < Duration::from_millis(1_500));
            }
        }
    }

    #[test]
    fn stop_cancels_everything() {
        let mut sim = new_sim(roster(6), 19);
        sim.start().unwrap();
        sim.advance(SECOND * 5);
        assert!(sim.next_deadline().is_some());

        let generation = sim.timers.generation();
        sim.stop();
        let count = sim.sink().events().len();
        assert!(!sim.is_running());
        assert_eq!(sim.next_deadline(), None);
        assert_eq!(sim.timers.generation(), generation + 1);

        sim.advance(SECOND * 300);
        assert_eq!(sim.sink().events().len(), count);

        // Idempotent.
        sim.stop();
        sim.advance(SECOND * 300);
        assert_eq!(sim.sink().events().len(), count);
    }

    #[test]
    fn runs_are_deterministic() {
        let run = |seed| {
            let mut sim = new_sim(roster(6), seed);
            sim.start().unwrap();
            run_hands(&mut sim, 3);

            let decisions = sim.sink().decisions().cloned().collect::<Vec<_>>();
            let winners = sim
                .sink()
                .states()
                .filter_map(|s| s.winner.clone())
                .collect::<Vec<_>>();
            (decisions, winners)
        };

        let (d1, w1) = run(23);
        let (d2, w2) = run(23);
        assert_eq!(d1, d2);
        assert_eq!(w1, w2);
        assert!(!w1.is_empty());

        let (d3, _) = run(24);
        assert_ne!(d1, d3);
    }

    #[test]
    fn folded_agent_pays_the_other() {
        let agents = vec![
            Agent::new("a", "A", 40.0, 3.0),
            Agent::new("b", "B", 60.0, 2.0),
        ];
        let (a, b) = (agents[0].id.clone(), agents[1].id.clone());

        // A bets preflop and B calls, A folds on the flop, B calls after.
        let rng = Scripted::new(&[0.4, 0.9, 0.0], 0.9);
        let mut sim =
            Simulator::with_config(agents, Recorder::default(), SimConfig::default(), rng);
        sim.start().unwrap();
        run_hands(&mut sim, 1);

        let fold = sim.sink().decisions().find(|d| d.action == Action::Fold);
        assert_eq!(fold.map(|d| &d.agent), Some(&a));

        let showdown = sim
            .sink()
            .states()
            .find(|s| s.winner.is_some())
            .unwrap();
        let paid = showdown.contribution(&a);
        assert!(paid > Chips::ZERO);
        assert_eq!(showdown.winner.as_ref(), Some(&b));
        assert_eq!(showdown.stack(&b), Chips::new(1_000) + paid);
        assert_eq!(showdown.stack(&a) + paid, Chips::new(1_000));
        assert!(showdown.is_folded(&a));
    }

    #[test]
    fn calls_match_the_round_bet() {
        let agents = vec![
            Agent::new("a", "A", 40.0, 3.0),
            Agent::new("b", "B", 60.0, 2.0),
        ];
        let (a, b) = (agents[0].id.clone(), agents[1].id.clone());

        // Preflop A bets and B calls, on the flop A raises and B calls, then
        // both call with no bet in the round.
        let rng = Scripted::new(&[0.4, 0.9, 0.5, 0.99, 0.9], 0.9);
        let mut sim =
            Simulator::with_config(agents, Recorder::default(), SimConfig::default(), rng);
        sim.start().unwrap();
        run_hands(&mut sim, 1);

        let actions = sim
            .sink()
            .decisions()
            .filter(|d| d.action != Action::Thinking)
            .map(|d| (d.agent.clone(), d.action, d.amount))
            .collect::<Vec<_>>();

        let (bet, raise) = match (actions[0].2, actions[2].2) {
            (Some(bet), Some(raise)) => (bet, raise),
            _ => panic!("missing amounts {actions:?}"),
        };
        assert!(bet > Chips::ZERO);
        assert!(raise > Chips::ZERO);

        assert_eq!(
            actions[..4],
            [
                (a.clone(), Action::Bet, Some(bet)),
                (b.clone(), Action::Call, Some(bet)),
                (a.clone(), Action::Raise, Some(raise)),
                (b.clone(), Action::Call, Some(raise)),
            ]
        );

        // Turn and river have no bet to call.
        assert_eq!(actions.len(), 8);
        for (idx, action) in actions[4..].iter().enumerate() {
            let agent = if idx % 2 == 0 { &a } else { &b };
            assert_eq!(action, &(agent.clone(), Action::Call, Some(Chips::ZERO)));
        }
    }

    #[test]
    fn only_the_showdown_snapshot_names_the_winner() {
        let mut sim = new_sim(roster(4), 41);
        sim.start().unwrap();
        run_hands(&mut sim, 3);

        for hand in hands(sim.sink().events()) {
            let states = hand
                .iter()
                .filter_map(|e| match e {
                    SimEvent::State(s) => Some(s),
                    _ => None,
                })
                .collect::<Vec<_>>();

            let winners = states.iter().filter(|s| s.winner.is_some()).count();
            if states.last().is_some_and(|s| s.stage == Stage::Showdown) {
                assert_eq!(winners, 1);

                let reset = states[states.len() - 1];
                assert_eq!(reset.pot, Chips::ZERO);
                assert!(reset.winner.is_none());
                assert!(states[states.len() - 2].winner.is_some());
            }
        }
    }

    #[test]
    fn broke_agents_sit_out() {
        let config = SimConfig {
            starting_stack: Chips::ZERO,
            ..Default::default()
        };
        let agents = roster(3);
        let mut sim = Simulator::with_config(
            agents.clone(),
            Recorder::default(),
            config,
            StdRng::seed_from_u64(29),
        );
        sim.start().unwrap();
        run_hands(&mut sim, 1);

        // Agents think but never act.
        assert!(
            sim.sink()
                .decisions()
                .all(|d| d.action == Action::Thinking)
        );

        let showdown = sim
            .sink()
            .states()
            .find(|s| s.winner.is_some())
            .unwrap();
        assert_eq!(showdown.folded.len(), agents.len());
        assert_eq!(showdown.pot, Chips::ZERO);
    }

    #[test]
    fn next_hand_carries_stacks() {
        let agents = roster(5);
        let mut sim = new_sim(agents.clone(), 31);
        sim.start().unwrap();
        run_hands(&mut sim, 1);

        let events = sim.sink().events();
        let split = events
            .iter()
            .position(|e| matches!(e, SimEvent::NewHand))
            .unwrap();

        let last = events[..split]
            .iter()
            .rev()
            .find_map(|e| match e {
                SimEvent::State(s) => Some(s),
                _ => None,
            })
            .unwrap();
        assert_eq!(last.stage, Stage::Showdown);
        assert_eq!(last.pot, Chips::ZERO);
        assert!(last.winner.is_none());

        let SimEvent::State(first) = &events[split + 1] else {
            panic!("expected a snapshot after the new hand signal");
        };
        assert_eq!(first.hand, 2);
        assert_eq!(first.stage, Stage::Preflop);
        assert_eq!(first.stacks, last.stacks);
        assert_eq!(first.pot, Chips::ZERO);
        assert!(first.community_cards.is_empty());
        assert!(first.folded.is_empty());
        assert!(first.winner.is_none());
        assert!(first.contributions.values().all(|c| *c == Chips::ZERO));
        assert_ne!(first.hole_cards, last.hole_cards);
    }

    #[test]
    fn restart_drops_previous_generation() {
        let agents = roster(3);
        let mut sim = new_sim(agents.clone(), 37);
        sim.start().unwrap();

        // First agent is thinking, the others are still pending.
        sim.advance(Duration::from_millis(500));
        sim.start().unwrap();
        let restart = sim.sink().events().len();

        run_hands(&mut sim, 1);
        let events = &sim.sink().events()[restart..];
        let flop = events
            .iter()
            .position(|e| matches!(e, SimEvent::State(s) if s.stage == Stage::Flop))
            .unwrap();

        for agent in &agents {
            let thinking = events[..flop]
                .iter()
                .filter(|e| {
                    matches!(e, SimEvent::Decision(d)
                        if d.agent == agent.id && d.action == Action::Thinking)
                })
                .count();
            assert_eq!(thinking, 1, "{} thinking", agent.id);
        }

        let SimEvent::State(first) = &sim.sink().events()[restart - 1] else {
            panic!("expected the restart snapshot");
        };
        assert_eq!(first.hand, 1);
    }

    #[test]
    fn too_many_agents_to_deal() {
        let mut sim = new_sim(roster(27), 41);
        assert_eq!(sim.start(), Err(SimError::DeckExhausted));
        assert!(!sim.is_running());
        assert_eq!(sim.next_deadline(), None);
        assert!(sim.sink().events().is_empty());
    }

    #[test]
    fn deck_exhausted_aborts_hand() {
        // 25 agents use 50 cards, the flop cannot be dealt.
        let mut sim = new_sim(roster(25), 43);
        sim.start().unwrap();
        sim.advance(SECOND * 600);

        assert!(!sim.is_running());
        assert_eq!(sim.next_deadline(), None);
        assert!(sim.sink().states().all(|s| s.stage == Stage::Preflop));
        assert_eq!(sim.sink().new_hands(), 0);
    }

    #[test]
    fn scaled_config() {
        let config = SimConfig::default().scaled(4.0);
        assert_eq!(config.think_base, Duration::from_millis(200));
        assert_eq!(config.new_hand_delay, Duration::from_millis(750));
        assert_eq!(config.starting_stack, Chips::new(1_000));
    }
}
