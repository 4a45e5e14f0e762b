//! Decision engine — picks the mascot's next action on every roaming tick.
//!
//! Priority order, first match wins:
//! 1. energy below the floor → forced nap
//! 2. ignored for too long and an attention roll succeeds → wave
//! 3. very happy and in a great mood → something exuberant
//! 4. otherwise the weighted roaming table, where "relocate" is the
//!    heaviest row
//!
//! [`DecisionEngine::choose`] is a pure function of the ledger, the idle time
//! and a [`PolicyRoll`]; [`DecisionEngine::decide`] draws the roll from an
//! RNG and resolves relocation into a concrete target and gait.

use super::config::{ActionDurations, MascotConfig};
use super::ledger::Ledger;
use super::policy::{elated_table, RoamAction, WeightedTable};
use super::state::{AnimationState, Position};
use super::zones::{classify_movement, select_safe_position, MovementConfig};
use crate::error::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ── Config ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Energy strictly below this forces a nap.
    pub low_energy_threshold: f32,
    /// How long the forced nap lasts.
    pub sleep_duration_ms: u64,
    /// Idle time after which the mascot starts seeking attention.
    pub boredom_after_secs: u64,
    /// Chance per tick of waving once bored.
    pub boredom_chance: f64,
    /// Happiness strictly above this (together with mood) counts as elated.
    pub elated_happiness: f32,
    /// Mood strictly above this (together with happiness) counts as elated.
    pub elated_mood: f32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            low_energy_threshold: 20.0,
            sleep_duration_ms: 8000,
            boredom_after_secs: 60,
            boredom_chance: 0.3,
            elated_happiness: 90.0,
            elated_mood: 85.0,
        }
    }
}

// ── Decisions ──────────────────────────────────────────

/// Which policy branch produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    Exhausted,
    Bored,
    Elated,
    Rolled,
}

/// The random inputs of one policy evaluation, each in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyRoll {
    /// Compared against the boredom chance.
    pub attention: f64,
    /// Indexes the elated subset or the roaming table.
    pub action: f64,
}

impl PolicyRoll {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            attention: rng.gen(),
            action: rng.gen(),
        }
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub state: AnimationState,
    /// New position, when the mascot relocates.
    pub target: Option<Position>,
    /// How long the state plays before reverting to idle; `None` for idle.
    pub duration: Option<Duration>,
    pub reason: DecisionReason,
}

// ── Engine ─────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: DecisionConfig,
    movement: MovementConfig,
    durations: ActionDurations,
    zones: Vec<Position>,
    roam_table: WeightedTable<RoamAction>,
    elated: WeightedTable<AnimationState>,
}

impl DecisionEngine {
    pub fn new(config: &MascotConfig) -> Result<Self> {
        Ok(Self {
            config: config.decision.clone(),
            movement: config.movement.clone(),
            durations: config.durations.clone(),
            zones: config.safe_zones.clone(),
            roam_table: config.policy.to_table()?,
            elated: elated_table(),
        })
    }

    /// Run the priority policy. Deterministic for a given roll.
    pub fn choose(
        &self,
        ledger: &Ledger,
        idle_for: Duration,
        roll: PolicyRoll,
    ) -> (RoamAction, DecisionReason) {
        let cfg = &self.config;

        if ledger.energy() < cfg.low_energy_threshold {
            return (
                RoamAction::Perform(AnimationState::Sleeping),
                DecisionReason::Exhausted,
            );
        }

        if idle_for > Duration::from_secs(cfg.boredom_after_secs)
            && roll.attention < cfg.boredom_chance
        {
            return (
                RoamAction::Perform(AnimationState::Waving),
                DecisionReason::Bored,
            );
        }

        if ledger.happiness() > cfg.elated_happiness && ledger.mood() > cfg.elated_mood {
            let state = *self.elated.pick(roll.action);
            return (RoamAction::Perform(state), DecisionReason::Elated);
        }

        (*self.roam_table.pick(roll.action), DecisionReason::Rolled)
    }

    /// Pick the next action and resolve it into state, target and duration.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        ledger: &Ledger,
        idle_for: Duration,
        from: Position,
        rng: &mut R,
    ) -> Decision {
        let roll = PolicyRoll::draw(rng);
        let (action, reason) = self.choose(ledger, idle_for, roll);

        match action {
            RoamAction::Relocate => {
                let target = select_safe_position(from, &self.zones, rng);
                let movement = classify_movement(from, target, &self.movement);
                Decision {
                    state: movement.state,
                    target: Some(movement.target),
                    duration: Some(movement.duration),
                    reason,
                }
            }
            RoamAction::Perform(state) => Decision {
                state,
                target: None,
                duration: self.hold_duration(state),
                reason,
            },
        }
    }

    /// How long an in-place action plays. Idle holds indefinitely.
    pub fn hold_duration(&self, state: AnimationState) -> Option<Duration> {
        match state {
            AnimationState::Idle => None,
            AnimationState::Sleeping => {
                Some(Duration::from_millis(self.config.sleep_duration_ms))
            }
            other => Some(self.durations.for_state(other)),
        }
    }
}
