//! The mascot — an autonomous on-screen companion that roams, naps,
//! celebrates and reacts to clicks.
//!
//! A [`Mascot`] is a cheap, cloneable handle. The host builds one at startup
//! and passes it to whichever components need it; independent instances
//! never share state.
//!
//! All state lives in one `MascotCore` behind a mutex. Every transition goes
//! through `MascotCore::transition`, which bumps the revision and cancels
//! the pending revert timer, so a revert scheduled for an older state can
//! never clobber a newer one. Events are queued for listeners before that
//! lock is released, so listeners see them in revision order whichever
//! thread made the change.

pub mod config;
pub mod decision;
pub mod ledger;
pub mod observer;
pub mod policy;
pub mod scheduler;
pub mod state;
pub mod triggers;
pub mod zones;

#[cfg(test)]
mod tests;

pub use config::{load_config, save_config, InteractionRefresh, MascotConfig};
pub use decision::{Decision, DecisionEngine, DecisionReason};
pub use ledger::{Ledger, LedgerSnapshot, MoodLabel};
pub use observer::{ChangeCause, EventOutbox, MascotEvent, ObserverRegistry, Subscription};
pub use state::{AnimationState, Position};
pub use triggers::TriggerKind;

use crate::error::{MascotError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scheduler::{DelayedTask, Roamer, RoamingScheduler};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::Instant;
use uuid::Uuid;

// ── Snapshot ───────────────────────────────────────────

/// Synchronous read of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MascotSnapshot {
    pub position: Position,
    pub state: AnimationState,
    pub ledger: LedgerSnapshot,
    pub roaming: bool,
    pub revision: u64,
}

// ── Core State ─────────────────────────────────────────

struct MascotCore {
    position: Position,
    state: AnimationState,
    ledger: Ledger,
    rng: StdRng,
    last_interaction: Instant,
    revision: u64,
    ticks: u64,
    /// Revert-to-idle timer for the current state, if it is a timed one.
    pending_revert: DelayedTask,
}

impl MascotCore {
    /// The single setter: every state/position change funnels through here.
    fn transition(
        &mut self,
        state: AnimationState,
        position: Option<Position>,
        cause: ChangeCause,
    ) -> MascotEvent {
        self.pending_revert.cancel();
        let previous_state = self.state;
        self.state = state;
        if let Some(position) = position {
            self.position = position;
        }
        self.revision += 1;
        MascotEvent {
            revision: self.revision,
            state,
            previous_state,
            position: self.position,
            cause,
            at_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

// ── Mascot ─────────────────────────────────────────────

struct MascotInner {
    id: Uuid,
    config: MascotConfig,
    engine: DecisionEngine,
    core: Mutex<MascotCore>,
    observers: ObserverRegistry,
    outbox: EventOutbox,
    scheduler: RoamingScheduler,
    runtime: Handle,
    weak_self: Weak<MascotInner>,
}

#[derive(Clone)]
pub struct Mascot {
    inner: Arc<MascotInner>,
}

impl Mascot {
    /// Build a mascot bound to the current Tokio runtime.
    pub fn new(config: MascotConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| MascotError::NoRuntime)?;
        Self::with_runtime(config, runtime)
    }

    /// Build a mascot whose timers run on `runtime`.
    pub fn with_runtime(config: MascotConfig, runtime: Handle) -> Result<Self> {
        config.validate()?;
        let engine = DecisionEngine::new(&config)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let core = MascotCore {
            position: config.home,
            state: AnimationState::Idle,
            ledger: Ledger::new(),
            rng,
            last_interaction: Instant::now(),
            revision: 0,
            ticks: 0,
            pending_revert: DelayedTask::new(),
        };
        let id = Uuid::new_v4();
        tracing::debug!(mascot = %id, seed = ?config.seed, "mascot created");

        let inner = Arc::new_cyclic(|weak_self| MascotInner {
            id,
            config,
            engine,
            core: Mutex::new(core),
            observers: ObserverRegistry::new(),
            outbox: EventOutbox::new(),
            scheduler: RoamingScheduler::new(),
            runtime,
            weak_self: weak_self.clone(),
        });
        Ok(Self { inner })
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn config(&self) -> &MascotConfig {
        &self.inner.config
    }

    // ── Lifecycle ──

    /// Begin autonomous roaming. Calling it again while roaming does
    /// nothing; returns whether this call started the loop.
    pub fn start_roaming(&self) -> bool {
        let started = self
            .inner
            .scheduler
            .start(&self.inner.runtime, Arc::downgrade(&self.inner));
        if started {
            tracing::info!(mascot = %self.inner.id, "roaming started");
        }
        started
    }

    /// Stop the roaming loop. Position, state and ledger stay as they are,
    /// and an in-flight action still reverts to idle on schedule.
    pub fn stop_roaming(&self) -> bool {
        let stopped = self.inner.scheduler.stop();
        if stopped {
            tracing::info!(mascot = %self.inner.id, "roaming stopped");
        }
        stopped
    }

    pub fn is_roaming(&self) -> bool {
        self.inner.scheduler.is_running()
    }

    /// Run one decision cycle right now, outside the scheduler cadence.
    /// Returns `None` while the mascot is napping.
    pub fn tick_now(&self) -> Option<MascotEvent> {
        self.inner.run_tick()
    }

    /// Decision cycles run so far, including ones slept through.
    pub fn ticks(&self) -> u64 {
        self.inner.lock_core().ticks
    }

    // ── Observation ──

    /// Subscribe to every state/position change.
    pub fn on_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&MascotEvent) + Send + Sync + 'static,
    {
        self.inner.observers.subscribe(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.observers.len()
    }

    pub fn get_current_state(&self) -> MascotSnapshot {
        let roaming = self.is_roaming();
        let core = self.inner.lock_core();
        MascotSnapshot {
            position: core.position,
            state: core.state,
            ledger: core.ledger.snapshot(),
            roaming,
            revision: core.revision,
        }
    }

    /// Time since the last interaction that counts for boredom.
    pub fn idle_for(&self) -> Duration {
        self.inner.lock_core().last_interaction.elapsed()
    }

    // ── Triggers ──

    pub fn trigger(&self, kind: TriggerKind) -> MascotEvent {
        self.inner.run_trigger(kind)
    }

    pub fn trigger_celebration(&self) -> MascotEvent {
        self.trigger(TriggerKind::Celebration)
    }

    pub fn trigger_surprise(&self) -> MascotEvent {
        self.trigger(TriggerKind::Surprise)
    }

    pub fn trigger_laugh(&self) -> MascotEvent {
        self.trigger(TriggerKind::Laugh)
    }

    pub fn trigger_sing(&self) -> MascotEvent {
        self.trigger(TriggerKind::Sing)
    }

    pub fn trigger_think(&self) -> MascotEvent {
        self.trigger(TriggerKind::Think)
    }

    pub fn jump_to_chat(&self) -> MascotEvent {
        self.trigger(TriggerKind::JumpToChat)
    }

    pub fn go_home(&self) -> MascotEvent {
        self.trigger(TriggerKind::GoHome)
    }

    #[cfg(test)]
    fn set_ledger(&self, ledger: Ledger) {
        self.inner.lock_core().ledger = ledger;
    }
}

impl std::fmt::Debug for Mascot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mascot").field("id", &self.inner.id).finish()
    }
}

impl MascotInner {
    fn lock_core(&self) -> MutexGuard<'_, MascotCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run_tick(&self) -> Option<MascotEvent> {
        let event = {
            let mut guard = self.lock_core();
            let core = &mut *guard;
            core.ticks += 1;

            // A nap runs its full length; only a click wakes the mascot early.
            if core.state == AnimationState::Sleeping {
                tracing::trace!(mascot = %self.id, "still asleep, skipping tick");
                return None;
            }

            core.ledger.decay(&mut core.rng);
            let idle_for = core.last_interaction.elapsed();
            let decision = self
                .engine
                .decide(&core.ledger, idle_for, core.position, &mut core.rng);
            core.ledger.apply_action_cost(decision.state);

            tracing::debug!(
                mascot = %self.id,
                state = %decision.state,
                reason = ?decision.reason,
                energy = core.ledger.energy(),
                mood = core.ledger.mood(),
                happiness = core.ledger.happiness(),
                "decision"
            );

            let event = core.transition(
                decision.state,
                decision.target,
                ChangeCause::Decision {
                    reason: decision.reason,
                },
            );
            if let Some(after) = decision.duration {
                self.schedule_revert(core, decision.state, after);
            }
            self.outbox.enqueue(event.clone());
            event
        };
        self.outbox.flush(&self.observers);
        Some(event)
    }

    fn run_trigger(&self, kind: TriggerKind) -> MascotEvent {
        let event = {
            let mut guard = self.lock_core();
            let core = &mut *guard;
            core.ledger.adjust(kind.bonus());
            if kind.refreshes_interaction(self.config.interaction_refresh) {
                core.last_interaction = Instant::now();
            }
            let state = kind.state();
            tracing::debug!(mascot = %self.id, trigger = ?kind, %state, "trigger");

            let event = core.transition(
                state,
                kind.teleport(&self.config),
                ChangeCause::Trigger { kind },
            );
            self.schedule_revert(core, state, kind.duration(&self.config));
            self.outbox.enqueue(event.clone());
            event
        };
        self.outbox.flush(&self.observers);
        event
    }

    /// Arm the revert timer for the state `core` just entered.
    fn schedule_revert(&self, core: &mut MascotCore, expected: AnimationState, after: Duration) {
        let weak = self.weak_self.clone();
        let revision = core.revision;
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(inner) = weak.upgrade() {
                inner.revert_to_idle(expected, revision);
            }
        });
        core.pending_revert.replace(handle);
    }

    /// Go back to idle, but only if nothing has happened since the timer was
    /// armed.
    fn revert_to_idle(&self, expected: AnimationState, revision: u64) -> Option<MascotEvent> {
        let event = {
            let mut core = self.lock_core();
            if core.revision != revision || core.state != expected {
                tracing::trace!(mascot = %self.id, %expected, "revert superseded");
                return None;
            }
            // This task is the pending revert; don't abort ourselves.
            core.pending_revert.disarm();
            let cause = if expected == AnimationState::Sleeping {
                ChangeCause::Wake
            } else {
                ChangeCause::Revert
            };
            let event = core.transition(AnimationState::Idle, None, cause);
            self.outbox.enqueue(event.clone());
            event
        };
        self.outbox.flush(&self.observers);
        Some(event)
    }
}

impl Roamer for MascotInner {
    fn next_delay(&self) -> Duration {
        let (min, max) = self.config.roam_interval();
        let mut core = self.lock_core();
        core.rng.gen_range(min..=max)
    }

    fn tick(&self) {
        self.run_tick();
    }
}
