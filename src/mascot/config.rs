//! Mascot configuration — persisted to disk as JSON.

use super::decision::DecisionConfig;
use super::policy::PolicyWeights;
use super::state::{AnimationState, Position};
use super::zones::{MovementConfig, SAFE_ZONES};
use crate::error::{MascotError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "mascot_config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MascotConfig {
    /// Shortest wait between roaming ticks.
    pub roam_interval_min_ms: u64,
    /// Longest wait between roaming ticks.
    pub roam_interval_max_ms: u64,
    pub decision: DecisionConfig,
    pub movement: MovementConfig,
    pub durations: ActionDurations,
    pub policy: PolicyWeights,
    /// Where the mascot starts and where `go_home` sends it.
    pub home: Position,
    /// Spot next to the chat widget used by `jump_to_chat`.
    pub chat: Position,
    pub safe_zones: Vec<Position>,
    pub interaction_refresh: InteractionRefresh,
    /// Fixed RNG seed for reproducible runs. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for MascotConfig {
    fn default() -> Self {
        Self {
            roam_interval_min_ms: 4000,
            roam_interval_max_ms: 9000,
            decision: DecisionConfig::default(),
            movement: MovementConfig::default(),
            durations: ActionDurations::default(),
            policy: PolicyWeights::default(),
            home: Position { x: 88.0, y: 82.0 },
            chat: Position { x: 78.0, y: 70.0 },
            safe_zones: SAFE_ZONES.to_vec(),
            interaction_refresh: InteractionRefresh::default(),
            seed: None,
        }
    }
}

/// Which triggers count as "the user played with the mascot" for the
/// boredom timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionRefresh {
    /// Only a celebration click resets the timer.
    #[default]
    CelebrationOnly,
    /// Any trigger resets the timer.
    AllTriggers,
}

/// How long each timed action plays before reverting to idle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionDurations {
    pub celebrate_ms: u64,
    pub dance_ms: u64,
    pub sing_ms: u64,
    pub laugh_ms: u64,
    pub think_ms: u64,
    pub wave_ms: u64,
    pub jump_ms: u64,
    pub surprise_ms: u64,
    pub love_ms: u64,
    /// Fallback for states without their own entry (walking/running
    /// durations normally come from the trip length).
    pub default_ms: u64,
}

impl Default for ActionDurations {
    fn default() -> Self {
        Self {
            celebrate_ms: 3000,
            dance_ms: 3000,
            sing_ms: 4000,
            laugh_ms: 2000,
            think_ms: 3000,
            wave_ms: 2500,
            jump_ms: 1500,
            surprise_ms: 1500,
            love_ms: 2500,
            default_ms: 2000,
        }
    }
}

impl ActionDurations {
    pub fn for_state(&self, state: AnimationState) -> Duration {
        let ms = match state {
            AnimationState::Celebrating => self.celebrate_ms,
            AnimationState::Dancing => self.dance_ms,
            AnimationState::Singing => self.sing_ms,
            AnimationState::Laughing => self.laugh_ms,
            AnimationState::Thinking => self.think_ms,
            AnimationState::Waving => self.wave_ms,
            AnimationState::Jumping => self.jump_ms,
            AnimationState::Surprised => self.surprise_ms,
            AnimationState::Love => self.love_ms,
            AnimationState::Idle
            | AnimationState::Walking
            | AnimationState::Running
            | AnimationState::Sleeping => self.default_ms,
        };
        Duration::from_millis(ms)
    }
}

impl MascotConfig {
    /// Reject configs the engine can't run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(MascotError::InvalidConfig(msg)) };

        if self.roam_interval_min_ms == 0 {
            return invalid("roam_interval_min_ms must be positive".to_string());
        }
        if self.roam_interval_min_ms > self.roam_interval_max_ms {
            return invalid(format!(
                "roam interval {}..{} ms is inverted",
                self.roam_interval_min_ms, self.roam_interval_max_ms
            ));
        }

        let d = &self.decision;
        if !(0.0..=1.0).contains(&d.boredom_chance) {
            return invalid(format!("boredom_chance {} outside [0, 1]", d.boredom_chance));
        }
        if !(0.0..=100.0).contains(&d.low_energy_threshold) {
            return invalid(format!(
                "low_energy_threshold {} outside [0, 100]",
                d.low_energy_threshold
            ));
        }
        if d.sleep_duration_ms == 0 {
            return invalid("sleep_duration_ms must be positive".to_string());
        }
        for (label, value) in [
            ("elated_happiness", d.elated_happiness),
            ("elated_mood", d.elated_mood),
        ] {
            if !value.is_finite() {
                return invalid(format!("{} must be a finite number, got {}", label, value));
            }
        }

        let m = &self.movement;
        for (label, value) in [
            ("run_distance", m.run_distance),
            ("run_ms_per_unit", m.run_ms_per_unit),
            ("walk_ms_per_unit", m.walk_ms_per_unit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{} must be finite and non-negative, got {}", label, value));
            }
        }

        for (label, pos) in [("home", &self.home), ("chat", &self.chat)] {
            if !pos.in_viewport() {
                return invalid(format!("{} position {:?} is off screen", label, pos));
            }
        }
        if let Some(pos) = self.safe_zones.iter().find(|p| !p.in_viewport()) {
            return invalid(format!("safe zone {:?} is off screen", pos));
        }

        self.policy.to_table()?;
        Ok(())
    }

    pub fn roam_interval(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.roam_interval_min_ms),
            Duration::from_millis(self.roam_interval_max_ms),
        )
    }

    /// Strict load: errors if the file is missing, unparsable or invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = crate::config::read_json_config(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        crate::config::save_json_config(path, self, "Mascot")
    }
}

/// Load config from disk, falling back to defaults when the file is missing,
/// unparsable or fails validation.
pub fn load_config(path: &Path) -> MascotConfig {
    let config: MascotConfig = crate::config::load_json_config(path, "Mascot");
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            tracing::warn!(error = %e, "rejecting mascot config, using defaults");
            MascotConfig::default()
        }
    }
}

/// Save config to disk.
pub fn save_config(path: &Path, config: &MascotConfig) -> Result<()> {
    config.save(path)
}
