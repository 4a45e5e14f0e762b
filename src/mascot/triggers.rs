//! User-interaction triggers. These bypass the roaming policy entirely.

use super::config::{InteractionRefresh, MascotConfig};
use super::ledger::LedgerDelta;
use super::state::{AnimationState, Position};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Celebration,
    Surprise,
    Laugh,
    Sing,
    Think,
    JumpToChat,
    GoHome,
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 7] = [
        TriggerKind::Celebration,
        TriggerKind::Surprise,
        TriggerKind::Laugh,
        TriggerKind::Sing,
        TriggerKind::Think,
        TriggerKind::JumpToChat,
        TriggerKind::GoHome,
    ];

    pub fn state(self) -> AnimationState {
        match self {
            TriggerKind::Celebration => AnimationState::Celebrating,
            TriggerKind::Surprise => AnimationState::Surprised,
            TriggerKind::Laugh => AnimationState::Laughing,
            TriggerKind::Sing => AnimationState::Singing,
            TriggerKind::Think => AnimationState::Thinking,
            TriggerKind::JumpToChat => AnimationState::Jumping,
            TriggerKind::GoHome => AnimationState::Waving,
        }
    }

    /// Ledger reward for the interaction.
    pub fn bonus(self) -> LedgerDelta {
        match self {
            TriggerKind::Celebration => LedgerDelta::new(0.0, 10.0, 15.0),
            TriggerKind::Surprise => LedgerDelta::new(0.0, 3.0, 0.0),
            TriggerKind::Laugh => LedgerDelta::new(0.0, 5.0, 5.0),
            TriggerKind::Sing => LedgerDelta::new(0.0, 6.0, 3.0),
            TriggerKind::JumpToChat => LedgerDelta::new(-2.0, 0.0, 3.0),
            TriggerKind::Think | TriggerKind::GoHome => LedgerDelta::NONE,
        }
    }

    pub fn duration(self, config: &MascotConfig) -> Duration {
        config.durations.for_state(self.state())
    }

    /// Teleport target, for triggers that move the mascot.
    pub fn teleport(self, config: &MascotConfig) -> Option<Position> {
        match self {
            TriggerKind::JumpToChat => Some(config.chat),
            TriggerKind::GoHome => Some(config.home),
            _ => None,
        }
    }

    pub fn refreshes_interaction(self, policy: InteractionRefresh) -> bool {
        match policy {
            InteractionRefresh::CelebrationOnly => self == TriggerKind::Celebration,
            InteractionRefresh::AllTriggers => true,
        }
    }
}
