//! Behavior engine for an on-screen companion mascot: it roams between safe
//! zones, keeps an energy/mood/happiness ledger, naps when exhausted and
//! reacts to user interactions. Rendering is left to the host, which
//! subscribes to state changes.

pub mod config;
pub mod error;
pub mod mascot;

pub use error::{MascotError, Result};
pub use mascot::{
    AnimationState, ChangeCause, Ledger, Mascot, MascotConfig, MascotEvent, MascotSnapshot,
    Position, Subscription, TriggerKind,
};
