//! Error types for the fallible edges of the engine: config I/O and
//! validation, policy tables, and runtime binding.
//!
//! The simulation itself is total — ledger updates clamp, position
//! selection always falls back — so nothing on the tick path returns these.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MascotError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid mascot config: {0}")]
    InvalidConfig(String),

    #[error("invalid policy weights: {0}")]
    InvalidWeights(String),

    /// Timers are spawned onto the Tokio runtime that was current when the
    /// mascot was built.
    #[error("mascot must be created inside a Tokio runtime")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, MascotError>;
