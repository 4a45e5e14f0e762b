//! Shared config utilities for loading/saving JSON config files.

use crate::error::{MascotError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default location of the mascot config: `<config dir>/mascot-engine/<file_name>`.
pub fn default_config_path(file_name: &str) -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mascot-engine")
        .join(file_name)
}

/// Generic load for any Serde config type with a `Default` implementation.
/// Falls back to `T::default()` if the file is missing or unparsable.
pub fn load_json_config<T: DeserializeOwned + Default>(path: &Path, label: &str) -> T {
    match read_json_config(path) {
        Ok(config) => {
            tracing::info!(label, path = %path.display(), "loaded config");
            config
        }
        Err(MascotError::Io { .. }) => {
            tracing::info!(label, path = %path.display(), "no config file, using defaults");
            T::default()
        }
        Err(e) => {
            tracing::warn!(label, error = %e, "config unreadable, using defaults");
            T::default()
        }
    }
}

/// Strict load: any read or parse failure is returned to the caller.
pub fn read_json_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| MascotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str::<T>(&content).map_err(|source| MascotError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Generic save for any Serde config type. Creates missing parent directories.
pub fn save_json_config<T: Serialize>(path: &Path, config: &T, label: &str) -> Result<()> {
    let io_err = |source| MascotError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(config).map_err(|source| MascotError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(io_err)?;
    tracing::info!(label, path = %path.display(), "saved config");
    Ok(())
}
