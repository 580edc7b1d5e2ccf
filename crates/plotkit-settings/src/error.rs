//! Error types for the settings crate.
//!
//! This module provides structured error types for plotter profile loading,
//! saving, and validation.

use std::io;
use thiserror::Error;

use plotkit_core::ProtocolError;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The profile file could not be loaded.
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    /// The profile file could not be saved.
    #[error("Failed to save settings: {0}")]
    SaveError(String),

    /// A profile value is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// The file extension is neither `.json` nor `.toml`.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// The configuration directory could not be found.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// The profile's protocol could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
