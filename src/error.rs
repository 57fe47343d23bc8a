//! Error types for the extraction engine.
//!
//! Only conditions that must stop work on an episode are errors. Degraded
//! input (no click markers, empty scenes) is reported through
//! [`crate::diagnostics`] instead.

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::error_codes::{
    TAPE_CFG_001_INVALID_CONFIG, TAPE_EP_001_MISSING_EPISODE, TAPE_EP_002_INVALID_RANGE,
    TAPE_EP_003_UNNUMBERED_FILE, TAPE_IO_001_ACCESS_FAILED, TAPE_IO_002_MALFORMED_JSON,
};

/// Errors raised while loading texts or building graphs.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Requested episode number is absent from the text store
    #[error("episode {episode} not found in text store")]
    MissingEpisode { episode: u32 },

    /// Episode range is empty or beyond the configured maximum
    #[error("invalid episode range {start}..={end} (max episode {max})")]
    InvalidRange { start: u32, end: u32, max: u32 },

    /// A file in a text directory could not be mapped to an episode number
    #[error("cannot determine episode number for {path}: {reason}")]
    InvalidEpisodeFile { path: PathBuf, reason: String },

    /// Filesystem access failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ExtractError {
    /// Wrap an I/O error with the path that produced it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExtractError::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable error code (see [`crate::error_codes`])
    pub fn code(&self) -> &'static str {
        match self {
            ExtractError::MissingEpisode { .. } => TAPE_EP_001_MISSING_EPISODE,
            ExtractError::InvalidRange { .. } => TAPE_EP_002_INVALID_RANGE,
            ExtractError::InvalidEpisodeFile { .. } => TAPE_EP_003_UNNUMBERED_FILE,
            ExtractError::Io { .. } => TAPE_IO_001_ACCESS_FAILED,
            ExtractError::Json(_) => TAPE_IO_002_MALFORMED_JSON,
            ExtractError::Config(_) => TAPE_CFG_001_INVALID_CONFIG,
        }
    }
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;
