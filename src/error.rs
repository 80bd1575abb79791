//! Error types for growth runs.

use thiserror::Error;

/// Errors that can occur while configuring or running a growth simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// A random pick was requested from a frontier with no members.
    #[error("frontier is empty")]
    EmptyFrontier,

    /// The run configuration was rejected before any lattice was built.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Cluster detection was started from a cell that holds no species.
    #[error("cluster origin {index} is not filled")]
    OriginNotFilled {
        /// Linear index of the offending cell.
        index: usize,
    },

    /// No built-in or user preset has the requested name.
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A config or preset file could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        SimError::InvalidConfiguration(reason.into())
    }
}
