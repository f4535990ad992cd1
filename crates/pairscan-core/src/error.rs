//! Typed error definitions for the Pair Discovery system.
//!
//! Provides [`PairscanError`] for the handful of failure domains the runner
//! needs to distinguish in order to pick a process exit code. All variants
//! implement `std::error::Error` via `thiserror`, so they integrate with
//! `anyhow::Result` at the stage boundaries that still use it.

use thiserror::Error;

/// Top-level failure domains for a Pair Discovery run.
#[derive(Debug, Error)]
pub enum PairscanError {
    /// Configuration file missing, unreadable, or failed to parse.
    #[error("config error: {0}")]
    Config(String),

    /// Fewer than the configured minimum number of inventory sources
    /// succeeded in C1 — the run is not safe to publish.
    #[error("insufficient sources: {succeeded}/{attempted} inventory fetches succeeded (need {required})")]
    InsufficientSources { succeeded: usize, attempted: usize, required: usize },

    /// Fewer than the configured minimum number of sources produced any
    /// validation output at all in C5.
    #[error("validation failed: {succeeded}/{attempted} sources produced validation output (need {required})")]
    ValidationFailed { succeeded: usize, attempted: usize, required: usize },

    /// Emission (serialization or atomic write) failed.
    #[error("emit error: {0}")]
    Emit(String),

    /// Generic I/O error not covered by a more specific variant.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PairscanError {
    /// Maps this error to the process interface's exit code (spec.md §6).
    pub fn exit_code(&self) -> i32 {
        match self {
            PairscanError::Config(_) | PairscanError::Emit(_) | PairscanError::Io(_) => 1,
            PairscanError::InsufficientSources { .. } => 2,
            PairscanError::ValidationFailed { .. } => 3,
        }
    }
}
