//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Explorer Core
//!
//! The tree mutation engine never fails: an unknown or inapplicable target is
//! a silent no-op. Everything around it (modal commits, seed loading,
//! configuration) reports problems through this enum.

use std::{io, path::PathBuf};

use compact_str::CompactString;
use thiserror::Error;

use crate::model::node::NodeId;

/// Unified error type for explorer operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No node with this id exists in the current tree.
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    /// A seed tree contains the same id twice.
    #[error("Duplicate node id in tree: {0}")]
    DuplicateId(NodeId),

    /// Input validation errors, e.g. an empty draft name.
    #[error("Invalid input: {field} - {message}")]
    InvalidInput {
        field: CompactString,
        message: CompactString,
    },

    /// A commit was requested while no modal operation is pending.
    #[error("No pending modal operation to commit")]
    NoPendingOperation,

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config serialization error.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config file I/O error with path.
    #[error("Failed to access config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration values that parse but make no sense.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(CompactString),

    /// Seed (de)serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    /// Attach extra context to an error.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, ctx: S) -> Self {
        Self::Other(format!("{}: {}", ctx.into(), self))
    }

    /// Create an input validation error
    pub fn invalid_input<S1, S2>(field: S1, message: S2) -> Self
    where
        S1: Into<CompactString>,
        S2: Into<CompactString>,
    {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a config file I/O error
    pub fn config_io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }

    /// Rejections that leave the pending modal open for correction.
    #[inline]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
