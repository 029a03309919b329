//! Error types for Tradecraft Core
//!
//! Only usage defects and configuration problems are errors. A lost coin flip
//! is a normal return value (`Ok(false)` / `Ok(None)`) and never shows up here.

use crate::types::{AgentNumber, DocumentLocation};

/// Main tradecraft error type
#[derive(Debug, thiserror::Error)]
pub enum TradecraftError {
    /// Agent asked to retrieve a document before infiltrating anything
    #[error("{agent} cannot retrieve a document without an assignment")]
    NoAssignment {
        /// The agent that made the call
        agent: AgentNumber,
    },

    /// A required back-reference no longer resolves
    #[error("{entity} is detached from its chain of command")]
    Detached {
        /// Human-readable description of the orphaned entity
        entity: String,
    },

    /// Document relabelled out of custody order
    #[error("illegal custody transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Location the document was in
        from: DocumentLocation,
        /// Location that was requested
        to: DocumentLocation,
    },

    /// World configuration rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl TradecraftError {
    /// Check if the error signals a programming/usage defect
    ///
    /// Redoing the same call will not help for these.
    #[inline]
    #[must_use]
    pub fn is_usage_defect(&self) -> bool {
        matches!(
            self,
            Self::NoAssignment { .. } | Self::Detached { .. } | Self::IllegalTransition { .. }
        )
    }

    /// Create a detached error for the given entity
    #[inline]
    pub fn detached(entity: impl Into<String>) -> Self {
        Self::Detached {
            entity: entity.into(),
        }
    }
}

/// World configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A `[1, max)` population range would be empty
    #[error("{field} must be at least 2 (got {value}) so that [1, {value}) is not empty")]
    EmptyRange {
        /// Offending field
        field: &'static str,
        /// Configured value
        value: usize,
    },

    /// Shortest task longer than the longest one
    #[error("shortest task ({shortest_ms}ms) exceeds longest task ({longest_ms}ms)")]
    InvertedDelayBounds {
        /// Configured lower bound
        shortest_ms: u64,
        /// Configured upper bound
        longest_ms: u64,
    },

    /// Configuration file could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
