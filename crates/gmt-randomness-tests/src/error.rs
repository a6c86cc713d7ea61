//! Error type shared by the engine, the battery registry and the runner.
//!
//! Every variant is recoverable at the call site: the runner records the error
//! for the affected (test, sequence) pair and moves on. Numerical degeneracies
//! are not represented here; they panic.

use thiserror::Error;

/// Errors produced while configuring or running randomness tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The sequence length is structurally incompatible with the test.
    #[error("cannot configure {test}: {reason}")]
    Configuration { test: String, reason: String },

    /// No battery is defined for the requested sequence length.
    #[error("no battery is defined for {0}-bit sequences (supported: 20000, 1000000)")]
    UnsupportedLength(usize),

    /// The identifier is not present in the battery.
    #[error("unknown test '{0}'")]
    UnknownTest(String),

    /// The sequence fails the test's precondition; skip it rather than count a failure.
    #[error("sequence is not eligible for {test}: {reason}")]
    IneligibleInput { test: String, reason: String },

    /// A character or value that is not a bit was found while packing input.
    #[error("invalid bit symbol {symbol:?} at position {position}")]
    InvalidSymbol { position: usize, symbol: char },
}

impl Error {
    pub(crate) fn configuration(test: &str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            test: test.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn ineligible(test: &str, reason: impl Into<String>) -> Self {
        Self::IneligibleInput {
            test: test.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error only means "skip this sequence".
    pub fn is_ineligible(&self) -> bool {
        matches!(self, Self::IneligibleInput { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
