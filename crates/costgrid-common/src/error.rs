//! Errors raised when text is turned into typed costgrid values.
//!
//! The engine itself never fails; these only surface at the edges where a
//! caller hands us a driver name, a tier label or a row of monthly values.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A label did not name any variant of the target enum.
    #[error("unknown {kind} `{value}` (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A monthly sequence did not hold exactly twelve entries.
    #[error("expected {expected} monthly values, found {found}")]
    MonthCount { expected: usize, found: usize },

    /// A driver assignment carried a value of the wrong shape.
    #[error("invalid value `{value}` for driver `{key}`")]
    InvalidDriverValue { key: String, value: String },

    /// Text that should have looked like `key=value`.
    #[error("expected `key=value`, found `{0}`")]
    MalformedAssignment(String),

    /// A month reference that is neither a month name nor 1..=12.
    #[error("unknown month `{0}` (use Jan..Dec or 1..12)")]
    UnknownMonth(String),
}

impl ParseError {
    pub(crate) fn unknown(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}
