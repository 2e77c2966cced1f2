// Fantasy scoring: rule registry and the per-row score calculator.

pub mod calculator;
pub mod rules;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("`{method}` is not a valid scoring method (expected one of: {expected})")]
    UnknownMethod { method: String, expected: String },

    #[error("`{value}` is not a valid PPR format (expected `full` or `half`)")]
    UnknownPpr { value: String },
}
