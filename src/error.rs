//! Error taxonomy for the search core, per the error handling design.
//!
//! Deadline expiration and cooperative-yield events are not represented here: a blown
//! iterative-deepening deadline is recovered locally (the previous depth's result is
//! returned) and a yield is transparent to the caller. Everything else that the search
//! core can detect is a typed, surfaced error.

use thiserror::Error;

/// Errors raised by the search core. Never caught and silently discarded internally:
/// every variant either propagates to the caller or is turned into one of these by a
/// recoverable path (deadline, yield) that never reaches this type at all.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    /// An unknown configuration key, an unparsable value, or a combination of options
    /// that the engine cannot act on (e.g. neither `max_depth` nor `max_time` set).
    #[error("configuration error: {0}")]
    Config(String),

    /// The evaluator violated its contract: a negative policy prior, a policy that
    /// doesn't sum to ~1, or being invoked on a finished board.
    #[error("evaluator contract violation: {0}")]
    EvaluatorContract(String),

    /// The board violated its contract: searched on a finished board, or an action
    /// absent from `actions()`.
    #[error("board contract violation: {0}")]
    BoardContract(String),
}

pub type SearchResult<T> = Result<T, SearchError>;
