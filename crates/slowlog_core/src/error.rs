//! Error types for the aggregation engine.

use thiserror::Error;

/// A `query_time`/`lock_time` value that is not `H:M:S`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    /// Wrong number of colon-separated parts
    #[error("expected H:M:S, got {parts} colon-separated part(s) in '{input}'")]
    Shape { input: String, parts: usize },

    /// One of the parts is not a number
    #[error("invalid {component} in duration '{input}'")]
    Component {
        input: String,
        component: &'static str,
    },
}

/// Sort column name that does not match any known column.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sort column '{0}' (expected one of: count, time, examined, sent, type, db, table)")]
pub struct UnknownSortColumn(pub String);
