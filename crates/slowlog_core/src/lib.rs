//! Slow-query aggregation engine
//!
//! Turns raw slow-log rows into grouped, sortable statistics:
//!
//! - [`normalize`] collapses literals so structurally equal statements share a key
//! - [`classify`] extracts the leading statement keyword
//! - [`aggregate`] groups records and keeps per-group averages
//! - [`sort`] orders groups by a selectable column and direction
//! - [`highlight`] tags lexical categories for colored rendering
//! - [`format`] display helpers shared by the TUI and the report output
//!
//! Everything in this crate is pure; log sources and rendering live elsewhere.
//!
//! # Usage
//!
//! ```rust,ignore
//! use slowlog_core::{aggregate, sorted_indices, SortSpec};
//!
//! let groups = aggregate(records);
//! let view = sorted_indices(&groups, SortSpec::default());
//! ```

pub mod aggregate;
pub mod classify;
mod error;
pub mod format;
pub mod highlight;
pub mod normalize;
pub mod sort;
mod types;

pub use aggregate::{aggregate, elapsed_seconds, extract_table, parse_elapsed, Aggregator};
pub use classify::{classify_query, OTHER_QUERY_TYPE};
pub use error::{DurationParseError, UnknownSortColumn};
pub use highlight::{highlight_sql, plain_sql, split_lines, Fragment, SqlToken};
pub use normalize::normalize_sql;
pub use sort::{compare_groups, sort_view, sorted_indices, SortColumn, SortDirection, SortSpec};
pub use types::{QueryGroup, RawQueryRecord, SlowLogRow};
