//! Slow-log sources for slowlog
//!
//! Every source produces [`RawQueryRecord`]s with 1-based sequence ids in
//! fetch order; grouping happens in `slowlog_core`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use slowlog_db::SlowLogDb;
//!
//! let db = SlowLogDb::connect("mysql://root@127.0.0.1:3306/mysql").await?;
//! let records = db.fetch_records().await?;
//! db.close().await;
//! ```

mod error;
mod json;
#[cfg(feature = "mysql")]
mod mysql;

pub use error::{Result, SourceError};
pub use json::{load_json, parse_json, records_from_rows};
#[cfg(feature = "mysql")]
pub use mysql::{redact_dsn, SlowLogDb, SLOW_LOG_QUERY};

pub use slowlog_core::{RawQueryRecord, SlowLogRow};
