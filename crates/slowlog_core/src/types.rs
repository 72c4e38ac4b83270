//! Data model shared by the engine and its consumers.

use serde::{Deserialize, Serialize};

use crate::aggregate::{extract_table, record_seconds};
use crate::classify::classify_query;

/// One slow-log row as delivered by a log source.
///
/// Missing fields default to empty/zero so partial JSON dumps still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlowLogRow {
    pub start_time: String,
    pub user_host: String,
    pub db: String,
    pub query_time: String,
    pub lock_time: String,
    pub rows_examined: u64,
    pub rows_sent: u64,
    pub sql_text: String,
}

/// A single logged statement with its derived query type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawQueryRecord {
    /// 1-based sequence id in fetch order
    pub id: u64,
    pub start_time: String,
    pub user_host: String,
    pub db: String,
    /// Elapsed time as `HH:MM:SS[.fraction]`
    pub query_time: String,
    pub rows_examined: u64,
    pub rows_sent: u64,
    pub lock_time: String,
    /// SQL exactly as logged
    pub sql_text: String,
    /// Leading statement keyword, see [`classify_query`]
    pub query_type: String,
}

impl RawQueryRecord {
    /// Build a record from a source row, classifying its SQL.
    pub fn from_row(id: u64, row: SlowLogRow) -> Self {
        let query_type = classify_query(&row.sql_text);
        Self {
            id,
            start_time: row.start_time,
            user_host: row.user_host,
            db: row.db,
            query_time: row.query_time,
            rows_examined: row.rows_examined,
            rows_sent: row.rows_sent,
            lock_time: row.lock_time,
            sql_text: row.sql_text,
            query_type,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Totals {
    query_time: f64,
    rows_examined: f64,
    rows_sent: f64,
}

/// Aggregate over every record sharing one normalized SQL key.
///
/// Query type and table are fixed by the record that created the group.
/// Averages are always recomputed from the running totals, so they stay the
/// exact mean of the current members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryGroup {
    normalized_sql: String,
    query_type: String,
    table: String,
    count: usize,
    avg_query_time: f64,
    avg_rows_examined: f64,
    avg_rows_sent: f64,
    examples: Vec<RawQueryRecord>,
    #[serde(skip)]
    totals: Totals,
}

impl QueryGroup {
    /// Start a group from its first member.
    pub fn new(normalized_sql: impl Into<String>, first: RawQueryRecord) -> Self {
        let normalized_sql = normalized_sql.into();
        let mut group = Self {
            table: extract_table(&normalized_sql),
            query_type: first.query_type.clone(),
            normalized_sql,
            count: 0,
            avg_query_time: 0.0,
            avg_rows_examined: 0.0,
            avg_rows_sent: 0.0,
            examples: Vec::new(),
            totals: Totals::default(),
        };
        group.push(first);
        group
    }

    /// Append a member and refresh the averages.
    pub fn push(&mut self, record: RawQueryRecord) {
        self.totals.query_time += record_seconds(&record);
        self.totals.rows_examined += record.rows_examined as f64;
        self.totals.rows_sent += record.rows_sent as f64;
        self.examples.push(record);
        self.count = self.examples.len();
        self.recompute_averages();
    }

    fn recompute_averages(&mut self) {
        if self.count == 0 {
            return;
        }
        let n = self.count as f64;
        self.avg_query_time = self.totals.query_time / n;
        self.avg_rows_examined = self.totals.rows_examined / n;
        self.avg_rows_sent = self.totals.rows_sent / n;
    }

    pub fn normalized_sql(&self) -> &str {
        &self.normalized_sql
    }

    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    /// Table named after the first ` FROM `, empty when there is none.
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean elapsed time in seconds.
    pub fn avg_query_time(&self) -> f64 {
        self.avg_query_time
    }

    pub fn avg_rows_examined(&self) -> f64 {
        self.avg_rows_examined
    }

    pub fn avg_rows_sent(&self) -> f64 {
        self.avg_rows_sent
    }

    /// Members in insertion order.
    pub fn examples(&self) -> &[RawQueryRecord] {
        &self.examples
    }

    pub fn first_example(&self) -> Option<&RawQueryRecord> {
        self.examples.first()
    }

    /// Database of the first member, empty if the group has none.
    pub fn database(&self) -> &str {
        self.first_example().map(|q| q.db.as_str()).unwrap_or("")
    }
}
