//! Grouping of raw records by normalized SQL.

use std::collections::HashMap;

use tracing::debug;

use crate::error::DurationParseError;
use crate::normalize::normalize_sql;
use crate::types::{QueryGroup, RawQueryRecord};

/// Incremental group builder.
///
/// Groups come out in first-seen order; the key index is only used for lookup.
#[derive(Debug, Default)]
pub struct Aggregator {
    groups: Vec<QueryGroup>,
    index: HashMap<String, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record to the group for its normalized SQL, creating it if needed.
    pub fn add(&mut self, record: RawQueryRecord) {
        let key = normalize_sql(&record.sql_text);
        match self.index.get(&key) {
            Some(&slot) => self.groups[slot].push(record),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push(QueryGroup::new(key, record));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn finish(self) -> Vec<QueryGroup> {
        self.groups
    }
}

/// Group every record by its normalized SQL.
pub fn aggregate(records: impl IntoIterator<Item = RawQueryRecord>) -> Vec<QueryGroup> {
    let mut aggregator = Aggregator::new();
    for record in records {
        aggregator.add(record);
    }
    debug!(groups = aggregator.len(), "aggregated slow log");
    aggregator.finish()
}

/// Table name following the first ` FROM ` (case-insensitive), or empty.
pub fn extract_table(normalized_sql: &str) -> String {
    // ASCII uppercasing keeps byte offsets aligned with the original string.
    let upper = normalized_sql.to_ascii_uppercase();
    let Some(at) = upper.find(" FROM ") else {
        return String::new();
    };
    normalized_sql[at + " FROM ".len()..]
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Parse an `H:M:S` duration (fractional seconds allowed) into seconds.
pub fn parse_elapsed(text: &str) -> Result<f64, DurationParseError> {
    let parts: Vec<&str> = text.split(':').map(str::trim).collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return Err(DurationParseError::Shape {
            input: text.to_string(),
            parts: parts.len(),
        });
    };

    let component = |component: &'static str| DurationParseError::Component {
        input: text.to_string(),
        component,
    };
    let hours: u64 = hours.parse().map_err(|_| component("hours"))?;
    let minutes: u64 = minutes.parse().map_err(|_| component("minutes"))?;
    let seconds: f64 = seconds.parse().map_err(|_| component("seconds"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(component("seconds"));
    }

    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

/// Lenient form of [`parse_elapsed`].
///
/// Anything but three colon-separated parts is zero. Inside that shape a
/// part that fails to parse counts as zero and the others still add up.
pub fn elapsed_seconds(text: &str) -> f64 {
    let parts: Vec<&str> = text.split(':').map(str::trim).collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return 0.0;
    };
    let hours = hours.parse::<u64>().unwrap_or(0) as f64;
    let minutes = minutes.parse::<u64>().unwrap_or(0) as f64;
    let seconds = seconds
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)
        .unwrap_or(0.0);
    hours * 3600.0 + minutes * 60.0 + seconds
}

pub(crate) fn record_seconds(record: &RawQueryRecord) -> f64 {
    if let Err(err) = parse_elapsed(&record.query_time) {
        debug!(id = record.id, error = %err, "query_time partly or wholly counted as zero");
    }
    elapsed_seconds(&record.query_time)
}
