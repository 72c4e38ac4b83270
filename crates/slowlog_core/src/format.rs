//! Display formatting shared by the dashboard and the report command.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::QueryGroup;

/// Combined width of every table column except the query text.
pub const FIXED_COLUMNS_WIDTH: usize = 4 + 8 + 24 + 16 + 8 + 10 + 12 + 10 + 8;
pub const MIN_QUERY_WIDTH: usize = 10;
pub const MAX_QUERY_WIDTH: usize = 50;

/// Seconds with two decimals: `2.00s`.
pub fn format_seconds(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}

/// Row counts are averages; shown rounded with no decimals.
pub fn format_rows(rows: f64) -> String {
    format!("{:.0}", rows)
}

/// Width available for the query column in a table `table_width` wide.
pub fn query_column_width(table_width: usize) -> usize {
    table_width
        .saturating_sub(FIXED_COLUMNS_WIDTH)
        .clamp(MIN_QUERY_WIDTH, MAX_QUERY_WIDTH)
}

/// Cut `text` to at most `max_chars` characters, ending in `...` when cut.
pub fn truncate_query(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

const DISPLAY_CLAUSES: &[&str] = &["ORDER BY", "GROUP BY", "HAVING", "LIMIT", "WHERE"];

fn clause_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DISPLAY_CLAUSES
            .iter()
            .map(|clause| {
                Regex::new(&format!(r"(?i)\b{}\b", regex::escape(clause)))
                    .expect("clause pattern is valid")
            })
            .collect()
    })
}

/// Break long statements before their main clauses for the preview.
///
/// A newline goes in front of every `ORDER BY`, `GROUP BY`, `HAVING`,
/// `LIMIT` and `WHERE` that does not already start a line.
pub fn format_for_display(sql: &str) -> String {
    let mut text = sql.to_string();
    for pattern in clause_patterns() {
        let starts: Vec<usize> = pattern.find_iter(&text).map(|m| m.start()).collect();
        if starts.is_empty() {
            continue;
        }
        let mut out = String::with_capacity(text.len() + starts.len());
        let mut last = 0;
        for start in starts {
            out.push_str(&text[last..start]);
            if start > 0 && !text[..start].ends_with('\n') {
                out.push('\n');
            }
            last = start;
        }
        out.push_str(&text[last..]);
        text = out;
    }
    text
}

/// Column titles of the grouped summary table.
pub const SUMMARY_COLUMNS: [&str; 9] = [
    "#",
    "Type",
    "DB",
    "Table",
    "Count",
    "Avg Time",
    "Avg Examined",
    "Avg Sent",
    "Query",
];

/// One summary table row; `rank` is 1-based.
pub fn summary_cells(rank: usize, group: &QueryGroup, query_width: usize) -> [String; 9] {
    [
        rank.to_string(),
        group.query_type().to_string(),
        group.database().to_string(),
        group.table().to_string(),
        group.count().to_string(),
        format_seconds(group.avg_query_time()),
        format_rows(group.avg_rows_examined()),
        format_rows(group.avg_rows_sent()),
        truncate_query(group.normalized_sql(), query_width),
    ]
}
