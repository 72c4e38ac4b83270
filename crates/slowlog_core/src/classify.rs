//! Statement-type classification.

/// Returned when no line starts with a recognized keyword.
pub const OTHER_QUERY_TYPE: &str = "OTHER";

/// Leading keywords recognized as a statement type.
pub const QUERY_KEYWORDS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "ALTER", "CREATE", "DROP", "RENAME", "TRUNCATE",
    "REPLACE", "CALL", "DO", "HANDLER", "LOAD", "START", "COMMIT", "ROLLBACK", "SAVEPOINT",
    "RELEASE", "LOCK", "UNLOCK", "SET", "SHOW", "DESCRIBE", "EXPLAIN", "USE",
];

/// Return the uppercased leading keyword of a statement.
///
/// Blank lines and lines starting with `--`, `#` or `/*` are skipped. A block
/// comment is only recognized on the line that opens it, so the inner lines
/// of a multi-line `/* ... */` header are inspected like code.
///
/// Whitespace-only input yields an empty string; input with no recognized
/// keyword yields [`OTHER_QUERY_TYPE`].
pub fn classify_query(sql: &str) -> String {
    let sql = sql.trim();
    if sql.is_empty() {
        return String::new();
    }

    for line in sql.lines().map(str::trim) {
        if line.is_empty() || is_comment_line(line) {
            continue;
        }
        let Some(first) = line.split_whitespace().next() else {
            continue;
        };
        let keyword = first.to_uppercase();
        if QUERY_KEYWORDS.contains(&keyword.as_str()) {
            return keyword;
        }
    }

    OTHER_QUERY_TYPE.to_string()
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with("--") || line.starts_with('#') || line.starts_with("/*")
}
