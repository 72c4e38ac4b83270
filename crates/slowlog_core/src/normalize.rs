//! SQL normalization for grouping.

/// Collapse a statement into its grouping key.
///
/// Quotes and ASCII digits become spaces, then whitespace runs collapse to a
/// single space. Statements differing only in numeric or quoted literals share
/// a key. This is not a parser: keywords inside strings, escaped quotes and
/// non-ASCII digits are left alone.
pub fn normalize_sql(sql: &str) -> String {
    let blanked: String = sql
        .chars()
        .map(|ch| match ch {
            '\'' | '"' => ' ',
            c if c.is_ascii_digit() => ' ',
            c => c,
        })
        .collect();

    blanked.split_whitespace().collect::<Vec<_>>().join(" ")
}
