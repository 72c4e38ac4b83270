//! Lexical tagging of SQL for colored previews.
//!
//! Tagging runs as a fixed sequence of regex passes: comments, string
//! literals, numbers, keywords, `=`. Each pass only looks at text no earlier
//! pass has claimed, so a keyword inside a string literal stays a string.
//! Quotes inside literals are not escaped or nested.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Lexical category of a tagged fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SqlToken {
    Comment,
    String,
    Number,
    Keyword,
    Operator,
}

/// A run of text, tagged or plain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub text: String,
    pub token: Option<SqlToken>,
}

impl Fragment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            token: None,
        }
    }

    pub fn tagged(text: impl Into<String>, token: SqlToken) -> Self {
        Self {
            text: text.into(),
            token: Some(token),
        }
    }
}

const KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "AND", "OR", "INSERT", "INTO", "VALUES", "UPDATE", "SET", "DELETE",
    "CREATE", "TABLE", "PRIMARY", "KEY", "NOT", "NULL", "DEFAULT", "ON", "JOIN", "LEFT", "RIGHT",
    "INNER", "OUTER", "GROUP", "BY", "ORDER", "LIMIT", "AS", "DISTINCT", "UNION", "ALL", "EXISTS",
    "IN", "IS", "LIKE", "BETWEEN", "CASE", "WHEN", "THEN", "ELSE", "END", "DESC", "ASC",
];

struct Pass {
    regex: Regex,
    token: SqlToken,
    uppercase: bool,
}

fn passes() -> &'static [Pass] {
    static PASSES: OnceLock<Vec<Pass>> = OnceLock::new();
    PASSES.get_or_init(|| {
        let keyword_pattern = format!(r"(?i)\b(?:{})\b", KEYWORDS.join("|"));
        let pass = |pattern: &str, token, uppercase| Pass {
            regex: Regex::new(pattern).expect("highlight pattern is valid"),
            token,
            uppercase,
        };
        vec![
            pass(r"(?m)--.*$|/\*(?s:.*?)\*/", SqlToken::Comment, false),
            pass(r#"'[^']*'|"[^"]*""#, SqlToken::String, false),
            pass(r"\b\d+(?:\.\d+)?\b", SqlToken::Number, false),
            pass(&keyword_pattern, SqlToken::Keyword, true),
            pass(r"=", SqlToken::Operator, false),
        ]
    })
}

/// Tag comments, strings, numbers, keywords and `=` in `sql`.
///
/// Keywords come back uppercased; everything else keeps its original text.
pub fn highlight_sql(sql: &str) -> Vec<Fragment> {
    passes()
        .iter()
        .fold(plain_sql(sql), |fragments, pass| apply_pass(fragments, pass))
}

/// The whole statement as a single untagged fragment.
pub fn plain_sql(sql: &str) -> Vec<Fragment> {
    if sql.is_empty() {
        Vec::new()
    } else {
        vec![Fragment::plain(sql)]
    }
}

fn apply_pass(fragments: Vec<Fragment>, pass: &Pass) -> Vec<Fragment> {
    let mut out = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        if fragment.token.is_some() {
            out.push(fragment);
            continue;
        }
        let text = fragment.text.as_str();
        let mut last = 0;
        for m in pass.regex.find_iter(text) {
            if m.start() > last {
                out.push(Fragment::plain(&text[last..m.start()]));
            }
            let matched = if pass.uppercase {
                m.as_str().to_uppercase()
            } else {
                m.as_str().to_string()
            };
            out.push(Fragment::tagged(matched, pass.token));
            last = m.end();
        }
        if last < text.len() {
            out.push(Fragment::plain(&text[last..]));
        }
    }
    out
}

/// Split fragments on newlines into display lines.
///
/// Always returns at least one (possibly empty) line.
pub fn split_lines(fragments: &[Fragment]) -> Vec<Vec<Fragment>> {
    let mut lines = vec![Vec::new()];
    for fragment in fragments {
        for (i, piece) in fragment.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if piece.is_empty() {
                continue;
            }
            if let Some(line) = lines.last_mut() {
                line.push(Fragment {
                    text: piece.to_string(),
                    token: fragment.token,
                });
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(fragments: &[Fragment]) -> Vec<(&str, Option<SqlToken>)> {
        fragments
            .iter()
            .map(|f| (f.text.as_str(), f.token))
            .collect()
    }

    #[test]
    fn test_basic_statement() {
        let out = highlight_sql("select * from t where id = 42");
        assert_eq!(
            tokens(&out),
            vec![
                ("SELECT", Some(SqlToken::Keyword)),
                (" * ", None),
                ("FROM", Some(SqlToken::Keyword)),
                (" t ", None),
                ("WHERE", Some(SqlToken::Keyword)),
                (" id ", None),
                ("=", Some(SqlToken::Operator)),
                (" ", None),
                ("42", Some(SqlToken::Number)),
            ]
        );
    }

    #[test]
    fn test_earlier_passes_claim_text() {
        let out = highlight_sql("SELECT 'from 1' -- where = 2");
        assert_eq!(
            tokens(&out),
            vec![
                ("SELECT", Some(SqlToken::Keyword)),
                (" ", None),
                ("'from 1'", Some(SqlToken::String)),
                (" ", None),
                ("-- where = 2", Some(SqlToken::Comment)),
            ]
        );
    }

    #[test]
    fn test_comment_keeps_its_original_case() {
        let out = highlight_sql("SELECT 1 -- select from here");
        assert_eq!(
            out.last(),
            Some(&Fragment::tagged("-- select from here", SqlToken::Comment))
        );
        assert_eq!(
            out.iter().filter(|f| f.token == Some(SqlToken::Keyword)).count(),
            1
        );
    }

    #[test]
    fn test_line_comment_stops_at_newline() {
        let out = highlight_sql("-- note\nSELECT 1");
        assert_eq!(out[0], Fragment::tagged("-- note", SqlToken::Comment));
        assert_eq!(out[1], Fragment::plain("\n"));
        assert_eq!(out[2], Fragment::tagged("SELECT", SqlToken::Keyword));
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let out = highlight_sql("/* a\nb */ x");
        assert_eq!(out[0], Fragment::tagged("/* a\nb */", SqlToken::Comment));
    }

    #[test]
    fn test_decimal_and_word_bounded_numbers() {
        let out = highlight_sql("x1 = 3.5");
        assert_eq!(
            tokens(&out),
            vec![
                ("x1 ", None),
                ("=", Some(SqlToken::Operator)),
                (" ", None),
                ("3.5", Some(SqlToken::Number)),
            ]
        );
    }

    #[test]
    fn test_keywords_need_word_boundaries() {
        let out = highlight_sql("selection");
        assert_eq!(tokens(&out), vec![("selection", None)]);
    }

    #[test]
    fn test_plain_sql() {
        assert_eq!(plain_sql("select 1"), vec![Fragment::plain("select 1")]);
        assert!(plain_sql("").is_empty());
        assert!(highlight_sql("").is_empty());
    }

    #[test]
    fn test_split_lines() {
        let lines = split_lines(&[
            Fragment::plain("a\nb"),
            Fragment::tagged("c", SqlToken::Keyword),
            Fragment::plain("\n"),
        ]);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], vec![Fragment::plain("a")]);
        assert_eq!(
            lines[1],
            vec![Fragment::plain("b"), Fragment::tagged("c", SqlToken::Keyword)]
        );
        assert!(lines[2].is_empty());
        assert_eq!(split_lines(&[]).len(), 1);
    }
}
