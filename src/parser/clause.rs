use std::sync::OnceLock;

use regex::Regex;

use super::subquery::SUBQUERY_PLACEHOLDER;

fn where_regex() -> &'static Regex {
    static WHERE_REGEX: OnceLock<Regex> = OnceLock::new();
    WHERE_REGEX.get_or_init(|| {
        Regex::new(
            r"(?is)\bWHERE\s+(.*?)(?:\s+GROUP\s+BY\b|\s+ORDER\s+BY\b|\s+HAVING\b|\s+LIMIT\b|$)",
        )
        .expect("valid WHERE clause regex")
    })
}

fn connective_regex() -> &'static Regex {
    static CONNECTIVE_REGEX: OnceLock<Regex> = OnceLock::new();
    CONNECTIVE_REGEX
        .get_or_init(|| Regex::new(r"(?i)\s+(?:AND|OR)\s+").expect("valid connective regex"))
}

/// Body of the first `WHERE` clause, up to `GROUP BY`, `ORDER BY`, `HAVING`,
/// `LIMIT` or the end of the text.
pub fn where_clause(sql: &str) -> Option<&str> {
    where_regex()
        .captures(sql)
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str())
}

/// Split a clause body on `AND`/`OR` into trimmed condition fragments.
///
/// Parenthesized groups are not honored: `(a = 1 OR b = 2)` yields two
/// fragments. Empty fragments and bare subquery placeholders are dropped.
pub fn split_conditions(clause: &str) -> Vec<&str> {
    connective_regex()
        .split(clause)
        .map(str::trim)
        .filter(|part| !part.is_empty() && *part != SUBQUERY_PLACEHOLDER)
        .collect()
}

/// Condition fragments of the first `WHERE` clause in `sql`; empty without one.
pub fn where_fragments(sql: &str) -> Vec<&str> {
    where_clause(sql).map(split_conditions).unwrap_or_default()
}
