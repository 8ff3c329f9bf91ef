use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

/// Marker substituted for every isolated `( SELECT ... )` span.
pub const SUBQUERY_PLACEHOLDER: &str = "__SUBQUERY__";

fn subquery_start_regex() -> &'static Regex {
    static SUBQUERY_START_REGEX: OnceLock<Regex> = OnceLock::new();
    SUBQUERY_START_REGEX
        .get_or_init(|| Regex::new(r"(?i)\(\s*SELECT\b").expect("valid subquery start regex"))
}

/// Outer text of a scope with its subqueries cut out, plus whatever the
/// nested scopes produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsolatedSql<T> {
    /// Scope text with each subquery span replaced by [`SUBQUERY_PLACEHOLDER`].
    pub outer: String,
    /// Items produced for the nested scopes, in left-to-right span order.
    pub nested: Vec<T>,
}

/// Byte index of the `)` closing the `(` at `open`.
///
/// Plain depth counter: parentheses inside string literals are counted too.
pub fn find_matching_paren(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }

    let mut depth = 0usize;
    for (idx, byte) in bytes.iter().enumerate().skip(open) {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Spans (parentheses included) of the outermost `( SELECT ... )` groups in `sql`.
///
/// Groups nested inside a reported span are left to the nested scope. A
/// candidate without a balanced close is skipped and stays in the text.
pub fn subquery_spans(sql: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut pos = 0usize;

    while pos < sql.len() {
        let Some(found) = subquery_start_regex().find_at(sql, pos) else {
            break;
        };
        let open = found.start();
        match find_matching_paren(sql, open) {
            Some(close) => {
                spans.push(open..close + 1);
                pos = close + 1;
            }
            None => {
                tracing::debug!(
                    target: "sql2conds::parser",
                    offset = open,
                    "unbalanced subquery candidate left in place"
                );
                pos = open + 1;
            }
        }
    }

    spans
}

/// Cut every subquery out of `sql`, handing its interior to `on_subquery`.
///
/// The items returned by `on_subquery` are concatenated in span order.
pub fn isolate_subqueries<T, F>(sql: &str, mut on_subquery: F) -> IsolatedSql<T>
where
    F: FnMut(&str) -> Vec<T>,
{
    let mut outer = String::with_capacity(sql.len());
    let mut nested = Vec::new();
    let mut last = 0usize;

    for span in subquery_spans(sql) {
        let interior = &sql[span.start + 1..span.end - 1];
        nested.extend(on_subquery(interior));

        outer.push_str(&sql[last..span.start]);
        outer.push(' ');
        outer.push_str(SUBQUERY_PLACEHOLDER);
        outer.push(' ');
        last = span.end;
    }
    outer.push_str(&sql[last..]);

    IsolatedSql { outer, nested }
}
