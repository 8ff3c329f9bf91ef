use std::sync::OnceLock;

use regex::Regex;

/// Scalar functions unwrapped when normalizing a column expression.
pub const SCALAR_FUNCTIONS: &[&str] = &[
    "CAST",
    "NVL",
    "NVL2",
    "COALESCE",
    "UPPER",
    "LOWER",
    "TRIM",
    "LTRIM",
    "RTRIM",
    "TO_DATE",
    "TO_CHAR",
    "TO_NUMBER",
    "SUBSTR",
];

fn function_call_regex() -> &'static Regex {
    static FUNCTION_CALL_REGEX: OnceLock<Regex> = OnceLock::new();
    FUNCTION_CALL_REGEX.get_or_init(|| {
        let names = SCALAR_FUNCTIONS.join("|");
        Regex::new(&format!(r"(?i)\b(?:{names})\s*\(")).expect("valid scalar function regex")
    })
}

fn cast_type_regex() -> &'static Regex {
    static CAST_TYPE_REGEX: OnceLock<Regex> = OnceLock::new();
    CAST_TYPE_REGEX.get_or_init(|| Regex::new(r"(?i)\s+AS\s+\w+").expect("valid cast type regex"))
}

fn column_ref_regex() -> &'static Regex {
    static COLUMN_REF_REGEX: OnceLock<Regex> = OnceLock::new();
    COLUMN_REF_REGEX
        .get_or_init(|| Regex::new(r"(?:\w+\.)?\w+").expect("valid column reference regex"))
}

/// Reduce a column expression to its bare `[table.]column` reference.
///
/// Examples:
/// - `UPPER(e.name)` -> `e.name`
/// - `NVL(CAST(hire_date AS DATE), 0)` -> `hire_date`
/// - `e.salary` -> `e.salary`
pub fn normalize_column_expr(expr: &str) -> String {
    let mut stripped = expr.trim().to_string();
    while function_call_regex().is_match(&stripped) {
        stripped = function_call_regex().replace_all(&stripped, "").into_owned();
    }

    let stripped = cast_type_regex().replace_all(&stripped, "");
    let stripped = stripped.replace(['(', ')'], "");

    match column_ref_regex().find(&stripped) {
        Some(column) => column.as_str().to_string(),
        None => stripped.trim().to_string(),
    }
}

/// Split `table.column` at the first dot into `(Some(table), column)`.
pub fn split_qualified(column: &str) -> (Option<&str>, &str) {
    match column.split_once('.') {
        Some((qualifier, name)) => (Some(qualifier), name),
        None => (None, column),
    }
}

/// Trim whitespace, then every leading and trailing `'` or `"` from a literal.
pub fn strip_value_quotes(value: &str) -> &str {
    value.trim().trim_matches(|ch| ch == '\'' || ch == '"')
}
