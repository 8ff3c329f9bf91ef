use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Comparison operator recognized in a WHERE fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `<=`
    #[serde(rename = "<=")]
    LtEq,
    /// `>=`
    #[serde(rename = ">=")]
    GtEq,
    /// `<>`
    #[serde(rename = "<>")]
    LtGt,
    /// `!=`
    #[serde(rename = "!=")]
    NotEq,
    /// `=`
    #[serde(rename = "=")]
    Eq,
    /// `<`
    #[serde(rename = "<")]
    Lt,
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `LIKE`
    #[serde(rename = "LIKE")]
    Like,
    /// `IN`
    #[serde(rename = "IN")]
    In,
    /// `NOT IN`
    #[serde(rename = "NOT IN")]
    NotIn,
    /// `IS NULL`
    #[serde(rename = "IS NULL")]
    IsNull,
    /// `IS NOT NULL`
    #[serde(rename = "IS NOT NULL")]
    IsNotNull,
    /// `BETWEEN`
    #[serde(rename = "BETWEEN")]
    Between,
}

/// Order in which operators are tried against a fragment; the first match wins.
pub const OPERATOR_PRIORITY: [Operator; 13] = [
    Operator::LtEq,
    Operator::GtEq,
    Operator::LtGt,
    Operator::NotEq,
    Operator::Eq,
    Operator::Lt,
    Operator::Gt,
    Operator::Like,
    Operator::In,
    Operator::NotIn,
    Operator::IsNull,
    Operator::IsNotNull,
    Operator::Between,
];

impl Operator {
    /// Canonical upper-case token.
    pub const fn token(self) -> &'static str {
        match self {
            Operator::LtEq => "<=",
            Operator::GtEq => ">=",
            Operator::LtGt => "<>",
            Operator::NotEq => "!=",
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::Between => "BETWEEN",
        }
    }

    /// True for operators that take no right-hand side.
    pub const fn is_unary(self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }

    /// True for punctuation operators, which may be written without surrounding spaces.
    pub const fn is_symbolic(self) -> bool {
        matches!(
            self,
            Operator::LtEq
                | Operator::GtEq
                | Operator::LtGt
                | Operator::NotEq
                | Operator::Eq
                | Operator::Lt
                | Operator::Gt
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl std::str::FromStr for Operator {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        OPERATOR_PRIORITY
            .into_iter()
            .find(|op| op.token() == canonical)
            .ok_or_else(|| format!("Invalid operator: {s}"))
    }
}

/// A fragment split around the operator that matched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorMatch<'a> {
    /// Operator that matched.
    pub operator: Operator,
    /// Text before the operator, trimmed.
    pub left: &'a str,
    /// Text after the operator, trimmed; `None` for unary operators.
    pub right: Option<&'a str>,
}

struct OperatorMatcher {
    operator: Operator,
    strict: Regex,
    relaxed: Option<Regex>,
}

/// Token as a regex fragment; inner spaces of multi-word tokens match any whitespace run.
fn token_pattern(operator: Operator) -> String {
    operator
        .token()
        .split(' ')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

fn strict_pattern(operator: Operator) -> String {
    let token = token_pattern(operator);
    if operator.is_unary() {
        format!(r"(?is)^(.+?)\s+{token}\b")
    } else {
        format!(r"(?is)^(.+?)\s+{token}\s+(.+)$")
    }
}

fn relaxed_pattern(operator: Operator) -> Option<String> {
    if !operator.is_symbolic() {
        return None;
    }
    let token = token_pattern(operator);
    Some(format!(r"(?s)^(.*?[^<>!=\s])\s*{token}\s*([^<>=\s].*)$"))
}

fn matchers() -> &'static [OperatorMatcher] {
    static MATCHERS: OnceLock<Vec<OperatorMatcher>> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        OPERATOR_PRIORITY
            .into_iter()
            .map(|operator| OperatorMatcher {
                operator,
                strict: Regex::new(&strict_pattern(operator)).expect("valid operator regex"),
                relaxed: relaxed_pattern(operator)
                    .map(|pattern| Regex::new(&pattern).expect("valid compact operator regex")),
            })
            .collect()
    })
}

fn split_with<'a>(
    operator: Operator,
    pattern: &Regex,
    fragment: &'a str,
) -> Option<OperatorMatch<'a>> {
    let caps = pattern.captures(fragment)?;
    let left = caps.get(1)?.as_str().trim();
    let right = caps.get(2).map(|right| right.as_str().trim());
    Some(OperatorMatch {
        operator,
        left,
        right,
    })
}

/// Match `fragment` against the operator table in priority order.
///
/// Every operator is first tried in its space-delimited form (`a >= 1`);
/// only when none matches are the punctuation operators retried in their
/// compact form (`a>=1`).
pub fn match_operator(fragment: &str) -> Option<OperatorMatch<'_>> {
    let table = matchers();
    table
        .iter()
        .find_map(|m| split_with(m.operator, &m.strict, fragment))
        .or_else(|| {
            table.iter().find_map(|m| {
                m.relaxed
                    .as_ref()
                    .and_then(|relaxed| split_with(m.operator, relaxed, fragment))
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn priority_table_order_is_fixed() {
        let tokens: Vec<&str> = OPERATOR_PRIORITY.iter().map(|op| op.token()).collect();
        assert_eq!(
            tokens,
            vec![
                "<=", ">=", "<>", "!=", "=", "<", ">", "LIKE", "IN", "NOT IN", "IS NULL",
                "IS NOT NULL", "BETWEEN"
            ]
        );
    }

    #[test]
    fn from_str_is_case_and_space_insensitive() {
        assert_eq!(Operator::from_str("like"), Ok(Operator::Like));
        assert_eq!(Operator::from_str("is  not\tnull"), Ok(Operator::IsNotNull));
        assert_eq!(Operator::from_str(">="), Ok(Operator::GtEq));
        assert!(Operator::from_str("~").is_err());
    }

    #[test]
    fn serializes_as_canonical_token() {
        let json = serde_json::to_string(&Operator::IsNotNull).expect("operator should serialize");
        assert_eq!(json, r#""IS NOT NULL""#);
        let parsed: Operator = serde_json::from_str(r#""<>""#).expect("operator should parse");
        assert_eq!(parsed, Operator::LtGt);
    }

    #[test]
    fn longer_symbolic_tokens_win() {
        let m = match_operator("a <= 5").expect("should match");
        assert_eq!(m.operator, Operator::LtEq);
        assert_eq!((m.left, m.right), ("a", Some("5")));

        assert_eq!(match_operator("a >= 5").map(|m| m.operator), Some(Operator::GtEq));
        assert_eq!(match_operator("a <> 5").map(|m| m.operator), Some(Operator::LtGt));
        assert_eq!(match_operator("a != 5").map(|m| m.operator), Some(Operator::NotEq));
        assert_eq!(match_operator("a < 5").map(|m| m.operator), Some(Operator::Lt));
        assert_eq!(match_operator("a > 5").map(|m| m.operator), Some(Operator::Gt));
    }

    #[test]
    fn compact_symbolic_forms_match() {
        let m = match_operator("e.salary>=60000").expect("should match");
        assert_eq!(m.operator, Operator::GtEq);
        assert_eq!((m.left, m.right), ("e.salary", Some("60000")));

        let m = match_operator("d.location='NYC'").expect("should match");
        assert_eq!(m.operator, Operator::Eq);
        assert_eq!((m.left, m.right), ("d.location", Some("'NYC'")));

        assert_eq!(match_operator("a<>b").map(|m| m.operator), Some(Operator::LtGt));
        assert_eq!(match_operator("a<b").map(|m| m.operator), Some(Operator::Lt));
    }

    #[test]
    fn spaced_keyword_beats_compact_symbol() {
        let m = match_operator("code LIKE 'a=b%'").expect("should match");
        assert_eq!(m.operator, Operator::Like);
        assert_eq!(m.right, Some("'a=b%'"));
    }

    #[test]
    fn keyword_operators_are_case_insensitive() {
        let m = match_operator("name like 'J%'").expect("should match");
        assert_eq!(m.operator, Operator::Like);
        assert_eq!(m.left, "name");

        let m = match_operator("id In (1, 2)").expect("should match");
        assert_eq!(m.operator, Operator::In);
        assert_eq!(m.right, Some("(1, 2)"));
    }

    #[test]
    fn not_in_is_shadowed_by_in() {
        let m = match_operator("id NOT IN (1, 2)").expect("should match");
        assert_eq!(m.operator, Operator::In);
        assert_eq!(m.left, "id NOT");
    }

    #[test]
    fn unary_operators_have_no_right_side() {
        let m = match_operator("x IS NULL").expect("should match");
        assert_eq!(m.operator, Operator::IsNull);
        assert_eq!((m.left, m.right), ("x", None));

        let m = match_operator("x is not null").expect("should match");
        assert_eq!(m.operator, Operator::IsNotNull);
        assert_eq!(m.right, None);
    }

    #[test]
    fn unrecognized_fragments_do_not_match() {
        assert!(match_operator("EXISTS  __SUBQUERY__").is_none());
        assert!(match_operator("is_active").is_none());
        assert!(match_operator("5").is_none());
    }
}
