use serde::{Deserialize, Serialize};
use std::fmt;

use super::operators::{match_operator, Operator};
use crate::parser::aliases::TableAliases;
use crate::parser::names::{normalize_column_expr, split_qualified, strip_value_quotes};

/// One filter predicate pulled out of a WHERE clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    /// Column name without its table qualifier.
    pub column_name: String,
    /// Table resolved from the column's qualifier; empty when unqualified.
    pub table_name: String,
    /// Operator that matched the fragment.
    pub operator: Operator,
    /// Right-hand side with wrapping quotes removed; empty for unary operators.
    pub value: String,
}

impl Condition {
    /// `table.column`, or just `column` when no table is known.
    pub fn qualified_column(&self) -> String {
        if self.table_name.is_empty() {
            self.column_name.clone()
        } else {
            format!("{}.{}", self.table_name, self.column_name)
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.qualified_column(), self.operator)?;
        if !self.operator.is_unary() {
            write!(f, " {}", self.value)?;
        }
        Ok(())
    }
}

/// Turn one trimmed WHERE fragment into a [`Condition`].
///
/// Returns `None` when no operator from the vocabulary matches.
pub fn build_condition(fragment: &str, aliases: &TableAliases) -> Option<Condition> {
    let matched = match_operator(fragment)?;

    let column = normalize_column_expr(matched.left);
    let (table_name, column_name) = match split_qualified(&column) {
        (Some(qualifier), name) => (aliases.resolve(qualifier).to_string(), name.to_string()),
        (None, name) => (String::new(), name.to_string()),
    };

    let value = matched
        .right
        .map(strip_value_quotes)
        .unwrap_or_default()
        .to_string();

    Some(Condition {
        column_name,
        table_name,
        operator: matched.operator,
        value,
    })
}
