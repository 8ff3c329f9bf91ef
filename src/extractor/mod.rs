//! WHERE-condition extraction pipeline.
//!
//! Each query scope goes through alias resolution, subquery isolation (which
//! recurses into this pipeline for every nested `( SELECT ... )`), clause
//! splitting and condition building. Nested conditions come first, followed
//! by the scope's own conditions in fragment order.

/// Condition record and the fragment → record builder.
pub mod condition;
/// Operator vocabulary and its priority-ordered matchers.
pub mod operators;

use tracing::debug;

use crate::parser::aliases::TableAliases;
use crate::parser::clause::where_fragments;
use crate::parser::subquery::isolate_subqueries;

pub use condition::{build_condition, Condition};
pub use operators::{Operator, OPERATOR_PRIORITY};

/// Extract every WHERE condition from `sql`, including those of nested subqueries.
///
/// Never fails: fragments that cannot be interpreted are skipped.
pub fn extract_where_conditions(sql: &str) -> Vec<Condition> {
    extract_scope(sql, TableAliases::new())
}

/// Extract the conditions of one scope, starting from the aliases inherited
/// from the enclosing scope.
pub fn extract_scope(sql: &str, inherited: TableAliases) -> Vec<Condition> {
    let aliases = inherited.extended_with(TableAliases::from_sql(sql));
    debug!(
        target: "sql2conds::extractor",
        aliases = ?aliases.iter().collect::<Vec<_>>(),
        "extracting scope"
    );

    let isolated = isolate_subqueries(sql, |subquery| {
        debug!(target: "sql2conds::extractor", subquery, "entering subquery scope");
        extract_scope(subquery, aliases.clone())
    });

    let mut conditions = isolated.nested;
    for fragment in where_fragments(&isolated.outer) {
        match build_condition(fragment, &aliases) {
            Some(condition) => conditions.push(condition),
            None => debug!(
                target: "sql2conds::extractor",
                fragment,
                "no known operator; fragment dropped"
            ),
        }
    }
    conditions
}
