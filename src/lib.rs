//! Extract filter predicates from the WHERE clauses of SQL queries, nested subqueries included.
#![warn(missing_docs)]

/// WHERE-condition extraction: operator vocabulary, condition records, and the scope pipeline.
pub mod extractor;
/// Recursive merging of JSON documents.
pub mod merge;
/// Condition rendering, file output, and Markdown report generation.
pub mod output;
/// Text scanning helpers: aliases, subquery isolation, clause splitting, and normalization.
pub mod parser;

pub use extractor::{extract_where_conditions, Condition, Operator};
