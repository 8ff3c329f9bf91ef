/// FROM/JOIN alias resolution for one query scope.
pub mod aliases;
/// WHERE clause location and AND/OR fragment splitting.
pub mod clause;
/// Column-expression normalization and literal/identifier helpers.
pub mod names;
/// Balanced-parenthesis isolation of `( SELECT ... )` subqueries.
pub mod subquery;
