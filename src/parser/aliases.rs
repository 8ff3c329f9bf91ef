use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// Tokens that are never accepted as an alias right after `FROM <table>`.
pub const FROM_ALIAS_EXCLUSIONS: &[&str] = &["WHERE", "JOIN", "INNER", "LEFT", "RIGHT", "OUTER", "ON"];

/// Tokens that are never accepted as an alias right after `JOIN <table>`.
pub const JOIN_ALIAS_EXCLUSIONS: &[&str] = &["ON", "WHERE", "AND", "OR"];

fn from_regex() -> &'static Regex {
    static FROM_REGEX: OnceLock<Regex> = OnceLock::new();
    FROM_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\bFROM\s+(\w+)(?:\s+AS)?\s+(\w+)").expect("valid FROM alias regex")
    })
}

fn join_regex() -> &'static Regex {
    static JOIN_REGEX: OnceLock<Regex> = OnceLock::new();
    JOIN_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\bJOIN\s+(\w+)(?:\s+AS)?\s+(\w+)").expect("valid JOIN alias regex")
    })
}

/// Alias → table bindings visible in one query scope.
///
/// A nested scope starts from an owned copy of its parent's bindings and may
/// add its own; nothing flows back to the parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableAliases {
    aliases: HashMap<String, String>,
}

impl TableAliases {
    /// Create an empty alias map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect `FROM <table> [AS] <alias>` and `JOIN <table> [AS] <alias>` bindings.
    ///
    /// FROM bindings are collected first, JOIN bindings second; a later binding
    /// for the same alias replaces the earlier one.
    pub fn from_sql(sql: &str) -> Self {
        let mut aliases = Self::new();
        aliases.collect_bindings(sql, from_regex(), FROM_ALIAS_EXCLUSIONS);
        aliases.collect_bindings(sql, join_regex(), JOIN_ALIAS_EXCLUSIONS);
        aliases
    }

    fn collect_bindings(&mut self, sql: &str, pattern: &Regex, excluded: &[&str]) {
        for caps in pattern.captures_iter(sql) {
            let table = &caps[1];
            let alias = &caps[2];
            if is_excluded(alias, excluded) {
                continue;
            }
            self.insert(alias, table);
        }
    }

    /// Bind `alias` to `table`, replacing any previous binding.
    pub fn insert(&mut self, alias: impl Into<String>, table: impl Into<String>) {
        self.aliases.insert(alias.into(), table.into());
    }

    /// Return this map extended with the bindings of `other`; `other` wins on conflicts.
    #[must_use]
    pub fn extended_with(mut self, other: TableAliases) -> Self {
        self.aliases.extend(other.aliases);
        self
    }

    /// Table bound to `alias`, if any.
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Table bound to `alias`, or the alias token itself when unbound.
    pub fn resolve<'a>(&'a self, alias: &'a str) -> &'a str {
        self.get(alias).unwrap_or(alias)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// True when no alias is bound.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Iterate over `(alias, table)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|(alias, table)| (alias.as_str(), table.as_str()))
    }
}

fn is_excluded(alias: &str, excluded: &[&str]) -> bool {
    let upper = alias.to_ascii_uppercase();
    excluded.iter().any(|keyword| *keyword == upper)
}
