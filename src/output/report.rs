use std::fmt::Write;

use crate::extractor::{extract_where_conditions, Condition};

/// Conditions extracted from one named SQL source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedQuery {
    /// Source label (file name or `inline`).
    pub source: String,
    /// Conditions in extraction order.
    pub conditions: Vec<Condition>,
}

impl ExtractedQuery {
    /// Run the extractor over `sql` and label the result with `source`.
    pub fn from_sql(source: impl Into<String>, sql: &str) -> Self {
        Self {
            source: source.into(),
            conditions: extract_where_conditions(sql),
        }
    }

    /// Distinct non-empty table names, in first-seen order.
    pub fn tables(&self) -> Vec<&str> {
        let mut tables: Vec<&str> = Vec::new();
        for condition in &self.conditions {
            let table = condition.table_name.as_str();
            if !table.is_empty() && !tables.contains(&table) {
                tables.push(table);
            }
        }
        tables
    }
}

/// Build a markdown report with a per-source summary and condition tables.
pub fn build_report(sources: &[ExtractedQuery]) -> String {
    let mut report = String::new();

    writeln!(report, "# sql2conds Extraction Report").unwrap();
    writeln!(report).unwrap();

    writeln!(report, "## Summary").unwrap();
    writeln!(report).unwrap();
    writeln!(report, "| Source | Conditions | Tables |").unwrap();
    writeln!(report, "|--------|------------|--------|").unwrap();

    for query in sources {
        let tables = query.tables();
        let tables = if tables.is_empty() {
            "-".to_string()
        } else {
            tables.join(", ")
        };
        writeln!(
            report,
            "| {} | {} | {} |",
            escape_cell(&query.source),
            query.conditions.len(),
            escape_cell(&tables)
        )
        .unwrap();
    }

    for query in sources {
        writeln!(report).unwrap();
        writeln!(report, "## {}", query.source).unwrap();
        writeln!(report).unwrap();

        if query.conditions.is_empty() {
            writeln!(report, "_No conditions found._").unwrap();
            continue;
        }

        writeln!(report, "| Table | Column | Operator | Value |").unwrap();
        writeln!(report, "|-------|--------|----------|-------|").unwrap();
        for condition in &query.conditions {
            writeln!(
                report,
                "| {} | {} | `{}` | {} |",
                escape_cell(&condition.table_name),
                escape_cell(&condition.column_name),
                condition.operator,
                escape_cell(&condition.value)
            )
            .unwrap();
        }
    }

    report
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
