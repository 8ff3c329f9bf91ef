use std::fmt::Write as _;
use std::path::{Component, Path};

use serde_json::{Map, Value};

use crate::extractor::Condition;
use crate::output::report::{self, ExtractedQuery};

/// How extracted conditions are rendered on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON records.
    #[default]
    Json,
    /// Aligned plain-text table.
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            _ => Err(format!("Invalid output format: {s}")),
        }
    }
}

/// Render one condition list.
pub fn render(conditions: &[Condition], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(conditions)
            .map_err(|e| format!("Failed to serialize conditions: {e}")),
        OutputFormat::Table => Ok(format_table(conditions)),
    }
}

/// Render several labelled condition lists.
///
/// JSON output is a single object keyed by source label, with repeated labels
/// suffixed `#2`, `#3`, ...; table output prints a `== source ==` header
/// before each table.
pub fn render_sources(sources: &[ExtractedQuery], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => {
            let document = sources_to_json(sources)?;
            serde_json::to_string_pretty(&document)
                .map_err(|e| format!("Failed to serialize conditions: {e}"))
        }
        OutputFormat::Table => {
            let mut out = String::new();
            for (idx, query) in sources.iter().enumerate() {
                if idx > 0 {
                    out.push('\n');
                }
                writeln!(out, "== {} ==", query.source).unwrap();
                out.push_str(&format_table(&query.conditions));
            }
            Ok(out)
        }
    }
}

fn sources_to_json(sources: &[ExtractedQuery]) -> Result<Value, String> {
    let mut document = Map::new();
    for query in sources {
        let conditions = serde_json::to_value(&query.conditions)
            .map_err(|e| format!("Failed to serialize conditions for {}: {e}", query.source))?;
        let mut label = query.source.clone();
        let mut occurrence = 1;
        while document.contains_key(&label) {
            occurrence += 1;
            label = format!("{} #{occurrence}", query.source);
        }
        document.insert(label, conditions);
    }
    Ok(Value::Object(document))
}

/// Aligned `TABLE | COLUMN | OPERATOR | VALUE` table, one row per condition.
pub fn format_table(conditions: &[Condition]) -> String {
    const HEADERS: [&str; 4] = ["TABLE", "COLUMN", "OPERATOR", "VALUE"];

    if conditions.is_empty() {
        return "(no conditions)\n".to_string();
    }

    let rows: Vec<[&str; 4]> = conditions
        .iter()
        .map(|c| {
            [
                c.table_name.as_str(),
                c.column_name.as_str(),
                c.operator.token(),
                c.value.as_str(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&HEADERS).chain(&rows) {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(out, "{}", line.trim_end()).unwrap();
    }
    out
}

/// Write the JSON conditions file and the markdown report for `sources`.
pub fn write_output(output_dir: &Path, name: &str, sources: &[ExtractedQuery]) -> Result<(), String> {
    validate_output_name(name)?;

    std::fs::create_dir_all(output_dir)
        .map_err(|e| format!("Failed to create output directory: {e}"))?;

    // Write _conditions.json
    let json_path = output_dir.join(format!("{name}_conditions.json"));
    let json_content = render_sources(sources, OutputFormat::Json)?;
    std::fs::write(&json_path, json_content)
        .map_err(|e| format!("Failed to write {}: {e}", json_path.display()))?;

    // Write _report.md
    let report_path = output_dir.join(format!("{name}_report.md"));
    let report_content = report::build_report(sources);
    std::fs::write(&report_path, &report_content)
        .map_err(|e| format!("Failed to write {}: {e}", report_path.display()))?;

    Ok(())
}

fn validate_output_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Output name must not be empty".to_string());
    }
    let candidate = Path::new(name);
    if candidate.is_absolute() {
        return Err(format!(
            "Invalid output name '{name}': absolute paths are not allowed"
        ));
    }
    if candidate.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    }) {
        return Err(format!(
            "Invalid output name '{name}': traversal segments are not allowed"
        ));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(format!(
            "Invalid output name '{name}': path separators are not allowed"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_path(prefix: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be monotonic")
            .as_nanos();
        std::env::temp_dir().join(format!("{prefix}_{nanos}"))
    }

    fn sample_sources() -> Vec<ExtractedQuery> {
        vec![ExtractedQuery::from_sql(
            "q1",
            "SELECT * FROM employees e WHERE e.salary > 50000",
        )]
    }

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!(OutputFormat::from_str("JSON"), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("table"), Ok(OutputFormat::Table));
        assert!(OutputFormat::from_str("xml").is_err());
    }

    #[test]
    fn repeated_source_labels_get_numbered_json_keys() {
        let sources = vec![
            ExtractedQuery::from_sql("inline", "SELECT * FROM a WHERE a.x = 1"),
            ExtractedQuery::from_sql("inline", "SELECT * FROM b WHERE b.y = 2"),
            ExtractedQuery::from_sql("inline", "SELECT * FROM c WHERE c.z = 3"),
        ];
        let json = render_sources(&sources, OutputFormat::Json).expect("json should render");
        let parsed: Value = serde_json::from_str(&json).expect("output should be JSON");
        let object = parsed.as_object().expect("top level should be an object");

        let labels: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["inline", "inline #2", "inline #3"]);
        assert_eq!(parsed["inline #2"][0]["table_name"], "b");
        assert_eq!(parsed["inline #3"][0]["table_name"], "c");
    }

    #[test]
    fn format_table_handles_empty_input() {
        assert_eq!(format_table(&[]), "(no conditions)\n");
    }

    #[test]
    fn write_output_reports_directory_creation_errors() {
        let path = unique_path("sql2conds_formatter_file");
        std::fs::write(&path, "not a directory").expect("should create marker file");

        let err = write_output(&path, "output", &sample_sources())
            .expect_err("directory creation should fail");
        assert!(err.contains("Failed to create output directory"));
    }

    #[test]
    fn write_output_rejects_unsafe_name_paths() {
        let dir = unique_path("sql2conds_formatter_dir");
        std::fs::create_dir_all(&dir).expect("should create temp directory");

        let err = write_output(&dir, "nested/output", &sample_sources())
            .expect_err("unsafe output name should fail validation");
        assert!(err.contains("Invalid output name"));

        let err = write_output(&dir, "../escape", &sample_sources())
            .expect_err("path traversal should fail validation");
        assert!(err.contains("Invalid output name"));

        let err = write_output(&dir, "  ", &sample_sources())
            .expect_err("blank output name should fail validation");
        assert!(err.contains("must not be empty"));
    }

    #[test]
    fn write_output_writes_all_artifacts_on_success() {
        let dir = unique_path("sql2conds_formatter_ok");

        write_output(&dir, "queries", &sample_sources()).expect("write_output should succeed");

        let json = std::fs::read_to_string(dir.join("queries_conditions.json"))
            .expect("conditions file should exist");
        let report =
            std::fs::read_to_string(dir.join("queries_report.md")).expect("report should exist");

        let parsed: Value = serde_json::from_str(&json).expect("conditions file should be JSON");
        assert_eq!(parsed["q1"][0]["column_name"], "salary");
        assert_eq!(parsed["q1"][0]["table_name"], "employees");
        assert!(report.contains("# sql2conds Extraction Report"));
    }
}
