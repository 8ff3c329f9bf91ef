#![allow(dead_code)]

use std::path::PathBuf;

use sql2conds::extractor::{extract_where_conditions, Condition};

pub(crate) fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from("tests/fixtures").join(name)
}

pub(crate) fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture should be readable")
}

pub(crate) fn extract_fixture(name: &str) -> Vec<Condition> {
    extract_where_conditions(&read_fixture(name))
}

/// `table.column OP value` lines, one per condition.
pub(crate) fn rendered(conditions: &[Condition]) -> Vec<String> {
    conditions.iter().map(ToString::to_string).collect()
}

pub(crate) fn unique_temp_dir(prefix: &str) -> PathBuf {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}_{nanos}"));
    std::fs::create_dir_all(&dir).expect("should create temp dir");
    dir
}
