/// Renders conditions as JSON or text tables and writes output files.
pub mod formatter;
/// Builds a Markdown extraction report from labelled condition lists.
pub mod report;
