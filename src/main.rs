//! CLI entry point for `sql2conds`.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use sql2conds::merge;
use sql2conds::output::formatter::{self, OutputFormat};
use sql2conds::output::report::ExtractedQuery;

#[derive(Parser)]
#[command(
    name = "sql2conds",
    about = "Extract WHERE-clause conditions from SQL queries, nested subqueries included"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print verbose diagnostics to stderr
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Extract conditions from SQL files and/or an inline query
    Extract {
        /// Input SQL files, one query per file
        #[arg(required_unless_present = "sql")]
        input: Vec<PathBuf>,

        /// Inline SQL query
        #[arg(long)]
        sql: Option<String>,

        /// Output format on stdout: json or table
        #[arg(long, default_value = "json")]
        format: OutputFormat,

        /// Also write `<name>_conditions.json` and `<name>_report.md` here
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Base name of the files written to `--output-dir`
        #[arg(long, default_value = "conditions")]
        name: String,
    },
    /// Recursively merge JSON files, left to right
    Merge {
        /// Input JSON files
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Write the merged document here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let code = match cli.command {
        Command::Extract {
            input,
            sql,
            format,
            output_dir,
            name,
        } => run_extract(
            &input,
            sql.as_deref(),
            format,
            output_dir.as_deref(),
            &name,
            cli.verbose,
        ),
        Command::Merge { input, output } => run_merge(&input, output.as_deref()),
    };

    match code {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    }
}

fn run_extract(
    input: &[PathBuf],
    sql: Option<&str>,
    format: OutputFormat,
    output_dir: Option<&Path>,
    name: &str,
    verbose: bool,
) -> Result<i32, String> {
    let mut sources = Vec::new();
    for path in input {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
        sources.push(ExtractedQuery::from_sql(path.display().to_string(), &content));
    }
    if let Some(sql) = sql {
        sources.push(ExtractedQuery::from_sql("inline", sql));
    }

    if verbose {
        for query in &sources {
            eprintln!(
                "Source '{}': {} conditions over {} tables",
                query.source,
                query.conditions.len(),
                query.tables().len()
            );
        }
    }

    let rendered = formatter::render_sources(&sources, format)?;
    println!("{}", rendered.trim_end());

    if let Some(dir) = output_dir {
        formatter::write_output(dir, name, &sources)
            .map_err(|e| format!("Error writing output: {e}"))?;
    }

    Ok(0)
}

fn run_merge(input: &[PathBuf], output: Option<&Path>) -> Result<i32, String> {
    let mut documents = Vec::with_capacity(input.len());
    for path in input {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
        documents.push(content);
    }

    let combined = merge::combine_json_strings(&documents);
    for error in &combined.errors {
        eprintln!("{error}");
    }

    let rendered = serde_json::to_string_pretty(&combined.value)
        .map_err(|e| format!("Failed to serialize merged JSON: {e}"))?;
    match output {
        Some(path) => std::fs::write(path, format!("{rendered}\n"))
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(i32::from(!combined.is_clean()))
}
