use clap::{ArgGroup, Parser, ValueEnum};
use recq::source::{self, record_path};
use recq::{filter_records, values, Filter, LoadError, Record};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recq", about = "Filter structured records with composable predicate trees")]
#[command(group(ArgGroup::new("input").required(true).args(["records", "vault"])))]
struct Cli {
    #[arg(long, env = "RECQ_FILTER", help = "JSON or YAML filter document")]
    filter: Option<PathBuf>,

    #[arg(long = "filter-json", value_name = "TEXT", help = "Inline JSON or YAML filter")]
    filter_json: Option<String>,

    #[arg(
        long,
        env = "RECQ_RECORDS",
        conflicts_with = "vault",
        help = "JSON or YAML document holding the records"
    )]
    records: Option<PathBuf>,

    #[arg(long, env = "RECQ_VAULT", help = "Directory of Markdown files; frontmatter is the record")]
    vault: Option<PathBuf>,

    #[arg(long, requires = "vault", help = "Read Markdown file paths from stdin")]
    stdin: bool,

    #[arg(long, help = "List unique values for a field among matching records")]
    values: Option<String>,

    #[arg(long, requires = "values", help = "Show count for each value")]
    count: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One JSON object per line
    Json,
    /// A YAML sequence
    Yaml,
    /// The `path` field of each match
    Paths,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Found,
    Empty,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("No filter provided. Use --filter or --filter-json")]
    NoFilter,

    #[error("failed to write JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write YAML output: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let stdout = io::stdout();
    let result = run(&cli, &mut stdout.lock());
    if let Err(e) = &result {
        eprintln!("Error: {}", e);
    }

    ExitCode::from(exit_status(&result))
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("RECQ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn exit_status(result: &Result<Outcome, CliError>) -> u8 {
    match result {
        Ok(Outcome::Found) => 0,
        Ok(Outcome::Empty) => 1,
        Err(_) => 2,
    }
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<Outcome, CliError> {
    let records = load_records(cli)?;
    tracing::info!(count = records.len(), "loaded records");

    let filter = load_filter(cli)?;
    let matched: Vec<&Record> = match &filter {
        Some(f) => filter_records(&records, f),
        None if cli.values.is_some() => records.iter().collect(),
        None => return Err(CliError::NoFilter),
    };
    tracing::info!(matched = matched.len(), total = records.len(), "filtered records");

    if let Some(field) = &cli.values {
        return write_values(out, &matched, field, cli.count);
    }

    write_matches(out, &matched, cli.format)
}

fn load_records(cli: &Cli) -> Result<Vec<Record>, LoadError> {
    if let Some(path) = &cli.records {
        return source::load_records(path);
    }

    let Some(vault) = &cli.vault else {
        return Ok(Vec::new());
    };
    let files = if cli.stdin {
        source::read_paths_from_stdin()
    } else {
        source::collect_markdown_files(vault)
    };
    Ok(source::load_vault(vault, files))
}

fn load_filter(cli: &Cli) -> Result<Option<Filter>, LoadError> {
    if let Some(text) = &cli.filter_json {
        if cli.filter.is_some() {
            tracing::warn!("both --filter and --filter-json given; using --filter-json");
        }
        return source::parse_filter(text, "--filter-json").map(Some);
    }

    cli.filter
        .as_deref()
        .map(source::load_filter)
        .transpose()
}

fn write_values(
    out: &mut impl Write,
    matched: &[&Record],
    field: &str,
    show_count: bool,
) -> Result<Outcome, CliError> {
    let counts = values::collect_values(matched.iter().copied(), field);

    if counts.is_empty() {
        return Ok(Outcome::Empty);
    }

    for line in values::format_values(counts, show_count) {
        writeln!(out, "{}", line)?;
    }

    Ok(Outcome::Found)
}

fn write_matches(
    out: &mut impl Write,
    matched: &[&Record],
    format: OutputFormat,
) -> Result<Outcome, CliError> {
    match format {
        OutputFormat::Json => {
            for record in matched {
                serde_json::to_writer(&mut *out, record)?;
                writeln!(out)?;
            }
        }
        OutputFormat::Yaml => serde_yaml::to_writer(&mut *out, matched)?,
        OutputFormat::Paths => {
            for record in matched {
                match record_path(record) {
                    Some(path) => writeln!(out, "{}", path)?,
                    None => tracing::warn!("matched record has no path field"),
                }
            }
        }
    }

    if matched.is_empty() {
        Ok(Outcome::Empty)
    } else {
        Ok(Outcome::Found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("recq").chain(args.iter().copied()))
    }

    fn run_captured(cli: &Cli) -> (Result<Outcome, CliError>, String) {
        let mut out = Vec::new();
        let result = run(cli, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn write_records(dir: &Path, yaml: &str) -> String {
        let path = dir.join("records.yaml");
        fs::write(&path, yaml).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_records_and_vault_conflict() {
        let err = parse(&["--records", "r.yaml", "--vault", "notes"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_stdin_requires_vault() {
        let err = parse(&["--records", "r.yaml", "--stdin"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_input_is_required() {
        let err = parse(&["--filter-json", "{}"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_filter_json_wins_over_filter_file() {
        let dir = tempfile::tempdir().unwrap();
        let filter_path = dir.path().join("filter.json");
        fs::write(
            &filter_path,
            r#"{"type": "string", "field": "name", "operation": "eq", "value": "Bob"}"#,
        )
        .unwrap();
        let cli = parse(&[
            "--records",
            "unused.yaml",
            "--filter",
            filter_path.to_str().unwrap(),
            "--filter-json",
            r#"{"type": "string", "field": "name", "operation": "eq", "value": "Alex"}"#,
        ])
        .unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let filter = tracing::subscriber::with_default(subscriber, || load_filter(&cli)).unwrap();

        assert_eq!(
            filter,
            Some(Filter::string("name", recq::StringOp::Eq, "Alex"))
        );
        let logged = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("using --filter-json"));
    }

    #[test]
    fn test_json_output_reproduces_records() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_records(
            dir.path(),
            r#"[{"zeta": 1, "alpha": "x", "big": 9007199254740993}, {"zeta": 2}]"#,
        );
        let cli = parse(&[
            "--records",
            &records,
            "--filter-json",
            r#"{"type": "number", "field": "zeta", "operation": "lt", "value": 2}"#,
        ])
        .unwrap();

        let (result, out) = run_captured(&cli);
        assert_eq!(result.unwrap(), Outcome::Found);
        assert_eq!(out, "{\"zeta\":1,\"alpha\":\"x\",\"big\":9007199254740993}\n");
    }

    #[test]
    fn test_values_without_filter_lists_all_records() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_records(
            dir.path(),
            "- status: active\n- status: done\n- status: active\n- other: x\n",
        );
        let cli = parse(&["--records", &records, "--values", "status", "--count"]).unwrap();

        let (result, out) = run_captured(&cli);
        assert_eq!(result.unwrap(), Outcome::Found);
        assert_eq!(out, "active: 2\ndone: 1\n");
    }

    #[test]
    fn test_values_for_missing_field_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_records(dir.path(), "- status: active\n");
        let cli = parse(&["--records", &records, "--values", "owner"]).unwrap();

        let (result, out) = run_captured(&cli);
        assert_eq!(exit_status(&result), 1);
        assert!(out.is_empty());
    }

    #[test]
    fn test_paths_format_prints_vault_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "---\nstatus: active\n---\nBody").unwrap();
        fs::write(dir.path().join("b.md"), "---\nstatus: done\n---\nBody").unwrap();
        let cli = parse(&[
            "--vault",
            dir.path().to_str().unwrap(),
            "--filter-json",
            r#"{"type": "string", "field": "status", "operation": "eq", "value": "active"}"#,
            "--format",
            "paths",
        ])
        .unwrap();

        let (result, out) = run_captured(&cli);
        assert_eq!(result.unwrap(), Outcome::Found);
        assert_eq!(out, "a.md\n");
    }

    #[test]
    fn test_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_records(dir.path(), "- {name: Alex}\n- {name: Bob}\n");
        let filter = |value: &str| {
            format!(r#"{{"type": "string", "field": "name", "operation": "eq", "value": "{value}"}}"#)
        };

        let found = parse(&["--records", &records, "--filter-json", &filter("Bob")]).unwrap();
        assert_eq!(exit_status(&run_captured(&found).0), 0);

        let empty = parse(&["--records", &records, "--filter-json", &filter("Carol")]).unwrap();
        let (result, out) = run_captured(&empty);
        assert_eq!(exit_status(&result), 1);
        assert!(out.is_empty());

        let no_filter = parse(&["--records", &records]).unwrap();
        let (result, _) = run_captured(&no_filter);
        assert!(matches!(result, Err(CliError::NoFilter)));
        assert_eq!(exit_status(&result), 2);

        let missing = dir.path().join("missing.yaml");
        let missing = parse(&[
            "--records",
            missing.to_str().unwrap(),
            "--filter-json",
            &filter("Bob"),
        ])
        .unwrap();
        let (result, _) = run_captured(&missing);
        assert!(matches!(result, Err(CliError::Load(LoadError::Io { .. }))));
        assert_eq!(exit_status(&result), 2);
    }

    #[test]
    fn test_yaml_output() {
        let dir = tempfile::tempdir().unwrap();
        let records = write_records(dir.path(), "- {name: Alex, score: 3}\n");
        let cli = parse(&[
            "--records",
            &records,
            "--filter-json",
            r#"{"type": "and", "filters": []}"#,
            "--format",
            "yaml",
        ])
        .unwrap();

        let (result, out) = run_captured(&cli);
        assert_eq!(result.unwrap(), Outcome::Found);
        assert_eq!(out, "- name: Alex\n  score: 3\n");
    }
}
