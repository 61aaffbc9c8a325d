//! Loading records and filters from disk.

use crate::error::LoadError;
use crate::filter::Filter;
use crate::frontmatter;
use crate::record::{Record, Value};
use ignore::WalkBuilder;
use serde_yaml::Value as YamlValue;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

/// Field holding a vault record's path relative to the vault root.
pub const PATH_FIELD: &str = "path";

pub fn collect_markdown_files(vault_path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkBuilder::new(vault_path)
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false)
        .add_custom_ignore_filename(".recqignore")
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "skipping vault entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path.to_path_buf());
        }
    }

    tracing::debug!(count = files.len(), vault = %vault_path.display(), "collected markdown files");
    files
}

pub fn read_paths_from_stdin() -> Vec<PathBuf> {
    let stdin = io::stdin();
    stdin
        .lock()
        .lines()
        .map_while(Result::ok)
        .filter(|line| !line.trim().is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Turns Markdown files into records, one per file with frontmatter. Each
/// record gets a `path` field relative to `vault_path` unless its frontmatter
/// already defines one.
pub fn load_vault(vault_path: &Path, files: Vec<PathBuf>) -> Vec<Record> {
    files
        .into_iter()
        .filter_map(|path| {
            let mut record = frontmatter::parse_frontmatter(&path)?;
            if !record.contains_field(PATH_FIELD) {
                let display = path.strip_prefix(vault_path).unwrap_or(&path);
                record.insert(PATH_FIELD, display.display().to_string());
            }
            Some(record)
        })
        .collect()
}

/// Reads a JSON or YAML document holding a sequence of records, or a single
/// record.
pub fn load_records(path: &Path) -> Result<Vec<Record>, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    parse_records(&text, &path.display().to_string())
}

pub fn parse_records(text: &str, what: &str) -> Result<Vec<Record>, LoadError> {
    let doc: YamlValue = serde_yaml::from_str(text).map_err(|e| LoadError::decode(what, e))?;

    let items = match doc {
        YamlValue::Sequence(items) => items,
        doc @ YamlValue::Mapping(_) => vec![doc],
        YamlValue::Null => Vec::new(),
        _ => {
            return Err(LoadError::Shape {
                what: what.to_string(),
                expected: "a sequence of mappings",
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            Record::from_yaml(item).ok_or_else(|| LoadError::Shape {
                what: format!("{what}[{i}]"),
                expected: "a mapping",
            })
        })
        .collect()
}

pub fn load_filter(path: &Path) -> Result<Filter, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    parse_filter(&text, &path.display().to_string())
}

/// Decodes a filter document. JSON is accepted as a subset of YAML.
pub fn parse_filter(text: &str, what: &str) -> Result<Filter, LoadError> {
    let filter: Filter = serde_yaml::from_str(text).map_err(|e| LoadError::decode(what, e))?;
    if has_unknown(&filter) {
        tracing::warn!(source = what, "filter contains unrecognized types or operations; they match nothing");
    }
    Ok(filter)
}

fn has_unknown(filter: &Filter) -> bool {
    use crate::filter::{DateOp, NumberOp, StringOp};

    match filter {
        Filter::Unknown => true,
        Filter::String { operation, .. } => *operation == StringOp::Unknown,
        Filter::Number { operation, .. } => *operation == NumberOp::Unknown,
        Filter::Date { operation, .. } => *operation == DateOp::Unknown,
        Filter::Boolean { .. } => false,
        Filter::And { filters } | Filter::Or { filters } => filters.iter().any(has_unknown),
    }
}

/// Path of a record loaded from a vault, if it has one.
pub fn record_path(record: &Record) -> Option<&str> {
    record.get(PATH_FIELD).and_then(Value::as_str)
}
