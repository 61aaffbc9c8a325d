use crate::record::Record;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Reads the YAML frontmatter of a Markdown file as a record.
///
/// Files that can't be read, have no frontmatter, or whose frontmatter is not
/// a mapping yield `None`.
pub fn parse_frontmatter(path: &Path) -> Option<Record> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "skipping unreadable file");
            return None;
        }
    };
    let record = extract_and_parse(&content);
    if record.is_none() {
        tracing::debug!(path = %path.display(), "no usable frontmatter");
    }
    record
}

fn extract_and_parse(content: &str) -> Option<Record> {
    let trimmed = content.trim_start();
    let after_first = trimmed.strip_prefix("---")?;
    let end_idx = after_first.find("\n---")?;
    let yaml_str = &after_first[..end_idx];

    let value: Value = serde_yaml::from_str(yaml_str).ok()?;
    Record::from_yaml(value)
}
