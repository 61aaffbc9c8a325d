use crate::record::{Record, Value};
use serde_yaml::Value as YamlValue;
use std::collections::HashMap;

/// Counts the distinct values of `field` across `records`. Sequence values
/// contribute each of their scalar items.
pub fn collect_values<'a, I>(records: I, field: &str) -> HashMap<String, usize>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();

    for record in records {
        let Some(value) = record.get(field) else {
            continue;
        };

        match value {
            Value::Other(YamlValue::Sequence(arr)) => {
                for item in arr {
                    if let Some(s) = yaml_to_string(item) {
                        *counts.entry(s).or_default() += 1;
                    }
                }
            }
            _ => {
                if let Some(s) = value_to_string(value) {
                    *counts.entry(s).or_default() += 1;
                }
            }
        }
    }

    counts
}

pub fn format_values(counts: HashMap<String, usize>, show_count: bool) -> Vec<String> {
    let mut items: Vec<(String, usize)> = counts.into_iter().collect();

    if show_count {
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        items
            .into_iter()
            .map(|(val, count)| format!("{}: {}", val, count))
            .collect()
    } else {
        items.sort_by(|a, b| a.0.cmp(&b.0));
        items.into_iter().map(|(val, _)| val).collect()
    }
}

fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Timestamp(ts) => Some(ts.to_rfc3339()),
        _ => None,
    }
}

fn yaml_to_string(v: &YamlValue) -> Option<String> {
    match v {
        YamlValue::String(s) if !s.is_empty() => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
