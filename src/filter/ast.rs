use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// A filter tree. Leaves compare one record field against a constant;
/// `and`/`or` combine child filters.
///
/// On the wire the variant is selected by a `type` tag:
///
/// ```json
/// {"type": "or", "filters": [
///     {"type": "string", "field": "name", "operation": "startsWith", "value": "Alex"},
///     {"type": "number", "field": "score", "operation": "gte", "value": 10}
/// ]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Filter {
    String {
        field: String,
        operation: StringOp,
        value: String,
    },
    Number {
        field: String,
        operation: NumberOp,
        value: f64,
    },
    Boolean {
        field: String,
        value: bool,
    },
    Date {
        field: String,
        operation: DateOp,
        value: String,
    },
    And {
        #[serde(deserialize_with = "lenient_children")]
        filters: Vec<Filter>,
    },
    Or {
        #[serde(deserialize_with = "lenient_children")]
        filters: Vec<Filter>,
    },
    /// Any `type` tag not listed above. Matches nothing.
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Child {
    Filter(Filter),
    Malformed(IgnoredAny),
}

// A child that doesn't decode as a filter (wrong value type, missing field)
// becomes `Unknown` so it only excludes records instead of failing the whole
// document.
fn lenient_children<'de, D>(deserializer: D) -> Result<Vec<Filter>, D::Error>
where
    D: Deserializer<'de>,
{
    let children = Vec::<Child>::deserialize(deserializer)?;
    Ok(children
        .into_iter()
        .map(|child| match child {
            Child::Filter(f) => f,
            Child::Malformed(_) => {
                tracing::warn!("malformed sub-filter treated as matching nothing");
                Filter::Unknown
            }
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StringOp {
    Eq,
    StartsWith,
    EndsWith,
    Contains,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberOp {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateOp {
    Eq,
    After,
    Before,
    #[serde(other)]
    Unknown,
}

impl Filter {
    pub fn string(field: impl Into<String>, operation: StringOp, value: impl Into<String>) -> Self {
        Filter::String {
            field: field.into(),
            operation,
            value: value.into(),
        }
    }

    pub fn number(field: impl Into<String>, operation: NumberOp, value: f64) -> Self {
        Filter::Number {
            field: field.into(),
            operation,
            value,
        }
    }

    pub fn boolean(field: impl Into<String>, value: bool) -> Self {
        Filter::Boolean {
            field: field.into(),
            value,
        }
    }

    pub fn date(field: impl Into<String>, operation: DateOp, value: impl Into<String>) -> Self {
        Filter::Date {
            field: field.into(),
            operation,
            value: value.into(),
        }
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And { filters }
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or { filters }
    }
}
