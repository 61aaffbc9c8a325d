use super::ast::{DateOp, Filter, NumberOp, StringOp};
use super::date;
use crate::record::{Record, Value};

/// Decides whether `record` satisfies `filter`.
///
/// Never fails. A missing field, a field of the wrong type, an unknown
/// operation or an unknown filter type all evaluate to `false`. An empty
/// `and` is `true` and an empty `or` is `false`.
pub fn evaluate(record: &Record, filter: &Filter) -> bool {
    match filter {
        Filter::String {
            field,
            operation,
            value,
        } => eval_string(record, field, *operation, value),
        Filter::Number {
            field,
            operation,
            value,
        } => eval_number(record, field, *operation, *value),
        Filter::Boolean { field, value } => eval_boolean(record, field, *value),
        Filter::Date {
            field,
            operation,
            value,
        } => eval_date(record, field, *operation, value),
        Filter::Or { filters } => filters.iter().any(|f| evaluate(record, f)),
        Filter::And { filters } => filters.iter().all(|f| evaluate(record, f)),
        Filter::Unknown => false,
    }
}

/// Returns the records matching `filter`, in their original order.
pub fn filter_records<'a>(records: &'a [Record], filter: &Filter) -> Vec<&'a Record> {
    records.iter().filter(|r| evaluate(r, filter)).collect()
}

pub fn filter_records_owned(records: Vec<Record>, filter: &Filter) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| evaluate(r, filter))
        .collect()
}

/// Parallel [`filter_records`]. Output order still follows input order.
#[cfg(feature = "parallel")]
pub fn filter_records_par<'a>(records: &'a [Record], filter: &Filter) -> Vec<&'a Record> {
    use rayon::prelude::*;

    records.par_iter().filter(|r| evaluate(r, filter)).collect()
}

fn eval_string(record: &Record, field: &str, op: StringOp, value: &str) -> bool {
    let Some(actual) = record.get(field).and_then(Value::as_str) else {
        return false;
    };

    match op {
        StringOp::Eq => actual == value,
        StringOp::StartsWith => actual.starts_with(value),
        StringOp::EndsWith => actual.ends_with(value),
        StringOp::Contains => actual.contains(value),
        StringOp::Unknown => false,
    }
}

fn eval_number(record: &Record, field: &str, op: NumberOp, value: f64) -> bool {
    let Some(actual) = record.get(field).and_then(Value::as_f64) else {
        return false;
    };

    match op {
        NumberOp::Eq => actual == value,
        NumberOp::Gt => actual > value,
        NumberOp::Lt => actual < value,
        NumberOp::Gte => actual >= value,
        NumberOp::Lte => actual <= value,
        NumberOp::Unknown => false,
    }
}

fn eval_boolean(record: &Record, field: &str, value: bool) -> bool {
    matches!(record.get(field), Some(Value::Bool(b)) if *b == value)
}

fn eval_date(record: &Record, field: &str, op: DateOp, value: &str) -> bool {
    try_eval_date(record, field, op, value).unwrap_or(false)
}

// An unparseable date on either side makes every comparison false, including
// equality between two unparseable dates.
fn try_eval_date(record: &Record, field: &str, op: DateOp, value: &str) -> Option<bool> {
    let actual = date::value_millis(record.get(field)?)?;
    let expected = date::parse_millis(value)?;

    match op {
        DateOp::Eq => Some(actual == expected),
        DateOp::After => Some(actual > expected),
        DateOp::Before => Some(actual < expected),
        DateOp::Unknown => None,
    }
}
