use chrono::{DateTime, NaiveDate, Utc};
use model::{Row, Value, core::identifiers::normalize_key};
use std::collections::HashMap;

/// Keys probed, in order, for the display form of a nested object.
const DISPLAY_KEYS: [&str; 4] = ["name", "value", "email", "id"];

const DATE_TYPES: [&str; 2] = ["date", "datewithtimezone"];
const DATETIME_TYPES: [&str; 4] = [
    "datetime",
    "datetimewithtimezone",
    "createdtime",
    "lastmodifiedtime",
];

/// Applies schema-driven coercion to every field of `row` that has a
/// declared type. Fields without one are left untouched.
pub fn coerce_row(row: &mut Row, field_types: &HashMap<String, String>) {
    for (label, value) in row.iter_mut() {
        let Some(field_type) = field_types.get(&normalize_key(label)) else {
            continue;
        };
        let raw = std::mem::replace(value, Value::Null);
        *value = coerce_value(raw, field_type);
    }
}

/// Coerces one raw value given its lower-cased declared type. Values that
/// do not fit the expected shape come back unchanged.
pub fn coerce_value(value: Value, field_type: &str) -> Value {
    if DATE_TYPES.contains(&field_type) || DATETIME_TYPES.contains(&field_type) {
        return coerce_temporal(value, field_type);
    }
    if field_type.contains("lookup") && matches!(value, Value::List(_)) {
        return Value::String(flatten_lookup(&value));
    }
    collapse_emails(value)
}

fn coerce_temporal(value: Value, field_type: &str) -> Value {
    let Value::String(raw) = &value else {
        return value;
    };

    let parsed = if DATE_TYPES.contains(&field_type) {
        parse_date(raw).map(Value::Date)
    } else {
        parse_datetime(raw).map(Value::Timestamp)
    };
    parsed.unwrap_or(value)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(raw).map(|dt| dt.date_naive()))
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Joins a lookup list into one string, recursing into nested lists.
fn flatten_lookup(value: &Value) -> String {
    let mut parts = Vec::new();
    collect_display(value, &mut parts);
    parts.join(", ")
}

fn collect_display(value: &Value, parts: &mut Vec<String>) {
    match value {
        Value::List(items) => {
            for item in items {
                collect_display(item, parts);
            }
        }
        other => parts.push(display_of(other)),
    }
}

/// Display string for a lookup element. Objects yield the first non-null
/// probe key, then any value they hold.
fn display_of(value: &Value) -> String {
    let Value::Object(map) = value else {
        return value.display_string();
    };

    DISPLAY_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|candidate| !candidate.is_null())
        .or_else(|| map.values().next())
        .map(Value::display_string)
        .unwrap_or_default()
}

/// Collaborator-style values: an object with an `email` becomes that email;
/// a list collapses only when every element has one.
fn collapse_emails(value: Value) -> Value {
    let collapsed = match &value {
        Value::Object(_) => email_of(&value),
        Value::List(items) if !items.is_empty() => items
            .iter()
            .map(email_of)
            .collect::<Option<Vec<_>>>()
            .map(|emails| emails.join(", ")),
        _ => None,
    };
    collapsed.map(Value::String).unwrap_or(value)
}

fn email_of(value: &Value) -> Option<String> {
    value
        .get("email")
        .and_then(Value::as_str)
        .map(str::to_string)
}
