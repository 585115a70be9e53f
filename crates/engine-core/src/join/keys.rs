use model::Value;

/// Normalized join key. `None` is the null key.
pub type JoinKey = Option<String>;

/// Keys carried by a link-style field value.
///
/// `Null` yields the single null key and a list yields one key per element.
/// Any other value yields one key.
pub fn extract_keys(value: &Value) -> Vec<JoinKey> {
    match value {
        Value::Null => vec![None],
        Value::List(items) => items.iter().map(element_key).collect(),
        other => vec![element_key(other)],
    }
}

/// Linked-record objects contribute their `id`. Other objects fall back to
/// their first non-null value.
fn element_key(value: &Value) -> JoinKey {
    match value {
        Value::Null => None,
        Value::Object(map) => map
            .get("id")
            .filter(|id| !id.is_null())
            .or_else(|| map.values().find(|candidate| !candidate.is_null()))
            .map(Value::display_string),
        scalar => Some(scalar.display_string()),
    }
}
