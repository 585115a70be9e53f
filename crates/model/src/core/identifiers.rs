/// Name of the synthetic column that carries each record's identifier.
pub const RECORD_ID_COLUMN: &str = "id";

/// Identifiers that refer to the record identifier rather than a declared field.
const RECORD_ID_ALIASES: [&str; 2] = ["id", "record_id"];

/// Returns true when `field` names the synthetic record identifier.
///
/// Such references are never sent to the service as fields to fetch.
pub fn is_record_id(field: &str) -> bool {
    RECORD_ID_ALIASES
        .iter()
        .any(|alias| alias.eq_ignore_ascii_case(field))
}

/// Lower-cases a table or field name for case-insensitive cache lookups.
pub fn normalize_key(name: &str) -> String {
    name.to_lowercase()
}
