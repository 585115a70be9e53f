use serde::Serialize;

/// LEFT JOIN against a second table, keyed on one field per side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Join {
    pub table_name: String,
    pub alias: Option<String>,
    /// Field of the base table.
    pub left_field: String,
    /// Field of the join table.
    pub right_field: String,
}

impl Join {
    pub fn new(
        table_name: impl Into<String>,
        alias: Option<String>,
        left_field: impl Into<String>,
        right_field: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            alias,
            left_field: left_field.into(),
            right_field: right_field.into(),
        }
    }

    /// Case-insensitive match against the table name or its alias.
    pub fn matches_alias(&self, name: &str) -> bool {
        self.table_name.eq_ignore_ascii_case(name)
            || self
                .alias
                .as_deref()
                .is_some_and(|alias| alias.eq_ignore_ascii_case(name))
    }
}
