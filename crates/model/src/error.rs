use thiserror::Error;

/// Violations of the query model invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Table name cannot be empty")]
    EmptyTableName,

    #[error("Field name cannot be empty")]
    EmptyFieldName,

    #[error("Column '{0}' references the join table but the query has no join")]
    JoinFieldWithoutJoin(String),

    #[error("Post-filter {operator} on '{field}' requires a value")]
    MissingPostFilterValue { field: String, operator: String },

    #[error("maxRecords must be positive, got {0}")]
    NonPositiveMaxRecords(i64),
}
