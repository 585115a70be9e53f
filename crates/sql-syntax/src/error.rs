use crate::lexer::error::LexerError;
use model::error::ModelError;
use thiserror::Error;

/// Why a statement could not be translated into a [`model::query::Query`].
///
/// Messages name the offending fragment of the statement.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Only SELECT statements are supported. Found: {0}")]
    UnsupportedStatement(String),

    #[error("Missing FROM clause.")]
    MissingFrom,

    #[error("Table name is required {0}.")]
    MissingTable(&'static str),

    #[error("The column list cannot be empty.")]
    EmptyColumnList,

    #[error("SELECT * is not supported in queries with LEFT JOIN.")]
    SelectAllWithJoin,

    #[error("Only LEFT JOIN clauses are supported. Found: {0}")]
    UnsupportedJoin(String),

    #[error("LEFT JOIN requires an ON clause.")]
    MissingOnClause,

    #[error("Only equality conditions are supported in LEFT JOIN: {0}")]
    UnsupportedJoinCondition(String),

    #[error("LEFT JOIN only supports conditions whose left side references the base table (received: {0}).")]
    JoinLeftNotBase(String),

    #[error("The LEFT JOIN condition must reference the table {table} (received: {found}).")]
    JoinRightNotJoined { table: String, found: String },

    #[error("Column {0} references an unknown table.")]
    UnknownTableReference(String),

    #[error("{clause} only supports fields of the base table: {field}")]
    NonBaseField { clause: &'static str, field: String },

    #[error("Unsupported WHERE predicate: {0}")]
    UnsupportedPredicate(String),

    #[error("WHERE values must be quoted strings or numeric literals: {0}")]
    InvalidLiteral(String),

    #[error("RECORD_ID() requires a value.")]
    EmptyRecordId,

    #[error("Unsupported ORDER BY clause: {0}")]
    UnsupportedOrderBy(String),

    #[error("LIMIT requires a numeric value.")]
    MissingLimit,

    #[error("Invalid LIMIT value: {0}")]
    InvalidLimit(String),

    #[error("Unexpected {found} in {context}.")]
    UnexpectedToken { found: String, context: &'static str },

    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
