//! Unresolved statement structure produced by the parser.
//!
//! Names are kept exactly as written; table qualifiers are only checked
//! against the FROM clause when the statement is turned into a query.

use model::query::SortDirection;

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub columns: Columns,
    pub from: TableSpec,
    pub join: Option<JoinSpec>,
    pub predicates: Vec<Predicate>,
    pub order_by: Vec<OrderItem>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Columns {
    /// `SELECT *`
    All,
    List(Vec<ColumnItem>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnItem {
    pub field: FieldRef,
    pub alias: Option<String>,
}

/// `[qualifier.]field`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef {
    pub qualifier: Option<String>,
    pub field: String,
    /// Source text, used in error messages.
    pub text: String,
}

impl FieldRef {
    pub fn new(qualifier: Option<String>, field: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            qualifier,
            field: field.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub name: String,
    pub alias: Option<String>,
}

impl TableSpec {
    /// Case-insensitive match against the table name or its alias.
    pub fn matches(&self, qualifier: &str) -> bool {
        self.name.eq_ignore_ascii_case(qualifier)
            || self
                .alias
                .as_deref()
                .is_some_and(|alias| alias.eq_ignore_ascii_case(qualifier))
    }
}

/// `LEFT JOIN table [alias] ON left = right`
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    pub table: TableSpec,
    pub left: FieldRef,
    pub right: FieldRef,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Quoted text with the quotes removed.
    Quoted(String),
    /// Numeric literal exactly as written.
    Number(String),
}

/// `field = literal`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: FieldRef,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub field: FieldRef,
    pub direction: SortDirection,
}
