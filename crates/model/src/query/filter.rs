use crate::{core::value::Value, error::ModelError, query::select::Origin};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PostFilterOp {
    IsNull,
    IsNotNull,
    Equals,
    NotEquals,
}

impl PostFilterOp {
    pub fn requires_value(&self) -> bool {
        matches!(self, PostFilterOp::Equals | PostFilterOp::NotEquals)
    }
}

impl fmt::Display for PostFilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostFilterOp::IsNull => write!(f, "IS NULL"),
            PostFilterOp::IsNotNull => write!(f, "IS NOT NULL"),
            PostFilterOp::Equals => write!(f, "="),
            PostFilterOp::NotEquals => write!(f, "<>"),
        }
    }
}

/// A predicate evaluated client-side after the join.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostFilter {
    pub origin: Origin,
    pub field: String,
    pub operator: PostFilterOp,
    pub value: Option<Value>,
}

impl PostFilter {
    pub fn new(
        origin: Origin,
        field: impl Into<String>,
        operator: PostFilterOp,
        value: Option<Value>,
    ) -> Result<Self, ModelError> {
        let field = field.into();
        if field.is_empty() {
            return Err(ModelError::EmptyFieldName);
        }
        if operator.requires_value() && value.is_none() {
            return Err(ModelError::MissingPostFilterValue {
                field,
                operator: operator.to_string(),
            });
        }

        Ok(Self {
            origin,
            field,
            operator,
            value,
        })
    }

    pub fn is_null(origin: Origin, field: impl Into<String>) -> Result<Self, ModelError> {
        Self::new(origin, field, PostFilterOp::IsNull, None)
    }

    pub fn is_not_null(origin: Origin, field: impl Into<String>) -> Result<Self, ModelError> {
        Self::new(origin, field, PostFilterOp::IsNotNull, None)
    }

    pub fn equals(
        origin: Origin,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, ModelError> {
        Self::new(origin, field, PostFilterOp::Equals, Some(value.into()))
    }

    pub fn not_equals(
        origin: Origin,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, ModelError> {
        Self::new(origin, field, PostFilterOp::NotEquals, Some(value.into()))
    }

    /// Evaluates the predicate against a column value (`Null` when absent).
    ///
    /// Comparisons against `Null` are never satisfied, mirroring SQL.
    pub fn matches(&self, value: &Value) -> bool {
        match self.operator {
            PostFilterOp::IsNull => value.is_null(),
            PostFilterOp::IsNotNull => !value.is_null(),
            PostFilterOp::Equals => self
                .value
                .as_ref()
                .is_some_and(|expected| value.loosely_equals(expected)),
            PostFilterOp::NotEquals => {
                !value.is_null()
                    && self
                        .value
                        .as_ref()
                        .is_some_and(|expected| !value.loosely_equals(expected))
            }
        }
    }
}
