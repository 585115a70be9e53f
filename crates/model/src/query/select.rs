use serde::Serialize;
use std::fmt;

/// Which side of the statement a column is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Origin {
    Base,
    Join,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Base => write!(f, "BASE"),
            Origin::Join => write!(f, "JOIN"),
        }
    }
}

/// One entry of the SELECT list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedField {
    pub origin: Origin,
    pub field: String,
    /// Output column name.
    pub label: String,
}

impl SelectedField {
    pub fn new(origin: Origin, field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            origin,
            field: field.into(),
            label: label.into(),
        }
    }

    pub fn base(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(Origin::Base, field, label)
    }

    pub fn joined(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(Origin::Join, field, label)
    }
}
