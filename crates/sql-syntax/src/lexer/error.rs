use crate::parser::Rule;
use pest::error::Error as PestError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerError {
    /// The token grammar ends in a catch-all rule, so pest only reports
    /// this if that rule is removed.
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Invalid number format: {0}")]
    InvalidNumber(String),

    #[error("Unterminated quoted text starting at column {column}: {fragment}")]
    Unterminated { fragment: String, column: usize },
}

impl LexerError {
    pub fn from_pest_error(err: PestError<Rule>) -> Self {
        use pest::error::LineColLocation;

        let (line, column) = match err.line_col {
            LineColLocation::Pos((l, c)) => (l, c),
            LineColLocation::Span((l, c), _) => (l, c),
        };

        LexerError::Syntax {
            message: err.variant.to_string(),
            line,
            column,
        }
    }
}
