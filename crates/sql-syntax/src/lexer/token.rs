use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
    /// Byte offsets into the source statement.
    pub span: (usize, usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    Select,
    From,
    Where,
    Order,
    By,
    Limit,
    Left,
    Join,
    /// Misspelling of JOIN accepted after LEFT.
    Joint,
    On,
    As,
    And,
    Asc,
    Desc,

    // Literals
    String(String),
    Number(f64),

    // Identifiers
    Identifier(String),
    QuotedIdentifier(String),

    // Operators
    Equal,          // =
    NotEqual,       // <> or !=
    LessThan,       // <
    GreaterThan,    // >
    LessOrEqual,    // <=
    GreaterOrEqual, // >=

    // Delimiters
    Star,       // *
    Comma,      // ,
    Dot,        // .
    LeftParen,  // (
    RightParen, // )
    Semicolon,  // ;

    /// Any other single character, e.g. the `-` in `Sales-2024`.
    Symbol(String),

    // Special
    Eof,
}

impl TokenKind {
    /// Tokens that may name a table, field or alias. Single- and
    /// double-quoted text doubles as an identifier outside WHERE values.
    pub fn name(&self) -> Option<&str> {
        match self {
            TokenKind::Identifier(s) | TokenKind::QuotedIdentifier(s) | TokenKind::String(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            TokenKind::Equal
                | TokenKind::NotEqual
                | TokenKind::LessThan
                | TokenKind::GreaterThan
                | TokenKind::LessOrEqual
                | TokenKind::GreaterOrEqual
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Select => write!(f, "SELECT"),
            TokenKind::From => write!(f, "FROM"),
            TokenKind::Where => write!(f, "WHERE"),
            TokenKind::Order => write!(f, "ORDER"),
            TokenKind::By => write!(f, "BY"),
            TokenKind::Limit => write!(f, "LIMIT"),
            TokenKind::Left => write!(f, "LEFT"),
            TokenKind::Join => write!(f, "JOIN"),
            TokenKind::Joint => write!(f, "JOINT"),
            TokenKind::On => write!(f, "ON"),
            TokenKind::As => write!(f, "AS"),
            TokenKind::And => write!(f, "AND"),
            TokenKind::Asc => write!(f, "ASC"),
            TokenKind::Desc => write!(f, "DESC"),
            TokenKind::String(s) => write!(f, "'{}'", s),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Identifier(s) => write!(f, "{}", s),
            TokenKind::QuotedIdentifier(s) => write!(f, "`{}`", s),
            TokenKind::Equal => write!(f, "="),
            TokenKind::NotEqual => write!(f, "<>"),
            TokenKind::LessThan => write!(f, "<"),
            TokenKind::GreaterThan => write!(f, ">"),
            TokenKind::LessOrEqual => write!(f, "<="),
            TokenKind::GreaterOrEqual => write!(f, ">="),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Dot => write!(f, "."),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Symbol(s) => write!(f, "{}", s),
            TokenKind::Eof => write!(f, "end of statement"),
        }
    }
}
