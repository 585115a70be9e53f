use crate::{
    lexer::{
        error::LexerError,
        token::{Token, TokenKind},
    },
    parser::{Rule, SqlParser},
};
use pest::{Parser, iterators::Pair};

pub mod error;
pub mod token;

/// Turns statement text into a token stream ending with [`TokenKind::Eof`].
///
/// Quoted text is a single token, so keywords inside literals or quoted
/// identifiers never split a clause.
pub struct Lexer {
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new() -> Self {
        Lexer { tokens: Vec::new() }
    }

    pub fn tokenize(&mut self, input: &str) -> Result<Vec<Token>, LexerError> {
        self.tokens.clear();

        let pairs =
            SqlParser::parse(Rule::statement, input).map_err(LexerError::from_pest_error)?;

        for pair in pairs {
            self.process_pair(pair)?;
        }

        self.tokens.push(Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            line: input.lines().count().max(1),
            column: input.lines().last().map(|l| l.len()).unwrap_or(0) + 1,
            span: (input.len(), input.len()),
        });

        Ok(std::mem::take(&mut self.tokens))
    }

    fn process_pair(&mut self, pair: Pair<Rule>) -> Result<(), LexerError> {
        let rule = pair.as_rule();
        let span = pair.as_span();
        let (line, column) = span.start_pos().line_col();
        let lexeme = span.as_str().to_string();

        let kind = match rule {
            Rule::statement => {
                for inner in pair.into_inner() {
                    self.process_pair(inner)?;
                }
                return Ok(());
            }
            Rule::EOI => return Ok(()),

            // Keywords
            Rule::kw_select => TokenKind::Select,
            Rule::kw_from => TokenKind::From,
            Rule::kw_where => TokenKind::Where,
            Rule::kw_order => TokenKind::Order,
            Rule::kw_by => TokenKind::By,
            Rule::kw_limit => TokenKind::Limit,
            Rule::kw_left => TokenKind::Left,
            Rule::kw_join => TokenKind::Join,
            Rule::kw_joint => TokenKind::Joint,
            Rule::kw_on => TokenKind::On,
            Rule::kw_as => TokenKind::As,
            Rule::kw_and => TokenKind::And,
            Rule::kw_asc => TokenKind::Asc,
            Rule::kw_desc => TokenKind::Desc,

            // Literals
            Rule::lit_string => TokenKind::String(unquote(&lexeme)),
            Rule::lit_number => {
                let num = lexeme
                    .parse::<f64>()
                    .map_err(|_| LexerError::InvalidNumber(lexeme.clone()))?;
                TokenKind::Number(num)
            }
            Rule::unterminated => {
                return Err(LexerError::Unterminated {
                    fragment: lexeme,
                    column,
                });
            }

            // Identifiers
            Rule::ident => TokenKind::Identifier(lexeme.clone()),
            Rule::quoted_ident => TokenKind::QuotedIdentifier(unquote(&lexeme)),

            // Operators
            Rule::op_eq => TokenKind::Equal,
            Rule::op_ne => TokenKind::NotEqual,
            Rule::op_lt => TokenKind::LessThan,
            Rule::op_gt => TokenKind::GreaterThan,
            Rule::op_le => TokenKind::LessOrEqual,
            Rule::op_ge => TokenKind::GreaterOrEqual,

            // Delimiters
            Rule::star => TokenKind::Star,
            Rule::comma => TokenKind::Comma,
            Rule::dot => TokenKind::Dot,
            Rule::lparen => TokenKind::LeftParen,
            Rule::rparen => TokenKind::RightParen,
            Rule::semicolon => TokenKind::Semicolon,

            Rule::unknown => TokenKind::Symbol(lexeme.clone()),

            // Silent rules never surface as pairs.
            _ => return Ok(()),
        };

        self.tokens.push(Token {
            kind,
            lexeme,
            line,
            column,
            span: (span.start(), span.end()),
        });

        Ok(())
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Lexer::new()
    }
}

/// Strips the surrounding quote characters and collapses doubled quotes.
fn unquote(lexeme: &str) -> String {
    let Some(quote) = lexeme.chars().next() else {
        return String::new();
    };
    let inner = &lexeme[quote.len_utf8()..lexeme.len() - quote.len_utf8()];
    let doubled: String = [quote, quote].iter().collect();
    inner.replace(&doubled, &quote.to_string())
}
