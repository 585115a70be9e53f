use crate::{
    ast::{
        ColumnItem, Columns, FieldRef, JoinSpec, Literal, OrderItem, Predicate, SelectStatement,
        TableSpec,
    },
    error::ParseError,
    lexer::{
        Lexer,
        token::{Token, TokenKind},
    },
};
use model::query::{Query, SortDirection};
use tracing::debug;

pub mod formula;
pub mod resolve;

pub type ParseResult<T> = Result<T, ParseError>;

/// Translates one SELECT statement into a [`Query`].
///
/// Fails on the first unsupported construct; a partial query is never
/// returned.
pub fn translate(sql: &str) -> ParseResult<Query> {
    let statement = parse(sql)?;
    let query = resolve::build_query(statement)?;
    debug!(
        table = query.table_name(),
        columns = query.selected_fields().len(),
        join = query.join().map(|join| join.table_name.as_str()),
        "Translated statement"
    );
    Ok(query)
}

/// Parses SQL text into a [`SelectStatement`] without resolving table
/// qualifiers.
pub fn parse(sql: &str) -> ParseResult<SelectStatement> {
    let keyword = leading_word(sql);
    if !keyword.eq_ignore_ascii_case("select") {
        return Err(ParseError::UnsupportedStatement(keyword.to_string()));
    }

    let tokens = Lexer::new().tokenize(sql)?;
    StatementParser::new(sql, tokens).parse_select()
}

/// Recursive-descent parser over the token stream.
struct StatementParser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> StatementParser<'a> {
    fn new(source: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    fn parse_select(&mut self) -> ParseResult<SelectStatement> {
        if !self.eat(&TokenKind::Select) {
            return Err(ParseError::UnsupportedStatement(
                self.current().lexeme.clone(),
            ));
        }

        let columns = self.parse_columns()?;
        match self.peek() {
            TokenKind::From => self.advance(),
            TokenKind::Semicolon | TokenKind::Eof => return Err(ParseError::MissingFrom),
            _ => return Err(self.unexpected("SELECT list")),
        }

        let from = self.parse_table_spec("in FROM clause")?;
        let join = self.parse_join()?;
        if !self.at_clause_end() {
            return Err(self.unexpected("FROM clause"));
        }

        let mut predicates = Vec::new();
        if self.eat(&TokenKind::Where) {
            predicates = self.parse_where()?;
        }

        let mut order_by = Vec::new();
        if self.eat(&TokenKind::Order) {
            order_by = self.parse_order_by()?;
        }

        let mut limit = None;
        if self.eat(&TokenKind::Limit) {
            limit = Some(self.parse_limit()?);
        }

        self.eat(&TokenKind::Semicolon);
        if !self.check(&TokenKind::Eof) {
            return Err(self.unexpected("statement"));
        }

        Ok(SelectStatement {
            columns,
            from,
            join,
            predicates,
            order_by,
            limit,
        })
    }

    fn parse_columns(&mut self) -> ParseResult<Columns> {
        if self.eat(&TokenKind::Star) {
            return Ok(Columns::All);
        }
        if self.check(&TokenKind::From) {
            return Err(ParseError::EmptyColumnList);
        }

        let mut items = Vec::new();
        loop {
            if matches!(self.peek(), TokenKind::Semicolon | TokenKind::Eof) {
                return Err(ParseError::MissingFrom);
            }
            items.push(self.parse_column_item()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        Ok(Columns::List(items))
    }

    fn parse_column_item(&mut self) -> ParseResult<ColumnItem> {
        let start = self.pos;
        let first = self.expect_name("SELECT list")?;
        let (qualifier, field) = if self.eat(&TokenKind::Dot) {
            (Some(first), self.expect_name("SELECT list")?)
        } else {
            (None, first)
        };
        let field = FieldRef::new(qualifier, field, self.fragment(start, self.pos));

        let alias = if self.eat(&TokenKind::As) {
            Some(self.expect_name("SELECT list")?)
        } else {
            self.eat_name(false)
        };

        Ok(ColumnItem { field, alias })
    }

    fn parse_table_spec(&mut self, position: &'static str) -> ParseResult<TableSpec> {
        let Some(name) = self.eat_name(true) else {
            return Err(ParseError::MissingTable(position));
        };

        let alias = if self.eat(&TokenKind::As) {
            Some(self.expect_name("table alias")?)
        } else if !self.join_keyword_at(self.name_len(false).max(1)) {
            self.eat_name(false)
        } else {
            None
        };

        Ok(TableSpec { name, alias })
    }

    fn parse_join(&mut self) -> ParseResult<Option<JoinSpec>> {
        let start = self.pos;
        match self.peek() {
            TokenKind::Left => {
                self.advance();
                if !(self.eat(&TokenKind::Join) || self.eat(&TokenKind::Joint)) {
                    return Err(ParseError::UnsupportedJoin(self.join_fragment(start)));
                }
            }
            TokenKind::Join | TokenKind::Joint => {
                return Err(ParseError::UnsupportedJoin(self.join_fragment(start)));
            }
            kind if kind.name().is_some() && self.join_keyword_at(1) => {
                return Err(ParseError::UnsupportedJoin(self.join_fragment(start)));
            }
            _ => return Ok(None),
        }

        let table = self.parse_table_spec("after LEFT JOIN")?;
        if !self.eat(&TokenKind::On) {
            return Err(ParseError::MissingOnClause);
        }

        let (left, right) = self.parse_join_condition()?;
        Ok(Some(JoinSpec { table, left, right }))
    }

    /// `left = right`, with any enclosing parentheses ignored.
    fn parse_join_condition(&mut self) -> ParseResult<(FieldRef, FieldRef)> {
        let start = self.pos;
        while !self.at_clause_end() {
            self.advance();
        }
        let text = self.fragment(start, self.pos);

        let operands: Vec<Token> = self.tokens[start..self.pos]
            .iter()
            .filter(|token| !matches!(token.kind, TokenKind::LeftParen | TokenKind::RightParen))
            .cloned()
            .collect();

        let mut comparisons = operands
            .iter()
            .enumerate()
            .filter(|(_, token)| token.kind.is_comparison() || token.kind == TokenKind::And);
        let split = match (comparisons.next(), comparisons.next()) {
            (Some((index, token)), None) if token.kind == TokenKind::Equal => index,
            _ => return Err(ParseError::UnsupportedJoinCondition(text)),
        };

        let left = field_ref_from(self.source, &operands[..split]);
        let right = field_ref_from(self.source, &operands[split + 1..]);
        match (left, right) {
            (Some(left), Some(right)) => Ok((left, right)),
            _ => Err(ParseError::UnsupportedJoinCondition(text)),
        }
    }

    /// AND-separated equality predicates. A WHERE with no body yields no
    /// predicates; an empty segment beside an AND is rejected.
    fn parse_where(&mut self) -> ParseResult<Vec<Predicate>> {
        let mut predicates = Vec::new();
        let clause_start = self.pos;
        if self.at_clause_end() {
            return Ok(predicates);
        }

        loop {
            let start = self.pos;
            while !self.at_clause_end() && !self.check(&TokenKind::And) {
                self.advance();
            }
            if self.pos == start {
                let text = self.rest_of_clause(clause_start);
                return Err(ParseError::UnsupportedPredicate(text));
            }
            predicates.push(self.predicate(start, self.pos)?);
            if !self.eat(&TokenKind::And) {
                break;
            }
        }
        Ok(predicates)
    }

    fn predicate(&self, start: usize, end: usize) -> ParseResult<Predicate> {
        let tokens = &self.tokens[start..end];
        let text = self.fragment(start, end);

        let operator = match tokens.iter().position(|token| token.kind.is_comparison()) {
            Some(index) if tokens[index].kind == TokenKind::Equal => index,
            _ => return Err(ParseError::UnsupportedPredicate(text)),
        };

        let field = field_ref_from(self.source, &tokens[..operator])
            .ok_or_else(|| ParseError::UnsupportedPredicate(text.clone()))?;

        let value = match &tokens[operator + 1..] {
            [] => return Err(ParseError::UnsupportedPredicate(text)),
            [token] => match &token.kind {
                TokenKind::String(content) => Literal::Quoted(content.clone()),
                TokenKind::Number(_) => Literal::Number(token.lexeme.clone()),
                _ => return Err(ParseError::InvalidLiteral(token.lexeme.clone())),
            },
            rest => return Err(ParseError::InvalidLiteral(source_text(self.source, rest))),
        };

        Ok(Predicate { field, value })
    }

    fn parse_order_by(&mut self) -> ParseResult<Vec<OrderItem>> {
        if !self.eat(&TokenKind::By) {
            return Err(self.unexpected("ORDER BY"));
        }

        let mut items = Vec::new();
        let clause_start = self.pos;
        if self.at_clause_end() {
            return Ok(items);
        }

        loop {
            let start = self.pos;
            while !self.at_clause_end() && !self.check(&TokenKind::Comma) {
                self.advance();
            }
            if self.pos == start {
                let text = self.rest_of_clause(clause_start);
                return Err(ParseError::UnsupportedOrderBy(text));
            }
            items.push(self.order_item(start, self.pos)?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(items)
    }

    fn order_item(&self, start: usize, end: usize) -> ParseResult<OrderItem> {
        let tokens = &self.tokens[start..end];
        let (direction, field_tokens) = match tokens.split_last() {
            Some((last, rest)) if last.kind == TokenKind::Desc => (SortDirection::Desc, rest),
            Some((last, rest)) if last.kind == TokenKind::Asc => (SortDirection::Asc, rest),
            _ => (SortDirection::Asc, tokens),
        };

        let field = field_ref_from(self.source, field_tokens)
            .ok_or_else(|| ParseError::UnsupportedOrderBy(self.fragment(start, end)))?;
        Ok(OrderItem { field, direction })
    }

    fn parse_limit(&mut self) -> ParseResult<u32> {
        let start = self.pos;
        while !matches!(self.peek(), TokenKind::Semicolon | TokenKind::Eof) {
            self.advance();
        }
        if self.pos == start {
            return Err(ParseError::MissingLimit);
        }

        let text = self.fragment(start, self.pos);
        match &self.tokens[start..self.pos] {
            [token] if matches!(token.kind, TokenKind::Number(_)) => token
                .lexeme
                .parse::<u32>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ParseError::InvalidLimit(text)),
            _ => Err(ParseError::InvalidLimit(text)),
        }
    }

    // Cursor helpers. The stream always ends with Eof and the cursor never
    // moves past it.

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        &self.tokens[(self.pos + offset).min(self.tokens.len() - 1)].kind
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Number of tokens making up the name at the cursor: one quoted token
    /// or a run of adjacent bare tokens.
    fn name_len(&self, allow_dot: bool) -> usize {
        match self.peek() {
            TokenKind::String(_) | TokenKind::QuotedIdentifier(_) => 1,
            _ => bare_word_len(&self.tokens[self.pos..], allow_dot),
        }
    }

    /// Takes the name at the cursor. Bare names keep their source text, so
    /// `Sales-2024` stays one name.
    fn eat_name(&mut self, allow_dot: bool) -> Option<String> {
        let start = self.pos;
        let len = self.name_len(allow_dot);
        let name = match (self.peek().name(), len) {
            (_, 0) => return None,
            (Some(name), 1) => name.to_string(),
            _ => self.fragment(start, start + len),
        };
        self.pos = start + len;
        Some(name)
    }

    fn expect_name(&mut self, context: &'static str) -> ParseResult<String> {
        self.eat_name(false).ok_or_else(|| self.unexpected(context))
    }

    fn join_keyword_at(&self, offset: usize) -> bool {
        matches!(self.peek_at(offset), TokenKind::Join | TokenKind::Joint)
    }

    fn at_clause_end(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Where
                | TokenKind::Order
                | TokenKind::Limit
                | TokenKind::Semicolon
                | TokenKind::Eof
        )
    }

    /// Moves to the end of the current clause and returns its text.
    fn rest_of_clause(&mut self, start: usize) -> String {
        while !self.at_clause_end() {
            self.advance();
        }
        self.fragment(start, self.pos)
    }

    /// Join clause text from `start` up to its ON keyword or the next clause.
    fn join_fragment(&self, start: usize) -> String {
        let end = self.tokens[start..]
            .iter()
            .position(|token| {
                matches!(
                    token.kind,
                    TokenKind::On
                        | TokenKind::Where
                        | TokenKind::Order
                        | TokenKind::Limit
                        | TokenKind::Semicolon
                        | TokenKind::Eof
                )
            })
            .map_or(self.tokens.len(), |offset| start + offset);
        self.fragment(start, end)
    }

    fn fragment(&self, start: usize, end: usize) -> String {
        source_text(self.source, &self.tokens[start..end])
    }

    fn unexpected(&self, context: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            found: self.peek().to_string(),
            context,
        }
    }
}

/// First word of the statement, used to reject non-SELECT statements
/// before they are tokenized.
fn leading_word(sql: &str) -> &str {
    let trimmed = sql.trim_start();
    let end = trimmed
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(trimmed.len());
    if end > 0 {
        &trimmed[..end]
    } else {
        trimmed.split_whitespace().next().unwrap_or_default()
    }
}

/// Tokens at the start of `tokens` that form one unquoted word: identifiers,
/// numbers and stray symbols with no whitespace between them.
fn bare_word_len(tokens: &[Token], allow_dot: bool) -> usize {
    let is_piece = |token: &Token, first: bool| match token.kind {
        TokenKind::Identifier(_) | TokenKind::Number(_) | TokenKind::Symbol(_) => true,
        TokenKind::Dot => allow_dot && !first,
        _ => false,
    };

    let Some(first) = tokens.first().filter(|token| is_piece(token, true)) else {
        return 0;
    };
    let mut end = first.span.1;
    let mut len = 1;
    for token in &tokens[1..] {
        if token.span.0 != end || !is_piece(token, false) {
            break;
        }
        end = token.span.1;
        len += 1;
    }
    len
}

/// Source text covered by `tokens`, as written.
fn source_text(source: &str, tokens: &[Token]) -> String {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => source
            .get(first.span.0..last.span.1)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

/// `[qualifier.]word [word ...]`. Unquoted multi-word field names are
/// joined with single spaces.
fn field_ref_from(source: &str, tokens: &[Token]) -> Option<FieldRef> {
    let (qualifier, mut rest) = match tokens {
        [qualifier, dot, rest @ ..] if dot.kind == TokenKind::Dot && !rest.is_empty() => {
            (Some(qualifier.kind.name()?.to_string()), rest)
        }
        _ => (None, tokens),
    };
    if rest.is_empty() {
        return None;
    }

    let mut words = Vec::new();
    while !rest.is_empty() {
        let (word, len) = match bare_word_len(rest, false) {
            0 => (rest[0].kind.name()?.to_string(), 1),
            len => (source_text(source, &rest[..len]), len),
        };
        words.push(word);
        rest = &rest[len..];
    }
    Some(FieldRef::new(
        qualifier,
        words.join(" "),
        source_text(source, tokens),
    ))
}
