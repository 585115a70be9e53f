use crate::{ast::Literal, builder::ParseResult, error::ParseError};
use model::core::identifiers::is_record_id;

/// Renders `field = value` in the service's formula language.
///
/// Record identifier references become `RECORD_ID() = '...'` whatever
/// literal shape they were written with.
pub fn equality(field: &str, value: &Literal) -> ParseResult<String> {
    if is_record_id(field) {
        let content = match value {
            Literal::Quoted(content) | Literal::Number(content) => content,
        };
        if content.is_empty() {
            return Err(ParseError::EmptyRecordId);
        }
        return Ok(format!("RECORD_ID() = '{}'", escape(content)));
    }

    match value {
        Literal::Quoted(content) => Ok(format!("{{{}}} = '{}'", field, escape(content))),
        Literal::Number(lexeme) if lexeme.parse::<f64>().is_ok() => {
            Ok(format!("{{{}}} = {}", field, lexeme))
        }
        Literal::Number(lexeme) => Err(ParseError::InvalidLiteral(lexeme.clone())),
    }
}

/// One formula is used as is; several are wrapped in `AND(...)`.
pub fn combine(mut formulas: Vec<String>) -> Option<String> {
    match formulas.len() {
        0 => None,
        1 => formulas.pop(),
        _ => Some(format!("AND({})", formulas.join(","))),
    }
}

fn escape(value: &str) -> String {
    value.replace('\'', "\\'")
}
