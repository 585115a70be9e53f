pub mod ast;
pub mod builder;
pub mod error;
pub mod lexer;
pub mod parser;

pub use builder::translate;
pub use error::ParseError;
