use connectors::error::{ConfigError, ExecutionError};
use model::error::ModelError;
use sql_syntax::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to translate SQL: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("Invalid query: {0}")]
    Model(#[from] ModelError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
