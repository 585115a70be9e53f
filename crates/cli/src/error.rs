use connectors::error::{ConfigError, ExecutionError};
use engine_core::EngineError;
use sql_syntax::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid connection settings: {0}")]
    Connection(#[from] ConfigError),

    #[error("Failed to translate SQL: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}
