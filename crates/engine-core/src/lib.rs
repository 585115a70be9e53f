pub mod engine;
pub mod error;
pub mod join;

pub use engine::{QueryEngine, QueryResult};
pub use error::EngineError;
