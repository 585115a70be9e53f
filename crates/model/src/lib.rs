pub mod core;
pub mod error;
pub mod query;
pub mod records;

pub use crate::core::value::Value;
pub use crate::records::row::Row;
