//! Repository layer — entity-scoped database operations.
//!
//! Contract blob reads/writes live with the pipeline in `contract::store`;
//! this layer owns plain order rows and the editable legal templates.

mod legal_template;
mod order;

pub use legal_template::*;
pub use order::*;

/// Timestamp format for every TEXT date column.
pub const DB_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
