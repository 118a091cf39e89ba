//! API endpoint handlers.
//!
//! Handlers validate input, then run the blocking database and dispatch
//! work through `ApiContext::with_db`.

pub mod contracts;
pub mod health;
pub mod legal_templates;
pub mod orders;
