//! Order contract generation & delivery.
//!
//! For every completed purchase two documents are produced: the pre-contract
//! information form and the distance-sales contract. Flow:
//! request → (resolve order) → load stored PDFs | render + save → compose email → send
//!
//! Rendering is split in two: `content` turns order data into a typed block
//! list, `layout` paginates blocks for either document kind, `pdf` paints the
//! laid-out pages with `printpdf`.

pub mod classify;
pub mod content;
pub mod dispatch;
pub mod email;
pub mod layout;
pub mod notification;
pub mod pdf;
pub mod renderer;
pub mod resolver;
pub mod sanitize;
pub mod seller;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::*;
pub use dispatch::*;
pub use email::*;
pub use notification::*;
pub use renderer::*;
pub use resolver::*;
pub use store::*;
pub use types::*;

use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid dispatch request: {0}")]
    InvalidRequest(String),

    #[error("Legal template unavailable: {0}")]
    TemplateUnavailable(String),

    #[error("Contract rendering failed: {0}")]
    Render(String),

    #[error("Contract persistence failed: {0}")]
    Persistence(DatabaseError),

    #[error("Email transport failed: {0}")]
    Transport(String),

    #[error("Email API rejected message (status {status}): {body}")]
    TransportRejected { status: u16, body: String },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ContractError {
    /// True when the documents were acquired and only the send step failed.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            ContractError::Transport(_) | ContractError::TransportRejected { .. }
        )
    }
}
