//! Shared state for the API router.

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::contract::ContractDispatcher;
use crate::db::open_database;

/// Shared context for all API routes.
///
/// Each request opens its own SQLite connection on a blocking thread; the
/// dispatcher is shared.
#[derive(Clone)]
pub struct ApiContext {
    pub db_path: Arc<PathBuf>,
    pub dispatcher: Arc<ContractDispatcher>,
}

impl ApiContext {
    pub fn new(db_path: PathBuf, dispatcher: Arc<ContractDispatcher>) -> Self {
        Self {
            db_path: Arc::new(db_path),
            dispatcher,
        }
    }

    pub fn open_db(&self) -> Result<Connection, ApiError> {
        open_database(&self.db_path).map_err(ApiError::from)
    }

    /// Runs `f` with a fresh connection on the blocking pool.
    pub async fn with_db<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection, &ContractDispatcher) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let ctx = self.clone();
        tokio::task::spawn_blocking(move || {
            let conn = ctx.open_db()?;
            f(&conn, &ctx.dispatcher)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Blocking task failed: {e}")))?
    }
}
