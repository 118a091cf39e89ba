pub mod api;
pub mod config;
pub mod contract;
pub mod db;
pub mod models;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::api::{start_api_server, ApiContext};
use crate::config::{ConfigError, ServiceConfig};
use crate::contract::{ContractDispatcher, ContractError, HttpEmailTransport, PdfContractRenderer};
use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Email transport error: {0}")]
    Transport(#[from] ContractError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Starts the HTTP service and blocks until Ctrl-C.
pub fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = ServiceConfig::from_env()?;
    db::open_database(&config.database_path)?;
    tracing::info!(path = %config.database_path.display(), "Database ready");

    if config.email_api_key.is_empty() {
        tracing::warn!("SOZLESME_EMAIL_API_KEY is not set; contract emails will be rejected");
    }

    // The blocking HTTP client must be created and dropped outside the runtime.
    let transport = HttpEmailTransport::new(
        &config.email_api_url,
        &config.email_api_key,
        config.email_timeout_secs,
    )?;
    let dispatcher = Arc::new(ContractDispatcher::new(
        Box::new(PdfContractRenderer),
        Box::new(transport),
        config.notification.clone(),
    ));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let ctx = ApiContext::new(config.database_path.clone(), dispatcher.clone());
    let listen_addr = config.listen_addr;
    runtime.block_on(async move {
        let mut server = start_api_server(ctx, listen_addr).await?;
        tracing::info!(addr = %server.addr, "Listening");

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Cannot listen for shutdown signal: {e}");
        }
        server.shutdown();
        server.stopped().await;
        Ok::<(), StartupError>(())
    })?;

    drop(runtime);
    drop(dispatcher);
    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
