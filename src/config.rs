use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::contract::NotificationConfig;

/// Application-level constants
pub const APP_NAME: &str = "sozlesme";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com/emails";
pub const DEFAULT_EMAIL_TIMEOUT_SECS: u64 = 30;

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "sozlesme=info,tower_http=info"
}

/// Per-user data directory (`~/.local/share/sozlesme` on Linux).
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .map(|base| base.join(APP_NAME))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Cannot determine a data directory; set SOZLESME_DB_PATH")]
    NoDataDirectory,
}

/// Runtime settings, read from `SOZLESME_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub database_path: PathBuf,
    pub listen_addr: SocketAddr,
    pub email_api_url: String,
    pub email_api_key: String,
    pub email_timeout_secs: u64,
    pub notification: NotificationConfig,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_path = match get("SOZLESME_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => app_data_dir()
                .ok_or(ConfigError::NoDataDirectory)?
                .join("sozlesme.db"),
        };

        let listen = get("SOZLESME_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into());
        let listen_addr: SocketAddr = listen.parse().map_err(|_| ConfigError::InvalidValue {
            var: "SOZLESME_LISTEN_ADDR",
            value: listen.clone(),
        })?;

        let email_timeout_secs = match get("SOZLESME_EMAIL_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    var: "SOZLESME_EMAIL_TIMEOUT_SECS",
                    value: raw,
                })?,
            None => DEFAULT_EMAIL_TIMEOUT_SECS,
        };

        let defaults = NotificationConfig::default();
        Ok(Self {
            database_path,
            listen_addr,
            email_api_url: get("SOZLESME_EMAIL_API_URL")
                .unwrap_or_else(|| DEFAULT_EMAIL_API_URL.into()),
            email_api_key: get("SOZLESME_EMAIL_API_KEY").unwrap_or_default(),
            email_timeout_secs,
            notification: NotificationConfig {
                sender: get("SOZLESME_MAIL_FROM").unwrap_or(defaults.sender),
                sales_cc: get("SOZLESME_MAIL_SALES_CC").unwrap_or(defaults.sales_cc),
                general_bcc: get("SOZLESME_MAIL_BCC").unwrap_or(defaults.general_bcc),
            },
        })
    }
}
