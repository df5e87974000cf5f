//! Portal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `PORTAL_HOST` - Bind address (default: 127.0.0.1)
//! - `PORTAL_PORT` - Listen port (default: 8501)
//! - `PORTAL_BASE_URL` - Public URL (default: `http://localhost:<port>`)
//! - `PORTAL_DATA_DIR` - Directory holding the credential and template workbooks (default: .)
//! - `PORTAL_CONTENT_DIR` - Markdown content directory (default: crates/portal/content)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sample rates (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use techealth_sheets::files;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Portal application configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL; an `https` URL makes the session cookie secure
    pub base_url: String,
    /// Directory containing `admin_credentials.xlsx` and `template.xlsx`
    pub data_dir: PathBuf,
    /// Directory containing `pages/*.md`
    pub content_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_or_default(&lookup, "PORTAL_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or_default(&lookup, "PORTAL_PORT", 8501)?;
        let base_url = lookup("PORTAL_BASE_URL").unwrap_or_else(|| format!("http://localhost:{port}"));
        let data_dir = lookup("PORTAL_DATA_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from);
        let content_dir = lookup("PORTAL_CONTENT_DIR")
            .map_or_else(|| PathBuf::from("crates/portal/content"), PathBuf::from);

        Ok(Self {
            host,
            port,
            base_url,
            data_dir,
            content_dir,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_or_default(&lookup, "SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_or_default(&lookup, "SENTRY_TRACES_SAMPLE_RATE", 1.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the session cookie should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Path of the Students page credential file.
    #[must_use]
    pub fn admin_credentials_path(&self) -> PathBuf {
        self.data_dir.join(files::PORTAL_ADMIN_CREDENTIALS)
    }

    /// Path of the HR template offered for download.
    #[must_use]
    pub fn template_path(&self) -> PathBuf {
        self.data_dir.join(files::HR_TEMPLATE)
    }
}

fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
