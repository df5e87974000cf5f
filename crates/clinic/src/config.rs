//! Clinic configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CLINIC_HOST` - Bind address (default: 127.0.0.1)
//! - `CLINIC_PORT` - Listen port (default: 8502)
//! - `CLINIC_BASE_URL` - Public URL (default: `http://localhost:<port>`)
//! - `CLINIC_DATA_DIR` - Directory holding the record, credential and logo files (default: .)
//! - `CLINIC_LOTTIE_URL` - Animation shown on the home page
//! - `CLINIC_CAMERA_DIR` - Image-sequence directory used as the camera; unset means no camera
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sample rates (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use techealth_sheets::files;
use thiserror::Error;

/// Animation fetched for the home page when `CLINIC_LOTTIE_URL` is unset.
pub const DEFAULT_LOTTIE_URL: &str =
    "https://assets5.lottiefiles.com/packages/lf20_0yfsb3a1.json";

/// Logo file inside the data directory.
pub const LOGO_FILE: &str = "TecHealth_Logo.png";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Clinic application configuration.
#[derive(Debug, Clone)]
pub struct ClinicConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL; an `https` URL makes the session cookie secure
    pub base_url: String,
    /// Directory containing the `.xlsx` files and the logo
    pub data_dir: PathBuf,
    pub lottie_url: String,
    /// Frames for the video page, read in file-name order
    pub camera_dir: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

impl ClinicConfig {
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
        let host = parse_or_default(&lookup, "CLINIC_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or_default(&lookup, "CLINIC_PORT", 8502)?;
        let base_url = lookup("CLINIC_BASE_URL").unwrap_or_else(|| format!("http://localhost:{port}"));
        let data_dir = lookup("CLINIC_DATA_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from);
        let lottie_url = lookup("CLINIC_LOTTIE_URL").unwrap_or_else(|| DEFAULT_LOTTIE_URL.to_string());
        let camera_dir = lookup("CLINIC_CAMERA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            base_url,
            data_dir,
            lottie_url,
            camera_dir,
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

    /// Path of a data file by its conventional name.
    #[must_use]
    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Path of the sidebar login credential file.
    #[must_use]
    pub fn login_credentials_path(&self) -> PathBuf {
        self.data_file(files::CLINIC_CREDENTIALS)
    }

    /// Path of the patient registry used by View Data.
    #[must_use]
    pub fn patient_registry_path(&self) -> PathBuf {
        self.data_file(files::PATIENT_REGISTRY)
    }

    #[must_use]
    pub fn logo_path(&self) -> PathBuf {
        self.data_file(LOGO_FILE)
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<ClinicConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClinicConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8502");
        assert_eq!(config.lottie_url, DEFAULT_LOTTIE_URL);
        assert!(config.camera_dir.is_none());
        assert_eq!(
            config.login_credentials_path(),
            PathBuf::from("./credentials.xlsx")
        );
        assert_eq!(
            config.patient_registry_path(),
            PathBuf::from("./credenciales.xlsx")
        );
    }

    #[test]
    fn test_camera_dir_blank_means_no_camera() {
        let config = config_from(&[("CLINIC_CAMERA_DIR", "  ")]).unwrap();
        assert!(config.camera_dir.is_none());

        let config = config_from(&[("CLINIC_CAMERA_DIR", "/dev/frames")]).unwrap();
        assert_eq!(config.camera_dir, Some(PathBuf::from("/dev/frames")));
    }

    #[test]
    fn test_invalid_sample_rate() {
        let err = config_from(&[("SENTRY_SAMPLE_RATE", "often")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SENTRY_SAMPLE_RATE"));
    }
}
