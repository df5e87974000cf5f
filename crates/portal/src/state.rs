//! Application state shared across handlers.

use std::sync::Arc;

use techealth_sheets::{CredentialSchema, CredentialStore, CredentialTable, Loaded, StoreError};

use crate::config::PortalConfig;
use crate::content::{ContentError, ContentStore};

/// Errors building the application state at startup.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("content error: {0}")]
    Content(#[from] ContentError),
    #[error("credential file error: {0}")]
    Credentials(#[from] StoreError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    content: ContentStore,
    admin_credentials: Loaded<CredentialTable>,
}

impl AppState {
    /// Create the application state.
    ///
    /// Loads content pages and the Students credential file once; the
    /// credentials are not re-read while the server runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the content directory cannot be read or the
    /// credential file exists but is unreadable.
    pub fn new(config: PortalConfig) -> Result<Self, StateError> {
        let content = ContentStore::load(&config.content_dir)?;
        let admin_credentials = CredentialStore::new(
            config.admin_credentials_path(),
            CredentialSchema::PORTAL_ADMIN,
        )
        .load()?;

        if let Some(warning) = &admin_credentials.warning {
            tracing::warn!(%warning, "Students login has no credentials");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                content,
                admin_credentials,
            }),
        })
    }

    /// Get a reference to the portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// Credentials accepted by the Students login, with any load warning.
    #[must_use]
    pub fn admin_credentials(&self) -> &Loaded<CredentialTable> {
        &self.inner.admin_credentials
    }
}
