//! Application state shared across handlers.

use std::path::PathBuf;
use std::sync::Arc;

use techealth_sheets::{CredentialSchema, CredentialStore, CredentialTable, Loaded, StoreError};

use crate::camera::{CameraError, CameraHub, NoopEstimator, StartOutcome, open_camera};
use crate::config::ClinicConfig;
use crate::db::Repositories;
use crate::services::{LottieClient, load_logo};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClinicConfig,
    repositories: Repositories,
    login_credentials: Loaded<CredentialTable>,
    patient_registry: Loaded<CredentialTable>,
    logo: Option<Arc<str>>,
    lottie: LottieClient,
    camera: CameraHub,
}

impl AppState {
    /// Create the application state.
    ///
    /// The two credential files and the logo are read once here and not
    /// re-read while the server runs. Record files are read per request.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a credential file exists but cannot be read.
    pub fn new(config: ClinicConfig) -> Result<Self, StoreError> {
        let login_credentials =
            CredentialStore::new(config.login_credentials_path(), CredentialSchema::CLINIC_LOGIN)
                .load()?;
        let patient_registry = CredentialStore::new(
            config.patient_registry_path(),
            CredentialSchema::PATIENT_REGISTRY,
        )
        .load()?;

        for loaded in [&login_credentials, &patient_registry] {
            if let Some(warning) = &loaded.warning {
                tracing::warn!(%warning, "Credential file missing");
            }
        }

        let logo = load_logo(&config.logo_path()).map(Arc::from);
        let lottie = LottieClient::new(config.lottie_url.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                repositories: Repositories::new(&config),
                config,
                login_credentials,
                patient_registry,
                logo,
                lottie,
                camera: CameraHub::new(),
            }),
        })
    }

    /// Get a reference to the clinic configuration.
    #[must_use]
    pub fn config(&self) -> &ClinicConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn repositories(&self) -> &Repositories {
        &self.inner.repositories
    }

    /// Sidebar login credentials (`credentials.xlsx`), with any load warning.
    #[must_use]
    pub fn login_credentials(&self) -> &Loaded<CredentialTable> {
        &self.inner.login_credentials
    }

    /// Patients allowed to view their sessions (`credenciales.xlsx`).
    #[must_use]
    pub fn patient_registry(&self) -> &Loaded<CredentialTable> {
        &self.inner.patient_registry
    }

    /// The logo as a `data:` URI, if it could be read at startup.
    #[must_use]
    pub fn logo(&self) -> Option<Arc<str>> {
        self.inner.logo.clone()
    }

    #[must_use]
    pub fn lottie(&self) -> &LottieClient {
        &self.inner.lottie
    }

    #[must_use]
    pub fn camera(&self) -> &CameraHub {
        &self.inner.camera
    }

    /// Open the configured camera and start the loop with the built-in
    /// estimator.
    ///
    /// # Errors
    ///
    /// Returns `CameraError::DeviceUnavailable` when no camera is configured
    /// or it cannot be opened.
    pub async fn start_camera(&self) -> Result<StartOutcome, CameraError> {
        let dir: Option<PathBuf> = self.inner.config.camera_dir.clone();
        self.inner
            .camera
            .start(move || open_camera(dir.as_deref()), Box::new(NoopEstimator))
            .await
    }
}
