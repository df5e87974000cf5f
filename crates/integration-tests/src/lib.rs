//! End-to-end tests for the TecHealth dashboards.
//!
//! Each test starts the real application router on an ephemeral port with
//! its own temporary data directory, then drives it over HTTP with a
//! cookie-keeping `reqwest` client, the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p techealth-integration-tests
//! ```

use std::path::Path;

use axum::Router;
use reqwest::Client;
use techealth_core::{Credential, ExerciseEntry};
use techealth_sheets::{CredentialSchema, CredentialStore, RecordStore, RecordTable, files};
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// A running application plus the client and data directory it uses.
///
/// The server task is aborted on drop.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub data_dir: TempDir,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A second client with its own, empty cookie jar.
    #[must_use]
    pub fn fresh_client() -> Client {
        browser()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

async fn serve(app: Router, data_dir: TempDir) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    TestServer {
        base_url: format!("http://{addr}"),
        client: browser(),
        data_dir,
        handle,
    }
}

/// Start the portal over `data_dir`, with the repository's markdown pages.
///
/// Seed credential files before calling this: they are read at startup.
pub async fn spawn_portal(data_dir: TempDir) -> TestServer {
    let data = data_dir.path().display().to_string();
    let content = concat!(env!("CARGO_MANIFEST_DIR"), "/../portal/content").to_string();
    let config = techealth_portal::config::PortalConfig::from_lookup(|key| match key {
        "PORTAL_DATA_DIR" => Some(data.clone()),
        "PORTAL_CONTENT_DIR" => Some(content.clone()),
        _ => None,
    })
    .expect("Invalid portal test config");
    let state = techealth_portal::state::AppState::new(config).expect("Failed to build portal state");

    serve(techealth_portal::app(state), data_dir).await
}

/// Start the clinic over `data_dir`. The home animation URL points nowhere.
///
/// Seed credential files before calling this: they are read at startup.
pub async fn spawn_clinic(data_dir: TempDir) -> TestServer {
    let data = data_dir.path().display().to_string();
    let config = techealth_clinic::config::ClinicConfig::from_lookup(|key| match key {
        "CLINIC_DATA_DIR" => Some(data.clone()),
        "CLINIC_LOTTIE_URL" => Some("http://127.0.0.1:9/animation.json".to_string()),
        _ => None,
    })
    .expect("Invalid clinic test config");
    let state = techealth_clinic::state::AppState::new(config).expect("Failed to build clinic state");

    serve(techealth_clinic::app(state), data_dir).await
}

/// Append credential rows to the conventional file for `schema`.
pub fn seed_credentials(dir: &Path, file_name: &str, schema: CredentialSchema, rows: &[(&str, &str)]) {
    let store = CredentialStore::new(dir.join(file_name), schema);
    for (identifier, secret) in rows {
        store
            .append(&Credential::new(*identifier, *secret))
            .expect("Failed to seed credentials");
    }
}

/// Write the exercise catalog from (body position, exercise) pairs.
pub fn seed_exercises(dir: &Path, pairs: &[(&str, &str)]) {
    let entries = pairs
        .iter()
        .map(|(body_position, exercise_name)| ExerciseEntry {
            body_position: (*body_position).to_string(),
            exercise_name: (*exercise_name).to_string(),
        })
        .collect();
    RecordStore::<ExerciseEntry>::new(dir.join(files::EXERCISES))
        .persist(&RecordTable::from_records(entries))
        .expect("Failed to seed exercise catalog");
}

/// A new empty data directory.
#[must_use]
pub fn data_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}
