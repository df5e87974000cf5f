//! View Data page: a patient's logged sessions.
//!
//! The (Nombre, DNI) pair must appear in `credenciales.xlsx` before any
//! session row is read.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use techealth_core::{ClinicPage, Dispatch, dispatch};
use techealth_sheets::TableView;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::PageAccess;
use crate::routes::locked;
use crate::state::AppState;
use crate::views::Sidebar;

/// The patient is not in the registry.
pub const INVALID_PATIENT: &str = "Datos incorrectos. Inténtalo de nuevo.";

/// The patient is registered but has no sessions.
pub const NO_SESSIONS: &str = "No se encontraron datos de este paciente.";

/// Patient lookup form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatientLookup {
    pub name: String,
    pub national_id: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "view_data.html")]
pub struct ViewDataTemplate {
    pub sidebar: Sidebar,
    /// Set when `credenciales.xlsx` was missing at startup.
    pub registry_warning: Option<String>,
    pub lookup: PatientLookup,
    pub error: Option<&'static str>,
    pub sessions: Option<TableView>,
}

fn page(state: &AppState, access: PageAccess, lookup: PatientLookup) -> ViewDataTemplate {
    ViewDataTemplate {
        sidebar: Sidebar::new(state, ClinicPage::ViewData, access),
        registry_warning: state
            .patient_registry()
            .warning
            .as_ref()
            .map(ToString::to_string),
        lookup,
        error: None,
        sessions: None,
    }
}

/// Display the lookup form.
#[instrument(skip(state, access))]
pub async fn show(State(state): State<AppState>, access: PageAccess) -> Response {
    match dispatch(ClinicPage::ViewData, access.access) {
        Dispatch::Locked(page) => locked(&state, page, access, StatusCode::OK),
        Dispatch::Render(_) => page(&state, access, PatientLookup::default()).into_response(),
    }
}

/// Validate the patient and list their sessions.
///
/// # Errors
///
/// Returns 500 if the session file cannot be read.
#[instrument(skip(state, access, lookup), fields(patient = %lookup.name))]
pub async fn lookup(
    State(state): State<AppState>,
    access: PageAccess,
    Form(lookup): Form<PatientLookup>,
) -> Result<Response> {
    if let Dispatch::Locked(page) = dispatch(ClinicPage::ViewData, access.access) {
        return Ok(locked(&state, page, access, StatusCode::UNAUTHORIZED));
    }

    let registered = state
        .patient_registry()
        .value
        .matches(&lookup.name, &lookup.national_id);

    let mut template = page(&state, access, lookup);
    if !registered {
        tracing::info!("Patient not in registry");
        template.error = Some(INVALID_PATIENT);
        return Ok(template.into_response());
    }

    let sessions = state
        .repositories()
        .sessions
        .sessions_for(&template.lookup.name, &template.lookup.national_id)
        .await?;

    if sessions.is_empty() {
        template.error = Some(NO_SESSIONS);
    } else {
        template.sessions = Some(TableView::from(&sessions));
    }
    Ok(template.into_response())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(show).post(lookup))
}
