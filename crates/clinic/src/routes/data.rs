//! Data page: log one exercise session for a patient.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use techealth_core::{ClinicPage, Dispatch, ExerciseOptions, dispatch};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::forms::PatientSessionForm;
use crate::middleware::PageAccess;
use crate::routes::locked;
use crate::state::AppState;
use crate::views::Sidebar;

/// Shown after a session is written.
pub const SAVED: &str = "Datos guardados correctamente.";

/// Session form page.
#[derive(Template, WebTemplate)]
#[template(path = "data.html")]
pub struct DataTemplate {
    pub sidebar: Sidebar,
    pub options: ExerciseOptions,
    /// Set when the exercise catalog file is missing.
    pub catalog_warning: Option<String>,
    pub form: PatientSessionForm,
    pub error: Option<String>,
    pub success: Option<&'static str>,
}

/// Display the empty session form.
///
/// # Errors
///
/// Returns 500 if the exercise catalog cannot be read.
#[instrument(skip(state, access))]
pub async fn show(State(state): State<AppState>, access: PageAccess) -> Result<Response> {
    if let Dispatch::Locked(page) = dispatch(ClinicPage::Data, access.access) {
        return Ok(locked(&state, page, access, StatusCode::OK));
    }

    let catalog = state.repositories().exercises.options().await?;
    Ok(DataTemplate {
        sidebar: Sidebar::new(&state, ClinicPage::Data, access),
        options: catalog.value,
        catalog_warning: catalog.warning.map(|w| w.to_string()),
        form: PatientSessionForm::default(),
        error: None,
        success: None,
    }
    .into_response())
}

/// Bind the form into a session dated today and append it.
///
/// Nothing is written when binding fails; the form comes back with the
/// message and the values as typed.
///
/// # Errors
///
/// Returns 500 if the catalog or the session file cannot be read or written.
#[instrument(skip(state, access, form), fields(patient = %form.name))]
pub async fn submit(
    State(state): State<AppState>,
    access: PageAccess,
    Form(form): Form<PatientSessionForm>,
) -> Result<Response> {
    if let Dispatch::Locked(page) = dispatch(ClinicPage::Data, access.access) {
        return Ok(locked(&state, page, access, StatusCode::UNAUTHORIZED));
    }

    let catalog = state.repositories().exercises.options().await?;
    let today = chrono::Local::now().date_naive();

    let bound = form.clone().bind(&catalog.value, today);

    let mut page = DataTemplate {
        sidebar: Sidebar::new(&state, ClinicPage::Data, access),
        options: catalog.value,
        catalog_warning: catalog.warning.map(|w| w.to_string()),
        form: PatientSessionForm::default(),
        error: None,
        success: None,
    };

    match bound {
        Ok(session) => {
            state.repositories().sessions.insert(session).await?;
            add_breadcrumb("data", "Patient session saved");
            tracing::info!("Patient session saved");
            page.success = Some(SAVED);
            Ok(page.into_response())
        }
        Err(e) => {
            tracing::info!(error = %e, "Patient session rejected");
            page.form = form;
            page.error = Some(e.to_string());
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(show).post(submit))
}
