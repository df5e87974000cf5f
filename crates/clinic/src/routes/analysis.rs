//! Analysis page: profile of the logged sessions.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use techealth_core::{ClinicPage, Dispatch, dispatch};
use techealth_sheets::{ProfileView, TableView, profile};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::PageAccess;
use crate::routes::locked;
use crate::state::AppState;
use crate::views::Sidebar;

/// Shown when no session has been logged yet.
pub const NO_DATA: &str = "No hay datos disponibles para su análisis.";

#[derive(Template, WebTemplate)]
#[template(path = "analysis.html")]
pub struct AnalysisTemplate {
    pub sidebar: Sidebar,
    pub warning: Option<&'static str>,
    pub profile: Option<ProfileView>,
    pub table: Option<TableView>,
}

/// Profile every column of `datos_pacientes.xlsx`.
///
/// # Errors
///
/// Returns 500 if the session file cannot be read.
#[instrument(skip(state, access))]
pub async fn show(State(state): State<AppState>, access: PageAccess) -> Result<Response> {
    if let Dispatch::Locked(page) = dispatch(ClinicPage::Analysis, access.access) {
        return Ok(locked(&state, page, access, StatusCode::OK));
    }

    let sessions = state.repositories().sessions.load().await?.value;
    let mut page = AnalysisTemplate {
        sidebar: Sidebar::new(&state, ClinicPage::Analysis, access),
        warning: None,
        profile: None,
        table: None,
    };

    if sessions.is_empty() {
        page.warning = Some(NO_DATA);
    } else {
        let table = sessions.to_table();
        page.profile = Some(ProfileView::from(&profile(&table)));
        page.table = Some(TableView::from(&table));
    }
    Ok(page.into_response())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(show))
}
