//! Students route handlers.
//!
//! The Students page is the portal's only gated page. While the session is
//! locked it shows a login form; a username/password pair that exactly
//! matches a row of `admin_credentials.xlsx` unlocks the session for good.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use techealth_core::{Dispatch, MenuItem, MenuPage, PortalPage, dispatch, menu};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageAccess, unlock_session};
use crate::state::AppState;

/// Shown when no credential row matches.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Login form shown while the session is locked.
#[derive(Template, WebTemplate)]
#[template(path = "students/login.html")]
pub struct StudentsLoginTemplate {
    pub menu: Vec<MenuItem>,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub username: String,
}

/// Dashboard shown once the session is unlocked.
#[derive(Template, WebTemplate)]
#[template(path = "students/dashboard.html")]
pub struct StudentsDashboardTemplate {
    pub menu: Vec<MenuItem>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn login_page(state: &AppState, error: Option<String>, username: String) -> StudentsLoginTemplate {
    StudentsLoginTemplate {
        menu: menu(PortalPage::Students),
        warning: state
            .admin_credentials()
            .warning
            .as_ref()
            .map(ToString::to_string),
        error,
        username,
    }
}

/// Display the Students page for the current access state.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, PageAccess(access): PageAccess) -> Response {
    match dispatch(PortalPage::Students, access) {
        Dispatch::Render(page) => StudentsDashboardTemplate { menu: menu(page) }.into_response(),
        Dispatch::Locked(_) => login_page(&state, None, String::new()).into_response(),
    }
}

/// Check the submitted credentials and unlock the session on a match.
///
/// # Errors
///
/// Returns 500 if the session cannot be updated.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if state
        .admin_credentials()
        .value
        .matches(&form.username, &form.password)
    {
        unlock_session(&session).await?;
        add_breadcrumb("auth", "Students login succeeded");
        tracing::info!("Students page unlocked");
        return Ok(Redirect::to(PortalPage::Students.path()).into_response());
    }

    tracing::info!("Students login rejected");
    let page = login_page(&state, Some(INVALID_CREDENTIALS.to_string()), form.username);
    Ok((StatusCode::UNAUTHORIZED, page).into_response())
}

/// Create the Students routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show))
        .route("/login", post(login))
}
