//! Sidebar login.
//!
//! The login form sits in the sidebar of every page. It posts here with the
//! page it came from; the outcome is shown on that page after the redirect.

use axum::{
    Form, Router,
    extract::State,
    response::Redirect,
    routing::post,
};
use serde::Deserialize;
use techealth_core::{ClinicPage, MenuPage};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::finish_login;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Path of the page the form was submitted from.
    #[serde(default)]
    pub next: String,
}

/// Check the credentials against `credentials.xlsx` and go back to the page.
///
/// # Errors
///
/// Returns 500 if the session cannot be updated.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let matched = state
        .login_credentials()
        .value
        .matches(&form.email, &form.password);

    finish_login(&session, matched).await?;
    if matched {
        add_breadcrumb("auth", "Clinic login succeeded");
        tracing::info!("Clinic session unlocked");
    } else {
        tracing::info!("Clinic login rejected");
    }

    Ok(Redirect::to(return_path(&form.next)))
}

/// Only menu pages are valid return targets.
fn return_path(next: &str) -> &'static str {
    ClinicPage::from_path(next).map_or_else(|| ClinicPage::Home.path(), ClinicPage::path)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_path_is_a_menu_page() {
        assert_eq!(return_path("/masters"), "/masters");
        assert_eq!(return_path("https://evil.example"), "/");
        assert_eq!(return_path(""), "/");
    }
}
