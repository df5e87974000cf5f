//! Home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use techealth_core::ClinicPage;
use tracing::instrument;

use crate::filters;
use crate::middleware::PageAccess;
use crate::state::AppState;
use crate::views::Sidebar;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub sidebar: Sidebar,
    /// Lottie animation JSON, if it could be fetched.
    pub animation: Option<String>,
}

/// Display the home page. Public; no login needed.
#[instrument(skip(state, access))]
pub async fn show(State(state): State<AppState>, access: PageAccess) -> HomeTemplate {
    let animation = state
        .lottie()
        .animation()
        .await
        .map(|json| json.to_string());

    HomeTemplate {
        sidebar: Sidebar::new(&state, ClinicPage::Home, access),
        animation,
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(show))
}
