//! Static content page route handlers.
//!
//! Home, Projects, Finance and Contact are markdown pages with no data access.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use techealth_core::{MenuItem, PortalPage, menu};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub menu: Vec<MenuItem>,
    pub title: String,
    pub description: String,
    pub content_html: String,
}

/// Serve a content page by slug under the given menu entry.
fn serve_content_page(state: &AppState, page: PortalPage, slug: &str) -> Result<ContentPageTemplate> {
    let content = state
        .content()
        .get_page(slug)
        .ok_or_else(|| AppError::NotFound(format!("page '{slug}'")))?;

    Ok(ContentPageTemplate {
        menu: menu(page),
        title: content.meta.title.clone(),
        description: content.meta.description.clone().unwrap_or_default(),
        content_html: content.content_html.clone(),
    })
}

/// Display the Home page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<ContentPageTemplate> {
    serve_content_page(&state, PortalPage::Home, "home")
}

/// Display the Projects page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state))]
pub async fn projects(State(state): State<AppState>) -> Result<ContentPageTemplate> {
    serve_content_page(&state, PortalPage::Projects, "projects")
}

/// Display the Finance page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state))]
pub async fn finance(State(state): State<AppState>) -> Result<ContentPageTemplate> {
    serve_content_page(&state, PortalPage::Finance, "finance")
}

/// Display the Contact page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state))]
pub async fn contact(State(state): State<AppState>) -> Result<ContentPageTemplate> {
    serve_content_page(&state, PortalPage::Contact, "contact")
}

/// Create the pages routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/projects", get(projects))
        .route("/finance", get(finance))
        .route("/contact", get(contact))
}
