//! Menu selection.
//!
//! The sidebar links straight to page paths; `/select` resolves a menu label
//! (as the original option menu submitted it) to the same page.

use axum::{
    Router,
    extract::Query,
    response::Redirect,
    routing::get,
};
use serde::Deserialize;
use techealth_core::{MenuPage, PortalPage};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectQuery {
    pub page: String,
}

/// Redirect to the page with the selected label.
///
/// # Errors
///
/// Returns 404 for an unknown label.
#[instrument]
pub async fn select(Query(query): Query<SelectQuery>) -> Result<Redirect> {
    PortalPage::from_label(&query.page)
        .map(|page| Redirect::to(page.path()))
        .ok_or_else(|| AppError::NotFound(format!("page '{}'", query.page)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/select", get(select))
}
