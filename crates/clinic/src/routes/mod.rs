//! HTTP route handlers for the clinic.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home (public)
//! POST /auth/login              - Sidebar login
//! GET  /data                    - Session form
//! POST /data                    - Log a session
//! GET  /view-data               - Patient lookup form
//! POST /view-data               - Show a patient's sessions
//! GET  /masters                 - Professionals and clients (with ?professional_id= / ?client_id= lookups)
//! POST /masters/professionals   - Register a professional
//! POST /masters/clients         - Register a client
//! GET  /analysis                - Session table profile
//! GET  /video                   - Camera page
//! POST /video/start             - Open the camera
//! POST /video/stop              - Close the camera
//! GET  /video/stream            - MJPEG stream of the overlaid frames
//! GET  /select?page=<label>     - Menu selection by label
//! ```
//!
//! Every page except Home is gated. While locked, a gated page renders
//! [`LockedTemplate`] and touches no data.

pub mod analysis;
pub mod auth;
pub mod data;
pub mod home;
pub mod masters;
pub mod select;
pub mod video;
pub mod view_data;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use techealth_core::ClinicPage;

use crate::filters;
use crate::middleware::PageAccess;
use crate::state::AppState;
use crate::views::{LOGIN_REQUIRED, Sidebar};

/// Warning shown in place of a gated page.
#[derive(Template, WebTemplate)]
#[template(path = "locked.html")]
pub struct LockedTemplate {
    pub sidebar: Sidebar,
    pub message: &'static str,
}

/// Render the locked view of `page`.
///
/// Form posts against a locked page get 401; plain page views get 200 like
/// any other render.
pub(crate) fn locked(
    state: &AppState,
    page: ClinicPage,
    access: PageAccess,
    status: StatusCode,
) -> Response {
    let template = LockedTemplate {
        sidebar: Sidebar::new(state, page, access),
        message: LOGIN_REQUIRED,
    };
    (status, template).into_response()
}

/// Build the complete clinic router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(home::router())
        .nest("/auth", auth::router())
        .nest("/data", data::router())
        .nest("/view-data", view_data::router())
        .nest("/masters", masters::router())
        .nest("/analysis", analysis::router())
        .nest("/video", video::router())
        .merge(select::router())
}
