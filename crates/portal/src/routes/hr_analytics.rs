//! HR Analytics route handlers.
//!
//! Offers the `template.xlsx` download and accepts a filled-in `.xlsx` or
//! `.csv` upload, which is shown as a table plus a per-column profile. The
//! upload only lives for the request.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use techealth_core::{MenuItem, PortalPage, menu};
use techealth_sheets::{
    ProfileView, StoreWarning, TableView, UploadError, files, parse_upload, profile,
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A parsed upload, ready to render.
pub struct UploadView {
    pub file_name: String,
    pub table: TableView,
    pub profile: ProfileView,
}

/// HR Analytics page template.
#[derive(Template, WebTemplate)]
#[template(path = "hr_analytics.html")]
pub struct HrAnalyticsTemplate {
    pub menu: Vec<MenuItem>,
    pub template_available: bool,
    pub error: Option<String>,
    pub upload: Option<UploadView>,
}

impl HrAnalyticsTemplate {
    fn new(state: &AppState) -> Self {
        Self {
            menu: menu(PortalPage::HrAnalytics),
            template_available: state.config().template_path().exists(),
            error: None,
            upload: None,
        }
    }
}

/// Display the HR Analytics page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> HrAnalyticsTemplate {
    HrAnalyticsTemplate::new(&state)
}

/// Download the HR template workbook.
///
/// # Errors
///
/// Returns 500 if the file exists but cannot be read. A missing file renders
/// the page with an error message and a 404 status.
#[instrument(skip(state))]
pub async fn download_template(State(state): State<AppState>) -> Result<Response> {
    let path = state.config().template_path();

    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok((
            [
                (header::CONTENT_TYPE, XLSX_MIME.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", files::HR_TEMPLATE),
                ),
            ],
            bytes,
        )
            .into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let mut page = HrAnalyticsTemplate::new(&state);
            page.error = Some(StoreWarning::missing_file(&path).to_string());
            Ok((StatusCode::NOT_FOUND, page).into_response())
        }
        Err(e) => Err(AppError::Internal(format!("reading {}: {e}", path.display()))),
    }
}

/// Accept an upload and render it.
///
/// # Errors
///
/// Returns 400 if the multipart body is malformed. Unparseable files are
/// shown on the page with a 422 status.
#[instrument(skip(state, multipart))]
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Result<Response> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file = Some((file_name, bytes));
        }
    }

    let mut page = HrAnalyticsTemplate::new(&state);

    let Some((file_name, bytes)) = file.filter(|(name, _)| !name.is_empty()) else {
        page.error = Some("Choose a file to upload.".to_string());
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    };

    let name = file_name.clone();
    let parsed = tokio::task::spawn_blocking(move || parse_upload(&name, &bytes))
        .await
        .map_err(|e| AppError::Internal(format!("upload task failed: {e}")))?;

    match parsed {
        Ok(table) => {
            tracing::info!(file_name, rows = table.len(), "HR upload analysed");
            page.upload = Some(UploadView {
                table: TableView::from(&table),
                profile: ProfileView::from(&profile(&table)),
                file_name,
            });
            Ok(page.into_response())
        }
        Err(e) => {
            tracing::info!(file_name, error = %e, "HR upload rejected");
            page.error = Some(upload_error_message(&e));
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

fn upload_error_message(error: &UploadError) -> String {
    format!("Error loading or processing the file: {error}")
}

/// Create the HR Analytics routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show))
        .route("/template", get(download_template))
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}
