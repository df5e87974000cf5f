//! Video page: live pose overlay from the camera.
//!
//! `POST /video/start` opens the camera and starts the capture loop on a
//! blocking thread; `GET /video/stream` serves its frames as MJPEG until the
//! loop ends. There is one camera per server, shared by all viewers.

use std::convert::Infallible;

use askama::Template;
use askama_web::WebTemplate;
use async_stream::stream;
use axum::{
    Router,
    body::{Body, Bytes},
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use techealth_core::{ClinicPage, Dispatch, MenuPage, dispatch};
use tracing::instrument;

use crate::camera::{CameraStatus, FrameReceiver, StartOutcome};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageAccess, RequireUnlocked};
use crate::routes::locked;
use crate::state::AppState;
use crate::views::Sidebar;

/// Shown when the camera cannot be opened.
pub const CAMERA_UNAVAILABLE: &str = "No se pudo abrir la cámara.";

/// Shown when the loop ended on a failed read.
pub const CAPTURE_FAILED: &str = "Error al capturar el frame de la cámara";

/// MJPEG part boundary.
const BOUNDARY: &str = "frame";

#[derive(Template, WebTemplate)]
#[template(path = "video.html")]
pub struct VideoTemplate {
    pub sidebar: Sidebar,
    pub running: bool,
    /// The previous loop is still releasing the camera.
    pub stopping: bool,
    /// Headline error, with the underlying cause in `detail`.
    pub error: Option<&'static str>,
    pub detail: Option<String>,
}

fn page(state: &AppState, access: PageAccess) -> VideoTemplate {
    let status = state.camera().status();
    let stopping = status == CameraStatus::Stopping;
    let (running, error, detail) = match status {
        CameraStatus::Idle | CameraStatus::Stopping => (false, None, None),
        CameraStatus::Running => (true, None, None),
        CameraStatus::Failed(detail) => (false, Some(CAPTURE_FAILED), Some(detail)),
    };
    VideoTemplate {
        sidebar: Sidebar::new(state, ClinicPage::Video, access),
        running,
        stopping,
        error,
        detail,
    }
}

/// Display the camera page.
#[instrument(skip(state, access))]
pub async fn show(State(state): State<AppState>, access: PageAccess) -> Response {
    match dispatch(ClinicPage::Video, access.access) {
        Dispatch::Locked(page) => locked(&state, page, access, StatusCode::OK),
        Dispatch::Render(_) => page(&state, access).into_response(),
    }
}

/// Open the camera and start the loop. An unavailable camera is reported
/// on the page and not retried.
#[instrument(skip(state, access))]
pub async fn start(State(state): State<AppState>, access: PageAccess) -> Response {
    if let Dispatch::Locked(page) = dispatch(ClinicPage::Video, access.access) {
        return locked(&state, page, access, StatusCode::UNAUTHORIZED);
    }

    match state.start_camera().await {
        Ok(StartOutcome::Started) => {
            add_breadcrumb("video", "Camera started");
            Redirect::to(ClinicPage::Video.path()).into_response()
        }
        Ok(StartOutcome::Busy) => Redirect::to(ClinicPage::Video.path()).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Camera unavailable");
            let mut template = page(&state, access);
            template.error = Some(CAMERA_UNAVAILABLE);
            template.detail = Some(e.to_string());
            (StatusCode::SERVICE_UNAVAILABLE, template).into_response()
        }
    }
}

/// Signal the loop to stop.
#[instrument(skip(state, access))]
pub async fn stop(State(state): State<AppState>, access: PageAccess) -> Response {
    if let Dispatch::Locked(page) = dispatch(ClinicPage::Video, access.access) {
        return locked(&state, page, access, StatusCode::UNAUTHORIZED);
    }

    if state.camera().stop() {
        add_breadcrumb("video", "Camera stopped");
    }
    Redirect::to(ClinicPage::Video.path()).into_response()
}

/// Stream the overlaid frames as `multipart/x-mixed-replace`.
///
/// # Errors
///
/// Returns 404 when no loop is running.
#[instrument(skip(state))]
pub async fn stream_frames(
    State(state): State<AppState>,
    _unlocked: RequireUnlocked,
) -> Result<Response> {
    let frames = state
        .camera()
        .subscribe()
        .ok_or_else(|| AppError::NotFound("camera is not running".to_string()))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                format!("multipart/x-mixed-replace; boundary={BOUNDARY}"),
            ),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        Body::from_stream(mjpeg_parts(frames)),
    )
        .into_response())
}

/// One multipart part per published frame; ends when the loop ends.
fn mjpeg_parts(
    mut frames: FrameReceiver,
) -> impl futures::Stream<Item = std::result::Result<Bytes, Infallible>> {
    stream! {
        // A frame already published is sent straight away.
        frames.mark_changed();
        while frames.changed().await.is_ok() {
            let frame = frames.borrow_and_update().clone();
            let Some(jpeg) = frame else {
                continue;
            };
            yield Ok(Bytes::from(format!(
                "--{BOUNDARY}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
                jpeg.len()
            )));
            yield Ok(jpeg);
            yield Ok(Bytes::from_static(b"\r\n"));
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show))
        .route("/start", post(start))
        .route("/stop", post(stop))
        .route("/stream", get(stream_frames))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::StreamExt;
    use tokio::sync::watch;

    use super::*;

    #[tokio::test]
    async fn test_mjpeg_parts_frame_each_jpeg() {
        let (tx, rx) = watch::channel(Some(Bytes::from_static(b"JPEG1")));
        let mut parts = Box::pin(mjpeg_parts(rx));

        let header = parts.next().await.unwrap().unwrap();
        assert_eq!(
            header,
            Bytes::from_static(b"--frame\r\nContent-Type: image/jpeg\r\nContent-Length: 5\r\n\r\n")
        );
        assert_eq!(parts.next().await.unwrap().unwrap(), Bytes::from_static(b"JPEG1"));
        assert_eq!(parts.next().await.unwrap().unwrap(), Bytes::from_static(b"\r\n"));

        drop(tx);
        assert!(parts.next().await.is_none());
    }
}
