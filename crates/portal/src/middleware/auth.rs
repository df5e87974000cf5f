//! Access-state extractor.
//!
//! Pages read the session's [`AccessState`] through [`PageAccess`] and route
//! themselves with [`techealth_core::dispatch`]. A request without a session
//! (or with an unreadable one) is treated as locked.

use axum::{extract::FromRequestParts, http::request::Parts};
use techealth_core::AccessState;
use tower_sessions::Session;

use crate::models::session_keys;

/// The current session's access state.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(PageAccess(access): PageAccess) -> impl IntoResponse {
///     match dispatch(PortalPage::Students, access) {
///         Dispatch::Render(_) => "dashboard",
///         Dispatch::Locked(_) => "login form",
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PageAccess(pub AccessState);

impl<S> FromRequestParts<S> for PageAccess
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let access = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<AccessState>(session_keys::ACCESS_STATE)
                .await
                .ok()
                .flatten()
                .unwrap_or_default(),
            None => AccessState::default(),
        };

        Ok(Self(access))
    }
}

/// Move the session to `Unlocked` after a credential match.
///
/// The session id is cycled so a pre-login cookie cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn unlock_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    let current = session
        .get::<AccessState>(session_keys::ACCESS_STATE)
        .await?
        .unwrap_or_default();
    session.cycle_id().await?;
    session
        .insert(session_keys::ACCESS_STATE, current.unlock())
        .await
}
