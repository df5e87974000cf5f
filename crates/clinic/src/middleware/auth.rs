//! Access-state extractors for the clinic.
//!
//! Every page except Home is gated. Pages take [`PageAccess`], which also
//! hands over the one-shot result of the last sidebar login. Endpoints that
//! return raw data rather than a page take [`RequireUnlocked`].

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use techealth_core::AccessState;
use tower_sessions::Session;

use crate::models::{LoginNotice, session_keys};

/// The session's access state plus any pending login notice.
///
/// Reading the notice removes it from the session, so it shows once.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageAccess {
    pub access: AccessState,
    pub notice: Option<LoginNotice>,
}

impl<S> FromRequestParts<S> for PageAccess
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self::default());
        };

        let access = session
            .get::<AccessState>(session_keys::ACCESS_STATE)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        let notice = session
            .remove::<LoginNotice>(session_keys::LOGIN_NOTICE)
            .await
            .ok()
            .flatten();

        Ok(Self { access, notice })
    }
}

/// Extractor that rejects locked sessions with 401.
#[derive(Debug, Clone, Copy)]
pub struct RequireUnlocked;

impl<S> FromRequestParts<S> for RequireUnlocked
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let unlocked = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<AccessState>(session_keys::ACCESS_STATE)
                .await
                .ok()
                .flatten()
                .is_some_and(AccessState::is_unlocked),
            None => false,
        };

        if unlocked {
            Ok(Self)
        } else {
            Err(StatusCode::UNAUTHORIZED.into_response())
        }
    }
}

/// Record a sidebar login attempt.
///
/// A match unlocks the session (cycling its id first); either way the
/// outcome is queued for the next page render.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn finish_login(
    session: &Session,
    matched: bool,
) -> Result<LoginNotice, tower_sessions::session::Error> {
    let notice = if matched {
        let current = session
            .get::<AccessState>(session_keys::ACCESS_STATE)
            .await?
            .unwrap_or_default();
        session.cycle_id().await?;
        session
            .insert(session_keys::ACCESS_STATE, current.unlock())
            .await?;
        LoginNotice::Succeeded
    } else {
        LoginNotice::Rejected
    };

    session.insert(session_keys::LOGIN_NOTICE, notice).await?;
    Ok(notice)
}
