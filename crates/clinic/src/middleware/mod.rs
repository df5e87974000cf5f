//! HTTP middleware stack for the clinic.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with in-memory store)
//!
//! Page gating is not a layer: handlers read [`PageAccess`] and dispatch on it,
//! so a locked page still renders its warning with the sidebar login.

pub mod auth;
pub mod session;

pub use auth::{PageAccess, RequireUnlocked, finish_login};
pub use session::create_session_layer;
