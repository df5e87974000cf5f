//! Session data.
//!
//! A clinic session carries its [`AccessState`](techealth_core::AccessState)
//! and, right after a sidebar login attempt, a one-shot [`LoginNotice`].

use serde::{Deserialize, Serialize};

/// Session keys for authentication data.
pub mod keys {
    /// Key for the session's access state.
    pub const ACCESS_STATE: &str = "access_state";
    /// Key for the result of the last login attempt, removed once shown.
    pub const LOGIN_NOTICE: &str = "login_notice";
}

/// Outcome of a sidebar login, shown on the next page render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginNotice {
    Succeeded,
    Rejected,
}

impl LoginNotice {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Succeeded => "Login successful!",
            Self::Rejected => "Invalid email or password",
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}
