//! View models shared by every clinic page.

use std::sync::Arc;

use techealth_core::{AccessState, ClinicPage, MenuItem, MenuPage, menu};

use crate::middleware::PageAccess;
use crate::models::LoginNotice;
use crate::state::AppState;

/// Shown by every gated page while the session is locked.
pub const LOGIN_REQUIRED: &str = "Por favor, inicia sesión para acceder a esta página.";

/// Sidebar: logo, login form (while locked) and the page menu.
#[derive(Debug, Clone)]
pub struct Sidebar {
    pub menu: Vec<MenuItem>,
    /// Path the login form returns to.
    pub current_path: &'static str,
    pub unlocked: bool,
    pub notice: Option<LoginNotice>,
    /// Set when `credentials.xlsx` was missing at startup.
    pub login_warning: Option<String>,
    pub logo: Option<Arc<str>>,
}

impl Sidebar {
    #[must_use]
    pub fn new(state: &AppState, page: ClinicPage, access: PageAccess) -> Self {
        Self {
            menu: menu(page),
            current_path: page.path(),
            unlocked: access.access == AccessState::Unlocked,
            notice: access.notice,
            login_warning: state
                .login_credentials()
                .warning
                .as_ref()
                .map(ToString::to_string),
            logo: state.logo(),
        }
    }
}
