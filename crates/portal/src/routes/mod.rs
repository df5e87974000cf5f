//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home (markdown)
//! GET  /projects               - Projects (markdown)
//! GET  /finance                - Finance (markdown)
//! GET  /contact                - Contact (markdown)
//! GET  /health                 - Health check
//!
//! # HR Analytics
//! GET  /hr-analytics           - Template download and upload form
//! GET  /hr-analytics/template  - Download template.xlsx
//! POST /hr-analytics/upload    - Upload .xlsx/.csv, render table and profile
//!
//! # Students (gated)
//! GET  /students               - Dashboard when unlocked, login form otherwise
//! POST /students/login         - Check admin_credentials.xlsx and unlock
//!
//! # Menu
//! GET  /select?page=<label>    - Resolve a menu label and redirect to its page
//! ```

pub mod hr_analytics;
pub mod pages;
pub mod select;
pub mod students;

use axum::Router;

use crate::state::AppState;

/// Create all routes for the portal.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(pages::router())
        .nest("/hr-analytics", hr_analytics::router())
        .nest("/students", students::router())
        .merge(select::router())
}
