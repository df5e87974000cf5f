//! TecHealth Core - Shared types library.
//!
//! This crate provides common types used across the TecHealth components:
//! - `portal` - Company dashboard (projects, HR analytics, students)
//! - `clinic` - Patient exercise dashboard (sessions, masters, video)
//! - `cli` - Command-line tools for credential and record files
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions: no file access, no
//! HTTP. Spreadsheet persistence lives in `techealth-sheets`.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, records and credentials
//! - [`nav`] - Menu pages and the access-gating state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod nav;
pub mod types;

pub use nav::{AccessState, ClinicPage, Dispatch, MenuItem, MenuPage, PortalPage, dispatch, menu};
pub use types::*;
