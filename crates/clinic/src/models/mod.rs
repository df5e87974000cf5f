//! Session-stored models.

pub mod session;

pub use session::{LoginNotice, keys as session_keys};
