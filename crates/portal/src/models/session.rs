//! Session keys.
//!
//! The only thing a portal session carries is its
//! [`AccessState`](techealth_core::AccessState).

/// Session keys for authentication data.
pub mod keys {
    /// Key for the session's access state.
    pub const ACCESS_STATE: &str = "access_state";
}
