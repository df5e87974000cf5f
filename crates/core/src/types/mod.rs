//! Core types for the TecHealth dashboards.
//!
//! This module provides type-safe wrappers for the records both dashboards
//! read and write.

pub mod credential;
pub mod id;
pub mod patient;
pub mod person;

pub use credential::Credential;
pub use id::*;
pub use patient::{ExerciseEntry, ExerciseOptions, PatientSession};
pub use person::{Client, PersonDetails, Professional, ProfessionalKind, ProfessionalKindError};
