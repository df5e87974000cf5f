//! Patient exercise sessions and the exercise catalog.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One logged exercise session for a patient.
///
/// Sessions are append-only: created on form submission, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSession {
    /// Day the session was recorded.
    pub date: NaiveDate,
    /// Patient name, as typed.
    pub name: String,
    /// Patient national id (DNI).
    pub national_id: String,
    /// Body position from the exercise catalog.
    pub body_position: String,
    /// Exercise name from the exercise catalog.
    pub exercise_name: String,
    pub repetitions: u32,
    pub duration_minutes: u32,
    pub weight_kg: f64,
}

impl PatientSession {
    /// True when the session belongs to the patient with this exact name and DNI.
    #[must_use]
    pub fn belongs_to(&self, name: &str, national_id: &str) -> bool {
        self.name == name && self.national_id == national_id
    }
}

/// A valid (body position, exercise) pair from the reference catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub body_position: String,
    pub exercise_name: String,
}

/// Selection lists derived from the exercise catalog.
///
/// Each list holds the distinct non-empty values in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseOptions {
    pub body_positions: Vec<String>,
    pub exercise_names: Vec<String>,
}

impl ExerciseOptions {
    /// Build the option lists from catalog rows.
    #[must_use]
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a ExerciseEntry>) -> Self {
        let mut options = Self::default();
        for entry in entries {
            push_unique(&mut options.body_positions, &entry.body_position);
            push_unique(&mut options.exercise_names, &entry.exercise_name);
        }
        options
    }

    /// True when no selectable values exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body_positions.is_empty() || self.exercise_names.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(position: &str, exercise: &str) -> ExerciseEntry {
        ExerciseEntry {
            body_position: position.to_string(),
            exercise_name: exercise.to_string(),
        }
    }

    #[test]
    fn test_options_are_unique_and_ordered() {
        let entries = vec![
            entry("Tumbado", "Puente"),
            entry("De pie", "Sentadilla"),
            entry("Tumbado", "Plancha"),
            entry("", "Sentadilla"),
        ];
        let options = ExerciseOptions::from_entries(&entries);
        assert_eq!(options.body_positions, vec!["Tumbado", "De pie"]);
        assert_eq!(options.exercise_names, vec!["Puente", "Sentadilla", "Plancha"]);
    }

    #[test]
    fn test_empty_catalog() {
        let options = ExerciseOptions::from_entries(&[]);
        assert!(options.is_empty());
    }

    #[test]
    fn test_belongs_to_requires_both_fields() {
        let session = PatientSession {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default(),
            name: "Ana".to_string(),
            national_id: "123A".to_string(),
            body_position: "De pie".to_string(),
            exercise_name: "Sentadilla".to_string(),
            repetitions: 10,
            duration_minutes: 5,
            weight_kg: 2.5,
        };
        assert!(session.belongs_to("Ana", "123A"));
        assert!(!session.belongs_to("Ana", "999Z"));
        assert!(!session.belongs_to("ana", "123A"));
    }
}
