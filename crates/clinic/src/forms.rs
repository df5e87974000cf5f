//! Form binding.
//!
//! Each form deserializes the submitted fields as text, so a bad value can be
//! reported next to the form instead of rejecting the whole request. `bind`
//! turns the fields into exactly one new record, or a [`FormError`] and no
//! record.

use chrono::NaiveDate;
use serde::Deserialize;
use techealth_core::{
    Client, ClientId, ExerciseOptions, PatientSession, PersonDetails, Professional,
    ProfessionalId, ProfessionalKind,
};
use thiserror::Error;

/// A submitted value that cannot become part of a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("'{field}' debe ser un número entero mayor o igual que 0.")]
    InvalidCount { field: &'static str },

    #[error("'Kilos' debe ser un número mayor o igual que 0.")]
    InvalidWeight,

    #[error("No hay ejercicios en el catálogo.")]
    EmptyCatalog,

    #[error("'{value}' no está en el catálogo de ejercicios ({field}).")]
    NotInCatalog { field: &'static str, value: String },

    #[error("Tipo de profesional no válido: '{0}'.")]
    InvalidKind(String),
}

/// The Data page's session form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatientSessionForm {
    pub name: String,
    pub national_id: String,
    pub body_position: String,
    pub exercise_name: String,
    pub repetitions: String,
    pub duration_minutes: String,
    pub weight_kg: String,
}

impl PatientSessionForm {
    /// Build the session logged on `date`.
    ///
    /// Blank numeric fields count as 0. Body position and exercise must both
    /// come from the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails validation.
    pub fn bind(
        self,
        catalog: &ExerciseOptions,
        date: NaiveDate,
    ) -> Result<PatientSession, FormError> {
        if catalog.is_empty() {
            return Err(FormError::EmptyCatalog);
        }
        let body_position = catalog_value(
            &catalog.body_positions,
            "Posición del Cuerpo",
            self.body_position,
        )?;
        let exercise_name = catalog_value(
            &catalog.exercise_names,
            "Nombre del ejercicio",
            self.exercise_name,
        )?;

        Ok(PatientSession {
            date,
            name: self.name,
            national_id: self.national_id,
            body_position,
            exercise_name,
            repetitions: parse_count(&self.repetitions, "Número de Repeticiones")?,
            duration_minutes: parse_count(&self.duration_minutes, "Tiempo (min)")?,
            weight_kg: parse_weight(&self.weight_kg)?,
        })
    }
}

fn catalog_value(
    allowed: &[String],
    field: &'static str,
    value: String,
) -> Result<String, FormError> {
    if allowed.contains(&value) {
        Ok(value)
    } else {
        Err(FormError::NotInCatalog { field, value })
    }
}

fn parse_count(value: &str, field: &'static str) -> Result<u32, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse()
        .map_err(|_| FormError::InvalidCount { field })
}

fn parse_weight(value: &str) -> Result<f64, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    match value.parse::<f64>() {
        Ok(kilos) if kilos.is_finite() && kilos >= 0.0 => Ok(kilos),
        _ => Err(FormError::InvalidWeight),
    }
}

/// Contact fields shared by the registration forms.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonForm {
    pub name: String,
    pub surname: String,
    pub address: String,
    pub national_id: String,
    pub phone: String,
    pub municipality: String,
    pub postal_code: String,
}

impl From<PersonForm> for PersonDetails {
    fn from(form: PersonForm) -> Self {
        Self {
            name: form.name,
            surname: form.surname,
            address: form.address,
            national_id: form.national_id,
            phone: form.phone,
            municipality: form.municipality,
            postal_code: form.postal_code,
        }
    }
}

/// Masters page professional registration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfessionalForm {
    #[serde(flatten)]
    pub person: PersonForm,
    pub kind: String,
}

impl ProfessionalForm {
    /// Parse the professional kind ahead of id assignment.
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidKind` unless the kind is one of the three labels.
    pub fn kind(&self) -> Result<ProfessionalKind, FormError> {
        self.kind
            .parse()
            .map_err(|_| FormError::InvalidKind(self.kind.clone()))
    }

    /// Build the professional registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidKind` unless the kind is one of the three labels.
    pub fn bind(self, id: ProfessionalId) -> Result<Professional, FormError> {
        let kind = self.kind()?;
        Ok(Professional {
            id,
            details: self.person.into(),
            kind,
        })
    }
}

/// Masters page client registration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientForm {
    #[serde(flatten)]
    pub person: PersonForm,
}

impl ClientForm {
    /// Build the client registered under `id`.
    #[must_use]
    pub fn bind(self, id: ClientId) -> Client {
        Client {
            id,
            details: self.person.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use techealth_core::ExerciseEntry;

    use super::*;

    fn catalog() -> ExerciseOptions {
        ExerciseOptions::from_entries(&[
            ExerciseEntry {
                body_position: "De pie".to_string(),
                exercise_name: "Sentadilla".to_string(),
            },
            ExerciseEntry {
                body_position: "Tumbado".to_string(),
                exercise_name: "Puente".to_string(),
            },
        ])
    }

    fn session_form() -> PatientSessionForm {
        PatientSessionForm {
            name: "Ana".to_string(),
            national_id: "123A".to_string(),
            body_position: "De pie".to_string(),
            exercise_name: "Puente".to_string(),
            repetitions: "12".to_string(),
            duration_minutes: " 5 ".to_string(),
            weight_kg: "2.5".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_session_binds_all_fields() {
        let session = session_form().bind(&catalog(), today()).unwrap();
        assert_eq!(session.date, today());
        assert_eq!(session.name, "Ana");
        assert_eq!(session.repetitions, 12);
        assert_eq!(session.duration_minutes, 5);
        assert!((session.weight_kg - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_blank_numbers_default_to_zero() {
        let form = PatientSessionForm {
            repetitions: String::new(),
            duration_minutes: String::new(),
            weight_kg: String::new(),
            ..session_form()
        };
        let session = form.bind(&catalog(), today()).unwrap();
        assert_eq!(session.repetitions, 0);
        assert!(session.weight_kg.abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_and_non_numeric_are_rejected() {
        let form = PatientSessionForm {
            repetitions: "-1".to_string(),
            ..session_form()
        };
        assert_eq!(
            form.bind(&catalog(), today()).unwrap_err(),
            FormError::InvalidCount {
                field: "Número de Repeticiones"
            }
        );

        for weight in ["-0.5", "NaN", "inf", "mucho"] {
            let form = PatientSessionForm {
                weight_kg: weight.to_string(),
                ..session_form()
            };
            assert_eq!(
                form.bind(&catalog(), today()).unwrap_err(),
                FormError::InvalidWeight,
                "weight {weight}"
            );
        }
    }

    #[test]
    fn test_values_outside_catalog_are_rejected() {
        let form = PatientSessionForm {
            exercise_name: "Burpee".to_string(),
            ..session_form()
        };
        assert!(matches!(
            form.bind(&catalog(), today()).unwrap_err(),
            FormError::NotInCatalog { value, .. } if value == "Burpee"
        ));

        let err = session_form()
            .bind(&ExerciseOptions::default(), today())
            .unwrap_err();
        assert_eq!(err, FormError::EmptyCatalog);
    }

    #[test]
    fn test_professional_kind_must_be_known() {
        let form = ProfessionalForm {
            person: PersonForm {
                name: "Ana".to_string(),
                ..PersonForm::default()
            },
            kind: "Recuperador".to_string(),
        };
        let professional = form.clone().bind(ProfessionalId::new(1)).unwrap();
        assert_eq!(professional.kind, ProfessionalKind::Rehabilitator);
        assert_eq!(professional.details.name, "Ana");

        let form = ProfessionalForm {
            kind: "Cirujano".to_string(),
            ..form
        };
        assert_eq!(
            form.bind(ProfessionalId::new(2)).unwrap_err().to_string(),
            "Tipo de profesional no válido: 'Cirujano'."
        );
    }

    #[test]
    fn test_client_binds_details() {
        let client = ClientForm {
            person: PersonForm {
                name: "Luis".to_string(),
                postal_code: "28001".to_string(),
                ..PersonForm::default()
            },
        }
        .bind(ClientId::new(4));
        assert_eq!(client.id, ClientId::new(4));
        assert_eq!(client.details.postal_code, "28001");
    }
}
