//! Column schemas for the persisted record files.
//!
//! Header names match the files the dashboards have always written, so
//! existing workbooks keep loading.

use techealth_core::{
    Client, ClientId, ExerciseEntry, PatientSession, PersonDetails, Professional, ProfessionalId,
    ProfessionalKind,
};

use crate::record::{Record, RowError, RowView, date_cell};
use crate::table::Cell;

/// File names inside a data directory.
pub mod files {
    pub const PATIENT_SESSIONS: &str = "datos_pacientes.xlsx";
    pub const PROFESSIONALS: &str = "profesionales.xlsx";
    pub const CLIENTS: &str = "clientes.xlsx";
    pub const EXERCISES: &str = "ejercicios_pacientes.xlsx";
    pub const CLINIC_CREDENTIALS: &str = "credentials.xlsx";
    pub const PATIENT_REGISTRY: &str = "credenciales.xlsx";
    pub const PORTAL_ADMIN_CREDENTIALS: &str = "admin_credentials.xlsx";
    pub const HR_TEMPLATE: &str = "template.xlsx";
}

const ID: &str = "ID";
const NAME: &str = "Nombre";
const SURNAME: &str = "Apellidos";
const ADDRESS: &str = "Direccion";
const NATIONAL_ID: &str = "DNI";
const PHONE: &str = "Telefono";
const MUNICIPALITY: &str = "Municipio";
const POSTAL_CODE: &str = "Codigo Postal";
const KIND: &str = "Tipo";

const DATE: &str = "Fecha";
const BODY_POSITION: &str = "Posición Corporal";
const EXERCISE_NAME: &str = "Nombre Ejercicio";
const REPETITIONS: &str = "Repeticiones";
const DURATION: &str = "Tiempo (min)";
const WEIGHT: &str = "Kilos";

impl Record for PatientSession {
    const COLUMNS: &'static [&'static str] = &[
        DATE,
        NAME,
        NATIONAL_ID,
        BODY_POSITION,
        EXERCISE_NAME,
        REPETITIONS,
        DURATION,
        WEIGHT,
    ];

    fn to_row(&self) -> Vec<Cell> {
        vec![
            date_cell(self.date),
            Cell::text(self.name.as_str()),
            Cell::text(self.national_id.as_str()),
            Cell::text(self.body_position.as_str()),
            Cell::text(self.exercise_name.as_str()),
            Cell::Int(i64::from(self.repetitions)),
            Cell::Int(i64::from(self.duration_minutes)),
            Cell::number(self.weight_kg),
        ]
    }

    fn from_row(row: &RowView<'_>) -> Result<Self, RowError> {
        Ok(Self {
            date: row.date(DATE)?,
            name: row.text(NAME)?,
            national_id: row.text(NATIONAL_ID)?,
            body_position: row.text(BODY_POSITION)?,
            exercise_name: row.text(EXERCISE_NAME)?,
            repetitions: row.count(REPETITIONS)?,
            duration_minutes: row.count(DURATION)?,
            weight_kg: row.decimal(WEIGHT)?,
        })
    }
}

fn details_to_cells(details: &PersonDetails) -> [Cell; 7] {
    [
        Cell::text(details.name.as_str()),
        Cell::text(details.surname.as_str()),
        Cell::text(details.address.as_str()),
        Cell::text(details.national_id.as_str()),
        Cell::text(details.phone.as_str()),
        Cell::text(details.municipality.as_str()),
        Cell::text(details.postal_code.as_str()),
    ]
}

fn details_from_row(row: &RowView<'_>) -> Result<PersonDetails, RowError> {
    Ok(PersonDetails {
        name: row.text(NAME)?,
        surname: row.text(SURNAME)?,
        address: row.text(ADDRESS)?,
        national_id: row.text(NATIONAL_ID)?,
        phone: row.text(PHONE)?,
        municipality: row.text(MUNICIPALITY)?,
        postal_code: row.text(POSTAL_CODE)?,
    })
}

impl Record for Professional {
    const COLUMNS: &'static [&'static str] = &[
        ID,
        NAME,
        SURNAME,
        ADDRESS,
        NATIONAL_ID,
        PHONE,
        MUNICIPALITY,
        POSTAL_CODE,
        KIND,
    ];

    fn to_row(&self) -> Vec<Cell> {
        let mut row = Vec::with_capacity(Self::COLUMNS.len());
        row.push(Cell::Int(i64::from(self.id.as_i32())));
        row.extend(details_to_cells(&self.details));
        row.push(Cell::text(self.kind.label()));
        row
    }

    fn from_row(row: &RowView<'_>) -> Result<Self, RowError> {
        let kind = row.text(KIND)?;
        Ok(Self {
            id: ProfessionalId::new(row.id(ID)?),
            details: details_from_row(row)?,
            kind: kind.parse::<ProfessionalKind>().map_err(|e| RowError {
                column: KIND,
                reason: e.to_string(),
            })?,
        })
    }
}

impl Record for Client {
    const COLUMNS: &'static [&'static str] = &[
        ID,
        NAME,
        SURNAME,
        ADDRESS,
        NATIONAL_ID,
        PHONE,
        MUNICIPALITY,
        POSTAL_CODE,
    ];

    fn to_row(&self) -> Vec<Cell> {
        let mut row = Vec::with_capacity(Self::COLUMNS.len());
        row.push(Cell::Int(i64::from(self.id.as_i32())));
        row.extend(details_to_cells(&self.details));
        row
    }

    fn from_row(row: &RowView<'_>) -> Result<Self, RowError> {
        Ok(Self {
            id: ClientId::new(row.id(ID)?),
            details: details_from_row(row)?,
        })
    }
}

impl Record for ExerciseEntry {
    const COLUMNS: &'static [&'static str] = &["POSICIÓN CORPORAL", "NOMBRE EJERCICIO"];

    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.body_position.as_str()),
            Cell::text(self.exercise_name.as_str()),
        ]
    }

    fn from_row(row: &RowView<'_>) -> Result<Self, RowError> {
        Ok(Self {
            body_position: row.text("POSICIÓN CORPORAL")?,
            exercise_name: row.text("NOMBRE EJERCICIO")?,
        })
    }
}
