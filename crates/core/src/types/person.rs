//! Master data: professionals and clients.

use serde::{Deserialize, Serialize};

use super::id::{ClientId, Identified, ProfessionalId};

/// Contact fields shared by professionals and clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDetails {
    pub name: String,
    pub surname: String,
    pub address: String,
    pub national_id: String,
    pub phone: String,
    pub municipality: String,
    pub postal_code: String,
}

/// Kind of professional, stored with its Spanish label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfessionalKind {
    Physiotherapist,
    Rehabilitator,
    Trainer,
}

impl ProfessionalKind {
    /// All kinds, in selection-list order.
    pub const ALL: [Self; 3] = [Self::Physiotherapist, Self::Rehabilitator, Self::Trainer];

    /// Label written to the spreadsheet and shown in forms.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Physiotherapist => "Fisioterapeuta",
            Self::Rehabilitator => "Recuperador",
            Self::Trainer => "Entrenador",
        }
    }
}

impl std::fmt::Display for ProfessionalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error parsing a professional kind from its label.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid professional kind: {0}")]
pub struct ProfessionalKindError(pub String);

impl std::str::FromStr for ProfessionalKind {
    type Err = ProfessionalKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| ProfessionalKindError(s.to_string()))
    }
}

/// A registered professional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professional {
    pub id: ProfessionalId,
    pub details: PersonDetails,
    pub kind: ProfessionalKind,
}

impl Identified for Professional {
    fn id_value(&self) -> i32 {
        self.id.as_i32()
    }
}

/// A registered client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub details: PersonDetails,
}

impl Identified for Client {
    fn id_value(&self) -> i32 {
        self.id.as_i32()
    }
}
