//! Masters page: register and look up professionals and clients.
//!
//! New rows get `max(ID) + 1` computed from the file as it is when the
//! submission arrives. Two simultaneous registrations can pick the same id.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use techealth_core::{
    Client, ClientId, ClinicPage, Dispatch, Identified, Professional, ProfessionalId,
    ProfessionalKind, dispatch,
};
use techealth_sheets::{Loaded, Record, RecordTable, TableView};
use tracing::instrument;

use crate::db::Repository;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::forms::{ClientForm, ProfessionalForm};
use crate::middleware::PageAccess;
use crate::routes::locked;
use crate::state::AppState;
use crate::views::Sidebar;

/// Messages for one registry (professionals or clients).
struct RegistryText {
    saved: &'static str,
    empty_id: &'static str,
    not_found: &'static str,
}

const PROFESSIONALS: RegistryText = RegistryText {
    saved: "Profesional registrado correctamente.",
    empty_id: "Por favor, introduce un ID de Profesional.",
    not_found: "Profesional no encontrado.",
};

const CLIENTS: RegistryText = RegistryText {
    saved: "Cliente registrado correctamente.",
    empty_id: "Por favor, introduce un ID de Cliente.",
    not_found: "Cliente no encontrado.",
};

/// Shown when the lookup id is not a whole number.
pub const INVALID_ID: &str = "El ID debe ser un número entero.";

/// Lookup query: `?professional_id=3` or `?client_id=3`.
#[derive(Debug, Default, Deserialize)]
pub struct MastersQuery {
    pub professional_id: Option<String>,
    pub client_id: Option<String>,
}

/// One registry tab.
#[derive(Debug, Default)]
pub struct RegistryPanel {
    /// Id the next registration will get; `None` once ids are exhausted,
    /// with `error` saying why.
    pub next_id: Option<i32>,
    /// Set when the registry file does not exist yet.
    pub warning: Option<String>,
    pub success: Option<&'static str>,
    pub error: Option<String>,
    pub lookup_id: String,
    pub lookup_error: Option<&'static str>,
    pub lookup_result: Option<TableView>,
}

impl RegistryPanel {
    fn from_loaded<R: Identified>(loaded: &Loaded<RecordTable<R>>) -> Self {
        let (next_id, error) = match loaded.value.next_id() {
            Ok(id) => (Some(id), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            next_id,
            error,
            warning: loaded.warning.as_ref().map(ToString::to_string),
            ..Self::default()
        }
    }

    fn lookup<R>(&mut self, table: &RecordTable<R>, raw_id: &str, text: &RegistryText)
    where
        R: Record + Identified + Clone,
    {
        self.lookup_id = raw_id.to_string();
        let raw_id = raw_id.trim();
        if raw_id.is_empty() {
            self.lookup_error = Some(text.empty_id);
            return;
        }
        let Ok(id) = raw_id.parse::<i32>() else {
            self.lookup_error = Some(INVALID_ID);
            return;
        };

        let found = table.with_id(id);
        if found.is_empty() {
            self.lookup_error = Some(text.not_found);
        } else {
            self.lookup_result = Some(TableView::from(&found));
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "masters.html")]
pub struct MastersTemplate {
    pub sidebar: Sidebar,
    pub kinds: Vec<&'static str>,
    pub professionals: RegistryPanel,
    pub clients: RegistryPanel,
    pub professional_form: ProfessionalForm,
    pub client_form: ClientForm,
}

impl MastersTemplate {
    fn new(
        state: &AppState,
        access: PageAccess,
        professionals: RegistryPanel,
        clients: RegistryPanel,
    ) -> Self {
        Self {
            sidebar: Sidebar::new(state, ClinicPage::Masters, access),
            kinds: ProfessionalKind::ALL.iter().map(|kind| kind.label()).collect(),
            professionals,
            clients,
            professional_form: ProfessionalForm::default(),
            client_form: ClientForm::default(),
        }
    }
}

async fn load_panel<R>(
    repository: &Repository<R>,
) -> Result<(RegistryPanel, RecordTable<R>)>
where
    R: Record + Identified + Send + 'static,
{
    let loaded = repository.load().await?;
    let panel = RegistryPanel::from_loaded(&loaded);
    Ok((panel, loaded.value))
}

/// Display both registries, answering any id lookup in the query.
///
/// # Errors
///
/// Returns 500 if a registry file cannot be read.
#[instrument(skip(state, access))]
pub async fn show(
    State(state): State<AppState>,
    access: PageAccess,
    Query(query): Query<MastersQuery>,
) -> Result<Response> {
    if let Dispatch::Locked(page) = dispatch(ClinicPage::Masters, access.access) {
        return Ok(locked(&state, page, access, StatusCode::OK));
    }

    let repositories = state.repositories();
    let (mut professionals, professional_table) = load_panel(&repositories.professionals).await?;
    let (mut clients, client_table) = load_panel(&repositories.clients).await?;

    if let Some(raw_id) = &query.professional_id {
        professionals.lookup(&professional_table, raw_id, &PROFESSIONALS);
    }
    if let Some(raw_id) = &query.client_id {
        clients.lookup(&client_table, raw_id, &CLIENTS);
    }

    Ok(MastersTemplate::new(&state, access, professionals, clients).into_response())
}

/// Register a professional under the next free id.
///
/// # Errors
///
/// Returns 500 if a registry file cannot be read or written.
#[instrument(skip(state, access, form), fields(kind = %form.kind))]
pub async fn register_professional(
    State(state): State<AppState>,
    access: PageAccess,
    Form(form): Form<ProfessionalForm>,
) -> Result<Response> {
    if let Dispatch::Locked(page) = dispatch(ClinicPage::Masters, access.access) {
        return Ok(locked(&state, page, access, StatusCode::UNAUTHORIZED));
    }

    let repositories = state.repositories();
    let (clients, _) = load_panel(&repositories.clients).await?;

    let professional = match form.clone().bind(ProfessionalId::new(0)) {
        Ok(professional) => professional,
        Err(e) => {
            let (mut professionals, _) = load_panel(&repositories.professionals).await?;
            professionals.error = Some(e.to_string());
            let mut page = MastersTemplate::new(&state, access, professionals, clients);
            page.professional_form = form;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let table = repositories
        .professionals
        .append_with(move |table| {
            Ok(Professional {
                id: ProfessionalId::new(table.next_id()?),
                ..professional
            })
        })
        .await?;
    add_breadcrumb("masters", "Professional registered");
    tracing::info!(count = table.len(), "Professional registered");

    let mut professionals = RegistryPanel::from_loaded(&Loaded::ok(table));
    professionals.success = Some(PROFESSIONALS.saved);
    Ok(MastersTemplate::new(&state, access, professionals, clients).into_response())
}

/// Register a client under the next free id.
///
/// # Errors
///
/// Returns 500 if a registry file cannot be read or written.
#[instrument(skip(state, access, form))]
pub async fn register_client(
    State(state): State<AppState>,
    access: PageAccess,
    Form(form): Form<ClientForm>,
) -> Result<Response> {
    if let Dispatch::Locked(page) = dispatch(ClinicPage::Masters, access.access) {
        return Ok(locked(&state, page, access, StatusCode::UNAUTHORIZED));
    }

    let repositories = state.repositories();
    let (professionals, _) = load_panel(&repositories.professionals).await?;

    let client = form.bind(ClientId::new(0));
    let table = repositories
        .clients
        .append_with(move |table| {
            Ok(Client {
                id: ClientId::new(table.next_id()?),
                ..client
            })
        })
        .await?;
    add_breadcrumb("masters", "Client registered");
    tracing::info!(count = table.len(), "Client registered");

    let mut clients = RegistryPanel::from_loaded(&Loaded::ok(table));
    clients.success = Some(CLIENTS.saved);
    Ok(MastersTemplate::new(&state, access, professionals, clients).into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show))
        .route("/professionals", post(register_professional))
        .route("/clients", post(register_client))
}

#[cfg(test)]
mod tests {
    use techealth_core::PersonDetails;

    use super::*;

    fn clients() -> RecordTable<Client> {
        RecordTable::from_records(vec![Client {
            id: ClientId::new(2),
            details: PersonDetails {
                name: "Ana".to_string(),
                ..PersonDetails::default()
            },
        }])
    }

    #[test]
    fn test_lookup_messages() {
        let mut panel = RegistryPanel::default();
        panel.lookup(&clients(), "  ", &CLIENTS);
        assert_eq!(panel.lookup_error, Some("Por favor, introduce un ID de Cliente."));

        let mut panel = RegistryPanel::default();
        panel.lookup(&clients(), "dos", &CLIENTS);
        assert_eq!(panel.lookup_error, Some(INVALID_ID));

        let mut panel = RegistryPanel::default();
        panel.lookup(&clients(), "7", &CLIENTS);
        assert_eq!(panel.lookup_error, Some("Cliente no encontrado."));
    }

    #[test]
    fn test_lookup_finds_row() {
        let mut panel = RegistryPanel::default();
        panel.lookup(&clients(), "2", &CLIENTS);
        assert!(panel.lookup_error.is_none());
        let result = panel.lookup_result.unwrap_or_default();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0][1], "Ana");
    }

    #[test]
    fn test_exhausted_ids_are_reported_on_the_panel() {
        let panel = RegistryPanel::from_loaded(&Loaded::ok(clients()));
        assert_eq!(panel.next_id, Some(3));
        assert!(panel.error.is_none());

        let full = clients().append(Client {
            id: ClientId::new(i32::MAX),
            details: PersonDetails::default(),
        });
        let panel = RegistryPanel::from_loaded(&Loaded::ok(full));
        assert_eq!(panel.next_id, None);
        assert_eq!(
            panel.error.as_deref(),
            Some("no ids left: the largest id is 2147483647")
        );
    }
}
