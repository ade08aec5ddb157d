//! Defines the endpoint for saving changes to an existing entry.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    entry::{
        EntryId,
        core::{get_categories, get_entry, update_entry},
        edit_page::edit_entry_view,
        form::EntryForm,
    },
    month::{YearMonth, month_url},
};

/// The state needed to edit an entry.
#[derive(Debug, Clone)]
pub struct EditEntryState {
    /// The database connection for managing entries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that overwrites every field of an entry.
///
/// Redirects to the calendar for the entry's new month on success, responds
/// with a 404 page if the entry does not exist, and re-renders the form for
/// an invalid submission.
pub async fn edit_entry_endpoint(
    State(state): State<EditEntryState>,
    Path(entry_id): Path<EntryId>,
    Form(form): Form<EntryForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    if let Err(error) = get_entry(entry_id, &connection) {
        tracing::debug!("Could not find entry {entry_id} to edit: {error}");
        return error.into_response();
    }

    let update = match form.validate() {
        Ok(update) => update,
        Err(form_error) => {
            tracing::debug!("Rejected changes to entry {entry_id} {form:?}: {form_error}");

            let categories = get_categories(&connection).unwrap_or_else(|error| {
                tracing::error!("could not get categories for the edit entry form: {error}");
                Vec::new()
            });

            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                edit_entry_view(entry_id, &form, &categories, Some(&form_error.to_string())),
            )
                .into_response();
        }
    };

    match update_entry(entry_id, &update, &connection) {
        Ok(()) => {
            tracing::info!("Updated entry {entry_id}");
            let month = YearMonth::from_date(update.date);
            Redirect::to(&month_url(endpoints::CALENDAR_VIEW, month)).into_response()
        }
        Err(error) => {
            tracing::error!("Could not update entry {entry_id}: {error}");
            error.into_response()
        }
    }
}
