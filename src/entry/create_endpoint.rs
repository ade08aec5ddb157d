//! Defines the endpoint for creating a new entry.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    entry::{
        core::{create_entry, get_categories},
        create_page::new_entry_view,
        form::EntryForm,
    },
    month::{YearMonth, month_url},
};

/// The state needed to create an entry.
#[derive(Debug, Clone)]
pub struct CreateEntryState {
    /// The database connection for managing entries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new entry.
///
/// Redirects to the calendar for the entry's month on success. An invalid
/// submission re-renders the form with the submitted values and an error message.
pub async fn create_entry_endpoint(
    State(state): State<CreateEntryState>,
    Form(form): Form<EntryForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let new_entry = match form.validate() {
        Ok(new_entry) => new_entry,
        Err(form_error) => {
            tracing::debug!("Rejected new entry {form:?}: {form_error}");

            let categories = get_categories(&connection).unwrap_or_else(|error| {
                tracing::error!("could not get categories for the new entry form: {error}");
                Vec::new()
            });

            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                new_entry_view(&form, &categories, Some(&form_error.to_string())),
            )
                .into_response();
        }
    };

    match create_entry(new_entry, &connection) {
        Ok(entry) => {
            tracing::info!("Created entry {} dated {}", entry.id, entry.date);
            let month = YearMonth::from_date(entry.date);
            Redirect::to(&month_url(endpoints::CALENDAR_VIEW, month)).into_response()
        }
        Err(error) => {
            tracing::error!("could not create entry: {error}");
            error.into_response()
        }
    }
}
