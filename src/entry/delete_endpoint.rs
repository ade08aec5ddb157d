//! Defines the endpoint for deleting an entry.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    entry::{EntryId, core::delete_entry},
};

/// The state needed to delete an entry.
#[derive(Debug, Clone)]
pub struct DeleteEntryState {
    /// The database connection for managing entries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an entry, redirects to the calendar view.
///
/// Deleting an entry that does not exist is not an error.
pub async fn delete_entry_endpoint(
    State(state): State<DeleteEntryState>,
    Path(entry_id): Path<EntryId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_entry(entry_id, &connection) {
        Ok(0) => tracing::debug!("Entry {entry_id} was already deleted"),
        Ok(_) => tracing::info!("Deleted entry {entry_id}"),
        Err(error) => {
            tracing::error!("Could not delete entry {entry_id}: {error}");
            return error.into_response();
        }
    }

    Redirect::to(endpoints::CALENDAR_VIEW).into_response()
}
