//! Kakeibo is a web app for keeping a household budget ledger.
//!
//! Income and expense entries are recorded against a date and a category,
//! then summarised as a monthly calendar, a pie chart of expense categories
//! and a table of monthly statistics.
//!
//! This library provides a router that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod calendar;
mod db;
mod endpoints;
mod entry;
mod graph;
mod html;
mod internal_server_error;
mod logging;
mod month;
mod navigation;
mod not_found;
mod routing;
mod stats;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use calendar::WeekStart;
pub use db::{initialize as initialize_db, open as open_db};
pub use entry::{Category, Entry, EntryId, EntryType, NewEntry, create_entry};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;

use crate::{
    html::error_view, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to listen for the Ctrl+C signal: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the entry ID
    /// is correct and that the entry has not been deleted.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an entry that does not exist.
    #[error("tried to update an entry that is not in the database")]
    UpdateMissingEntry,

    /// The year and month in the query string do not name a calendar month.
    #[error("{year}-{month} is not a valid month")]
    InvalidMonth {
        /// The requested year.
        year: i32,
        /// The requested month number, valid values are 1 to 12.
        month: u8,
    },

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::UpdateMissingEntry => get_404_not_found_response(),
            Error::InvalidMonth { year, month } => (
                StatusCode::BAD_REQUEST,
                error_view(
                    "Bad Request",
                    "400",
                    "That month does not exist.",
                    &format!(
                        "Could not show year {year}, month {month}. \
                        Check that the month is a number from 1 to 12."
                    ),
                ),
            )
                .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let error = Error::from(rusqlite::Error::QueryReturnedNoRows);

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn error_status_codes() {
        let cases = [
            (Error::NotFound, StatusCode::NOT_FOUND),
            (Error::UpdateMissingEntry, StatusCode::NOT_FOUND),
            (
                Error::InvalidMonth {
                    year: 2024,
                    month: 13,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (Error::DatabaseLockError, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, want_status) in cases {
            let description = error.to_string();
            let response = error.into_response();

            assert_eq!(
                response.status(),
                want_status,
                "wrong status code for error \"{description}\""
            );
        }
    }
}
