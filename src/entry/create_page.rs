//! Defines the route handler for the page for creating a new entry.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    entry::{Category, core::get_categories, form::{EntryForm, entry_form}},
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::current_local_date,
};

/// Render the new entry page with the form filled in with `values`.
pub(super) fn new_entry_view(
    values: &EntryForm,
    categories: &[Category],
    error_message: Option<&str>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_ENTRY).into_html();
    let form = entry_form(
        endpoints::NEW_ENTRY,
        "Create Entry",
        values,
        categories,
        error_message,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "New Entry" }

            (form)
        }
    };

    base("New Entry", &[], &content)
}

/// The state needed for the new entry page.
#[derive(Debug, Clone)]
pub struct NewEntryPageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Tokyo".
    pub local_timezone: String,
    /// The database connection for listing existing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewEntryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Optional values to prefill on the new entry page.
#[derive(Debug, Default, Deserialize)]
pub struct NewEntryQuery {
    /// The date to prefill, e.g. the calendar day that was clicked.
    pub date: Option<String>,
}

/// Renders the page for creating an entry, dated today unless `?date=` says otherwise.
pub async fn get_new_entry_page(
    State(state): State<NewEntryPageState>,
    Query(query): Query<NewEntryQuery>,
) -> Response {
    let today = match current_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_response(),
    };

    let mut values = EntryForm::blank(today);
    if let Some(date) = query.date {
        values.date = Some(date);
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let categories = match get_categories(&connection) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("Failed to retrieve categories for new entry page: {error}");
            return error.into_response();
        }
    };

    new_entry_view(&values, &categories, None).into_response()
}
