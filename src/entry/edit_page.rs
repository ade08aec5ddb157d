//! Defines the route handler for the page for editing an existing entry.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    entry::{
        Category, EntryId,
        core::{get_categories, get_entry},
        form::{EntryForm, entry_form},
    },
    html::{BUTTON_DELETE_STYLE, FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// Render the edit page for entry `entry_id` with the form filled in with `values`.
pub(super) fn edit_entry_view(
    entry_id: EntryId,
    values: &EntryForm,
    categories: &[Category],
    error_message: Option<&str>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_ENTRY).into_html();
    let form = entry_form(
        &format_endpoint(endpoints::EDIT_ENTRY, entry_id),
        "Save Changes",
        values,
        categories,
        error_message,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Edit Entry" }

            (form)

            div class="w-full mt-4 text-center"
            {
                button
                    type="submit"
                    form="delete-entry"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete this entry"
                }
            }
        }

        form
            id="delete-entry"
            action=(format_endpoint(endpoints::DELETE_ENTRY, entry_id))
            method="post"
            onsubmit="return confirm('Delete this entry?')"
            hidden
        {}
    };

    base("Edit Entry", &[], &content)
}

/// The state needed for the edit entry page.
#[derive(Debug, Clone)]
pub struct EditEntryPageState {
    /// The database connection for reading entries and categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditEntryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing an entry, or a 404 page if the entry does not exist.
pub async fn get_edit_entry_page(
    State(state): State<EditEntryPageState>,
    Path(entry_id): Path<EntryId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let entry = match get_entry(entry_id, &connection) {
        Ok(entry) => entry,
        Err(Error::NotFound) => {
            tracing::debug!("Tried to edit missing entry {entry_id}");
            return Error::NotFound.into_response();
        }
        Err(error) => {
            tracing::error!("Failed to retrieve entry {entry_id}: {error}");
            return error.into_response();
        }
    };

    let categories = match get_categories(&connection) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("Failed to retrieve categories for edit entry page: {error}");
            return error.into_response();
        }
    };

    edit_entry_view(entry_id, &EntryForm::from(&entry), &categories, None).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        entry::{Category, Entry, EntryType, create_entry},
        test_utils::{
            assert_form_input_with_value, assert_form_target, assert_status, assert_valid_html,
            get_test_connection, must_get_form, parse_html_document,
        },
    };

    use super::{EditEntryPageState, get_edit_entry_page};

    #[tokio::test]
    async fn render_page_with_entry_values() {
        let connection = get_test_connection();
        let entry = create_entry(
            Entry::build(
                date!(2024 - 03 - 15),
                EntryType::Income,
                250000,
                Category::new_unchecked("salary"),
            )
            .description("March pay"),
            &connection,
        )
        .unwrap();
        let state = EditEntryPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_edit_entry_page(State(state), Path(entry.id)).await;

        assert_status(&response, StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_target(&form, "/edit/1");
        assert_form_input_with_value(&form, "date", "date", "2024-03-15");
        assert_form_input_with_value(&form, "amount", "number", "250000");
        assert_form_input_with_value(&form, "category", "text", "salary");
        assert_form_input_with_value(&form, "description", "text", "March pay");

        let checked = Selector::parse("input[type=radio][checked]").unwrap();
        let checked_value = html
            .select(&checked)
            .next()
            .and_then(|input| input.value().attr("value"));
        assert_eq!(checked_value, Some("income"));

        let delete_form = Selector::parse("form#delete-entry").unwrap();
        let delete_action = html
            .select(&delete_form)
            .next()
            .and_then(|form| form.value().attr("action"));
        assert_eq!(delete_action, Some("/delete/1"));
    }

    #[tokio::test]
    async fn missing_entry_is_not_found() {
        let state = EditEntryPageState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = get_edit_entry_page(State(state), Path(99)).await;

        assert_status(&response, StatusCode::NOT_FOUND);
    }
}
