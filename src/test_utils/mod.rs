#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

use rusqlite::Connection;

use crate::db::initialize;

pub(crate) use form::{
    assert_form_error_message, assert_form_input, assert_form_input_with_value,
    assert_form_submit_button_with_text, assert_form_target, must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, select_texts};
pub(crate) use http::{assert_content_type, assert_redirect, assert_status};

/// An in-memory database with the latest schema.
#[track_caller]
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("could not open in-memory database");
    initialize(&connection).expect("could not initialize test database");
    connection
}
