//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState,
    calendar::{get_calendar_page, post_calendar},
    endpoints,
    entry::{
        create_entry_endpoint, delete_entry_endpoint, edit_entry_endpoint, get_edit_entry_page,
        get_new_entry_page,
    },
    graph::get_graph_page,
    not_found::get_404_not_found,
    stats::get_stats_page,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::CALENDAR_VIEW,
            get(get_calendar_page).post(post_calendar),
        )
        .route(
            endpoints::NEW_ENTRY,
            get(get_new_entry_page).post(create_entry_endpoint),
        )
        .route(
            endpoints::EDIT_ENTRY,
            get(get_edit_entry_page).post(edit_entry_endpoint),
        )
        .route(endpoints::DELETE_ENTRY, post(delete_entry_endpoint))
        .route(endpoints::GRAPH_VIEW, get(get_graph_page))
        .route(endpoints::STATS_VIEW, get(get_stats_page))
        .fallback(get_404_not_found)
        .with_state(state)
}
