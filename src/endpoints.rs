//! The endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/edit/{entry_id}', use [format_endpoint].

/// The calendar view of a month, the landing page.
pub const CALENDAR_VIEW: &str = "/";
/// The page and form target for creating a new entry.
pub const NEW_ENTRY: &str = "/input";
/// The page and form target for editing an existing entry.
pub const EDIT_ENTRY: &str = "/edit/{entry_id}";
/// The form target for deleting an entry.
pub const DELETE_ENTRY: &str = "/delete/{entry_id}";
/// The pie chart of a month's expenses by category.
pub const GRAPH_VIEW: &str = "/graph";
/// The table of statistics for every month.
pub const STATS_VIEW: &str = "/stats";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/edit/{entry_id}', '{entry_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
