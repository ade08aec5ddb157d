//! The category chart page handler and view.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    graph::{
        chart::{
            CHART_ID, ECHARTS_SCRIPT_URL, chart_script, chart_title, expenses_by_category_chart,
        },
        query::{CategoryTotal, get_expenses_by_category},
    },
    html::{
        EXPENSE_TEXT_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_amount, link,
    },
    month::{MonthQuery, YearMonth, month_url},
    navigation::NavBar,
    timezone::current_local_date,
};

/// The state needed for the category chart page.
#[derive(Debug, Clone)]
pub struct GraphState {
    /// The database connection for reading entries.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Tokyo".
    pub local_timezone: String,
}

impl FromRef<AppState> for GraphState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a pie chart of the expenses by category for the month in the query,
/// or the current month.
pub async fn get_graph_page(
    State(state): State<GraphState>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;
    let month = query.resolve(today)?;

    let totals = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_expenses_by_category(month, &connection).inspect_err(|error| {
            tracing::error!("could not get expenses by category for {month}: {error}")
        })?
    };

    if totals.is_empty() {
        return Ok(graph_no_data_view(month).into_response());
    }

    Ok(graph_view(month, &totals).into_response())
}

fn graph_view(month: YearMonth, totals: &[CategoryTotal]) -> Markup {
    let nav_bar = NavBar::new(endpoints::GRAPH_VIEW).into_html();
    let options = expenses_by_category_chart(month, totals).to_string();
    let title = chart_title(month);

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            (month_navigation(month))

            section class="w-full max-w-4xl mb-8"
            {
                div
                    id=(CHART_ID)
                    class="min-h-[420px] rounded dark:bg-gray-100"
                {}
            }

            (category_table(totals))
        }
    };

    base(
        &title,
        &[
            HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
            chart_script(&options),
        ],
        &content,
    )
}

fn graph_no_data_view(month: YearMonth) -> Markup {
    let nav_bar = NavBar::new(endpoints::GRAPH_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            (month_navigation(month))

            section id="no-expenses" class="text-center space-y-4"
            {
                h2 class="text-xl font-semibold" { "No expenses in " (month) }

                p
                {
                    "Once you record an expense for this month, a breakdown by category will show up here. "
                    (link(endpoints::NEW_ENTRY, "Add an entry"))
                }
            }
        }
    };

    base(&chart_title(month), &[], &content)
}

fn month_navigation(month: YearMonth) -> Markup {
    html! {
        div class="flex w-full max-w-4xl items-center justify-between mb-4"
        {
            @if let Some(previous) = month.previous() {
                a id="previous-month" href=(month_url(endpoints::GRAPH_VIEW, previous)) class=(LINK_STYLE)
                {
                    "← " (previous)
                }
            } @else {
                span {}
            }

            h1 class="text-2xl font-bold"
            {
                a href=(month_url(endpoints::CALENDAR_VIEW, month)) { (month) }
            }

            @if let Some(next) = month.next() {
                a id="next-month" href=(month_url(endpoints::GRAPH_VIEW, next)) class=(LINK_STYLE)
                {
                    (next) " →"
                }
            } @else {
                span {}
            }
        }
    }
}

/// Each category's share of `grand_total` as a percentage with one decimal place.
fn format_share(total: i64, grand_total: i64) -> String {
    if grand_total <= 0 {
        return "-".to_owned();
    }

    format!("{:.1}%", total as f64 * 100.0 / grand_total as f64)
}

fn category_table(totals: &[CategoryTotal]) -> Markup {
    let grand_total = totals.iter().map(|total| total.total).sum::<i64>();

    html! {
        div class="w-full max-w-4xl overflow-x-auto rounded-lg shadow"
        {
            table id="category-totals" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                        th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Share" }
                    }
                }

                tbody
                {
                    @for total in totals {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                            {
                                (total.category)
                            }
                            td class={(TABLE_CELL_STYLE) " text-right " (EXPENSE_TEXT_STYLE)}
                            {
                                (format_amount(total.total))
                            }
                            td class={(TABLE_CELL_STYLE) " text-right"}
                            {
                                (format_share(total.total, grand_total))
                            }
                        }
                    }
                }

                tfoot
                {
                    tr class="font-semibold text-gray-900 dark:text-white"
                    {
                        th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                        td class={(TABLE_CELL_STYLE) " text-right"} { (format_amount(grand_total)) }
                        td class={(TABLE_CELL_STYLE) " text-right"} { "" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        entry::{Category, Entry, EntryType, create_entry},
        graph::page::{GraphState, format_share, get_graph_page},
        month::MonthQuery,
        test_utils::{
            assert_status, assert_valid_html, get_test_connection, parse_html_document,
            select_texts,
        },
    };

    fn get_state(connection: Connection) -> GraphState {
        GraphState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn march_2024() -> Query<MonthQuery> {
        Query(MonthQuery {
            year: Some(2024),
            month: Some(3),
        })
    }

    #[tokio::test]
    async fn shows_chart_and_table() {
        let connection = get_test_connection();
        for (amount, category) in [(1500, "food"), (500, "transport")] {
            create_entry(
                Entry::build(
                    date!(2024 - 03 - 10),
                    EntryType::Expense,
                    amount,
                    Category::new_unchecked(category),
                ),
                &connection,
            )
            .unwrap();
        }

        let response = get_graph_page(State(get_state(connection)), march_2024())
            .await
            .into_response();

        assert_status(&response, StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let chart = Selector::parse("#category-chart").unwrap();
        assert_eq!(html.select(&chart).count(), 1);
        let scripts = select_texts(&html, "head script");
        assert!(
            scripts
                .iter()
                .any(|script| script.contains("2024-03 expenses by category")),
            "want chart options with title in a script, got {scripts:?}"
        );

        assert_eq!(
            select_texts(&html, "#category-totals tbody th"),
            vec!["food", "transport"]
        );
        assert_eq!(
            select_texts(&html, "#category-totals tbody td"),
            vec!["¥1,500", "75.0%", "¥500", "25.0%"]
        );
    }

    #[tokio::test]
    async fn month_without_expenses_shows_empty_state() {
        let connection = get_test_connection();
        create_entry(
            Entry::build(
                date!(2024 - 03 - 25),
                EntryType::Income,
                250000,
                Category::new_unchecked("salary"),
            ),
            &connection,
        )
        .unwrap();

        let response = get_graph_page(State(get_state(connection)), march_2024())
            .await
            .into_response();

        assert_status(&response, StatusCode::OK);
        let html = parse_html_document(response).await;
        let empty_state = Selector::parse("#no-expenses").unwrap();
        assert_eq!(html.select(&empty_state).count(), 1);
        let chart = Selector::parse("#category-chart").unwrap();
        assert_eq!(html.select(&chart).count(), 0);
    }

    #[tokio::test]
    async fn invalid_month_is_bad_request() {
        let query = Query(MonthQuery {
            year: Some(2024),
            month: Some(0),
        });

        let response = get_graph_page(State(get_state(get_test_connection())), query)
            .await
            .into_response();

        assert_status(&response, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn shares_use_one_decimal_place() {
        assert_eq!(format_share(1, 3), "33.3%");
        assert_eq!(format_share(2, 3), "66.7%");
        assert_eq!(format_share(5, 5), "100.0%");
        assert_eq!(format_share(5, 0), "-");
    }
}
