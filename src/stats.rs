//! Income and expense statistics for every month in the ledger.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        EXPENSE_TEXT_STYLE, INCOME_TEXT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_amount, format_average, link,
    },
    month::{YearMonth, month_url},
    navigation::NavBar,
};

/// The totals and per-entry averages of a single month.
///
/// Averages are rounded to two decimal places. Totals and averages are zero
/// for a month without entries of that type.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyStats {
    pub month: YearMonth,
    pub total_expense: i64,
    pub total_income: i64,
    pub avg_expense: f64,
    pub avg_income: f64,
}

/// Get the statistics for every month with at least one entry, newest month first.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidMonth] if an entry's date does not name a valid month,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_monthly_stats(connection: &Connection) -> Result<Vec<MonthlyStats>, Error> {
    let rows = connection
        .prepare(
            "SELECT
                CAST(strftime('%Y', date) AS INTEGER) AS year,
                CAST(strftime('%m', date) AS INTEGER) AS month,
                COALESCE(SUM(CASE WHEN type = 'expense' THEN amount END), 0),
                COALESCE(SUM(CASE WHEN type = 'income' THEN amount END), 0),
                COALESCE(ROUND(AVG(CASE WHEN type = 'expense' THEN amount END), 2), 0.0),
                COALESCE(ROUND(AVG(CASE WHEN type = 'income' THEN amount END), 2), 0.0)
            FROM kakeibo
            GROUP BY year, month
            ORDER BY year DESC, month DESC",
        )?
        .query_map((), |row| {
            Ok((
                row.get::<_, i32>(0)?,
                row.get::<_, u8>(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(
            |(year, month, total_expense, total_income, avg_expense, avg_income)| {
                Ok(MonthlyStats {
                    month: YearMonth::new(year, month)?,
                    total_expense,
                    total_income,
                    avg_expense,
                    avg_income,
                })
            },
        )
        .collect()
}

/// The state needed for the statistics page.
#[derive(Debug, Clone)]
pub struct StatsState {
    /// The database connection for reading entries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StatsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a table of statistics for every month.
pub async fn get_stats_page(State(state): State<StatsState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let stats = get_monthly_stats(&connection)
        .inspect_err(|error| tracing::error!("could not get monthly statistics: {error}"))?;

    Ok(stats_view(&stats).into_response())
}

fn stats_view(stats: &[MonthlyStats]) -> Markup {
    let nav_bar = NavBar::new(endpoints::STATS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { "Monthly Statistics" }

            @if stats.is_empty() {
                p id="no-stats" class="text-gray-500 dark:text-gray-400"
                {
                    "Nothing recorded yet. "
                    (link(endpoints::NEW_ENTRY, "Add your first entry"))
                }
            } @else {
                div class="w-full max-w-4xl overflow-x-auto rounded-lg shadow"
                {
                    table id="monthly-stats" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Total Expense" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Total Income" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Average Expense" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Average Income" }
                            }
                        }

                        tbody
                        {
                            @for row in stats {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    th scope="row" class={(TABLE_CELL_STYLE) " font-medium"}
                                    {
                                        (link(&month_url(endpoints::CALENDAR_VIEW, row.month), &row.month.to_string()))
                                    }
                                    td class={(TABLE_CELL_STYLE) " text-right " (EXPENSE_TEXT_STYLE)} { (format_amount(row.total_expense)) }
                                    td class={(TABLE_CELL_STYLE) " text-right " (INCOME_TEXT_STYLE)} { (format_amount(row.total_income)) }
                                    td class={(TABLE_CELL_STYLE) " text-right"} { (format_average(row.avg_expense)) }
                                    td class={(TABLE_CELL_STYLE) " text-right"} { (format_average(row.avg_income)) }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Statistics", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        entry::{Category, Entry, EntryType, create_entry},
        month::YearMonth,
        stats::{MonthlyStats, StatsState, get_monthly_stats, get_stats_page},
        test_utils::{
            assert_status, assert_valid_html, get_test_connection, parse_html_document,
            select_texts,
        },
    };

    fn insert(connection: &Connection, date: Date, entry_type: EntryType, amount: i64) {
        create_entry(
            Entry::build(date, entry_type, amount, Category::new_unchecked("misc")),
            connection,
        )
        .unwrap();
    }

    #[test]
    fn month_without_income_reports_zero_income() {
        let connection = get_test_connection();
        insert(&connection, date!(2024 - 03 - 01), EntryType::Expense, 100);
        insert(&connection, date!(2024 - 03 - 20), EntryType::Expense, 201);

        let stats = get_monthly_stats(&connection).expect("could not get stats");

        assert_eq!(
            stats,
            vec![MonthlyStats {
                month: YearMonth::new(2024, 3).unwrap(),
                total_expense: 301,
                total_income: 0,
                avg_expense: 150.5,
                avg_income: 0.0,
            }]
        );
    }

    #[test]
    fn months_are_newest_first_with_rounded_averages() {
        let connection = get_test_connection();
        insert(&connection, date!(2023 - 12 - 31), EntryType::Income, 1000);
        insert(&connection, date!(2024 - 02 - 01), EntryType::Expense, 100);
        insert(&connection, date!(2024 - 02 - 02), EntryType::Expense, 100);
        insert(&connection, date!(2024 - 02 - 03), EntryType::Expense, 101);
        insert(&connection, date!(2024 - 02 - 25), EntryType::Income, 300000);
        insert(&connection, date!(2024 - 11 - 05), EntryType::Expense, 10);

        let stats = get_monthly_stats(&connection).unwrap();

        let months = stats.iter().map(|row| row.month.to_string()).collect::<Vec<_>>();
        assert_eq!(months, vec!["2024-11", "2024-02", "2023-12"]);
        assert_eq!(stats[1].total_expense, 301);
        assert_eq!(stats[1].avg_expense, 100.33);
        assert_eq!(stats[1].total_income, 300000);
        assert_eq!(stats[1].avg_income, 300000.0);
        assert_eq!(stats[2].total_expense, 0);
        assert_eq!(stats[2].avg_expense, 0.0);
    }

    #[test]
    fn empty_ledger_has_no_stats() {
        let connection = get_test_connection();

        assert_eq!(get_monthly_stats(&connection).unwrap(), vec![]);
    }

    #[tokio::test]
    async fn renders_stats_table() {
        let connection = get_test_connection();
        insert(&connection, date!(2024 - 03 - 01), EntryType::Expense, 1000);
        insert(&connection, date!(2024 - 03 - 02), EntryType::Expense, 2001);
        let state = StatsState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_stats_page(State(state)).await.into_response();

        assert_status(&response, StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(select_texts(&html, "#monthly-stats tbody th"), vec!["2024-03"]);
        assert_eq!(
            select_texts(&html, "#monthly-stats tbody td"),
            vec!["¥3,001", "¥0", "¥1,500.50", "¥0.00"]
        );
    }
}
