//! The calendar page handlers and view.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    calendar::{
        grid::{CalendarCell, CalendarDay, WeekStart, build_day_grid},
        summary::{MonthlyTotals, get_daily_totals, get_monthly_totals},
    },
    endpoints::{self, format_endpoint},
    entry::{Entry, EntryType, get_entries_in_month},
    html::{
        BUTTON_DELETE_STYLE, EXPENSE_TEXT_STYLE, INCOME_TEXT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        amount_color_class, base, format_amount, link,
    },
    month::{MonthQuery, YearMonth, month_url},
    navigation::NavBar,
    timezone::current_local_date,
};

const DAY_CELL_STYLE: &str = "align-top h-20 sm:h-24 p-1 sm:p-2 border border-gray-200 \
    dark:border-gray-700 bg-white dark:bg-gray-800";
const TODAY_CELL_STYLE: &str = "align-top h-20 sm:h-24 p-1 sm:p-2 border-2 border-blue-500 \
    bg-blue-50 dark:bg-gray-700";
const BLANK_CELL_STYLE: &str = "border border-gray-200 dark:border-gray-700 bg-gray-100 dark:bg-gray-900";

/// The state needed for the calendar page.
#[derive(Debug, Clone)]
pub struct CalendarState {
    /// The database connection for reading entries.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Tokyo".
    pub local_timezone: String,
    /// The day the calendar's weeks start on.
    pub week_start: WeekStart,
}

impl FromRef<AppState> for CalendarState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            week_start: state.week_start,
        }
    }
}

/// Display the calendar for the month in the query, or the current month.
pub async fn get_calendar_page(
    State(state): State<CalendarState>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;
    let month = query.resolve(today)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let daily_totals = get_daily_totals(month, &connection)
        .inspect_err(|error| tracing::error!("could not get daily totals for {month}: {error}"))?;
    let monthly_totals = get_monthly_totals(month, &connection)
        .inspect_err(|error| tracing::error!("could not get totals for {month}: {error}"))?;
    let entries = get_entries_in_month(month, &connection)
        .inspect_err(|error| tracing::error!("could not get entries for {month}: {error}"))?;

    let grid = build_day_grid(month, state.week_start, &daily_totals, today);

    Ok(calendar_view(month, state.week_start, &grid, monthly_totals, &entries).into_response())
}

/// Form submissions to the calendar are ignored.
pub async fn post_calendar() -> Redirect {
    Redirect::to(endpoints::CALENDAR_VIEW)
}

fn calendar_view(
    month: YearMonth,
    week_start: WeekStart,
    grid: &[CalendarCell],
    totals: MonthlyTotals,
    entries: &[Entry],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::CALENDAR_VIEW).into_html();
    let title = month.to_string();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            (month_navigation(month))
            (totals_view(totals))
            (grid_view(week_start, grid))
            (entry_list_view(entries))
        }
    };

    base(&title, &[], &content)
}

fn month_navigation(month: YearMonth) -> Markup {
    html! {
        div class="flex w-full max-w-4xl items-center justify-between mb-4"
        {
            @if let Some(previous) = month.previous() {
                a id="previous-month" href=(month_url(endpoints::CALENDAR_VIEW, previous)) class=(LINK_STYLE)
                {
                    "← " (previous)
                }
            } @else {
                span {}
            }

            h1 class="text-2xl font-bold" { (month) }

            @if let Some(next) = month.next() {
                a id="next-month" href=(month_url(endpoints::CALENDAR_VIEW, next)) class=(LINK_STYLE)
                {
                    (next) " →"
                }
            } @else {
                span {}
            }
        }

        p class="mb-4 text-sm"
        {
            (link(&month_url(endpoints::GRAPH_VIEW, month), "Expenses by category for this month"))
        }
    }
}

fn totals_view(totals: MonthlyTotals) -> Markup {
    let balance = totals.balance();

    html! {
        dl class="grid grid-cols-3 gap-4 w-full max-w-4xl mb-6 text-center"
        {
            div class="rounded-lg shadow bg-white dark:bg-gray-800 p-3"
            {
                dt class="text-sm text-gray-500 dark:text-gray-400" { "Income" }
                dd id="monthly-income" class={"text-lg font-semibold " (INCOME_TEXT_STYLE)}
                {
                    (format_amount(totals.income))
                }
            }

            div class="rounded-lg shadow bg-white dark:bg-gray-800 p-3"
            {
                dt class="text-sm text-gray-500 dark:text-gray-400" { "Expenses" }
                dd id="monthly-expense" class={"text-lg font-semibold " (EXPENSE_TEXT_STYLE)}
                {
                    (format_amount(totals.expense))
                }
            }

            div class="rounded-lg shadow bg-white dark:bg-gray-800 p-3"
            {
                dt class="text-sm text-gray-500 dark:text-gray-400" { "Balance" }
                dd id="balance" class={"text-lg font-semibold " (amount_color_class(balance))}
                {
                    (format_amount(balance))
                }
            }
        }
    }
}

fn grid_view(week_start: WeekStart, grid: &[CalendarCell]) -> Markup {
    html! {
        div class="w-full max-w-4xl overflow-x-auto mb-8"
        {
            table id="calendar" class="w-full table-fixed text-xs sm:text-sm"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for label in week_start.weekday_labels() {
                            th scope="col" class="py-2" { (label) }
                        }
                    }
                }

                tbody
                {
                    @for week in grid.chunks(7) {
                        tr
                        {
                            @for cell in week {
                                @match cell {
                                    CalendarCell::Blank => {
                                        td class=(BLANK_CELL_STYLE) {}
                                    }
                                    CalendarCell::Day(day) => {
                                        (day_cell(day))
                                    }
                                }
                            }

                            @for _ in week.len()..7 {
                                td class=(BLANK_CELL_STYLE) {}
                            }
                        }
                    }
                }
            }
        }
    }
}

fn day_cell(day: &CalendarDay) -> Markup {
    let style = if day.is_today {
        TODAY_CELL_STYLE
    } else {
        DAY_CELL_STYLE
    };
    let new_entry_url = format!("{}?date={}", endpoints::NEW_ENTRY, day.date);

    html! {
        td class=(style) data-date=(day.date)
        {
            a href=(new_entry_url) class="block h-full"
            {
                span class="font-semibold" { (day.date.day()) }

                @if day.totals.income != 0 {
                    span class={"day-income block truncate " (INCOME_TEXT_STYLE)}
                    {
                        (format_amount(day.totals.income))
                    }
                }

                @if day.totals.expense != 0 {
                    span class={"day-expense block truncate " (EXPENSE_TEXT_STYLE)}
                    {
                        (format_amount(day.totals.expense))
                    }
                }
            }
        }
    }
}

fn entry_list_view(entries: &[Entry]) -> Markup {
    html! {
        section class="w-full max-w-4xl"
        {
            h2 class="text-xl font-semibold mb-4" { "Entries" }

            @if entries.is_empty() {
                p id="no-entries" class="text-gray-500 dark:text-gray-400"
                {
                    "No entries this month. "
                    (link(endpoints::NEW_ENTRY, "Add one"))
                }
            } @else {
                div class="overflow-x-auto rounded-lg shadow"
                {
                    table id="entries" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "" }
                            }
                        }

                        tbody
                        {
                            @for entry in entries {
                                (entry_row(entry))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn entry_row(entry: &Entry) -> Markup {
    let amount_style = match entry.entry_type {
        EntryType::Income => INCOME_TEXT_STYLE,
        EntryType::Expense => EXPENSE_TEXT_STYLE,
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-entry-id=(entry.id)
        {
            td class=(TABLE_CELL_STYLE) { (entry.date) }
            td class=(TABLE_CELL_STYLE) { (entry.entry_type.label()) }
            td class=(TABLE_CELL_STYLE) { (entry.category) }
            td class=(TABLE_CELL_STYLE) { (entry.description) }
            td class={(TABLE_CELL_STYLE) " text-right " (amount_style)} { (format_amount(entry.amount)) }
            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"}
            {
                (link(&format_endpoint(endpoints::EDIT_ENTRY, entry.id), "Edit"))

                form
                    action=(format_endpoint(endpoints::DELETE_ENTRY, entry.id))
                    method="post"
                    onsubmit="return confirm('Delete this entry?')"
                    class="inline ml-4"
                {
                    button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                }
            }
        }
    }
}
