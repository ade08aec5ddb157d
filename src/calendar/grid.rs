//! Laying out the days of a month in weeks.

use std::collections::HashMap;

use time::{Date, Duration};

use crate::{calendar::summary::DayTotals, month::YearMonth};

/// The day of the week the calendar's weeks start on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum WeekStart {
    /// Weeks run Sunday to Saturday.
    #[default]
    Sunday,
    /// Weeks run Monday to Sunday.
    Monday,
}

impl WeekStart {
    /// The number of blank cells before `date` in its week row.
    pub fn offset_of(self, date: Date) -> u8 {
        match self {
            WeekStart::Sunday => date.weekday().number_days_from_sunday(),
            WeekStart::Monday => date.weekday().number_days_from_monday(),
        }
    }

    /// Short weekday names in column order.
    pub fn weekday_labels(self) -> [&'static str; 7] {
        match self {
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }
}

/// A day of the month with its totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: Date,
    pub totals: DayTotals,
    pub is_today: bool,
}

/// One cell of the calendar grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    /// Padding before the first day so that it lines up with its weekday.
    Blank,
    Day(CalendarDay),
}

/// Lay out `month` as leading blanks followed by one cell per day.
///
/// Days without an entry in `daily_totals` get zero totals.
pub fn build_day_grid(
    month: YearMonth,
    week_start: WeekStart,
    daily_totals: &HashMap<u8, DayTotals>,
    today: Date,
) -> Vec<CalendarCell> {
    let leading_blanks = usize::from(week_start.offset_of(month.first_day()));
    let days_in_month = month.days_in_month();

    let mut cells = Vec::with_capacity(leading_blanks + usize::from(days_in_month));
    cells.resize(leading_blanks, CalendarCell::Blank);

    cells.extend((1..=days_in_month).map(|day| {
        let date = month.first_day() + Duration::days(i64::from(day) - 1);

        CalendarCell::Day(CalendarDay {
            date,
            totals: daily_totals.get(&day).copied().unwrap_or_default(),
            is_today: date == today,
        })
    }));

    cells
}
