//! Income and expense totals for the days of a month and the month as a whole.

use std::collections::HashMap;

use rusqlite::Connection;

use crate::{Error, month::YearMonth};

/// The income and expense totals for a single day.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DayTotals {
    pub income: i64,
    pub expense: i64,
}

/// The income and expense totals for a month.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyTotals {
    pub income: i64,
    pub expense: i64,
}

impl MonthlyTotals {
    /// Income minus expenses.
    pub fn balance(self) -> i64 {
        self.income - self.expense
    }
}

/// Sum the income and expenses for each day of `month` that has at least one entry.
///
/// The map is keyed by day of the month, starting from 1.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_daily_totals(
    month: YearMonth,
    connection: &Connection,
) -> Result<HashMap<u8, DayTotals>, Error> {
    connection
        .prepare(
            "SELECT CAST(strftime('%d', date) AS INTEGER) AS day,
                SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END),
                SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END)
            FROM kakeibo
            WHERE date BETWEEN ?1 AND ?2
            GROUP BY day",
        )?
        .query_map((month.first_day(), month.last_day()), |row| {
            Ok((
                row.get(0)?,
                DayTotals {
                    income: row.get(1)?,
                    expense: row.get(2)?,
                },
            ))
        })?
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(Error::from)
}

/// Sum the income and expenses over the whole of `month`.
///
/// A month without entries has zero totals.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_monthly_totals(month: YearMonth, connection: &Connection) -> Result<MonthlyTotals, Error> {
    connection
        .query_row(
            "SELECT
                COALESCE(SUM(CASE WHEN type = 'income' THEN amount END), 0),
                COALESCE(SUM(CASE WHEN type = 'expense' THEN amount END), 0)
            FROM kakeibo
            WHERE date BETWEEN ?1 AND ?2",
            (month.first_day(), month.last_day()),
            |row| {
                Ok(MonthlyTotals {
                    income: row.get(0)?,
                    expense: row.get(1)?,
                })
            },
        )
        .map_err(Error::from)
}
