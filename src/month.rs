//! Calendar months and the `?year=Y&month=M` query used to select them.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, de};
use time::{Date, Duration, Month};

use crate::Error;

/// A calendar month in a specific year, e.g. March 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    first_day: Date,
}

impl YearMonth {
    /// Create a month from a year and a month number from 1 to 12.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `month` is not in 1..=12 or `year` is
    /// outside the range of dates supported by `time`.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        Month::try_from(month)
            .and_then(|month| Date::from_calendar_date(year, month, 1))
            .map(|first_day| Self { first_day })
            .map_err(|_| Error::InvalidMonth { year, month })
    }

    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self {
            first_day: date - Duration::days(i64::from(date.day()) - 1),
        }
    }

    pub fn year(self) -> i32 {
        self.first_day.year()
    }

    pub fn month(self) -> Month {
        self.first_day.month()
    }

    pub fn first_day(self) -> Date {
        self.first_day
    }

    /// The last day of the month, taking leap years into account.
    pub fn last_day(self) -> Date {
        self.first_day + Duration::days(i64::from(self.days_in_month()) - 1)
    }

    /// The number of days in the month.
    ///
    /// Computed from the distance to the first day of the next month, so
    /// February in leap years has 29 days.
    pub fn days_in_month(self) -> u8 {
        match self.next() {
            Some(next) => (next.first_day - self.first_day).whole_days() as u8,
            // Only the last representable month has no successor, and it is a December.
            None => 31,
        }
    }

    /// The month after this one, if it can be represented.
    pub fn next(self) -> Option<Self> {
        let (year, month) = match self.month() {
            Month::December => (self.year().checked_add(1)?, Month::January),
            month => (self.year(), month.next()),
        };

        Date::from_calendar_date(year, month, 1)
            .ok()
            .map(|first_day| Self { first_day })
    }

    /// The month before this one, if it can be represented.
    pub fn previous(self) -> Option<Self> {
        let (year, month) = match self.month() {
            Month::January => (self.year().checked_sub(1)?, Month::December),
            month => (self.year(), month.previous()),
        };

        Date::from_calendar_date(year, month, 1)
            .ok()
            .map(|first_day| Self { first_day })
    }

    /// Whether `date` falls within this month.
    pub fn contains(self, date: Date) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

impl Display for YearMonth {
    /// Formats the month as `YYYY-MM`, the same form SQLite's `strftime('%Y-%m', ...)` produces.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month() as u8)
    }
}

/// The query parameters for pages that show a single month.
///
/// Either parameter may be omitted or left blank, in which case it defaults
/// to the current local date's year or month.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize)]
pub struct MonthQuery {
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub month: Option<u8>,
}

fn deserialize_blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse::<T>().map(Some).map_err(de::Error::custom),
    }
}

impl MonthQuery {
    /// Resolve the query into a month, filling in missing values from `today`.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if the query names a month that does not exist.
    pub fn resolve(self, today: Date) -> Result<YearMonth, Error> {
        YearMonth::new(
            self.year.unwrap_or(today.year()),
            self.month.unwrap_or(today.month() as u8),
        )
    }
}

impl From<YearMonth> for MonthQuery {
    fn from(month: YearMonth) -> Self {
        Self {
            year: Some(month.year()),
            month: Some(month.month() as u8),
        }
    }
}

/// Build a link to `endpoint` that shows `month`, e.g. `/graph?year=2024&month=3`.
pub fn month_url(endpoint: &str, month: YearMonth) -> String {
    match serde_urlencoded::to_string(MonthQuery::from(month)) {
        Ok(query) => format!("{endpoint}?{query}"),
        Err(error) => {
            tracing::error!("Could not encode the query string for month {month}: {error}");
            endpoint.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use crate::{
        Error,
        month::{MonthQuery, YearMonth, month_url},
    };

    #[test]
    fn days_in_month_handles_leap_years() {
        let cases = [
            (2024, 1, 31),
            (2024, 2, 29),
            (2023, 2, 28),
            (1900, 2, 28),
            (2000, 2, 29),
            (2024, 4, 30),
            (2024, 12, 31),
        ];

        for (year, month, want_days) in cases {
            let got_days = YearMonth::new(year, month).unwrap().days_in_month();

            assert_eq!(
                got_days, want_days,
                "want {want_days} days in {year}-{month}, got {got_days}"
            );
        }
    }

    #[test]
    fn rejects_invalid_month_numbers() {
        assert_eq!(
            YearMonth::new(2024, 0),
            Err(Error::InvalidMonth {
                year: 2024,
                month: 0
            })
        );
        assert_eq!(
            YearMonth::new(2024, 13),
            Err(Error::InvalidMonth {
                year: 2024,
                month: 13
            })
        );
    }

    #[test]
    fn next_and_previous_roll_over_the_year() {
        let december = YearMonth::new(2024, 12).unwrap();
        let january = YearMonth::new(2025, 1).unwrap();

        assert_eq!(december.next(), Some(january));
        assert_eq!(january.previous(), Some(december));
    }

    #[test]
    fn from_date_gives_enclosing_month() {
        let month = YearMonth::from_date(date!(2024 - 02 - 29));

        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), Month::February);
        assert_eq!(month.first_day(), date!(2024 - 02 - 01));
        assert_eq!(month.last_day(), date!(2024 - 02 - 29));
        assert!(month.contains(date!(2024 - 02 - 10)));
        assert!(!month.contains(date!(2024 - 03 - 01)));
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(YearMonth::new(2024, 3).unwrap().to_string(), "2024-03");
    }

    #[test]
    fn query_defaults_to_today() {
        let today = date!(2025 - 07 - 19);

        let cases = [
            (MonthQuery::default(), YearMonth::new(2025, 7)),
            (
                MonthQuery {
                    year: Some(2023),
                    month: None,
                },
                YearMonth::new(2023, 7),
            ),
            (
                MonthQuery {
                    year: None,
                    month: Some(1),
                },
                YearMonth::new(2025, 1),
            ),
        ];

        for (query, want) in cases {
            assert_eq!(query.resolve(today), want);
        }
    }

    #[test]
    fn blank_query_values_default_to_today() {
        let today = date!(2025 - 07 - 19);

        let query: MonthQuery = serde_urlencoded::from_str("year=&month=3").unwrap();

        assert_eq!(query.year, None);
        assert_eq!(query.resolve(today), YearMonth::new(2025, 3));
    }

    #[test]
    fn non_numeric_query_values_are_rejected() {
        let result = serde_urlencoded::from_str::<MonthQuery>("year=2024&month=abc");

        assert!(result.is_err(), "want an error, got {result:?}");
    }

    #[test]
    fn month_url_includes_year_and_month() {
        let url = month_url("/graph", YearMonth::new(2024, 3).unwrap());

        assert_eq!(url, "/graph?year=2024&month=3");
    }
}
