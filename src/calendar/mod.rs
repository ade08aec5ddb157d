//! The monthly calendar, the landing page of the app.
//!
//! Shows each day's income and expense totals laid out in weeks, the month's
//! totals and balance, and the list of the month's entries.

mod grid;
mod page;
mod summary;

pub use grid::WeekStart;
pub use page::{get_calendar_page, post_calendar};
