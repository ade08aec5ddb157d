//! Defines the core data models and database queries for ledger entries.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use time::Date;

use crate::{Error, month::YearMonth};

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the integer type used for entry IDs in the database.
pub type EntryId = i64;

/// Whether an entry records money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Money earned, e.g. salary.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl EntryType {
    /// The label stored in the database and sent in forms.
    pub const fn as_str(self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }

    /// The label shown to the user.
    pub const fn label(self) -> &'static str {
        match self {
            EntryType::Income => "Income",
            EntryType::Expense => "Expense",
        }
    }
}

impl Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error returned when a string is not a recognised entry type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not an entry type, expected \"income\" or \"expense\"")]
pub struct UnknownEntryType(pub String);

impl FromStr for EntryType {
    type Err = UnknownEntryType;

    /// Parses the stored labels, plus the Japanese labels used by older stores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" | "収入" => Ok(EntryType::Income),
            "expense" | "支出" => Ok(EntryType::Expense),
            other => Err(UnknownEntryType(other.to_owned())),
        }
    }
}

impl ToSql for EntryType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for EntryType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// The name of the category an entry belongs to, e.g. "Groceries".
///
/// Category names are trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category(String);

/// The error returned when creating a category from a blank string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("category cannot be empty")]
pub struct EmptyCategory;

impl Category {
    /// Create a category name, trimming surrounding whitespace.
    ///
    /// # Errors
    /// Returns [EmptyCategory] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, EmptyCategory> {
        let name = name.trim();

        if name.is_empty() {
            Err(EmptyCategory)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(Category::new_unchecked)
    }
}

/// A single income or expense record in the ledger.
///
/// To create a new `Entry`, use [Entry::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// The ID of the entry.
    pub id: EntryId,
    /// The day the money was earned or spent.
    pub date: Date,
    /// Whether this entry is income or an expense.
    pub entry_type: EntryType,
    /// The amount of money in whole currency units.
    pub amount: i64,
    /// The category the entry belongs to.
    pub category: Category,
    /// Optional free text describing the entry, empty if not given.
    pub description: String,
}

impl Entry {
    /// Create a new entry.
    ///
    /// Shortcut for [NewEntry] for discoverability.
    pub fn build(date: Date, entry_type: EntryType, amount: i64, category: Category) -> NewEntry {
        NewEntry {
            date,
            entry_type,
            amount,
            category,
            description: String::new(),
        }
    }
}

/// The fields of an entry that has not been saved yet.
///
/// Also used to overwrite every mutable field of an existing entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    /// The day the money was earned or spent.
    pub date: Date,
    /// Whether this entry is income or an expense.
    pub entry_type: EntryType,
    /// The amount of money in whole currency units.
    pub amount: i64,
    /// The category the entry belongs to.
    pub category: Category,
    /// Optional free text describing the entry.
    pub description: String,
}

impl NewEntry {
    /// Set the description for the entry.
    pub fn description(mut self, description: &str) -> Self {
        description.clone_into(&mut self.description);
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

type RowsAffected = usize;

/// Create a new entry in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_entry(entry: NewEntry, connection: &Connection) -> Result<Entry, Error> {
    connection
        .prepare(
            "INSERT INTO kakeibo (date, type, amount, category, description)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, date, type, amount, category, description",
        )?
        .query_row(
            (
                entry.date,
                entry.entry_type,
                entry.amount,
                entry.category,
                entry.description,
            ),
            map_entry_row,
        )
        .map_err(Error::from)
}

/// Retrieve an entry from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid entry,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_entry(id: EntryId, connection: &Connection) -> Result<Entry, Error> {
    connection
        .prepare(
            "SELECT id, date, type, amount, category, description FROM kakeibo WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_entry_row)
        .map_err(Error::from)
}

/// Get the entries dated within `month`, ordered by date and then by ID.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_entries_in_month(month: YearMonth, connection: &Connection) -> Result<Vec<Entry>, Error> {
    connection
        .prepare(
            "SELECT id, date, type, amount, category, description FROM kakeibo
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY date, id",
        )?
        .query_map((month.first_day(), month.last_day()), map_entry_row)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Get every distinct category name used by an entry, in alphabetical order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT DISTINCT category FROM kakeibo ORDER BY category")?
        .query_map((), |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Overwrite every mutable field of the entry `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingEntry] if `id` does not refer to a valid entry,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_entry(id: EntryId, entry: &NewEntry, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE kakeibo
        SET date = ?1, type = ?2, amount = ?3, category = ?4, description = ?5
        WHERE id = ?6",
        (
            entry.date,
            entry.entry_type,
            entry.amount,
            &entry.category,
            &entry.description,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingEntry);
    }

    Ok(())
}

/// Delete the entry `id`.
///
/// Deleting an entry that does not exist is not an error, zero rows are affected.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_entry(id: EntryId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM kakeibo WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

/// Get the total number of entries in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_entries(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM kakeibo", [], |row| row.get(0))
        .map_err(Error::from)
}

/// Create the entry table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_entry_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS kakeibo (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                type TEXT NOT NULL,
                amount INTEGER NOT NULL,
                category TEXT NOT NULL,
                description TEXT
                )",
        (),
    )?;

    // Monthly views filter on the date range.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_kakeibo_date ON kakeibo(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an Entry.
///
/// Expects the columns `id, date, type, amount, category, description` in that order.
pub fn map_entry_row(row: &Row) -> Result<Entry, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let entry_type = row.get(2)?;
    let amount = row.get(3)?;
    let category = row.get(4)?;
    let description: Option<String> = row.get(5)?;

    Ok(Entry {
        id,
        date,
        entry_type,
        amount,
        category,
        description: description.unwrap_or_default(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
