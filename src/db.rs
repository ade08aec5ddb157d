//! Opening the ledger database and keeping its schema up to date.
//!
//! The schema version is stored in SQLite's `user_version` pragma. Each entry
//! in [MIGRATIONS] moves the schema forward by one version and runs exactly
//! once per database.

use std::{path::Path, time::Duration};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, entry::create_entry_table};

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

type Migration = fn(&Connection) -> Result<(), rusqlite::Error>;

/// The schema migrations, in the order they must be applied.
///
/// Never reorder or remove a migration, only append new ones.
const MIGRATIONS: &[Migration] = &[
    create_entry_table,
    add_description_column,
    normalize_legacy_entry_types,
];

/// Open the SQLite database at `path`, creating the file if needed.
///
/// The connection uses write-ahead logging so readers are not blocked by a
/// writer, and waits up to five seconds for a lock before failing.
///
/// # Errors
/// Returns an error if the file cannot be opened or the pragmas cannot be set.
pub fn open(path: impl AsRef<Path>) -> Result<Connection, Error> {
    let connection = Connection::open(path)?;
    connection.busy_timeout(BUSY_TIMEOUT)?;

    let journal_mode: String =
        connection.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    tracing::debug!("Opened database with journal mode {journal_mode}");

    Ok(connection)
}

/// Bring the database schema up to date.
///
/// All pending migrations run inside a single exclusive transaction, so the
/// schema is either fully migrated or left untouched.
///
/// # Errors
/// Returns an error if a migration fails or there is some other SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    let current_version = get_schema_version(&transaction)?;
    let latest_version = MIGRATIONS.len();

    if current_version > latest_version {
        tracing::warn!(
            "Database schema version {current_version} is newer than the latest known version {latest_version}"
        );
    }

    for (index, migration) in MIGRATIONS.iter().enumerate().skip(current_version) {
        tracing::info!("Migrating database schema to version {}", index + 1);
        migration(&transaction)?;
    }

    if current_version < latest_version {
        transaction.pragma_update(None, "user_version", latest_version as i64)?;
    }

    transaction.commit()?;

    Ok(())
}

fn get_schema_version(connection: &Connection) -> Result<usize, rusqlite::Error> {
    let version: i64 = connection.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    Ok(usize::try_from(version).unwrap_or_default())
}

/// Stores created before descriptions were recorded lack the column.
fn add_description_column(connection: &Connection) -> Result<(), rusqlite::Error> {
    let has_description: bool = connection.query_row(
        "SELECT COUNT(1) > 0 FROM pragma_table_info('kakeibo') WHERE name = 'description'",
        [],
        |row| row.get(0),
    )?;

    if !has_description {
        tracing::info!("Adding the description column to the kakeibo table");
        connection.execute("ALTER TABLE kakeibo ADD COLUMN description TEXT", ())?;
    }

    Ok(())
}

/// Older stores recorded entry types with Japanese labels.
fn normalize_legacy_entry_types(connection: &Connection) -> Result<(), rusqlite::Error> {
    let income_rows = connection.execute(
        "UPDATE kakeibo SET type = 'income' WHERE type = '収入'",
        (),
    )?;
    let expense_rows = connection.execute(
        "UPDATE kakeibo SET type = 'expense' WHERE type = '支出'",
        (),
    )?;

    if income_rows + expense_rows > 0 {
        tracing::info!(
            "Relabelled {income_rows} income and {expense_rows} expense entries from legacy type labels"
        );
    }

    Ok(())
}
