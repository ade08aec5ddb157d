//! Ledger entries for the budgeting application.
//!
//! This module contains everything related to entries:
//! - The `Entry` model and the `NewEntry` builder for creating entries
//! - Database functions for storing, querying, and managing entries
//! - The form and route handlers for creating, editing and deleting entries

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;

pub use core::{
    Category, Entry, EntryId, EntryType, NewEntry, create_entry, create_entry_table,
    get_entries_in_month,
};
pub use create_endpoint::create_entry_endpoint;
pub use create_page::get_new_entry_page;
pub use delete_endpoint::delete_entry_endpoint;
pub use edit_endpoint::edit_entry_endpoint;
pub use edit_page::get_edit_entry_page;

#[cfg(test)]
pub use core::{count_entries, delete_entry, get_categories, get_entry, update_entry};
#[cfg(test)]
pub use form::{EntryForm, MAX_AMOUNT};
