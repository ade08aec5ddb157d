//! The pie chart of a month's expenses broken down by category.

mod chart;
mod page;
mod query;

pub use page::get_graph_page;
