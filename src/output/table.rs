//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Message printed in place of an empty table
pub const NO_RESULTS: &str = "No results found.";

/// Format data as a table
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    format_table_or(data, NO_RESULTS)
}

/// Format data as a table, or return `empty` when there are no rows
pub fn format_table_or<T: Tabled>(data: &[T], empty: &str) -> String {
    if data.is_empty() {
        return empty.to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}
