use chrono::NaiveDate;
use comfy_table::{Cell, CellAlignment, Table, TableComponent};

use crate::transaction::TransactionSet;

/// Print one row per transaction
pub(crate) fn print_transactions(set: &TransactionSet) {
    let mut table = new_table();
    table.set_header(vec!["Date", "Category", "Description", "Amount"]);
    for record in set.records() {
        table.add_row(vec![
            Cell::new(format_date(record.date).as_str()),
            Cell::new(record.category.as_str()),
            Cell::new(record.description.as_str()),
            Cell::new(format_amount(record.amount).as_str()).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{table}");
}

/// Print count and subtotal per category
pub(crate) fn print_category_summary(set: &TransactionSet) {
    let mut table = new_table();
    table.set_header(vec!["Category", "Count", "Subtotal"]);
    for (category, group) in set.by_category() {
        table.add_row(vec![
            Cell::new(category.as_str()),
            Cell::new(group.len()).set_alignment(CellAlignment::Right),
            Cell::new(format_amount(group.sum()).as_str()).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{table}");
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.remove_style(TableComponent::HorizontalLines);
    table.remove_style(TableComponent::MiddleIntersections);
    table.remove_style(TableComponent::LeftBorderIntersections);
    table.remove_style(TableComponent::RightBorderIntersections);
    table
}

/// Format $ amount
fn format_amount(amount: f32) -> String {
    format!("{amount:.2}")
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
