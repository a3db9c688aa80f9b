use crate::core::DeltaReport;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Green for a rise, red for a fall.
pub fn format_delta_cell(value: Option<f64>) -> Cell {
    match value {
        None => Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        Some(v) => {
            let color = if v > 0.0 {
                Color::Green
            } else if v < 0.0 {
                Color::Red
            } else {
                Color::Reset
            };
            Cell::new(format!("{v:+.4}"))
                .fg(color)
                .set_alignment(CellAlignment::Right)
        }
    }
}

pub fn build_delta_table(report: &DeltaReport) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Currency"),
        header_cell("Rate (EUR)"),
        header_cell("Delta"),
    ]);
    for (currency, rate) in report.present_rates.iter() {
        table.add_row(vec![
            Cell::new(currency).add_attribute(Attribute::Bold),
            Cell::new(format!("{rate:.4}")).set_alignment(CellAlignment::Right),
            format_delta_cell(report.delta.get(currency)),
        ]);
    }
    table
}

pub fn display_delta(report: &DeltaReport) {
    if report.present_rates.is_empty() {
        println!("{}", style("No rates stored for today.").dim());
        return;
    }
    println!("{}", build_delta_table(report));
}
