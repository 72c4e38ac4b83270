//! Output formatting utilities for CLI commands

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, Color, ContentArrangement, Table};

/// Build a table with a cyan header; columns listed in `right_aligned` are numeric.
pub fn build_table(headers: &[&str], rows: Vec<Vec<String>>, right_aligned: &[usize]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        let cells: Vec<Cell> = row
            .into_iter()
            .enumerate()
            .map(|(idx, text)| {
                let cell = Cell::new(text);
                if right_aligned.contains(&idx) {
                    cell.set_alignment(CellAlignment::Right)
                } else {
                    cell
                }
            })
            .collect();
        table.add_row(cells);
    }

    table
}

/// Print a table to stdout
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>, right_aligned: &[usize]) {
    println!("{}", build_table(headers, rows, right_aligned));
}
