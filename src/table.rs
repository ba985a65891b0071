//! Plain-text rendering of tables for the terminal.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::report::NamedTable;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));

    let separator_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<usize>>();
    let separator_cells = separator_widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator_cells, &separator_widths));

    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }

    output
}

/// Renders a report table under a title line, followed by its row count.
pub fn render_named_table(table: &NamedTable) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", table.name);
    if table.rows.is_empty() {
        let _ = writeln!(output, "(no guests)");
    } else {
        output.push_str(&render_table(&table.headers, &table.display_rows()));
    }
    let _ = writeln!(output, "{} guest(s)", table.rows.len());
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

pub fn print_named_tables(tables: &[NamedTable]) {
    let rendered = tables
        .iter()
        .map(render_named_table)
        .collect::<Vec<_>>()
        .join("\n");
    print!("{rendered}");
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (value, width) in values.iter().zip(widths) {
        let sanitized = sanitize_cell(value);
        let padding = width.saturating_sub(display_width(sanitized.as_ref()));
        let mut cell = sanitized.into_owned();
        cell.push_str(&" ".repeat(padding));
        cells.push(cell);
    }
    cells.join("  ").trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // ANSI escape, e.g. \x1b[31m
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportCell;

    #[test]
    fn named_table_shows_title_and_count() {
        let table = NamedTable {
            name: "Mismatch".into(),
            headers: vec!["Guest Name".into(), "Status".into()],
            rows: vec![vec![
                ReportCell::Text("BOB".into()),
                ReportCell::Text("System Extra".into()),
            ]],
        };
        let rendered = render_named_table(&table);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Mismatch");
        assert_eq!(lines[1], "Guest Name  Status");
        assert_eq!(lines[3], "BOB         System Extra");
        assert_eq!(lines[4], "1 guest(s)");
    }

    #[test]
    fn empty_named_table_says_so() {
        let table = NamedTable {
            name: "Overlap".into(),
            headers: vec!["Guest Name".into()],
            rows: Vec::new(),
        };
        let rendered = render_named_table(&table);
        assert_eq!(rendered, "Overlap\n(no guests)\n0 guest(s)\n");
    }
}
