use std::borrow::Cow;
use std::fmt::Write as _;

use crate::page::TableView;

/// Renders `table` as aligned plain-text columns. Numeric columns are padded
/// on the left so their digits line up.
pub fn render_table(table: &TableView) -> String {
    let column_count = table.headers.len();
    let mut widths = table
        .headers
        .iter()
        .map(|h| display_width(h))
        .collect::<Vec<_>>();

    for row in &table.rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    for width in &mut widths {
        *width = (*width).max(3);
    }

    let right_aligned = (0..column_count)
        .map(|idx| table.numeric.get(idx).copied().unwrap_or(false))
        .collect::<Vec<_>>();

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(&table.headers, &widths, &right_aligned));

    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths, &right_aligned));

    if table.rows.is_empty() {
        let _ = writeln!(output, "(no rows)");
    }
    for row in &table.rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, &right_aligned));
    }

    output
}

fn format_row(values: &[String], widths: &[usize], right_aligned: &[bool]) -> String {
    let cells = values
        .iter()
        .zip(widths)
        .zip(right_aligned)
        .map(|((value, width), right)| {
            let sanitized = sanitize_cell(value);
            let padding = " ".repeat(width.saturating_sub(display_width(&sanitized)));
            if *right {
                format!("{padding}{sanitized}")
            } else {
                format!("{sanitized}{padding}")
            }
        })
        .collect::<Vec<_>>();
    cells.join("  ").trim_end().to_string()
}

pub(crate) fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
